#![forbid(unsafe_code)]

//! Core: geometry, canonical input events, scoped global listeners, logging,
//! and terminal lifecycle.

pub mod event;
pub mod event_hub;
pub mod geometry;
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
