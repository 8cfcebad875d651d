#![forbid(unsafe_code)]

//! Configurator for the selectui dropdown.
//!
//! Exposes the model and CLI so integration tests can drive them through the
//! runtime simulator.

pub mod app;
pub mod cli;
pub mod logging;
