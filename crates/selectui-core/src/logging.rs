#![forbid(unsafe_code)]

//! Structured logging for the widget stack.
//!
//! Widgets log through `selectui_core::{trace, debug, warn}`. With the
//! `tracing` feature these are the `tracing` macros and accept its full
//! field syntax. Without it they expand to nothing, so the arguments are never
//! evaluated and no `tracing` code is linked.
//!
//! Levels used across the crates:
//! - `trace`: per-frame and per-listener bookkeeping.
//! - `debug`: user-visible state changes (open/close, selection, measurement).
//! - `warn`: host misuse that is tolerated, such as feeding a value to an
//!   uncontrolled dropdown.

/// Whether log macros are live in this build.
pub const ENABLED: bool = cfg!(feature = "tracing");

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards its arguments.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn enabled_tracks_feature() {
        assert_eq!(super::ENABLED, cfg!(feature = "tracing"));
    }

    #[test]
    fn macros_accept_field_syntax() {
        let open = true;
        crate::debug!(open, class = "x", "menu toggled");
        crate::trace!(count = 3_usize, "rows rendered");
        crate::warn!("ignored");
    }
}
