#![forbid(unsafe_code)]

//! Elm-style runtime: models, commands, the terminal loop, and a
//! deterministic simulator for tests.

pub mod program;
pub mod simulator;

pub use program::{Cmd, Model, Program, ProgramConfig};
pub use selectui_core::event_hub::{EventHub, ListenerGuard, ListenerKind};
pub use simulator::{CmdRecord, ProgramSimulator};

use std::fmt;

/// Runtime error type.
#[derive(Debug)]
pub enum Error {
    /// I/O error from the terminal or the output writer.
    Io(std::io::Error),
    /// The terminal could not be used (for example, it reports a zero size).
    Terminal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Terminal(msg) => write!(f, "terminal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Terminal(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Standard result type for runtime APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_errors_convert_and_chain() {
        let err: Error = std::io::Error::other("boom").into();
        assert!(err.to_string().contains("boom"));
        assert!(err.source().is_some());
    }

    #[test]
    fn terminal_error_displays_message() {
        let err = Error::Terminal("zero-sized terminal".into());
        assert_eq!(err.to_string(), "terminal error: zero-sized terminal");
        assert!(err.source().is_none());
    }
}
