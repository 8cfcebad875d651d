#![forbid(unsafe_code)]

//! Tracing setup for the configurator.
//!
//! The terminal owns stdout, so log output goes to the file named by
//! `SELECTUI_LOG`. Without it no subscriber is installed and the widget
//! logging stays silent. `RUST_LOG` filters events (default `info`).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Variable naming the log file.
pub const LOG_ENV: &str = "SELECTUI_LOG";

const DEFAULT_FILTER: &str = "info";

/// Log file path from `lookup`, if set and non-empty.
pub fn log_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(LOG_ENV)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Install the file subscriber when `SELECTUI_LOG` is set.
///
/// Returns the path being written, or `None` when logging is off.
pub fn init() -> io::Result<Option<PathBuf>> {
    let Some(path) = log_path(|key| std::env::var(key).ok()) else {
        return Ok(None);
    };
    install(&path)?;
    Ok(Some(path))
}

fn install(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| io::Error::other(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_requires_non_empty_value() {
        assert_eq!(log_path(|_| None), None);
        assert_eq!(log_path(|_| Some("  ".into())), None);
        assert_eq!(
            log_path(|key| (key == LOG_ENV).then(|| "/tmp/selectui.log".into())),
            Some(PathBuf::from("/tmp/selectui.log"))
        );
    }
}
