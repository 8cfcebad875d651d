#![forbid(unsafe_code)]

//! Command-line argument parsing for the configurator.
//!
//! Parses args by hand. Environment variables with the `SELECTUI_DEMO_`
//! prefix are applied first and explicit flags override them.

use std::env;
use std::fmt;
use std::process;

use crate::app::{DEFAULT_OPTION_COUNT, MAX_OPTION_COUNT, parse_option_count};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
selectui configurator: exercise the dropdown in every mode

USAGE:
    selectui-demo [OPTIONS]

OPTIONS:
    --options=N          Number of generated options, 1-1000 (default: 5)
    --multi              Start in multi-select mode
    --uncontrolled       Start with the dropdown owning its selection
    --no-mouse           Disable mouse event capture
    --exit-after-ms=N    Quit automatically after N milliseconds
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    m               Toggle multi-select (resets the selection)
    c               Toggle controlled mode
    0-9, Backspace  Edit the option count
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    SELECTUI_DEMO_OPTIONS          Override --options
    SELECTUI_DEMO_EXIT_AFTER_MS    Override --exit-after-ms
    SELECTUI_LOG                   Write tracing output to this file
    RUST_LOG                       Filter for SELECTUI_LOG (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Number of generated options, already clamped.
    pub option_count: usize,
    pub multi_select: bool,
    pub controlled: bool,
    /// Whether mouse events are enabled.
    pub mouse: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            option_count: DEFAULT_OPTION_COUNT,
            multi_select: false,
            controlled: true,
            mouse: true,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(Opts),
    Help,
    Version,
}

/// Rejected command-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    UnknownFlag(String),
    InvalidValue { flag: &'static str, value: String },
}

impl CliError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        2
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFlag(flag) => write!(f, "unknown argument: {flag}"),
            Self::InvalidValue { flag, value } => write!(f, "invalid {flag} value: {value}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits when asked to. Invalid input is
    /// reported on stderr with exit code 2.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(CliAction::Run(opts)) => opts,
            Ok(CliAction::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(CliAction::Version) => {
                println!("selectui-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(err.exit_code());
            }
        }
    }

    /// Parse `args` with `lookup` standing in for the environment.
    pub fn parse_from<I, S, F>(args: I, lookup: F) -> Result<CliAction, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Malformed environment values are ignored rather than fatal.
        if let Some(val) = lookup("SELECTUI_DEMO_OPTIONS")
            && let Some(n) = parse_option_count(&val)
        {
            opts.option_count = n;
        }
        if let Some(val) = lookup("SELECTUI_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.trim().parse()
        {
            opts.exit_after_ms = n;
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(CliAction::Help),
                "--version" | "-V" => return Ok(CliAction::Version),
                "--multi" => opts.multi_select = true,
                "--uncontrolled" => opts.controlled = false,
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--options=") {
                        opts.option_count =
                            parse_option_count(val).ok_or_else(|| CliError::InvalidValue {
                                flag: "--options",
                                value: val.to_string(),
                            })?;
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = val.parse().map_err(|_| CliError::InvalidValue {
                            flag: "--exit-after-ms",
                            value: val.to_string(),
                        })?;
                    } else {
                        return Err(CliError::UnknownFlag(other.to_string()));
                    }
                }
            }
        }

        debug_assert!((1..=MAX_OPTION_COUNT).contains(&opts.option_count));
        Ok(CliAction::Run(opts))
    }
}
