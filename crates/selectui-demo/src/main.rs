#![forbid(unsafe_code)]

//! Configurator binary entry point.

use std::time::Duration;

use selectui_demo::app::ConfiguratorModel;
use selectui_demo::{cli, logging};
use selectui_runtime::{Program, ProgramConfig};

fn main() {
    let opts = cli::Opts::parse();

    match logging::init() {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "logging enabled"),
        Ok(None) => {}
        Err(e) => eprintln!("Failed to open log file: {e}"),
    }

    let model = ConfiguratorModel::new(opts.option_count, opts.multi_select, opts.controlled);
    let config = ProgramConfig {
        mouse: opts.mouse,
        exit_after: (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms)),
        ..ProgramConfig::default()
    };

    if let Err(e) = Program::new(model, config).run() {
        tracing::error!(error = %e, "runtime error");
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
