//! assetgate CLI entry point.

use std::process::ExitCode;

use assetgate::cli::{Cli, CommandDispatcher};
use assetgate::config::find_project_root;
use assetgate::error::GateError;
use assetgate::shell::is_ci;
use assetgate::ui::{create_ui, OutputMode};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("assetgate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("assetgate=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("assetgate starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // --project wins; otherwise walk up from the current directory.
    let project_root = cli.project.clone().unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_default();
        find_project_root(&cwd).unwrap_or(cwd)
    });

    let mut ui = create_ui(!is_ci(), output_mode);

    let dispatcher =
        CommandDispatcher::new(project_root).with_config_override(cli.config.clone());

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(exit_status(result.exit_code)),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            if matches!(e, GateError::ConfigNotFound { .. }) {
                ui.error("No configuration found. Create .assetgate/config.yml first.");
            }
            ExitCode::from(exit_status(e.exit_code()))
        }
    }
}

/// Codes outside 0..=255 report as a plain failure.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_keeps_small_codes() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(2), 2);
    }

    #[test]
    fn exit_status_does_not_wrap() {
        assert_eq!(exit_status(256), 1);
        assert_eq!(exit_status(-1), 1);
    }
}
