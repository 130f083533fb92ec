//! Codeflow CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use codeflow::cli::{Cli, CommandContext, CommandDispatcher, Commands};
use codeflow::config::load_settings;
use codeflow::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("codeflow=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("codeflow=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Flags win; otherwise the settings file decides.
fn output_mode(cli: &Cli, project_root: &Path) -> OutputMode {
    if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        load_settings(project_root, cli.config.as_deref())
            .map(|s| s.output)
            .unwrap_or_default()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Codeflow starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let is_interactive = match &cli.command {
        Commands::Run(args) => !args.non_interactive,
        _ => true,
    };

    let mut ui = create_ui(is_interactive, output_mode(&cli, &project_root));

    let context = CommandContext::new(project_root).with_config(cli.config.clone());
    let dispatcher = CommandDispatcher::new(context);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
