mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use uisync_config::LoggingSection;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; a broken
    // config is reported by the command that needs it.
    let logging = config::load(&cli.global)
        .map(|c| c.logging)
        .unwrap_or_default();
    let guard = init_tracing(cli.global.verbose, &logging);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        drop(guard);
        std::process::exit(code);
    }
}

/// Level for our own crates: `-v` beats the config file.
fn level_for(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_owned(),
        1 => "debug".into(),
        _ => "trace".into(),
    }
}

/// stderr always; a daily-rolling `sync.log` when `logging.directory` is set.
/// `RUST_LOG` overrides both. The returned guard flushes the file on drop.
fn init_tracing(verbosity: u8, logging: &LoggingSection) -> Option<WorkerGuard> {
    let level = level_for(verbosity, &logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,uisync={level},uisync_core={level},uisync_api={level},uisync_config={level}"
        ))
    });

    let (file_layer, guard, file_error) = match logging.directory.as_deref().map(file_appender) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard), None)
        }
        Some(Err(e)) => (None, None, Some(e)),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "file logging disabled");
    }
    guard
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("sync.log")
        .build(dir)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need working credentials
        Command::Config(ref args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(ref args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "uisync", &mut std::io::stdout());
            Ok(())
        }

        ref cmd => commands::dispatch(cmd, &cli.global).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "debug");
        assert_eq!(level_for(3, "info"), "trace");
    }
}
