mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use letmein_config::LogFormat;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Map a logrus-style level name. `fatal` and `panic` have no tracing
/// equivalent and log as `error`.
fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Install the global subscriber. Logs go to stderr so that structured
/// output on stdout stays parseable. `RUST_LOG` wins over everything.
fn init_tracing(log_level: &str, format: LogFormat, verbosity: u8) {
    let configured = parse_level(log_level);
    let from_flags = match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let level = configured.unwrap_or(LevelFilter::WARN).max(from_flags);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }

    if configured.is_none() {
        tracing::error!(level = log_level, "unrecognized log level, defaulting to warn");
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "letmein", &mut std::io::stdout());
            Ok(())
        }

        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let settings = config::resolve_settings(&cli.global)?;
            init_tracing(&settings.log_level, settings.log_format()?, cli.global.verbose);
            tracing::debug!(command = ?cmd, settings = ?settings, "dispatching command");

            match cmd {
                Command::Run(args) => commands::run::handle(&settings, &cli.global, args).await,
                Command::Plan => commands::sync::handle(&settings, &cli.global, true).await,
                _ => commands::sync::handle(&settings, &cli.global, false).await,
            }
        }
    }
}
