use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calendar_cli::command::{normalize_args, Cli, Command};
use calendar_cli::config::AppConfig;
use calendar_cli::dispatcher::{self, ExecutionContext};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    // Logs go to stderr; stdout carries only command output
    let log_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("calendar_cli={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Command::from_cli(&cli).context("Invalid arguments")?;
    let mut stdout = std::io::stdout().lock();

    if command == Command::Unknown {
        return dispatcher::print_usage(&mut stdout);
    }

    let config = AppConfig::load(cli.config.as_deref())
        .await
        .context("Failed to load application configuration")?;
    debug!("Configuration: {:?}", config);

    let context = ExecutionContext::new(config, cli.transport_mode(), cli.summary);
    dispatcher::dispatch(command, &context, &mut stdout)
        .await
        .context("Failed to execute command")?;

    Ok(())
}
