use anyhow::Context;
use clap::Parser;
use sitecraft::Config;
use sitecraft_gateway_telegram::cli::Cli;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,teloxide=warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.apply_env()?;
    cli.apply(&mut config);

    info!(
        delivery = ?config.telegram.delivery,
        endpoint = %config.generator.endpoint,
        locale = ?config.locale,
        "Starting sitecraft"
    );

    sitecraft_gateway_telegram::run(&config).await
}
