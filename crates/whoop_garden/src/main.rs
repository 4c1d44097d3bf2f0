use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use whoop_client::config::Config;
use whoop_client::http_client::ReqwestWhoopClient;
use whoop_garden::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Configure logging from env var `WHOOP_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("WHOOP_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    let combined_filter = format!("{},reqwest=warn,hyper=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,reqwest=warn,hyper=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!("whoop-garden: log filter: {}", log_env);

    let cli = Cli::parse();

    let config = Config::from_env().context("reading configuration")?;
    tracing::debug!(base_url = %config.base_url, "whoop-garden: configured");
    let client = ReqwestWhoopClient::from_config(&config).context("building HTTP client")?;

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = cli.execute(Arc::new(client), &mut stdout).await {
        if let Some(hint) = e.hint() {
            tracing::error!("{hint}");
        }
        return Err(e.into());
    }
    Ok(())
}
