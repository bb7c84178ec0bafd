//! onchaincounting command-line front end.
//!
//! Logs go to stderr (`RUST_LOG`, default `onchaincounting=info`); reports
//! and listings go to stdout.

mod args;
mod commands;
mod render;
mod source;

use std::process::ExitCode;

use clap::Parser;
use onchaincounting_core::reports::VatPolicy;
use onchaincounting_db::connect_and_migrate;
use onchaincounting_shared::{AppConfig, AppError};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::Cli;
use commands::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onchaincounting=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let tz = config.reporting.timezone()?;
    let db = connect_and_migrate(&config.database.url, config.database.max_connections).await?;
    info!(timezone = %tz, "Database ready");

    let ctx = AppContext {
        db,
        tz,
        policy: VatPolicy {
            deductible_percent: config.reporting.deductible_vat_percent,
        },
    };

    if let Err(err) = commands::run(&ctx, cli.command).await {
        if let Some(app) = err.downcast_ref::<AppError>() {
            eprintln!("[{}] {app}", app.error_code());
            if app.is_retryable() {
                eprintln!("Run the command again to retry.");
            }
        } else {
            eprintln!("Error: {err:#}");
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
