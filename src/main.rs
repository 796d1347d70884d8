use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use anirec::services::{Coordinator, Scheduler};
use anirec::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        catalog = %config.catalog_path,
        ratings = %config.ratings_path,
        model_dir = %config.model_dir,
        "Starting recommendation service"
    );

    // Fails fast when no trained artifact exists: serving requires one.
    let coordinator = Arc::new(
        Coordinator::start(&config).context("cannot start without a trained model")?,
    );

    let info = coordinator.model_info();
    tracing::info!(
        version = info.version,
        items = info.item_count,
        users = info.user_count,
        ratings = info.rating_count,
        "Serving model"
    );

    let scheduler = Scheduler::spawn(coordinator, &config);

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown();
    tracing::info!("Shutting down");

    Ok(())
}
