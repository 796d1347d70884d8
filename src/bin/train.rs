//! One-shot training tool.
//!
//! Builds a model artifact from the configured source files and saves it at
//! the next version. The serving process refuses to start without at least
//! one artifact, so the first one comes from here; later artifacts are
//! picked up by the running service's 30-second watcher.

use std::time::Instant;

use tracing_subscriber::EnvFilter;

use anirec::services::Coordinator;
use anirec::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let start = Instant::now();

    // Bootstrap path: with an empty store there is nothing to serve yet, so
    // train directly against the store instead of going through a coordinator.
    let version = train_once(&config)?;

    tracing::info!(
        version,
        elapsed_secs = start.elapsed().as_secs(),
        "Training complete; a running service will pick the artifact up"
    );
    Ok(())
}

fn train_once(config: &Config) -> anyhow::Result<u32> {
    use anirec::models::ModelArtifact;
    use anirec::services::{loader, matrix, ArtifactStore};

    if ArtifactStore::new(&config.model_dir)?.latest_version() > 0 {
        // An artifact already exists; the coordinator path keeps the
        // training-exclusivity guard in the loop.
        let coordinator = Coordinator::start(config)?;
        let version = coordinator.train(true)?;
        return Ok(version.unwrap_or(0));
    }

    let store = ArtifactStore::new(&config.model_dir)?;
    let fingerprint = loader::source_fingerprint(
        config.catalog_path.as_ref(),
        config.ratings_path.as_ref(),
    );
    let table = loader::load_fact_table(
        config.catalog_path.as_ref(),
        config.ratings_path.as_ref(),
    )?;
    let build = matrix::build(&table, config.min_co_raters);

    let mut artifact = ModelArtifact {
        version: 0,
        created_at: chrono::Utc::now(),
        source_fingerprint: fingerprint,
        items: table.items,
        ratings: build.ratings,
        correlations: build.correlations,
        stats: build.stats,
        genre_index: Some(build.genre_index),
    };
    store.save(&mut artifact)?;
    Ok(artifact.version)
}
