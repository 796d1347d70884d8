use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::RecError;
use crate::services::lifecycle::Coordinator;

/// The two periodic jobs driving the lifecycle coordinator: a daily
/// retrain-if-stale check and a high-frequency new-artifact watcher.
///
/// Each job runs in its own tokio task and swallows per-cycle errors after
/// logging them, so one bad cycle never halts future cycles.
pub struct Scheduler {
    daily: JoinHandle<()>,
    watcher: JoinHandle<()>,
}

impl Scheduler {
    pub fn spawn(coordinator: Arc<Coordinator>, config: &Config) -> Self {
        tracing::info!(
            retrain_at = %format!("{:02}:{:02} UTC", config.retrain_hour, config.retrain_minute),
            watch_interval_secs = config.watch_interval_secs,
            "Scheduler started"
        );

        let daily = tokio::spawn(daily_loop(
            coordinator.clone(),
            config.retrain_hour,
            config.retrain_minute,
        ));
        let watcher = tokio::spawn(watcher_loop(
            coordinator,
            Duration::from_secs(config.watch_interval_secs),
        ));

        Self { daily, watcher }
    }

    pub fn shutdown(&self) {
        self.daily.abort();
        self.watcher.abort();
        tracing::info!("Scheduler stopped");
    }
}

/// Fires once per day at the configured wall-clock time; when the source
/// data is stale and no run is active, training is dispatched to a blocking
/// worker so this loop returns to sleep immediately.
async fn daily_loop(coordinator: Arc<Coordinator>, hour: u32, minute: u32) {
    loop {
        tokio::time::sleep(until_next_occurrence(hour, minute)).await;

        tracing::info!("Daily staleness check");
        if coordinator.training_in_progress() {
            tracing::info!("Training already in progress, skipping daily check");
            continue;
        }
        if !coordinator.has_data_changed() {
            tracing::info!("Source data unchanged, no retrain needed");
            continue;
        }

        tracing::info!("Source data changed, starting background training");
        let coordinator = coordinator.clone();
        tokio::task::spawn_blocking(move || run_training(&coordinator));
    }
}

/// One guarded background training run followed by a reload of the result.
fn run_training(coordinator: &Coordinator) {
    match coordinator.train(true) {
        Ok(Some(version)) => {
            tracing::info!(version, "Background training complete");
            if !coordinator.reload() {
                tracing::warn!(version, "Trained artifact not reloaded");
            }
        }
        Ok(None) => {}
        Err(RecError::TrainingInProgress) => {
            tracing::info!("Lost the training race, another run is active");
        }
        Err(e) => {
            // Serving continues on the previous snapshot.
            tracing::warn!(error = %e, "Background training failed");
        }
    }
}

/// Every `interval`, swaps in any newer artifact that appeared on disk
/// (e.g. from a manual training run), unless a training run is active.
async fn watcher_loop(coordinator: Arc<Coordinator>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if coordinator.training_in_progress() {
            continue;
        }

        let coordinator = coordinator.clone();
        let reloaded = tokio::task::spawn_blocking(move || coordinator.reload()).await;
        match reloaded {
            Ok(true) => tracing::info!("Watcher picked up a new artifact"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Watcher reload task failed"),
        }
    }
}

/// Time until the next occurrence of `hour:minute` UTC. Out-of-range
/// configuration values are clamped to a valid wall-clock time.
fn until_next_occurrence(hour: u32, minute: u32) -> Duration {
    let now = Utc::now().naive_utc();
    let at = now
        .date()
        .and_hms_opt(hour.min(23), minute.min(59), 0)
        .unwrap_or(now);
    let target = if at > now {
        at
    } else {
        at + chrono::Duration::days(1)
    };
    (target - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_occurrence_within_a_day() {
        let wait = until_next_occurrence(2, 30);
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_out_of_range_time_is_clamped() {
        let wait = until_next_occurrence(99, 99);
        assert!(wait <= Duration::from_secs(24 * 60 * 60));
    }
}
