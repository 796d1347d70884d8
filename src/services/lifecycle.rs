use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Utc;

use crate::config::Config;
use crate::error::{RecError, RecResult};
use crate::models::{
    ItemSummary, ModelArtifact, ModelInfo, ProfileRecommendation, Recommendation, SearchMatch,
    ServedSnapshot, VersionInfo,
};
use crate::services::loader::{self, load_fact_table};
use crate::services::matrix;
use crate::services::recommender;
use crate::services::store::ArtifactStore;

/// Single-writer exclusivity for training runs: the flag is set by a
/// successful `try_acquire` and cleared when the guard drops, including on
/// failure paths.
pub struct TrainingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> TrainingGuard<'a> {
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for TrainingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Owns the currently served model snapshot and the train/reload lifecycle.
///
/// Serving reads go through `snapshot()`, a single atomic load: a reload
/// replaces the reference in one swap, so concurrent readers see either the
/// fully-old or the fully-new artifact, never a mix.
#[derive(Debug)]
pub struct Coordinator {
    store: ArtifactStore,
    catalog_path: PathBuf,
    ratings_path: PathBuf,
    min_co_raters: usize,
    min_ratings: u64,
    current: ArcSwap<ServedSnapshot>,
    training: AtomicBool,
}

impl Coordinator {
    /// Loads the highest artifact version and starts serving it. Fails fast
    /// with `NoModel` when the store is empty: the process cannot serve
    /// without at least one trained artifact.
    pub fn start(config: &Config) -> RecResult<Self> {
        let store = ArtifactStore::new(&config.model_dir)?;

        let latest = store.latest_version();
        if latest == 0 {
            return Err(RecError::NoModel(config.model_dir.clone()));
        }

        let artifact = store.load(latest)?;
        tracing::info!(
            version = latest,
            items = artifact.item_count(),
            users = artifact.user_count(),
            ratings = artifact.rating_count(),
            "Model loaded"
        );

        Ok(Self {
            store,
            catalog_path: PathBuf::from(&config.catalog_path),
            ratings_path: PathBuf::from(&config.ratings_path),
            min_co_raters: config.min_co_raters,
            min_ratings: config.min_ratings,
            current: ArcSwap::from_pointee(ServedSnapshot {
                artifact,
                loaded_at: Utc::now(),
            }),
            training: AtomicBool::new(false),
        })
    }

    /// The served snapshot. Never blocks; callers keep the `Arc` for the
    /// duration of one query so all structures come from one version.
    pub fn snapshot(&self) -> Arc<ServedSnapshot> {
        self.current.load_full()
    }

    pub fn current_version(&self) -> u32 {
        self.current.load().artifact.version
    }

    pub fn training_in_progress(&self) -> bool {
        self.training.load(Ordering::SeqCst)
    }

    /// Whether the source files changed since the served artifact was built.
    /// Absence of either fingerprint reports not-stale: staleness is only
    /// ever reported positively.
    pub fn has_data_changed(&self) -> bool {
        let snapshot = self.current.load();
        let Some(recorded) = snapshot.artifact.source_fingerprint.as_deref() else {
            return false;
        };
        let Some(live) = loader::source_fingerprint(&self.catalog_path, &self.ratings_path)
        else {
            return false;
        };
        recorded != live
    }

    /// Builds a new artifact from the live source files and, when `save` is
    /// set, persists it at the next version.
    ///
    /// Rejected with `TrainingInProgress` when another run is active. The
    /// run operates on freshly built local structures only; the served
    /// snapshot is untouched until an explicit `reload()`.
    pub fn train(&self, save: bool) -> RecResult<Option<u32>> {
        let _guard =
            TrainingGuard::try_acquire(&self.training).ok_or(RecError::TrainingInProgress)?;

        tracing::info!(save, "Training run started");
        let fingerprint =
            loader::source_fingerprint(&self.catalog_path, &self.ratings_path);

        let table = load_fact_table(&self.catalog_path, &self.ratings_path)?;
        let build = matrix::build(&table, self.min_co_raters);

        let mut artifact = ModelArtifact {
            version: 0,
            created_at: Utc::now(),
            source_fingerprint: fingerprint,
            items: table.items,
            ratings: build.ratings,
            correlations: build.correlations,
            stats: build.stats,
            genre_index: Some(build.genre_index),
        };

        if !save {
            tracing::info!("Training run finished (not saved)");
            return Ok(None);
        }

        self.store.save(&mut artifact)?;
        tracing::info!(version = artifact.version, "Training run finished");
        Ok(Some(artifact.version))
    }

    /// Loads and atomically swaps in the latest artifact when it is newer
    /// than the served one. Returns `false` (a no-op, not an error) when
    /// nothing newer exists or loading fails; the previous snapshot stays
    /// authoritative on any failure.
    pub fn reload(&self) -> bool {
        let latest = self.store.latest_version();
        let serving = self.current_version();
        if latest <= serving {
            return false;
        }

        match self.store.load(latest) {
            Ok(artifact) => {
                let swapped = self.install(artifact);
                if swapped {
                    tracing::info!(from = serving, to = latest, "Model hot-swapped");
                }
                swapped
            }
            Err(e) => {
                tracing::warn!(version = latest, error = %e, "Reload failed, keeping current model");
                false
            }
        }
    }

    /// Swaps the snapshot in only while the loaded artifact is still newer
    /// than whatever is being served; a reload that lost a race against a
    /// faster train-and-reload cycle never moves the served version
    /// backwards.
    fn install(&self, artifact: ModelArtifact) -> bool {
        let version = artifact.version;
        let incoming = Arc::new(ServedSnapshot {
            artifact,
            loaded_at: Utc::now(),
        });

        let mut swapped = false;
        self.current.rcu(|current| {
            if current.artifact.version >= version {
                swapped = false;
                Arc::clone(current)
            } else {
                swapped = true;
                Arc::clone(&incoming)
            }
        });
        swapped
    }

    pub fn model_info(&self) -> ModelInfo {
        let snapshot = self.current.load();
        ModelInfo {
            version: snapshot.artifact.version,
            loaded_at: snapshot.loaded_at,
            item_count: snapshot.artifact.item_count(),
            user_count: snapshot.artifact.user_count(),
            rating_count: snapshot.artifact.rating_count(),
            data_changed: self.has_data_changed(),
            training_in_progress: self.training_in_progress(),
        }
    }

    pub fn list_versions(&self) -> RecResult<Vec<VersionInfo>> {
        self.store.list_versions()
    }

    pub fn recommendations(
        &self,
        item_name: &str,
        affinity: f64,
        count: usize,
    ) -> RecResult<(Vec<Recommendation>, String)> {
        let snapshot = self.snapshot();
        recommender::recommend(&snapshot.artifact, item_name, affinity, count, self.min_ratings)
    }

    pub fn profile_recommendations(
        &self,
        profile: &HashMap<String, f64>,
        count: usize,
    ) -> Vec<ProfileRecommendation> {
        let snapshot = self.snapshot();
        recommender::recommend_for_profile(&snapshot.artifact, profile, count)
    }

    pub fn search_exact(&self, query: &str) -> Vec<SearchMatch> {
        let snapshot = self.snapshot();
        recommender::search_exact(&snapshot.artifact, query)
    }

    pub fn all_items(&self) -> Vec<ItemSummary> {
        let snapshot = self.snapshot();
        recommender::all_items(&snapshot.artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrelationMatrix, Item, RatingMatrix};

    fn artifact_with_version(version: u32) -> ModelArtifact {
        let mut items = HashMap::new();
        items.insert(
            1,
            Item {
                id: 1,
                name: "Cowboy Bebop".to_string(),
                genres: Item::parse_genres("Action, Sci-Fi"),
                popularity_weight: 1,
            },
        );
        ModelArtifact {
            version,
            created_at: Utc::now(),
            source_fingerprint: None,
            items,
            ratings: RatingMatrix::default(),
            correlations: CorrelationMatrix::default(),
            stats: HashMap::new(),
            genre_index: None,
        }
    }

    fn coordinator_serving(version: u32) -> Coordinator {
        let dir = tempfile::tempdir().unwrap();
        Coordinator {
            store: ArtifactStore::new(dir.path()).unwrap(),
            catalog_path: PathBuf::from("unused.csv"),
            ratings_path: PathBuf::from("unused.csv"),
            min_co_raters: 2,
            min_ratings: 1,
            current: ArcSwap::from_pointee(ServedSnapshot {
                artifact: artifact_with_version(version),
                loaded_at: Utc::now(),
            }),
            training: AtomicBool::new(false),
        }
    }

    #[test]
    fn test_install_never_moves_served_version_backwards() {
        let coordinator = coordinator_serving(3);

        // A reload that raced a faster train-and-reload cycle arrives with
        // an older or equal artifact: the served version must not change.
        assert!(!coordinator.install(artifact_with_version(2)));
        assert!(!coordinator.install(artifact_with_version(3)));
        assert_eq!(coordinator.current_version(), 3);

        assert!(coordinator.install(artifact_with_version(4)));
        assert_eq!(coordinator.current_version(), 4);
    }

    #[test]
    fn test_training_guard_mutual_exclusion() {
        let flag = AtomicBool::new(false);

        let first = TrainingGuard::try_acquire(&flag);
        assert!(first.is_some());
        assert!(TrainingGuard::try_acquire(&flag).is_none());

        drop(first);
        assert!(TrainingGuard::try_acquire(&flag).is_some());
    }

    #[test]
    fn test_training_guard_clears_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = TrainingGuard::try_acquire(&flag).unwrap();
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
