use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the item catalog CSV (anime_id, name, genre, members)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the rating events CSV (user_id, anime_id, rating)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Directory holding versioned model artifacts
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    /// Minimum number of co-raters for a correlation to be defined
    #[serde(default = "default_min_co_raters")]
    pub min_co_raters: usize,

    /// Minimum rating count for an item to be a recommendation candidate
    #[serde(default = "default_min_ratings")]
    pub min_ratings: u64,

    /// Hour (UTC) of the daily retrain-if-stale check
    #[serde(default = "default_retrain_hour")]
    pub retrain_hour: u32,

    /// Minute of the daily retrain-if-stale check
    #[serde(default = "default_retrain_minute")]
    pub retrain_minute: u32,

    /// Interval in seconds between new-artifact watcher cycles
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
}

fn default_catalog_path() -> String {
    "data/anime.csv".to_string()
}

fn default_ratings_path() -> String {
    "data/cleaned_data.csv".to_string()
}

fn default_model_dir() -> String {
    "model".to_string()
}

fn default_min_co_raters() -> usize {
    100
}

fn default_min_ratings() -> u64 {
    100
}

fn default_retrain_hour() -> u32 {
    2
}

fn default_retrain_minute() -> u32 {
    30
}

fn default_watch_interval_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            ratings_path: default_ratings_path(),
            model_dir: default_model_dir(),
            min_co_raters: default_min_co_raters(),
            min_ratings: default_min_ratings(),
            retrain_hour: default_retrain_hour(),
            retrain_minute: default_retrain_minute(),
            watch_interval_secs: default_watch_interval_secs(),
        }
    }
}
