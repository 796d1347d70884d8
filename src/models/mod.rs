use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Catalog identifier for an item (anime/media)
pub type ItemId = u32;

/// Identifier for a rating user
pub type UserId = u32;

/// A catalog item. Identity is immutable; the remaining attributes are fixed
/// for the lifetime of one artifact version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub genres: BTreeSet<String>,
    pub popularity_weight: u64,
}

impl Item {
    /// Parses a comma-separated genre string into a set, trimming whitespace
    /// and dropping empty tokens.
    pub fn parse_genres(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One rating event. Consumed during the matrix build; only aggregates
/// survive in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub score: f64,
}

/// Per-item rating aggregates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub rating_count: u64,
    pub mean_rating: f64,
}

/// Sparse user-by-item rating matrix. An absent cell means unrated; no
/// sentinel scores are ever stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingMatrix {
    rows: HashMap<UserId, HashMap<ItemId, f64>>,
}

impl RatingMatrix {
    pub fn insert(&mut self, user_id: UserId, item_id: ItemId, score: f64) {
        self.rows.entry(user_id).or_default().insert(item_id, score);
    }

    pub fn rating(&self, user_id: UserId, item_id: ItemId) -> Option<f64> {
        self.rows.get(&user_id).and_then(|r| r.get(&item_id)).copied()
    }

    pub fn user_row(&self, user_id: UserId) -> Option<&HashMap<ItemId, f64>> {
        self.rows.get(&user_id)
    }

    pub fn users(&self) -> impl Iterator<Item = (&UserId, &HashMap<ItemId, f64>)> {
        self.rows.iter()
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rating_count(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }
}

/// Symmetric item-by-item Pearson correlation matrix. A pair with fewer
/// co-raters than the configured floor is undefined: absent when queried,
/// never stored as zero. Self-pairs are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    rows: HashMap<ItemId, HashMap<ItemId, f64>>,
}

impl CorrelationMatrix {
    /// Stores the coefficient under both orderings of the pair.
    pub fn insert(&mut self, a: ItemId, b: ItemId, coefficient: f64) {
        self.rows.entry(a).or_default().insert(b, coefficient);
        self.rows.entry(b).or_default().insert(a, coefficient);
    }

    /// Returns the coefficient for a pair, or `None` when undefined.
    pub fn get(&self, a: ItemId, b: ItemId) -> Option<f64> {
        self.rows.get(&a).and_then(|r| r.get(&b)).copied()
    }

    /// The defined correlations of one item against all others.
    pub fn row(&self, item_id: ItemId) -> Option<&HashMap<ItemId, f64>> {
        self.rows.get(&item_id)
    }

    pub fn defined_pairs(&self) -> usize {
        self.rows.values().map(HashMap::len).sum::<usize>() / 2
    }
}

/// One immutable, versioned snapshot of the trained model.
///
/// An artifact is fully built before it becomes visible; partially built
/// artifacts are never persisted or served. The catalog is cached inside the
/// artifact so name/genre metadata lookups need no source-file access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    /// Concatenated modification timestamps of the two source files at build
    /// time; `None` when a source file could not be stat'ed.
    pub source_fingerprint: Option<String>,
    pub items: HashMap<ItemId, Item>,
    pub ratings: RatingMatrix,
    pub correlations: CorrelationMatrix,
    pub stats: HashMap<ItemId, ItemStats>,
    /// Absent in artifacts written before genre scoring existed; derived
    /// from the cached catalog on load.
    pub genre_index: Option<HashMap<ItemId, BTreeSet<String>>>,
}

impl ModelArtifact {
    /// Backfills the genre index from the cached catalog when an older
    /// artifact was saved without one.
    pub fn ensure_genre_index(&mut self) {
        if self.genre_index.is_none() {
            self.genre_index = Some(
                self.items
                    .iter()
                    .map(|(id, item)| (*id, item.genres.clone()))
                    .collect(),
            );
        }
    }

    pub fn genres_of(&self, item_id: ItemId) -> Option<&BTreeSet<String>> {
        self.genre_index
            .as_ref()
            .and_then(|idx| idx.get(&item_id))
            .or_else(|| self.items.get(&item_id).map(|i| &i.genres))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn user_count(&self) -> usize {
        self.ratings.user_count()
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.rating_count()
    }
}

/// The currently active artifact plus the instant it was made current.
#[derive(Debug)]
pub struct ServedSnapshot {
    pub artifact: ModelArtifact,
    pub loaded_at: DateTime<Utc>,
}

/// Introspection data for the web-layer collaborator
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub version: u32,
    pub loaded_at: DateTime<Utc>,
    pub item_count: usize,
    pub user_count: usize,
    pub rating_count: usize,
    pub data_changed: bool,
    pub training_in_progress: bool,
}

/// One artifact file on disk
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: u32,
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
}

/// One hit from a catalog name search
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub name: String,
    pub genre: String,
    pub match_type: MatchType,
}

/// A single scored recommendation returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub genre: String,
    /// Raw Pearson correlation against the seed (or the normalized aggregate
    /// for profile queries)
    pub correlation: f64,
    pub genre_similarity: f64,
    /// Blended display similarity: 0.6 * correlation + 0.4 * genre similarity
    pub hybrid_similarity: f64,
    pub mean_rating: f64,
}

/// A recommendation from a multi-item taste profile query
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRecommendation {
    pub name: String,
    pub genre: String,
    /// Aggregate correlation normalized by the sum of the profile's ratings
    pub correlation: f64,
    pub mean_rating: f64,
}

/// Name and genre of one catalog item, for listings
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub name: String,
    pub genre: String,
}
