use std::collections::HashMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::error::{RecError, RecResult};
use crate::models::{Item, ItemId, RatingEvent};

/// The joined in-memory fact table produced from the two source files
#[derive(Debug, Clone)]
pub struct FactTable {
    pub items: HashMap<ItemId, Item>,
    pub events: Vec<RatingEvent>,
}

/// Reads the item catalog and rating events and inner-joins them on item id.
///
/// Malformed rows are skipped; a rating for an item id absent from the
/// catalog is dropped silently. Fails with `EmptyDataset` when no usable
/// rating rows remain.
pub fn load_fact_table(catalog_path: &Path, ratings_path: &Path) -> RecResult<FactTable> {
    let items = load_catalog(catalog_path)?;
    let events = load_ratings(ratings_path, &items)?;

    if events.is_empty() {
        return Err(RecError::EmptyDataset);
    }

    tracing::info!(
        items = items.len(),
        ratings = events.len(),
        "Fact table loaded"
    );

    Ok(FactTable { items, events })
}

fn load_catalog(path: &Path) -> RecResult<HashMap<ItemId, Item>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = resolve_columns(
        reader.headers()?,
        &["anime_id", "name", "genre", "members"],
        path,
    )?;
    let (id_col, name_col, genre_col, members_col) =
        (columns[0], columns[1], columns[2], columns[3]);

    let mut items = HashMap::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        let parsed = record.get(id_col).and_then(|raw| raw.parse::<ItemId>().ok());
        let Some(id) = parsed else {
            skipped += 1;
            continue;
        };
        let Some(name) = record.get(name_col).map(str::trim).filter(|n| !n.is_empty())
        else {
            skipped += 1;
            continue;
        };

        let genres = Item::parse_genres(record.get(genre_col).unwrap_or(""));
        let popularity_weight = record
            .get(members_col)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);

        items.insert(
            id,
            Item {
                id,
                name: name.to_string(),
                genres,
                popularity_weight,
            },
        );
    }

    if skipped > 0 {
        tracing::debug!(skipped, path = %path.display(), "Skipped malformed catalog rows");
    }

    Ok(items)
}

fn load_ratings(
    path: &Path,
    items: &HashMap<ItemId, Item>,
) -> RecResult<Vec<RatingEvent>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = resolve_columns(reader.headers()?, &["user_id", "anime_id", "rating"], path)?;
    let (user_col, item_col, score_col) = (columns[0], columns[1], columns[2]);

    let mut events = Vec::new();
    let mut skipped = 0usize;
    let mut unmatched = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        let user_id = record.get(user_col).and_then(|raw| raw.parse::<u32>().ok());
        let item_id = record
            .get(item_col)
            .and_then(|raw| raw.parse::<ItemId>().ok());
        let score = record
            .get(score_col)
            .and_then(|raw| raw.trim().parse::<f64>().ok());

        let (Some(user_id), Some(item_id), Some(score)) = (user_id, item_id, score) else {
            skipped += 1;
            continue;
        };

        // Inner join against the catalog: unknown item ids are excluded.
        if !items.contains_key(&item_id) {
            unmatched += 1;
            continue;
        }

        events.push(RatingEvent {
            user_id,
            item_id,
            score,
        });
    }

    if skipped > 0 || unmatched > 0 {
        tracing::debug!(
            skipped,
            unmatched,
            path = %path.display(),
            "Dropped rating rows during load"
        );
    }

    Ok(events)
}

/// Maps required column names to their indices, failing with `Schema` when
/// any is absent.
fn resolve_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    path: &Path,
) -> RecResult<Vec<usize>> {
    required
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim() == *name)
                .ok_or_else(|| {
                    RecError::Schema(format!(
                        "missing required column '{}' in {}",
                        name,
                        path.display()
                    ))
                })
        })
        .collect()
}

/// Fingerprint of the two source files: their modification timestamps,
/// concatenated. `None` when either file cannot be stat'ed, so staleness is
/// only ever reported positively.
pub fn source_fingerprint(catalog_path: &Path, ratings_path: &Path) -> Option<String> {
    let catalog = file_mtime(catalog_path)?;
    let ratings = file_mtime(ratings_path)?;
    Some(format!("{}_{}", catalog, ratings))
}

fn file_mtime(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(format!(
        "{}.{:09}",
        since_epoch.as_secs(),
        since_epoch.subsec_nanos()
    ))
}
