use std::collections::{BTreeSet, HashMap};

use crate::models::{CorrelationMatrix, ItemId, ItemStats, RatingMatrix};
use crate::services::loader::FactTable;

/// The four structures produced by one training pass. The builder has no
/// side effects; persisting the result is the caller's concern.
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    pub ratings: RatingMatrix,
    pub correlations: CorrelationMatrix,
    pub stats: HashMap<ItemId, ItemStats>,
    pub genre_index: HashMap<ItemId, BTreeSet<String>>,
}

/// Pairwise Pearson accumulator over co-raters of one item pair
#[derive(Debug, Clone, Copy, Default)]
struct PairAccum {
    n: usize,
    sum_a: f64,
    sum_b: f64,
    sum_ab: f64,
    sum_a2: f64,
    sum_b2: f64,
}

impl PairAccum {
    fn push(&mut self, a: f64, b: f64) {
        self.n += 1;
        self.sum_a += a;
        self.sum_b += b;
        self.sum_ab += a * b;
        self.sum_a2 += a * a;
        self.sum_b2 += b * b;
    }

    /// Pearson coefficient over the accumulated co-ratings, or `None` when
    /// either side has zero variance.
    fn pearson(&self) -> Option<f64> {
        let n = self.n as f64;
        let cov = n * self.sum_ab - self.sum_a * self.sum_b;
        let var_a = n * self.sum_a2 - self.sum_a * self.sum_a;
        let var_b = n * self.sum_b2 - self.sum_b * self.sum_b;
        if var_a <= f64::EPSILON || var_b <= f64::EPSILON {
            return None;
        }
        Some((cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0))
    }
}

/// Pivots the fact table into the user-by-item rating matrix and computes
/// the item-by-item Pearson correlation over pairwise-complete observations.
///
/// Pairs with fewer than `min_co_raters` common raters resolve to undefined
/// and are absent from the correlation matrix.
pub fn build(table: &FactTable, min_co_raters: usize) -> MatrixBuild {
    let mut ratings = RatingMatrix::default();
    for event in &table.events {
        ratings.insert(event.user_id, event.item_id, event.score);
    }

    let stats = compute_stats(table);
    let correlations = compute_correlations(&ratings, min_co_raters);

    let genre_index = table
        .items
        .iter()
        .map(|(id, item)| (*id, item.genres.clone()))
        .collect();

    tracing::info!(
        users = ratings.user_count(),
        items = table.items.len(),
        defined_pairs = correlations.defined_pairs(),
        "Matrix build complete"
    );

    MatrixBuild {
        ratings,
        correlations,
        stats,
        genre_index,
    }
}

fn compute_stats(table: &FactTable) -> HashMap<ItemId, ItemStats> {
    let mut sums: HashMap<ItemId, (u64, f64)> = HashMap::new();
    for event in &table.events {
        let entry = sums.entry(event.item_id).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += event.score;
    }

    sums.into_iter()
        .map(|(id, (count, total))| {
            (
                id,
                ItemStats {
                    rating_count: count,
                    mean_rating: total / count as f64,
                },
            )
        })
        .collect()
}

fn compute_correlations(ratings: &RatingMatrix, min_co_raters: usize) -> CorrelationMatrix {
    // One pass over users: every pair of items rated by the same user feeds
    // that pair's accumulator, so each pair sees exactly its co-raters.
    let mut pairs: HashMap<(ItemId, ItemId), PairAccum> = HashMap::new();

    for (_, row) in ratings.users() {
        let mut rated: Vec<(ItemId, f64)> = row.iter().map(|(id, s)| (*id, *s)).collect();
        rated.sort_unstable_by_key(|(id, _)| *id);

        for (i, &(item_a, score_a)) in rated.iter().enumerate() {
            for &(item_b, score_b) in &rated[i + 1..] {
                pairs
                    .entry((item_a, item_b))
                    .or_default()
                    .push(score_a, score_b);
            }
        }
    }

    let mut correlations = CorrelationMatrix::default();
    for ((item_a, item_b), accum) in pairs {
        if accum.n < min_co_raters {
            continue;
        }
        if let Some(coefficient) = accum.pearson() {
            correlations.insert(item_a, item_b, coefficient);
        }
    }

    correlations
}
