use std::collections::{BTreeSet, HashMap};

use crate::error::{RecError, RecResult};
use crate::models::{
    ItemId, ItemSummary, MatchType, ModelArtifact, ProfileRecommendation, Recommendation,
    SearchMatch,
};

/// Suffix tokens stripped before the same-series comparison. Multi-word
/// phrases come first so their words are not consumed individually.
const SERIES_SUFFIX_TOKENS: &[&str] = &[
    "movie", "ova", "ona", "special", "tv", "recap", "specials", "prologue", "epilogue",
];
const SERIES_SUFFIX_PHRASES: &[&str] = &["picture drama"];

/// Admission filter and blend weights for one affinity band.
///
/// Low-affinity bands carry a negative genre weight: the caller disliked the
/// seed, so dissimilar genres are rewarded.
#[derive(Debug, Clone, Copy)]
struct ScoringRegime {
    corr_floor: Option<f64>,
    corr_ceiling: Option<f64>,
    genre_floor: Option<f64>,
    genre_ceiling: Option<f64>,
    corr_weight: f64,
    genre_weight: f64,
    mean_weight: f64,
    popularity_weight: f64,
}

impl ScoringRegime {
    fn for_affinity(affinity: f64) -> Self {
        if affinity >= 4.5 {
            Self {
                corr_floor: Some(0.5),
                corr_ceiling: None,
                genre_floor: Some(0.3),
                genre_ceiling: None,
                corr_weight: 0.6,
                genre_weight: 0.3,
                mean_weight: 0.1,
                popularity_weight: 0.0,
            }
        } else if affinity >= 4.0 {
            Self {
                corr_floor: Some(0.4),
                corr_ceiling: None,
                genre_floor: Some(0.2),
                genre_ceiling: None,
                corr_weight: 0.55,
                genre_weight: 0.3,
                mean_weight: 0.15,
                popularity_weight: 0.0,
            }
        } else if affinity >= 3.5 {
            Self {
                corr_floor: Some(0.2),
                corr_ceiling: None,
                genre_floor: Some(0.15),
                genre_ceiling: None,
                corr_weight: 0.4,
                genre_weight: 0.3,
                mean_weight: 0.3,
                popularity_weight: 0.0,
            }
        } else if affinity >= 3.0 {
            Self {
                corr_floor: Some(0.1),
                corr_ceiling: Some(0.6),
                genre_floor: None,
                genre_ceiling: None,
                corr_weight: 0.3,
                genre_weight: 0.3,
                mean_weight: 0.4,
                popularity_weight: 0.0,
            }
        } else if affinity >= 2.0 {
            Self {
                corr_floor: None,
                corr_ceiling: Some(0.2),
                genre_floor: None,
                genre_ceiling: Some(0.4),
                corr_weight: 0.0,
                genre_weight: -0.3,
                mean_weight: 0.5,
                popularity_weight: 0.2,
            }
        } else {
            Self {
                corr_floor: None,
                corr_ceiling: Some(0.15),
                genre_floor: None,
                genre_ceiling: Some(0.3),
                corr_weight: 0.0,
                genre_weight: -0.4,
                mean_weight: 0.5,
                popularity_weight: 0.1,
            }
        }
    }

    fn admits(&self, correlation: f64, genre_similarity: f64) -> bool {
        if let Some(floor) = self.corr_floor {
            if correlation <= floor {
                return false;
            }
        }
        if let Some(ceiling) = self.corr_ceiling {
            if correlation >= ceiling {
                return false;
            }
        }
        if let Some(floor) = self.genre_floor {
            if genre_similarity <= floor {
                return false;
            }
        }
        if let Some(ceiling) = self.genre_ceiling {
            if genre_similarity >= ceiling {
                return false;
            }
        }
        true
    }

    fn score(
        &self,
        correlation: f64,
        genre_similarity: f64,
        mean_rating: f64,
        normalized_popularity: f64,
    ) -> f64 {
        self.corr_weight * correlation
            + self.genre_weight * genre_similarity
            // Source ratings live on a 0-10 scale.
            + self.mean_weight * (mean_rating / 10.0)
            + self.popularity_weight * normalized_popularity
    }
}

/// Jaccard similarity between two genre sets, 0 when either is empty.
pub fn genre_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

/// Lowercases a title and strips the known release-variant suffix tokens.
fn clean_name(name: &str) -> String {
    let mut lower = name.to_lowercase();
    for phrase in SERIES_SUFFIX_PHRASES {
        lower = lower.replace(phrase, " ");
    }
    lower
        .split_whitespace()
        .filter(|word| !SERIES_SUFFIX_TOKENS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The franchise "base name": everything before the first ':' or '-'.
fn base_name(cleaned: &str) -> &str {
    cleaned
        .split([':', '-'])
        .next()
        .unwrap_or(cleaned)
        .trim()
}

/// Best-effort same-franchise detection: after suffix stripping, one title's
/// base name (when longer than 3 characters) appearing inside the other's
/// cleaned name marks the pair as variants of the same series. A text
/// heuristic, not a guarantee.
pub fn is_series_variant(seed_name: &str, candidate_name: &str) -> bool {
    let seed_clean = clean_name(seed_name);
    let candidate_clean = clean_name(candidate_name);
    let seed_base = base_name(&seed_clean);
    let candidate_base = base_name(&candidate_clean);

    (seed_base.len() > 3 && candidate_clean.contains(seed_base))
        || (candidate_base.len() > 3 && seed_clean.contains(candidate_base))
}

/// Resolves a seed name to a catalog id: exact case-insensitive match wins,
/// otherwise a unique case-insensitive substring match. Multiple substring
/// candidates require the caller to disambiguate first.
pub fn resolve_seed(artifact: &ModelArtifact, name: &str) -> RecResult<ItemId> {
    let query = name.to_lowercase();

    let mut exact: Option<ItemId> = None;
    let mut partial: Vec<(ItemId, String)> = Vec::new();

    for item in artifact.items.values() {
        let lower = item.name.to_lowercase();
        if lower == query {
            // Duplicate catalog names resolve to the lowest id.
            exact = Some(exact.map_or(item.id, |prev| prev.min(item.id)));
        } else if lower.contains(&query) {
            partial.push((item.id, item.name.clone()));
        }
    }

    if let Some(id) = exact {
        return Ok(id);
    }

    match partial.len() {
        0 => Err(RecError::ItemNotFound(name.to_string())),
        1 => Ok(partial[0].0),
        _ => {
            partial.sort_by(|a, b| a.1.cmp(&b.1));
            Err(RecError::AmbiguousItem(
                partial.into_iter().map(|(_, n)| n).collect(),
            ))
        }
    }
}

/// A lenient variant for profile queries: ambiguity falls back to the first
/// substring match instead of failing the whole profile.
fn resolve_seed_lenient(artifact: &ModelArtifact, name: &str) -> Option<ItemId> {
    match resolve_seed(artifact, name) {
        Ok(id) => Some(id),
        Err(RecError::AmbiguousItem(candidates)) => {
            let first = candidates.first()?;
            artifact
                .items
                .values()
                .filter(|item| item.name == *first)
                .map(|item| item.id)
                .min()
        }
        Err(_) => None,
    }
}

/// Produces the hybrid-scored ranked candidate list for one seed item.
///
/// Returns the recommendations together with the resolved seed name.
pub fn recommend(
    artifact: &ModelArtifact,
    seed_name: &str,
    affinity: f64,
    count: usize,
    min_ratings: u64,
) -> RecResult<(Vec<Recommendation>, String)> {
    let seed_id = resolve_seed(artifact, seed_name)?;
    let resolved_name = artifact.items[&seed_id].name.clone();

    let empty = BTreeSet::new();
    let seed_genres = artifact.genres_of(seed_id).unwrap_or(&empty).clone();
    let regime = ScoringRegime::for_affinity(affinity);

    // Correlation row only holds defined pairs; undefined ones never enter.
    let Some(row) = artifact.correlations.row(seed_id) else {
        return Ok((Vec::new(), resolved_name));
    };

    struct Candidate {
        id: ItemId,
        correlation: f64,
        genre_sim: f64,
        mean_rating: f64,
        popularity: u64,
    }

    let mut admitted = Vec::new();
    for (&candidate_id, &correlation) in row {
        if candidate_id == seed_id {
            continue;
        }
        let Some(item) = artifact.items.get(&candidate_id) else {
            continue;
        };
        let Some(stats) = artifact.stats.get(&candidate_id) else {
            continue;
        };
        // Popularity floor: too few raters makes the pair unreliable.
        if stats.rating_count < min_ratings {
            continue;
        }
        if is_series_variant(&resolved_name, &item.name) {
            continue;
        }

        let candidate_genres = artifact.genres_of(candidate_id).unwrap_or(&empty);
        let genre_sim = genre_similarity(&seed_genres, candidate_genres);
        if !regime.admits(correlation, genre_sim) {
            continue;
        }

        admitted.push(Candidate {
            id: candidate_id,
            correlation,
            genre_sim,
            mean_rating: stats.mean_rating,
            popularity: item.popularity_weight,
        });
    }

    let max_popularity = admitted
        .iter()
        .map(|c| c.popularity)
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut scored: Vec<(f64, Candidate)> = admitted
        .into_iter()
        .map(|candidate| {
            let score = regime.score(
                candidate.correlation,
                candidate.genre_sim,
                candidate.mean_rating,
                candidate.popularity as f64 / max_popularity,
            );
            (score, candidate)
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let recommendations = scored
        .into_iter()
        .take(count)
        .map(|(_, candidate)| {
            let item = &artifact.items[&candidate.id];
            Recommendation {
                name: item.name.clone(),
                genre: join_genres(&item.genres),
                correlation: candidate.correlation,
                genre_similarity: candidate.genre_sim,
                hybrid_similarity: 0.6 * candidate.correlation + 0.4 * candidate.genre_sim,
                mean_rating: candidate.mean_rating,
            }
        })
        .collect();

    Ok((recommendations, resolved_name))
}

/// Multi-item taste-profile query: each seed's correlation vector is scaled
/// by an affinity-dependent multiplier and summed across seeds; items the
/// caller already rated are dropped.
pub fn recommend_for_profile(
    artifact: &ModelArtifact,
    profile: &HashMap<String, f64>,
    count: usize,
) -> Vec<ProfileRecommendation> {
    let mut aggregate: HashMap<ItemId, f64> = HashMap::new();
    let mut seed_ids: Vec<ItemId> = Vec::new();

    for (name, &rating) in profile {
        let Some(seed_id) = resolve_seed_lenient(artifact, name) else {
            tracing::warn!(name = %name, "Profile item not found, skipping");
            continue;
        };
        seed_ids.push(seed_id);

        let Some(row) = artifact.correlations.row(seed_id) else {
            continue;
        };

        for (&candidate_id, &correlation) in row {
            let contribution = if rating >= 4.0 {
                // Liked: amplify similar items.
                correlation * rating
            } else if rating <= 2.0 {
                // Disliked: invert, stronger the lower the rating.
                -correlation * (6.0 - rating)
            } else {
                // Neutral: dampen.
                correlation * rating * 0.5
            };
            *aggregate.entry(candidate_id).or_insert(0.0) += contribution;
        }
    }

    for seed_id in &seed_ids {
        aggregate.remove(seed_id);
    }

    let rating_total: f64 = profile.values().sum();
    let normalizer = if rating_total.abs() < f64::EPSILON {
        1.0
    } else {
        rating_total
    };

    let mut ranked: Vec<(ItemId, f64)> = aggregate.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(count)
        .filter_map(|(id, score)| {
            let item = artifact.items.get(&id)?;
            Some(ProfileRecommendation {
                name: item.name.clone(),
                genre: join_genres(&item.genres),
                correlation: score / normalizer,
                mean_rating: artifact
                    .stats
                    .get(&id)
                    .map(|s| s.mean_rating)
                    .unwrap_or(0.0),
            })
        })
        .collect()
}

/// Catalog name search: an exact (case-insensitive) hit short-circuits with
/// a single result, otherwise every substring match is returned.
pub fn search_exact(artifact: &ModelArtifact, query: &str) -> Vec<SearchMatch> {
    let query_lower = query.to_lowercase();
    let mut matches = Vec::new();

    for item in artifact.items.values() {
        let lower = item.name.to_lowercase();
        if lower == query_lower {
            return vec![SearchMatch {
                name: item.name.clone(),
                genre: join_genres(&item.genres),
                match_type: MatchType::Exact,
            }];
        }
        if lower.contains(&query_lower) {
            matches.push(SearchMatch {
                name: item.name.clone(),
                genre: join_genres(&item.genres),
                match_type: MatchType::Partial,
            });
        }
    }

    matches.sort_by(|a, b| a.name.cmp(&b.name));
    matches
}

/// All catalog items, sorted by name.
pub fn all_items(artifact: &ModelArtifact) -> Vec<ItemSummary> {
    let mut items: Vec<ItemSummary> = artifact
        .items
        .values()
        .map(|item| ItemSummary {
            name: item.name.clone(),
            genre: join_genres(&item.genres),
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}

fn join_genres(genres: &BTreeSet<String>) -> String {
    genres.iter().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrelationMatrix, Item, ItemStats, RatingMatrix};
    use chrono::Utc;

    fn artifact(
        items: Vec<(ItemId, &str, &str, u64)>,
        correlations: Vec<(ItemId, ItemId, f64)>,
        stats: Vec<(ItemId, u64, f64)>,
    ) -> ModelArtifact {
        let items: HashMap<ItemId, Item> = items
            .into_iter()
            .map(|(id, name, genres, popularity_weight)| {
                (
                    id,
                    Item {
                        id,
                        name: name.to_string(),
                        genres: Item::parse_genres(genres),
                        popularity_weight,
                    },
                )
            })
            .collect();

        let mut matrix = CorrelationMatrix::default();
        for (a, b, c) in correlations {
            matrix.insert(a, b, c);
        }

        let mut artifact = ModelArtifact {
            version: 1,
            created_at: Utc::now(),
            source_fingerprint: None,
            items,
            ratings: RatingMatrix::default(),
            correlations: matrix,
            stats: stats
                .into_iter()
                .map(|(id, rating_count, mean_rating)| {
                    (
                        id,
                        ItemStats {
                            rating_count,
                            mean_rating,
                        },
                    )
                })
                .collect(),
            genre_index: None,
        };
        artifact.ensure_genre_index();
        artifact
    }

    #[test]
    fn test_genre_similarity_empty_set_is_zero() {
        let a = Item::parse_genres("Action");
        let empty = BTreeSet::new();
        assert_eq!(genre_similarity(&a, &empty), 0.0);
        assert_eq!(genre_similarity(&empty, &a), 0.0);
    }

    #[test]
    fn test_genre_similarity_jaccard() {
        let a = Item::parse_genres("X, Y");
        let b = Item::parse_genres("X, Z");
        let sim = genre_similarity(&a, &b);
        assert!((sim - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_variant_naruto_movie() {
        assert!(is_series_variant("Naruto", "Naruto Movie 1"));
        assert!(is_series_variant("Naruto", "Naruto: Shippuuden"));
        assert!(is_series_variant("Fullmetal Alchemist", "Fullmetal Alchemist OVA"));
        assert!(!is_series_variant("Naruto", "Bleach"));
    }

    #[test]
    fn test_series_variant_short_base_names_pass() {
        // Base names of three characters or fewer never trigger exclusion.
        assert!(!is_series_variant("A", "AB"));
        assert!(!is_series_variant("Air", "Air Movie Gear"));
    }

    #[test]
    fn test_resolve_seed_exact_beats_substring() {
        let art = artifact(
            vec![(1, "Monster", "Drama", 10), (2, "Monster Musume", "Comedy", 10)],
            vec![],
            vec![],
        );
        assert_eq!(resolve_seed(&art, "monster").unwrap(), 1);
    }

    #[test]
    fn test_resolve_seed_ambiguous() {
        let art = artifact(
            vec![(1, "Gundam Wing", "Mecha", 10), (2, "Gundam Seed", "Mecha", 10)],
            vec![],
            vec![],
        );
        match resolve_seed(&art, "gundam") {
            Err(RecError::AmbiguousItem(candidates)) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_seed_not_found() {
        let art = artifact(vec![(1, "Monster", "Drama", 10)], vec![], vec![]);
        assert!(matches!(
            resolve_seed(&art, "zzz"),
            Err(RecError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_undefined_correlation_never_recommended() {
        // corr(A,B) defined, corr(A,C) undefined: C can never surface.
        let art = artifact(
            vec![
                (1, "A", "X, Y", 100),
                (2, "B", "X, Z", 100),
                (3, "C", "Y", 100),
            ],
            vec![(1, 2, 0.6)],
            vec![(1, 500, 8.0), (2, 500, 8.0), (3, 500, 8.0)],
        );

        let (recs, _) = recommend(&art, "A", 4.5, 10, 100).unwrap();
        assert!(recs.iter().all(|r| r.name != "C"));
    }

    #[test]
    fn test_high_affinity_scenario() {
        // genre_sim(A,B) = 1/3 > 0.3 and corr 0.6 > 0.5, so B is admitted.
        let art = artifact(
            vec![
                (1, "A", "X, Y", 100),
                (2, "B", "X, Z", 100),
                (3, "C", "Y", 100),
            ],
            vec![(1, 2, 0.6)],
            vec![(1, 500, 8.0), (2, 500, 8.0), (3, 500, 8.0)],
        );

        let (recs, resolved) = recommend(&art, "A", 4.5, 1, 100).unwrap();
        assert_eq!(resolved, "A");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "B");
        assert!((recs[0].correlation - 0.6).abs() < 1e-9);
        let expected_hybrid = 0.6 * 0.6 + 0.4 * (1.0 / 3.0);
        assert!((recs[0].hybrid_similarity - expected_hybrid).abs() < 1e-9);
    }

    #[test]
    fn test_high_affinity_rejects_weak_genre_overlap() {
        // Same correlation but disjoint genres: genre_sim 0 fails the 0.3 floor.
        let art = artifact(
            vec![(1, "A", "X, Y", 100), (2, "B", "W, Z", 100)],
            vec![(1, 2, 0.6)],
            vec![(1, 500, 8.0), (2, 500, 8.0)],
        );

        let (recs, _) = recommend(&art, "A", 4.5, 5, 100).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_popularity_floor_excludes_thin_items() {
        let art = artifact(
            vec![(1, "A", "X, Y", 100), (2, "B", "X, Y", 100)],
            vec![(1, 2, 0.9)],
            vec![(1, 500, 8.0), (2, 99, 9.5)],
        );

        let (recs, _) = recommend(&art, "A", 4.5, 5, 100).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_series_variants_excluded_at_every_affinity() {
        let art = artifact(
            vec![
                (1, "Naruto", "Action, Shounen", 100),
                (2, "Naruto Movie 1", "Action, Shounen", 100),
            ],
            vec![(1, 2, 0.05)],
            vec![(1, 500, 8.0), (2, 500, 8.0)],
        );

        for affinity in [5.0, 4.2, 3.7, 3.2, 2.5, 1.0] {
            let (recs, _) = recommend(&art, "Naruto", affinity, 5, 100).unwrap();
            assert!(
                recs.is_empty(),
                "variant leaked through at affinity {affinity}"
            );
        }
    }

    #[test]
    fn test_neutral_band_uses_corr_window() {
        let art = artifact(
            vec![
                (1, "A", "X", 100),
                (2, "Inside", "X", 100),
                (3, "TooHigh", "X", 100),
                (4, "TooLow", "X", 100),
            ],
            vec![(1, 2, 0.4), (1, 3, 0.7), (1, 4, 0.05)],
            vec![(1, 500, 8.0), (2, 500, 8.0), (3, 500, 8.0), (4, 500, 8.0)],
        );

        let (recs, _) = recommend(&art, "A", 3.2, 5, 100).unwrap();
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Inside"]);
    }

    #[test]
    fn test_low_affinity_rewards_dissimilar_genre() {
        // Both candidates admitted (corr < 0.15, genre_sim < 0.3); the one
        // with zero genre overlap must outrank the partial overlap.
        let art = artifact(
            vec![
                (1, "A", "X, Y, Z, W, V", 100),
                (2, "SomeOverlap", "X, P, Q, R, S", 100),
                (3, "NoOverlap", "P, Q", 100),
            ],
            vec![(1, 2, 0.1), (1, 3, 0.1)],
            vec![(1, 500, 8.0), (2, 500, 8.0), (3, 500, 8.0)],
        );

        let (recs, _) = recommend(&art, "A", 1.0, 5, 100).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].name, "NoOverlap");
    }

    #[test]
    fn test_result_count_respected() {
        let art = artifact(
            vec![
                (1, "A", "X", 100),
                (2, "B", "X", 100),
                (3, "C", "X", 100),
                (4, "D", "X", 100),
            ],
            vec![(1, 2, 0.9), (1, 3, 0.8), (1, 4, 0.7)],
            vec![(1, 500, 8.0), (2, 500, 9.0), (3, 500, 8.0), (4, 500, 7.0)],
        );

        let (recs, _) = recommend(&art, "A", 5.0, 2, 100).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].name, "B");
    }

    #[test]
    fn test_profile_aggregates_and_drops_rated() {
        let art = artifact(
            vec![
                (1, "Liked", "X", 100),
                (2, "Hated", "Y", 100),
                (3, "Fresh", "X", 100),
                (4, "Also Fresh", "Y", 100),
            ],
            vec![(1, 3, 0.8), (1, 4, 0.2), (2, 4, 0.9), (1, 2, 0.1)],
            vec![(3, 500, 8.0), (4, 500, 7.0)],
        );

        let profile: HashMap<String, f64> =
            [("Liked".to_string(), 5.0), ("Hated".to_string(), 1.0)]
                .into_iter()
                .collect();
        let recs = recommend_for_profile(&art, &profile, 10);

        // Seeds never reappear.
        assert!(recs.iter().all(|r| r.name != "Liked" && r.name != "Hated"));
        // Fresh: 0.8*5 = 4.0; Also Fresh: 0.2*5 - 0.9*5 = -3.5.
        assert_eq!(recs[0].name, "Fresh");
        assert!((recs[0].correlation - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_neutral_dampens() {
        let art = artifact(
            vec![(1, "Seed", "X", 100), (2, "Other", "X", 100)],
            vec![(1, 2, 0.8)],
            vec![(2, 500, 8.0)],
        );

        let profile: HashMap<String, f64> = [("Seed".to_string(), 3.0)].into_iter().collect();
        let recs = recommend_for_profile(&art, &profile, 10);
        // 0.8 * 3.0 * 0.5 = 1.2, normalized by the rating sum of 3.0.
        assert!((recs[0].correlation - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_search_exact_short_circuits() {
        let art = artifact(
            vec![(1, "Monster", "Drama", 10), (2, "Monster Musume", "Comedy", 10)],
            vec![],
            vec![],
        );

        let matches = search_exact(&art, "Monster");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Exact);

        let matches = search_exact(&art, "mons");
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.match_type == MatchType::Partial));
    }

    #[test]
    fn test_all_items_sorted() {
        let art = artifact(
            vec![(1, "Zeta", "Mecha", 10), (2, "Akira", "Sci-Fi", 10)],
            vec![],
            vec![],
        );
        let items = all_items(&art);
        assert_eq!(items[0].name, "Akira");
        assert_eq!(items[1].name, "Zeta");
    }
}
