/// Content similarity ranker
///
/// Hard filters first, then TF-IDF cosine against the free-text cuisine
/// query when one is given.
use crate::models::{ContentPreferences, RankedRestaurant};
use crate::services::filters::apply_preference_filters;
use crate::services::vectorizer::score_against;
use crate::utils::{asc_missing_last, desc};
use std::cmp::Ordering;
use tracing::debug;

pub fn rank_by_content<'a>(
    candidates: Vec<RankedRestaurant<'a>>,
    prefs: &ContentPreferences,
    sort_by_distance: bool,
) -> Vec<RankedRestaurant<'a>> {
    let mut results = apply_preference_filters(candidates, prefs);
    if results.is_empty() {
        return results;
    }

    let query = prefs
        .target_cuisines
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    match query {
        Some(query) => {
            let documents: Vec<&str> = results.iter().map(|c| c.record.cuisines.as_str()).collect();
            let similarities = score_against(query, &documents);
            for (candidate, similarity) in results.iter_mut().zip(similarities) {
                candidate.similarity = Some(similarity);
            }

            results.sort_by(|a, b| {
                desc(a.similarity.unwrap_or(0.0), b.similarity.unwrap_or(0.0))
                    .then_with(|| secondary_order(a, b, sort_by_distance))
            });
        }
        None => {
            results.sort_by(|a, b| secondary_order(a, b, sort_by_distance));
        }
    }

    debug!(
        candidates = results.len(),
        query = ?query,
        sort_by_distance,
        "Content ranking completed"
    );
    results
}

/// Distance ascending (unknown distances last) when ranking by distance,
/// then rating descending
fn secondary_order(a: &RankedRestaurant<'_>, b: &RankedRestaurant<'_>, by_distance: bool) -> Ordering {
    let by_rating = || desc(a.record.aggregate_rating, b.record.aggregate_rating);
    if by_distance {
        asc_missing_last(a.distance_km, b.distance_km).then_with(by_rating)
    } else {
        by_rating()
    }
}
