/// History-based ranker
///
/// Builds a synthetic profile document from the cuisines of the user's past
/// restaurants and re-ranks the candidate set by `similarity × rating`, so a
/// strong cuisine match with a poor rating does not float to the top.
use crate::dataset::Dataset;
use crate::models::RankedRestaurant;
use crate::services::vectorizer::score_against;
use crate::utils::{asc_missing_last, desc};
use std::cmp::Ordering;
use tracing::debug;

pub fn rank_by_history<'a>(
    dataset: &Dataset,
    history_ids: &[i64],
    candidates: Vec<RankedRestaurant<'a>>,
    sort_by_distance: bool,
) -> Vec<RankedRestaurant<'a>> {
    let past = dataset.resolve(history_ids);
    if past.is_empty() {
        debug!(
            history_len = history_ids.len(),
            "No resolvable history, using default ordering"
        );
        return default_order(candidates, sort_by_distance);
    }

    let mut results = candidates;
    if results.is_empty() {
        return results;
    }

    let profile = past
        .iter()
        .map(|r| r.cuisines.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let documents: Vec<&str> = results.iter().map(|c| c.record.cuisines.as_str()).collect();
    let similarities = score_against(&profile, &documents);

    for (candidate, similarity) in results.iter_mut().zip(similarities) {
        candidate.similarity = Some(similarity);
        candidate.score = Some(similarity * candidate.record.aggregate_rating);
    }

    results.sort_by(|a, b| {
        desc(a.score.unwrap_or(0.0), b.score.unwrap_or(0.0)).then_with(|| {
            distance_first(a, b, sort_by_distance)
                .then_with(|| a.record.votes.cmp(&b.record.votes).reverse())
        })
    });

    debug!(
        resolved = past.len(),
        candidates = results.len(),
        sort_by_distance,
        "History ranking completed"
    );
    results
}

/// Ordering used when there is no usable history: distance ascending when
/// ranking by distance, then votes and rating, both descending.
fn default_order(
    mut candidates: Vec<RankedRestaurant<'_>>,
    sort_by_distance: bool,
) -> Vec<RankedRestaurant<'_>> {
    candidates.sort_by(|a, b| {
        distance_first(a, b, sort_by_distance).then_with(|| {
            a.record
                .votes
                .cmp(&b.record.votes)
                .reverse()
                .then_with(|| desc(a.record.aggregate_rating, b.record.aggregate_rating))
        })
    });
    candidates
}

/// Unknown distances go after every known one
fn distance_first(a: &RankedRestaurant<'_>, b: &RankedRestaurant<'_>, by_distance: bool) -> Ordering {
    if by_distance {
        asc_missing_last(a.distance_km, b.distance_km)
    } else {
        Ordering::Equal
    }
}
