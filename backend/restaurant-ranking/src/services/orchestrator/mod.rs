/// Orchestrator
///
/// # Workflow
/// 1. Location equality filters
/// 2. With a user point: nearest record (k=1) fixes the effective
///    (city, locality), the set is restricted to it and then fully ranked
///    by distance
/// 3. History ranking when history ids are supplied, content ranking otherwise
use crate::dataset::Dataset;
use crate::models::{PreferenceQuery, RankedPage, RankedRestaurant};
use crate::services::content::rank_by_content;
use crate::services::filters::LocationFilter;
use crate::services::geo::nearest;
use crate::services::history::rank_by_history;
use tracing::debug;

/// Full ranked sequence for `query` and its length
pub fn filter_and_rank<'a>(
    dataset: &'a Dataset,
    query: &PreferenceQuery,
) -> (Vec<RankedRestaurant<'a>>, usize) {
    let mut candidates = LocationFilter::from_query(query).apply(dataset.records());

    let user_point = query.user_point();
    if let Some((lat, lon)) = user_point {
        candidates = restrict_to_user_area(candidates, lat, lon);
    }
    let sort_by_distance = user_point.is_some();

    let ranked = match query.history_ids.as_deref() {
        Some(ids) if !ids.is_empty() => {
            rank_by_history(dataset, ids, candidates, sort_by_distance)
        }
        _ => rank_by_content(candidates, &query.preferences(), sort_by_distance),
    };

    let total = ranked.len();
    debug!(total, sort_by_distance, "Filter and rank completed");
    (ranked, total)
}

/// Overrides any caller city/locality filter with the area of the
/// nearest restaurant, then attaches distances to everything left.
fn restrict_to_user_area(
    candidates: Vec<RankedRestaurant<'_>>,
    lat: f64,
    lon: f64,
) -> Vec<RankedRestaurant<'_>> {
    let area = nearest(candidates.clone(), lat, lon, 1)
        .first()
        .map(|c| (c.record.city.clone(), c.record.locality.clone()));

    let restricted: Vec<RankedRestaurant<'_>> = match &area {
        Some((city, locality)) => candidates
            .into_iter()
            .filter(|c| &c.record.city == city && &c.record.locality == locality)
            .collect(),
        None => candidates,
    };

    debug!(
        area = ?area,
        remaining = restricted.len(),
        "Restricted candidates to user area"
    );

    let k = restricted.len();
    nearest(restricted, lat, lon, k)
}

/// Slice `[offset, offset + limit)` out of a ranked sequence.
/// An offset past the end yields an empty page with the full total.
pub fn paginate(ranked: Vec<RankedRestaurant<'_>>, offset: usize, limit: usize) -> RankedPage<'_> {
    let total = ranked.len();
    let results = ranked.into_iter().skip(offset).take(limit).collect();
    RankedPage {
        total,
        offset,
        limit,
        results,
    }
}
