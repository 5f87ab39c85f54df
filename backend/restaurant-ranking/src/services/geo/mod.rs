/// Geo proximity ranker
///
/// Haversine k-nearest selection over the candidate set. Records without
/// coordinates never reach the output.
use crate::models::RankedRestaurant;
use crate::utils::{asc, desc, haversine_km};
use tracing::debug;

/// The `k` candidates closest to (`lat`, `lon`), ascending by distance with
/// ties broken by rating (highest first). Each result carries `distance_km`.
pub fn nearest<'a>(
    candidates: Vec<RankedRestaurant<'a>>,
    lat: f64,
    lon: f64,
    k: usize,
) -> Vec<RankedRestaurant<'a>> {
    let total = candidates.len();
    let mut located: Vec<RankedRestaurant<'a>> = candidates
        .into_iter()
        .filter_map(|mut c| {
            let point = c.record.coordinates()?;
            c.distance_km = Some(haversine_km((lat, lon), point));
            Some(c)
        })
        .collect();

    if located.is_empty() || k == 0 {
        debug!(total, "Geo ranking skipped: no located candidates");
        return Vec::new();
    }

    located.sort_by(|a, b| {
        asc(a.distance_km.unwrap_or(f64::MAX), b.distance_km.unwrap_or(f64::MAX))
            .then_with(|| desc(a.record.aggregate_rating, b.record.aggregate_rating))
    });
    located.truncate(k);

    debug!(
        total,
        returned = located.len(),
        nearest_km = ?located.first().and_then(|c| c.distance_km),
        "Geo ranking completed"
    );
    located
}
