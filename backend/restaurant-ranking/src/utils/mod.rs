// Utility functions for restaurant-ranking

use std::cmp::Ordering;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, lon) points in degrees (kilometers)
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1_rad = from.0.to_radians();
    let lat2_rad = to.0.to_radians();
    let delta_lat = (to.0 - from.0).to_radians();
    let delta_lon = (to.1 - from.1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Ascending total order for floats; positive NaN sorts last
pub fn asc(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Descending total order for floats
pub fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Known values ascending, missing values after all of them
pub fn asc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => asc(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
