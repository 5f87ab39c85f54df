use crate::config::RankingConfig;
use crate::error::{RankingError, Result};
use serde::{Deserialize, Serialize};

const VEG_KEYWORDS: [&str; 2] = ["Vegetarian", "Vegan"];
const UNKNOWN_CUISINE: &str = "Unknown";

/// Cleaned row as emitted by the ETL step.
///
/// Accepts both snake_case keys and the Zomato CSV column headers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRestaurant {
    #[serde(alias = "Restaurant ID")]
    pub id: i64,
    #[serde(alias = "Restaurant Name")]
    pub name: String,
    #[serde(alias = "Country", default)]
    pub country: String,
    #[serde(alias = "City")]
    pub city: String,
    #[serde(alias = "Locality")]
    pub locality: String,
    #[serde(alias = "Cuisines", default)]
    pub cuisines: Option<String>,
    #[serde(alias = "Average Cost for two", default)]
    pub cost_for_two: f64,
    #[serde(alias = "Aggregate rating", default)]
    pub aggregate_rating: f64,
    #[serde(alias = "Votes", default)]
    pub votes: u64,
    #[serde(alias = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(alias = "Longitude", default)]
    pub longitude: Option<f64>,
}

/// Restaurant record, read-only once the dataset is built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRecord {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub city: String,
    pub locality: String,
    pub full_location: String,
    pub cuisines: String,
    pub cost_for_two: f64,
    pub is_veg: bool,
    pub aggregate_rating: f64,
    pub votes: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<RawRestaurant> for RestaurantRecord {
    fn from(raw: RawRestaurant) -> Self {
        let cuisines = raw
            .cuisines
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_CUISINE.to_string());
        let is_veg = is_veg_cuisine(&cuisines);
        let full_location = format!("{}, {}", raw.city, raw.locality);

        Self {
            id: raw.id,
            name: raw.name,
            country: raw.country,
            city: raw.city,
            locality: raw.locality,
            full_location,
            cuisines,
            cost_for_two: raw.cost_for_two,
            is_veg,
            aggregate_rating: raw.aggregate_rating,
            votes: raw.votes,
            latitude: raw.latitude,
            longitude: raw.longitude,
        }
    }
}

impl RestaurantRecord {
    /// Both coordinates, if the record has them
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Keyword heuristic: a restaurant counts as veg when its cuisines name
/// a vegetarian or vegan specialty.
pub fn is_veg_cuisine(cuisines: &str) -> bool {
    VEG_KEYWORDS.iter().any(|kw| cuisines.contains(kw))
}

/// A record inside one request's candidate set, with the signals
/// attached by the rankers that have run so far.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRestaurant<'a> {
    #[serde(flatten)]
    pub record: &'a RestaurantRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl<'a> RankedRestaurant<'a> {
    pub fn new(record: &'a RestaurantRecord) -> Self {
        Self {
            record,
            distance_km: None,
            similarity: None,
            score: None,
        }
    }
}

impl<'a> From<&'a RestaurantRecord> for RankedRestaurant<'a> {
    fn from(record: &'a RestaurantRecord) -> Self {
        Self::new(record)
    }
}

/// Hard filters and free-text query used by content ranking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPreferences {
    pub target_cuisines: Option<String>,
    /// Zero means no cap
    pub max_cost: Option<f64>,
    pub is_veg: Option<bool>,
    /// Zero means no floor
    pub min_rating: Option<f64>,
}

/// Validated per-request query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceQuery {
    pub country: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub target_cuisines: Option<String>,
    pub max_cost: Option<f64>,
    pub is_veg: Option<bool>,
    pub min_rating: Option<f64>,
    pub history_ids: Option<Vec<i64>>,
    pub limit: usize,
    pub offset: usize,
}

impl PreferenceQuery {
    pub fn preferences(&self) -> ContentPreferences {
        ContentPreferences {
            target_cuisines: self.target_cuisines.clone(),
            max_cost: self.max_cost,
            is_veg: self.is_veg,
            min_rating: self.min_rating,
        }
    }

    /// User point, only when both coordinates were supplied
    pub fn user_point(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

/// Unvalidated request as it arrives from the serving layer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub target_cuisines: Option<String>,
    #[serde(default)]
    pub max_cost: Option<f64>,
    #[serde(default)]
    pub is_veg: Option<bool>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub history_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl RecommendRequest {
    /// Reject malformed pagination and coordinates before any ranking runs
    pub fn validate(&self, config: &RankingConfig) -> Result<PreferenceQuery> {
        let limit = match self.limit {
            None => config.default_limit,
            Some(l) if l < 0 => {
                return Err(RankingError::InvalidQuery(format!(
                    "limit must be non-negative, got {}",
                    l
                )))
            }
            Some(l) if l as u64 > config.max_limit as u64 => {
                return Err(RankingError::InvalidQuery(format!(
                    "limit {} exceeds maximum {}",
                    l, config.max_limit
                )))
            }
            Some(l) => l as usize,
        };

        let offset = match self.offset {
            None => 0,
            Some(o) if o < 0 => {
                return Err(RankingError::InvalidQuery(format!(
                    "offset must be non-negative, got {}",
                    o
                )))
            }
            Some(o) => usize::try_from(o)
                .map_err(|_| RankingError::InvalidQuery(format!("offset {} too large", o)))?,
        };

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(RankingError::InvalidQuery(
                        "Invalid latitude: must be between -90 and 90".to_string(),
                    ));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(RankingError::InvalidQuery(
                        "Invalid longitude: must be between -180 and 180".to_string(),
                    ));
                }
            }
            (None, None) => {}
            _ => {
                return Err(RankingError::InvalidQuery(
                    "lat and lon must be supplied together".to_string(),
                ))
            }
        }

        Ok(PreferenceQuery {
            country: non_blank(&self.country),
            city: non_blank(&self.city),
            locality: non_blank(&self.locality),
            lat: self.lat,
            lon: self.lon,
            target_cuisines: non_blank(&self.target_cuisines),
            max_cost: self.max_cost,
            is_veg: self.is_veg,
            min_rating: self.min_rating,
            history_ids: self.history_ids.clone(),
            limit,
            offset,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One page of a ranked sequence
#[derive(Debug, Clone, Serialize)]
pub struct RankedPage<'a> {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub results: Vec<RankedRestaurant<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub city: String,
    pub locality: String,
}
