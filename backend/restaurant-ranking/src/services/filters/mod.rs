/// Hard filter stage
///
/// Conjunctive, order-independent predicates. An empty result is passed
/// downstream like any other candidate set.
use crate::models::{ContentPreferences, PreferenceQuery, RankedRestaurant, RestaurantRecord};
use tracing::debug;

/// Exact-equality location filters, applied before any ranking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    pub country: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
}

impl LocationFilter {
    pub fn from_query(query: &PreferenceQuery) -> Self {
        Self {
            country: query.country.clone(),
            city: query.city.clone(),
            locality: query.locality.clone(),
        }
    }

    pub fn matches(&self, record: &RestaurantRecord) -> bool {
        field_matches(&self.country, &record.country)
            && field_matches(&self.city, &record.city)
            && field_matches(&self.locality, &record.locality)
    }

    pub fn apply<'a>(
        &self,
        records: impl IntoIterator<Item = &'a RestaurantRecord>,
    ) -> Vec<RankedRestaurant<'a>> {
        let candidates: Vec<RankedRestaurant<'a>> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .map(RankedRestaurant::new)
            .collect();

        debug!(
            country = ?self.country,
            city = ?self.city,
            locality = ?self.locality,
            remaining = candidates.len(),
            "Location filters applied"
        );
        candidates
    }
}

fn field_matches(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref() {
        Some(expected) if !expected.is_empty() => expected == value,
        _ => true,
    }
}

/// Cost, veg and rating predicates used by content ranking.
/// Only an exact 0 disables a numeric filter; a negative cap excludes everything.
pub fn matches_preferences(record: &RestaurantRecord, prefs: &ContentPreferences) -> bool {
    if let Some(max_cost) = prefs.max_cost.filter(|c| *c != 0.0) {
        if record.cost_for_two > max_cost {
            return false;
        }
    }
    if prefs.is_veg == Some(true) && !record.is_veg {
        return false;
    }
    if let Some(min_rating) = prefs.min_rating.filter(|r| *r != 0.0) {
        if record.aggregate_rating < min_rating {
            return false;
        }
    }
    true
}

pub fn apply_preference_filters<'a>(
    candidates: Vec<RankedRestaurant<'a>>,
    prefs: &ContentPreferences,
) -> Vec<RankedRestaurant<'a>> {
    let before = candidates.len();
    let kept: Vec<RankedRestaurant<'a>> = candidates
        .into_iter()
        .filter(|c| matches_preferences(c.record, prefs))
        .collect();

    debug!(
        before,
        after = kept.len(),
        max_cost = ?prefs.max_cost,
        is_veg = ?prefs.is_veg,
        min_rating = ?prefs.min_rating,
        "Preference filters applied"
    );
    kept
}
