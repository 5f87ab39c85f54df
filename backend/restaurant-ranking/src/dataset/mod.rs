/// Restaurant Dataset
///
/// Immutable in-memory table built once from the cleaned ETL output and
/// shared read-only (`Arc<Dataset>`) across requests.
use crate::error::{RankingError, Result};
use crate::models::{Location, RawRestaurant, RestaurantRecord};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Dataset {
    records: Vec<RestaurantRecord>,
    by_id: HashMap<i64, usize>,
    locations: Vec<Location>,
}

impl Dataset {
    pub fn from_records(raw: Vec<RawRestaurant>) -> Result<Self> {
        if raw.is_empty() {
            return Err(RankingError::DataUnavailable(
                "dataset contains no records".to_string(),
            ));
        }

        let records: Vec<RestaurantRecord> = raw.into_iter().map(RestaurantRecord::from).collect();

        let mut by_id = HashMap::with_capacity(records.len());
        let mut duplicates = 0usize;
        for (idx, record) in records.iter().enumerate() {
            // First occurrence wins the id lookup
            if by_id.contains_key(&record.id) {
                duplicates += 1;
            } else {
                by_id.insert(record.id, idx);
            }
        }
        if duplicates > 0 {
            warn!(duplicates, "Dataset contains duplicate restaurant ids");
        }

        let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
        let mut locations = Vec::new();
        for record in &records {
            let key = (
                record.country.as_str(),
                record.city.as_str(),
                record.locality.as_str(),
            );
            if seen.insert(key) {
                locations.push(Location {
                    country: record.country.clone(),
                    city: record.city.clone(),
                    locality: record.locality.clone(),
                });
            }
        }

        let veg_count = records.iter().filter(|r| r.is_veg).count();
        info!(
            records = records.len(),
            locations = locations.len(),
            veg = veg_count,
            "Dataset loaded"
        );

        Ok(Self {
            records,
            by_id,
            locations,
        })
    }

    /// Load a JSON array of cleaned rows
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: Vec<RawRestaurant> = serde_json::from_reader(reader)?;
        Self::from_records(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            RankingError::DataUnavailable(format!(
                "failed to open dataset {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&RestaurantRecord> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    /// Records whose id appears in `ids`, in dataset order.
    /// Unknown ids are skipped.
    pub fn resolve(&self, ids: &[i64]) -> Vec<&RestaurantRecord> {
        if ids.is_empty() {
            return Vec::new();
        }
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        self.records
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .collect()
    }

    /// Distinct (country, city, locality) triples in first-seen order
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"id": 1, "name": "Roma", "country": "India", "city": "X", "locality": "A",
         "cuisines": "Italian", "cost_for_two": 900, "aggregate_rating": 4.2, "votes": 40,
         "latitude": 10.0, "longitude": 20.0},
        {"id": 2, "name": "Leaf", "country": "India", "city": "X", "locality": "A",
         "cuisines": "Vegan, Salads", "cost_for_two": 600, "aggregate_rating": 4.6, "votes": 80,
         "latitude": 10.001, "longitude": 20.001},
        {"id": 3, "name": "Dhaba", "country": "India", "city": "X", "locality": "B",
         "cuisines": null, "cost_for_two": 300, "aggregate_rating": 3.1, "votes": 5}
    ]"#;

    #[test]
    fn test_load_from_reader() {
        let dataset = Dataset::from_json_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.get(2).unwrap().is_veg);
        assert_eq!(dataset.get(3).unwrap().cuisines, "Unknown");
        assert!(dataset.get(99).is_none());
    }

    #[test]
    fn test_locations_distinct_in_order() {
        let dataset = Dataset::from_json_reader(SAMPLE.as_bytes()).unwrap();
        let localities: Vec<_> = dataset
            .locations()
            .iter()
            .map(|l| l.locality.as_str())
            .collect();
        assert_eq!(localities, vec!["A", "B"]);
    }

    #[test]
    fn test_resolve_keeps_dataset_order() {
        let dataset = Dataset::from_json_reader(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<_> = dataset.resolve(&[3, 1, 42]).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(dataset.resolve(&[]).is_empty());
    }

    #[test]
    fn test_empty_dataset_unavailable() {
        let err = Dataset::from_json_reader("[]".as_bytes()).unwrap_err();
        assert!(matches!(err, RankingError::DataUnavailable(_)));
    }

    #[test]
    fn test_malformed_dataset_unavailable() {
        let err = Dataset::from_json_reader("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, RankingError::DataUnavailable(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::from_json_file(file.path()).unwrap();
        assert_eq!(dataset.records().len(), 3);

        let missing = Dataset::from_json_file("/nonexistent/restaurants.json");
        assert!(matches!(missing, Err(RankingError::DataUnavailable(_))));
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let json = r#"[
            {"id": 7, "name": "First", "city": "X", "locality": "A"},
            {"id": 7, "name": "Second", "city": "X", "locality": "A"}
        ]"#;
        let dataset = Dataset::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(7).unwrap().name, "First");
    }
}
