/// Recommendation Service
///
/// Request boundary over the ranking core: validates the raw request,
/// pulls stored history for known users and pages the ranked output.
use crate::config::RankingConfig;
use crate::dataset::Dataset;
use crate::error::{RankingError, Result};
use crate::models::{Location, RankedPage, RecommendRequest, RestaurantRecord};
use crate::services::history_store::HistoryStore;
use crate::services::orchestrator::{filter_and_rank, paginate};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct RecommendationService {
    dataset: Arc<Dataset>,
    history_store: Arc<dyn HistoryStore>,
    config: RankingConfig,
}

impl RecommendationService {
    pub fn new(
        dataset: Arc<Dataset>,
        history_store: Arc<dyn HistoryStore>,
        config: RankingConfig,
    ) -> Self {
        Self {
            dataset,
            history_store,
            config,
        }
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<RankedPage<'_>> {
        let start = Instant::now();

        let mut query = request.validate(&self.config).map_err(|e| {
            warn!(error = %e, "Rejected recommendation request");
            e
        })?;

        if query.history_ids.is_none() {
            if let Some(user_id) = request.user_id.as_deref().filter(|u| !u.trim().is_empty()) {
                let stored = self.history_store.history(user_id).await?;
                debug!(user_id, stored = stored.len(), "Loaded stored history");
                if !stored.is_empty() {
                    query.history_ids = Some(stored);
                }
            }
        }

        let history_mode = query
            .history_ids
            .as_ref()
            .is_some_and(|ids| !ids.is_empty());
        let (ranked, total) = filter_and_rank(&self.dataset, &query);
        let page = paginate(ranked, query.offset, query.limit);

        info!(
            total,
            returned = page.results.len(),
            offset = query.offset,
            limit = query.limit,
            history_mode,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendation completed"
        );
        Ok(page)
    }

    /// Record a visit. Returns false when the user already had it.
    pub async fn save_history(&self, user_id: &str, restaurant_id: i64) -> Result<bool> {
        if user_id.trim().is_empty() {
            return Err(RankingError::InvalidQuery(
                "user_id must not be empty".to_string(),
            ));
        }
        if self.dataset.get(restaurant_id).is_none() {
            warn!(user_id, restaurant_id, "Saving history for unknown restaurant id");
        }
        self.history_store.record(user_id, restaurant_id).await
    }

    /// Stored history resolved against the dataset, in dataset order
    pub async fn history(&self, user_id: &str) -> Result<Vec<&RestaurantRecord>> {
        let ids = self.history_store.history(user_id).await?;
        Ok(self.dataset.resolve(&ids))
    }

    pub fn locations(&self) -> &[Location] {
        self.dataset.locations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRestaurant;
    use crate::services::history_store::InMemoryHistoryStore;
    use async_trait::async_trait;

    fn raw(
        id: i64,
        locality: &str,
        cuisines: &str,
        rating: f64,
        coords: (f64, f64),
    ) -> RawRestaurant {
        RawRestaurant {
            id,
            name: format!("r{}", id),
            country: "India".to_string(),
            city: "X".to_string(),
            locality: locality.to_string(),
            cuisines: Some(cuisines.to_string()),
            cost_for_two: 700.0,
            aggregate_rating: rating,
            votes: 10 * id as u64,
            latitude: Some(coords.0),
            longitude: Some(coords.1),
        }
    }

    fn service() -> RecommendationService {
        let dataset = Dataset::from_records(vec![
            raw(1, "A", "Italian", 4.2, (10.0, 20.0)),
            raw(2, "A", "Vegan, Salads", 4.6, (10.001, 20.001)),
            raw(3, "B", "Chinese", 3.9, (10.2, 20.2)),
        ])
        .unwrap();
        RecommendationService::new(
            Arc::new(dataset),
            Arc::new(InMemoryHistoryStore::new()),
            RankingConfig::default(),
        )
    }

    fn ids(page: &RankedPage<'_>) -> Vec<i64> {
        page.results.iter().map(|c| c.record.id).collect()
    }

    #[tokio::test]
    async fn test_recommend_with_text() {
        let service = service();
        let request = RecommendRequest {
            lat: Some(10.0),
            lon: Some(20.0),
            target_cuisines: Some("Italian".to_string()),
            ..Default::default()
        };
        let page = service.recommend(&request).await.unwrap();
        assert_eq!(ids(&page), vec![1, 2]);
        assert_eq!(page.total, 2);
        assert_eq!(page.limit, 10);
    }

    #[tokio::test]
    async fn test_recommend_rejects_invalid() {
        let service = service();
        let request = RecommendRequest {
            limit: Some(1000),
            ..Default::default()
        };
        assert!(matches!(
            service.recommend(&request).await,
            Err(RankingError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_stored_history_drives_ranking() {
        let service = service();
        assert!(service.save_history("alice", 2).await.unwrap());
        assert!(!service.save_history("alice", 2).await.unwrap());

        let request = RecommendRequest {
            user_id: Some("alice".to_string()),
            locality: Some("A".to_string()),
            ..Default::default()
        };
        let page = service.recommend(&request).await.unwrap();
        assert_eq!(page.results[0].record.id, 2);
        assert!(page.results.iter().all(|c| c.score.is_some()));
    }

    #[tokio::test]
    async fn test_explicit_history_wins_over_stored() {
        let service = service();
        service.save_history("alice", 2).await.unwrap();

        let request = RecommendRequest {
            user_id: Some("alice".to_string()),
            locality: Some("A".to_string()),
            history_ids: Some(vec![1]),
            ..Default::default()
        };
        let page = service.recommend(&request).await.unwrap();
        assert_eq!(page.results[0].record.id, 1);
    }

    #[tokio::test]
    async fn test_history_resolves_in_dataset_order() {
        let service = service();
        service.save_history("bob", 3).await.unwrap();
        service.save_history("bob", 1).await.unwrap();
        service.save_history("bob", 404).await.unwrap();

        let records = service.history("bob").await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(service.history("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_user_rejected() {
        let service = service();
        assert!(matches!(
            service.save_history("  ", 1).await,
            Err(RankingError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_locations() {
        let service = service();
        let localities: Vec<_> = service
            .locations()
            .iter()
            .map(|l| l.locality.as_str())
            .collect();
        assert_eq!(localities, vec!["A", "B"]);
    }

    struct FailingStore;

    #[async_trait]
    impl HistoryStore for FailingStore {
        async fn record(&self, _user_id: &str, _restaurant_id: i64) -> Result<bool> {
            Err(RankingError::HistoryStore("store offline".to_string()))
        }

        async fn history(&self, _user_id: &str) -> Result<Vec<i64>> {
            Err(RankingError::HistoryStore("store offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let dataset =
            Dataset::from_records(vec![raw(1, "A", "Italian", 4.0, (1.0, 1.0))]).unwrap();
        let service = RecommendationService::new(
            Arc::new(dataset),
            Arc::new(FailingStore),
            RankingConfig::default(),
        );

        let request = RecommendRequest {
            user_id: Some("carol".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.recommend(&request).await,
            Err(RankingError::HistoryStore(_))
        ));

        // anonymous requests never touch the store
        let anonymous = RecommendRequest::default();
        assert_eq!(service.recommend(&anonymous).await.unwrap().total, 1);
    }
}
