/// User history store
///
/// user_id -> ordered, de-duplicated restaurant ids. The ranking core only
/// reads id lists; persistence lives behind the `HistoryStore` trait.
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append `restaurant_id` unless already present. Returns true when the
    /// id was new for this user.
    async fn record(&self, user_id: &str, restaurant_id: i64) -> Result<bool>;

    /// Ids in the order they were first recorded; unknown users get an empty list
    async fn history(&self, user_id: &str) -> Result<Vec<i64>>;
}

/// Process-local store.
///
/// **Thread-safety**: the contains-check and push run under the DashMap
/// shard write lock for the user's key, so concurrent saves for the same
/// user cannot interleave.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: DashMap<String, Vec<i64>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn record(&self, user_id: &str, restaurant_id: i64) -> Result<bool> {
        let mut ids = self.entries.entry(user_id.to_string()).or_default();
        if ids.contains(&restaurant_id) {
            debug!(user_id, restaurant_id, "History entry already present");
            return Ok(false);
        }
        ids.push(restaurant_id);
        debug!(user_id, restaurant_id, total = ids.len(), "History entry recorded");
        Ok(true)
    }

    async fn history(&self, user_id: &str) -> Result<Vec<i64>> {
        Ok(self
            .entries
            .get(user_id)
            .map(|ids| ids.value().clone())
            .unwrap_or_default())
    }
}
