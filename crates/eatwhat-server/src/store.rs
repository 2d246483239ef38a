//! In-memory saved-list storage, partitioned by caller.

use std::collections::HashMap;
use std::sync::Arc;

use eatwhat_core::{SaveRequest, SavedLists};
use tokio::sync::RwLock;

/// Venue id -> memberships, per principal. A venue that belongs to no list
/// has no entry.
#[derive(Debug, Clone, Default)]
pub struct SavedStore {
    inner: Arc<RwLock<HashMap<String, HashMap<String, SavedLists>>>>,
}

impl SavedStore {
    pub async fn memberships(&self, principal: &str, venue_id: &str) -> SavedLists {
        self.inner
            .read()
            .await
            .get(principal)
            .and_then(|entries| entries.get(venue_id))
            .copied()
            .unwrap_or_default()
    }

    /// Applies one add/remove and returns the venue's resulting memberships.
    pub async fn apply(&self, principal: &str, request: &SaveRequest) -> SavedLists {
        let mut guard = self.inner.write().await;
        let entries = guard.entry(principal.to_owned()).or_default();

        let mut lists = entries.get(&request.id).copied().unwrap_or_default();
        lists.apply(request.list_type, request.action);

        if lists == SavedLists::default() {
            entries.remove(&request.id);
        } else {
            entries.insert(request.id.clone(), lists);
        }
        lists
    }

    /// Number of saved venues across all principals.
    pub async fn saved_count(&self) -> usize {
        self.inner.read().await.values().map(HashMap::len).sum()
    }
}
