//! Remote store contract
//!
//! The store is the single writer of durable truth. Boards talk to it
//! through [`RemoteStore`]; [`SimulatedStore`] is an in-memory stand-in
//! with realistic latency and injectable failures.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::LatencyProfile;
use crate::error::StoreError;
use crate::types::{Patch, Resource, ResourceId};

/// CRUD access to the durable copy of a resource collection
#[async_trait]
pub trait RemoteStore<R: Resource>: Send + Sync {
    /// Fetch the whole collection
    async fn list(&self) -> Result<Vec<R>, StoreError>;

    /// Persist a new resource, returning the stored copy
    async fn create(&self, draft: R) -> Result<R, StoreError>;

    /// Apply a partial update
    async fn update(&self, id: &ResourceId, patch: &R::Patch) -> Result<(), StoreError>;

    /// Remove a resource
    async fn delete(&self, id: &ResourceId) -> Result<(), StoreError>;
}

/// In-memory store with simulated latency
#[derive(Debug)]
pub struct SimulatedStore<R: Resource> {
    rows: DashMap<ResourceId, (u64, R)>,
    next_seq: AtomicU64,
    latency: LatencyProfile,
    fail_next: AtomicUsize,
    fail_all: AtomicBool,
}

impl<R: Resource> SimulatedStore<R> {
    /// Create empty store
    #[must_use]
    pub fn new(latency: LatencyProfile) -> Self {
        Self {
            rows: DashMap::new(),
            next_seq: AtomicU64::new(0),
            latency,
            fail_next: AtomicUsize::new(0),
            fail_all: AtomicBool::new(false),
        }
    }

    /// Create store with no latency
    #[must_use]
    pub fn instant() -> Self {
        Self::new(LatencyProfile::zero())
    }

    /// Seed rows, preserving order
    #[must_use]
    pub fn with_rows(self, rows: impl IntoIterator<Item = R>) -> Self {
        for row in rows {
            self.insert(row);
        }
        self
    }

    /// Make the next `n` calls fail
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Make every call fail until switched off
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail_all.store(unavailable, Ordering::SeqCst);
    }

    /// Durable copy of one row
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<R> {
        self.rows.get(id).map(|row| row.value().1.clone())
    }

    /// Number of durable rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn insert(&self, row: R) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.rows.insert(row.id().clone(), (seq, row));
    }

    async fn simulate(&self, delay: Duration, action: &'static str) -> Result<(), StoreError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all.load(Ordering::SeqCst) {
            tracing::warn!(kind = %R::KIND, action, "simulated store unavailable");
            return Err(StoreError::failed("simulated outage"));
        }
        let injected = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            tracing::warn!(kind = %R::KIND, action, "simulated store injected failure");
            return Err(StoreError::failed("injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Resource> RemoteStore<R> for SimulatedStore<R> {
    async fn list(&self) -> Result<Vec<R>, StoreError> {
        self.simulate(self.latency.list(), "list").await?;
        let mut rows: Vec<(u64, R)> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|(seq, _)| *seq);
        tracing::debug!(kind = %R::KIND, count = rows.len(), "simulated list");
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn create(&self, draft: R) -> Result<R, StoreError> {
        self.simulate(self.latency.create(), "create").await?;
        if self.rows.contains_key(draft.id()) {
            return Err(StoreError::failed(format!("duplicate id {}", draft.id())));
        }
        tracing::info!(kind = %R::KIND, id = %draft.id(), "simulated create");
        self.insert(draft.clone());
        Ok(draft)
    }

    async fn update(&self, id: &ResourceId, patch: &R::Patch) -> Result<(), StoreError> {
        self.simulate(self.latency.update(), "update").await?;
        let mut row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply_to(&mut row.value_mut().1);
        tracing::info!(
            kind = %R::KIND,
            %id,
            patch = %serde_json::to_string(patch).unwrap_or_default(),
            "simulated update"
        );
        Ok(())
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), StoreError> {
        self.simulate(self.latency.delete(), "delete").await?;
        self.rows
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        tracing::info!(kind = %R::KIND, %id, "simulated delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Flagged, Service};

    fn store() -> SimulatedStore<Service> {
        SimulatedStore::instant().with_rows(crate::demo::services())
    }

    #[tokio::test]
    async fn list_preserves_seed_order() {
        let rows = store().list().await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = store();
        let id = ResourceId::new("1");
        store.update(&id, &Service::flag_patch(false)).await.unwrap();
        assert!(!store.get(&id).unwrap().enabled);
    }

    #[tokio::test]
    async fn update_missing_row() {
        let err = store()
            .update(&ResourceId::new("404"), &Service::flag_patch(false))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(ResourceId::new("404")));
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let store = store();
        store.fail_next(1);
        assert!(store.delete(&ResourceId::new("1")).await.is_err());
        assert!(store.delete(&ResourceId::new("1")).await.is_ok());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn outage_fails_everything() {
        let store = store();
        store.set_unavailable(true);
        assert!(store.list().await.is_err());
        store.set_unavailable(false);
        assert!(store.list().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let store = SimulatedStore::new(LatencyProfile::default()).with_rows(crate::demo::services());
        let started = tokio::time::Instant::now();
        store.delete(&ResourceId::new("2")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(600));
    }
}
