//! Optimistic mutation protocol
//!
//! A [`ResourceBoard`] owns the locally observed collection of one resource
//! kind and reconciles it with a [`RemoteStore`]:
//! - toggles, edits and creates are applied locally before the remote call
//!   and reverted if it fails
//! - deletes are pessimistic: the row disappears only after the store confirms
//!
//! Local state sits behind a mutex that is only held between awaits, so the
//! applied value is always visible before the remote call is issued.
//!
//! # Overlapping toggles
//!
//! Under [`OverlapPolicy::LastCallWins`] outstanding toggles on one resource
//! form a ledger in dispatch order. Each entry keeps the value it overwrote.
//! A confirmed entry supersedes every earlier one. A failed entry restores
//! its value only when it is the latest live entry; otherwise it hands that
//! value to the next entry in line.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{MutationConfig, OverlapPolicy};
use crate::error::{MutationError, StoreError};
use crate::notice::NoticeBoard;
use crate::state_machine::{validate_transition, MutationPhase};
use crate::store::RemoteStore;
use crate::types::{Flagged, Patch, Resource, ResourceId, ResourceKind};

/// Kind of user-initiated change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Toggle,
    Edit,
    Create,
    Delete,
}

impl Action {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Toggle => "toggle",
            Action::Edit => "edit",
            Action::Create => "create",
            Action::Delete => "delete",
        }
    }

    /// Toast shown when the remote call fails
    #[must_use]
    pub fn failure_notice(self, kind: ResourceKind) -> String {
        match self {
            Action::Toggle => format!("Failed to update {kind} status."),
            Action::Edit => format!("Failed to save {kind}."),
            Action::Create => format!("Failed to create {kind}."),
            Action::Delete => format!("Failed to delete {kind}."),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-flight tracking key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationKey {
    pub id: ResourceId,
    pub action: Action,
}

impl MutationKey {
    #[inline]
    #[must_use]
    pub fn new(id: ResourceId, action: Action) -> Self {
        Self { id, action }
    }
}

/// Phases one attempt went through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationTrail {
    pub ticket: u64,
    pub id: ResourceId,
    pub action: Action,
    pub phases: Vec<MutationPhase>,
}

impl MutationTrail {
    /// Last phase reached
    #[must_use]
    pub fn phase(&self) -> MutationPhase {
        self.phases.last().copied().unwrap_or(MutationPhase::Idle)
    }
}

/// Runtime knobs of the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationPolicy {
    pub overlap: OverlapPolicy,
    pub remote_timeout: Option<Duration>,
    pub history_limit: usize,
}

impl MutationPolicy {
    #[inline]
    #[must_use]
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    /// A zero limit counts as no limit
    #[inline]
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.remote_timeout = timeout.filter(|d| !d.is_zero());
        self
    }

    fn allows_overlap(&self, action: Action) -> bool {
        // Only toggles carry single-field rollback values that can be chained.
        self.overlap == OverlapPolicy::LastCallWins && action == Action::Toggle
    }
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self::from(&MutationConfig::default())
    }
}

impl From<&MutationConfig> for MutationPolicy {
    fn from(config: &MutationConfig) -> Self {
        Self {
            overlap: config.overlap,
            remote_timeout: config.remote_timeout(),
            history_limit: config.history_limit.max(1),
        }
    }
}

#[derive(Debug)]
struct Outstanding<P> {
    ticket: u64,
    inverse: Option<P>,
    superseded: bool,
    trail: MutationTrail,
}

#[derive(Debug)]
struct BoardState<R: Resource> {
    items: Vec<R>,
    pending: HashMap<MutationKey, Vec<Outstanding<R::Patch>>>,
    history: VecDeque<MutationTrail>,
    next_ticket: u64,
}

impl<R: Resource> BoardState<R> {
    fn new(items: Vec<R>) -> Self {
        Self {
            items,
            pending: HashMap::new(),
            history: VecDeque::new(),
            next_ticket: 1,
        }
    }

    fn position(&self, id: &ResourceId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn is_busy(&self, key: &MutationKey) -> bool {
        self.pending.get(key).is_some_and(|ledger| !ledger.is_empty())
    }

    /// Whether the flag of `id` is already in flight under another action
    fn flag_in_flight(&self, id: &ResourceId, action: Action) -> bool {
        match action {
            Action::Toggle => self
                .pending
                .get(&MutationKey::new(id.clone(), Action::Edit))
                .is_some_and(|ledger| {
                    ledger
                        .iter()
                        .any(|o| o.inverse.as_ref().is_some_and(Patch::touches_flag))
                }),
            Action::Edit => self.is_busy(&MutationKey::new(id.clone(), Action::Toggle)),
            Action::Create | Action::Delete => false,
        }
    }

    fn open(
        &mut self,
        key: MutationKey,
        inverse: Option<R::Patch>,
        phase: MutationPhase,
    ) -> Result<u64, MutationError> {
        validate_transition(MutationPhase::Idle, phase)?;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let trail = MutationTrail {
            ticket,
            id: key.id.clone(),
            action: key.action,
            phases: vec![MutationPhase::Idle, phase],
        };
        self.pending.entry(key).or_default().push(Outstanding {
            ticket,
            inverse,
            superseded: false,
            trail,
        });
        Ok(ticket)
    }

    /// Close the ledger entry for `ticket`, returning the value to restore
    /// (only ever `Some` for a live, latest, rolled-back entry).
    fn settle(
        &mut self,
        key: &MutationKey,
        ticket: u64,
        to: MutationPhase,
        history_limit: usize,
    ) -> Result<Option<R::Patch>, MutationError> {
        let (trail, restore, drained) = {
            let Some(ledger) = self.pending.get_mut(key) else {
                return Ok(None);
            };
            let Some(pos) = ledger.iter().position(|o| o.ticket == ticket) else {
                return Ok(None);
            };
            validate_transition(ledger[pos].trail.phase(), to)?;

            let mut entry = ledger.remove(pos);
            entry.trail.phases.push(to);

            let mut restore = None;
            match to {
                MutationPhase::Confirmed => {
                    for earlier in &mut ledger[..pos] {
                        earlier.superseded = true;
                    }
                }
                MutationPhase::RolledBack if !entry.superseded => {
                    if pos == ledger.len() {
                        restore = entry.inverse.take();
                    } else {
                        ledger[pos].inverse = entry.inverse.take();
                    }
                }
                _ => {}
            }
            (entry.trail, restore, ledger.is_empty())
        };

        if drained {
            self.pending.remove(key);
        }
        if self.history.len() >= history_limit {
            self.history.pop_front();
        }
        self.history.push_back(trail);
        Ok(restore)
    }

    fn restore(&mut self, id: &ResourceId, inverse: Option<R::Patch>) {
        if let (Some(inverse), Some(idx)) = (inverse, self.position(id)) {
            inverse.apply_to(&mut self.items[idx]);
        }
    }

    fn remove(&mut self, id: &ResourceId) -> Option<R> {
        self.position(id).map(|idx| self.items.remove(idx))
    }
}

/// Locally observed collection of one resource kind
pub struct ResourceBoard<R: Resource> {
    state: Arc<Mutex<BoardState<R>>>,
    store: Arc<dyn RemoteStore<R>>,
    policy: MutationPolicy,
    notices: NoticeBoard,
}

impl<R: Resource> Clone for ResourceBoard<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            policy: self.policy,
            notices: self.notices.clone(),
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceBoard<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResourceBoard")
            .field("kind", &R::KIND)
            .field("items", &state.items.len())
            .field("pending", &state.pending.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<R: Resource> ResourceBoard<R> {
    /// Create empty board
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore<R>>, policy: MutationPolicy, notices: NoticeBoard) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState::new(Vec::new()))),
            store,
            policy,
            notices,
        }
    }

    /// Seed the local collection without a fetch
    #[must_use]
    pub fn with_items(self, items: impl IntoIterator<Item = R>) -> Self {
        self.state.lock().items = items.into_iter().collect();
        self
    }

    /// Protocol settings
    #[inline]
    #[must_use]
    pub fn policy(&self) -> MutationPolicy {
        self.policy
    }

    /// Notice board failures are reported to
    #[inline]
    #[must_use]
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Copy of the observable collection
    #[must_use]
    pub fn snapshot(&self) -> Vec<R> {
        self.state.lock().items.clone()
    }

    /// Copy of one observable row
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<R> {
        let state = self.state.lock();
        state.position(id).map(|idx| state.items[idx].clone())
    }

    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.state.lock().position(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Whether `action` on `id` is in flight (the control should be disabled)
    #[must_use]
    pub fn is_pending(&self, id: &ResourceId, action: Action) -> bool {
        self.state
            .lock()
            .is_busy(&MutationKey::new(id.clone(), action))
    }

    /// Number of in-flight attempts across all keys
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.values().map(Vec::len).sum()
    }

    /// Settled attempts, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<MutationTrail> {
        self.state.lock().history.iter().cloned().collect()
    }

    /// Replace the collection with the store's copy
    ///
    /// # Errors
    /// `MutationError::LoadFailed` when the store call fails; local rows are kept
    pub async fn load(&self) -> Result<usize, MutationError> {
        match self.call(self.store.list()).await {
            Ok(rows) => {
                let count = rows.len();
                self.state.lock().items = rows;
                tracing::debug!(kind = %R::KIND, count, "board loaded");
                Ok(count)
            }
            Err(source) => {
                tracing::warn!(kind = %R::KIND, error = %source, "board load failed");
                self.notices.error(format!("Failed to load {}s.", R::KIND));
                Err(MutationError::LoadFailed {
                    kind: R::KIND,
                    source,
                })
            }
        }
    }

    /// Flip the flag of `id`, returning the value it was flipped to
    ///
    /// The new value is the negation of the locally observed value at
    /// dispatch time.
    ///
    /// # Errors
    /// - `MutationError::Busy` if a toggle is in flight and overlap is rejected,
    ///   or an edit setting the flag is in flight
    /// - `MutationError::NotFound` if `id` is not in the collection
    /// - `MutationError::RolledBack` if the store call failed
    pub async fn toggle(&self, id: &ResourceId) -> Result<bool, MutationError>
    where
        R: Flagged,
    {
        let key = MutationKey::new(id.clone(), Action::Toggle);
        let (ticket, patch, value) = {
            let mut state = self.state.lock();
            self.check_idle(&state, &key)?;
            self.check_flag_free(&state, &key)?;
            let idx = state.position(id).ok_or_else(|| not_found::<R>(id))?;
            let value = !state.items[idx].flag();
            let patch = R::flag_patch(value);
            let inverse = patch.capture(&state.items[idx]);
            let ticket = state.open(key.clone(), Some(inverse), MutationPhase::AppliedLocally)?;
            patch.apply_to(&mut state.items[idx]);
            (ticket, patch, value)
        };
        tracing::debug!(kind = %R::KIND, %id, flag = R::FLAG, value, ticket, "toggle applied locally");

        let outcome = self.call(self.store.update(id, &patch)).await;
        self.finish_optimistic(&key, ticket, outcome)?;
        Ok(value)
    }

    /// Apply a partial update
    ///
    /// # Errors
    /// - `MutationError::EmptyPatch` if the patch sets nothing
    /// - `MutationError::Busy` if an edit of `id` is in flight, or the patch
    ///   sets the flag while a toggle of `id` is in flight
    /// - `MutationError::NotFound` if `id` is not in the collection
    /// - `MutationError::RolledBack` if the store call failed; only the
    ///   fields the patch set are restored
    pub async fn edit(&self, id: &ResourceId, patch: R::Patch) -> Result<(), MutationError> {
        if patch.is_empty() {
            return Err(MutationError::EmptyPatch {
                kind: R::KIND,
                id: id.clone(),
            });
        }
        let key = MutationKey::new(id.clone(), Action::Edit);
        let ticket = {
            let mut state = self.state.lock();
            self.check_idle(&state, &key)?;
            if patch.touches_flag() {
                self.check_flag_free(&state, &key)?;
            }
            let idx = state.position(id).ok_or_else(|| not_found::<R>(id))?;
            let inverse = patch.capture(&state.items[idx]);
            let ticket = state.open(key.clone(), Some(inverse), MutationPhase::AppliedLocally)?;
            patch.apply_to(&mut state.items[idx]);
            ticket
        };
        tracing::debug!(kind = %R::KIND, %id, ticket, "edit applied locally");

        let outcome = self.call(self.store.update(id, &patch)).await;
        self.finish_optimistic(&key, ticket, outcome)
    }

    /// Add a resource, showing it immediately as a placeholder
    ///
    /// The placeholder is prepended. On success it is replaced by the stored
    /// copy; on failure it is removed entirely.
    ///
    /// # Errors
    /// - `MutationError::AlreadyExists` if the id is already in the collection
    /// - `MutationError::RolledBack` if the store call failed
    pub async fn create(&self, draft: R) -> Result<R, MutationError> {
        let id = draft.id().clone();
        let key = MutationKey::new(id.clone(), Action::Create);
        let ticket = {
            let mut state = self.state.lock();
            self.check_idle(&state, &key)?;
            if state.position(&id).is_some() {
                return Err(MutationError::AlreadyExists { kind: R::KIND, id });
            }
            let ticket = state.open(key.clone(), None, MutationPhase::AppliedLocally)?;
            state.items.insert(0, draft.clone());
            ticket
        };
        tracing::debug!(kind = %R::KIND, %id, ticket, "placeholder inserted");

        match self.call(self.store.create(draft)).await {
            Ok(stored) => {
                let mut state = self.state.lock();
                if let Some(idx) = state.position(&id) {
                    state.items[idx] = stored.clone();
                }
                state.settle(&key, ticket, MutationPhase::Confirmed, self.policy.history_limit)?;
                tracing::info!(kind = %R::KIND, id = %stored.id(), ticket, "create confirmed");
                Ok(stored)
            }
            Err(source) => {
                {
                    let mut state = self.state.lock();
                    state.remove(&id);
                    state.settle(&key, ticket, MutationPhase::RolledBack, self.policy.history_limit)?;
                }
                Err(self.report_failure(&key, source, true))
            }
        }
    }

    /// Remove a resource once the store confirms
    ///
    /// # Errors
    /// - `MutationError::Busy` if a delete of `id` is in flight
    /// - `MutationError::NotFound` if `id` is not in the collection
    /// - `MutationError::Failed` if the store call failed; the row stays
    pub async fn delete(&self, id: &ResourceId) -> Result<(), MutationError> {
        let key = MutationKey::new(id.clone(), Action::Delete);
        let ticket = {
            let mut state = self.state.lock();
            self.check_idle(&state, &key)?;
            if state.position(id).is_none() {
                return Err(not_found::<R>(id));
            }
            state.open(key.clone(), None, MutationPhase::AwaitingRemote)?
        };
        tracing::debug!(kind = %R::KIND, %id, ticket, "delete awaiting remote");

        match self.call(self.store.delete(id)).await {
            Ok(()) => {
                let mut state = self.state.lock();
                state.remove(id);
                state.settle(&key, ticket, MutationPhase::Confirmed, self.policy.history_limit)?;
                tracing::info!(kind = %R::KIND, %id, ticket, "delete confirmed");
                Ok(())
            }
            Err(source) => {
                self.state
                    .lock()
                    .settle(&key, ticket, MutationPhase::Failed, self.policy.history_limit)?;
                Err(self.report_failure(&key, source, false))
            }
        }
    }

    fn check_idle(&self, state: &BoardState<R>, key: &MutationKey) -> Result<(), MutationError> {
        if state.is_busy(key) && !self.policy.allows_overlap(key.action) {
            tracing::debug!(kind = %R::KIND, id = %key.id, action = %key.action, "rejected: already pending");
            return Err(MutationError::Busy {
                kind: R::KIND,
                id: key.id.clone(),
                action: key.action.as_str(),
            });
        }
        Ok(())
    }

    fn check_flag_free(&self, state: &BoardState<R>, key: &MutationKey) -> Result<(), MutationError> {
        if state.flag_in_flight(&key.id, key.action) {
            tracing::debug!(kind = %R::KIND, id = %key.id, action = %key.action, "rejected: flag already pending");
            return Err(MutationError::Busy {
                kind: R::KIND,
                id: key.id.clone(),
                action: key.action.as_str(),
            });
        }
        Ok(())
    }

    fn finish_optimistic(
        &self,
        key: &MutationKey,
        ticket: u64,
        outcome: Result<(), StoreError>,
    ) -> Result<(), MutationError> {
        match outcome {
            Ok(()) => {
                self.state
                    .lock()
                    .settle(key, ticket, MutationPhase::Confirmed, self.policy.history_limit)?;
                tracing::info!(kind = %R::KIND, id = %key.id, action = %key.action, ticket, "mutation confirmed");
                Ok(())
            }
            Err(source) => {
                {
                    let mut state = self.state.lock();
                    let restore =
                        state.settle(key, ticket, MutationPhase::RolledBack, self.policy.history_limit)?;
                    state.restore(&key.id, restore);
                }
                Err(self.report_failure(key, source, true))
            }
        }
    }

    fn report_failure(&self, key: &MutationKey, source: StoreError, rolled_back: bool) -> MutationError {
        tracing::warn!(
            kind = %R::KIND,
            id = %key.id,
            action = %key.action,
            rolled_back,
            error = %source,
            "remote mutation failed"
        );
        self.notices.error(key.action.failure_notice(R::KIND));
        let (kind, id, action) = (R::KIND, key.id.clone(), key.action.as_str());
        if rolled_back {
            MutationError::RolledBack { kind, id, action, source }
        } else {
            MutationError::Failed { kind, id, action, source }
        }
    }

    async fn call<T>(&self, fut: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        match self.policy.remote_timeout {
            Some(limit) if !limit.is_zero() => tokio::time::timeout(limit, fut)
                .await
                .unwrap_or(Err(StoreError::TimedOut(limit))),
            _ => fut.await,
        }
    }
}

fn not_found<R: Resource>(id: &ResourceId) -> MutationError {
    MutationError::NotFound {
        kind: R::KIND,
        id: id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SimulatedStore;
    use crate::types::{Service, ServicePatch};

    fn board() -> (ResourceBoard<Service>, Arc<SimulatedStore<Service>>) {
        let store = Arc::new(SimulatedStore::instant().with_rows(crate::demo::services()));
        let board = ResourceBoard::new(
            store.clone() as Arc<dyn RemoteStore<Service>>,
            MutationPolicy::default(),
            NoticeBoard::default(),
        )
        .with_items(crate::demo::services());
        (board, store)
    }

    fn id(raw: &str) -> ResourceId {
        ResourceId::new(raw)
    }

    #[tokio::test]
    async fn toggle_confirms_and_keeps_value() {
        let (board, store) = board();
        assert!(!board.toggle(&id("1")).await.unwrap());
        assert!(!board.get(&id("1")).unwrap().enabled);
        assert!(!store.get(&id("1")).unwrap().enabled);
        assert!(board.notices().errors().is_empty());
        assert_eq!(board.pending_count(), 0);
    }

    #[tokio::test]
    async fn toggle_failure_rolls_back() {
        let (board, store) = board();
        store.fail_next(1);
        let err = board.toggle(&id("1")).await.unwrap_err();
        assert!(matches!(err, MutationError::RolledBack { .. }));
        assert!(board.get(&id("1")).unwrap().enabled);
        assert_eq!(board.notices().errors().len(), 1);

        let trail = board.history().pop().unwrap();
        assert_eq!(
            trail.phases,
            vec![
                MutationPhase::Idle,
                MutationPhase::AppliedLocally,
                MutationPhase::RolledBack,
            ]
        );
    }

    #[tokio::test]
    async fn toggle_missing_resource() {
        let (board, _) = board();
        let err = board.toggle(&id("404")).await.unwrap_err();
        assert!(matches!(err, MutationError::NotFound { .. }));
        assert!(board.history().is_empty());
    }

    #[tokio::test]
    async fn edit_rollback_restores_touched_fields_only() {
        let (board, store) = board();
        store.fail_next(1);
        let patch = ServicePatch {
            title: Some("Renamed".to_string()),
            price: Some(1.0),
            ..ServicePatch::default()
        };
        assert!(board.edit(&id("2"), patch).await.is_err());
        let svc = board.get(&id("2")).unwrap();
        assert_eq!(svc.title, "SEO Optimization");
        assert_eq!(svc.price, 1200.0);
    }

    #[tokio::test]
    async fn empty_edit_is_rejected() {
        let (board, _) = board();
        let err = board.edit(&id("2"), ServicePatch::default()).await.unwrap_err();
        assert!(matches!(err, MutationError::EmptyPatch { .. }));
    }

    #[tokio::test]
    async fn create_prepends_and_confirms() {
        let (board, store) = board();
        let draft = Service::draft("Audit", "Security audit.", 900.0);
        let stored = board.create(draft.clone()).await.unwrap();
        assert_eq!(stored.id, draft.id);
        assert_eq!(board.snapshot()[0].id, draft.id);
        assert_eq!(board.len(), 4);
        assert!(store.get(&draft.id).is_some());
    }

    #[tokio::test]
    async fn create_duplicate_id_is_rejected() {
        let (board, _) = board();
        let mut draft = Service::draft("Dup", "Dup.", 1.0);
        draft.id = id("1");
        let err = board.create(draft).await.unwrap_err();
        assert!(matches!(err, MutationError::AlreadyExists { .. }));
        assert_eq!(board.len(), 3);
    }

    #[tokio::test]
    async fn delete_failure_keeps_row() {
        let (board, store) = board();
        store.fail_next(1);
        let err = board.delete(&id("3")).await.unwrap_err();
        assert!(matches!(err, MutationError::Failed { .. }));
        assert!(board.contains(&id("3")));
        assert_eq!(board.history().pop().unwrap().phase(), MutationPhase::Failed);
    }

    #[tokio::test]
    async fn load_replaces_rows() {
        let store = Arc::new(SimulatedStore::instant().with_rows(crate::demo::services()));
        let board = ResourceBoard::new(
            store as Arc<dyn RemoteStore<Service>>,
            MutationPolicy::default(),
            NoticeBoard::default(),
        );
        assert!(board.is_empty());
        assert_eq!(board.load().await.unwrap(), 3);
        assert_eq!(board.len(), 3);
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let store = Arc::new(SimulatedStore::instant().with_rows(crate::demo::services()));
        let policy = MutationPolicy {
            history_limit: 2,
            ..MutationPolicy::default()
        };
        let board = ResourceBoard::new(store as Arc<dyn RemoteStore<Service>>, policy, NoticeBoard::default())
            .with_items(crate::demo::services());
        for _ in 0..5 {
            board.toggle(&id("1")).await.unwrap();
        }
        let history = board.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].ticket, 5);
    }

    #[tokio::test]
    async fn zero_timeout_does_not_fail_every_call() {
        let store = Arc::new(SimulatedStore::instant().with_rows(crate::demo::services()));
        let policy = MutationPolicy::default().with_remote_timeout(Some(Duration::ZERO));
        assert_eq!(policy.remote_timeout, None);

        let board = ResourceBoard::new(store as Arc<dyn RemoteStore<Service>>, policy, NoticeBoard::default())
            .with_items(crate::demo::services());
        assert_eq!(board.toggle(&id("1")).await, Ok(false));
    }

    #[test]
    fn failure_notices_name_the_kind() {
        assert_eq!(
            Action::Toggle.failure_notice(ResourceKind::Service),
            "Failed to update service status."
        );
        assert_eq!(Action::Delete.failure_notice(ResourceKind::Post), "Failed to delete post.");
    }
}
