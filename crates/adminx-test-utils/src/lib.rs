//! Testing utilities for the AdminX workspace
//!
//! Scripted doubles for the two collaborators plus console fixtures.

#![allow(missing_docs)]

use adminx_access::Role;
use adminx_core::{
    demo, Console, ConsoleConfig, GenerationError, LatencyProfile, MutationPolicy, NoticeBoard, Patch, PromptKind,
    RemoteStore, Resource, ResourceBoard, ResourceId, StoreError, Stores, TextGenerator,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub use adminx_core::demo::{current_user, leads, posts, services, users};

/// Outcome and latency of one scripted store call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub delay: Duration,
    pub succeed: bool,
}

impl Step {
    #[must_use]
    pub fn ok(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            succeed: true,
        }
    }

    #[must_use]
    pub fn fail(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            succeed: false,
        }
    }
}

/// One recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub id: Option<ResourceId>,
    pub patch: Option<String>,
}

/// Store whose call outcomes are scripted in order
///
/// Successful writes land in the durable rows when the call starts; the
/// reply is delayed by the step's latency. Calls beyond the script succeed
/// after the default latency.
#[derive(Debug)]
pub struct ScriptedStore<R: Resource> {
    rows: Mutex<Vec<R>>,
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
    default_delay: Duration,
    started: Arc<Notify>,
}

impl<R: Resource> ScriptedStore<R> {
    #[must_use]
    pub fn new(rows: impl IntoIterator<Item = R>) -> Self {
        Self {
            rows: Mutex::new(rows.into_iter().collect()),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            default_delay: Duration::from_millis(100),
            started: Arc::new(Notify::new()),
        }
    }

    #[must_use]
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Queue outcomes for the next calls
    pub fn script(&self, steps: impl IntoIterator<Item = Step>) {
        self.script.lock().extend(steps);
    }

    /// Signalled once per call, as soon as it reaches the store
    #[must_use]
    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Durable copy of one row
    #[must_use]
    pub fn row(&self, id: &ResourceId) -> Option<R> {
        self.rows.lock().iter().find(|r| r.id() == id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    fn begin(&self, op: &'static str, id: Option<&ResourceId>, patch: Option<String>) -> Step {
        let step = self.script.lock().pop_front().unwrap_or(Step {
            delay: self.default_delay,
            succeed: true,
        });
        self.calls.lock().push(Call {
            op,
            id: id.cloned(),
            patch,
        });
        self.started.notify_one();
        step
    }

    async fn finish(step: Step) -> Result<(), StoreError> {
        tokio::time::sleep(step.delay).await;
        if step.succeed {
            Ok(())
        } else {
            Err(StoreError::failed("scripted failure"))
        }
    }
}

#[async_trait]
impl<R: Resource> RemoteStore<R> for ScriptedStore<R> {
    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let step = self.begin("list", None, None);
        let rows = self.rows.lock().clone();
        Self::finish(step).await?;
        Ok(rows)
    }

    async fn create(&self, draft: R) -> Result<R, StoreError> {
        let step = self.begin("create", Some(draft.id()), None);
        if step.succeed {
            self.rows.lock().push(draft.clone());
        }
        Self::finish(step).await?;
        Ok(draft)
    }

    async fn update(&self, id: &ResourceId, patch: &R::Patch) -> Result<(), StoreError> {
        let step = self.begin("update", Some(id), serde_json::to_string(patch).ok());
        if step.succeed {
            let mut rows = self.rows.lock();
            if let Some(row) = rows.iter_mut().find(|r| r.id() == id) {
                patch.apply_to(row);
            }
        }
        Self::finish(step).await
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), StoreError> {
        let step = self.begin("delete", Some(id), None);
        if step.succeed {
            self.rows.lock().retain(|r| r.id() != id);
        }
        Self::finish(step).await
    }
}

/// Generator replying from a queue
///
/// `Err` entries fail with [`GenerationError::Failed`]. Once the queue is
/// empty it echoes `"{kind}: {input}"`.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<(PromptKind, String)>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_replies(replies: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every `(kind, input)` received
    #[must_use]
    pub fn prompts(&self) -> Vec<(PromptKind, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, kind: PromptKind, input: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push((kind, input.to_string()));
        match self.replies.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(GenerationError::Failed(message)),
            None => Ok(format!("{kind}: {input}")),
        }
    }
}

/// Config with zero simulated latency
#[must_use]
pub fn quiet_config() -> ConsoleConfig {
    ConsoleConfig::new().with_latency(LatencyProfile::zero())
}

/// Board over `store`, seeded with the store's current rows
#[must_use]
pub fn board_over<R: Resource>(store: &Arc<ScriptedStore<R>>, policy: MutationPolicy) -> ResourceBoard<R> {
    let rows = store.rows.lock().clone();
    ResourceBoard::new(Arc::clone(store) as Arc<dyn RemoteStore<R>>, policy, NoticeBoard::default()).with_items(rows)
}

/// Scripted stores holding the demo dataset, kept for later inspection
#[derive(Debug, Clone)]
pub struct ScriptedStores {
    pub services: Arc<ScriptedStore<adminx_core::Service>>,
    pub posts: Arc<ScriptedStore<adminx_core::Post>>,
    pub leads: Arc<ScriptedStore<adminx_core::Lead>>,
    pub users: Arc<ScriptedStore<adminx_core::User>>,
}

impl ScriptedStores {
    #[must_use]
    pub fn demo() -> Self {
        Self {
            services: Arc::new(ScriptedStore::new(demo::services())),
            posts: Arc::new(ScriptedStore::new(demo::posts())),
            leads: Arc::new(ScriptedStore::new(demo::leads())),
            users: Arc::new(ScriptedStore::new(demo::users())),
        }
    }

    #[must_use]
    pub fn as_stores(&self) -> Stores {
        Stores {
            services: Arc::clone(&self.services) as Arc<dyn RemoteStore<adminx_core::Service>>,
            posts: Arc::clone(&self.posts) as Arc<dyn RemoteStore<adminx_core::Post>>,
            leads: Arc::clone(&self.leads) as Arc<dyn RemoteStore<adminx_core::Lead>>,
            users: Arc::clone(&self.users) as Arc<dyn RemoteStore<adminx_core::User>>,
        }
    }
}

/// Console for `role` over scripted stores and generator
pub async fn setup_console(role: Role, generator: Arc<ScriptedGenerator>) -> (Console, ScriptedStores) {
    let stores = ScriptedStores::demo();
    let console = Console::new(
        adminx_core::Session::start(current_user(role)),
        stores.as_stores(),
        generator,
        quiet_config(),
    );
    console
        .load_all()
        .await
        .unwrap_or_else(|e| panic!("demo load failed: {e}"));
    (console, stores)
}
