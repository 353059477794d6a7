use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::{ActiveAthleteSelection, AthleteId, RoleAssignment, RosterEntry};

/// Role-subscription collaborator: pushes the signed-in identity's role
/// set whenever it changes server-side. Each new subscription is
/// restartable and starts from current state.
#[async_trait]
pub trait RoleFeed: Send + Sync {
    async fn subscribe(&self) -> BoxStream<'static, RoleAssignment>;
}

/// Client-local scoped key-value store holding the persisted copy of the
/// active-athlete selection. Keyed per signed-in identity, never shared
/// across identities.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&self, key: &str, value: Value);
    fn remove(&self, key: &str);
}

/// In-memory `LocalStore` for tests and embedders without platform
/// storage.
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().expect("local store lock poisoned").get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) {
        self.entries
            .lock()
            .expect("local store lock poisoned")
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("local store lock poisoned").remove(key);
    }
}

/// `RoleFeed` backed by a `tokio::sync::watch` channel. Doubles as the
/// in-process feed for embedders that receive role pushes elsewhere.
pub struct WatchRoleFeed {
    tx: watch::Sender<RoleAssignment>,
}

impl WatchRoleFeed {
    pub fn new(initial: RoleAssignment) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn push(&self, assignment: RoleAssignment) {
        self.tx.send_replace(assignment);
    }
}

#[async_trait]
impl RoleFeed for WatchRoleFeed {
    async fn subscribe(&self) -> BoxStream<'static, RoleAssignment> {
        let rx = self.tx.subscribe();
        // Yield the current state first, then every subsequent change.
        Box::pin(futures::stream::unfold(
            (rx, true),
            |(mut rx, first)| async move {
                if first {
                    let current = rx.borrow_and_update().clone();
                    return Some((current, (rx, false)));
                }
                match rx.changed().await {
                    Ok(()) => {
                        let next = rx.borrow_and_update().clone();
                        Some((next, (rx, false)))
                    }
                    Err(_) => None,
                }
            },
        ))
    }
}

enum ResolverState {
    Unresolved,
    Resolved(RoleAssignment),
}

struct ResolverInner {
    user_id: String,
    state: RwLock<ResolverState>,
    selection: RwLock<Option<ActiveAthleteSelection>>,
    version: AtomicU64,
    local: Arc<dyn LocalStore>,
}

impl ResolverInner {
    fn selection_key(&self) -> String {
        format!("active-athlete/{}", self.user_id)
    }

    fn bump_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies one subscription delivery. A delivery without coach or
    /// admin clears any selection and removes its persisted copy before
    /// this call returns, so no stale selection is observable afterwards.
    async fn apply_assignment(&self, assignment: RoleAssignment) {
        let revoked = !assignment.can_coach();
        *self.state.write().await = ResolverState::Resolved(assignment);
        if revoked {
            let mut selection = self.selection.write().await;
            if selection.take().is_some() {
                self.bump_version();
                info!(user = %self.user_id, "coach access revoked, selection cleared");
            }
            self.local.remove(&self.selection_key());
        }
    }
}

/// Single authority for "who is the caller" and "whose data are we
/// operating on". The UI queries this instead of inspecting role claims
/// itself. The resolver supplies the intended scope only; actual data
/// authorization stays with the persistence layer.
#[derive(Clone)]
pub struct RoleResolver {
    inner: Arc<ResolverInner>,
}

impl RoleResolver {
    /// Resolver for a freshly signed-in identity, starting unresolved. A
    /// selection previously persisted under this identity's key is
    /// restored; the first role delivery clears it again if coach access
    /// is gone.
    pub fn new(user_id: &str, local: Arc<dyn LocalStore>) -> Self {
        let key = format!("active-athlete/{user_id}");
        let restored: Option<ActiveAthleteSelection> = local
            .get(&key)
            .and_then(|value| serde_json::from_value(value).ok());
        let version = restored.as_ref().map_or(0, |s| s.version);
        Self {
            inner: Arc::new(ResolverInner {
                user_id: user_id.to_string(),
                state: RwLock::new(ResolverState::Unresolved),
                selection: RwLock::new(restored),
                version: AtomicU64::new(version),
                local,
            }),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.inner.user_id
    }

    /// Current roles, or `None` while unresolved (or after sign-out).
    pub async fn roles(&self) -> Option<RoleAssignment> {
        match &*self.inner.state.read().await {
            ResolverState::Unresolved => None,
            ResolverState::Resolved(assignment) => Some(assignment.clone()),
        }
    }

    pub async fn can_coach(&self) -> bool {
        self.roles().await.is_some_and(|a| a.can_coach())
    }

    /// Applies a role delivery. Exposed so embedders without a push
    /// channel can feed deliveries by hand; `watch` drives this from a
    /// `RoleFeed`.
    pub async fn apply_assignment(&self, assignment: RoleAssignment) {
        self.inner.apply_assignment(assignment).await;
    }

    /// Consumes a feed on a background task until the feed ends or the
    /// handle is aborted.
    pub fn watch(&self, feed: Arc<dyn RoleFeed>) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let mut stream = feed.subscribe().await;
            while let Some(assignment) = stream.next().await {
                debug!(user = %inner.user_id, roles = assignment.roles.len(), "role delivery");
                inner.apply_assignment(assignment).await;
            }
        })
    }

    /// Back to unresolved, dropping the in-memory selection. The
    /// persisted copy stays under this identity's key; only role
    /// revocation or an explicit clear removes it.
    pub async fn sign_out(&self) {
        *self.inner.state.write().await = ResolverState::Unresolved;
        let mut selection = self.inner.selection.write().await;
        if selection.take().is_some() {
            self.inner.bump_version();
        }
        info!(user = %self.inner.user_id, "signed out");
    }

    /// Points the session at another athlete's data scope. Coach or admin
    /// only; overwrites any previous selection and bumps the version so
    /// dependent fetchers re-fetch.
    pub async fn set_active_athlete(
        &self,
        entry: RosterEntry,
    ) -> Result<ActiveAthleteSelection, CoreError> {
        if !self.can_coach().await {
            return Err(CoreError::Permission);
        }
        let version = self.inner.bump_version();
        let selection = ActiveAthleteSelection::from_entry(entry, version);
        *self.inner.selection.write().await = Some(selection.clone());
        self.inner
            .local
            .put(&self.inner.selection_key(), serde_json::to_value(&selection)?);
        info!(user = %self.inner.user_id, athlete = %selection.athlete_id, version, "active athlete set");
        Ok(selection)
    }

    /// Drops the selection unconditionally, removing the persisted copy.
    pub async fn clear_active_athlete(&self) {
        let mut selection = self.inner.selection.write().await;
        if selection.take().is_some() {
            self.inner.bump_version();
        }
        self.inner.local.remove(&self.inner.selection_key());
        info!(user = %self.inner.user_id, "active athlete cleared");
    }

    pub async fn selection(&self) -> Option<ActiveAthleteSelection> {
        self.inner.selection.read().await.clone()
    }

    /// Current value of the mutation counter. Dependents re-fetch
    /// whenever this moves.
    pub fn selection_version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }

    /// Whose data the session operates on: the selected athlete when a
    /// selection is active, otherwise the signed-in identity itself.
    pub async fn target_athlete(&self) -> AthleteId {
        match &*self.inner.selection.read().await {
            Some(selection) => selection.athlete_id.clone(),
            None => AthleteId::new(&*self.inner.user_id),
        }
    }
}
