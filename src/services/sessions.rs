use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::AppResult, models::Session};

/// Storage for logged-in sessions keyed by opaque token
///
/// Backends must drop sessions once their time-to-live has passed.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a session for `ttl`
    async fn insert(&self, token: Uuid, session: Session, ttl: Duration) -> AppResult<()>;

    /// Looks up a live session
    async fn get(&self, token: Uuid) -> AppResult<Option<Session>>;

    /// Removes a session; removing an unknown token is not an error
    async fn remove(&self, token: Uuid) -> AppResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Process-local session store
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, (Session, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: Uuid, session: Session, ttl: Duration) -> AppResult<()> {
        let expires_at = Instant::now() + ttl;
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, expiry)| *expiry > Instant::now());
        sessions.insert(token, (session, expires_at));
        Ok(())
    }

    async fn get(&self, token: Uuid) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&token)
            .filter(|(_, expiry)| *expiry > Instant::now())
            .map(|(session, _)| session.clone()))
    }

    async fn remove(&self, token: Uuid) -> AppResult<()> {
        self.sessions.write().await.remove(&token);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Starts a session for an authenticated account and returns its token
pub async fn start_session(
    store: &dyn SessionStore,
    session: Session,
    ttl: Duration,
) -> AppResult<Uuid> {
    let token = Uuid::new_v4();
    let account_id = session.account_id;
    store.insert(token, session, ttl).await?;
    tracing::info!(account_id, backend = store.name(), "Session started");
    Ok(token)
}
