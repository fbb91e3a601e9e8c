use std::{sync::Arc, time::Duration};

use sqlx::SqlitePool;

use crate::services::{PasswordHasher, RecommenderContext, SessionStore};

/// Shared application state
///
/// Everything here is either immutable after startup or internally
/// synchronised, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub sessions: Arc<dyn SessionStore>,
    pub recommender: Arc<RecommenderContext>,
    pub password_hasher: PasswordHasher,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        sessions: Arc<dyn SessionStore>,
        recommender: Arc<RecommenderContext>,
        password_hasher: PasswordHasher,
        session_ttl: Duration,
    ) -> Self {
        Self {
            db_pool,
            sessions,
            recommender,
            password_hasher,
            session_ttl,
        }
    }
}
