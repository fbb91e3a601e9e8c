use std::{fmt::Display, time::Duration};

use redis::{AsyncCommands, Client};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Session,
    services::sessions::SessionStore,
};

/// Redis key for a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(pub Uuid);

impl Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Creates a Redis client for session storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Session store backed by Redis key expiry
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_client: Client,
}

impl RedisSessionStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, token: Uuid, session: Session, ttl: Duration) -> AppResult<()> {
        let json = serde_json::to_string(&session)
            .map_err(|e| AppError::Internal(format!("Session serialization error: {}", e)))?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(SessionKey(token).to_string(), json, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    async fn get(&self, token: Uuid) -> AppResult<Option<Session>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(SessionKey(token).to_string()).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis session lookup failed");
            e
        })?;

        match stored {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Session deserialization error: {}", e))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: Uuid) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(SessionKey(token).to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
