use serde::{Deserialize, Serialize};

/// Registered user account
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Authenticated user attached to a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub account_id: i64,
    pub username: String,
}

impl From<&Account> for Session {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username.clone(),
        }
    }
}
