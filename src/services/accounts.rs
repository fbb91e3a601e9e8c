use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{Account, RegisterRequest},
    services::{password::PasswordHasher, required},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, username, email, password_hash FROM accounts WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

/// Registers a new account with a hashed password
///
/// Fails with `Conflict` when the email or username is already taken.
pub async fn register(
    pool: &SqlitePool,
    hasher: &PasswordHasher,
    request: RegisterRequest,
) -> AppResult<Account> {
    let username = required("username", &request.username)?;
    let email = required("email", &request.email)?;
    if request.password.is_empty() {
        return Err(AppError::InvalidInput("password is required".to_string()));
    }

    if find_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict(
            "Email already registered, please log in".to_string(),
        ));
    }

    let password_hash = hasher.spawn_hash(request.password).await?;
    let result = sqlx::query(
        "INSERT INTO accounts (username, email, password_hash) VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .execute(pool)
    .await
    .map_err(|e| {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            AppError::Conflict("Username or email already registered".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    let account = Account {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
    };
    tracing::info!(account_id = account.id, "Account registered");

    Ok(account)
}

/// Checks credentials, returning the matching account
///
/// Unknown emails and wrong passwords produce the same error.
pub async fn authenticate(
    pool: &SqlitePool,
    hasher: &PasswordHasher,
    email: Option<&str>,
    password: Option<&str>,
) -> AppResult<Account> {
    let (Some(email), Some(password)) = (
        email.map(str::trim).filter(|e| !e.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::InvalidInput(
            "Please fill in all fields".to_string(),
        ));
    };

    if let Some(account) = find_by_email(pool, email).await? {
        if hasher
            .spawn_verify(password.to_string(), account.password_hash.clone())
            .await?
        {
            return Ok(account);
        }
    }

    tracing::warn!("Rejected login attempt");
    Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
}
