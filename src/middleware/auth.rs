use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::{api::AppState, error::AppError, models::Session};

const LOGIN_REQUIRED: &str = "Please log in first";

/// Logged-in user resolved from an `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub token: Uuid,
    pub session: Session,
}

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;

        match state.sessions.get(token).await? {
            Some(session) => Ok(CurrentUser { token, session }),
            None => Err(AppError::Unauthorized(LOGIN_REQUIRED.to_string())),
        }
    }
}
