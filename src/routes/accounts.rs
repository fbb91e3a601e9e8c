use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::AppState,
    error::AppResult,
    middleware::CurrentUser,
    models::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest, Session},
    services::{accounts, sessions::start_session},
};

/// Handler for account registration
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = accounts::register(&state.db_pool, &state.password_hasher, request).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// Handler for login; issues a bearer session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = accounts::authenticate(
        &state.db_pool,
        &state.password_hasher,
        request.email.as_deref(),
        request.password.as_deref(),
    )
    .await?;

    let token = start_session(
        state.sessions.as_ref(),
        Session::from(&account),
        state.session_ttl,
    )
    .await?;

    Ok(Json(LoginResponse {
        token: token.to_string(),
        user_id: account.id,
        username: account.username,
    }))
}

/// Handler for logout
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> AppResult<StatusCode> {
    state.sessions.remove(user.token).await?;
    tracing::info!(account_id = user.session.account_id, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}
