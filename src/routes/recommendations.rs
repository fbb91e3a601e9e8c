use axum::{extract::State, Extension, Json};

use crate::{
    api::AppState,
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::{PreferenceInput, RecommendationResponse},
    services::recommendations,
};

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
    Json(preferences): Json<PreferenceInput>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = user.session.account_id,
        "Processing recommendation request"
    );

    let response = recommendations::get_recommendations(
        &state.recommender,
        user.session.account_id,
        &preferences,
    )?;

    Ok(Json(response))
}
