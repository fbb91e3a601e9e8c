use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::AppState,
    error::AppResult,
    models::{GroupResponse, NewTrip, TripRegistration, TripRequest},
    services::trips,
};

/// Handler for saving a traveller's trip details
pub async fn save(
    State(state): State<AppState>,
    Json(request): Json<TripRequest>,
) -> AppResult<(StatusCode, Json<TripRegistration>)> {
    let trip = NewTrip::try_from(request)?;
    let registration = trips::save_trip(&state.db_pool, trip).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Handler listing the travel group for a destination
pub async fn group(
    State(state): State<AppState>,
    Path(destination): Path<String>,
) -> AppResult<Json<GroupResponse>> {
    let travellers = trips::group_for(&state.db_pool, &destination).await?;
    Ok(Json(GroupResponse {
        destination,
        travellers,
    }))
}
