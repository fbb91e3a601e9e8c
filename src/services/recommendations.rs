use crate::{
    error::AppResult,
    models::{PreferenceInput, RecommendationResponse},
    services::recommend::RecommenderContext,
};

/// Builds the recommendation page payload for a logged-in user
///
/// Collaborative filtering runs on the user's rating-history row, and the
/// submitted trip scenario gets a popularity estimate. Either failure fails
/// the request.
pub fn get_recommendations(
    context: &RecommenderContext,
    user_id: i64,
    preferences: &PreferenceInput,
) -> AppResult<RecommendationResponse> {
    let recommended_destinations = context.recommend_for(user_id)?;
    let predicted_popularity = context.predict(preferences)?;

    tracing::info!(
        user_id,
        recommended = recommended_destinations.len(),
        predicted_popularity,
        "Recommendations computed"
    );

    Ok(RecommendationResponse {
        recommended_destinations,
        predicted_popularity,
    })
}
