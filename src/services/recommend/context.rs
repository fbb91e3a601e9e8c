use std::path::PathBuf;

use crate::models::{Destination, PreferenceInput, UserHistory};

use super::{
    collaborative::collaborative_recommend,
    encoders::FeatureEncoders,
    loader::{load_destinations, load_encoders, load_history, load_model, DestinationTable, LoadError},
    model::{FeatureOrder, PopularityModel},
    popularity::predict_popularity,
    similarity::{RatingMatrix, SimilarityMatrix},
    RecommendError, RecommendParams,
};

/// Locations of the startup artifacts
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub destinations: PathBuf,
    pub history: PathBuf,
    pub encoders: PathBuf,
    pub model: PathBuf,
}

/// Read-only data behind both recommendation routines
///
/// Built once before serving and shared between requests; nothing in it
/// changes afterwards.
pub struct RecommenderContext {
    destinations: DestinationTable,
    ratings: RatingMatrix,
    similarity: SimilarityMatrix,
    encoders: FeatureEncoders,
    model: Box<dyn PopularityModel>,
    feature_order: FeatureOrder,
    params: RecommendParams,
}

impl RecommenderContext {
    /// Assembles a context, computing both matrices from the history
    pub fn new(
        destinations: DestinationTable,
        history: &[UserHistory],
        encoders: FeatureEncoders,
        model: Box<dyn PopularityModel>,
        feature_order: FeatureOrder,
        params: RecommendParams,
    ) -> Self {
        let ratings = RatingMatrix::from_history(history);
        let similarity = SimilarityMatrix::from_ratings(&ratings);

        tracing::info!(
            users = ratings.user_count(),
            rated_destinations = ratings.destination_count(),
            destinations = destinations.len(),
            encoded_features = encoders.len(),
            model = model.name(),
            "Recommender context ready"
        );

        Self {
            destinations,
            ratings,
            similarity,
            encoders,
            model,
            feature_order,
            params,
        }
    }

    /// Loads every artifact from disk and builds the context
    pub fn load(paths: &DataPaths, params: RecommendParams) -> Result<Self, LoadError> {
        let destinations = load_destinations(&paths.destinations)?;
        let history = load_history(&paths.history)?;
        let encoders = load_encoders(&paths.encoders)?;
        let (model, feature_order) = load_model(&paths.model)?;
        Ok(Self::new(
            destinations,
            &history,
            encoders,
            model,
            feature_order,
            params,
        ))
    }

    /// Collaborative-filtering picks for a 1-based user id
    pub fn recommend_for(&self, user_id: i64) -> Result<Vec<Destination>, RecommendError> {
        collaborative_recommend(
            user_id,
            &self.similarity,
            &self.ratings,
            &self.destinations,
            self.params,
        )
    }

    /// Popularity estimate for a trip scenario
    pub fn predict(&self, input: &PreferenceInput) -> Result<f64, RecommendError> {
        predict_popularity(input, self.model.as_ref(), &self.encoders, &self.feature_order)
    }

    pub fn destinations(&self) -> &DestinationTable {
        &self.destinations
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}
