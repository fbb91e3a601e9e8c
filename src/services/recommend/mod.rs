//! Destination recommendation core
//!
//! Two independent routines share the data loaded once at startup:
//! collaborative filtering over the user rating history, and popularity
//! prediction from label-encoded trip preferences. Everything here is
//! synchronous and read-only after construction.

use thiserror::Error;

use crate::models::Feature;

mod collaborative;
mod context;
mod encoders;
mod loader;
mod model;
mod popularity;
mod similarity;

pub use collaborative::{collaborative_recommend, nearest_neighbours, rank_destinations};
pub use context::{DataPaths, RecommenderContext};
pub use encoders::{FeatureEncoders, LabelEncoder};
pub use loader::{
    load_destinations, load_encoders, load_history, load_model, read_destinations, read_history,
    DestinationTable, LoadError,
};
pub use model::{
    Estimator, FeatureOrder, LinearModel, ModelArtifact, PopularityModel, RandomForest,
    RegressionTree, TreeArrays,
};
pub use popularity::{encode_preferences, predict_popularity};
pub use similarity::{cosine_similarity, RatingMatrix, SimilarityMatrix};

#[cfg(test)]
pub use model::MockPopularityModel;

/// Number of most similar users whose ratings are averaged
pub const DEFAULT_NEIGHBOURS: usize = 5;
/// Number of destinations returned by collaborative filtering
pub const DEFAULT_LIMIT: usize = 10;

/// Request-time failures of the recommendation core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Unknown user {user_id}: ratings exist for {known_users} users")]
    UnknownUser { user_id: i64, known_users: usize },

    #[error("Unknown {feature} value '{label}'")]
    UnseenLabel { feature: Feature, label: String },

    #[error("{} must be {}, got '{}'", .feature, expected_number(.feature), .value)]
    Coercion { feature: Feature, value: String },

    #[error("Model error: {0}")]
    Model(String),
}

fn expected_number(feature: &Feature) -> &'static str {
    if feature.is_count() {
        "a whole number"
    } else {
        "a number"
    }
}

/// Tunables for collaborative filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendParams {
    pub neighbours: usize,
    pub limit: usize,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            neighbours: DEFAULT_NEIGHBOURS,
            limit: DEFAULT_LIMIT,
        }
    }
}
