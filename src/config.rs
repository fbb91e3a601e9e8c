use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::services::recommend::{DataPaths, RecommendParams, DEFAULT_LIMIT, DEFAULT_NEIGHBOURS};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Redis connection URL; sessions stay in memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Destinations reference table (CSV)
    #[serde(default = "default_destinations_path")]
    pub destinations_path: PathBuf,

    /// User rating history (CSV)
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Label-encoder vocabularies (JSON)
    #[serde(default = "default_encoders_path")]
    pub encoders_path: PathBuf,

    /// Popularity model artifact (JSON)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Similar users averaged by collaborative filtering
    #[serde(default = "default_neighbours")]
    pub neighbours: usize,

    /// Destinations returned by collaborative filtering
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// PBKDF2 rounds for new password hashes
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

fn default_database_url() -> String {
    "sqlite://wayfarer.db?mode=rwc".to_string()
}

fn default_destinations_path() -> PathBuf {
    PathBuf::from("data/destinations.csv")
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/user_history.csv")
}

fn default_encoders_path() -> PathBuf {
    PathBuf::from("data/label_encoders.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("data/model.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_neighbours() -> usize {
    DEFAULT_NEIGHBOURS
}

fn default_recommendation_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

fn default_password_iterations() -> u32 {
    600_000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths {
            destinations: self.destinations_path.clone(),
            history: self.history_path.clone(),
            encoders: self.encoders_path.clone(),
            model: self.model_path.clone(),
        }
    }

    pub fn recommend_params(&self) -> RecommendParams {
        RecommendParams {
            neighbours: self.neighbours,
            limit: self.recommendation_limit,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
