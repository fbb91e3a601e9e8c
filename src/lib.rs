//! Travel destination recommendation service.
//!
//! Accounts, sessions and trip-group registration are plain CRUD over SQLite;
//! the interesting part lives in [`services::recommend`], which serves
//! collaborative-filtering picks and popularity estimates from data loaded
//! once at startup.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
