use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wayfarer_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, create_redis_client, RedisSessionStore},
    services::{InMemorySessionStore, PasswordHasher, RecommenderContext, SessionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db_pool = create_pool(&config.database_url)
        .await
        .context("Failed to open database")?;

    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisSessionStore::new(create_redis_client(url)?)),
        None => Arc::new(InMemorySessionStore::new()),
    };
    tracing::info!(backend = sessions.name(), "Session store ready");

    let paths = config.data_paths();
    let params = config.recommend_params();
    let recommender = tokio::task::spawn_blocking(move || RecommenderContext::load(&paths, params))
        .await?
        .context("Failed to load recommendation data")?;

    let state = AppState::new(
        db_pool,
        sessions,
        Arc::new(recommender),
        PasswordHasher::new(config.password_iterations),
        config.session_ttl(),
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
