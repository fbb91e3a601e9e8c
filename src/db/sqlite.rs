use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Creates a SQLite connection pool and applies pending migrations
///
/// In-memory databases are private to each connection, so they get a
/// single connection that is never recycled.
pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let max_connections = if in_memory { 1 } else { 5 };

    let mut options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        options = options.idle_timeout(None).max_lifetime(None);
    }
    let pool = options.connect(database_url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(max_connections, "Database ready");

    Ok(pool)
}
