use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Open the connection pool.
///
/// The API is read-heavy and holds a connection only for the span of one
/// handler, so the pool stays small. SQLx query logging is off; request
/// tracing happens at the HTTP layer instead.
///
/// # Errors
///
/// Returns an error when the database is unreachable.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(16)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Ok(Database::connect(options).await?)
}
