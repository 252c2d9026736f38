// src/database.rs
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use crate::config::DatabaseConfig;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name);

    PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

/// Apply the embedded migrations, creating the `products` table on first run.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
