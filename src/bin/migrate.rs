//! Applies the embedded schema migrations to `DATABASE_URL`.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cashbook::config::DatabaseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = DatabaseConfig::from_env().context("loading database configuration")?;
    database.validate().context("validating database configuration")?;

    let pool = database
        .create_pool()
        .await
        .context("connecting to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("applying migrations")?;

    tracing::info!("Migrations applied");
    Ok(())
}
