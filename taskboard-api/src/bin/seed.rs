//! Recreates the demo account
//!
//! Signs in as `test@example.com` / `Test@123` afterwards.
//!
//! ```bash
//! cargo run -p taskboard-api --bin taskboard-seed
//! ```

use anyhow::Context;
use taskboard_api::config::Config;
use taskboard_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool},
    seed::{seed_demo_data, DEMO_EMAIL},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_shared=info,taskboard_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = create_pool(config.database.clone())
        .await
        .context("Failed to connect to the database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let summary = seed_demo_data(&pool).await.context("Seeding failed")?;

    tracing::info!(
        email = DEMO_EMAIL,
        projects = summary.projects_created,
        tasks = summary.tasks_created,
        replaced = summary.replaced_existing_user,
        "Database seeded successfully"
    );

    close_pool(pool).await;
    Ok(())
}
