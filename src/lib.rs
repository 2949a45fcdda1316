pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{error, info};

use config::fixtures::FixtureSet;
use config::{Action, Settings};

pub use db::seed::{load_fixtures, SeedReport};
pub use error::SeedError;

// Run one subcommand against an already-open pool
pub async fn run_with_pool(pool: &SqlitePool, action: &Action) -> Result<()> {
    match action {
        Action::Migrate => {
            db::migrate(pool).await?;
            info!("Schema applied");
        }
        Action::Seed { fixtures, migrate } => {
            if *migrate {
                db::migrate(pool).await?;
                info!("Schema applied");
            }

            let fixtures = FixtureSet::load(fixtures.as_deref())?;
            info!("Starting database seed");
            let report = load_fixtures(pool, &fixtures)
                .await
                .context("Seed failed")?;

            if report.admin_preserved {
                info!(email = %fixtures.reserved_admin, "Reserved administrator preserved");
            }
            info!("Database seeded successfully");

            // Development fixtures only: printed for convenience, never logged
            for user in &fixtures.users {
                println!(
                    "{} ({}): {} / {}",
                    user.name,
                    user.role.as_str(),
                    user.email,
                    user.password
                );
            }
        }
        Action::Verify { fixtures } => {
            let fixtures = FixtureSet::load(fixtures.as_deref())?;
            let verification = db::verify(pool, &fixtures).await?;

            for (table, count) in verification.actual.iter() {
                println!("{:<12} {}", table, count);
            }

            if !verification.admin_present {
                error!(email = %fixtures.reserved_admin, "Reserved administrator is missing");
            }
            for (table, expected, actual) in verification.mismatches() {
                error!(table, expected, actual, "Row count mismatch");
            }
            if !verification.is_ok() {
                anyhow::bail!("Database does not match the fixture set");
            }
            info!("Data verification completed successfully");
        }
    }

    Ok(())
}

/// Open the configured database, run the requested action and close the pool
/// whether or not the action succeeded.
pub async fn run(settings: &Settings) -> Result<()> {
    let pool = db::connect(&settings.database_url).await?;
    let result = run_with_pool(&pool, &settings.action).await;
    pool.close().await;
    result
}
