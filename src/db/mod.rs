// Database connection, schema and inspection helpers

pub mod seed;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::fixtures::FixtureSet;

const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");

// Open a pool on the given sqlite URL, creating the file if needed
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database url: {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    // Single long-lived connection: an in-memory database lives exactly as long as it does
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

// Apply the bundled schema; safe to run repeatedly
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(INITIAL_SCHEMA)
        .execute(pool)
        .await
        .context("Failed to run migration 001")?;

    Ok(())
}

/// Row counts of the fixture tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub users: i64,
    pub categories: i64,
    pub artisans: i64,
    pub products: i64,
    pub banners: i64,
    pub coupons: i64,
}

impl TableCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> {
        [
            ("users", self.users),
            ("categories", self.categories),
            ("artisans", self.artisans),
            ("products", self.products),
            ("banners", self.banners),
            ("coupons", self.coupons),
        ]
        .into_iter()
    }
}

async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64> {
    // Table names come from the fixed list in TableCounts, never from input
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to count rows in {}", table))?;

    Ok(count)
}

pub async fn table_counts(pool: &SqlitePool) -> Result<TableCounts> {
    Ok(TableCounts {
        users: count_rows(pool, "users").await?,
        categories: count_rows(pool, "categories").await?,
        artisans: count_rows(pool, "artisans").await?,
        products: count_rows(pool, "products").await?,
        banners: count_rows(pool, "banners").await?,
        coupons: count_rows(pool, "coupons").await?,
    })
}

// Find a user's (id, password_hash, role) by email
pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<(String, String, String)>> {
    let row: Option<(String, String, String)> =
        sqlx::query_as("SELECT id, password_hash, role FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

    Ok(row)
}

/// Outcome of comparing the live store with a fixture set.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub expected: TableCounts,
    pub actual: TableCounts,
    pub admin_present: bool,
}

impl Verification {
    pub fn is_ok(&self) -> bool {
        self.admin_present && self.expected == self.actual
    }

    /// Tables whose row count differs, as (table, expected, actual).
    pub fn mismatches(&self) -> Vec<(&'static str, i64, i64)> {
        self.expected
            .iter()
            .zip(self.actual.iter())
            .filter(|((_, expected), (_, actual))| expected != actual)
            .map(|((table, expected), (_, actual))| (table, expected, actual))
            .collect()
    }
}

pub async fn verify(pool: &SqlitePool, fixtures: &FixtureSet) -> Result<Verification> {
    let actual = table_counts(pool).await?;
    let admin_present = get_user_by_email(pool, &fixtures.reserved_admin)
        .await?
        .is_some();

    Ok(Verification {
        expected: fixtures.expected_counts(),
        actual,
        admin_present,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_mismatches() {
        let expected = TableCounts {
            users: 2,
            categories: 6,
            artisans: 4,
            products: 5,
            banners: 3,
            coupons: 3,
        };
        let actual = TableCounts {
            products: 4,
            ..expected
        };

        let verification = Verification {
            expected,
            actual,
            admin_present: true,
        };
        assert!(!verification.is_ok());
        assert_eq!(verification.mismatches(), vec![("products", 5, 4)]);

        let clean = Verification {
            expected,
            actual: expected,
            admin_present: true,
        };
        assert!(clean.is_ok());
        assert!(clean.mismatches().is_empty());
    }

    #[test]
    fn test_missing_admin_fails_verification() {
        let verification = Verification {
            expected: TableCounts::default(),
            actual: TableCounts::default(),
            admin_present: false,
        };
        assert!(!verification.is_ok());
    }
}
