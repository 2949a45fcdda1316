// Declarative fixture set loaded from YAML

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::db::TableCounts;
use crate::error::SeedError;

const EMBEDDED_FIXTURES: &str = include_str!("../../fixtures/storefront.yml");

/// English/Hindi text pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Localized {
    pub en: String,
    pub hi: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Customer => "customer",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserFixture {
    pub id: String,
    pub email: String,
    /// Plaintext fixture password; hashed before it reaches the database.
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryFixture {
    pub slug: String,
    pub name: Localized,
    pub description: Localized,
    pub image: String,
    pub display_order: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub village: String,
    pub district: String,
    pub state: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArtisanFixture {
    pub slug: String,
    pub name: String,
    pub bio: Localized,
    pub location: Location,
    pub avatar: String,
    #[serde(default)]
    pub specializations: Vec<String>,
    pub experience_years: i64,
    pub rating: f64,
    pub total_products: i64,
    #[serde(default = "default_true")]
    pub verified: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductFixture {
    pub slug: String,
    pub title: Localized,
    pub description: Localized,
    pub price: f64,
    pub original_price: f64,
    pub discount_percentage: i64,
    pub sku: String,
    pub stock: i64,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub new_arrival: bool,
    pub rating: f64,
    pub review_count: i64,
    /// Category slug
    pub category: String,
    /// Artisan slug
    pub artisan: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    #[serde(rename = "HERO")]
    Hero,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerKind::Hero => "HERO",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BannerFixture {
    pub title: Localized,
    pub subtitle: Localized,
    pub image_desktop: String,
    pub link_url: String,
    pub kind: BannerKind,
    #[serde(default = "default_true")]
    pub active: bool,
    pub display_order: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    Percentage,
    Fixed,
    FreeShipping,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::Percentage => "percentage",
            CouponKind::Fixed => "fixed",
            CouponKind::FreeShipping => "free_shipping",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CouponFixture {
    pub code: String,
    pub title: String,
    pub description: String,
    pub kind: CouponKind,
    pub value: f64,
    #[serde(default)]
    pub minimum_order_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i64>,
    #[serde(default = "default_user_usage_limit")]
    pub user_usage_limit: i64,
    /// Length of the validity window, counted from load time.
    pub valid_for_days: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl CouponFixture {
    /// End of the validity window for a load starting at `from`.
    pub fn valid_until(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, SeedError> {
        Duration::try_days(self.valid_for_days)
            .and_then(|window| from.checked_add_signed(window))
            .ok_or_else(|| {
                SeedError::invalid(format!(
                    "coupon '{}' validity of {} days is out of range",
                    self.code, self.valid_for_days
                ))
            })
    }
}

/// The full dataset the loader writes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FixtureSet {
    /// Email of the administrator account that cleanup never deletes.
    pub reserved_admin: String,
    pub users: Vec<UserFixture>,
    pub categories: Vec<CategoryFixture>,
    pub artisans: Vec<ArtisanFixture>,
    pub products: Vec<ProductFixture>,
    #[serde(default)]
    pub banners: Vec<BannerFixture>,
    #[serde(default)]
    pub coupons: Vec<CouponFixture>,
}

fn default_true() -> bool {
    true
}

fn default_user_usage_limit() -> i64 {
    1
}

impl FixtureSet {
    /// The fixture set compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_FIXTURES).context("Embedded fixtures are invalid")
    }

    pub fn from_yaml(yml: &str) -> Result<Self> {
        serde_yaml::from_str(yml).context("Invalid fixture yaml")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read fixture file {}", path.display()))?;
        Self::from_yaml(&yml)
    }

    /// Load `path` if given, otherwise the embedded set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn reserved_admin_user(&self) -> Option<&UserFixture> {
        self.users.iter().find(|u| u.email == self.reserved_admin)
    }

    /// Check the set is internally consistent before any database work.
    pub fn validate(&self) -> Result<(), SeedError> {
        match self.reserved_admin_user() {
            None => {
                return Err(SeedError::invalid(format!(
                    "reserved admin '{}' has no user entry",
                    self.reserved_admin
                )))
            }
            Some(admin) if admin.role != Role::SuperAdmin => {
                return Err(SeedError::invalid(format!(
                    "reserved admin '{}' must have the super_admin role",
                    admin.email
                )))
            }
            Some(_) => {}
        }

        ensure_unique("user id", self.users.iter().map(|u| u.id.as_str()))?;
        ensure_unique("user email", self.users.iter().map(|u| u.email.as_str()))?;
        let categories =
            ensure_unique("category slug", self.categories.iter().map(|c| c.slug.as_str()))?;
        let artisans =
            ensure_unique("artisan slug", self.artisans.iter().map(|a| a.slug.as_str()))?;
        ensure_unique("product slug", self.products.iter().map(|p| p.slug.as_str()))?;
        ensure_unique("product sku", self.products.iter().map(|p| p.sku.as_str()))?;
        ensure_unique("coupon code", self.coupons.iter().map(|c| c.code.as_str()))?;

        for product in &self.products {
            if !categories.contains(product.category.as_str()) {
                return Err(SeedError::MissingReference {
                    product: product.slug.clone(),
                    kind: "category",
                    slug: product.category.clone(),
                });
            }
            if !artisans.contains(product.artisan.as_str()) {
                return Err(SeedError::MissingReference {
                    product: product.slug.clone(),
                    kind: "artisan",
                    slug: product.artisan.clone(),
                });
            }
        }

        let now = Utc::now();
        for coupon in &self.coupons {
            if coupon.valid_for_days < 0 {
                return Err(SeedError::invalid(format!(
                    "coupon '{}' has a negative validity window",
                    coupon.code
                )));
            }
            coupon.valid_until(now)?;
        }

        Ok(())
    }

    /// Row counts a clean load of this set produces.
    pub fn expected_counts(&self) -> TableCounts {
        TableCounts {
            users: self.users.len() as i64,
            categories: self.categories.len() as i64,
            artisans: self.artisans.len() as i64,
            products: self.products.len() as i64,
            banners: self.banners.len() as i64,
            coupons: self.coupons.len() as i64,
        }
    }
}

fn ensure_unique<'a>(
    what: &str,
    values: impl Iterator<Item = &'a str>,
) -> Result<HashSet<&'a str>, SeedError> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(SeedError::invalid(format!("duplicate {}: {}", what, value)));
        }
    }
    Ok(seen)
}
