// Fixture loading: truncate-and-reload of the storefront tables

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::auth;
use crate::config::fixtures::{
    ArtisanFixture, BannerFixture, CategoryFixture, CouponFixture, FixtureSet, ProductFixture,
};
use crate::db::TableCounts;
use crate::error::SeedError;

/// Tables emptied before loading, leaves first. `users` is handled
/// separately because the reserved administrator survives cleanup.
pub const CLEANUP_ORDER: &[&str] = &[
    "coupon_usage",
    "coupons",
    "banners",
    "product_reviews",
    "returns",
    "order_items",
    "orders",
    "wishlists",
    "carts",
    "product_variants",
    "product_images",
    "products",
    "artisans",
    "categories",
    "user_addresses",
    "refresh_tokens",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    /// Rows removed per table, in deletion order.
    pub deleted: Vec<(&'static str, u64)>,
    pub inserted: TableCounts,
    /// Whether the reserved administrator row existed before this run.
    pub admin_preserved: bool,
}

/// Reset the store to `fixtures` in a single transaction.
///
/// The fixture set is validated first. Any failure after the transaction
/// opens rolls everything back, leaving the previous contents untouched.
pub async fn load_fixtures(
    pool: &SqlitePool,
    fixtures: &FixtureSet,
) -> Result<SeedReport, SeedError> {
    fixtures.validate()?;

    // bcrypt is slow; hash before the transaction starts
    let password_hashes = fixtures
        .users
        .iter()
        .map(|user| auth::hash_password(&user.password))
        .collect::<Result<Vec<_>, _>>()?;

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let outcome = populate(&mut tx, fixtures, &password_hashes, now).await;
    match outcome {
        Ok(report) => {
            tx.commit().await?;
            info!(
                categories = report.inserted.categories,
                artisans = report.inserted.artisans,
                products = report.inserted.products,
                "Fixture load committed"
            );
            Ok(report)
        }
        Err(e) => {
            warn!(error = %e, "Fixture load failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn populate(
    conn: &mut SqliteConnection,
    fixtures: &FixtureSet,
    password_hashes: &[String],
    now: DateTime<Utc>,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport {
        deleted: clear_tables(conn, &fixtures.reserved_admin).await?,
        ..SeedReport::default()
    };

    report.admin_preserved =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(&fixtures.reserved_admin)
            .fetch_one(&mut *conn)
            .await?;

    report.inserted.users = insert_users(conn, fixtures, password_hashes).await?;
    report.inserted.categories = insert_categories(conn, &fixtures.categories).await?;
    report.inserted.artisans = insert_artisans(conn, &fixtures.artisans).await?;
    report.inserted.products = insert_products(conn, &fixtures.products).await?;
    report.inserted.banners = insert_banners(conn, &fixtures.banners).await?;
    report.inserted.coupons = insert_coupons(conn, &fixtures.coupons, now).await?;

    Ok(report)
}

async fn clear_tables(
    conn: &mut SqliteConnection,
    reserved_admin: &str,
) -> Result<Vec<(&'static str, u64)>, SeedError> {
    info!("Cleaning existing data");
    let mut deleted = Vec::with_capacity(CLEANUP_ORDER.len() + 1);

    for &table in CLEANUP_ORDER {
        let result = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *conn)
            .await?;
        debug!(table, rows = result.rows_affected(), "Cleared table");
        deleted.push((table, result.rows_affected()));
    }

    let result = sqlx::query("DELETE FROM users WHERE email <> ?")
        .bind(reserved_admin)
        .execute(&mut *conn)
        .await?;
    debug!(table = "users", rows = result.rows_affected(), "Cleared table");
    deleted.push(("users", result.rows_affected()));

    Ok(deleted)
}

async fn insert_users(
    conn: &mut SqliteConnection,
    fixtures: &FixtureSet,
    password_hashes: &[String],
) -> Result<i64, SeedError> {
    info!(count = fixtures.users.len(), "Creating users");

    for (user, password_hash) in fixtures.users.iter().zip(password_hashes) {
        // Upsert on email so the preserved administrator is refreshed in place
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role, email_verified)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(email)
             DO UPDATE SET password_hash = excluded.password_hash, name = excluded.name,
                           role = excluded.role, email_verified = excluded.email_verified,
                           updated_at = CURRENT_TIMESTAMP",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .execute(&mut *conn)
        .await?;
    }

    Ok(fixtures.users.len() as i64)
}

async fn insert_categories(
    conn: &mut SqliteConnection,
    categories: &[CategoryFixture],
) -> Result<i64, SeedError> {
    info!(count = categories.len(), "Creating categories");

    for category in categories {
        sqlx::query(
            "INSERT INTO categories (id, name_en, name_hi, description_en, description_hi, image, display_order)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&category.slug)
        .bind(&category.name.en)
        .bind(&category.name.hi)
        .bind(&category.description.en)
        .bind(&category.description.hi)
        .bind(&category.image)
        .bind(category.display_order)
        .execute(&mut *conn)
        .await?;
    }

    Ok(categories.len() as i64)
}

async fn insert_artisans(
    conn: &mut SqliteConnection,
    artisans: &[ArtisanFixture],
) -> Result<i64, SeedError> {
    info!(count = artisans.len(), "Creating artisans");

    for artisan in artisans {
        let specialization = serde_json::to_string(&artisan.specializations)?;

        sqlx::query(
            "INSERT INTO artisans
             (id, user_id, name, bio_en, bio_hi, village, district, state, avatar,
              specialization, portfolio_images, experience_years, rating, total_products,
              is_verified, is_active)
             VALUES (?, NULL, ?, ?, ?, ?, ?, ?, ?, ?, '[]', ?, ?, ?, ?, ?)",
        )
        .bind(&artisan.slug)
        .bind(&artisan.name)
        .bind(&artisan.bio.en)
        .bind(&artisan.bio.hi)
        .bind(&artisan.location.village)
        .bind(&artisan.location.district)
        .bind(&artisan.location.state)
        .bind(&artisan.avatar)
        .bind(specialization)
        .bind(artisan.experience_years)
        .bind(artisan.rating)
        .bind(artisan.total_products)
        .bind(artisan.verified)
        .bind(artisan.active)
        .execute(&mut *conn)
        .await?;
    }

    Ok(artisans.len() as i64)
}

async fn row_exists(
    conn: &mut SqliteConnection,
    table: &str,
    id: &str,
) -> Result<bool, SeedError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table);
    let exists: bool = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

async fn insert_products(
    conn: &mut SqliteConnection,
    products: &[ProductFixture],
) -> Result<i64, SeedError> {
    info!(count = products.len(), "Creating products");

    for product in products {
        if !row_exists(conn, "categories", &product.category).await? {
            return Err(SeedError::MissingReference {
                product: product.slug.clone(),
                kind: "category",
                slug: product.category.clone(),
            });
        }
        if !row_exists(conn, "artisans", &product.artisan).await? {
            return Err(SeedError::MissingReference {
                product: product.slug.clone(),
                kind: "artisan",
                slug: product.artisan.clone(),
            });
        }

        let material = serde_json::to_string(&product.materials)?;
        let tags = serde_json::to_string(&product.tags)?;

        sqlx::query(
            "INSERT INTO products
             (id, title_en, title_hi, description_en, description_hi, price, original_price,
              discount_percentage, sku, stock, material, tags, featured, best_seller, trending,
              new_arrival, rating, review_count, view_count, sales_count, category_id, artisan_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?)",
        )
        .bind(&product.slug)
        .bind(&product.title.en)
        .bind(&product.title.hi)
        .bind(&product.description.en)
        .bind(&product.description.hi)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.discount_percentage)
        .bind(&product.sku)
        .bind(product.stock)
        .bind(material)
        .bind(tags)
        .bind(product.featured)
        .bind(product.best_seller)
        .bind(product.trending)
        .bind(product.new_arrival)
        .bind(product.rating)
        .bind(product.review_count)
        .bind(&product.category)
        .bind(&product.artisan)
        .execute(&mut *conn)
        .await?;
    }

    Ok(products.len() as i64)
}

async fn insert_banners(
    conn: &mut SqliteConnection,
    banners: &[BannerFixture],
) -> Result<i64, SeedError> {
    info!(count = banners.len(), "Creating banners");

    for banner in banners {
        sqlx::query(
            "INSERT INTO banners
             (title_en, title_hi, subtitle_en, subtitle_hi, image_desktop, link_url, type, is_active, display_order)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&banner.title.en)
        .bind(&banner.title.hi)
        .bind(&banner.subtitle.en)
        .bind(&banner.subtitle.hi)
        .bind(&banner.image_desktop)
        .bind(&banner.link_url)
        .bind(banner.kind.as_str())
        .bind(banner.active)
        .bind(banner.display_order)
        .execute(&mut *conn)
        .await?;
    }

    Ok(banners.len() as i64)
}

async fn insert_coupons(
    conn: &mut SqliteConnection,
    coupons: &[CouponFixture],
    now: DateTime<Utc>,
) -> Result<i64, SeedError> {
    info!(count = coupons.len(), "Creating coupons");

    for coupon in coupons {
        let valid_until = coupon.valid_until(now)?;

        sqlx::query(
            "INSERT INTO coupons
             (code, title, description, type, value, minimum_order_amount, maximum_discount_amount,
              usage_limit, usage_count, user_usage_limit, valid_from, valid_until, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)",
        )
        .bind(&coupon.code)
        .bind(&coupon.title)
        .bind(&coupon.description)
        .bind(coupon.kind.as_str())
        .bind(coupon.value)
        .bind(coupon.minimum_order_amount)
        .bind(coupon.maximum_discount_amount)
        .bind(coupon.usage_limit)
        .bind(coupon.user_usage_limit)
        .bind(now)
        .bind(valid_until)
        .bind(coupon.active)
        .execute(&mut *conn)
        .await?;
    }

    Ok(coupons.len() as i64)
}
