// Common test utilities shared across test files

use sqlx::SqlitePool;
use storefront_seed::config::fixtures::FixtureSet;

/// Set up an in-memory SQLite database with the storefront schema
#[allow(dead_code)]
pub async fn setup_test_db() -> SqlitePool {
    let pool = storefront_seed::db::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    storefront_seed::db::migrate(&pool)
        .await
        .expect("Failed to run migration 001");

    pool
}

#[allow(dead_code)]
pub fn fixtures() -> FixtureSet {
    FixtureSet::embedded().expect("Embedded fixtures should parse")
}

#[allow(dead_code)]
pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Populate the dependent tables with rows that reference the seeded catalog,
/// as a running storefront would.
#[allow(dead_code)]
pub async fn add_storefront_activity(pool: &SqlitePool) {
    sqlx::raw_sql(
        "INSERT INTO users (id, email, password_hash, name, role) VALUES ('shopper-1', 'shopper@example.com', 'x', 'Shopper', 'customer');
         INSERT INTO user_addresses (user_id, line1, city, state, postal_code) VALUES ('shopper-1', '1 Hill Rd', 'Pachmarhi', 'MP', '461881');
         INSERT INTO user_addresses (user_id, line1, city, state, postal_code) VALUES ('admin-001', '2 Lake Rd', 'Bhopal', 'MP', '462001');
         INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ('admin-001', 'tok-admin', '2099-01-01');
         INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ('shopper-1', 'tok-shopper', '2099-01-01');
         INSERT INTO carts (user_id, product_id, quantity) VALUES ('shopper-1', 'handloom-sari', 1);
         INSERT INTO wishlists (user_id, product_id) VALUES ('shopper-1', 'gond-painting');
         INSERT INTO product_images (product_id, url) VALUES ('gond-painting', '/images/products/gond-1.jpg');
         INSERT INTO product_variants (product_id, name, sku) VALUES ('tribal-printed-shirt', 'XL', 'TPS-001-XL');
         INSERT INTO orders (id, user_id, total) VALUES (1, 'shopper-1', 2999.0);
         INSERT INTO order_items (id, order_id, product_id, quantity, unit_price) VALUES (1, 1, 'handloom-sari', 1, 2999.0);
         INSERT INTO returns (order_item_id, reason) VALUES (1, 'Wrong colour');
         INSERT INTO product_reviews (product_id, user_id, rating, body) VALUES ('handloom-sari', 'shopper-1', 5, 'Lovely');
         INSERT INTO coupon_usage (coupon_id, user_id, order_id) VALUES ((SELECT id FROM coupons WHERE code = 'WELCOME10'), 'shopper-1', 1);",
    )
    .execute(pool)
    .await
    .expect("Failed to add storefront activity");
}
