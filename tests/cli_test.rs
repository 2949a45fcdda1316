// Integration tests for the migrate / seed / verify actions

mod common;

use std::path::PathBuf;
use storefront_seed::config::{Action, Settings};
use storefront_seed::{db, run, run_with_pool};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("storefront-seed-{}-{}", std::process::id(), name))
}

#[tokio::test]
async fn test_seed_with_migrate_then_verify() {
    let pool = db::connect("sqlite::memory:").await.unwrap();

    run_with_pool(
        &pool,
        &Action::Seed {
            fixtures: None,
            migrate: true,
        },
    )
    .await
    .unwrap();

    run_with_pool(&pool, &Action::Verify { fixtures: None })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verify_detects_drift() {
    let pool = common::setup_test_db().await;
    storefront_seed::load_fixtures(&pool, &common::fixtures())
        .await
        .unwrap();

    sqlx::query("DELETE FROM banners WHERE display_order = 3")
        .execute(&pool)
        .await
        .unwrap();

    let verification = db::verify(&pool, &common::fixtures()).await.unwrap();
    assert!(!verification.is_ok());
    assert_eq!(verification.mismatches(), vec![("banners", 3, 2)]);

    assert!(run_with_pool(&pool, &Action::Verify { fixtures: None })
        .await
        .is_err());
}

#[tokio::test]
async fn test_verify_on_empty_database_fails() {
    let pool = common::setup_test_db().await;

    let verification = db::verify(&pool, &common::fixtures()).await.unwrap();
    assert!(!verification.admin_present);
    assert!(!verification.is_ok());
}

#[tokio::test]
async fn test_migrate_is_repeatable() {
    let pool = common::setup_test_db().await;
    run_with_pool(&pool, &Action::Migrate).await.unwrap();
    run_with_pool(&pool, &Action::Migrate).await.unwrap();

    assert_eq!(db::table_counts(&pool).await.unwrap(), db::TableCounts::default());
}

#[tokio::test]
async fn test_seed_from_fixture_file() {
    let yml = r#"
reserved_admin: owner@example.com
users:
  - id: owner
    email: owner@example.com
    password: owner-pass
    name: Owner
    role: super_admin
    email_verified: true
categories:
  - slug: pottery
    name: { en: Pottery, hi: मिट्टी के बर्तन }
    description: { en: Clay work, hi: मिट्टी का काम }
    image: /images/categories/pottery.jpg
    display_order: 1
artisans:
  - slug: potter
    name: Potter
    bio: { en: Potter, hi: कुम्हार }
    location: { village: Bori, district: Hoshangabad, state: Madhya Pradesh }
    avatar: /images/artisans/potter.jpg
    specializations: [Pottery]
    experience_years: 3
    rating: 4.2
    total_products: 1
products:
  - slug: clay-pot
    title: { en: Clay Pot, hi: मिट्टी का घड़ा }
    description: { en: A pot, hi: एक घड़ा }
    price: 199.0
    original_price: 249.0
    discount_percentage: 20
    sku: CP-001
    stock: 3
    rating: 4.0
    review_count: 1
    category: pottery
    artisan: potter
"#;
    let path = temp_path("fixtures.yml");
    std::fs::write(&path, yml).unwrap();

    let pool = common::setup_test_db().await;
    run_with_pool(
        &pool,
        &Action::Seed {
            fixtures: Some(path.clone()),
            migrate: false,
        },
    )
    .await
    .unwrap();

    let counts = db::table_counts(&pool).await.unwrap();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.products, 1);
    assert_eq!(counts.banners, 0);

    run_with_pool(
        &pool,
        &Action::Verify {
            fixtures: Some(path.clone()),
        },
    )
    .await
    .unwrap();

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_run_against_database_file() {
    let path = temp_path("store.db");
    let _ = std::fs::remove_file(&path);

    let seed = Settings::from_args([
        "storefront-seed",
        "--database",
        path.to_str().unwrap(),
        "seed",
        "--migrate",
    ])
    .unwrap();
    run(&seed).await.unwrap();
    run(&seed).await.unwrap();

    let verify = Settings::from_args([
        "storefront-seed",
        "--database",
        path.to_str().unwrap(),
        "verify",
    ])
    .unwrap();
    run(&verify).await.unwrap();

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_seed_without_schema_fails() {
    let settings = Settings {
        database_url: "sqlite::memory:".to_string(),
        action: Action::Seed {
            fixtures: None,
            migrate: false,
        },
    };

    let err = run(&settings).await.unwrap_err();
    assert!(format!("{:#}", err).starts_with("Seed failed"));
}
