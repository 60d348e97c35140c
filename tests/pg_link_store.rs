//! PostgreSQL backend tests.
//!
//! These require a reachable database. Set `TEST_DATABASE_URL` to run them;
//! without it every test returns early and the suite stays green.

use std::collections::HashMap;

use linkstore::domain::entities::Link;
use linkstore::domain::repositories::LinkStore;
use linkstore::error::StoreError;
use linkstore::infrastructure::persistence::PgLinkStore;
use linkstore::utils::code_generator::generate_code;

async fn test_store() -> Option<(PgLinkStore, sqlx::PgPool)> {
    let Ok(dsn) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping postgres test");
        return None;
    };

    let store = PgLinkStore::connect(&dsn)
        .await
        .expect("connect test database");
    let pool = sqlx::PgPool::connect(&dsn)
        .await
        .expect("connect verification pool");
    Some((store, pool))
}

/// Unique URL per test run; the links table is append-only and shared.
fn unique_url(label: &str) -> String {
    format!(
        "https://example.com/{label}/{}",
        generate_code(12).unwrap()
    )
}

async fn row_count(pool: &sqlx::PgPool, original_url: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE original_link = $1")
        .bind(original_url)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_save_and_get_round_trip() {
    let Some((store, _pool)) = test_store().await else {
        return;
    };

    let url = unique_url("round-trip");
    let code = generate_code(8).unwrap();
    store.save_link(&Link::new(&code, &url, None)).await.unwrap();

    let resolved = store.get_link(&code).await.unwrap();
    assert_eq!(resolved.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_get_miss_is_none() {
    let Some((store, _pool)) = test_store().await else {
        return;
    };

    let miss = store.get_link("doesnotexist").await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_duplicate_url_returns_existing_code_once() {
    let Some((store, pool)) = test_store().await else {
        return;
    };

    let url = unique_url("duplicate");
    let first = generate_code(8).unwrap();
    let second = generate_code(8).unwrap();

    store
        .save_link(&Link::new(&first, &url, None))
        .await
        .unwrap();

    let err = store
        .save_link(&Link::new(&second, &url, None))
        .await
        .unwrap_err();

    // The second call reports the first call's code and no second row exists.
    assert_eq!(err.existing_code(), Some(first.as_str()));
    assert_eq!(row_count(&pool, &url).await, 1);
}

#[tokio::test]
async fn test_batch_commits_all_rows() {
    let Some((store, pool)) = test_store().await else {
        return;
    };

    let urls: Vec<String> = (0..3).map(|i| unique_url(&format!("batch-{i}"))).collect();
    let batch: Vec<Link> = urls
        .iter()
        .map(|url| Link::new(generate_code(8).unwrap(), url, None))
        .collect();

    store.save_links_batch(&batch).await.unwrap();

    for url in &urls {
        assert_eq!(row_count(&pool, url).await, 1);
    }
}

#[tokio::test]
async fn test_batch_failure_rolls_back_everything() {
    let Some((store, pool)) = test_store().await else {
        return;
    };

    let clean_url = unique_url("atomicity-clean");
    let dup_url = unique_url("atomicity-dup");

    // The repeated URL violates the unique constraint mid-batch.
    let batch = vec![
        Link::new(generate_code(8).unwrap(), &clean_url, None),
        Link::new(generate_code(8).unwrap(), &dup_url, None),
        Link::new(generate_code(8).unwrap(), &dup_url, None),
    ];

    let result = store.save_links_batch(&batch).await;

    assert!(result.is_err());
    assert_eq!(row_count(&pool, &clean_url).await, 0);
    assert_eq!(row_count(&pool, &dup_url).await, 0);
}

#[tokio::test]
async fn test_links_by_owner_scopes_to_owner() {
    let Some((store, _pool)) = test_store().await else {
        return;
    };

    // Owner ids are random per run so earlier rows never leak in.
    let owner = format!("owner-{}", generate_code(12).unwrap());
    let other = format!("owner-{}", generate_code(12).unwrap());

    let owned_url = unique_url("owned");
    let owned_code = generate_code(8).unwrap();
    store
        .save_link(&Link::new(&owned_code, &owned_url, Some(owner.as_str())))
        .await
        .unwrap();
    store
        .save_link(&Link::new(
            generate_code(8).unwrap(),
            unique_url("other"),
            Some(other.as_str()),
        ))
        .await
        .unwrap();

    let links: HashMap<String, String> = store.links_by_owner(&owner).await.unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[&owned_code], owned_url);
}

#[tokio::test]
async fn test_from_pool_shares_migrated_schema() {
    // `connect` above has run migrations; a store wrapped around an existing
    // pool sees the same table.
    let Some((store, pool)) = test_store().await else {
        return;
    };

    let url = unique_url("from-pool");
    let code = generate_code(8).unwrap();
    store.save_link(&Link::new(&code, &url, None)).await.unwrap();

    let wrapped = PgLinkStore::from_pool(pool);
    let resolved = wrapped.get_link(&code).await.unwrap();
    assert_eq!(resolved.as_deref(), Some(url.as_str()));

    wrapped.ping().await.unwrap();
}

#[tokio::test]
async fn test_ping_succeeds_on_live_pool() {
    let Some((store, _pool)) = test_store().await else {
        return;
    };

    store.ping().await.unwrap();
}

#[tokio::test]
async fn test_close_makes_ping_fail() {
    let Some((store, _pool)) = test_store().await else {
        return;
    };

    store.close().await.unwrap();

    let err = store.ping().await.unwrap_err();
    assert!(matches!(err, StoreError::TransientIo(_)));
}
