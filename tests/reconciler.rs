use chrono::{Duration, TimeZone, Utc};
use showcase::configuration::SyncSettings;
use showcase::helpers::normalize_dsn;
use showcase::models::{format_timestamp, slugify, DbAttributes, Document, Product, ProjectRecord};
use showcase::services::{MirrorReason, Reconciler, SyncError, SyncOutcome};
use std::fs;
use tempfile::TempDir;

fn sync_record(name: &str, db: Option<DbAttributes>) -> ProjectRecord {
    let mut record = ProjectRecord::new(name.to_string());
    record.sync_with_db = true;
    record.db_attributes = Some(db.unwrap_or_default());
    record
}

fn settings(database_url: Option<&str>, strict: bool) -> SyncSettings {
    SyncSettings {
        database_url: database_url.map(str::to_string),
        table: "products".to_string(),
        strict,
    }
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  Already-Fine  "), "already-fine");
    assert_eq!(slugify("__Snake__Case__"), "snake-case");
    assert_eq!(slugify(""), "item");
    assert_eq!(slugify("!!!"), "item");
}

#[test]
fn test_product_id_derived_from_title_slug() {
    let product = Product::from_record(&sync_record("Bar", None));
    assert_eq!(product.id, "product-bar");
    assert_eq!(product.title, "Bar");
    assert_eq!(product.description, None);
    assert_eq!(product.url, None);
}

#[test]
fn test_product_prefers_db_attributes_over_record_fields() {
    let mut record = sync_record("Fallback Name", None);
    record.deploy = Some("https://deploy.example".to_string());
    record.repo = Some("org/repo".to_string());
    record.desc = "fallback description".to_string();
    record.db_attributes = Some(DbAttributes {
        id: Some("p-7".to_string()),
        title: Some("Proper Title".to_string()),
        year: Some("2022".to_string()),
        description: Some("db description".to_string()),
        url: Some("https://db.example".to_string()),
        ..Default::default()
    });

    let product = Product::from_record(&record);
    assert_eq!(product.id, "p-7");
    assert_eq!(product.title, "Proper Title");
    assert_eq!(product.year.as_deref(), Some("2022"));
    assert_eq!(product.description.as_deref(), Some("db description"));
    assert_eq!(product.url.as_deref(), Some("https://db.example"));
}

#[test]
fn test_product_url_falls_back_to_deploy_then_repo() {
    let mut record = sync_record("Thing", None);
    record.repo = Some("org/thing".to_string());
    assert_eq!(
        Product::from_record(&record).url.as_deref(),
        Some("org/thing")
    );

    record.deploy = Some("https://thing.example".to_string());
    assert_eq!(
        Product::from_record(&record).url.as_deref(),
        Some("https://thing.example")
    );
}

#[test]
fn test_explicit_id_beats_colliding_slug() {
    // Two records sharing a derived slug stay distinct when one carries an
    // explicit id.
    let by_slug = Product::from_record(&sync_record("Same Title", None));
    let explicit = Product::from_record(&sync_record(
        "Same Title",
        Some(DbAttributes {
            id: Some("p-explicit".to_string()),
            ..Default::default()
        }),
    ));

    assert_eq!(by_slug.id, "product-same-title");
    assert_eq!(explicit.id, "p-explicit");
    assert_ne!(by_slug.id, explicit.id);
}

#[test]
fn test_projection_is_stable_across_runs() {
    let document: Document = serde_json::from_str(
        r#"{
            "tools": [
                {"name": "Alpha", "sync-with-db": true, "db-attribute": {"id": "p-1"}},
                {"name": "Beta", "sync-with-db": true, "db-attribute": {}},
                {"name": "Skipped", "sync-with-db": false}
            ]
        }"#,
    )
    .unwrap();

    let first: Vec<String> = Reconciler::collect_products(&document)
        .into_iter()
        .map(|product| product.id)
        .collect();
    let second: Vec<String> = Reconciler::collect_products(&document)
        .into_iter()
        .map(|product| product.id)
        .collect();

    assert_eq!(first, vec!["p-1", "product-beta"]);
    assert_eq!(first, second);
}

#[test]
fn test_format_timestamp_trims_trailing_zeros() {
    let base = Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap();
    assert_eq!(format_timestamp(&base), "2024-03-05 10:20:30");
    assert_eq!(
        format_timestamp(&(base + Duration::microseconds(500_000))),
        "2024-03-05 10:20:30.5"
    );
    assert_eq!(
        format_timestamp(&(base + Duration::microseconds(123_456))),
        "2024-03-05 10:20:30.123456"
    );
}

#[test]
fn test_normalize_dsn_cleans_pasted_noise() {
    assert_eq!(
        normalize_dsn("  postgres://u:p@host/db  ").as_deref(),
        Some("postgres://u:p@host/db")
    );
    assert_eq!(
        normalize_dsn("\"postgresql://u:p@host/db\"").as_deref(),
        Some("postgresql://u:p@host/db")
    );
    assert_eq!(
        normalize_dsn("psql 'postgresql://u:p@host/db?sslmode=require'").as_deref(),
        Some("postgresql://u:p@host/db?sslmode=require")
    );
    assert_eq!(
        normalize_dsn("psql -h somewhere postgres://u:p@host/db && echo done").as_deref(),
        Some("postgres://u:p@host/db")
    );
    assert_eq!(
        normalize_dsn("psql \"host=h dbname=d user=u\"").as_deref(),
        Some("host=h dbname=d user=u")
    );
    assert_eq!(normalize_dsn("   "), None);
    assert_eq!(normalize_dsn("''"), None);
}

#[tokio::test]
async fn test_mirror_mode_when_no_target_configured() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("projects.json");
    let mirror_file = dir.path().join("db_products.json");
    fs::write(
        &data_file,
        r#"{"tools": [{"name": "Bar", "sync-with-db": true, "db-attribute": {}}]}"#,
    )
    .unwrap();

    let reconciler = Reconciler::new(settings(None, false), &data_file, &mirror_file);
    let outcome = reconciler.run().await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Mirrored {
            count: 1,
            reason: MirrorReason::NotConfigured,
        }
    );

    let mirror: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&mirror_file).unwrap()).unwrap();
    let rows = mirror.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "product-bar");
    assert_eq!(rows[0]["title"], "Bar");
    let created_at = rows[0]["created_at"].as_str().unwrap();
    assert!(created_at.len() >= "1970-01-01 00:00:00".len());
    assert_eq!(&created_at[4..5], "-");
    assert_eq!(&created_at[10..11], " ");
}

#[tokio::test]
async fn test_strict_mode_without_target_is_a_hard_error() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("projects.json");
    let mirror_file = dir.path().join("db_products.json");
    fs::write(
        &data_file,
        r#"{"tools": [{"name": "Bar", "sync-with-db": true}]}"#,
    )
    .unwrap();

    let reconciler = Reconciler::new(settings(None, true), &data_file, &mirror_file);
    let err = reconciler.run().await.unwrap_err();

    assert!(matches!(err, SyncError::NotConfigured));
    // No safety-net mirror in strict mode.
    assert!(!mirror_file.exists());
}

#[tokio::test]
async fn test_unreachable_target_falls_back_to_mirror_in_non_strict_mode() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("projects.json");
    let mirror_file = dir.path().join("db_products.json");
    fs::write(
        &data_file,
        r#"{"tools": [{"name": "Bar", "sync-with-db": true}]}"#,
    )
    .unwrap();

    // Nothing listens on this port; connect fails fast.
    let reconciler = Reconciler::new(
        settings(Some("postgres://u:p@127.0.0.1:1/db"), false),
        &data_file,
        &mirror_file,
    );
    let outcome = reconciler.run().await.unwrap();

    match outcome {
        SyncOutcome::Mirrored {
            count,
            reason: MirrorReason::TargetFailed(_),
        } => assert_eq!(count, 1),
        other => panic!("expected mirror fallback, got {:?}", other),
    }
    assert!(mirror_file.exists());
}

#[tokio::test]
async fn test_unreachable_target_in_strict_mode_writes_no_mirror() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("projects.json");
    let mirror_file = dir.path().join("db_products.json");
    fs::write(
        &data_file,
        r#"{"tools": [{"name": "Bar", "sync-with-db": true}]}"#,
    )
    .unwrap();

    let reconciler = Reconciler::new(
        settings(Some("postgres://u:p@127.0.0.1:1/db"), true),
        &data_file,
        &mirror_file,
    );
    let err = reconciler.run().await.unwrap_err();

    assert!(matches!(err, SyncError::Connect(_)));
    assert!(!mirror_file.exists());
}
