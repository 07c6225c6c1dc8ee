use crate::models;
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::Instrument;

lazy_static! {
    static ref TABLE_NAME: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid table name regex");
}

// The destination table name is operator-configured and lands in DDL, so
// only plain identifiers are accepted.
pub fn valid_table_name(table: &str) -> bool {
    TABLE_NAME.is_match(table)
}

pub async fn ensure_table(pg_pool: &PgPool, table: &str) -> Result<(), String> {
    if !valid_table_name(table) {
        return Err(format!("invalid table name '{}'", table));
    }
    let query_span = tracing::info_span!("Ensure product table exists.");
    let create_sql = format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            year TEXT,
            description TEXT,
            image TEXT,
            preview_image TEXT,
            url TEXT,
            category TEXT,
            created_at TIMESTAMPTZ,
            updated_at TIMESTAMPTZ
        )"#
    );
    sqlx::query(&create_sql)
        .execute(pg_pool)
        .instrument(query_span)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Failed to create table {}: {:?}", table, err);
            format!("Failed to create table '{}'", table)
        })
}

/// Idempotent create-or-update keyed on `id`. An existing row is updated in
/// place; `created_at` is only ever written by the insert arm.
pub async fn upsert(
    pg_pool: &PgPool,
    table: &str,
    product: &models::Product,
) -> Result<(), String> {
    if !valid_table_name(table) {
        return Err(format!("invalid table name '{}'", table));
    }
    let query_span = tracing::info_span!("Upserting product row.");
    let upsert_sql = format!(
        r#"INSERT INTO {table} (
            id, title, year, description, image, preview_image, url, category, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
        )
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            year = EXCLUDED.year,
            description = EXCLUDED.description,
            image = EXCLUDED.image,
            preview_image = EXCLUDED.preview_image,
            url = EXCLUDED.url,
            category = EXCLUDED.category,
            updated_at = EXCLUDED.updated_at"#
    );
    sqlx::query(&upsert_sql)
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.year)
        .bind(&product.description)
        .bind(&product.image)
        .bind(&product.preview_image)
        .bind(&product.url)
        .bind(&product.category)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(pg_pool)
        .instrument(query_span)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Failed to execute upsert: {:?}", err);
            format!("Failed to upsert product '{}'", product.id)
        })
}
