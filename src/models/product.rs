use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::models::ProjectRecord;

/// Derived, read-only projection of a record flagged for sync. The id must
/// stay stable across repeated syncs of the same logical record so that
/// re-running reconciliation updates rather than duplicates the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub preview_image: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    #[serde(serialize_with = "mirror_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "mirror_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Field preference: the nested db attributes win, top-level record
    /// fields are the fallback (name -> title, deploy/repo -> url). An
    /// explicit attribute id takes precedence over the derived slug.
    pub fn from_record(record: &ProjectRecord) -> Self {
        let db = record.db_attributes.clone().unwrap_or_default();

        let title = db
            .title
            .as_deref()
            .unwrap_or(&record.name)
            .trim()
            .to_string();

        let id = db.id.clone().unwrap_or_else(|| {
            let slug = slugify(&title);
            let slug = &slug[..slug.len().min(64)];
            format!("product-{}", slug)
        });

        let description = db
            .description
            .clone()
            .unwrap_or_else(|| record.desc.clone());
        let description = match description.trim() {
            "" => None,
            trimmed => Some(trimmed.to_string()),
        };

        let url = db
            .url
            .clone()
            .or_else(|| record.deploy.clone())
            .or_else(|| record.repo.clone());

        let now = Utc::now();
        Product {
            title: if title.is_empty() { id.clone() } else { title },
            id,
            year: db.year,
            description,
            image: db.image,
            preview_image: db.preview_image,
            url,
            category: db.category,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lowercase, hyphenated identifier derived from a title string. Runs of
/// non-alphanumeric characters collapse into a single hyphen.
pub fn slugify(value: &str) -> String {
    let mut slug = String::new();
    let mut gap = false;
    for ch in value.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch);
        } else {
            gap = true;
        }
    }
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

/// Mirror timestamp format: `YYYY-MM-DD HH:MM:SS.ffffff` with trailing
/// zeros and a trailing period trimmed.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    let mut rendered = dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string();
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    rendered
}

fn mirror_timestamp<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(dt))
}
