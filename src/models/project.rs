use serde::{Deserialize, Deserializer, Serialize};

/// Visibility of a project entry as shown on the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    // Form values arrive untrimmed and in arbitrary case; anything that is
    // not "private" counts as public.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "private" => Visibility::Private,
            _ => Visibility::Public,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Old files may carry values outside the enum; degrade to public
        // instead of rejecting the whole document.
        let raw = String::deserialize(deserializer)?;
        Ok(Visibility::parse(&raw))
    }
}

/// Nested attribute mapping carried by records flagged for sync.
/// Absent fields are omitted from JSON, never stored as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DbAttributes {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.title.is_none()
            && self.year.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.preview_image.is_none()
            && self.url.is_none()
            && self.category.is_none()
    }
}

/// One edited project entry. Replaced wholesale per section on save; a
/// record with an empty name is never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub deploy: Option<String>,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "sync-with-db", default)]
    pub sync_with_db: bool,
    #[serde(
        rename = "db-attribute",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub db_attributes: Option<DbAttributes>,
}

impl ProjectRecord {
    pub fn new(name: String) -> Self {
        Self {
            name,
            repo: None,
            visibility: Visibility::Public,
            deploy: None,
            desc: String::new(),
            sync_with_db: false,
            db_attributes: None,
        }
    }
}
