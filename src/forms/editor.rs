use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{DbAttributes, Document, ProjectRecord, Visibility};

/// Row id the editor template uses for the blank "add new" row.
pub const NEW_ROW: &str = "new";

const FIELD_NAME: &str = "name";
const FIELD_REPO: &str = "repo";
const FIELD_VISIBILITY: &str = "visibility";
const FIELD_DEPLOY: &str = "deploy";
const FIELD_DESC: &str = "desc";
const FIELD_SYNC: &str = "sync-with-db";
const FIELD_REMOVE: &str = "_remove";
const FIELD_DB_ATTRIBUTE: &str = "db-attribute";

lazy_static! {
    // section[row][field] or section[row][field][subfield], anchored.
    static ref FIELD_KEY: Regex =
        Regex::new(r"^([^\[\]]+)\[([^\[\]]+)\]\[([^\[\]]+)\](?:\[([^\[\]]+)\])?$")
            .expect("valid field key regex");
}

/// Tagged parse of one composite form key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub section: String,
    pub row: String,
    pub field: String,
    pub subfield: Option<String>,
}

impl FieldKey {
    /// Returns None for keys outside the grammar. Stray form fields are
    /// expected (filter boxes, radio toggles, the access token) and must
    /// never abort a save.
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = FIELD_KEY.captures(raw)?;
        Some(FieldKey {
            section: captures[1].to_string(),
            row: captures[2].to_string(),
            field: captures[3].to_string(),
            subfield: captures.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

#[derive(Debug, Clone, Default)]
struct RawRow {
    fields: IndexMap<String, String>,
    nested: IndexMap<String, IndexMap<String, String>>,
}

impl RawRow {
    fn value(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    // Checkboxes post "on" when ticked and nothing at all when not; any
    // non-empty value counts as set.
    fn flag(&self, field: &str) -> bool {
        !self.value(field).is_empty()
    }

    fn optional(&self, field: &str) -> Option<String> {
        match self.value(field) {
            "" => None,
            value => Some(value.to_string()),
        }
    }
}

/// A submitted editor form, grouped by (section, row) in first-appearance
/// order. When a key repeats, the last value wins.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    sections: IndexMap<String, IndexMap<String, RawRow>>,
}

impl Submission {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut sections: IndexMap<String, IndexMap<String, RawRow>> = IndexMap::new();
        for (raw_key, value) in pairs {
            let Some(key) = FieldKey::parse(&raw_key) else {
                continue;
            };
            let row = sections
                .entry(key.section)
                .or_default()
                .entry(key.row)
                .or_default();
            match key.subfield {
                Some(subfield) => {
                    row.nested
                        .entry(key.field)
                        .or_default()
                        .insert(subfield, value);
                }
                None => {
                    row.fields.insert(key.field, value);
                }
            }
        }
        Submission { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Builds the canonical document: sections are normalized independently
    /// with rows in received order, and non-list metadata keys from the
    /// prior document are copied through unchanged so metadata the form
    /// never exposed survives a save.
    pub fn into_document(self, prior: Option<&Document>) -> Document {
        let mut document = Document::new();
        for (section, rows) in self.sections {
            let records = rows
                .into_iter()
                .filter_map(|(row_id, row)| normalize_row(&row_id, row))
                .collect();
            document.sections.insert(section, records);
        }
        if let Some(prior) = prior {
            for (key, value) in &prior.metadata {
                document.metadata.insert(key.clone(), value.clone());
            }
        }
        document
    }
}

fn normalize_row(row_id: &str, row: RawRow) -> Option<ProjectRecord> {
    // An untouched template row is not a record.
    if row_id == NEW_ROW
        && row.value(FIELD_NAME).is_empty()
        && row.value(FIELD_REPO).is_empty()
        && row.value(FIELD_DESC).is_empty()
    {
        return None;
    }
    if row.flag(FIELD_REMOVE) {
        return None;
    }

    let name = row.value(FIELD_NAME).trim().to_string();
    if name.is_empty() {
        return None;
    }

    let sync_with_db = row.flag(FIELD_SYNC);
    let db_attributes = sync_with_db.then(|| collect_db_attributes(&row));

    Some(ProjectRecord {
        name,
        repo: row.optional(FIELD_REPO),
        visibility: Visibility::parse(row.value(FIELD_VISIBILITY)),
        deploy: row.optional(FIELD_DEPLOY),
        desc: row.value(FIELD_DESC).trim().to_string(),
        sync_with_db,
        db_attributes,
    })
}

// Keeps only non-empty trimmed values; absent fields stay absent so the
// projection remains sparse.
fn collect_db_attributes(row: &RawRow) -> DbAttributes {
    let nested = row.nested.get(FIELD_DB_ATTRIBUTE);
    let pick = |field: &str| {
        nested
            .and_then(|attributes| attributes.get(field))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    DbAttributes {
        id: pick("id"),
        title: pick("title"),
        year: pick("year"),
        description: pick("description"),
        image: pick("image"),
        preview_image: pick("preview_image"),
        url: pick("url"),
        category: pick("category"),
    }
}
