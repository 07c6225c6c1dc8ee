use anyhow::Context;
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::models::ProjectRecord;

/// The canonical persisted document: an ordered mapping of section name to
/// project records, plus pass-through metadata keys the editor form never
/// exposes. Array-valued keys are sections, everything else is metadata and
/// is preserved verbatim, never interpreted.
///
/// `save` replaces the whole file; concurrent submissions race with
/// last-write-wins semantics, there is no partial merge at document level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub sections: IndexMap<String, Vec<ProjectRecord>>,
    pub metadata: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("could not parse {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let rendered = serde_json::to_string_pretty(self).context("could not serialize document")?;
        fs::write(path, rendered).with_context(|| format!("could not write {}", path.display()))
    }

    /// All records across all sections, in document order. The sync target
    /// has no section concept, so the section name is not carried along.
    pub fn all_records(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.sections.values().flatten()
    }

    pub fn record_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.sections.len() + self.metadata.len()))?;
        for (name, records) in &self.sections {
            map.serialize_entry(name, records)?;
        }
        for (key, value) in &self.metadata {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of sections and metadata")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut document = Document::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    match value {
                        Value::Array(items) => {
                            // Unparseable items and empty names degrade by
                            // omission, the rest of the section survives.
                            let records = items
                                .into_iter()
                                .filter_map(|item| {
                                    serde_json::from_value::<ProjectRecord>(item).ok()
                                })
                                .filter(|record| !record.name.trim().is_empty())
                                .collect();
                            document.sections.insert(key, records);
                        }
                        other => {
                            document.metadata.insert(key, other);
                        }
                    }
                }
                Ok(document)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
