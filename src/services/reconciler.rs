use crate::configuration::SyncSettings;
use crate::db;
use crate::helpers::normalize_dsn;
use crate::models::{Document, Product};
use sqlx::postgres::PgPoolOptions;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no sync target configured")]
    NotConfigured,
    #[error("could not load canonical document: {0}")]
    Document(String),
    #[error("could not reach sync target: {0}")]
    Connect(String),
    #[error("{0}")]
    Upsert(String),
    #[error("could not write mirror file: {0}")]
    Mirror(String),
}

/// Why the reconciler wrote the mirror artifact instead of upserting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorReason {
    NotConfigured,
    TargetFailed(String),
}

/// Explicit three-way outcome so callers can tell a confirmed upsert from a
/// deliberate mirror write. Hard failures surface as `SyncError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { count: usize },
    Mirrored { count: usize, reason: MirrorReason },
}

pub struct Reconciler {
    settings: SyncSettings,
    data_file: PathBuf,
    mirror_file: PathBuf,
}

impl Reconciler {
    pub fn new(
        settings: SyncSettings,
        data_file: impl Into<PathBuf>,
        mirror_file: impl Into<PathBuf>,
    ) -> Self {
        Reconciler {
            settings,
            data_file: data_file.into(),
            mirror_file: mirror_file.into(),
        }
    }

    /// Sync-flagged records across all sections, projected in document
    /// order. The target store has no section concept.
    pub fn collect_products(document: &Document) -> Vec<Product> {
        document
            .all_records()
            .filter(|record| record.sync_with_db)
            .map(Product::from_record)
            .collect()
    }

    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        let document =
            Document::load(&self.data_file).map_err(|err| SyncError::Document(err.to_string()))?;
        self.reconcile(&document).await
    }

    pub async fn reconcile(&self, document: &Document) -> Result<SyncOutcome, SyncError> {
        let products = Self::collect_products(document);

        let dsn = self
            .settings
            .database_url
            .as_deref()
            .and_then(normalize_dsn);

        let Some(dsn) = dsn else {
            if self.settings.strict {
                return Err(SyncError::NotConfigured);
            }
            tracing::info!("No sync target configured; writing mirror artifact.");
            self.write_mirror(&products)?;
            return Ok(SyncOutcome::Mirrored {
                count: products.len(),
                reason: MirrorReason::NotConfigured,
            });
        };

        match self.upsert_all(&dsn, &products).await {
            Ok(count) => Ok(SyncOutcome::Synced { count }),
            Err(err) if self.settings.strict => Err(err),
            Err(err) => {
                tracing::warn!("Sync target failed, falling back to mirror: {}", err);
                self.write_mirror(&products)?;
                Ok(SyncOutcome::Mirrored {
                    count: products.len(),
                    reason: MirrorReason::TargetFailed(err.to_string()),
                })
            }
        }
    }

    async fn upsert_all(&self, dsn: &str, products: &[Product]) -> Result<usize, SyncError> {
        // A hung target must not stall the save pipeline; connect and
        // acquire are both bounded.
        let pg_pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(15))
            .connect(dsn)
            .await
            .map_err(|err| SyncError::Connect(err.to_string()))?;

        db::product::ensure_table(&pg_pool, &self.settings.table)
            .await
            .map_err(SyncError::Upsert)?;
        for product in products {
            db::product::upsert(&pg_pool, &self.settings.table, product)
                .await
                .map_err(SyncError::Upsert)?;
        }
        Ok(products.len())
    }

    fn write_mirror(&self, products: &[Product]) -> Result<(), SyncError> {
        let rendered =
            serde_json::to_string(products).map_err(|err| SyncError::Mirror(err.to_string()))?;
        fs::write(&self.mirror_file, rendered)
            .map_err(|err| SyncError::Mirror(err.to_string()))?;
        tracing::info!(
            "Wrote {} rows to {} (mirror mode).",
            products.len(),
            self.mirror_file.display()
        );
        Ok(())
    }
}
