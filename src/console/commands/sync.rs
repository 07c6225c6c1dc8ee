use crate::configuration::get_configuration;
use crate::services::{MirrorReason, Reconciler, SyncOutcome};
use actix_web::rt;

pub struct SyncCommand {
    strict: bool,
}

impl SyncCommand {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl crate::console::commands::CallableTrait for SyncCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        rt::System::new().block_on(async {
            let mut settings = get_configuration().expect("Failed to read configuration.");
            if self.strict {
                settings.sync.strict = true;
            }

            let table = settings.sync.table.clone();
            let mirror_file = settings.mirror_file.clone();
            let reconciler = Reconciler::new(
                settings.sync.clone(),
                settings.data_file.clone(),
                settings.mirror_file.clone(),
            );

            match reconciler.run().await? {
                SyncOutcome::Synced { count } => {
                    println!("Upserted {} rows into table '{}'.", count, table);
                }
                SyncOutcome::Mirrored {
                    count,
                    reason: MirrorReason::NotConfigured,
                } => {
                    println!(
                        "No sync target configured; wrote {} rows to {} (mirror mode).",
                        count, mirror_file
                    );
                }
                SyncOutcome::Mirrored {
                    count,
                    reason: MirrorReason::TargetFailed(err),
                } => {
                    println!("Sync target failed: {}", err);
                    println!("Wrote {} rows to {} (mirror mode).", count, mirror_file);
                }
            }

            Ok(())
        })
    }
}
