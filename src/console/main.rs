use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile sync-flagged records against the configured target
    Sync {
        /// Fail hard instead of falling back to the mirror artifact
        #[arg(long)]
        strict: bool,
    },
    /// Regenerate the README from the persisted document
    Readme {},
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    get_command(cli)?.call()
}

fn get_command(cli: Cli) -> Result<Box<dyn showcase::console::commands::CallableTrait>, String> {
    match cli.command {
        Commands::Sync { strict } => Ok(Box::new(
            showcase::console::commands::sync::SyncCommand::new(strict),
        )),
        Commands::Readme {} => Ok(Box::new(
            showcase::console::commands::readme::RegenerateCommand::new(),
        )),
    }
}
