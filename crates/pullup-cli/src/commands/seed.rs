use std::path::PathBuf;

use clap::Subcommand;
use pullup_core::{seed, storage, Config, Database};

#[derive(Subcommand)]
pub enum SeedAction {
    /// Import a workouts.json seed document into the local store
    Import {
        /// Path to the seed file (defaults to workouts.json in the data dir)
        path: Option<PathBuf>,
        /// Re-import even when workouts already exist
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: SeedAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SeedAction::Import { path, force } => {
            let db = Database::open()?;
            let mut config = Config::load_or_default();
            let path = match path {
                Some(path) => path,
                None => storage::data_dir()?.join("workouts.json"),
            };
            let bootstrap = seed::bootstrap(&db, &mut config, &path, force);
            if bootstrap.imported {
                config.save()?;
                println!(
                    "imported {} workout(s) from {}",
                    bootstrap.workouts.len(),
                    path.display()
                );
            } else {
                println!(
                    "workouts already present ({}); use --force to re-import",
                    bootstrap.workouts.len()
                );
            }
        }
    }
    Ok(())
}
