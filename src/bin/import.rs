use std::path::PathBuf;

use clap::Parser;
use recipes_api::{config::DatabaseConfig, import, logging, state};
use tracing::{error, info};

/// Load a JSON recipe dump into the `recipes` table.
#[derive(Debug, Parser)]
#[command(name = "recipes-import", version)]
struct Cli {
    /// JSON document mapping arbitrary keys to recipe objects
    #[arg(env = "IMPORT_FILE", default_value = "US_recipes_null.json")]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("recipes_api=info");
    let cli = Cli::parse();

    info!(file = %cli.file.display(), "reading recipe dump");
    let batch = import::load_batch(&cli.file).await?;

    let db_config = DatabaseConfig::from_env()?;
    let pool = state::connect(&db_config).await?;

    let result = import::run_import(&pool, batch).await;
    pool.close().await;

    match result {
        Ok(report) => {
            info!(
                inserted = report.inserted,
                skipped = report.skipped,
                "data import completed"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "import failed, nothing was written");
            Err(e.into())
        }
    }
}
