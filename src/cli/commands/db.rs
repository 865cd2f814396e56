use clap::Subcommand;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the users and posts tables if missing")]
    Migrate,
}

pub async fn handle(cmd: DbCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            PgStore::new(pool).migrate().await?;
            output_success(output_format, "Database schema is up to date", None)
        }
    }
}
