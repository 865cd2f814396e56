use clap::Subcommand;

use crate::auth::TokenService;
use crate::cli::{utils::output_value, OutputFormat};
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Print a bearer token for a user id")]
    Issue {
        #[arg(help = "User id to embed in the token")]
        user_id: i64,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id } => {
            let tokens = TokenService::from_config(&config.security)?;
            let token = tokens.issue(user_id)?;
            output_value(output_format, "token", &token)
        }
    }
}
