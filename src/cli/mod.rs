pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "posts")]
#[command(about = "Posts CLI - operator tasks against the Posts API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Database schema management")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "User account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Bearer token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config();

    match cli.command {
        Commands::Db { cmd } => commands::db::handle(cmd, config, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, config, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, config, output_format),
    }
}
