use clap::Subcommand;
use serde_json::json;

use crate::api::CreateUserParams;
use crate::auth::hash_password;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::NewUser;
use crate::database::{DatabaseManager, PgStore, PostStore};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "Email address (login)")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { name, email, password } => {
            let valid = CreateUserParams {
                name: Some(name),
                email: Some(email),
                password: Some(password),
            }
            .validate()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

            let pool = DatabaseManager::connect(&config.database).await?;
            let store = PgStore::new(pool);
            let user = store
                .create_user(NewUser {
                    name: valid.name,
                    email: valid.email,
                    password_digest: hash_password(&valid.password)?,
                })
                .await?;

            output_success(
                output_format,
                &format!("Created user {} ({})", user.id, user.email),
                Some(json!({ "user": user })),
            )
        }
    }
}
