use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::save_profile;
use crate::cli::utils::output_success;
use crate::cli::{Context, OutputFormat};
use crate::client::QueryKey;
use crate::config::normalize_base_path;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at an admin server")]
    Set {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
        #[arg(long, help = "Path prefix the admin API is served under")]
        base_path: Option<String>,
    },

    #[command(about = "Show the selected server")]
    Show,

    #[command(about = "Check server health from the /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Set { url, base_path } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;

            if ctx.profile.server_url != url {
                // A token from another server is useless here
                ctx.profile.sign_out();
            }
            ctx.profile.server_url = url;
            if let Some(path) = base_path {
                ctx.profile.base_path = normalize_base_path(&path);
            }
            save_profile(&ctx.profile)?;

            output_success(
                &ctx.output,
                &format!("Using server {}{}", ctx.profile.server_url, ctx.profile.base_path),
                Some(json!(ctx.profile)),
            )
        }
        ServerCommands::Show => {
            match ctx.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx.profile)?),
                OutputFormat::Text => {
                    println!("Server:    {}", ctx.profile.server_url);
                    let base_path = if ctx.profile.base_path.is_empty() { "/" } else { ctx.profile.base_path.as_str() };
                    println!("Base path: {}", base_path);
                    match &ctx.profile.teacher {
                        Some(teacher) => println!("Signed in: {}", teacher),
                        None => println!("Signed in: no"),
                    }
                }
            }
            Ok(())
        }
        ServerCommands::Health => {
            let client = ctx.client()?;
            let health: Value = client.query(&QueryKey::new(["health"])).await?;
            output_success(&ctx.output, "Server is healthy", Some(health))
        }
    }
}
