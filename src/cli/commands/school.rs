use clap::Subcommand;

use super::ListArgs;
use crate::cli::pages::{self, SCHOOLS};
use crate::cli::utils::read_json_input;
use crate::cli::Context;

#[derive(Subcommand)]
pub enum SchoolCommands {
    #[command(about = "List schools")]
    List(ListArgs),

    #[command(about = "Register a school")]
    Create {
        #[arg(long, help = "JSON body (reads stdin when omitted or '-')")]
        data: Option<String>,
    },
}

pub async fn handle(cmd: SchoolCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        SchoolCommands::List(args) => {
            let params = args.query()?;
            pages::show(ctx, &SCHOOLS, |client| async move { client.schools(&params).await }).await
        }
        SchoolCommands::Create { data } => {
            let body = read_json_input(data.as_deref())?;
            let summary = format!("Create school {}", describe(&body));
            pages::submit(ctx, &SCHOOLS, &summary, |client| async move {
                client.create_school(&body).await
            })
            .await
        }
    }
}

/// Short label for a new record in confirmation prompts.
pub(crate) fn describe(body: &serde_json::Value) -> String {
    match body.get("name").and_then(|name| name.as_str()) {
        Some(name) => format!("'{}'", name),
        None => "(unnamed)".to_string(),
    }
}
