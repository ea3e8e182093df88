use clap::Subcommand;

use super::ListArgs;
use crate::cli::pages::{self, ADMIN_LOG, PERMISSIONS};
use crate::cli::utils::read_json_input;
use crate::cli::Context;

#[derive(Subcommand)]
pub enum PermissionCommands {
    #[command(about = "List permissions")]
    List,

    #[command(about = "Change a permission")]
    Update {
        #[arg(help = "Permission name")]
        name: String,
        #[arg(long, help = "JSON body (reads stdin when omitted or '-')")]
        data: Option<String>,
    },
}

pub async fn admin_log(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let params = args.query()?;
    pages::show(ctx, &ADMIN_LOG, |client| async move { client.admin_log(&params).await }).await
}

pub async fn handle(cmd: PermissionCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        PermissionCommands::List => {
            pages::show(ctx, &PERMISSIONS, |client| async move { client.permissions().await }).await
        }
        PermissionCommands::Update { name, data } => {
            let body = read_json_input(data.as_deref())?;
            let summary = format!("Update permission '{}'", name);
            pages::submit(ctx, &PERMISSIONS, &summary, |client| async move {
                client.update_permission(&name, &body).await
            })
            .await
        }
    }
}
