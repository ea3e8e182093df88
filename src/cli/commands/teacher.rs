use clap::Subcommand;
use serde_json::json;

use super::ListArgs;
use crate::cli::pages::{self, TEACHERS};
use crate::cli::utils::pk_value;
use crate::cli::Context;

#[derive(Subcommand)]
pub enum TeacherCommands {
    #[command(about = "List teachers")]
    List(ListArgs),

    #[command(about = "Change a teacher's level")]
    Level {
        #[arg(help = "Teacher primary key")]
        pk: String,
        #[arg(help = "New level")]
        level: String,
    },
}

pub async fn handle(cmd: TeacherCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        TeacherCommands::List(args) => {
            let params = args.query()?;
            pages::show(ctx, &TEACHERS, |client| async move { client.teachers(&params).await }).await
        }
        TeacherCommands::Level { pk, level } => {
            let body = json!({ "level": pk_value(&level) });
            let summary = format!("Set level of teacher {} to {}", pk, level);
            pages::submit(ctx, &TEACHERS, &summary, |client| async move {
                client.update_teacher_level(&pk, &body).await
            })
            .await
        }
    }
}
