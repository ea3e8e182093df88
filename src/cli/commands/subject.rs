use clap::Subcommand;

use super::school::describe;
use super::ListArgs;
use crate::cli::pages::{self, SUBJECTS};
use crate::cli::utils::read_json_input;
use crate::cli::Context;

#[derive(Subcommand)]
pub enum SubjectCommands {
    #[command(about = "List subjects")]
    List(ListArgs),

    #[command(about = "Create a subject")]
    Create {
        #[arg(long, help = "JSON body (reads stdin when omitted or '-')")]
        data: Option<String>,
    },
}

pub async fn handle(cmd: SubjectCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        SubjectCommands::List(args) => {
            let params = args.query()?;
            pages::show(ctx, &SUBJECTS, |client| async move { client.subjects(&params).await }).await
        }
        SubjectCommands::Create { data } => {
            let body = read_json_input(data.as_deref())?;
            let summary = format!("Create subject {}", describe(&body));
            pages::submit(ctx, &SUBJECTS, &summary, |client| async move {
                client.create_subject(&body).await
            })
            .await
        }
    }
}
