use clap::Subcommand;
use serde_json::{json, Value};

use super::school::describe;
use super::ListArgs;
use crate::cli::pages::{self, STUDENTS};
use crate::cli::utils::{pk_value, read_json_input};
use crate::cli::Context;

#[derive(Subcommand)]
pub enum StudentCommands {
    #[command(about = "List students")]
    List(ListArgs),

    #[command(about = "Register a student")]
    Create {
        #[arg(long, help = "JSON body (reads stdin when omitted or '-')")]
        data: Option<String>,
    },

    #[command(about = "Replace the subjects a student takes")]
    Subjects {
        #[arg(help = "Student primary key")]
        pk: String,
        #[arg(long = "subject", value_name = "PK", help = "Subject primary key (repeatable)")]
        subjects: Vec<String>,
        #[arg(long, conflicts_with = "subjects", help = "Full JSON body instead of --subject")]
        data: Option<String>,
    },
}

pub async fn handle(cmd: StudentCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        StudentCommands::List(args) => {
            let params = args.query()?;
            pages::show(ctx, &STUDENTS, |client| async move { client.students(&params).await }).await
        }
        StudentCommands::Create { data } => {
            let body = read_json_input(data.as_deref())?;
            let summary = format!("Create student {}", describe(&body));
            pages::submit(ctx, &STUDENTS, &summary, |client| async move {
                client.create_student(&body).await
            })
            .await
        }
        StudentCommands::Subjects { pk, subjects, data } => {
            let body = match data {
                Some(data) => read_json_input(Some(&data))?,
                None => subjects_body(&subjects),
            };
            let summary = format!("Set subjects of student {}", pk);
            pages::submit(ctx, &STUDENTS, &summary, |client| async move {
                client.update_student_subjects(&pk, &body).await
            })
            .await
        }
    }
}

fn subjects_body(subjects: &[String]) -> Value {
    let pks: Vec<Value> = subjects.iter().map(|pk| pk_value(pk)).collect();
    json!({ "subjects": pks })
}
