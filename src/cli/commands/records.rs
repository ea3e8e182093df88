use clap::Subcommand;

use super::ListArgs;
use crate::cli::pages::{self, ATTENDANCE, HOMEWORKS};
use crate::cli::Context;

#[derive(Subcommand)]
pub enum AttendanceCommands {
    #[command(about = "Attendance for one student or day (student-attendance)")]
    Show(ListArgs),

    #[command(about = "Attendance records in bulk (student-attendances)")]
    List(ListArgs),
}

pub async fn homeworks(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let params = args.query()?;
    pages::show(ctx, &HOMEWORKS, |client| async move { client.homeworks(&params).await }).await
}

pub async fn handle(cmd: AttendanceCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        AttendanceCommands::Show(args) => {
            let params = args.query()?;
            pages::show(ctx, &ATTENDANCE, |client| async move {
                client.student_attendance(&params).await
            })
            .await
        }
        AttendanceCommands::List(args) => {
            let params = args.query()?;
            pages::show(ctx, &ATTENDANCE, |client| async move {
                client.student_attendances(&params).await
            })
            .await
        }
    }
}
