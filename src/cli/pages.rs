//! Admin pages: a title, a permission gate, and a table or a form.

use std::future::Future;
use std::io::Write;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::authz::{Access, Gate, Rendered};
use crate::cli::table::{Column, Table};
use crate::cli::utils::output_error;
use crate::cli::{Context, OutputFormat};
use crate::client::{AdminClient, ClientError, QueryState};
use crate::session::SessionState;
use crate::types::{permissions, pk_of, records};
use crate::ui::{Alert, AlertLevel, Dialog};

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub title: &'static str,
    pub permission: &'static str,
    /// Explain the refusal instead of showing nothing.
    pub fallback: bool,
    pub table: Table,
}

impl Page {
    pub fn gate(&self) -> Gate {
        Gate::new(self.permission).with_fallback(self.fallback)
    }
}

pub const ADMIN_LOG: Page = Page {
    title: "Admin log",
    permission: permissions::ADMIN_LOG,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("When", "created_at"),
        Column::new("Teacher", "teacher"),
        Column::new("Action", "action"),
        Column::new("Target", "target"),
    ]),
};

pub const PERMISSIONS: Page = Page {
    title: "Permissions",
    permission: permissions::PERMISSION,
    fallback: true,
    table: Table::new(&[
        Column::new("Name", "name"),
        Column::new("Description", "description"),
        Column::new("Teachers", "teachers"),
    ]),
};

pub const SCHOOLS: Page = Page {
    title: "Schools",
    permission: permissions::SCHOOL,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("Name", "name"),
        Column::new("Address", "address"),
    ]),
};

pub const STUDENTS: Page = Page {
    title: "Students",
    permission: permissions::STUDENT,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("Name", "name"),
        Column::new("School", "school"),
        Column::new("Grade", "grade"),
        Column::new("Subjects", "subjects"),
    ]),
};

pub const SUBJECTS: Page = Page {
    title: "Subjects",
    permission: permissions::SUBJECT,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("Name", "name"),
        Column::new("Teacher", "teacher"),
    ]),
};

pub const TEACHERS: Page = Page {
    title: "Teachers",
    permission: permissions::TEACHER,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("Name", "name"),
        Column::new("Level", "level"),
        Column::new("Email", "email"),
    ]),
};

pub const HOMEWORKS: Page = Page {
    title: "Homework",
    permission: permissions::HOMEWORK,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("Title", "title"),
        Column::new("Subject", "subject"),
        Column::new("Due", "due_date"),
    ]),
};

pub const ATTENDANCE: Page = Page {
    title: "Student attendance",
    permission: permissions::STUDENT_ATTENDANCE,
    fallback: true,
    table: Table::new(&[
        Column::new("PK", "pk"),
        Column::new("Student", "student"),
        Column::new("Date", "date"),
        Column::new("Status", "status"),
    ]),
};

/// One status fetch, folded into a session state.
pub async fn load_session(client: &AdminClient) -> SessionState {
    SessionState::from_result(client.auth_status().await)
}

fn refusal(page: &Page, session: &SessionState) -> anyhow::Error {
    match session {
        SessionState::Anonymous => anyhow::anyhow!("Not signed in. Run `academy auth login` first."),
        SessionState::Failed(reason) => anyhow::anyhow!("Could not check the session: {}", reason),
        _ => anyhow::anyhow!(
            "{}: the '{}' permission is required",
            page.title,
            page.permission
        ),
    }
}

/// Render a list page: gate on the session, then fetch and print rows.
pub async fn show<F, Fut>(ctx: &Context, page: &Page, fetch: F) -> anyhow::Result<()>
where
    F: FnOnce(AdminClient) -> Fut,
    Fut: Future<Output = Result<Value, ClientError>>,
{
    let client = ctx.client()?;
    let session = load_session(&client).await;

    let pending = match page.gate().render(&session, || fetch(client)) {
        Rendered::Children(pending) => pending,
        Rendered::Fallback => return Err(refusal(page, &session)),
        Rendered::Nothing => return Ok(()),
        Rendered::Loading => anyhow::bail!("Session is still loading"),
    };

    match QueryState::from_result(pending.await) {
        QueryState::Ready(data) => print_page(ctx, page, &data),
        QueryState::Failed(e) => {
            tracing::debug!("{} failed to load: {:?}", page.title, e);
            match e.status() {
                Some(StatusCode::UNAUTHORIZED) => Err(anyhow::anyhow!(
                    "Session expired. Run `academy auth login` again."
                )),
                _ => Err(anyhow::anyhow!("Could not load {}: {}", page.title.to_lowercase(), e)),
            }
        }
        QueryState::Loading => Ok(()),
    }
}

fn print_page(ctx: &Context, page: &Page, data: &Value) -> anyhow::Result<()> {
    match ctx.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => {
            let rows = records(data);
            println!("{}", page.title);
            println!();
            if rows.is_empty() {
                println!("(no entries)");
            } else {
                print!("{}", page.table.render(rows));
                println!();
                println!("{} entries", rows.len());
            }
        }
    }
    Ok(())
}

/// Run a form submission behind the page gate, after confirmation.
pub async fn submit<F, Fut>(ctx: &Context, page: &Page, summary: &str, action: F) -> anyhow::Result<()>
where
    F: FnOnce(AdminClient) -> Fut,
    Fut: Future<Output = Result<Value, ClientError>>,
{
    let client = ctx.client()?;
    let session = load_session(&client).await;

    match page.gate().access(&session) {
        Access::Allowed => {}
        Access::Denied => return Err(refusal(page, &session)),
        Access::Loading => anyhow::bail!("Session is still loading"),
    }

    ctx.ui.dialog.set(Dialog::Confirm {
        title: page.title.to_string(),
        message: summary.to_string(),
    });
    if !confirm(ctx)? {
        ctx.ui.alert.set(Alert::info("Cancelled"));
        return Ok(());
    }

    let result = action(client).await?;
    let created = pk_of(&result).map(|pk| format!(" (pk {})", pk)).unwrap_or_default();
    ctx.ui.alert.set(Alert::success(format!("{}: done{}", summary, created)));

    if let OutputFormat::Json = ctx.output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

/// Resolve the pending dialog. `--yes` accepts confirmations unseen.
pub fn confirm(ctx: &Context) -> anyhow::Result<bool> {
    match ctx.ui.dialog.clear() {
        None => Ok(true),
        Some(Dialog::Notice { title, message }) => {
            println!("{}: {}", title, message);
            Ok(true)
        }
        Some(Dialog::Confirm { .. }) if ctx.assume_yes => Ok(true),
        Some(Dialog::Confirm { title, message }) => {
            print!("{}: {} [y/N] ", title, message);
            std::io::stdout().flush()?;
            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer)?;
            Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
        }
    }
}

/// Print and clear the pending alert, if any.
pub fn present(ctx: &Context) -> anyhow::Result<()> {
    let Some(alert) = ctx.ui.alert.clear() else {
        return Ok(());
    };

    match (&ctx.output, alert.level) {
        (_, AlertLevel::Error) => output_error(&ctx.output, &alert.message, None)?,
        // Keep stdout a single JSON document
        (OutputFormat::Json, _) => eprintln!("{}", json!({ "alert": alert })),
        (OutputFormat::Text, AlertLevel::Success) => println!("✓ {}", alert.message),
        (OutputFormat::Text, AlertLevel::Info) => println!("{}", alert.message),
    }
    Ok(())
}
