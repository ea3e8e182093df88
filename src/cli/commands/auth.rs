use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::save_profile;
use crate::cli::pages::load_session;
use crate::cli::utils::output_success;
use crate::cli::{Context, OutputFormat};
use crate::session::{AuthPoller, SessionState};
use crate::ui::Alert;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "ACADEMY_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Keep polling the authentication status until interrupted")]
    Watch {
        #[arg(long, help = "Seconds between polls (defaults to SESSION_POLL_INTERVAL_SECS)")]
        interval: Option<u64>,
    },
}

pub async fn handle(cmd: AuthCommands, ctx: &mut Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => login(ctx, username, password).await,
        AuthCommands::Logout => logout(ctx).await,
        AuthCommands::Status => status(ctx).await,
        AuthCommands::Watch { interval } => watch(ctx, interval).await,
    }
}

async fn login(ctx: &mut Context, username: String, password: String) -> anyhow::Result<()> {
    let mut client = ctx.client()?.with_token(None);
    let credentials = json!({ "username": username, "password": password });
    client.login(&credentials).await?;

    let token = client
        .token()
        .map(str::to_owned)
        .ok_or_else(|| anyhow::anyhow!("Server accepted the login but issued no session token"))?;

    // Ask who we are with the fresh token
    let session = load_session(&client).await;
    let teacher = session.session().map(|s| s.display_name()).unwrap_or(username);

    ctx.profile.sign_in(Some(token), Some(teacher.clone()));
    save_profile(&ctx.profile)?;

    ctx.ui.alert.set(Alert::success(format!("Signed in as {}", teacher)));
    Ok(())
}

async fn logout(ctx: &mut Context) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let body = client.logout().await;

    // The local token goes regardless of what the server said
    ctx.profile.sign_out();
    save_profile(&ctx.profile)?;

    let alert = match body {
        Ok(body) => Alert::success(
            body.get("message")
                .and_then(Value::as_str)
                .unwrap_or("Signed out"),
        ),
        Err(e) => Alert::error(format!("Signed out locally; the server did not confirm: {}", e)),
    };
    ctx.ui.alert.set(alert);
    Ok(())
}

async fn status(ctx: &Context) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let state = load_session(&client).await;
    print_state(&ctx.output, &state)
}

async fn watch(ctx: &Context, interval: Option<u64>) -> anyhow::Result<()> {
    let interval = match interval {
        Some(0) => anyhow::bail!("--interval must be at least 1 second"),
        Some(secs) => Duration::from_secs(secs),
        None => crate::config::config().session.poll_interval(),
    };

    let poller = AuthPoller::spawn(Arc::new(ctx.client()?), interval);
    let mut updates = poller.subscribe();
    let mut last: Option<SessionState> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let state = updates.borrow_and_update().state.clone();
        if last.as_ref() != Some(&state) {
            print_state(&ctx.output, &state)?;
            last = Some(state);
        }
    }

    poller.stop().await;
    Ok(())
}

fn print_state(output: &OutputFormat, state: &SessionState) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => {
            let value = match state {
                SessionState::Loading => json!({ "state": "loading" }),
                SessionState::Anonymous => json!({ "state": "anonymous" }),
                SessionState::Failed(reason) => json!({ "state": "failed", "error": reason }),
                SessionState::Active(session) => json!({
                    "state": "active",
                    "teacher": session.teacher,
                    "permissions": session.permissions,
                }),
            };
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => match state {
            SessionState::Loading => println!("Checking session..."),
            SessionState::Anonymous => println!("Not signed in"),
            SessionState::Failed(reason) => println!("Session unknown: {}", reason),
            SessionState::Active(session) => {
                let permissions: Vec<&str> = session.permissions.iter().map(String::as_str).collect();
                output_success(output, &format!("Signed in as {}", session.display_name()), None)?;
                println!("  permissions: {}", permissions.join(", "));
            }
        },
    }
    Ok(())
}
