pub mod commands;
pub mod config;
pub mod pages;
pub mod table;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::AdminClient;
use crate::ui::UiStore;
use config::CliProfile;

#[derive(Parser)]
#[command(name = "academy")]
#[command(about = "Academy CLI - school administration from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(short = 'y', long, global = true, help = "Answer yes to every confirmation")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Choose the admin server to talk to")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Sign in, sign out and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(name = "admin-log", about = "Show the admin activity log")]
    AdminLog(commands::ListArgs),

    #[command(about = "List and change permissions")]
    Permissions {
        #[command(subcommand)]
        cmd: commands::admin::PermissionCommands,
    },

    #[command(about = "List and create schools")]
    Schools {
        #[command(subcommand)]
        cmd: commands::school::SchoolCommands,
    },

    #[command(about = "List and create students, assign subjects")]
    Students {
        #[command(subcommand)]
        cmd: commands::student::StudentCommands,
    },

    #[command(about = "List and create subjects")]
    Subjects {
        #[command(subcommand)]
        cmd: commands::subject::SubjectCommands,
    },

    #[command(about = "List teachers and change their level")]
    Teachers {
        #[command(subcommand)]
        cmd: commands::teacher::TeacherCommands,
    },

    #[command(about = "List homework")]
    Homeworks(commands::ListArgs),

    #[command(about = "Student attendance records")]
    Attendance {
        #[command(subcommand)]
        cmd: commands::records::AttendanceCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: output mode, the saved profile and the
/// dialog/alert store it reports through.
pub struct Context {
    pub output: OutputFormat,
    pub ui: UiStore,
    pub profile: CliProfile,
    pub assume_yes: bool,
}

impl Context {
    pub fn new(output: OutputFormat, assume_yes: bool) -> anyhow::Result<Self> {
        let mut profile = config::load_profile()?;
        if let Ok(url) = std::env::var("ACADEMY_SERVER_URL") {
            profile.server_url = url;
        }

        Ok(Self {
            output,
            ui: UiStore::new(),
            profile,
            assume_yes,
        })
    }

    /// A client for the profile's server, carrying the saved token.
    pub fn client(&self) -> anyhow::Result<AdminClient> {
        let client = AdminClient::new(&self.profile.server_url, &self.profile.base_path)?;
        Ok(client.with_token(self.profile.token.clone()))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut ctx = Context::new(output_format, cli.yes)?;

    let result = match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &mut ctx).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut ctx).await,
        Commands::AdminLog(args) => commands::admin::admin_log(args, &ctx).await,
        Commands::Permissions { cmd } => commands::admin::handle(cmd, &ctx).await,
        Commands::Schools { cmd } => commands::school::handle(cmd, &ctx).await,
        Commands::Students { cmd } => commands::student::handle(cmd, &ctx).await,
        Commands::Subjects { cmd } => commands::subject::handle(cmd, &ctx).await,
        Commands::Teachers { cmd } => commands::teacher::handle(cmd, &ctx).await,
        Commands::Homeworks(args) => commands::records::homeworks(args, &ctx).await,
        Commands::Attendance { cmd } => commands::records::handle(cmd, &ctx).await,
    };

    // Alerts raised before a failure still get shown
    pages::present(&ctx)?;
    result
}
