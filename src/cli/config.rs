use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::normalize_base_path;

/// Which server the CLI talks to and the session it holds there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliProfile {
    pub server_url: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Default for CliProfile {
    fn default() -> Self {
        let base_path = std::env::var("BASE_PATH")
            .or_else(|_| std::env::var("NEXT_PUBLIC_BASE_PATH"))
            .map(|path| normalize_base_path(&path))
            .unwrap_or_default();

        Self {
            server_url: "http://localhost:3000".to_string(),
            base_path,
            token: None,
            teacher: None,
            logged_in_at: None,
        }
    }
}

impl CliProfile {
    pub fn sign_in(&mut self, token: Option<String>, teacher: Option<String>) {
        self.token = token;
        self.teacher = teacher;
        self.logged_in_at = Some(Utc::now());
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.teacher = None;
        self.logged_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ACADEMY_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("academy").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_profile() -> anyhow::Result<CliProfile> {
    let profile_file = get_config_dir()?.join("profile.json");

    if !profile_file.exists() {
        return Ok(CliProfile::default());
    }

    let content = fs::read_to_string(profile_file)?;
    let profile: CliProfile = serde_json::from_str(&content)?;
    Ok(profile)
}

pub fn save_profile(profile: &CliProfile) -> anyhow::Result<()> {
    let profile_file = get_config_dir()?.join("profile.json");

    let content = serde_json::to_string_pretty(profile)?;
    fs::write(profile_file, content)?;
    Ok(())
}
