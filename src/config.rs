use crate::gateway::DEFAULT_API_BASE;
use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_ENV: &str = "LECTURE_API_URL";

#[derive(Parser, Debug, Default)]
#[command(name = "lecture-study", version, about = "Study lecture notes, flashcards and quizzes")]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long)]
    pub api_url: Option<String>,

    /// Directory exported decks are written to
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Open this lecture id directly instead of the library
    #[arg(long)]
    pub lecture: Option<String>,

    /// Read settings from this file instead of the platform config dir
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_list_limit() -> usize {
    10
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            list_limit: default_list_limit(),
            export_dir: default_export_dir(),
            request_timeout_secs: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// File, then environment, then command line; later sources win.
    pub fn resolve(cli: &Cli) -> Self {
        let path = cli.config.clone().or_else(Self::config_path);
        let mut config = match path {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli(cli);
        config
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Self::parse(&content))
        {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(dir) = &cli.export_dir {
            self.export_dir = dir.clone();
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "lecture-study")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|p| p.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|p| p.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.list_limit, 10);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("list_limit = 25\nrequest_timeout_secs = 30\n").unwrap();
        assert_eq!(config.list_limit, 25);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "list_limit = \"many\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        assert_eq!(
            Config::load_from(&dir.path().join("missing.toml")),
            Config::default()
        );
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let mut config = Config::parse("api_base_url = \"http://file.test\"").unwrap();

        config.apply_env(|key| (key == API_URL_ENV).then(|| "http://env.test".to_string()));
        assert_eq!(config.api_base_url, "http://env.test");

        let cli = Cli::parse_from(["lecture-study", "--api-url", "http://cli.test"]);
        config.apply_cli(&cli);
        assert_eq!(config.api_base_url, "http://cli.test");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_cli_parses_lecture_and_export_dir() {
        let cli = Cli::parse_from([
            "lecture-study",
            "--lecture",
            "abc-123",
            "--export-dir",
            "/tmp/decks",
        ]);
        assert_eq!(cli.lecture.as_deref(), Some("abc-123"));
        let mut config = Config::default();
        config.apply_cli(&cli);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/decks"));
    }

    #[test]
    fn test_unknown_log_level_defaults_to_info() {
        let config = Config {
            log_level: "chatty".into(),
            ..Config::default()
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        let config = Config {
            log_level: "debug".into(),
            ..Config::default()
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }
}
