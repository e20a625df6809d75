use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;

const SETTINGS_DIR: &str = ".taskboard";
const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "taskboard.log";

pub const API_URL_ENV: &str = "TASKBOARD_API_URL";
pub const LOG_FILE_ENV: &str = "TASKBOARD_LOG";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Reads `.taskboard/settings.json` from `std::env::current_dir()`.
    /// Returns defaults if the file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from(std::env::current_dir().ok())
    }

    fn load_from(cwd: Option<PathBuf>) -> Self {
        let Some(cwd) = cwd else {
            return Self::default();
        };
        let path = Self::path_in(&cwd);
        Self::read_file(&path).unwrap_or_default()
    }

    fn read_file(path: &Path) -> Option<Self> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
                None
            }
        }
    }

    /// Returns the path to the settings file relative to a given directory.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// Base URL to talk to. Precedence: explicit flag, then
    /// `TASKBOARD_API_URL`, then the settings file, then the built-in default.
    pub fn resolve_api_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        pick_api_url(flag, env.as_deref(), self.api_url.as_deref())
    }

    /// Where the TUI writes its log. Uses `TASKBOARD_LOG` if set, then the
    /// settings file, otherwise `~/.taskboard/taskboard.log`.
    pub fn resolve_log_file(&self) -> Result<PathBuf> {
        if let Ok(p) = std::env::var(LOG_FILE_ENV) {
            return Ok(PathBuf::from(p));
        }
        if let Some(p) = &self.log_file {
            return Ok(p.clone());
        }
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(SETTINGS_DIR).join(LOG_FILE))
    }
}

fn pick_api_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let settings_dir = dir.path().join(".taskboard");
        fs::create_dir_all(&settings_dir).unwrap();
        fs::write(
            settings_dir.join("settings.json"),
            r#"{"api_url": "http://tasks.internal:9000/api/tarefas"}"#,
        )
        .unwrap();

        let settings = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(
            settings.api_url.as_deref(),
            Some("http://tasks.internal:9000/api/tarefas")
        );
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_load_malformed_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let settings_dir = dir.path().join(".taskboard");
        fs::create_dir_all(&settings_dir).unwrap();
        fs::write(settings_dir.join("settings.json"), "not json").unwrap();

        let settings = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_reads_every_field() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            api_url: Some("http://localhost:1234/api/tarefas".to_string()),
            log_file: Some(PathBuf::from("/tmp/taskboard.log")),
        };
        let path = Settings::path_in(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = Settings::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_api_url_precedence() {
        assert_eq!(
            pick_api_url(Some("http://flag"), Some("http://env"), Some("http://file")),
            "http://flag"
        );
        assert_eq!(
            pick_api_url(None, Some("http://env"), Some("http://file")),
            "http://env"
        );
        assert_eq!(pick_api_url(None, None, Some("http://file")), "http://file");
        assert_eq!(pick_api_url(None, None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_blank_api_url_falls_through() {
        assert_eq!(pick_api_url(Some("  "), None, Some("http://file")), "http://file");
    }
}
