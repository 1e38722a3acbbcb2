use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::render::DEFAULT_PAGE_TITLE;

pub const SETTINGS_FILE: &str = "settings.toml";
pub const DEFAULT_OUTPUT_FILE: &str = "tomatillos.html";

/// User settings, read from `settings.toml` in the platform config directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where pages are written. Defaults to the platform data directory.
    pub output_dir: Option<PathBuf>,
    pub output_file: String,
    pub open_browser: bool,
    pub page_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            open_browser: true,
            page_title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "tomatillos", "tomatillos")
}

impl Settings {
    /// Settings file, then environment overrides.
    pub fn load() -> Self {
        let mut settings = project_dirs()
            .map(|p| Self::from_file(&p.config_dir().join(SETTINGS_FILE)))
            .unwrap_or_default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// A missing file gives the defaults; so does an unreadable or invalid one,
    /// with a warning.
    pub fn from_file(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file");
                return Self::default();
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "unable to read settings; using defaults");
                return Self::default();
            }
        };
        toml::from_str(&text).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "invalid settings; using defaults");
            Self::default()
        })
    }

    /// `TOMATILLOS_OUTPUT_DIR` and `TOMATILLOS_OPEN_BROWSER` win over the file.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("TOMATILLOS_OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            self.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(open) = var("TOMATILLOS_OPEN_BROWSER").and_then(|v| parse_flag(&v)) {
            self.open_browser = open;
        }
    }

    /// The configured directory, else the project data directory.
    pub fn resolved_output_dir(&self) -> Option<PathBuf> {
        self.output_dir
            .clone()
            .or_else(|| project_dirs().map(|p| p.data_dir().to_path_buf()))
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.resolved_output_dir().map(|dir| dir.join(&self.output_file))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "0" | "false" | "no" | "off" => Some(false),
        "1" | "true" | "yes" | "on" => Some(true),
        _ => None,
    }
}
