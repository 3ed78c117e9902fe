//! Server settings: defaults, then `bands.toml`, then `BANDS_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use serde::Deserialize;

/// File read from the working directory when present.
pub const CONFIG_FILE: &str = "bands.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// SQLite file holding bands and slides.
    pub database_path: PathBuf,
    /// Directory uploaded images are written to and served from under `/uploads`.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Open the editor in the default browser once the server is up.
    pub open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            database_path: PathBuf::from("bands.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            open_browser: true,
        }
    }
}

impl Settings {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Loads settings from `path` (if it exists) and applies overrides looked up with `env`.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw).unwrap_or_else(|e| {
            warn!("Ignoring {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    };

    if let Some(v) = env("BANDS_HOST") {
        settings.host = v;
    }
    override_parsed(&env, "BANDS_PORT", &mut settings.port);
    if let Some(v) = env("BANDS_DATABASE") {
        settings.database_path = PathBuf::from(v);
    }
    if let Some(v) = env("BANDS_UPLOAD_DIR") {
        settings.upload_dir = PathBuf::from(v);
    }
    override_parsed(&env, "BANDS_MAX_UPLOAD_BYTES", &mut settings.max_upload_bytes);
    override_parsed(&env, "BANDS_OPEN_BROWSER", &mut settings.open_browser);

    settings
}

fn override_parsed<T: FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    if let Some(raw) = env(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *slot = value,
            Err(_) => warn!("Ignoring {key}={raw:?}: not a valid value"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
