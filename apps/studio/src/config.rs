use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "studio.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub download_dir: PathBuf,
    pub notification_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".into(),
            download_dir: PathBuf::from("./downloads"),
            notification_ms: 3000,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    download_dir: Option<PathBuf>,
    notification_ms: Option<u64>,
    log_filter: Option<String>,
}

impl Settings {
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn apply_file_overrides(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw).context("failed to parse settings file")?;
        if let Some(v) = file.backend_url {
            self.backend_url = v;
        }
        if let Some(v) = file.download_dir {
            self.download_dir = v;
        }
        if let Some(v) = file.notification_ms {
            self.notification_ms = v;
        }
        if let Some(v) = file.log_filter {
            self.log_filter = v;
        }
        Ok(())
    }

    /// `STUDIO_*` names are read first; `APP__*` names win when both are set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STUDIO_BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = lookup("APP__BACKEND_URL") {
            self.backend_url = v;
        }

        if let Some(v) = lookup("STUDIO_DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("APP__DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(v);
        }

        if let Some(v) = lookup("APP__NOTIFICATION_MS") {
            self.notification_ms = v
                .trim()
                .parse()
                .with_context(|| format!("APP__NOTIFICATION_MS is not a number: '{v}'"))?;
        }

        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }
        Ok(())
    }
}

/// Defaults, then the settings file, then the process environment. A missing
/// file is only an error when it was named explicitly.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    match fs::read_to_string(&path) {
        Ok(raw) => settings
            .apply_file_overrides(&raw)
            .with_context(|| format!("invalid settings in '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    }

    settings.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
