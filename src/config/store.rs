use std::{
    fs, io,
    path::{Path, PathBuf},
};

use config::{Config, File, FileFormat};
use error_stack::{Result, ResultExt};
use serde::{de::IntoDeserializer, Deserialize};
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};
use thiserror::Error;

use super::{
    app_config::AppConfig,
    setup::{run_setup, SetupPrompter},
};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "BTC_BALANCE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file '{0}' could not be parsed; delete it and re-run setup")]
    Malformed(String),
    #[error("configuration field '{field}' in '{path}' is missing or invalid; delete the file and re-run setup")]
    InvalidField { path: String, field: String },
    #[error("configuration file '{path}' is incomplete ({reason}); delete it and re-run setup")]
    Incomplete { path: String, reason: String },
    #[error("failed to write configuration file '{0}'")]
    WriteError(String),
    #[error("first-time setup was interrupted")]
    SetupError,
}

/// The configuration file on disk. Read once per run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the configuration, running the first-time setup when the file does not exist.
    pub fn load_or_init(
        &self,
        prompter: &mut dyn SetupPrompter,
    ) -> Result<AppConfig, ConfigError> {
        if self.exists() {
            return self.load();
        }

        tracing::info!(
            "Config: 📋 No configuration at '{}', running first-time setup",
            self.path.display()
        );
        let config = run_setup(prompter)?;
        self.save(&config)?;
        tracing::info!("Config: ✅ Saved configuration to '{}'", self.path.display());

        Ok(config)
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let config_path = self.path.display().to_string();

        let value = Config::builder()
            .add_source(File::from(self.path.as_path()).format(FileFormat::Json))
            .build()
            .change_context_lazy(|| ConfigError::Malformed(config_path.clone()))?
            .try_deserialize::<serde_json::Value>()
            .change_context_lazy(|| ConfigError::Malformed(config_path.clone()))?;

        let mut track = Track::new();
        let path_de = PathDeserializer::new(value.into_deserializer(), &mut track);
        match AppConfig::deserialize(path_de) {
            Ok(config) => {
                tracing::debug!("Config: loaded {:?}", config);
                Ok(config.normalized())
            }
            Err(e) => {
                let path = track
                    .path()
                    .iter()
                    .map(|seg| match seg {
                        Segment::Seq { index } => format!("[{}]", index),
                        Segment::Map { key } => format!(".{}", key),
                        Segment::Enum { variant } => format!("::{}", variant),
                        Segment::Unknown => String::from("<?>"),
                    })
                    .collect::<String>();
                // Missing top-level fields fail before any segment is tracked.
                let context = match path.trim_start_matches('.') {
                    "" => ConfigError::Incomplete {
                        path: config_path,
                        reason: e.to_string(),
                    },
                    field => ConfigError::InvalidField {
                        path: config_path,
                        field: field.to_owned(),
                    },
                };
                Err(error_stack::report!(e).change_context(context))
            }
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let config_path = self.path.display().to_string();
        let write_error = || ConfigError::WriteError(config_path.clone());

        let mut json = serde_json::to_string_pretty(config).change_context_lazy(write_error)?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).change_context_lazy(write_error)?;
        }
        fs::write(&self.path, json).change_context_lazy(write_error)?;
        restrict_permissions(&self.path).change_context_lazy(write_error)?;

        Ok(())
    }
}

// The file holds exchange credentials.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
