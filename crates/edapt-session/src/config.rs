//! Configuration types for the EdAPT session core.
//!
//! This module provides the configuration structures that control the
//! session server: where durable student records live, which model
//! runtime endpoint to call, and which model identifiers back each of
//! the three generation roles.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "edapt.json";

/// Default directory for durable student records.
fn default_data_dir() -> String {
    ".".to_string()
}

/// Default profile record file name.
fn default_profile_file() -> String {
    "student_profile.json".to_string()
}

/// Default progress history file name.
fn default_progress_file() -> String {
    "progress_student.json".to_string()
}

/// Default learning goals file name.
fn default_goals_file() -> String {
    "learning_goals.json".to_string()
}

/// Default model runtime endpoint.
fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

/// Default timeout in seconds for a single generation request.
const fn default_request_timeout() -> u64 {
    120
}

/// Default fast general-purpose model.
fn default_fast_model() -> String {
    "gemma3n:e2b".to_string()
}

/// Default higher-quality model for lesson plans.
fn default_accurate_model() -> String {
    "empowered-gemma-3n-2b-q8:latest".to_string()
}

/// Default vision-capable model for image description.
fn default_vision_model() -> String {
    "gemma3n:e4b".to_string()
}

/// Main configuration for the EdAPT session server.
///
/// Controls durable record locations, the model runtime endpoint, and
/// the model identifiers used for each generation role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the profile, progress, and goals records.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the student profile record, relative to `data_dir`.
    #[serde(default = "default_profile_file")]
    pub profile_file: String,

    /// File name of the progress history, relative to `data_dir`.
    #[serde(default = "default_progress_file")]
    pub progress_file: String,

    /// File name of the learning goals log, relative to `data_dir`.
    #[serde(default = "default_goals_file")]
    pub goals_file: String,

    /// Base URL of the Ollama-compatible model runtime.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout for a single generation request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Model identifiers for the three generation roles.
    #[serde(default)]
    pub models: ModelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profile_file: default_profile_file(),
            progress_file: default_progress_file(),
            goals_file: default_goals_file(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            models: ModelConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `edapt.json` in the current directory. If found, loads and
    /// validates the configuration. If not found, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            SessionError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from a specific directory.
    ///
    /// Looks for `edapt.json` in the given directory. If found, loads and
    /// validates the configuration. If not found, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    /// If the file exists but contains invalid JSON, returns an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ConfigParseError` if the file exists but
    /// contains invalid JSON.
    ///
    /// Returns `SessionError::ConfigValidationError` if the configuration
    /// values are invalid (e.g., empty endpoint, zero timeout).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(SessionError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| SessionError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// Checks that all required fields have valid values:
    /// - `endpoint` must not be empty
    /// - `request_timeout_secs` must be greater than 0
    /// - record file names and `data_dir` must not be empty
    /// - all three model identifiers must not be empty
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(SessionError::config_validation(
                "endpoint must not be empty",
                "Set endpoint to your model runtime URL in edapt.json (e.g. 'http://localhost:11434')",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SessionError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Set requestTimeoutSecs to at least 1 second in your edapt.json",
            ));
        }

        if self.data_dir.trim().is_empty() {
            return Err(SessionError::config_validation(
                "dataDir must not be empty",
                "Provide a valid data directory in your edapt.json (use '.' for current directory)",
            ));
        }

        for (field, value) in [
            ("profileFile", &self.profile_file),
            ("progressFile", &self.progress_file),
            ("goalsFile", &self.goals_file),
        ] {
            if value.trim().is_empty() {
                return Err(SessionError::config_validation(
                    format!("{field} must not be empty"),
                    format!("Provide a valid file name for {field} in your edapt.json"),
                ));
            }
        }

        for (field, value) in [
            ("models.fast", &self.models.fast),
            ("models.accurate", &self.models.accurate),
            ("models.vision", &self.models.vision),
        ] {
            if value.trim().is_empty() {
                return Err(SessionError::config_validation(
                    format!("{field} must not be empty"),
                    format!("Provide a model identifier for {field} in your edapt.json"),
                ));
            }
        }

        Ok(())
    }

    /// Returns the full path of the profile record.
    #[must_use]
    pub fn profile_path(&self) -> std::path::PathBuf {
        Path::new(&self.data_dir).join(&self.profile_file)
    }

    /// Returns the full path of the progress history.
    #[must_use]
    pub fn progress_path(&self) -> std::path::PathBuf {
        Path::new(&self.data_dir).join(&self.progress_file)
    }

    /// Returns the full path of the learning goals log.
    #[must_use]
    pub fn goals_path(&self) -> std::path::PathBuf {
        Path::new(&self.data_dir).join(&self.goals_file)
    }
}

/// Model identifiers for the three generation roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Fast general-purpose model for text adaptation and questions.
    #[serde(default = "default_fast_model")]
    pub fast: String,

    /// Higher-quality, slower model for lesson plans.
    #[serde(default = "default_accurate_model")]
    pub accurate: String,

    /// Vision-capable model for image description.
    #[serde(default = "default_vision_model")]
    pub vision: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fast: default_fast_model(),
            accurate: default_accurate_model(),
            vision: default_vision_model(),
        }
    }
}
