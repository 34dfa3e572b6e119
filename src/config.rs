//! config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file
//! 3. Environment variables (`GITHUB_TOKEN`, `OPENAI_API_KEY`)
//! 4. CLI flags (not handled here)
//!
//! # Config File Locations
//!
//! Searched in order:
//! 1. Explicit `--config <path>`
//! 2. `$ISSUELENS_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/issuelens/config.toml`
//! 4. `~/.issuelens/config.toml`
//!
//! A missing file at a discovered location is not an error; defaults are
//! used. A path named explicitly (flag or env var) must exist.
//!
//! # Example
//!
//! ```toml
//! [github]
//! token = "ghp_..."
//!
//! [openai]
//! api_key = "sk-..."
//! model = "gpt-3.5-turbo"
//!
//! [analysis]
//! chunk_size = 25
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::Tuning;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// GitHub access settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    /// Personal access token; `GITHUB_TOKEN` overrides.
    pub token: Option<String>,
    /// API base URL override (GitHub Enterprise).
    pub api_base: Option<String>,
}

/// OpenAI backend settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key; `OPENAI_API_KEY` overrides. Analysis is unavailable
    /// without one.
    pub api_key: Option<String>,
    /// Chat model name; defaults to gpt-3.5-turbo.
    pub model: Option<String>,
    /// API base URL override (compatible proxies).
    pub api_base: Option<String>,
}

/// Issue cache settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file path; defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

/// Analysis pipeline sizing; see [`Tuning`] for the semantics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub direct_threshold: Option<usize>,
    pub chunk_size: Option<usize>,
    pub reduce_fan_in: Option<usize>,
    pub body_preview_chars: Option<usize>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load configuration, preferring `explicit` when given.
    ///
    /// Applies environment overrides and validates the result. A missing
    /// default-location file is not an error, but a path named explicitly
    /// (via `--config` or `ISSUELENS_CONFIG`) must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var("ISSUELENS_CONFIG").ok().map(PathBuf::from);
        Self::load_with(explicit, env_path)
    }

    fn load_with(explicit: Option<&Path>, env_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Explicit paths (flag or env var) must exist; discovered ones are
        // optional.
        let (path, required) = match (explicit, env_path) {
            (Some(p), _) => (Some(p.to_path_buf()), true),
            (None, Some(p)) => (Some(p), true),
            (None, None) => (Self::discovered_location(), false),
        };

        let mut config = match path {
            Some(ref p) if p.exists() => Self::read_file(p)?,
            Some(ref p) if required => {
                return Err(ConfigError::ReadError {
                    path: p.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                });
            }
            _ => Self::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// First existing default config location, if any.
    fn discovered_location() -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg).join("issuelens/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".issuelens/config.toml"));
        }

        candidates.iter().find(|p| p.exists()).cloned()
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a TOML document into a config.
    fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                self.github.token = Some(token);
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.openai.api_key = Some(key);
            }
        }
    }

    /// Validate loaded values.
    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("analysis.direct_threshold", self.analysis.direct_threshold),
            ("analysis.chunk_size", self.analysis.chunk_size),
            ("analysis.reduce_fan_in", self.analysis.reduce_fan_in),
            (
                "analysis.body_preview_chars",
                self.analysis.body_preview_chars,
            ),
        ];
        for (name, value) in checks {
            if value == Some(0) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        // A fan-in of 1 would make reduce rounds 1:1 and never converge
        if self.analysis.reduce_fan_in == Some(1) {
            return Err(ConfigError::InvalidValue(
                "analysis.reduce_fan_in must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// The OpenAI model name to use.
    pub fn openai_model(&self) -> &str {
        self.openai
            .model
            .as_deref()
            .unwrap_or(crate::llm::openai::DEFAULT_MODEL)
    }

    /// Analysis tuning with config overrides applied over the defaults.
    pub fn tuning(&self) -> Tuning {
        let defaults = Tuning::default();
        Tuning {
            direct_threshold: self
                .analysis
                .direct_threshold
                .unwrap_or(defaults.direct_threshold),
            chunk_size: self.analysis.chunk_size.unwrap_or(defaults.chunk_size),
            reduce_fan_in: self
                .analysis
                .reduce_fan_in
                .unwrap_or(defaults.reduce_fan_in),
            body_preview_chars: self
                .analysis
                .body_preview_chars
                .unwrap_or(defaults.body_preview_chars),
        }
    }

    /// The issue cache database path.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.store.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("issuelens/issues.db"))
            .ok_or(ConfigError::NoHomeDir)
    }
}
