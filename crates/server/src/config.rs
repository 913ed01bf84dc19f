//! # Application Configuration
//!
//! This module defines the configuration structure for the `civdoc-server` and
//! provides the logic for loading it from an optional `config.yml` file and
//! environment variables.

use civdoc::ProviderConfig;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The largest request body accepted, in bytes. Loaded from `MAX_BODY_BYTES`.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Answer undecodable payloads with 422 instead of an embedded error with 200.
    #[serde(default)]
    pub strict_status_codes: bool,
    /// The inference provider used for extraction.
    #[serde(default)]
    pub ai: ProviderConfig,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

/// Conventional environment variables used as the lowest-priority source for
/// provider settings. Later entries win over earlier ones for the same key.
const ENV_FALLBACKS: [(&str, &str); 5] = [
    ("ai.api_key", "GEMINI_API_KEY"),
    ("ai.api_key", "AI_API_KEY"),
    ("ai.project_id", "GOOGLE_CLOUD_PROJECT"),
    ("ai.region", "GOOGLE_CLOUD_LOCATION"),
    ("ai.access_token", "GOOGLE_OAUTH_ACCESS_TOKEN"),
];

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Sources, from lowest to highest priority:
/// - Conventional variables such as `AI_API_KEY` and `GOOGLE_CLOUD_PROJECT`.
/// - The YAML file at `config_path_override`, or `config.yml` next to this
///   crate's manifest when present. `${VAR}` placeholders are substituted.
/// - Top-level keys from unprefixed variables (`PORT`, `STRICT_STATUS_CODES`).
/// - Nested keys from `CIVDOC_...` variables (e.g. `CIVDOC_AI__MODEL_NAME`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    // Layer 1: Conventional environment variables as defaults.
    for (key, var) in ENV_FALLBACKS {
        if let Ok(value) = env::var(var) {
            if !value.is_empty() {
                builder = builder.set_default(key, value)?;
            }
        }
    }

    // Layer 2: Config file. An explicit path must exist; the default one is optional.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            if let Some(content) = read_and_substitute(&default_path)? {
                info!("Loading configuration from '{default_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("CIVDOC")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
