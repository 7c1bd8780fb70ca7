use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ReportError;

pub const DATAFORSEO_LOGIN_ENV_VAR: &str = "DATAFORSEO_LOGIN";
pub const DATAFORSEO_PASSWORD_ENV_VAR: &str = "DATAFORSEO_PASSWORD";
pub const GEMINI_API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Configuration file structure. All fields are optional to allow partial
/// configuration; CLI flags and environment variables take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Run the performance audit against the mobile rendering
    pub mobile: Option<bool>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// DataForSEO API login (environment variable wins)
    pub dataforseo_login: Option<String>,

    /// DataForSEO API password (environment variable wins)
    pub dataforseo_password: Option<String>,

    /// Gemini API key (environment variable wins)
    pub gemini_api_key: Option<String>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Check current directory first (highest priority)
        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("seoscribe.{}", ext)));
            }
        }

        // Check user config directory (~/.config/seoscribe)
        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|p| {
                if p.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(p))
                }
            })
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_config_dir = config_home.join("seoscribe");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(app_config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }
}

/// Provider credentials for one pipeline invocation. Never persisted and
/// never read from globals: every fetcher takes these as a parameter.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub dataforseo_login: String,
    pub dataforseo_password: String,
    pub gemini_api_key: String,
}

impl Credentials {
    /// Resolves credentials from the environment, falling back to the config
    /// file. Anything still missing is a configuration error raised before
    /// any network call.
    pub fn resolve(config: &Config) -> Result<Self, ReportError> {
        let mut missing = Vec::new();

        let dataforseo_login = env_or(DATAFORSEO_LOGIN_ENV_VAR, &config.dataforseo_login);
        let dataforseo_password = env_or(DATAFORSEO_PASSWORD_ENV_VAR, &config.dataforseo_password);
        let gemini_api_key = env_or(GEMINI_API_KEY_ENV_VAR, &config.gemini_api_key);

        if dataforseo_login.is_none() {
            missing.push(DATAFORSEO_LOGIN_ENV_VAR);
        }
        if dataforseo_password.is_none() {
            missing.push(DATAFORSEO_PASSWORD_ENV_VAR);
        }
        if gemini_api_key.is_none() {
            missing.push(GEMINI_API_KEY_ENV_VAR);
        }

        if !missing.is_empty() {
            return Err(ReportError::Configuration(format!(
                "missing credentials: {} (set the environment variable or add it to the config file)",
                missing.join(", ")
            )));
        }

        Ok(Self {
            dataforseo_login: dataforseo_login.unwrap_or_default(),
            dataforseo_password: dataforseo_password.unwrap_or_default(),
            gemini_api_key: gemini_api_key.unwrap_or_default(),
        })
    }
}

fn env_or(var: &str, fallback: &Option<String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.clone().filter(|v| !v.is_empty()))
}
