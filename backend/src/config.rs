//! Configuration management for the Digital Farmer platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with DF_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Generative-AI provider configuration
    pub ai: AiConfig,

    /// Session bootstrap options
    pub farm: FarmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// API key; when absent every provider call falls back locally
    #[serde(default)]
    pub api_key: Option<String>,

    /// REST base URL of the generative model service
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl AiConfig {
    /// API key, if one is configured and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FarmConfig {
    /// Seed a demo field and tasks on startup
    pub seed_demo: bool,

    /// Location used for weather when the caller gives none
    pub default_location: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("DF_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("ai.base_url", "https://generativelanguage.googleapis.com/v1beta")?
            .set_default("ai.model", "gemini-3-flash-preview")?
            .set_default("ai.timeout_secs", 60)?
            .set_default("farm.seed_demo", false)?
            .set_default("farm.default_location", "Tekirdağ, Hayrabolu")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DF_ prefix)
            .add_source(
                Environment::with_prefix("DF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
