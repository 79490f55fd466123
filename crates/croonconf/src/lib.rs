//! Minimal configuration loading for Crooner.
//!
//! This crate provides configuration loading with minimal dependencies,
//! designed to be imported by the other Crooner crates without dragging
//! in HTTP or terminal machinery.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/crooner/config.toml` (system)
//! 2. `~/.config/crooner/config.toml` (user)
//! 3. `./crooner.toml` (local override)
//! 4. Environment variables (`SPOTIFY_*`, `OPENAI_API_KEY`, `CROONER_*`)
//!
//! # Example Config
//!
//! ```toml
//! [spotify]
//! client_id = "abc123"
//! client_secret = "shhh"
//! redirect_uri = "http://localhost:8888/callback"
//! market = "US"
//!
//! [openai]
//! api_key = "sk-..."
//! model = "gpt-4o-mini"
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod loader;

pub use loader::{discover_config_files_with_override, expand_path, ConfigSources};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Music provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// OAuth client id. Required before authorization can start.
    pub client_id: String,
    /// OAuth client secret. Required before authorization can start.
    pub client_secret: String,
    /// Redirect target registered with the provider.
    pub redirect_uri: String,
    /// Web API base URL.
    pub api_url: String,
    /// Accounts service base URL (authorization + token endpoints).
    pub accounts_url: String,
    /// Token cache file. The format is internal to the authenticator.
    pub cache_path: PathBuf,
    /// Country code used for top-tracks lookups.
    pub market: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            api_url: "https://api.spotify.com".to_string(),
            accounts_url: "https://accounts.spotify.com".to_string(),
            cache_path: loader::expand_path("~/.cache/crooner/spotify_token.json"),
            market: "US".to_string(),
        }
    }
}

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key. Required at startup.
    pub api_key: String,
    /// Completions base URL.
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Complete Crooner configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CroonConfig {
    pub spotify: SpotifyConfig,
    pub openai: OpenAiConfig,
    pub telemetry: TelemetryConfig,
}

impl CroonConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/crooner/config.toml`
    /// 3. `~/.config/crooner/config.toml`
    /// 4. `./crooner.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./crooner.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and return information about sources.
    pub fn load_with_sources() -> Result<(Self, ConfigSources), ConfigError> {
        Self::load_with_sources_from(None)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut merged = toml::Table::new();

        // Load config files in order
        for path in loader::discover_config_files_with_override(config_path) {
            let table = loader::load_table(&path)?;
            loader::merge_tables(&mut merged, table);
            sources.files.push(path);
        }

        let mut config = loader::from_table(merged)?;

        // Apply environment variable overrides
        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Names of required credentials that are missing or empty.
    ///
    /// Empty result means authorization and completion calls can start.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.spotify.client_id.is_empty() {
            missing.push("spotify.client_id (SPOTIFY_CLIENT_ID)");
        }
        if self.spotify.client_secret.is_empty() {
            missing.push("spotify.client_secret (SPOTIFY_CLIENT_SECRET)");
        }
        if self.spotify.redirect_uri.is_empty() {
            missing.push("spotify.redirect_uri (SPOTIFY_REDIRECT_URI)");
        }
        if self.openai.api_key.is_empty() {
            missing.push("openai.api_key (OPENAI_API_KEY)");
        }
        missing
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Build TOML manually for nicer formatting, secrets redacted
        let mut output = String::new();

        output.push_str("# Crooner Configuration\n\n");

        output.push_str("[spotify]\n");
        output.push_str(&format!("client_id = \"{}\"\n", self.spotify.client_id));
        output.push_str(&format!(
            "client_secret = \"{}\"\n",
            if self.spotify.client_secret.is_empty() {
                ""
            } else {
                "<redacted>"
            }
        ));
        output.push_str(&format!(
            "redirect_uri = \"{}\"\n",
            self.spotify.redirect_uri
        ));
        output.push_str(&format!("api_url = \"{}\"\n", self.spotify.api_url));
        output.push_str(&format!(
            "accounts_url = \"{}\"\n",
            self.spotify.accounts_url
        ));
        output.push_str(&format!(
            "cache_path = \"{}\"\n",
            self.spotify.cache_path.display()
        ));
        output.push_str(&format!("market = \"{}\"\n", self.spotify.market));

        output.push_str("\n[openai]\n");
        output.push_str(&format!(
            "api_key = \"{}\"\n",
            if self.openai.api_key.is_empty() {
                ""
            } else {
                "<redacted>"
            }
        ));
        output.push_str(&format!("api_url = \"{}\"\n", self.openai.api_url));
        output.push_str(&format!("model = \"{}\"\n", self.openai.model));
        output.push_str(&format!("temperature = {}\n", self.openai.temperature));
        output.push_str(&format!("max_tokens = {}\n", self.openai.max_tokens));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!(
            "log_level = \"{}\"\n",
            self.telemetry.log_level
        ));

        output
    }
}
