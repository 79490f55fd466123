//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, CroonConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/crooner/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("crooner/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    // Local override (current directory)
    let local = PathBuf::from("crooner.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a config file as a raw TOML table.
pub fn load_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    contents
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Merge `overlay` into `base`, recursing into tables so a later file can
/// override a single key without clobbering the whole section.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Deserialize a merged table into the config, expanding paths.
pub fn from_table(table: toml::Table) -> Result<CroonConfig, ConfigError> {
    let mut config: CroonConfig =
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                path: PathBuf::from("<merged>"),
                message: e.to_string(),
            })?;

    // cache_path may have come from a file as "~/..."
    if let Some(s) = config.spotify.cache_path.to_str() {
        if s.starts_with('~') || s.starts_with('$') {
            config.spotify.cache_path = expand_path(s);
        }
    }

    Ok(config)
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut CroonConfig, sources: &mut ConfigSources) {
    // Music provider credentials use the provider's conventional names
    if let Ok(v) = env::var("SPOTIFY_CLIENT_ID") {
        config.spotify.client_id = v;
        sources.env_overrides.push("SPOTIFY_CLIENT_ID".to_string());
    }
    if let Ok(v) = env::var("SPOTIFY_CLIENT_SECRET") {
        config.spotify.client_secret = v;
        sources
            .env_overrides
            .push("SPOTIFY_CLIENT_SECRET".to_string());
    }
    if let Ok(v) = env::var("SPOTIFY_REDIRECT_URI") {
        config.spotify.redirect_uri = v;
        sources
            .env_overrides
            .push("SPOTIFY_REDIRECT_URI".to_string());
    }

    if let Ok(v) = env::var("OPENAI_API_KEY") {
        config.openai.api_key = v;
        sources.env_overrides.push("OPENAI_API_KEY".to_string());
    }

    // Crooner-specific overrides
    if let Ok(v) = env::var("CROONER_SPOTIFY_API_URL") {
        config.spotify.api_url = v;
        sources
            .env_overrides
            .push("CROONER_SPOTIFY_API_URL".to_string());
    }
    if let Ok(v) = env::var("CROONER_ACCOUNTS_URL") {
        config.spotify.accounts_url = v;
        sources.env_overrides.push("CROONER_ACCOUNTS_URL".to_string());
    }
    if let Ok(v) = env::var("CROONER_CACHE_PATH") {
        config.spotify.cache_path = expand_path(&v);
        sources.env_overrides.push("CROONER_CACHE_PATH".to_string());
    }
    if let Ok(v) = env::var("CROONER_MARKET") {
        config.spotify.market = v;
        sources.env_overrides.push("CROONER_MARKET".to_string());
    }
    if let Ok(v) = env::var("CROONER_MODEL") {
        config.openai.model = v;
        sources.env_overrides.push("CROONER_MODEL".to_string());
    }
    if let Ok(v) = env::var("CROONER_OPENAI_API_URL") {
        config.openai.api_url = v;
        sources
            .env_overrides
            .push("CROONER_OPENAI_API_URL".to_string());
    }

    if let Ok(v) = env::var("CROONER_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("CROONER_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Ok(v) = env::var("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(contents: &str) -> CroonConfig {
        let table: toml::Table = contents.parse().unwrap();
        from_table(table).unwrap()
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/test/path");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_absolute() {
        let expanded = expand_path("/absolute/path");
        assert_eq!(expanded, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files();
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = parse(
            r#"
[spotify]
client_id = "abc"
"#,
        );
        assert_eq!(config.spotify.client_id, "abc");
        // Other values should be defaults
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.spotify.market, "US");
    }

    #[test]
    fn test_parse_full_toml() {
        let config = parse(
            r#"
[spotify]
client_id = "abc"
client_secret = "def"
redirect_uri = "http://localhost:8888/callback"
api_url = "http://localhost:9000"
market = "DE"

[openai]
api_key = "sk-x"
model = "gpt-4o"
temperature = 0.9
max_tokens = 300

[telemetry]
log_level = "debug"
"#,
        );
        assert_eq!(config.spotify.client_secret, "def");
        assert_eq!(config.spotify.api_url, "http://localhost:9000");
        assert_eq!(config.spotify.market, "DE");
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.max_tokens, 300);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_merge_later_file_wins_per_key() {
        let mut base: toml::Table = r#"
[spotify]
client_id = "abc"
market = "US"
"#
        .parse()
        .unwrap();
        let overlay: toml::Table = r#"
[spotify]
market = "GB"
"#
        .parse()
        .unwrap();

        merge_tables(&mut base, overlay);
        let config = from_table(base).unwrap();

        // Overridden key takes the overlay value, sibling key survives
        assert_eq!(config.spotify.market, "GB");
        assert_eq!(config.spotify.client_id, "abc");
    }

    #[test]
    fn test_load_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[openai]\nmodel = \"test-model\"").unwrap();

        let table = load_table(file.path()).unwrap();
        let config = from_table(table).unwrap();
        assert_eq!(config.openai.model, "test-model");
    }

    #[test]
    fn test_load_table_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        let err = load_table(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
