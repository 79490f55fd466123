//! Shared fixtures: a config pointed at a mock server and a pre-seeded
//! token cache so tests never hit the interactive flow.

// Each integration test binary compiles this module separately and uses
// a different subset of it.
#![allow(dead_code)]

use croonconf::SpotifyConfig;
use jukebox::{Authenticator, MusicClient};
use std::path::{Path, PathBuf};

pub const FAR_FUTURE: &str = "2099-01-01T00:00:00Z";
pub const LONG_PAST: &str = "2020-01-01T00:00:00Z";

pub fn write_token_cache(path: &Path, access: &str, refresh: Option<&str>, expires_at: &str) {
    let refresh = match refresh {
        Some(r) => format!("\"{r}\""),
        None => "null".to_string(),
    };
    std::fs::write(
        path,
        format!(
            r#"{{"access_token":"{access}","refresh_token":{refresh},"expires_at":"{expires_at}","scope":"user-top-read"}}"#
        ),
    )
    .unwrap();
}

pub fn test_config(base_url: &str, cache_path: PathBuf) -> SpotifyConfig {
    SpotifyConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:8888/callback".to_string(),
        api_url: base_url.to_string(),
        accounts_url: base_url.to_string(),
        cache_path,
        market: "US".to_string(),
    }
}

/// Build a gateway client backed by a fresh cached token.
pub async fn authorized_client(server_url: &str, cache_path: PathBuf) -> MusicClient {
    write_token_cache(&cache_path, "cached-token", Some("refresh-1"), FAR_FUTURE);
    let config = test_config(server_url, cache_path);
    let handle = Authenticator::new(config.clone()).acquire().await.unwrap();
    MusicClient::new(handle, &config)
}
