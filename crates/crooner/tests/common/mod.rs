//! Shared doubles: a scripted completion backend, a recording sink, and
//! a gateway fixture backed by a pre-seeded token cache.

#![allow(dead_code)]

use async_trait::async_trait;
use croonconf::SpotifyConfig;
use crooner::{ChatMessage, CompletionBackend, CompletionError, Role, Sink};
use jukebox::{ArtistRecord, Authenticator, MusicClient, TrackRecord};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Returns canned replies in order and records every message list it saw.
pub struct ScriptedBackend {
    replies: Mutex<Vec<String>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl ScriptedBackend {
    pub fn new(replies: &[&str]) -> Self {
        let mut replies: Vec<String> = replies.iter().map(|r| r.to_string()).collect();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle that stays usable after the backend moves into the
    /// orchestrator.
    pub fn requests(&self) -> Arc<Mutex<Vec<Vec<ChatMessage>>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or(CompletionError::Empty)
    }
}

#[derive(Debug)]
pub enum Event {
    Message { role: Role, text: String },
    Tracks(Vec<TrackRecord>),
    Artists(Vec<ArtistRecord>),
    Error(String),
}

/// Sink that records every call instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    pub fn track_lists(&self) -> Vec<&Vec<TrackRecord>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Tracks(tracks) => Some(tracks),
                _ => None,
            })
            .collect()
    }

    pub fn artist_lists(&self) -> Vec<&Vec<ArtistRecord>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Artists(artists) => Some(artists),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Error(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<(Role, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Message { role, text } => Some((*role, text.as_str())),
                _ => None,
            })
            .collect()
    }
}

impl Sink for RecordingSink {
    fn render_message(&mut self, role: Role, text: &str) {
        self.events.push(Event::Message {
            role,
            text: text.to_string(),
        });
    }

    fn render_track_list(&mut self, tracks: &[TrackRecord]) {
        self.events.push(Event::Tracks(tracks.to_vec()));
    }

    fn render_artist_list(&mut self, artists: &[ArtistRecord]) {
        self.events.push(Event::Artists(artists.to_vec()));
    }

    fn render_error(&mut self, text: &str) {
        self.events.push(Event::Error(text.to_string()));
    }

    fn prompt_for_input(&mut self) -> Option<String> {
        None
    }
}

/// Gateway pointed at a mock server, authorized from a fresh cached token.
pub async fn gateway_for(server_url: &str, cache_path: PathBuf) -> MusicClient {
    std::fs::write(
        &cache_path,
        r#"{"access_token":"test-token","refresh_token":null,"expires_at":"2099-01-01T00:00:00Z","scope":"user-top-read"}"#,
    )
    .unwrap();
    let config = SpotifyConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:8888/callback".to_string(),
        api_url: server_url.to_string(),
        accounts_url: server_url.to_string(),
        cache_path,
        market: "US".to_string(),
    };
    let handle = Authenticator::new(config.clone()).acquire().await.unwrap();
    MusicClient::new(handle, &config)
}
