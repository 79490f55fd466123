//! The capability gateway: one method per remote operation.
//!
//! Every method is a single-shot call returning `Result`; the caller
//! decides whether a failure is surfaced or silently degraded. No
//! retries, no timeouts beyond the HTTP client default.

use crate::auth::ClientHandle;
use crate::error::RemoteCallError;
use crate::payload::{
    AudioFeatures, PlaylistPayload, RecommendationsPayload, SearchPayload, TopTracksPayload,
    TrackItem, UserPayload,
};
use croonconf::SpotifyConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

/// What a search should match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Track,
    Artist,
    Album,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Track => "track",
            SearchKind::Artist => "artist",
            SearchKind::Album => "album",
        }
    }
}

pub struct MusicClient {
    handle: ClientHandle,
    http: reqwest::Client,
    api_url: String,
    market: String,
}

impl MusicClient {
    pub fn new(handle: ClientHandle, config: &SpotifyConfig) -> Self {
        Self {
            handle,
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            market: config.market.clone(),
        }
    }

    /// Country code used for top-tracks enrichment.
    pub fn market(&self) -> &str {
        &self.market
    }

    /// Search for tracks, artists, or albums.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchPayload, RemoteCallError> {
        debug!(query, kind = kind.as_str(), limit, "searching");
        self.get_json(
            "/v1/search",
            &[
                ("q", query),
                ("type", kind.as_str()),
                ("limit", &limit.to_string()),
            ],
        )
        .await
    }

    /// Audio features for a single track.
    pub async fn track_features(&self, track_id: &str) -> Result<AudioFeatures, RemoteCallError> {
        self.get_json(&format!("/v1/audio-features/{track_id}"), &[])
            .await
    }

    /// An artist's top tracks in the given market.
    pub async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<TrackItem>, RemoteCallError> {
        let payload: TopTracksPayload = self
            .get_json(
                &format!("/v1/artists/{artist_id}/top-tracks"),
                &[("market", market)],
            )
            .await?;
        Ok(payload.tracks)
    }

    /// Recommendations seeded from a single track.
    pub async fn similar_tracks(
        &self,
        track_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackItem>, RemoteCallError> {
        let payload: RecommendationsPayload = self
            .get_json(
                "/v1/recommendations",
                &[("seed_tracks", track_id), ("limit", &limit.to_string())],
            )
            .await?;
        Ok(payload.tracks)
    }

    /// Create a playlist for the current user and return its id.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<String, RemoteCallError> {
        let user_id = self.current_user_id().await?;
        debug!(name, user = %user_id, "creating playlist");
        let payload: PlaylistPayload = self
            .post_json(
                &format!("/v1/users/{user_id}/playlists"),
                &serde_json::json!({
                    "name": name,
                    "description": description,
                    "public": public,
                }),
            )
            .await?;
        Ok(payload.id)
    }

    /// Append tracks to a playlist.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
    ) -> Result<(), RemoteCallError> {
        let _: serde_json::Value = self
            .post_json(
                &format!("/v1/playlists/{playlist_id}/tracks"),
                &serde_json::json!({ "uris": track_uris }),
            )
            .await?;
        Ok(())
    }

    async fn current_user_id(&self) -> Result<String, RemoteCallError> {
        let payload: UserPayload = self.get_json("/v1/me", &[]).await?;
        Ok(payload.id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteCallError> {
        let bearer = self.handle.bearer().await?;
        let response = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .bearer_auth(bearer)
            .send()
            .await?;
        decode(path, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, RemoteCallError> {
        let bearer = self.handle.bearer().await?;
        let response = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, RemoteCallError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteCallError::Status {
            endpoint: endpoint.to_string(),
            status,
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteCallError::Decode {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_kind_strings() {
        assert_eq!(SearchKind::Track.as_str(), "track");
        assert_eq!(SearchKind::Artist.as_str(), "artist");
        assert_eq!(SearchKind::Album.as_str(), "album");
    }
}
