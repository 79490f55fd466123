//! Display-ready records and the payload post-processing that builds them.

use crate::client::{MusicClient, SearchKind};
use crate::payload::{ArtistItem, AudioFeatures, SearchPayload, TrackItem};
use chrono::NaiveDate;
use tracing::warn;

/// Shown when a search produced nothing to process at all (failed call
/// or payload without the expected page). A well-formed empty result is
/// an empty record list instead.
pub const NO_RESULTS: &str = "No results found.";

/// Top tracks shown per artist, no matter how many the provider returns.
const TOP_TRACKS_SHOWN: usize = 3;

/// A formatted track search hit.
#[derive(Debug, Clone)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub album: String,
    pub release_date: String,
    pub preview_url: Option<String>,
    pub spotify_url: String,
    pub popularity: u32,
    pub duration_ms: u64,
    pub uri: String,
    /// All five feature keys, or `None` if the lookup failed. Never partial.
    pub features: Option<AudioFeatures>,
}

impl TrackRecord {
    fn from_item(item: TrackItem, features: Option<AudioFeatures>) -> Self {
        let (artist, artist_id) = item
            .artists
            .into_iter()
            .next()
            .map(|a| (a.name, a.id))
            .unwrap_or_default();
        Self {
            id: item.id,
            name: item.name,
            artist,
            artist_id,
            album: item.album.name,
            release_date: item.album.release_date,
            preview_url: item.preview_url,
            spotify_url: item.external_urls.spotify,
            popularity: item.popularity,
            duration_ms: item.duration_ms,
            uri: item.uri,
            features,
        }
    }
}

/// A formatted artist search hit.
#[derive(Debug, Clone)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
    pub spotify_url: String,
    pub followers: u64,
    /// At most three names.
    pub top_tracks: Vec<String>,
}

/// What a processed search yields.
#[derive(Debug, Clone)]
pub enum SearchOutcome<R> {
    Records(Vec<R>),
    /// The search itself failed or returned no usable payload.
    NoResults,
}

impl MusicClient {
    /// Turn a raw track search payload into display records, enriching
    /// each hit with its audio features. A failed feature lookup leaves
    /// `features` empty without failing the result set.
    pub async fn process_tracks(
        &self,
        payload: Option<SearchPayload>,
    ) -> SearchOutcome<TrackRecord> {
        let Some(payload) = payload else {
            return SearchOutcome::NoResults;
        };
        let Some(page) = payload.tracks else {
            return SearchOutcome::NoResults;
        };

        let mut records = Vec::with_capacity(page.items.len());
        for item in page.items {
            let features = match self.track_features(&item.id).await {
                Ok(features) => Some(features),
                Err(e) => {
                    warn!(track = %item.id, error = %e, "feature lookup failed");
                    None
                }
            };
            records.push(TrackRecord::from_item(item, features));
        }
        SearchOutcome::Records(records)
    }

    /// Turn a raw artist search payload into display records, enriching
    /// each hit with up to three top track names.
    pub async fn process_artists(
        &self,
        payload: Option<SearchPayload>,
    ) -> SearchOutcome<ArtistRecord> {
        let Some(payload) = payload else {
            return SearchOutcome::NoResults;
        };
        let Some(page) = payload.artists else {
            return SearchOutcome::NoResults;
        };

        let market = self.market().to_string();
        let mut records = Vec::with_capacity(page.items.len());
        for item in page.items {
            let top_tracks = match self.artist_top_tracks(&item.id, &market).await {
                Ok(tracks) => tracks
                    .into_iter()
                    .take(TOP_TRACKS_SHOWN)
                    .map(|t| t.name)
                    .collect(),
                Err(e) => {
                    warn!(artist = %item.id, error = %e, "top tracks lookup failed");
                    Vec::new()
                }
            };
            records.push(artist_record(item, top_tracks));
        }
        SearchOutcome::Records(records)
    }

    /// Create a playlist from the given tracks and report the outcome as
    /// a human-readable string. The success message carries the public
    /// playlist URL.
    pub async fn create_recommendation_playlist(
        &self,
        tracks: &[TrackRecord],
        name: &str,
    ) -> String {
        let playlist_id = match self
            .create_playlist(name, "Generated by Crooner", true)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "playlist creation failed");
                return "Failed to create playlist".to_string();
            }
        };

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        match self.add_tracks(&playlist_id, &uris).await {
            Ok(()) => format!(
                "Playlist created successfully! Open it in Spotify: https://open.spotify.com/playlist/{playlist_id}"
            ),
            Err(e) => {
                warn!(error = %e, "adding tracks to playlist failed");
                "Failed to create playlist".to_string()
            }
        }
    }
}

fn artist_record(item: ArtistItem, top_tracks: Vec<String>) -> ArtistRecord {
    ArtistRecord {
        id: item.id,
        name: item.name,
        genres: item.genres,
        popularity: item.popularity,
        spotify_url: item.external_urls.spotify,
        followers: item.followers.total,
        top_tracks,
    }
}

/// Render a release date long-form when it has day precision, verbatim
/// otherwise (the provider also sends year or year-month precision).
pub fn format_release_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%B %d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Render a duration as `m:ss`.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

impl AudioFeatures {
    /// Labeled display values: percentages, except tempo in BPM.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("danceability", format!("{:.0}%", self.danceability * 100.0)),
            ("energy", format!("{:.0}%", self.energy * 100.0)),
            ("tempo", format!("{:.0} BPM", self.tempo)),
            ("valence", format!("{:.0}%", self.valence * 100.0)),
            (
                "instrumentalness",
                format!("{:.0}%", self.instrumentalness * 100.0),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_release_date_day_precision() {
        assert_eq!(format_release_date("1975-10-31"), "October 31, 1975");
    }

    #[test]
    fn test_format_release_date_year_precision_verbatim() {
        assert_eq!(format_release_date("1975"), "1975");
        assert_eq!(format_release_date("1975-10"), "1975-10");
    }

    #[test]
    fn test_format_release_date_garbage_verbatim() {
        assert_eq!(format_release_date("unknown"), "unknown");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(354_000), "5:54");
        assert_eq!(format_duration_ms(59_999), "0:59");
        assert_eq!(format_duration_ms(60_000), "1:00");
    }

    #[test]
    fn test_feature_rows() {
        let features = AudioFeatures {
            danceability: 0.58,
            energy: 0.842,
            tempo: 117.3,
            valence: 0.33,
            instrumentalness: 0.001,
        };
        let rows = features.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], ("danceability", "58%".to_string()));
        assert_eq!(rows[1], ("energy", "84%".to_string()));
        assert_eq!(rows[2], ("tempo", "117 BPM".to_string()));
        assert_eq!(rows[4], ("instrumentalness", "0%".to_string()));
    }

    #[test]
    fn test_no_results_text() {
        assert_eq!(NO_RESULTS, "No results found.");
    }
}
