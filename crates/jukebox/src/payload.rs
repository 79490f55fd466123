//! Raw provider payload shapes, as deserialized from the Web API.
//!
//! Only the fields the gateway actually reads are modeled; everything
//! else in the provider's responses is ignored.

use serde::{Deserialize, Serialize};

/// Top-level search response. Which page is present depends on the
/// `type` parameter of the search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub tracks: Option<Page<TrackItem>>,
    #[serde(default)]
    pub artists: Option<Page<ArtistItem>>,
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    /// Precision varies: `2024-03-01`, `2024-03`, or just `1975`.
    #[serde(default)]
    pub release_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub followers: Followers,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

/// Audio feature lookup result. Either all five keys arrive or the
/// lookup failed; there is no partial record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub tempo: f64,
    pub valence: f64,
    pub instrumentalness: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksPayload {
    #[serde(default)]
    pub tracks: Vec<TrackItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsPayload {
    #[serde(default)]
    pub tracks: Vec<TrackItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPayload {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: String,
}
