//! Raw serde models for catalog API responses.
//!
//! These mirror the JSON the API actually returns; the richer domain
//! structs the rest of the workspace consumes live in [`crate::model`].

use serde::Deserialize;

/// Generic `{"data": [...]}` list envelope used by container endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListEnvelope<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistResponse {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreResponse {
    pub id: u64,
    pub name: String,
}

/// Abbreviated album record embedded in track and artist-listing payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumSummaryResponse {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackResponse {
    pub id: u64,
    pub title: String,
    pub isrc: Option<String>,
    pub track_position: Option<u32>,
    pub disk_number: Option<u32>,
    pub artist: ArtistResponse,
    pub contributors: Option<Vec<ArtistResponse>>,
    pub album: Option<AlbumSummaryResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumResponse {
    pub id: u64,
    pub title: String,
    pub artist: ArtistResponse,
    pub label: Option<String>,
    /// Full release date, `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub nb_tracks: Option<u32>,
    pub nb_discs: Option<u32>,
    /// URL of the largest cover rendition.
    pub cover_xl: Option<String>,
    pub genres: Option<ListEnvelope<GenreResponse>>,
    pub tracks: Option<ListEnvelope<TrackResponse>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    pub id: u64,
    pub title: String,
    pub tracks: Option<ListEnvelope<TrackResponse>>,
}

/// One row of a `/search` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntryResponse {
    pub id: u64,
    pub title: String,
    pub artist: ArtistResponse,
    pub album: Option<AlbumSummaryResponse>,
}
