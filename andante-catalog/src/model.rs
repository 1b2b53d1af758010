//! Domain structs consumed by the downloader and tagger.

use crate::types::{AlbumResponse, TrackResponse};

/// Album-level metadata shared by every track of one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumInfo {
    pub id: u64,
    pub title: String,
    pub artist_name: String,
    pub label: Option<String>,
    /// Full release date, `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub total_tracks: u32,
    pub total_discs: u32,
    pub genres: Vec<String>,
    pub artwork_url: Option<String>,
}

impl AlbumInfo {
    pub(crate) fn from_response(resp: &AlbumResponse) -> Self {
        Self {
            id: resp.id,
            title: resp.title.clone(),
            artist_name: resp.artist.name.clone(),
            label: resp.label.clone(),
            release_date: resp.release_date.clone(),
            total_tracks: resp.nb_tracks.unwrap_or(0),
            total_discs: resp.nb_discs.unwrap_or(1),
            genres: resp
                .genres
                .as_ref()
                .map(|g| g.data.iter().map(|genre| genre.name.clone()).collect())
                .unwrap_or_default(),
            artwork_url: resp.cover_xl.clone(),
        }
    }
}

/// One downloadable track, fully resolved against its album.
///
/// Immutable for the duration of a download; everything the destination
/// layout and the tagging pipeline need is carried here so no further
/// catalog calls happen once orchestration starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: u64,
    pub title: String,
    pub isrc: Option<String>,
    /// 1-based position within the disc.
    pub position: u32,
    pub disc_number: u32,
    pub artist_name: String,
    /// All credited artists, main artist first.
    pub contributor_names: Vec<String>,
    pub album: AlbumInfo,
}

impl Track {
    pub(crate) fn from_response(resp: &TrackResponse, album: AlbumInfo) -> Self {
        let contributor_names = match &resp.contributors {
            Some(contributors) if !contributors.is_empty() => {
                contributors.iter().map(|a| a.name.clone()).collect()
            }
            _ => vec![resp.artist.name.clone()],
        };
        Self {
            id: resp.id,
            title: resp.title.clone(),
            isrc: resp.isrc.clone(),
            position: resp.track_position.unwrap_or(1),
            disc_number: resp.disk_number.unwrap_or(1),
            artist_name: resp.artist.name.clone(),
            contributor_names,
            album,
        }
    }

    /// `artist title` string used for site search boxes and log lines.
    pub fn search_string(&self) -> String {
        format!("{} {}", self.artist_name, self.title)
    }
}

/// A `/search` hit; abbreviated, resolve via `CatalogClient::track`.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    pub artist_name: String,
    pub album_title: Option<String>,
}
