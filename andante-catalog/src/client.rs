//! Blocking HTTP client for the music catalog API.

use std::cell::Cell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::entity::{Entity, EntityKind, EntityRef};
use crate::error::CatalogError;
use crate::model::{AlbumInfo, SearchHit, Track};
use crate::types::{
    AlbumResponse, ArtistResponse, AlbumSummaryResponse, ListEnvelope, PlaylistResponse,
    SearchEntryResponse, TrackResponse,
};

/// Public catalog API endpoint used when the config does not override it.
pub const DEFAULT_API_BASE: &str = "https://api.deezer.com";

/// Minimum spacing between catalog requests. The catalog is not the
/// bot-sensitive side of this system, but hammering it is still rude.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// HTTP client for the catalog API with request spacing.
///
/// Execution is single-threaded throughout the workspace, so the
/// last-request marker is a plain `Cell` rather than a lock.
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    base: String,
    last_request: Cell<Instant>,
}

impl CatalogClient {
    pub fn new(base: impl Into<String>) -> Result<Self, CatalogError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: base.into(),
            last_request: Cell::new(Instant::now() - MIN_REQUEST_INTERVAL),
        })
    }

    fn rate_limit(&self) {
        let elapsed = self.last_request.get().elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            std::thread::sleep(MIN_REQUEST_INTERVAL - elapsed);
        }
        self.last_request.set(Instant::now());
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        self.rate_limit();

        let url = format!("{}/{}", self.base.trim_end_matches('/'), path);
        debug!("GET {url}");
        let resp = self.http.get(&url).send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::EntityUnavailable(format!(
                "{path}: not found"
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                message: resp.text().unwrap_or_default(),
            });
        }

        // The API reports missing/region-locked entities as HTTP 200 with
        // an error envelope.
        let value: serde_json::Value = resp.json()?;
        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("entity unavailable")
                .to_string();
            return Err(CatalogError::EntityUnavailable(message));
        }

        Ok(serde_json::from_value(value)?)
    }

    fn album_info(&self, id: u64) -> Result<AlbumInfo, CatalogError> {
        let resp: AlbumResponse = self.get_json(&format!("album/{id}"))?;
        Ok(AlbumInfo::from_response(&resp))
    }

    /// Fetch the full record for one track, resolving its album through
    /// `albums` so container listings don't re-fetch a shared album.
    fn full_track(
        &self,
        id: u64,
        albums: &mut HashMap<u64, AlbumInfo>,
    ) -> Result<Track, CatalogError> {
        let resp: TrackResponse = self.get_json(&format!("track/{id}"))?;
        let summary = resp.album.as_ref().ok_or_else(|| {
            CatalogError::Api(format!("track {id} carries no album reference"))
        })?;
        let album = match albums.get(&summary.id) {
            Some(info) => info.clone(),
            None => {
                let info = self.album_info(summary.id)?;
                albums.insert(summary.id, info.clone());
                info
            }
        };
        Ok(Track::from_response(&resp, album))
    }

    /// Resolve a single track with its album detail.
    pub fn track(&self, id: u64) -> Result<Track, CatalogError> {
        self.full_track(id, &mut HashMap::new())
    }

    /// Resolve an album and its tracks in album order.
    ///
    /// Listing rows omit per-track detail (ISRC, disc number), so each is
    /// completed by a follow-up track fetch. A row that fails to resolve
    /// is logged and dropped rather than failing the album.
    pub fn album(&self, id: u64) -> Result<(AlbumInfo, Vec<Track>), CatalogError> {
        let resp: AlbumResponse = self.get_json(&format!("album/{id}"))?;
        let info = AlbumInfo::from_response(&resp);
        let entries = resp.tracks.map(|t| t.data).unwrap_or_default();

        let mut albums = HashMap::from([(info.id, info.clone())]);
        let mut tracks = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.full_track(entry.id, &mut albums) {
                Ok(track) => tracks.push(track),
                Err(e) => warn!("Skipping track {} ('{}'): {e}", entry.id, entry.title),
            }
        }
        Ok((info, tracks))
    }

    /// Resolve a playlist and its tracks in playlist order.
    pub fn playlist(&self, id: u64) -> Result<(String, Vec<Track>), CatalogError> {
        let resp: PlaylistResponse = self.get_json(&format!("playlist/{id}"))?;
        let entries = resp.tracks.map(|t| t.data).unwrap_or_default();

        let mut albums = HashMap::new();
        let mut tracks = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.full_track(entry.id, &mut albums) {
                Ok(track) => tracks.push(track),
                Err(e) => warn!("Skipping track {} ('{}'): {e}", entry.id, entry.title),
            }
        }
        Ok((resp.title, tracks))
    }

    /// Resolve an artist's full discography: albums in listing order, each
    /// album's tracks in album order.
    pub fn artist(&self, id: u64) -> Result<(String, Vec<Track>), CatalogError> {
        let artist: ArtistResponse = self.get_json(&format!("artist/{id}"))?;
        let listing: ListEnvelope<AlbumSummaryResponse> =
            self.get_json(&format!("artist/{id}/albums"))?;

        let mut tracks = Vec::new();
        for summary in &listing.data {
            match self.album(summary.id) {
                Ok((_, album_tracks)) => tracks.extend(album_tracks),
                Err(e) => warn!(
                    "Skipping album {} ('{}'): {e}",
                    summary.id, summary.title
                ),
            }
        }
        Ok((artist.name, tracks))
    }

    /// Resolve a parsed URL into the entity it names.
    pub fn resolve(&self, entity_ref: EntityRef) -> Result<Entity, CatalogError> {
        match entity_ref.kind {
            EntityKind::Track => Ok(Entity::Track(self.track(entity_ref.id)?)),
            EntityKind::Album => {
                let (info, tracks) = self.album(entity_ref.id)?;
                Ok(Entity::Album {
                    title: info.title,
                    tracks,
                })
            }
            EntityKind::Playlist => {
                let (title, tracks) = self.playlist(entity_ref.id)?;
                Ok(Entity::Playlist { title, tracks })
            }
            EntityKind::Artist => {
                let (name, tracks) = self.artist(entity_ref.id)?;
                Ok(Entity::Artist { name, tracks })
            }
        }
    }

    /// Free-text track search, for the interactive prompt.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError> {
        let listing: ListEnvelope<SearchEntryResponse> =
            self.get_json(&format!("search?q={}", urlencoding::encode(query)))?;
        Ok(listing
            .data
            .into_iter()
            .map(|entry| SearchHit {
                id: entry.id,
                title: entry.title,
                artist_name: entry.artist.name,
                album_title: entry.album.map(|a| a.title),
            })
            .collect())
    }
}
