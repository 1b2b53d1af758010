//! Catalog URL parsing and the closed set of entity kinds.

use crate::error::CatalogError;
use crate::model::Track;

/// The four entity kinds a catalog URL can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Track,
    Album,
    Playlist,
    Artist,
}

impl EntityKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            "artist" => Some(Self::Artist),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::Artist => "artist",
        };
        write!(f, "{name}")
    }
}

/// A parsed reference to a catalog entity.
///
/// Accepted URL shape: `https://<host>/<locale?>/<kind>/<numericId>`,
/// where the optional locale is a short segment like `en` or `en-GB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: u64,
}

impl EntityRef {
    pub fn parse(url: &str) -> Result<Self, CatalogError> {
        let invalid = || CatalogError::InvalidUrl(url.to_string());

        let rest = url
            .trim()
            .strip_prefix("https://")
            .or_else(|| url.trim().strip_prefix("http://"))
            .ok_or_else(invalid)?;

        // Drop query/fragment before splitting the path.
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let _host = segments.next().ok_or_else(invalid)?;

        let mut segment = segments.next().ok_or_else(invalid)?;
        let kind = match EntityKind::from_segment(segment) {
            Some(kind) => kind,
            None => {
                // Tolerate one locale segment (e.g. "en", "en-GB") before the kind.
                if segment.len() > 5 {
                    return Err(invalid());
                }
                segment = segments.next().ok_or_else(invalid)?;
                EntityKind::from_segment(segment).ok_or_else(invalid)?
            }
        };

        let id_segment = segments.next().ok_or_else(invalid)?;
        if segments.next().is_some() {
            return Err(invalid());
        }
        let id: u64 = id_segment.parse().map_err(|_| invalid())?;

        Ok(Self { kind, id })
    }
}

/// A resolved catalog entity with its constituent tracks.
///
/// Closed variant set; `into_tracks` is the single exhaustive match that
/// flattens any entity into the ordered track list the downloader works
/// through.
#[derive(Debug, Clone)]
pub enum Entity {
    Track(Track),
    Album { title: String, tracks: Vec<Track> },
    Playlist { title: String, tracks: Vec<Track> },
    Artist { name: String, tracks: Vec<Track> },
}

impl Entity {
    /// Human-readable label for log lines and the run report.
    pub fn describe(&self) -> String {
        match self {
            Self::Track(track) => format!("track '{}'", track.title),
            Self::Album { title, tracks } => {
                format!("album '{}' ({} tracks)", title, tracks.len())
            }
            Self::Playlist { title, tracks } => {
                format!("playlist '{}' ({} tracks)", title, tracks.len())
            }
            Self::Artist { name, tracks } => {
                format!("artist '{}' ({} tracks)", name, tracks.len())
            }
        }
    }

    /// Flatten into the ordered list of tracks to download.
    ///
    /// Container order is preserved: albums keep disc/track order,
    /// playlists keep playlist order, artists keep album order then each
    /// album's track order.
    pub fn into_tracks(self) -> Vec<Track> {
        match self {
            Self::Track(track) => vec![track],
            Self::Album { tracks, .. } => tracks,
            Self::Playlist { tracks, .. } => tracks,
            Self::Artist { tracks, .. } => tracks,
        }
    }

    /// Whether the entity came from a playlist URL (drives the playlist
    /// destination layout instead of per-album placement).
    pub fn playlist_title(&self) -> Option<&str> {
        match self {
            Self::Playlist { title, .. } => Some(title),
            _ => None,
        }
    }
}
