//! Deterministic destination layout for finished downloads.

use std::path::{Path, PathBuf};

use andante_catalog::Track;

use crate::format::AudioFormat;

/// Placement inside a playlist directory instead of the per-album layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistContext {
    pub name: String,
    /// 1-based position within the playlist.
    pub position: u32,
}

/// Punctuation allowed through the sanitizer in addition to alphanumerics
/// and whitespace.
const ALLOWED_PUNCTUATION: &str = ".,'()[]&!_-";

/// Clean a free-text field for use as a path component. Characters outside
/// the whitelist become `-`; surrounding whitespace is trimmed.
pub fn sanitize(field: &str) -> String {
    let cleaned: String = field
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c) {
                c
            } else {
                '-'
            }
        })
        .collect();
    cleaned.trim().to_string()
}

/// Compute the final path for a track under `root`.
///
/// Playlist placement: `{playlist}/{position:02} {artist} - {title}.{ext}`.
/// Album placement:
/// `{artist}/{album}/{disc}-{position:02} {artist} - {title}.{ext}`.
pub fn destination_path(
    root: &Path,
    track: &Track,
    format: AudioFormat,
    playlist: Option<&PlaylistContext>,
) -> PathBuf {
    let artist = sanitize(&track.artist_name);
    let title = sanitize(&track.title);
    let ext = format.extension();

    match playlist {
        Some(ctx) => root.join(sanitize(&ctx.name)).join(format!(
            "{:02} {} - {}.{}",
            ctx.position, artist, title, ext
        )),
        None => root
            .join(&artist)
            .join(sanitize(&track.album.title))
            .join(format!(
                "{}-{:02} {} - {}.{}",
                track.disc_number, track.position, artist, title, ext
            )),
    }
}

#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod tests;
