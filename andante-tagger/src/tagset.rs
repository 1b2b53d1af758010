//! Ephemeral projection of a catalog track into tag-engine fields.

use andante_catalog::Track;

/// The fields written into a downloaded file.
///
/// Built fresh per tagging call and never persisted independently of the
/// audio file it is written into.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    pub title: String,
    /// All credited artists, main artist first.
    pub artists: Vec<String>,
    pub album_artist: String,
    pub album: String,
    pub track_number: u32,
    pub track_total: u32,
    pub disc_number: u32,
    pub disc_total: u32,
    pub year: Option<u32>,
    /// Full release date, `YYYY-MM-DD`; carried by the format-specific
    /// engine in phase two.
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub isrc: Option<String>,
    pub label: Option<String>,
    pub artwork: Option<Vec<u8>>,
}

fn year_of(date: &str) -> Option<u32> {
    let year: String = date.chars().take(4).collect();
    if year.chars().count() == 4 {
        year.parse().ok()
    } else {
        None
    }
}

impl TagSet {
    pub fn project(track: &Track, artwork: Option<Vec<u8>>) -> Self {
        Self {
            title: track.title.clone(),
            artists: track.contributor_names.clone(),
            album_artist: track.album.artist_name.clone(),
            album: track.album.title.clone(),
            track_number: track.position,
            track_total: track.album.total_tracks,
            disc_number: track.disc_number,
            disc_total: track.album.total_discs,
            year: track.album.release_date.as_deref().and_then(year_of),
            release_date: track.album.release_date.clone(),
            genres: track.album.genres.clone(),
            isrc: track.isrc.clone(),
            label: track.album.label.clone(),
            artwork,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use andante_catalog::AlbumInfo;

    #[test]
    fn test_projection() {
        let track = Track {
            id: 90632835,
            title: "The Days".into(),
            isrc: Some("SE4EY1400002".into()),
            position: 1,
            disc_number: 1,
            artist_name: "Avicii".into(),
            contributor_names: vec!["Avicii".into(), "Robbie Williams".into()],
            album: AlbumInfo {
                id: 9790758,
                title: "The Days / Nights".into(),
                artist_name: "Avicii".into(),
                label: Some("Universal".into()),
                release_date: Some("2014-12-01".into()),
                total_tracks: 4,
                total_discs: 1,
                genres: vec!["Dance".into()],
                artwork_url: None,
            },
        };

        let tags = TagSet::project(&track, Some(vec![1, 2, 3]));
        assert_eq!(tags.title, "The Days");
        assert_eq!(tags.artists.len(), 2);
        assert_eq!(tags.album_artist, "Avicii");
        assert_eq!(tags.year, Some(2014));
        assert_eq!(tags.release_date.as_deref(), Some("2014-12-01"));
        assert_eq!(tags.track_total, 4);
        assert_eq!(tags.artwork.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_year_of_short_date() {
        assert_eq!(year_of("2014-12-01"), Some(2014));
        assert_eq!(year_of("99"), None);
        assert_eq!(year_of("abcd"), None);
    }
}
