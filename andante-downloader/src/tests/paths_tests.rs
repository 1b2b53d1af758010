use super::*;

use andante_catalog::AlbumInfo;

fn track(artist: &str, album: &str, title: &str, disc: u32, position: u32) -> Track {
    Track {
        id: 1,
        title: title.to_string(),
        isrc: None,
        position,
        disc_number: disc,
        artist_name: artist.to_string(),
        contributor_names: vec![artist.to_string()],
        album: AlbumInfo {
            id: 1,
            title: album.to_string(),
            artist_name: artist.to_string(),
            label: None,
            release_date: None,
            total_tracks: 10,
            total_discs: 1,
            genres: Vec::new(),
            artwork_url: None,
        },
    }
}

#[test]
fn test_sanitize_whitelist() {
    assert_eq!(sanitize("The Days / Nights (EP)"), "The Days - Nights (EP)");
    assert_eq!(sanitize("A/B"), "A-B");
    assert_eq!(sanitize("Best *Hits*"), "Best -Hits-");
    assert_eq!(sanitize("  padded  "), "padded");
    assert_eq!(sanitize("It's O.K., really!"), "It's O.K., really!");
    assert_eq!(sanitize("Café Tacvba"), "Café Tacvba");
}

#[test]
fn test_destination_is_deterministic() {
    let root = Path::new("/music");
    let t = track("Avicii", "True", "Wake Me Up", 1, 2);
    let first = destination_path(root, &t, AudioFormat::Flac, None);
    let second = destination_path(root, &t, AudioFormat::Flac, None);
    assert_eq!(first, second);
    assert_eq!(
        first,
        Path::new("/music/Avicii/True/1-02 Avicii - Wake Me Up.flac")
    );
}

#[test]
fn test_special_characters_become_dashes() {
    let root = Path::new("/music");
    let t = track("A/B", "Best *Hits*", "Song", 1, 3);
    let dest = destination_path(root, &t, AudioFormat::Mp3_320, None);
    assert_eq!(
        dest,
        Path::new("/music/A-B/Best -Hits-/1-03 A-B - Song.mp3")
    );
}

#[test]
fn test_playlist_layout() {
    let root = Path::new("/music");
    let t = track("Avicii", "True", "Wake Me Up", 1, 2);
    let ctx = PlaylistContext {
        name: "Morning: Mix".to_string(),
        position: 7,
    };
    let dest = destination_path(root, &t, AudioFormat::Mp3_128, Some(&ctx));
    assert_eq!(
        dest,
        Path::new("/music/Morning- Mix/07 Avicii - Wake Me Up.mp3")
    );
}
