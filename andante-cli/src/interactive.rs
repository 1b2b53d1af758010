//! Interactive prompt loop.

use std::io::{BufRead, Write};

use andante_catalog::{CatalogClient, Entity, EntityRef};
use andante_downloader::AudioFormat;

/// Prompt and read one trimmed line; `None` when stdin is closed.
fn prompt(message: &str) -> Option<String> {
    print!("{message}");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Ask for a format/bitrate until a supported one is given.
pub(crate) fn prompt_format() -> Option<AudioFormat> {
    loop {
        let input = prompt("Format [mp3-128 / mp3-320 / flac]: ")?;
        match input.parse::<AudioFormat>() {
            Ok(format) => return Some(format),
            Err(e) => println!("{e}"),
        }
    }
}

/// Ask for a catalog URL or a free-text search query and resolve it.
/// Empty input cancels; `None` means stdin closed.
pub(crate) fn prompt_entity(client: &CatalogClient) -> Option<Entity> {
    loop {
        let input = prompt("Catalog URL or search query (empty to quit): ")?;
        if input.is_empty() {
            return None;
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            match EntityRef::parse(&input).and_then(|r| client.resolve(r)) {
                Ok(entity) => return Some(entity),
                Err(e) => println!("{e}"),
            }
            continue;
        }

        match client.search(&input) {
            Ok(hits) if hits.is_empty() => println!("No results for '{input}'"),
            Ok(hits) => {
                for (index, hit) in hits.iter().take(10).enumerate() {
                    let album = hit.album_title.as_deref().unwrap_or("-");
                    println!("  {:2}. {} - {} ({album})", index + 1, hit.artist_name, hit.title);
                }
                if let Some(track) = pick_search_hit(client, &hits) {
                    return Some(Entity::Track(track));
                }
            }
            Err(e) => println!("{e}"),
        }
    }
}

fn pick_search_hit(
    client: &CatalogClient,
    hits: &[andante_catalog::SearchHit],
) -> Option<andante_catalog::Track> {
    let shown = hits.len().min(10);
    loop {
        let input = prompt("Pick a result (empty to search again): ")?;
        if input.is_empty() {
            return None;
        }
        let choice: usize = match input.parse() {
            Ok(n) => n,
            Err(_) => {
                println!("Invalid input: not a number");
                continue;
            }
        };
        if choice == 0 || choice > shown {
            println!("Invalid input: choose 1-{shown}");
            continue;
        }
        match client.track(hits[choice - 1].id) {
            Ok(track) => return Some(track),
            Err(e) => {
                println!("{e}");
                return None;
            }
        }
    }
}

/// Whether the user wants another batch.
pub(crate) fn confirm_continue() -> bool {
    matches!(
        prompt("Download more? [y/N]: ").as_deref(),
        Some("y") | Some("Y") | Some("yes")
    )
}
