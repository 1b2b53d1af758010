//! Two-phase metadata writing.
//!
//! Phase one writes the common fields through the general-purpose engine
//! and commits; phase two reopens the file through the format-specific
//! engine for the supplementary fields the general engine does not carry
//! uniformly (full release date, record label) and commits again. A
//! phase-two failure fails the call but leaves phase one's committed
//! writes on disk; each phase is atomic only relative to its own commit.

use std::path::Path;

use andante_catalog::Track;
use log::debug;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::{Accessor, TagExt};
use lofty::read_from_path;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

use crate::artwork::ArtworkSource;
use crate::error::TagError;
use crate::tagset::TagSet;

/// Applies catalog metadata to downloaded files.
pub struct Tagger<S: ArtworkSource> {
    artwork: S,
}

impl<S: ArtworkSource> Tagger<S> {
    pub fn new(artwork: S) -> Self {
        Self { artwork }
    }

    /// Tag one file. Must only be called on a fully materialized file
    /// (the completion watcher's READY signal is the gate).
    pub fn tag(&mut self, path: &Path, track: &Track) -> Result<(), TagError> {
        let artwork = match &track.album.artwork_url {
            Some(url) => Some(self.artwork.fetch(url)?),
            None => None,
        };
        let tags = TagSet::project(track, artwork);

        write_common_fields(path, &tags)?;
        write_supplementary_fields(path, &tags)?;
        Ok(())
    }
}

/// Phase one: clear every existing tag and write the common fields
/// through the general-purpose engine, committed before phase two runs.
fn write_common_fields(path: &Path, tags: &TagSet) -> Result<(), TagError> {
    let tagged = read_from_path(path)?;
    let tag_type = tagged.primary_tag_type();
    let existing: Vec<TagType> = tagged.tags().iter().map(|t| t.tag_type()).collect();
    drop(tagged);

    // Strip everything already on the file, embedded artwork included,
    // whichever engine wrote it.
    for t in existing {
        Tag::new(t).remove_from_path(path)?;
    }

    let mut tag = Tag::new(tag_type);
    tag.set_title(tags.title.clone());
    for artist in &tags.artists {
        tag.push(TagItem::new(
            ItemKey::TrackArtist,
            ItemValue::Text(artist.clone()),
        ));
    }
    tag.insert_text(ItemKey::AlbumArtist, tags.album_artist.clone());
    tag.set_album(tags.album.clone());
    tag.set_track(tags.track_number);
    tag.set_track_total(tags.track_total);
    tag.set_disk(tags.disc_number);
    tag.set_disk_total(tags.disc_total);
    if let Some(year) = tags.year {
        tag.set_year(year);
    }
    for genre in &tags.genres {
        tag.push(TagItem::new(ItemKey::Genre, ItemValue::Text(genre.clone())));
    }
    if let Some(isrc) = &tags.isrc {
        tag.insert_text(ItemKey::Isrc, isrc.clone());
    }
    if let Some(bytes) = &tags.artwork {
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(picture_mime(bytes)),
            None,
            bytes.clone(),
        );
        tag.push_picture(picture);
    }

    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}

/// Phase two: supplementary fields through the format-specific engine.
fn write_supplementary_fields(path: &Path, tags: &TagSet) -> Result<(), TagError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => write_supplementary_mp3(path, tags),
        Some("flac") => write_supplementary_flac(path, tags),
        other => {
            debug!("No supplementary tag engine for {other:?}; skipping phase two");
            Ok(())
        }
    }
}

fn write_supplementary_mp3(path: &Path, tags: &TagSet) -> Result<(), TagError> {
    use id3::TagLike;

    let mut tag = id3::Tag::read_from_path(path)?;
    if let Some(date) = &tags.release_date {
        if let Ok(stamp) = date.parse::<id3::Timestamp>() {
            tag.set_date_released(stamp);
        }
    }
    if let Some(label) = &tags.label {
        tag.add_frame(id3::frame::Frame::text("TPUB", label.clone()));
    }
    tag.write_to_path(path, id3::Version::Id3v24)?;
    Ok(())
}

fn write_supplementary_flac(path: &Path, tags: &TagSet) -> Result<(), TagError> {
    let mut tag = metaflac::Tag::read_from_path(path)?;
    if let Some(date) = &tags.release_date {
        tag.set_vorbis("DATE", vec![date.clone()]);
    }
    if let Some(label) = &tags.label {
        tag.set_vorbis("LABEL", vec![label.clone()]);
    }
    tag.save()?;
    Ok(())
}

fn picture_mime(bytes: &[u8]) -> MimeType {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => MimeType::Jpeg,
        Ok(image::ImageFormat::Png) => MimeType::Png,
        Ok(image::ImageFormat::Gif) => MimeType::Gif,
        Ok(image::ImageFormat::Bmp) => MimeType::Bmp,
        Ok(image::ImageFormat::Tiff) => MimeType::Tiff,
        _ => MimeType::Unknown("application/octet-stream".to_string()),
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
