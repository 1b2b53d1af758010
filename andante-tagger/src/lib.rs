pub mod artwork;
pub mod cache;
pub mod error;
pub mod pipeline;
pub mod tagset;

pub use artwork::{ArtworkSource, CachingSource, HttpArtworkSource};
pub use cache::{BoundedCache, DEFAULT_CAPACITY};
pub use error::TagError;
pub use pipeline::Tagger;
pub use tagset::TagSet;
