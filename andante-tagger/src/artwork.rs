//! Remote artwork retrieval with a small cache in front.

use std::time::Duration;

use log::debug;

use crate::cache::BoundedCache;
use crate::error::TagError;

/// Anything that can turn an artwork URL into image bytes.
pub trait ArtworkSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, TagError>;
}

/// Plain blocking HTTP fetch.
pub struct HttpArtworkSource {
    http: reqwest::blocking::Client,
}

impl HttpArtworkSource {
    pub fn new() -> Result<Self, TagError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http })
    }
}

impl ArtworkSource for HttpArtworkSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, TagError> {
        debug!("Fetching artwork from {url}");
        let resp = self.http.get(url).send()?.error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    }
}

/// Caches fetched covers so repeated tracks off one album incur at most
/// one remote fetch per cache window.
pub struct CachingSource<S> {
    inner: S,
    cache: BoundedCache<String, Vec<u8>>,
}

impl<S: ArtworkSource> CachingSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            cache: BoundedCache::new(capacity),
        }
    }
}

impl<S: ArtworkSource> ArtworkSource for CachingSource<S> {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, TagError> {
        if let Some(bytes) = self.cache.get(&url.to_string()) {
            debug!("Artwork cache hit for {url}");
            return Ok(bytes.clone());
        }
        let bytes = self.inner.fetch(url)?;
        self.cache.put(url.to_string(), bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSource {
        calls: usize,
    }

    impl ArtworkSource for CountingSource {
        fn fetch(&mut self, url: &str) -> Result<Vec<u8>, TagError> {
            self.calls += 1;
            Ok(url.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_repeat_fetch_hits_cache() {
        let mut source = CachingSource::new(CountingSource { calls: 0 }, 5);
        let first = source.fetch("https://cdn.example/cover.jpg").unwrap();
        let second = source.fetch("https://cdn.example/cover.jpg").unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner.calls, 1);
    }

    #[test]
    fn test_evicted_url_is_refetched() {
        let mut source = CachingSource::new(CountingSource { calls: 0 }, 2);
        source.fetch("a").unwrap();
        source.fetch("b").unwrap();
        source.fetch("c").unwrap(); // evicts a
        source.fetch("a").unwrap(); // miss: fetched again
        assert_eq!(source.inner.calls, 4);
    }
}
