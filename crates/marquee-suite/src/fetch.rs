//! The fetch collaborator boundary.
//!
//! The core never talks to the network itself. It requires one capability:
//! "give me bytes for this address, possibly from a local cache". The
//! [`CachingFetcher`] decorator adds an on-disk cache keyed by the
//! address's last path segment, answering from the cache when possible and
//! refreshing it in the background for next time.

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

/// Error type collaborators report; the orchestrator only stringifies it.
pub type CollabError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for collaborator calls.
pub type CollabResult<T> = std::result::Result<T, CollabError>;

/// Fetches raw bytes for a remote address.
pub trait MediaFetcher: Send + Sync {
    fn fetch(&self, address: &Url) -> CollabResult<Vec<u8>>;
}

/// Loads and decodes an image. Used only by best-effort enrichment; never
/// required for a suite to become current.
pub trait ImageLoader: Send + Sync {
    fn load_image(&self, address: &Url) -> CollabResult<Vec<u8>>;
}

/// On-disk caching decorator around a [`MediaFetcher`].
///
/// Cache files are named after the address's last path segment. A cache
/// hit is answered immediately and refreshed in the background so the next
/// load sees current bytes; eviction is left to the embedding application.
pub struct CachingFetcher<F> {
    inner: Arc<F>,
    cache_dir: PathBuf,
}

impl<F: MediaFetcher + 'static> CachingFetcher<F> {
    /// Wrap a fetcher with a cache rooted at `cache_dir`.
    pub fn new(inner: F, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(inner),
            cache_dir: cache_dir.into(),
        }
    }

    /// The cache file path for an address.
    pub fn cache_path(&self, address: &Url) -> PathBuf {
        let name = address
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|s| !s.is_empty())
            .unwrap_or("document.xml");
        self.cache_dir.join(name)
    }

    fn refresh_in_background(&self, address: Url, path: PathBuf) {
        let inner = self.inner.clone();
        std::thread::spawn(move || match inner.fetch(&address) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&path, bytes) {
                    log::debug!("cache refresh write failed for {}: {}", address, e);
                }
            }
            Err(e) => log::debug!("cache refresh fetch failed for {}: {}", address, e),
        });
    }
}

impl<F: MediaFetcher + 'static> MediaFetcher for CachingFetcher<F> {
    fn fetch(&self, address: &Url) -> CollabResult<Vec<u8>> {
        let path = self.cache_path(address);

        if let Ok(bytes) = std::fs::read(&path) {
            self.refresh_in_background(address.clone(), path);
            return Ok(bytes);
        }

        let bytes = self.inner.fetch(address)?;
        if std::fs::create_dir_all(&self.cache_dir).is_ok() {
            if let Err(e) = std::fs::write(&path, &bytes) {
                log::debug!("cache write failed for {}: {}", address, e);
            }
        }
        Ok(bytes)
    }
}
