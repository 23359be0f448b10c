//! Where a document's bytes come from.

use std::path::PathBuf;

use url::Url;

/// A source for one of the three suite documents.
///
/// Raw bytes are used as-is, local files are read, and remote addresses
/// go through the configured fetch collaborator before any parsing starts.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Bytes already in hand.
    Bytes(Vec<u8>),
    /// A local file path.
    File(PathBuf),
    /// A remote address resolved through the fetch collaborator.
    Remote(Url),
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&std::path::Path> for DocumentSource {
    fn from(path: &std::path::Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<Url> for DocumentSource {
    fn from(url: Url) -> Self {
        Self::Remote(url)
    }
}
