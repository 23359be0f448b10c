//! Error types for suite loading.

use thiserror::Error;

/// Errors terminating a suite load.
///
/// A load has exactly one terminal outcome: a published [`crate::Suite`]
/// or a single error value. No partial snapshot is ever exposed.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error reading a local document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest parse or post-processing failure.
    #[error("manifest error: {0}")]
    Manifest(#[from] marquee_manifest::Error),

    /// AppData parse failure.
    #[error("app data error: {0}")]
    AppData(#[from] marquee_appdata::Error),

    /// Style parse failure.
    #[error("style error: {0}")]
    Style(#[from] marquee_style::Error),

    /// Remote fetch failure reported by the fetch collaborator.
    #[error("fetch failed for {address}: {reason}")]
    Fetch { address: String, reason: String },

    /// A remote source was given but no fetcher is configured.
    #[error("remote source {0} requires a configured fetcher")]
    NoFetcher(String),
}

/// Result type for suite operations.
pub type Result<T> = std::result::Result<T, Error>;
