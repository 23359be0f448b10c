//! Error types for AppData parsing.

use thiserror::Error;

/// Errors that abort an AppData load.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural violation in the document.
    #[error("{0}")]
    Doc(#[from] marquee_xml::Error),

    /// The document's root element is not an AppData set.
    #[error("unexpected root element <{found}> (expected <ManifestAppDataSet>)")]
    UnexpectedRoot { found: String },
}

/// Result type for AppData operations.
pub type Result<T> = std::result::Result<T, Error>;
