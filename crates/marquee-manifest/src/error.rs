//! Error types for Manifest parsing.

use thiserror::Error;

/// Errors that abort an entire Manifest load.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural violation in the document.
    #[error("{0}")]
    Doc(#[from] marquee_xml::Error),

    /// The document's root element is not a Manifest.
    #[error("unexpected root element <{found}> (expected <MediaManifest>)")]
    UnexpectedRoot { found: String },

    /// No Experience carries an AudioVisual of type "Main".
    #[error("manifest has no main experience")]
    MissingMainExperience,

    /// The main experience does not have exactly the two supplemental
    /// children (out-of-movie, in-movie) the navigation model requires.
    #[error("main experience must have exactly 2 child experiences, found {found}")]
    MissingSupplementalExperiences { found: usize },
}

/// Result type for Manifest operations.
pub type Result<T> = std::result::Result<T, Error>;
