//! Error types for Style parsing.

use thiserror::Error;

/// Errors that abort a Style load.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural violation in the document.
    #[error("{0}")]
    Doc(#[from] marquee_xml::Error),

    /// The document's root element is not a style set.
    #[error("unexpected root element <{found}> (expected <CPEStyleSet>)")]
    UnexpectedRoot { found: String },
}

/// Result type for Style operations.
pub type Result<T> = std::result::Result<T, Error>;
