//! Error types for the document access layer.

use thiserror::Error;

/// Errors produced while parsing or interrogating an XML document.
///
/// The structural variants (`MissingAttribute`, `MissingChild`,
/// `MissingValue`, `UnsupportedValue`) are the fatal tier of the loader's
/// two-tier failure policy: any of them aborts an entire load.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed XML input.
    #[error("XML parse error: {0}")]
    Malformed(String),

    /// Input is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Document contains no root element.
    #[error("no root element found in document")]
    NoRootElement,

    /// A required attribute is absent.
    #[error("element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// A required child element is absent.
    #[error("element <{element}> is missing required child <{child}>")]
    MissingChild { element: String, child: String },

    /// A required element is present but carries no value.
    #[error("element <{element}> is missing a required value")]
    MissingValue { element: String },

    /// A value is present but cannot be interpreted as the requested type.
    #[error("element <{element}> has unsupported value '{value}'")]
    UnsupportedValue { element: String, value: String },
}

/// Result type alias for document access operations.
pub type Result<T> = std::result::Result<T, Error>;
