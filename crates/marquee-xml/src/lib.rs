//! XML document access layer for CPE manifests.
//!
//! This crate wraps a parsed XML tree and offers typed accessors (string,
//! integer, double, boolean, URL at a named child element or attribute,
//! with presence checks). It is pure and stateless: no domain knowledge,
//! no schema validation beyond reporting the first structural violation a
//! caller asks it to enforce.
//!
//! # Quick Start
//!
//! ```
//! use marquee_xml::XmlDocument;
//!
//! let doc = XmlDocument::parse(br#"<Video VideoTrackID="V1"><Type>primary</Type></Video>"#)?;
//! let root = doc.root();
//!
//! assert_eq!(root.require_attr("VideoTrackID")?, "V1");
//! assert_eq!(root.child_str("Type"), Some("primary"));
//! assert!(!root.has_child("Encoding"));
//! # Ok::<(), marquee_xml::Error>(())
//! ```
//!
//! # Boolean leniency
//!
//! Historical manifest files encode booleans as `"true"` or `"Y"` in any
//! case. [`parse_bool_lenient`] preserves that policy exactly: those two
//! spellings (case-insensitive) are true, everything else is false.

mod document;
mod duration;
mod error;

pub use document::{parse_bool_lenient, XmlDocument, XmlElement};
pub use duration::parse_iso8601_duration;
pub use error::{Error, Result};
