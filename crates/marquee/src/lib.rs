//! Marquee - CPE media manifest reader and object model.
//!
//! This crate provides a unified interface to the marquee crate family for
//! working with a feature film's supplemental-experience documents.
//!
//! # Crates
//!
//! - [`marquee_common`] - content identifiers, hashes, and settings
//! - [`marquee_xml`] - XML document access layer with typed accessors
//! - [`marquee_manifest`] - Manifest object model (inventory, experiences)
//! - [`marquee_appdata`] - AppData document (location/product items)
//! - [`marquee_style`] - CPEStyle document (node styles, themes)
//! - [`marquee_suite`] - suite orchestration and the atomic current snapshot
//!
//! # Example
//!
//! ```no_run
//! use marquee::prelude::*;
//!
//! let manager = SuiteManager::new(Settings::for_region("US"));
//! let suite = manager.load(
//!     DocumentSource::File("manifest.xml".into()),
//!     None,
//!     None,
//! )?;
//!
//! let manifest = suite.manifest();
//! println!("main experience: {}", manifest.main_experience().id);
//! for child in manifest.children_of(manifest.out_of_movie_experience()) {
//!     println!("  {}", child.id);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use marquee_appdata as appdata;
pub use marquee_common as common;
pub use marquee_manifest as manifest;
pub use marquee_style as style;
pub use marquee_suite as suite;
pub use marquee_xml as xml;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use marquee_appdata::{AppDataItem, AppDataSet};
    pub use marquee_common::{ContentIdentifier, MapProvider, Settings};
    pub use marquee_manifest::{Experience, Manifest, TimedEvent, TimedEventKind};
    pub use marquee_style::{DeviceClass, Orientation, StyleSet};
    pub use marquee_suite::{
        DocumentSource, ExperienceKind, MediaFetcher, ResolvedTarget, Suite, SuiteManager,
    };
    pub use marquee_xml::XmlDocument;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
