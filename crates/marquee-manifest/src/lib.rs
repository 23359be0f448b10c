//! CPE Manifest object model.
//!
//! The Manifest is the primary XML document of a CPE title: it describes
//! the inventory (media assets), the structural entities composed from
//! them (presentations, galleries, app groups, timed event sequences), and
//! the experience tree the user navigates. This crate parses one Manifest
//! document into an immutable, fully-indexed object graph.
//!
//! # Quick Start
//!
//! ```no_run
//! use marquee_manifest::Manifest;
//!
//! let bytes = std::fs::read("manifest.xml")?;
//! let manifest = Manifest::parse(&bytes, "US")?;
//!
//! let main = manifest.main_experience();
//! println!("main experience: {}", main.id);
//! for child in manifest.children_of(manifest.out_of_movie_experience()) {
//!     println!("  extra: {}", child.id);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Reference resolution
//!
//! Entities never hold references to their siblings. They record identifier
//! strings and resolve them on demand through the owning [`Manifest`],
//! which is what allows forward references across sections (and across the
//! companion AppData/Style documents) without two-pass construction:
//!
//! ```no_run
//! # use marquee_manifest::Manifest;
//! # let manifest = Manifest::parse(&[], "US")?;
//! if let Some(presentation) = manifest.presentation("P1") {
//!     if let Some(video) = presentation.first_video(&manifest) {
//!         println!("plays {}", video.id);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Failure policy
//!
//! Parsing applies a two-tier policy throughout: structural violations
//! (missing required attributes, children, or values) abort the whole load,
//! while unrecognized enumerated values (an unknown codec, an unsupported
//! image encoding) drop the offending element with a logged diagnostic and
//! let the rest of the load proceed.

mod error;
mod experience;
mod groups;
mod ident;
mod manifest;
mod picture;
mod presentation;
mod timed_event;

pub mod inventory;

pub use error::{Error, Result};
pub use experience::{AudioVisual, AvType, ChildRef, Experience, ExperienceApp, Gallery};
pub use groups::{AppGroup, TextGroup};
pub use manifest::{Manifest, TimedEventRef};
pub use picture::{Picture, PictureGroup};
pub use presentation::{Clip, PlayableSequence, Presentation};
pub use timed_event::{TimedEvent, TimedEventKind, TimedEventSequence, TimedEventTarget};
