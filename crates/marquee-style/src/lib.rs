//! CPE Style document parsing.
//!
//! CPEStyle is the tertiary XML document of a CPE title: themed UI chrome
//! (backgrounds, button image sets) applied per experience and per device
//! class. A node style's applicability flags are not declared on the style
//! itself - they are the union of every `<ExperienceStyleMap>` entry that
//! references it, computed while the document parses and then frozen.
//!
//! ```no_run
//! use marquee_style::{DeviceClass, Orientation, StyleSet};
//!
//! let bytes = std::fs::read("style.xml")?;
//! let styles = StyleSet::parse(&bytes)?;
//!
//! if let Some(style) = styles.style_for("E1", Orientation::Landscape, DeviceClass::Tablet) {
//!     println!("background color: {:?}", style.background.color);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod style;

pub use error::{Error, Result};
pub use style::{
    Background, BackgroundAdaptation, ButtonImages, DeviceClass, NodeStyle, NodeStyleRef,
    Orientation, OverlayArea, PositioningMethod, ScaleMethod, StyleSet, Theme,
};
