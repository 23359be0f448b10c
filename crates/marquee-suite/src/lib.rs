//! Suite orchestration for CPE titles.
//!
//! A "suite" is the fully-linked, immutable in-memory snapshot produced by
//! one successful load of a title's three XML documents: the Manifest
//! (required), the AppData set, and the CPEStyle set (both optional). This
//! crate owns the loading pipeline:
//!
//! 1. **Fetch** - every configured source is resolved to bytes first; the
//!    up-to-three fetches run in parallel and join before parsing starts.
//! 2. **Parse** - the Manifest parses and post-processes first, because
//!    AppData and Style records resolve Experience and Metadata IDs that
//!    only exist once that pass has run; the two companion documents then
//!    parse in parallel with each other.
//! 3. **Publish** - the new [`Suite`] atomically replaces the previous one
//!    in the [`SuiteManager`]'s single current slot. Readers never observe
//!    a half-constructed suite, and a failed load leaves the previous
//!    suite current and untouched.
//! 4. **Enrich** - detached best-effort passes (talent credits and images,
//!    location icons) run on background threads against the injected
//!    collaborators; their failures are swallowed and their results land
//!    in the suite's eventually-consistent enrichment store.
//!
//! ```no_run
//! use marquee_common::Settings;
//! use marquee_suite::{DocumentSource, SuiteManager};
//!
//! let manager = SuiteManager::new(Settings::for_region("US"));
//! let suite = manager.load(
//!     DocumentSource::File("manifest.xml".into()),
//!     Some(DocumentSource::File("appdata.xml".into())),
//!     None,
//! )?;
//!
//! println!("loaded: {:?}", suite);
//! # Ok::<(), marquee_suite::Error>(())
//! ```

mod enrich;
mod error;
mod fetch;
mod manager;
mod source;
mod suite;

pub use enrich::{
    EnrichmentStore, ProductApi, ProductCategory, ShopProduct, TalentApi, TalentDetails,
    TalentFilm, TalentImage, TalentRecord, TalentSocialAccount,
};
pub use error::{Error, Result};
pub use fetch::{CachingFetcher, CollabError, CollabResult, ImageLoader, MediaFetcher};
pub use manager::SuiteManager;
pub use source::DocumentSource;
pub use suite::{ExperienceKind, ResolvedTarget, Suite};
