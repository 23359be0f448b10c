//! CPE AppData document parsing.
//!
//! AppData is the secondary XML document of a CPE title. Its records are
//! generic name/value-pair bags that attach location and product metadata
//! to Experience and Metadata nodes purely by shared identifier strings -
//! there is no typed linkage in the schema, which makes this the most
//! fragile joint in the system. The pair named `type` (scanned across the
//! whole bag, not just the first pair) decides whether a record is a
//! Product or a Location; every other recognized pair name selects how its
//! nested value element is interpreted, and unrecognized names are skipped
//! for forward compatibility.
//!
//! ```no_run
//! use marquee_appdata::{AppDataItem, AppDataSet};
//!
//! let bytes = std::fs::read("appdata.xml")?;
//! let set = AppDataSet::parse(&bytes)?;
//!
//! for item in set.items_for_experience("E7") {
//!     match item {
//!         AppDataItem::Location(location) => println!("location: {:?}", location.name),
//!         AppDataItem::Product(product) => println!("product: {:?}", product.app_id),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod item;
mod set;

pub use error::{Error, Result};
pub use item::{AppDataItem, Bullseye, ItemLinkage, LocationItem, Price, ProductItem};
pub use set::AppDataSet;
