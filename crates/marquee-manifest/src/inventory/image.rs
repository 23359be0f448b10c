//! Image inventory entity.

use marquee_xml::XmlElement;
use url::Url;

use crate::inventory::PixelSize;
use crate::Result;

/// Recognized image encodings (MIME subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
    Png,
    Gif,
}

impl ImageEncoding {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "jpeg" | "jpg" => Some(Self::Jpeg),
            "image/png" | "png" => Some(Self::Png),
            "image/gif" | "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

/// An image from the `<Inventory>` section.
#[derive(Debug, Clone)]
pub struct Image {
    pub id: String,
    pub size: PixelSize,
    pub encoding: ImageEncoding,
    pub url: Url,
}

impl Image {
    /// Construct from an `<Image>` element.
    ///
    /// Pixel size, encoding, and container location are required; an
    /// unsupported encoding yields `Ok(None)` (skip).
    pub fn from_element(element: &XmlElement) -> Result<Option<Self>> {
        let id = element.require_attr("ImageID")?.to_string();

        let size = PixelSize {
            width: element.require_child_u32("Width")?,
            height: element.require_child_u32("Height")?,
        };

        let raw = element.require_child_str("Encoding")?;
        let encoding = match ImageEncoding::parse(raw) {
            Some(e) => e,
            None => {
                log::warn!("skipping image '{}': unsupported encoding '{}'", id, raw);
                return Ok(None);
            }
        };

        let url = element
            .require_child("ContainerReference")?
            .require_child_url("ContainerLocation")?;

        Ok(Some(Self {
            id,
            size,
            encoding,
            url,
        }))
    }
}
