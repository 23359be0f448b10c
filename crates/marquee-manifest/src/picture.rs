//! Picture groups for galleries.

use marquee_xml::XmlElement;
use url::Url;

use crate::inventory::Image;
use crate::{Manifest, Result};

/// A single picture: an image plus an optional distinct thumbnail.
#[derive(Debug, Clone)]
pub struct Picture {
    pub id: String,
    pub image_id: String,
    pub thumbnail_image_id: Option<String>,
    pub caption: Option<String>,
}

impl Picture {
    fn from_element(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: element.require_child_str("PictureID")?.to_string(),
            image_id: element.require_child_str("ImageID")?.to_string(),
            thumbnail_image_id: element.child_str("ThumbnailImageID").map(str::to_string),
            caption: element.child_str("Caption").map(str::to_string),
        })
    }

    /// Resolve the full image in the owning manifest.
    pub fn image<'a>(&self, manifest: &'a Manifest) -> Option<&'a Image> {
        manifest.image(&self.image_id)
    }

    /// Resolve the thumbnail image, falling back to the full image when no
    /// distinct thumbnail is declared (or it fails to resolve).
    pub fn thumbnail_image<'a>(&self, manifest: &'a Manifest) -> Option<&'a Image> {
        self.thumbnail_image_id
            .as_deref()
            .and_then(|id| manifest.image(id))
            .or_else(|| self.image(manifest))
    }

    /// URL of the full image.
    pub fn image_url<'a>(&self, manifest: &'a Manifest) -> Option<&'a Url> {
        self.image(manifest).map(|i| &i.url)
    }

    /// URL of the thumbnail (with the full-image fallback).
    pub fn thumbnail_url<'a>(&self, manifest: &'a Manifest) -> Option<&'a Url> {
        self.thumbnail_image(manifest).map(|i| &i.url)
    }
}

/// An ordered collection of pictures.
#[derive(Debug, Clone)]
pub struct PictureGroup {
    pub id: String,
    pub pictures: Vec<Picture>,
}

impl PictureGroup {
    /// Construct from a `<PictureGroup>` element. At least one `<Picture>`
    /// is required.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("PictureGroupID")?.to_string();

        element.require_child("Picture")?;
        let mut pictures = Vec::new();
        for picture in element.children_named("Picture") {
            pictures.push(Picture::from_element(picture)?);
        }

        Ok(Self { id, pictures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    #[test]
    fn test_picture_group() {
        let doc = XmlDocument::parse_str(
            r#"<PictureGroup PictureGroupID="PG1">
                <Picture>
                    <PictureID>PIC1</PictureID>
                    <ImageID>I1</ImageID>
                    <ThumbnailImageID>I2</ThumbnailImageID>
                    <Caption>Behind the scenes</Caption>
                </Picture>
                <Picture>
                    <PictureID>PIC2</PictureID>
                    <ImageID>I3</ImageID>
                </Picture>
            </PictureGroup>"#,
        )
        .unwrap();
        let group = PictureGroup::from_element(doc.root()).unwrap();
        assert_eq!(group.pictures.len(), 2);
        assert_eq!(group.pictures[0].thumbnail_image_id.as_deref(), Some("I2"));
        assert!(group.pictures[1].thumbnail_image_id.is_none());
    }

    #[test]
    fn test_empty_group_is_fatal() {
        let doc = XmlDocument::parse_str(r#"<PictureGroup PictureGroupID="PG1"/>"#).unwrap();
        assert!(PictureGroup::from_element(doc.root()).is_err());
    }
}
