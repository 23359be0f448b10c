//! Text groups and app groups.

use marquee_xml::XmlElement;
use url::Url;

use crate::inventory::{Interactive, TextObject};
use crate::{Manifest, Result};

/// An ordered list of text object references.
///
/// Groups with multiple text objects are legacy and unused; only the first
/// resolved object is exposed.
#[derive(Debug, Clone)]
pub struct TextGroup {
    pub id: String,
    pub language: Option<String>,
    pub text_object_ids: Vec<String>,
}

impl TextGroup {
    /// Construct from a `<TextGroup>` element.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("TextGroupID")?.to_string();
        let language = element.attr("language").map(str::to_string);

        let mut text_object_ids = Vec::new();
        for text_object_id in element.children_named("TextObjectID") {
            if !text_object_id.text().is_empty() {
                text_object_ids.push(text_object_id.text().to_string());
            }
        }

        Ok(Self {
            id,
            language,
            text_object_ids,
        })
    }

    /// The first text object reference that resolves.
    pub fn first_text_object<'a>(&self, manifest: &'a Manifest) -> Option<&'a TextObject> {
        self.text_object_ids
            .iter()
            .find_map(|id| manifest.text_object(id))
    }
}

/// A group of interactive track references.
#[derive(Debug, Clone)]
pub struct AppGroup {
    pub id: String,
    pub interactive_track_ids: Vec<String>,
}

impl AppGroup {
    /// Construct from an `<AppGroup>` element. At least one interactive
    /// track reference is required.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("AppGroupID")?.to_string();

        element.require_child("InteractiveTrackReference")?;
        let mut interactive_track_ids = Vec::new();
        for reference in element.children_named("InteractiveTrackReference") {
            for track_id in reference.children_named("InteractiveTrackID") {
                if !track_id.text().is_empty() {
                    interactive_track_ids.push(track_id.text().to_string());
                }
            }
        }

        Ok(Self {
            id,
            interactive_track_ids,
        })
    }

    /// The first interactive track reference that resolves.
    ///
    /// Broken references are dropped with a diagnostic rather than failing
    /// the group.
    pub fn first_interactive<'a>(&self, manifest: &'a Manifest) -> Option<&'a Interactive> {
        self.interactive_track_ids.iter().find_map(|id| {
            let interactive = manifest.interactive(id);
            if interactive.is_none() {
                log::warn!("app group '{}': unresolved interactive '{}'", self.id, id);
            }
            interactive
        })
    }

    /// URL of the first resolved interactive.
    pub fn url<'a>(&self, manifest: &'a Manifest) -> Option<&'a Url> {
        self.first_interactive(manifest).and_then(Interactive::url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    #[test]
    fn test_text_group() {
        let doc = XmlDocument::parse_str(
            r#"<TextGroup TextGroupID="TG1" language="en">
                <TextObjectID>T1</TextObjectID>
                <TextObjectID>T2</TextObjectID>
            </TextGroup>"#,
        )
        .unwrap();
        let group = TextGroup::from_element(doc.root()).unwrap();
        assert_eq!(group.text_object_ids, ["T1", "T2"]);
        assert_eq!(group.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_app_group() {
        let doc = XmlDocument::parse_str(
            r#"<AppGroup AppGroupID="AG1">
                <InteractiveTrackReference>
                    <InteractiveTrackID>IA1</InteractiveTrackID>
                </InteractiveTrackReference>
            </AppGroup>"#,
        )
        .unwrap();
        let group = AppGroup::from_element(doc.root()).unwrap();
        assert_eq!(group.interactive_track_ids, ["IA1"]);
    }

    #[test]
    fn test_app_group_without_references_is_fatal() {
        let doc = XmlDocument::parse_str(r#"<AppGroup AppGroupID="AG1"/>"#).unwrap();
        assert!(AppGroup::from_element(doc.root()).is_err());
    }
}
