//! Experiences - the navigable UI tree of a Manifest.

use marquee_xml::XmlElement;

use crate::Result;

/// Presentation role of an audiovisual experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvType {
    /// The feature film itself. Exactly one per manifest.
    Main,
    /// Promotional clip (trailer, teaser).
    Promotion,
    /// Shareable clip.
    ClipShare,
    /// Anything else; preserved rather than skipped so unknown roles still
    /// present as plain bonus video.
    Other,
}

impl AvType {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("main") {
            Self::Main
        } else if value.eq_ignore_ascii_case("promotion") {
            Self::Promotion
        } else if value.eq_ignore_ascii_case("clip share") || value.eq_ignore_ascii_case("clipshare")
        {
            Self::ClipShare
        } else {
            Self::Other
        }
    }
}

/// Audio-visual content owned by an experience.
#[derive(Debug, Clone)]
pub struct AudioVisual {
    pub av_type: AvType,
    pub sub_type: Option<String>,
    /// Metadata reference.
    pub content_id: Option<String>,
    pub presentation_id: Option<String>,
    pub playable_sequence_id: Option<String>,
}

impl AudioVisual {
    fn from_element(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            av_type: element
                .child_str("Type")
                .map(AvType::parse)
                .unwrap_or(AvType::Other),
            sub_type: element.child_str("SubType").map(str::to_string),
            content_id: element.child_str("ContentID").map(str::to_string),
            presentation_id: element.child_str("PresentationID").map(str::to_string),
            playable_sequence_id: element
                .child_str("PlayableSequenceID")
                .map(str::to_string),
        })
    }
}

/// A picture gallery owned by an experience.
#[derive(Debug, Clone)]
pub struct Gallery {
    /// Natural `GalleryID` when declared, else the owning experience's ID.
    pub id: String,
    pub picture_group_id: String,
    pub content_id: Option<String>,
    pub sub_type: Option<String>,
    pub name: Option<String>,
}

impl Gallery {
    fn from_element(element: &XmlElement, owner_id: &str) -> Result<Self> {
        Ok(Self {
            id: element
                .child_str("GalleryID")
                .unwrap_or(owner_id)
                .to_string(),
            picture_group_id: element.require_child_str("PictureGroupID")?.to_string(),
            content_id: element.child_str("ContentID").map(str::to_string),
            sub_type: element.child_str("SubType").map(str::to_string),
            name: element.child_str("GalleryName").map(str::to_string),
        })
    }
}

/// An interactive app owned by an experience.
#[derive(Debug, Clone)]
pub struct ExperienceApp {
    pub app_group_id: String,
    /// Declared app names, matched against product API namespaces.
    pub names: Vec<String>,
}

impl ExperienceApp {
    fn from_element(element: &XmlElement) -> Result<Self> {
        let app_group_id = element.require_child_str("AppGroupID")?.to_string();
        let names = element
            .children_named("AppName")
            .filter(|n| !n.text().is_empty())
            .map(|n| n.text().to_string())
            .collect();
        Ok(Self {
            app_group_id,
            names,
        })
    }
}

/// A parent-to-child edge in the experience tree.
///
/// Display order is a property of the edge, not of the child: the same
/// child may appear under several parents at different positions.
#[derive(Debug, Clone)]
pub struct ChildRef {
    pub experience_id: String,
    pub sequence: i64,
}

/// A node in the navigable UI tree.
#[derive(Debug, Clone)]
pub struct Experience {
    pub id: String,
    /// Metadata reference.
    pub content_id: Option<String>,
    pub audiovisual: Option<AudioVisual>,
    pub gallery: Option<Gallery>,
    pub app: Option<ExperienceApp>,
    /// Timed event sequence references.
    pub timed_sequence_ids: Vec<String>,
    /// Child edges sorted by sequence (ties keep document order).
    pub children: Vec<ChildRef>,
}

impl Experience {
    /// Construct from an `<Experience>` element.
    ///
    /// The region filter runs before anything else: a `<Region>` allow-list
    /// not containing `region`, or an `<ExcludedRegion>` deny-list
    /// containing it, yields `Ok(None)` (skip, not error). This is how one
    /// manifest encodes region-restricted content variants.
    pub fn from_element(element: &XmlElement, region: &str) -> Result<Option<Self>> {
        let id = element.require_attr("ExperienceID")?.to_string();

        let allowed: Vec<&str> = element
            .children_named("Region")
            .filter_map(|r| r.child_str("Country"))
            .collect();
        if !allowed.is_empty() && !allowed.iter().any(|c| c.eq_ignore_ascii_case(region)) {
            log::debug!("experience '{}' filtered out of region '{}'", id, region);
            return Ok(None);
        }
        let denied = element
            .children_named("ExcludedRegion")
            .filter_map(|r| r.child_str("Country"))
            .any(|c| c.eq_ignore_ascii_case(region));
        if denied {
            log::debug!("experience '{}' excluded from region '{}'", id, region);
            return Ok(None);
        }

        let audiovisual = match element.child("Audiovisual") {
            Some(av) => Some(AudioVisual::from_element(av)?),
            None => None,
        };
        let gallery = match element.child("Gallery") {
            Some(g) => Some(Gallery::from_element(g, &id)?),
            None => None,
        };
        let app = match element.child("App") {
            Some(a) => Some(ExperienceApp::from_element(a)?),
            None => None,
        };

        let timed_sequence_ids = element
            .children_named("TimedSequenceID")
            .filter(|t| !t.text().is_empty())
            .map(|t| t.text().to_string())
            .collect();

        let mut children = Vec::new();
        for child in element.children_named("ExperienceChild") {
            children.push(ChildRef {
                experience_id: child.require_child_str("ExperienceID")?.to_string(),
                sequence: child
                    .child("SequenceInfo")
                    .and_then(|s| s.child_i64("Number"))
                    .unwrap_or(0),
            });
        }
        children.sort_by_key(|c| c.sequence);

        Ok(Some(Self {
            id,
            content_id: element.child_str("ContentID").map(str::to_string),
            audiovisual,
            gallery,
            app,
            timed_sequence_ids,
            children,
        }))
    }

    /// Whether this experience's audiovisual is the main feature.
    pub fn is_main(&self) -> bool {
        self.audiovisual
            .as_ref()
            .is_some_and(|av| av.av_type == AvType::Main)
    }

    /// Metadata reference, preferring the audiovisual's own over the
    /// experience-level one.
    pub fn metadata_id(&self) -> Option<&str> {
        self.audiovisual
            .as_ref()
            .and_then(|av| av.content_id.as_deref())
            .or(self.content_id.as_deref())
    }
}
