//! Timed event sequences - time-range annotations on a presentation's
//! timeline.

use marquee_common::ContentIdentifier;
use marquee_xml::XmlElement;

use crate::{Error, Result};

/// The single auxiliary payload a timed event points at.
///
/// The schema declares the payload elements as a choice group; the parser
/// trusts that and takes the first one present, in the order listed here.
#[derive(Debug, Clone, PartialEq)]
pub enum TimedEventTarget {
    /// A presentation (video clip).
    Presentation(String),
    /// A single picture.
    Picture(String),
    /// A picture gallery.
    Gallery(String),
    /// An interactive app group.
    AppGroup(String),
    /// One string out of a text group.
    TextItem { text_group_id: String, index: usize },
    /// A shoppable product, identified in a product API namespace.
    Product(ContentIdentifier),
    /// A generic identifier; its namespace routes it to an AppData item
    /// (location/product) or a person.
    Other(ContentIdentifier),
}

/// Discriminant of a [`TimedEventTarget`], for kind queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEventKind {
    Video,
    Picture,
    Gallery,
    App,
    TextItem,
    Product,
    Other,
}

/// A time-range annotation pointing at exactly one payload.
#[derive(Debug, Clone)]
pub struct TimedEvent {
    /// Start of the range, in seconds. Always `<= end_seconds`.
    pub start_seconds: f64,
    /// End of the range, in seconds.
    pub end_seconds: f64,
    pub target: TimedEventTarget,
    /// Optional initialization payload handed to an app target.
    pub initialization: Option<String>,
}

impl TimedEvent {
    /// Construct from a `<TimedEvent>` element.
    ///
    /// A missing payload is a structural error. An inverted time range is
    /// dropped with a diagnostic (`Ok(None)`), preserving the start <= end
    /// invariant on every constructed event.
    pub fn from_element(element: &XmlElement) -> Result<Option<Self>> {
        let start_seconds = element.require_child_f64("StartTimecode")?;
        let end_seconds = element.require_child_f64("EndTimecode")?;
        if end_seconds < start_seconds {
            log::warn!(
                "dropping timed event with inverted range {}..{}",
                start_seconds,
                end_seconds
            );
            return Ok(None);
        }

        let target = Self::parse_target(element)?;

        Ok(Some(Self {
            start_seconds,
            end_seconds,
            target,
            initialization: element.child_str("Initialization").map(str::to_string),
        }))
    }

    /// First-match-wins over the schema's choice group.
    fn parse_target(element: &XmlElement) -> Result<TimedEventTarget> {
        if let Some(id) = element.child_str("PresentationID") {
            return Ok(TimedEventTarget::Presentation(id.to_string()));
        }
        if let Some(id) = element.child_str("PictureID") {
            return Ok(TimedEventTarget::Picture(id.to_string()));
        }
        if let Some(id) = element.child_str("GalleryID") {
            return Ok(TimedEventTarget::Gallery(id.to_string()));
        }
        if let Some(id) = element.child_str("AppGroupID") {
            return Ok(TimedEventTarget::AppGroup(id.to_string()));
        }
        if let Some(text_group) = element.child("TextGroupID") {
            let id = text_group.require_text()?;
            return Ok(TimedEventTarget::TextItem {
                text_group_id: id.to_string(),
                index: text_group
                    .attr("index")
                    .and_then(|i| i.parse().ok())
                    .unwrap_or(1),
            });
        }
        if element.has_child("ProductID") {
            let product = element.require_child("ProductID")?;
            return Ok(TimedEventTarget::Product(crate::ident::content_identifier(
                product,
            )?));
        }
        if element.has_child("OtherID") {
            let other = element.require_child("OtherID")?;
            return Ok(TimedEventTarget::Other(crate::ident::content_identifier(
                other,
            )?));
        }

        Err(Error::Doc(marquee_xml::Error::MissingChild {
            element: element.tag().to_string(),
            child: "PresentationID|PictureID|GalleryID|AppGroupID|TextGroupID|ProductID|OtherID"
                .to_string(),
        }))
    }

    /// The payload's kind discriminant.
    pub fn kind(&self) -> TimedEventKind {
        match self.target {
            TimedEventTarget::Presentation(_) => TimedEventKind::Video,
            TimedEventTarget::Picture(_) => TimedEventKind::Picture,
            TimedEventTarget::Gallery(_) => TimedEventKind::Gallery,
            TimedEventTarget::AppGroup(_) => TimedEventKind::App,
            TimedEventTarget::TextItem { .. } => TimedEventKind::TextItem,
            TimedEventTarget::Product(_) => TimedEventKind::Product,
            TimedEventTarget::Other(_) => TimedEventKind::Other,
        }
    }

    /// Whether the payload is of the given kind.
    #[inline]
    pub fn is_kind(&self, kind: TimedEventKind) -> bool {
        self.kind() == kind
    }

    /// Whether the range contains the given time.
    pub fn contains(&self, seconds: f64) -> bool {
        self.start_seconds <= seconds && seconds <= self.end_seconds
    }
}

/// An ordered list of timed events tied to exactly one of a presentation
/// or a playable sequence.
#[derive(Debug, Clone)]
pub struct TimedEventSequence {
    pub id: String,
    pub presentation_id: Option<String>,
    pub playable_sequence_id: Option<String>,
    /// Events sorted by start time (ties keep document order).
    pub events: Vec<TimedEvent>,
}

impl TimedEventSequence {
    /// Construct from a `<TimedEventSequence>` element.
    ///
    /// One of `PresentationID` / `PlayableSequenceID` is required; when both
    /// appear the presentation reference wins (first-match, mirroring the
    /// payload choice handling).
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("TimedSequenceID")?.to_string();

        let presentation_id = element.child_str("PresentationID").map(str::to_string);
        let playable_sequence_id = if presentation_id.is_none() {
            Some(element.require_child_str("PlayableSequenceID")?.to_string())
        } else {
            None
        };

        let mut events = Vec::new();
        for event in element.children_named("TimedEvent") {
            if let Some(event) = TimedEvent::from_element(event)? {
                events.push(event);
            }
        }
        events.sort_by(|a, b| {
            a.start_seconds
                .partial_cmp(&b.start_seconds)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(Self {
            id,
            presentation_id,
            playable_sequence_id,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    #[test]
    fn test_gallery_event() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEvent>
                <StartTimecode>10.0</StartTimecode>
                <EndTimecode>15.0</EndTimecode>
                <GalleryID>G1</GalleryID>
            </TimedEvent>"#,
        )
        .unwrap();
        let event = TimedEvent::from_element(doc.root()).unwrap().unwrap();
        assert_eq!(event.start_seconds, 10.0);
        assert_eq!(event.end_seconds, 15.0);
        assert!(event.is_kind(TimedEventKind::Gallery));
        assert!(!event.is_kind(TimedEventKind::Video));
        assert!(event.contains(12.0));
        assert!(!event.contains(15.1));
    }

    #[test]
    fn test_first_match_wins() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEvent>
                <StartTimecode>0</StartTimecode>
                <EndTimecode>1</EndTimecode>
                <PresentationID>P1</PresentationID>
                <GalleryID>G1</GalleryID>
            </TimedEvent>"#,
        )
        .unwrap();
        let event = TimedEvent::from_element(doc.root()).unwrap().unwrap();
        assert_eq!(event.kind(), TimedEventKind::Video);
    }

    #[test]
    fn test_text_item_index() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEvent>
                <StartTimecode>0</StartTimecode>
                <EndTimecode>1</EndTimecode>
                <TextGroupID index="3">TG1</TextGroupID>
            </TimedEvent>"#,
        )
        .unwrap();
        let event = TimedEvent::from_element(doc.root()).unwrap().unwrap();
        assert_eq!(
            event.target,
            TimedEventTarget::TextItem {
                text_group_id: "TG1".to_string(),
                index: 3
            }
        );
    }

    #[test]
    fn test_other_id_namespace() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEvent>
                <StartTimecode>0</StartTimecode>
                <EndTimecode>1</EndTimecode>
                <OtherID>
                    <Namespace>AppDataID</Namespace>
                    <Identifier>APP_3</Identifier>
                </OtherID>
            </TimedEvent>"#,
        )
        .unwrap();
        let event = TimedEvent::from_element(doc.root()).unwrap().unwrap();
        match &event.target {
            TimedEventTarget::Other(id) => assert!(id.is_app_data()),
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_inverted_range_dropped() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEvent>
                <StartTimecode>20</StartTimecode>
                <EndTimecode>10</EndTimecode>
                <GalleryID>G1</GalleryID>
            </TimedEvent>"#,
        )
        .unwrap();
        assert!(TimedEvent::from_element(doc.root()).unwrap().is_none());
    }

    #[test]
    fn test_missing_payload_is_fatal() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEvent>
                <StartTimecode>0</StartTimecode>
                <EndTimecode>1</EndTimecode>
            </TimedEvent>"#,
        )
        .unwrap();
        assert!(TimedEvent::from_element(doc.root()).is_err());
    }

    #[test]
    fn test_sequence_requires_tie() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEventSequence TimedSequenceID="TS1"/>"#,
        )
        .unwrap();
        assert!(TimedEventSequence::from_element(doc.root()).is_err());
    }

    #[test]
    fn test_sequence_sorts_events() {
        let doc = XmlDocument::parse_str(
            r#"<TimedEventSequence TimedSequenceID="TS1">
                <PresentationID>P1</PresentationID>
                <TimedEvent>
                    <StartTimecode>30</StartTimecode>
                    <EndTimecode>40</EndTimecode>
                    <GalleryID>G2</GalleryID>
                </TimedEvent>
                <TimedEvent>
                    <StartTimecode>5</StartTimecode>
                    <EndTimecode>10</EndTimecode>
                    <GalleryID>G1</GalleryID>
                </TimedEvent>
            </TimedEventSequence>"#,
        )
        .unwrap();
        let sequence = TimedEventSequence::from_element(doc.root()).unwrap();
        assert_eq!(sequence.presentation_id.as_deref(), Some("P1"));
        assert_eq!(sequence.events[0].start_seconds, 5.0);
        assert_eq!(sequence.events[1].start_seconds, 30.0);
    }
}
