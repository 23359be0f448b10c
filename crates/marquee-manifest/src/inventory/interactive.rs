//! Interactive track inventory entity.

use marquee_xml::XmlElement;
use url::Url;

use crate::ident::container_location;
use crate::Result;

/// Kind of interactive content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveType {
    /// Self-contained interactive app.
    Standalone,
    /// Overlay rendered on top of playing video.
    Overlay,
}

impl InteractiveType {
    /// Exact match first, then a case-insensitive fallback.
    fn parse(value: &str) -> Option<Self> {
        match value {
            "standalone" => return Some(Self::Standalone),
            "overlay" => return Some(Self::Overlay),
            _ => {}
        }
        if value.eq_ignore_ascii_case("standalone") {
            Some(Self::Standalone)
        } else if value.eq_ignore_ascii_case("overlay") {
            Some(Self::Overlay)
        } else {
            None
        }
    }
}

/// Runtime environment an interactive encoding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    Html5,
    Ios,
    Android,
    Default,
}

impl RuntimeEnvironment {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "html5" => Some(Self::Html5),
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

/// One encoding of an interactive track for a specific runtime.
#[derive(Debug, Clone)]
pub struct InteractiveEncoding {
    pub runtime: RuntimeEnvironment,
    pub location: Option<Url>,
}

/// An interactive track from the `<Inventory>` section.
#[derive(Debug, Clone)]
pub struct Interactive {
    pub id: String,
    pub interactive_type: InteractiveType,
    /// Encodings with a recognized runtime; unsupported runtimes are
    /// dropped individually, never the whole Interactive.
    pub encodings: Vec<InteractiveEncoding>,
}

impl Interactive {
    /// Construct from an `<Interactive>` element.
    ///
    /// Returns `Ok(None)` (skip) for an unrecognized type. An unsupported
    /// runtime environment skips only that encoding sub-record.
    pub fn from_element(element: &XmlElement) -> Result<Option<Self>> {
        let id = element.require_attr("InteractiveTrackID")?.to_string();

        let raw = element.require_child_str("Type")?;
        let interactive_type = match InteractiveType::parse(raw) {
            Some(t) => t,
            None => {
                log::warn!("skipping interactive '{}': unknown type '{}'", id, raw);
                return Ok(None);
            }
        };

        element.require_child("Encoding")?;

        let mut encodings = Vec::new();
        for enc in element.children_named("Encoding") {
            let raw = enc.require_child_str("RuntimeEnvironment")?;
            match RuntimeEnvironment::parse(raw) {
                Some(runtime) => encodings.push(InteractiveEncoding {
                    runtime,
                    location: container_location(enc),
                }),
                None => {
                    log::warn!(
                        "interactive '{}': dropping encoding with unsupported runtime '{}'",
                        id,
                        raw
                    );
                }
            }
        }

        Ok(Some(Self {
            id,
            interactive_type,
            encodings,
        }))
    }

    /// URL of the first encoding that declares a location.
    pub fn url(&self) -> Option<&Url> {
        self.encodings.iter().find_map(|e| e.location.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    fn parse(xml: &str) -> Result<Option<Interactive>> {
        let doc = XmlDocument::parse_str(xml).unwrap();
        Interactive::from_element(doc.root())
    }

    #[test]
    fn test_full_interactive() {
        let interactive = parse(
            r#"<Interactive InteractiveTrackID="IA1">
                <Type>standalone</Type>
                <Encoding>
                    <RuntimeEnvironment>html5</RuntimeEnvironment>
                    <ContainerReference>
                        <ContainerLocation>http://apps.example.com/shop/</ContainerLocation>
                    </ContainerReference>
                </Encoding>
            </Interactive>"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(interactive.interactive_type, InteractiveType::Standalone);
        assert_eq!(interactive.encodings.len(), 1);
        assert_eq!(
            interactive.url().unwrap().as_str(),
            "http://apps.example.com/shop/"
        );
    }

    #[test]
    fn test_case_insensitive_type() {
        let interactive = parse(
            r#"<Interactive InteractiveTrackID="IA1">
                <Type>Standalone</Type>
                <Encoding><RuntimeEnvironment>html5</RuntimeEnvironment></Encoding>
            </Interactive>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(interactive.interactive_type, InteractiveType::Standalone);
    }

    #[test]
    fn test_unsupported_runtime_drops_sub_record_only() {
        let interactive = parse(
            r#"<Interactive InteractiveTrackID="IA1">
                <Type>standalone</Type>
                <Encoding><RuntimeEnvironment>flash</RuntimeEnvironment></Encoding>
                <Encoding><RuntimeEnvironment>html5</RuntimeEnvironment></Encoding>
            </Interactive>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(interactive.encodings.len(), 1);
        assert_eq!(interactive.encodings[0].runtime, RuntimeEnvironment::Html5);
    }

    #[test]
    fn test_unknown_type_skips() {
        let result = parse(
            r#"<Interactive InteractiveTrackID="IA1">
                <Type>hologram</Type>
                <Encoding><RuntimeEnvironment>html5</RuntimeEnvironment></Encoding>
            </Interactive>"#,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_encoding_is_fatal() {
        let result = parse(
            r#"<Interactive InteractiveTrackID="IA1"><Type>standalone</Type></Interactive>"#,
        );
        assert!(result.is_err());
    }
}
