//! Owned XML element tree with typed accessors.
//!
//! Documents are parsed eagerly into an owned tree of [`XmlElement`]
//! values. Element and attribute names are reduced to their local parts
//! (`manifest:Experience` becomes `Experience`) because the three CPE
//! documents mix several namespace prefixes for the same schema.

use quick_xml::events::Event;
use quick_xml::Reader;
use url::Url;

use crate::{Error, Result};

/// Lenient boolean parse preserved for wire compatibility with historical
/// manifest files: case-insensitive `"true"` or `"y"` is true, everything
/// else is false.
pub fn parse_bool_lenient(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("y")
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse a document from raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Self::parse_str(text)
    }

    /// Parse a document from a string.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let mut element = XmlElement::new(local_name(e.name().as_ref()));
                    for attr in e.attributes().flatten() {
                        let key = local_name(attr.key.as_ref());
                        if is_namespace_decl(attr.key.as_ref()) {
                            continue;
                        }
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        element.attributes.push((key, value));
                    }
                    stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    let mut element = XmlElement::new(local_name(e.name().as_ref()));
                    for attr in e.attributes().flatten() {
                        let key = local_name(attr.key.as_ref());
                        if is_namespace_decl(attr.key.as_ref()) {
                            continue;
                        }
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        element.attributes.push((key, value));
                    }
                    attach(element, &mut stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        attach(element, &mut stack, &mut root);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::Malformed(e.to_string()))?;
                        if !text.trim().is_empty() {
                            element.text = text.trim().to_string();
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        if !text.trim().is_empty() {
                            element.text = text.trim().to_string();
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // declarations, comments, processing instructions
                Err(e) => return Err(Error::Malformed(e.to_string())),
            }
        }

        root.map(|root| Self { root }).ok_or(Error::NoRootElement)
    }

    /// The document's root element.
    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

fn attach(element: XmlElement, stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

fn local_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    match name.rfind(':') {
        Some(pos) => name[pos + 1..].to_string(),
        None => name.into_owned(),
    }
}

fn is_namespace_decl(raw: &[u8]) -> bool {
    raw == b"xmlns" || raw.starts_with(b"xmlns:")
}

/// An element in a parsed XML document.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// The element's local tag name.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The element's trimmed text content (empty if none).
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The element's text content, or a structural error if empty.
    pub fn require_text(&self) -> Result<&str> {
        if self.text.is_empty() {
            return Err(Error::MissingValue {
                element: self.tag.clone(),
            });
        }
        Ok(&self.text)
    }

    // Attribute access

    /// Look up an attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Look up a required attribute, failing with `MissingAttribute`.
    pub fn require_attr(&self, name: &str) -> Result<&str> {
        self.attr(name).ok_or_else(|| Error::MissingAttribute {
            element: self.tag.clone(),
            attribute: name.to_string(),
        })
    }

    /// Attribute parsed with the lenient boolean policy; `None` if absent.
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.attr(name).map(parse_bool_lenient)
    }

    /// Attribute parsed as an unsigned integer; `None` if absent or invalid.
    pub fn attr_u32(&self, name: &str) -> Option<u32> {
        self.attr(name).and_then(|v| v.parse().ok())
    }

    /// Attribute parsed as a signed integer; `None` if absent or invalid.
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(|v| v.parse().ok())
    }

    // Child access

    /// Iterate over all child elements in document order.
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter()
    }

    /// Iterate over child elements with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.tag == name)
    }

    /// The first child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == name)
    }

    /// A required child element, failing with `MissingChild`.
    pub fn require_child(&self, name: &str) -> Result<&XmlElement> {
        self.child(name).ok_or_else(|| Error::MissingChild {
            element: self.tag.clone(),
            child: name.to_string(),
        })
    }

    /// Whether a named child is present and non-empty.
    ///
    /// "Non-empty" means the child carries text, attributes, or children of
    /// its own. Used pervasively as a "should I attempt to parse this
    /// optional section" guard before requiring sub-structure.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some_and(|c| {
            !c.text.is_empty() || !c.attributes.is_empty() || !c.children.is_empty()
        })
    }

    // Typed child values

    /// Non-empty text of a named child; `None` if absent or empty.
    pub fn child_str(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Required non-empty text of a required child.
    pub fn require_child_str(&self, name: &str) -> Result<&str> {
        self.require_child(name)?.require_text()
    }

    /// Child text parsed as a signed integer; `None` if absent or invalid.
    pub fn child_i64(&self, name: &str) -> Option<i64> {
        self.child_str(name).and_then(|v| v.parse().ok())
    }

    /// Child text parsed as an unsigned integer; `None` if absent or invalid.
    pub fn child_u32(&self, name: &str) -> Option<u32> {
        self.child_str(name).and_then(|v| v.parse().ok())
    }

    /// Child text parsed as a double; `None` if absent or invalid.
    pub fn child_f64(&self, name: &str) -> Option<f64> {
        self.child_str(name).and_then(|v| v.parse().ok())
    }

    /// Child text parsed with the lenient boolean policy; `None` if absent.
    pub fn child_bool(&self, name: &str) -> Option<bool> {
        self.child_str(name).map(parse_bool_lenient)
    }

    /// Child text parsed as a URL; `None` if absent or invalid.
    pub fn child_url(&self, name: &str) -> Option<Url> {
        self.child_str(name).and_then(|v| Url::parse(v).ok())
    }

    /// Required child text parsed as an unsigned integer, failing with
    /// `UnsupportedValue` when present but unparsable.
    pub fn require_child_u32(&self, name: &str) -> Result<u32> {
        let text = self.require_child_str(name)?;
        text.parse().map_err(|_| Error::UnsupportedValue {
            element: name.to_string(),
            value: text.to_string(),
        })
    }

    /// Required child text parsed as a double, failing with
    /// `UnsupportedValue` when present but unparsable.
    pub fn require_child_f64(&self, name: &str) -> Result<f64> {
        let text = self.require_child_str(name)?;
        text.parse().map_err(|_| Error::UnsupportedValue {
            element: name.to_string(),
            value: text.to_string(),
        })
    }

    /// Required child text parsed as a URL, failing with
    /// `UnsupportedValue` when present but unparsable.
    pub fn require_child_url(&self, name: &str) -> Result<Url> {
        let text = self.require_child_str(name)?;
        Url::parse(text).map_err(|_| Error::UnsupportedValue {
            element: name.to_string(),
            value: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = XmlDocument::parse_str(r#"<Root version="1.0"><Child>hello</Child></Root>"#)
            .unwrap();
        let root = doc.root();
        assert_eq!(root.tag(), "Root");
        assert_eq!(root.attr("version"), Some("1.0"));
        assert_eq!(root.child_str("Child"), Some("hello"));
    }

    #[test]
    fn test_namespace_prefixes_stripped() {
        let doc = XmlDocument::parse_str(
            r#"<manifest:MediaManifest xmlns:manifest="http://example.com/manifest">
                <manifest:Inventory>
                    <md:Audio xmlns:md="http://example.com/md" md:AudioTrackID="A1"/>
                </manifest:Inventory>
            </manifest:MediaManifest>"#,
        )
        .unwrap();

        let root = doc.root();
        assert_eq!(root.tag(), "MediaManifest");
        let audio = root.require_child("Inventory").unwrap().child("Audio").unwrap();
        assert_eq!(audio.attr("AudioTrackID"), Some("A1"));
        // xmlns declarations are discarded
        assert!(audio.attr("md").is_none());
    }

    #[test]
    fn test_bool_leniency() {
        assert!(parse_bool_lenient("true"));
        assert!(parse_bool_lenient("TRUE"));
        assert!(parse_bool_lenient("y"));
        assert!(parse_bool_lenient("Y"));
        assert!(!parse_bool_lenient("false"));
        assert!(!parse_bool_lenient(""));
        assert!(!parse_bool_lenient("no"));
        assert!(!parse_bool_lenient("1"));
    }

    #[test]
    fn test_has_child_requires_non_empty() {
        let doc = XmlDocument::parse_str(
            r#"<Root><Empty></Empty><Text>x</Text><Attr a="1"/><Nested><Inner/></Nested></Root>"#,
        )
        .unwrap();
        let root = doc.root();
        assert!(!root.has_child("Empty"));
        assert!(root.has_child("Text"));
        assert!(root.has_child("Attr"));
        assert!(root.has_child("Nested"));
        assert!(!root.has_child("Absent"));
    }

    #[test]
    fn test_require_errors() {
        let doc = XmlDocument::parse_str(r#"<Root><Empty/></Root>"#).unwrap();
        let root = doc.root();

        assert!(matches!(
            root.require_attr("id"),
            Err(Error::MissingAttribute { .. })
        ));
        assert!(matches!(
            root.require_child("Missing"),
            Err(Error::MissingChild { .. })
        ));
        assert!(matches!(
            root.require_child_str("Empty"),
            Err(Error::MissingValue { .. })
        ));
    }

    #[test]
    fn test_unsupported_value() {
        let doc = XmlDocument::parse_str(r#"<Root><Width>abc</Width></Root>"#).unwrap();
        assert!(matches!(
            doc.root().require_child_u32("Width"),
            Err(Error::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_typed_accessors() {
        let doc = XmlDocument::parse_str(
            r#"<Root>
                <Count>42</Count>
                <Ratio>1.5</Ratio>
                <Flag>Y</Flag>
                <Where>http://example.com/a.jpg</Where>
            </Root>"#,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(root.child_u32("Count"), Some(42));
        assert_eq!(root.child_f64("Ratio"), Some(1.5));
        assert_eq!(root.child_bool("Flag"), Some(true));
        assert_eq!(
            root.child_url("Where").unwrap().as_str(),
            "http://example.com/a.jpg"
        );
    }

    #[test]
    fn test_children_named_order() {
        let doc = XmlDocument::parse_str(
            r#"<Root><Item>1</Item><Other/><Item>2</Item><Item>3</Item></Root>"#,
        )
        .unwrap();
        let texts: Vec<_> = doc
            .root()
            .children_named("Item")
            .map(|c| c.text().to_string())
            .collect();
        assert_eq!(texts, ["1", "2", "3"]);
    }

    #[test]
    fn test_no_root() {
        assert!(matches!(
            XmlDocument::parse_str("  "),
            Err(Error::NoRootElement)
        ));
    }
}
