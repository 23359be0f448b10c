//! Text object inventory entity.

use std::collections::BTreeMap;

use marquee_xml::XmlElement;

use crate::Result;

/// A list of indexed strings from the `<Inventory>` section.
///
/// Strings are keyed by a 1-based index. An explicit `index` attribute on a
/// `<TextString>` overrides positional counting and resets it, so later
/// unindexed strings continue from the override.
#[derive(Debug, Clone)]
pub struct TextObject {
    pub id: String,
    pub language: Option<String>,
    strings: BTreeMap<usize, String>,
}

impl TextObject {
    /// Construct from a `<TextObject>` element.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("TextObjectID")?.to_string();
        let language = element.attr("language").map(str::to_string);

        let mut strings = BTreeMap::new();
        let mut counter = 0usize;
        for text_string in element.children_named("TextString") {
            match text_string.attr("index").and_then(|i| i.parse().ok()) {
                Some(index) => counter = index,
                None => counter += 1,
            }
            strings.insert(counter, text_string.text().to_string());
        }

        Ok(Self {
            id,
            language,
            strings,
        })
    }

    /// Look up a string by its 1-based index.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.strings.get(&index).map(String::as_str)
    }

    /// Iterate over `(index, string)` pairs in index order.
    pub fn strings(&self) -> impl Iterator<Item = (usize, &str)> {
        self.strings.iter().map(|(i, s)| (*i, s.as_str()))
    }

    /// Number of stored strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the object holds no strings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
