//! The AppData document root.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use marquee_xml::XmlDocument;

use crate::item::AppDataItem;
use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A fully parsed AppData document, indexed by `AppID` and by the
/// experience each item attaches to.
pub struct AppDataSet {
    items: FxHashMap<String, AppDataItem>,
    by_experience: FxHashMap<String, Vec<String>>,
    by_content: FxHashMap<String, Vec<String>>,
}

impl AppDataSet {
    /// Parse an AppData document from raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let document = XmlDocument::parse(bytes).map_err(Error::Doc)?;
        Self::from_document(&document)
    }

    /// Build a set from an already-parsed document.
    pub fn from_document(document: &XmlDocument) -> Result<Self> {
        let root = document.root();
        if root.tag() != "ManifestAppDataSet" {
            return Err(Error::UnexpectedRoot {
                found: root.tag().to_string(),
            });
        }

        let mut items: FxHashMap<String, AppDataItem> = FxHashMap::default();
        let mut by_experience: FxHashMap<String, Vec<String>> = FxHashMap::default();
        let mut by_content: FxHashMap<String, Vec<String>> = FxHashMap::default();

        for element in root.children_named("ManifestAppData") {
            let item = AppDataItem::from_element(element)?;
            let app_id = item.app_id().to_string();
            if items.contains_key(app_id.as_str()) {
                log::warn!("dropping duplicate app data record '{}'", app_id);
                continue;
            }
            if let Some(experience_id) = &item.linkage().experience_id {
                by_experience
                    .entry(experience_id.clone())
                    .or_default()
                    .push(app_id.clone());
            }
            if let Some(content_id) = &item.linkage().content_id {
                by_content
                    .entry(content_id.clone())
                    .or_default()
                    .push(app_id.clone());
            }
            items.insert(app_id, item);
        }

        // Items attached to the same node display in declared order.
        for ids in by_experience.values_mut().chain(by_content.values_mut()) {
            ids.sort_by_key(|id| items[id.as_str()].linkage().display_order);
        }

        Ok(Self {
            items,
            by_experience,
            by_content,
        })
    }

    /// Look up an item by its `AppID`.
    #[inline]
    pub fn item(&self, app_id: &str) -> Option<&AppDataItem> {
        self.items.get(app_id)
    }

    /// All items, unordered.
    pub fn items(&self) -> impl Iterator<Item = &AppDataItem> {
        self.items.values()
    }

    /// Number of items in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items attached to an experience, sorted by display order.
    pub fn items_for_experience(&self, experience_id: &str) -> Vec<&AppDataItem> {
        self.ids_to_items(self.by_experience.get(experience_id))
    }

    /// Items attached to a metadata record, sorted by display order.
    pub fn items_for_content(&self, content_id: &str) -> Vec<&AppDataItem> {
        self.ids_to_items(self.by_content.get(content_id))
    }

    fn ids_to_items(&self, ids: Option<&Vec<String>>) -> Vec<&AppDataItem> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| self.items.get(id.as_str()))
                .collect()
        })
        .unwrap_or_default()
    }
}

impl std::fmt::Debug for AppDataSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppDataSet")
            .field("items", &self.items.len())
            .field("experiences", &self.by_experience.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_DATA: &str = r#"<ManifestAppDataSet>
        <ManifestAppData AppID="APP_1">
            <NVPair Name="experience_id"><Text>E7</Text></NVPair>
            <NVPair Name="display_order"><Integer>2</Integer></NVPair>
            <NVPair Name="location">
                <Location><Name>Stage 16</Name></Location>
            </NVPair>
        </ManifestAppData>
        <ManifestAppData AppID="APP_2">
            <NVPair Name="type"><Text>PRODUCT</Text></NVPair>
            <NVPair Name="experience_id"><Text>E7</Text></NVPair>
            <NVPair Name="content_id"><Text>md9</Text></NVPair>
            <NVPair Name="display_order"><Integer>1</Integer></NVPair>
            <NVPair Name="external_url"><URL>http://shop.example.com/</URL></NVPair>
        </ManifestAppData>
    </ManifestAppDataSet>"#;

    #[test]
    fn test_lookup_and_indices() {
        let set = AppDataSet::parse(APP_DATA.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.item("APP_1").unwrap().is_location());
        assert!(set.item("APP_2").unwrap().is_product());

        let for_experience = set.items_for_experience("E7");
        assert_eq!(for_experience.len(), 2);
        // sorted by display order: the product (1) before the location (2)
        assert_eq!(for_experience[0].app_id(), "APP_2");
        assert_eq!(for_experience[1].app_id(), "APP_1");

        let for_content = set.items_for_content("md9");
        assert_eq!(for_content.len(), 1);
        assert_eq!(for_content[0].app_id(), "APP_2");
    }

    #[test]
    fn test_wrong_root_element() {
        assert!(matches!(
            AppDataSet::parse(b"<MediaManifest/>"),
            Err(Error::UnexpectedRoot { .. })
        ));
    }
}
