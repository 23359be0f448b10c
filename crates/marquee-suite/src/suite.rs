//! The Suite: one fully-linked, immutable snapshot of the three documents.

use marquee_appdata::{AppDataItem, AppDataSet, LocationItem, ProductItem};
use marquee_common::{ContentIdentifier, Settings};
use marquee_manifest::inventory::Person;
use marquee_manifest::{
    AppGroup, Experience, Manifest, Picture, Presentation, TimedEvent, TimedEventTarget,
};
use marquee_style::{DeviceClass, NodeStyle, Orientation, StyleSet, Theme};
use url::Url;

use crate::enrich::EnrichmentStore;

/// Kinds an experience can present as, including the AppData-derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceKind {
    AudioVisual,
    Gallery,
    App,
    Location,
    Product,
}

/// What a timed event's payload resolves to within a suite.
#[derive(Debug)]
pub enum ResolvedTarget<'a> {
    Presentation(&'a Presentation),
    Picture(&'a Picture),
    /// The experience owning the referenced gallery.
    Gallery(&'a Experience),
    AppGroup(&'a AppGroup),
    /// A single string resolved out of a text group.
    Text(&'a str),
    /// A product identified in an external product API namespace.
    Product(&'a ContentIdentifier),
    /// An AppData location item, routed by the AppData namespace.
    Location(&'a LocationItem),
    /// An AppData product item, routed by the AppData namespace.
    AppDataProduct(&'a ProductItem),
    /// A person, routed by the talent API namespace.
    Person(&'a Person),
    /// Nothing in this suite matches the payload reference.
    Unresolved,
}

/// The root of one load's snapshot: one Manifest (required), at most one
/// AppData set, at most one Style set, and the cross-document resolution
/// logic that ties them together.
///
/// A suite is immutable after construction except for its eventually-
/// consistent [`EnrichmentStore`]. Entities inside it hold identifier
/// strings, never references, and resolve each other through the suite's
/// O(1) indices.
pub struct Suite {
    settings: Settings,
    manifest: Manifest,
    app_data: Option<AppDataSet>,
    style: Option<StyleSet>,
    enrichment: EnrichmentStore,
}

impl Suite {
    pub(crate) fn link(
        manifest: Manifest,
        app_data: Option<AppDataSet>,
        style: Option<StyleSet>,
        settings: Settings,
    ) -> Self {
        Self {
            settings,
            manifest,
            app_data,
            style,
            enrichment: EnrichmentStore::default(),
        }
    }

    /// The settings this suite was loaded under.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The manifest document.
    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The app data document, when one was loaded.
    #[inline]
    pub fn app_data(&self) -> Option<&AppDataSet> {
        self.app_data.as_ref()
    }

    /// The style document, when one was loaded.
    #[inline]
    pub fn style(&self) -> Option<&StyleSet> {
        self.style.as_ref()
    }

    /// The eventually-consistent enrichment results.
    #[inline]
    pub fn enrichment(&self) -> &EnrichmentStore {
        &self.enrichment
    }

    // AppData cross-linking

    /// An app data item by `AppID`.
    pub fn app_data_item(&self, app_id: &str) -> Option<&AppDataItem> {
        self.app_data.as_ref()?.item(app_id)
    }

    /// App data items attached to an experience, in display order.
    pub fn items_for_experience(&self, experience_id: &str) -> Vec<&AppDataItem> {
        self.app_data
            .as_ref()
            .map(|a| a.items_for_experience(experience_id))
            .unwrap_or_default()
    }

    /// App data items attached to a metadata record, in display order.
    pub fn items_for_content(&self, content_id: &str) -> Vec<&AppDataItem> {
        self.app_data
            .as_ref()
            .map(|a| a.items_for_content(content_id))
            .unwrap_or_default()
    }

    // Experience kind queries

    /// Whether an experience presents as the given kind. Location and
    /// product checks inherit from the first child experience when the
    /// node has no direct AppData linkage.
    pub fn experience_is(&self, experience: &Experience, kind: ExperienceKind) -> bool {
        match kind {
            ExperienceKind::AudioVisual => experience.audiovisual.is_some(),
            ExperienceKind::Gallery => experience.gallery.is_some(),
            ExperienceKind::App => experience.app.is_some(),
            ExperienceKind::Location => self.linked_kind(experience, AppDataItem::is_location, 0),
            ExperienceKind::Product => self.linked_kind(experience, AppDataItem::is_product, 0),
        }
    }

    fn linked_kind(
        &self,
        experience: &Experience,
        predicate: fn(&AppDataItem) -> bool,
        depth: usize,
    ) -> bool {
        if depth > MAX_TREE_DEPTH {
            return false;
        }
        let items = self.items_for_experience(&experience.id);
        if !items.is_empty() {
            return items.into_iter().any(predicate);
        }
        match self.manifest.children_of(experience).first() {
            Some(child) => self.linked_kind(child, predicate, depth + 1),
            None => false,
        }
    }

    // Thumbnail resolution

    /// An experience's thumbnail, via the fallback chain: own metadata
    /// artwork, then (for non-root experiences) gallery, location, product
    /// imagery, and finally the first child experience's thumbnail.
    pub fn experience_thumbnail_url(
        &self,
        experience: &Experience,
        language: &str,
    ) -> Option<Url> {
        self.thumbnail_inner(experience, language, 0)
    }

    fn thumbnail_inner(
        &self,
        experience: &Experience,
        language: &str,
        depth: usize,
    ) -> Option<Url> {
        if depth > MAX_TREE_DEPTH {
            return None;
        }

        if let Some(url) = self.manifest.experience_art_url(experience, language) {
            return Some(url.clone());
        }
        if self.manifest.is_root_experience(&experience.id) {
            return None;
        }

        if let Some(gallery) = &experience.gallery {
            if let Some(url) = self
                .manifest
                .picture_group(&gallery.picture_group_id)
                .and_then(|group| group.pictures.first())
                .and_then(|picture| picture.thumbnail_url(&self.manifest))
            {
                return Some(url.clone());
            }
        }

        for item in self.items_for_experience(&experience.id) {
            if let Some(url) = item.image_url() {
                return Some(url.clone());
            }
        }

        self.manifest
            .children_of(experience)
            .first()
            .and_then(|child| self.thumbnail_inner(child, language, depth + 1))
    }

    // Timed event resolution

    /// Resolve a timed event's payload against this suite. Identifier
    /// references that resolve to nothing yield [`ResolvedTarget::Unresolved`]
    /// rather than an error.
    pub fn resolve_timed_event<'a>(&'a self, event: &'a TimedEvent) -> ResolvedTarget<'a> {
        match &event.target {
            TimedEventTarget::Presentation(id) => self
                .manifest
                .presentation(id)
                .map(ResolvedTarget::Presentation)
                .unwrap_or(ResolvedTarget::Unresolved),
            TimedEventTarget::Picture(id) => self
                .manifest
                .picture(id)
                .map(ResolvedTarget::Picture)
                .unwrap_or(ResolvedTarget::Unresolved),
            TimedEventTarget::Gallery(id) => self
                .manifest
                .gallery_owner(id)
                .map(ResolvedTarget::Gallery)
                .unwrap_or(ResolvedTarget::Unresolved),
            TimedEventTarget::AppGroup(id) => self
                .manifest
                .app_group(id)
                .map(ResolvedTarget::AppGroup)
                .unwrap_or(ResolvedTarget::Unresolved),
            TimedEventTarget::TextItem {
                text_group_id,
                index,
            } => self
                .manifest
                .text_group(text_group_id)
                .and_then(|group| group.first_text_object(&self.manifest))
                .and_then(|text| text.text(*index))
                .map(ResolvedTarget::Text)
                .unwrap_or(ResolvedTarget::Unresolved),
            TimedEventTarget::Product(id) => ResolvedTarget::Product(id),
            TimedEventTarget::Other(id) => self.resolve_other(id),
        }
    }

    /// An `OtherID` routes by namespace: the AppData namespace denotes a
    /// location/product item, a declared talent API namespace a person.
    fn resolve_other<'a>(&'a self, id: &'a ContentIdentifier) -> ResolvedTarget<'a> {
        if id.is_app_data() {
            return match self.app_data_item(&id.identifier) {
                Some(AppDataItem::Location(location)) => ResolvedTarget::Location(location),
                Some(AppDataItem::Product(product)) => ResolvedTarget::AppDataProduct(product),
                None => ResolvedTarget::Unresolved,
            };
        }

        if self.settings.talent_api_namespace.as_deref() == Some(id.namespace.as_str()) {
            if let Some(person) = self.person_for_identifier(id) {
                return ResolvedTarget::Person(person);
            }
        }

        ResolvedTarget::Unresolved
    }

    /// Find the person carrying an identifier, across every metadata
    /// record in the manifest.
    pub fn person_for_identifier(&self, id: &ContentIdentifier) -> Option<&Person> {
        self.manifest
            .metadatas()
            .find_map(|m| m.person_with_identifier(&id.namespace, &id.identifier))
    }

    // Style resolution

    /// The node style for an experience in a concrete orientation/device
    /// context, when a style document is loaded.
    pub fn node_style_for(
        &self,
        experience_id: &str,
        orientation: Orientation,
        device: DeviceClass,
    ) -> Option<&NodeStyle> {
        self.style
            .as_ref()?
            .style_for(experience_id, orientation, device)
    }

    /// The theme backing an experience's resolved node style.
    pub fn theme_for(
        &self,
        experience_id: &str,
        orientation: Orientation,
        device: DeviceClass,
    ) -> Option<&Theme> {
        let style_set = self.style.as_ref()?;
        let node_style = style_set.style_for(experience_id, orientation, device)?;
        style_set.theme_for_style(node_style)
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("manifest", &self.manifest)
            .field("app_data", &self.app_data)
            .field("style", &self.style)
            .finish()
    }
}

/// Bound on first-child recursion; manifests are trees in practice but
/// nothing in the schema forbids a reference cycle.
const MAX_TREE_DEPTH: usize = 32;
