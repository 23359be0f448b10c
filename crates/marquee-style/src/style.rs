//! Node styles, themes, and the experience style map.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use marquee_xml::{XmlDocument, XmlElement};
use url::Url;

use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Screen orientation a style map entry targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("landscape") {
            Some(Self::Landscape)
        } else if value.eq_ignore_ascii_case("portrait") {
            Some(Self::Portrait)
        } else {
            None
        }
    }
}

/// Device class a style map entry targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Tablet,
    Phone,
}

impl DeviceClass {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("tablet") {
            Some(Self::Tablet)
        } else if value.eq_ignore_ascii_case("phone") {
            Some(Self::Phone)
        } else {
            None
        }
    }
}

/// How background media scales to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    #[default]
    BestFit,
    Full,
    Tiled,
}

impl ScaleMethod {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("full") {
            Self::Full
        } else if value.eq_ignore_ascii_case("tiled") {
            Self::Tiled
        } else {
            Self::BestFit
        }
    }
}

/// How background media anchors to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositioningMethod {
    #[default]
    Centered,
    UpperLeft,
    LowerRight,
}

impl PositioningMethod {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("upperleft") {
            Self::UpperLeft
        } else if value.eq_ignore_ascii_case("lowerright") {
            Self::LowerRight
        } else {
            Self::Centered
        }
    }
}

/// Scaling/anchoring configuration for background media.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundAdaptation {
    pub scale: ScaleMethod,
    pub positioning: PositioningMethod,
}

/// A rectangular overlay region within a background.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayArea {
    pub width: u32,
    pub height: u32,
    pub pixels_from_left: u32,
    pub pixels_from_bottom: u32,
}

impl OverlayArea {
    fn from_element(element: &XmlElement) -> Self {
        Self {
            width: element.child_u32("WidthPixels").unwrap_or(0),
            height: element.child_u32("HeightPixels").unwrap_or(0),
            pixels_from_left: element.child_u32("PixelsFromLeft").unwrap_or(0),
            pixels_from_bottom: element.child_u32("PixelsFromBottom").unwrap_or(0),
        }
    }
}

/// Background media and layout of a node style.
#[derive(Debug, Clone, Default)]
pub struct Background {
    /// Hex color string (e.g. `"#1a1a2e"`).
    pub color: Option<String>,
    pub adaptation: BackgroundAdaptation,
    /// Looped background video presentation reference.
    pub video_presentation_id: Option<String>,
    pub video_loops: bool,
    /// Still background image picture reference.
    pub picture_id: Option<String>,
    /// Background audio loop track reference.
    pub audio_track_id: Option<String>,
    /// Title-treatment overlay region, from `<Overlay tag="title">`.
    pub title_overlay: Option<OverlayArea>,
    /// Button-row overlay region, from `<Overlay tag="buttons">`.
    pub button_overlay: Option<OverlayArea>,
}

impl Background {
    /// Overlay elements dispatch on their `tag` attribute; known tags map
    /// to typed fields and unknown tags are skipped.
    fn from_element(element: &XmlElement) -> Self {
        let mut background = Self {
            color: element.child_str("Color").map(str::to_string),
            ..Self::default()
        };

        if let Some(adaptation) = element.child("Adaptation") {
            background.adaptation = BackgroundAdaptation {
                scale: adaptation
                    .attr("scaleMethod")
                    .map(ScaleMethod::parse)
                    .unwrap_or_default(),
                positioning: adaptation
                    .attr("positioningMethod")
                    .map(PositioningMethod::parse)
                    .unwrap_or_default(),
            };
        }

        if let Some(video) = element.child("Video") {
            background.video_presentation_id =
                video.child_str("PresentationID").map(str::to_string);
            background.video_loops = video.attr_bool("loop").unwrap_or(false);
        }
        if let Some(image) = element.child("Image") {
            background.picture_id = image.child_str("PictureID").map(str::to_string);
        }
        if let Some(audio) = element.child("AudioLoop") {
            background.audio_track_id = audio.child_str("AudioTrackID").map(str::to_string);
        }

        for overlay in element.children_named("Overlay") {
            match overlay.attr("tag") {
                Some("title") => background.title_overlay = Some(OverlayArea::from_element(overlay)),
                Some("buttons") => {
                    background.button_overlay = Some(OverlayArea::from_element(overlay))
                }
                Some(tag) => log::debug!("ignoring overlay with unknown tag '{}'", tag),
                None => {}
            }
        }

        background
    }
}

/// A themed UI background/overlay configuration.
///
/// The `supports_*` flags are not declared on the style; they aggregate
/// over every style map entry referencing it and freeze once the document
/// finishes parsing.
#[derive(Debug, Clone)]
pub struct NodeStyle {
    pub id: String,
    pub theme_id: Option<String>,
    pub background: Background,
    pub supports_landscape: bool,
    pub supports_portrait: bool,
    pub supports_tablet: bool,
    pub supports_phone: bool,
}

impl NodeStyle {
    fn from_element(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: element.require_attr("NodeStyleID")?.to_string(),
            theme_id: element.child_str("ThemeID").map(str::to_string),
            background: element
                .child("Background")
                .map(Background::from_element)
                .unwrap_or_default(),
            supports_landscape: false,
            supports_portrait: false,
            supports_tablet: false,
            supports_phone: false,
        })
    }

    /// Whether the aggregated flags admit this orientation/device pair.
    pub fn supports(&self, orientation: Orientation, device: DeviceClass) -> bool {
        let orientation_ok = match orientation {
            Orientation::Landscape => self.supports_landscape,
            Orientation::Portrait => self.supports_portrait,
        };
        let device_ok = match device {
            DeviceClass::Tablet => self.supports_tablet,
            DeviceClass::Phone => self.supports_phone,
        };
        orientation_ok && device_ok
    }
}

/// Button artwork for one labeled action.
#[derive(Debug, Clone)]
pub struct ButtonImages {
    pub label: String,
    pub base_image_url: Option<Url>,
    pub highlight_image_url: Option<Url>,
}

/// A button image set keyed by label.
#[derive(Debug, Clone)]
pub struct Theme {
    pub id: String,
    buttons: FxHashMap<String, ButtonImages>,
}

impl Theme {
    fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("ThemeID")?.to_string();

        let mut buttons = FxHashMap::default();
        if let Some(set) = element.child("ButtonImageSet") {
            for button in set.children_named("Button") {
                let label = button.require_attr("label")?.to_string();
                buttons.insert(
                    label.clone(),
                    ButtonImages {
                        label,
                        base_image_url: button.child_url("Default"),
                        highlight_image_url: button.child_url("Highlight"),
                    },
                );
            }
        }

        Ok(Self { id, buttons })
    }

    /// Button artwork for a label.
    pub fn button(&self, label: &str) -> Option<&ButtonImages> {
        self.buttons.get(label)
    }

    /// All buttons, unordered.
    pub fn buttons(&self) -> impl Iterator<Item = &ButtonImages> {
        self.buttons.values()
    }
}

/// One `<NodeStyleRef>` inside an experience's style map entry.
#[derive(Debug, Clone)]
pub struct NodeStyleRef {
    pub node_style_id: String,
    pub orientation: Option<Orientation>,
}

/// A fully parsed CPEStyle document.
pub struct StyleSet {
    node_styles: FxHashMap<String, NodeStyle>,
    themes: FxHashMap<String, Theme>,
    experience_map: FxHashMap<String, Vec<NodeStyleRef>>,
}

impl StyleSet {
    /// Parse a style document from raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let document = XmlDocument::parse(bytes).map_err(Error::Doc)?;
        Self::from_document(&document)
    }

    /// Build a style set from an already-parsed document.
    ///
    /// Construction order matters: node styles and themes parse fully
    /// before the style map is walked, because map entries mutate node
    /// style applicability flags.
    pub fn from_document(document: &XmlDocument) -> Result<Self> {
        let root = document.root();
        if root.tag() != "CPEStyleSet" {
            return Err(Error::UnexpectedRoot {
                found: root.tag().to_string(),
            });
        }

        let mut node_styles: FxHashMap<String, NodeStyle> = FxHashMap::default();
        for element in root.children_named("NodeStyle") {
            let style = NodeStyle::from_element(element)?;
            node_styles.insert(style.id.clone(), style);
        }

        let mut themes: FxHashMap<String, Theme> = FxHashMap::default();
        for element in root.children_named("Theme") {
            let theme = Theme::from_element(element)?;
            themes.insert(theme.id.clone(), theme);
        }

        let mut experience_map: FxHashMap<String, Vec<NodeStyleRef>> = FxHashMap::default();
        for entry in root.children_named("ExperienceStyleMap") {
            let experience_id = entry.require_attr("ExperienceID")?.to_string();

            let devices: Vec<DeviceClass> = entry
                .children_named("DeviceClass")
                .filter_map(|d| d.child_str("Class"))
                .filter_map(DeviceClass::parse)
                .collect();

            let mut references = Vec::new();
            for reference in entry.children_named("NodeStyleRef") {
                let node_style_id = reference.require_attr("NodeStyleID")?.to_string();
                let orientation = reference.attr("Orientation").and_then(Orientation::parse);

                match node_styles.get_mut(node_style_id.as_str()) {
                    Some(style) => {
                        match orientation {
                            Some(Orientation::Landscape) => style.supports_landscape = true,
                            Some(Orientation::Portrait) => style.supports_portrait = true,
                            // no declared orientation applies to both
                            None => {
                                style.supports_landscape = true;
                                style.supports_portrait = true;
                            }
                        }
                        if devices.is_empty() {
                            style.supports_tablet = true;
                            style.supports_phone = true;
                        }
                        for device in &devices {
                            match device {
                                DeviceClass::Tablet => style.supports_tablet = true,
                                DeviceClass::Phone => style.supports_phone = true,
                            }
                        }
                    }
                    None => log::warn!(
                        "style map for '{}': unresolved node style '{}'",
                        experience_id,
                        node_style_id
                    ),
                }

                references.push(NodeStyleRef {
                    node_style_id,
                    orientation,
                });
            }

            experience_map
                .entry(experience_id)
                .or_default()
                .extend(references);
        }

        Ok(Self {
            node_styles,
            themes,
            experience_map,
        })
    }

    /// Look up a node style by ID.
    #[inline]
    pub fn node_style(&self, id: &str) -> Option<&NodeStyle> {
        self.node_styles.get(id)
    }

    /// Look up a theme by ID.
    #[inline]
    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    /// The theme a node style references.
    pub fn theme_for_style(&self, style: &NodeStyle) -> Option<&Theme> {
        style.theme_id.as_deref().and_then(|id| self.themes.get(id))
    }

    /// The style map entries declared for an experience.
    pub fn styles_for_experience(&self, experience_id: &str) -> &[NodeStyleRef] {
        self.experience_map
            .get(experience_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolve the node style for an experience in a concrete
    /// orientation/device context.
    pub fn style_for(
        &self,
        experience_id: &str,
        orientation: Orientation,
        device: DeviceClass,
    ) -> Option<&NodeStyle> {
        self.styles_for_experience(experience_id)
            .iter()
            .filter(|r| r.orientation.is_none() || r.orientation == Some(orientation))
            .filter_map(|r| self.node_styles.get(r.node_style_id.as_str()))
            .find(|style| style.supports(orientation, device))
    }
}

impl std::fmt::Debug for StyleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleSet")
            .field("node_styles", &self.node_styles.len())
            .field("themes", &self.themes.len())
            .field("mapped_experiences", &self.experience_map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: &str = r#"<CPEStyleSet>
        <NodeStyle NodeStyleID="NS1">
            <ThemeID>TH1</ThemeID>
            <Background>
                <Color>#1a1a2e</Color>
                <Adaptation scaleMethod="full" positioningMethod="upperleft"/>
                <Video loop="true">
                    <PresentationID>P9</PresentationID>
                </Video>
                <Overlay tag="title">
                    <WidthPixels>400</WidthPixels>
                    <HeightPixels>200</HeightPixels>
                    <PixelsFromLeft>50</PixelsFromLeft>
                    <PixelsFromBottom>30</PixelsFromBottom>
                </Overlay>
                <Overlay tag="hologram">
                    <WidthPixels>1</WidthPixels>
                </Overlay>
            </Background>
        </NodeStyle>
        <NodeStyle NodeStyleID="NS2">
            <Background><Color>#000000</Color></Background>
        </NodeStyle>
        <Theme ThemeID="TH1">
            <ButtonImageSet>
                <Button label="play">
                    <Default>http://cdn.example.com/play.png</Default>
                    <Highlight>http://cdn.example.com/play-hi.png</Highlight>
                </Button>
            </ButtonImageSet>
        </Theme>
        <ExperienceStyleMap ExperienceID="E1">
            <DeviceClass><Class>Tablet</Class></DeviceClass>
            <NodeStyleRef NodeStyleID="NS1" Orientation="Landscape"/>
        </ExperienceStyleMap>
        <ExperienceStyleMap ExperienceID="E2">
            <DeviceClass><Class>Phone</Class></DeviceClass>
            <NodeStyleRef NodeStyleID="NS1" Orientation="Portrait"/>
        </ExperienceStyleMap>
    </CPEStyleSet>"#;

    fn parse() -> StyleSet {
        StyleSet::parse(STYLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_applicability_is_union_of_usage() {
        let set = parse();
        let style = set.node_style("NS1").unwrap();
        // referenced landscape/tablet by E1 and portrait/phone by E2
        assert!(style.supports_landscape);
        assert!(style.supports_portrait);
        assert!(style.supports_tablet);
        assert!(style.supports_phone);

        // never referenced by any map entry
        let unused = set.node_style("NS2").unwrap();
        assert!(!unused.supports_landscape);
        assert!(!unused.supports(Orientation::Landscape, DeviceClass::Tablet));
    }

    #[test]
    fn test_background_parsing() {
        let set = parse();
        let background = &set.node_style("NS1").unwrap().background;
        assert_eq!(background.color.as_deref(), Some("#1a1a2e"));
        assert_eq!(background.adaptation.scale, ScaleMethod::Full);
        assert_eq!(
            background.adaptation.positioning,
            PositioningMethod::UpperLeft
        );
        assert_eq!(background.video_presentation_id.as_deref(), Some("P9"));
        assert!(background.video_loops);
        let overlay = background.title_overlay.unwrap();
        assert_eq!(overlay.width, 400);
        assert_eq!(overlay.pixels_from_bottom, 30);
        // unknown overlay tag skipped
        assert!(background.button_overlay.is_none());
    }

    #[test]
    fn test_style_resolution() {
        let set = parse();
        let style = set
            .style_for("E1", Orientation::Landscape, DeviceClass::Tablet)
            .unwrap();
        assert_eq!(style.id, "NS1");
        // E1 declared no portrait mapping
        assert!(set
            .style_for("E1", Orientation::Portrait, DeviceClass::Tablet)
            .is_none());
        assert!(set
            .style_for("E9", Orientation::Landscape, DeviceClass::Tablet)
            .is_none());
    }

    #[test]
    fn test_theme_buttons() {
        let set = parse();
        let style = set.node_style("NS1").unwrap();
        let theme = set.theme_for_style(style).unwrap();
        let button = theme.button("play").unwrap();
        assert_eq!(
            button.base_image_url.as_ref().unwrap().as_str(),
            "http://cdn.example.com/play.png"
        );
        assert!(theme.button("pause").is_none());
    }

    #[test]
    fn test_wrong_root_element() {
        assert!(matches!(
            StyleSet::parse(b"<MediaManifest/>"),
            Err(Error::UnexpectedRoot { .. })
        ));
    }
}
