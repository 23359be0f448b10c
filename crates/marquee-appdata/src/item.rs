//! AppData records: name/value-pair bags dispatched to typed items.

use marquee_xml::XmlElement;
use url::Url;

use crate::Result;

/// A monetary amount with its currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    /// ISO 4217 code from the `currency` attribute, defaulting to `"USD"`.
    pub currency: String,
}

/// A pin-point overlay coordinate, relative to its reference image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullseye {
    pub x: f64,
    pub y: f64,
}

/// Fields shared by both item variants.
#[derive(Debug, Clone, Default)]
pub struct ItemLinkage {
    /// Experience this item attaches to.
    pub experience_id: Option<String>,
    /// Metadata this item attaches to.
    pub content_id: Option<String>,
    /// Metadata of the containing title, for nested items.
    pub parent_content_id: Option<String>,
    pub display_order: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A filming-location item.
#[derive(Debug, Clone, Default)]
pub struct LocationItem {
    pub app_id: String,
    pub linkage: ItemLinkage,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub icon_url: Option<Url>,
    pub zoom: Option<u32>,
    pub zoom_locked: bool,
}

/// A shoppable-product item.
#[derive(Debug, Clone, Default)]
pub struct ProductItem {
    pub app_id: String,
    pub linkage: ItemLinkage,
    pub external_url: Option<Url>,
    pub price: Option<Price>,
    pub exact_match: bool,
    pub product_image_url: Option<Url>,
    pub scene_image_url: Option<Url>,
    pub product_bullseye: Option<Bullseye>,
    pub scene_bullseye: Option<Bullseye>,
}

impl ProductItem {
    /// The overlay coordinate to render, preferring the scene-image pair
    /// over the product-image pair when both are declared.
    pub fn bullseye(&self) -> Option<Bullseye> {
        self.scene_bullseye.or(self.product_bullseye)
    }

    /// The image the preferred bullseye is relative to.
    pub fn bullseye_image_url(&self) -> Option<&Url> {
        if self.scene_bullseye.is_some() {
            self.scene_image_url.as_ref()
        } else {
            self.product_image_url.as_ref()
        }
    }
}

/// One AppData record, dispatched on its `type` pair.
#[derive(Debug, Clone)]
pub enum AppDataItem {
    Location(LocationItem),
    Product(ProductItem),
}

impl AppDataItem {
    /// Construct from a `<ManifestAppData>` element.
    ///
    /// The whole pair list is scanned for the `type` discriminator before
    /// any field parsing, because the schema does not require it to be the
    /// first pair. A pair named `type` carrying the literal `"PRODUCT"`
    /// selects the Product variant; everything else is a Location.
    /// Unrecognized pair names are skipped.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let app_id = element.require_attr("AppID")?.to_string();

        let is_product = element
            .children_named("NVPair")
            .any(|pair| pair.attr("Name") == Some("type") && pair_text(pair) == Some("PRODUCT"));

        if is_product {
            Ok(Self::Product(ProductItem::parse(element, app_id)))
        } else {
            Ok(Self::Location(LocationItem::parse(element, app_id)))
        }
    }

    /// The record's `AppID`.
    pub fn app_id(&self) -> &str {
        match self {
            Self::Location(l) => &l.app_id,
            Self::Product(p) => &p.app_id,
        }
    }

    /// The shared cross-linking fields.
    pub fn linkage(&self) -> &ItemLinkage {
        match self {
            Self::Location(l) => &l.linkage,
            Self::Product(p) => &p.linkage,
        }
    }

    /// A representative image for the item: the location icon, or the
    /// product's scene image falling back to its product image.
    pub fn image_url(&self) -> Option<&Url> {
        match self {
            Self::Location(l) => l.icon_url.as_ref(),
            Self::Product(p) => p.scene_image_url.as_ref().or(p.product_image_url.as_ref()),
        }
    }

    #[inline]
    pub fn is_location(&self) -> bool {
        matches!(self, Self::Location(_))
    }

    #[inline]
    pub fn is_product(&self) -> bool {
        matches!(self, Self::Product(_))
    }
}

impl ItemLinkage {
    fn apply(&mut self, name: &str, pair: &XmlElement) -> bool {
        match name {
            "experience_id" => self.experience_id = pair_text(pair).map(str::to_string),
            "content_id" => self.content_id = pair_text(pair).map(str::to_string),
            "parent_content_id" => {
                self.parent_content_id = pair_text(pair).map(str::to_string)
            }
            "display_order" => self.display_order = pair_int(pair).unwrap_or(0),
            "title" => self.title = pair_text(pair).map(str::to_string),
            "description" => self.description = pair_text(pair).map(str::to_string),
            _ => return false,
        }
        true
    }
}

impl LocationItem {
    fn parse(element: &XmlElement, app_id: String) -> Self {
        let mut item = Self {
            app_id,
            ..Self::default()
        };

        for pair in element.children_named("NVPair") {
            let Some(name) = pair.attr("Name") else {
                continue;
            };
            if item.linkage.apply(name, pair) {
                continue;
            }
            match name {
                "location" => {
                    if let Some(location) = pair.child("Location") {
                        item.name = location.child_str("Name").map(str::to_string);
                        item.address = location.child_str("Address").map(str::to_string);
                        if let Some(coordinate) = location.child("EarthCoordinate") {
                            item.latitude = coordinate.child_f64("Latitude");
                            item.longitude = coordinate.child_f64("Longitude");
                        }
                        item.icon_url = location.child_url("Icon");
                    }
                }
                "zoom" => item.zoom = pair_int(pair).and_then(|z| u32::try_from(z).ok()),
                "zoom_locked" => item.zoom_locked = pair_bool(pair),
                "type" => {}
                _ => {} // unrecognized pair names are forward-compatible
            }
        }

        item
    }
}

impl ProductItem {
    fn parse(element: &XmlElement, app_id: String) -> Self {
        let mut item = Self {
            app_id,
            ..Self::default()
        };
        let mut product_x = None;
        let mut product_y = None;
        let mut scene_x = None;
        let mut scene_y = None;

        for pair in element.children_named("NVPair") {
            let Some(name) = pair.attr("Name") else {
                continue;
            };
            if item.linkage.apply(name, pair) {
                continue;
            }
            match name {
                "external_url" => item.external_url = pair_url(pair),
                "price" => {
                    if let Some(money) = pair.child("Money") {
                        if let Ok(amount) = money.text().parse() {
                            item.price = Some(Price {
                                amount,
                                currency: money.attr("currency").unwrap_or("USD").to_string(),
                            });
                        }
                    }
                }
                "exact_match" => item.exact_match = pair_bool(pair),
                "product_image" => item.product_image_url = pair_url(pair),
                "scene_image" => item.scene_image_url = pair_url(pair),
                "bullseye_x" => product_x = pair_decimal(pair),
                "bullseye_y" => product_y = pair_decimal(pair),
                "scene_bullseye_x" => scene_x = pair_decimal(pair),
                "scene_bullseye_y" => scene_y = pair_decimal(pair),
                "type" => {}
                _ => {} // unrecognized pair names are forward-compatible
            }
        }

        if let (Some(x), Some(y)) = (product_x, product_y) {
            item.product_bullseye = Some(Bullseye { x, y });
        }
        if let (Some(x), Some(y)) = (scene_x, scene_y) {
            item.scene_bullseye = Some(Bullseye { x, y });
        }

        item
    }
}

// Pair value extraction: each pair carries exactly one typed value child.

fn pair_text(pair: &XmlElement) -> Option<&str> {
    pair.child_str("Text")
}

fn pair_int(pair: &XmlElement) -> Option<i64> {
    pair.child_i64("Integer")
}

fn pair_decimal(pair: &XmlElement) -> Option<f64> {
    pair.child_f64("Decimal")
}

fn pair_url(pair: &XmlElement) -> Option<Url> {
    pair.child_url("URL")
}

fn pair_bool(pair: &XmlElement) -> bool {
    pair.child_bool("Text").unwrap_or(false)
}
