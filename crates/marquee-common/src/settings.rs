//! Loader configuration surface.
//!
//! Everything the loading pipeline needs from the embedding application is
//! collected here and passed explicitly; there is no global state. The
//! region code drives Experience region filtering, the map provider feeds
//! the derived static-map URL builder, and the API namespaces tell the
//! suite which alternate identifiers belong to the injected talent/product
//! collaborators.

use url::Url;

/// Static-map image provider for location items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapProvider {
    /// Google Static Maps.
    #[default]
    Google,
    /// Apple Maps Snapshots.
    Apple,
}

/// Configuration consumed by the loading pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Current device/user region code (ISO 3166-1 alpha-2, e.g. `"US"`).
    pub region: String,
    /// Selected static-map provider.
    pub map_provider: MapProvider,
    /// API key for the selected map provider, if any.
    pub map_api_key: Option<String>,
    /// Identifier namespace declared by the injected talent API, if any.
    pub talent_api_namespace: Option<String>,
    /// Identifier namespace declared by the injected product API, if any.
    pub product_api_namespace: Option<String>,
}

impl Settings {
    /// Create settings for a region with everything else defaulted.
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            map_provider: MapProvider::default(),
            map_api_key: None,
            talent_api_namespace: None,
            product_api_namespace: None,
        }
    }

    /// Build a static-map image URL for a coordinate using the configured
    /// provider and API key. Returns `None` if the provider URL cannot be
    /// constructed.
    pub fn map_image_url(&self, latitude: f64, longitude: f64, zoom: u32) -> Option<Url> {
        let url = match self.map_provider {
            MapProvider::Google => format!(
                "https://maps.googleapis.com/maps/api/staticmap?center={},{}&zoom={}&size=640x640{}",
                latitude,
                longitude,
                zoom,
                self.map_api_key
                    .as_deref()
                    .map(|k| format!("&key={}", k))
                    .unwrap_or_default()
            ),
            MapProvider::Apple => format!(
                "https://snapshot.apple-mapkit.com/api/v1/snapshot?center={},{}&z={}&size=640x640{}",
                latitude,
                longitude,
                zoom,
                self.map_api_key
                    .as_deref()
                    .map(|k| format!("&teamId={}", k))
                    .unwrap_or_default()
            ),
        };

        Url::parse(&url).ok()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_region("US")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_url_google() {
        let settings = Settings::for_region("US");
        let url = settings.map_image_url(34.05, -118.24, 12).unwrap();
        assert_eq!(url.host_str(), Some("maps.googleapis.com"));
        assert!(url.query().unwrap().contains("center=34.05,-118.24"));
    }

    #[test]
    fn test_map_url_with_key() {
        let mut settings = Settings::for_region("US");
        settings.map_api_key = Some("abc123".into());
        let url = settings.map_image_url(0.0, 0.0, 1).unwrap();
        assert!(url.query().unwrap().contains("key=abc123"));
    }
}
