//! Best-effort enrichment collaborators and their result stores.
//!
//! Enrichment runs detached after a suite becomes current. Failures are
//! swallowed at the collaborator boundary: they can never fail a load that
//! has already been published, and consumers must treat every field here
//! as eventually consistent - possibly absent, possibly arriving after the
//! load's completion has already been observed.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use parking_lot::RwLock;
use rustc_hash::FxHasher;
use url::Url;

use marquee_appdata::AppDataItem;

use crate::fetch::{CollabResult, ImageLoader};
use crate::Suite;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// One image of a talent.
#[derive(Debug, Clone)]
pub struct TalentImage {
    pub thumbnail_url: Option<Url>,
    pub full_url: Option<Url>,
}

/// A talent's social media account.
#[derive(Debug, Clone)]
pub struct TalentSocialAccount {
    pub handle: String,
    pub url: Option<Url>,
}

/// One film credit of a talent.
#[derive(Debug, Clone)]
pub struct TalentFilm {
    pub title: String,
    pub year: Option<u32>,
    pub image_url: Option<Url>,
}

/// Detailed talent information.
#[derive(Debug, Clone, Default)]
pub struct TalentDetails {
    pub biography: Option<String>,
    pub social_accounts: Vec<TalentSocialAccount>,
    pub films: Vec<TalentFilm>,
}

/// Everything known about one talent, keyed by their API identifier.
#[derive(Debug, Clone)]
pub struct TalentRecord {
    pub api_id: String,
    pub name: Option<String>,
    pub images: Vec<TalentImage>,
    pub details: Option<TalentDetails>,
}

impl TalentRecord {
    /// An empty record for an API identifier.
    pub fn new(api_id: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            name: None,
            images: Vec::new(),
            details: None,
        }
    }
}

/// Talent metadata collaborator.
///
/// Identified by a declared namespace matched against the alternate
/// identifiers on Person records.
pub trait TalentApi: Send + Sync {
    fn api_namespace(&self) -> &str;
    fn prefetch_credits(&self) -> CollabResult<Vec<TalentRecord>>;
    fn images(&self, api_id: &str) -> CollabResult<Vec<TalentImage>>;
    fn details(&self, api_id: &str) -> CollabResult<TalentDetails>;
}

/// A product category offered by the shopping collaborator.
#[derive(Debug, Clone)]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
}

/// A shoppable product returned by the shopping collaborator.
#[derive(Debug, Clone)]
pub struct ShopProduct {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub price_display: Option<String>,
    pub external_url: Option<Url>,
    pub image_url: Option<Url>,
    pub exact_match: bool,
}

/// Shopping metadata collaborator.
///
/// Identified by a declared namespace matched against App name lists and
/// timed event product identifiers.
pub trait ProductApi: Send + Sync {
    fn api_namespace(&self) -> &str;
    fn categories(&self) -> CollabResult<Vec<ProductCategory>>;
    fn frame_timestamps(&self) -> CollabResult<Vec<f64>>;
    fn products_at_frame(&self, seconds: f64) -> CollabResult<Vec<ShopProduct>>;
    fn products_in_category(&self, category_id: &str) -> CollabResult<Vec<ShopProduct>>;
    fn product_details(&self, product_id: &str) -> CollabResult<ShopProduct>;
}

/// Eventually-consistent enrichment results attached to a suite.
#[derive(Default)]
pub struct EnrichmentStore {
    talent: RwLock<FxHashMap<String, TalentRecord>>,
    location_icons: RwLock<FxHashMap<String, Vec<u8>>>,
}

impl EnrichmentStore {
    /// The talent record for an API identifier, if enrichment has landed.
    pub fn talent(&self, api_id: &str) -> Option<TalentRecord> {
        self.talent.read().get(api_id).cloned()
    }

    /// Number of talent records currently stored.
    pub fn talent_count(&self) -> usize {
        self.talent.read().len()
    }

    /// The decoded icon for a location item, if enrichment has landed.
    pub fn location_icon(&self, app_id: &str) -> Option<Vec<u8>> {
        self.location_icons.read().get(app_id).cloned()
    }

    pub(crate) fn insert_talent(&self, record: TalentRecord) {
        self.talent.write().insert(record.api_id.clone(), record);
    }

    pub(crate) fn set_talent_images(&self, api_id: &str, images: Vec<TalentImage>) {
        let mut talent = self.talent.write();
        talent
            .entry(api_id.to_string())
            .or_insert_with(|| TalentRecord::new(api_id))
            .images = images;
    }

    pub(crate) fn set_talent_details(&self, api_id: &str, details: TalentDetails) {
        let mut talent = self.talent.write();
        talent
            .entry(api_id.to_string())
            .or_insert_with(|| TalentRecord::new(api_id))
            .details = Some(details);
    }

    pub(crate) fn set_location_icon(&self, app_id: &str, bytes: Vec<u8>) {
        self.location_icons
            .write()
            .insert(app_id.to_string(), bytes);
    }
}

/// Prefetch talent credits, images, and biographies for every person the
/// manifest names in the API's namespace. Best-effort throughout.
pub(crate) fn run_talent_enrichment(suite: &Suite, api: &dyn TalentApi) {
    let namespace = api.api_namespace();

    match api.prefetch_credits() {
        Ok(credits) => {
            for record in credits {
                suite.enrichment().insert_talent(record);
            }
        }
        Err(e) => log::debug!("talent credit prefetch failed: {}", e),
    }

    let mut api_ids: Vec<String> = suite
        .manifest()
        .metadatas()
        .flat_map(|m| m.people.iter())
        .filter_map(|p| p.identifier_in(namespace))
        .map(str::to_string)
        .collect();
    api_ids.sort();
    api_ids.dedup();

    for api_id in api_ids {
        match api.images(&api_id) {
            Ok(images) => suite.enrichment().set_talent_images(&api_id, images),
            Err(e) => log::debug!("talent image fetch failed for '{}': {}", api_id, e),
        }
        match api.details(&api_id) {
            Ok(details) => suite.enrichment().set_talent_details(&api_id, details),
            Err(e) => log::debug!("talent detail fetch failed for '{}': {}", api_id, e),
        }
    }
}

/// Prefetch location icons for every location item carrying an icon URL.
/// Best-effort throughout.
pub(crate) fn run_location_enrichment(suite: &Suite, loader: &dyn ImageLoader) {
    let Some(app_data) = suite.app_data() else {
        return;
    };

    for item in app_data.items() {
        let AppDataItem::Location(location) = item else {
            continue;
        };
        let Some(icon_url) = &location.icon_url else {
            continue;
        };
        match loader.load_image(icon_url) {
            Ok(bytes) => suite.enrichment().set_location_icon(&location.app_id, bytes),
            Err(e) => log::debug!(
                "location icon fetch failed for '{}': {}",
                location.app_id,
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentSource, SuiteManager};
    use marquee_common::Settings;

    struct StubTalentApi;

    impl TalentApi for StubTalentApi {
        fn api_namespace(&self) -> &str {
            "baseline.api"
        }

        fn prefetch_credits(&self) -> CollabResult<Vec<TalentRecord>> {
            Ok(vec![TalentRecord {
                api_id: "4242".into(),
                name: Some("First Billed".into()),
                images: Vec::new(),
                details: None,
            }])
        }

        fn images(&self, _api_id: &str) -> CollabResult<Vec<TalentImage>> {
            Ok(vec![TalentImage {
                thumbnail_url: None,
                full_url: Url::parse("http://talent.example.com/4242.jpg").ok(),
            }])
        }

        fn details(&self, _api_id: &str) -> CollabResult<TalentDetails> {
            Err("details service down".into())
        }
    }

    const MANIFEST: &str = r#"<MediaManifest>
        <Inventory>
            <Metadata ContentID="md1">
                <BasicMetadata>
                    <LocalizedInfo language="en" default="true">
                        <TitleDisplayUnlimited>The Movie</TitleDisplayUnlimited>
                    </LocalizedInfo>
                    <People>
                        <Name><DisplayName>First Billed</DisplayName></Name>
                        <Identifier>
                            <Namespace>baseline.api</Namespace>
                            <Identifier>4242</Identifier>
                        </Identifier>
                    </People>
                </BasicMetadata>
            </Metadata>
        </Inventory>
        <Experiences>
            <Experience ExperienceID="E1">
                <Audiovisual><Type>Main</Type><ContentID>md1</ContentID></Audiovisual>
                <ExperienceChild>
                    <ExperienceID>E2</ExperienceID>
                    <SequenceInfo><Number>1</Number></SequenceInfo>
                </ExperienceChild>
                <ExperienceChild>
                    <ExperienceID>E3</ExperienceID>
                    <SequenceInfo><Number>2</Number></SequenceInfo>
                </ExperienceChild>
            </Experience>
            <Experience ExperienceID="E2"/>
            <Experience ExperienceID="E3"/>
        </Experiences>
    </MediaManifest>"#;

    #[test]
    fn test_talent_enrichment_populates_store() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let suite = manager
            .load(
                DocumentSource::Bytes(MANIFEST.as_bytes().to_vec()),
                None,
                None,
            )
            .unwrap();

        run_talent_enrichment(&suite, &StubTalentApi);

        let record = suite.enrichment().talent("4242").unwrap();
        assert_eq!(record.name.as_deref(), Some("First Billed"));
        assert_eq!(record.images.len(), 1);
        // the failing details call is swallowed; the record survives
        assert!(record.details.is_none());
    }
}
