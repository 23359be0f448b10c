//! The suite manager: fetch, parse, cross-link, publish.

use std::sync::Arc;

use parking_lot::RwLock;

use marquee_appdata::AppDataSet;
use marquee_common::Settings;
use marquee_manifest::Manifest;
use marquee_style::StyleSet;

use crate::enrich::{self, ProductApi, TalentApi};
use crate::fetch::{ImageLoader, MediaFetcher};
use crate::source::DocumentSource;
use crate::suite::Suite;
use crate::{Error, Result};

/// Owns the single "current suite" slot and performs loads against it.
///
/// A load is fire-and-forget with one terminal outcome: either a new
/// [`Suite`] is published - atomically replacing the previous one - or a
/// single error is returned and the previous suite, if any, remains
/// current and untouched. Readers holding an `Arc` to the old suite keep a
/// consistent view for as long as they keep the `Arc`.
///
/// The manager is the explicitly-owned handle to the current snapshot;
/// pass it (or the `Arc<Suite>` it returns) to whichever component needs
/// the loaded data.
pub struct SuiteManager {
    settings: Settings,
    fetcher: Option<Arc<dyn MediaFetcher>>,
    image_loader: Option<Arc<dyn ImageLoader>>,
    talent_api: Option<Arc<dyn TalentApi>>,
    product_api: Option<Arc<dyn ProductApi>>,
    current: RwLock<Option<Arc<Suite>>>,
}

impl SuiteManager {
    /// Create a manager with no collaborators configured.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            fetcher: None,
            image_loader: None,
            talent_api: None,
            product_api: None,
            current: RwLock::new(None),
        }
    }

    /// Configure the fetch collaborator for remote sources.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn MediaFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Configure the image loader used by location enrichment.
    pub fn with_image_loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.image_loader = Some(loader);
        self
    }

    /// Configure the talent API used by talent enrichment.
    pub fn with_talent_api(mut self, api: Arc<dyn TalentApi>) -> Self {
        self.talent_api = Some(api);
        self
    }

    /// Configure the product API collaborator.
    pub fn with_product_api(mut self, api: Arc<dyn ProductApi>) -> Self {
        self.product_api = Some(api);
        self
    }

    /// The configured product API, for presentation-layer shopping calls.
    pub fn product_api(&self) -> Option<&Arc<dyn ProductApi>> {
        self.product_api.as_ref()
    }

    /// The currently published suite, if any load has succeeded.
    pub fn current(&self) -> Option<Arc<Suite>> {
        self.current.read().clone()
    }

    /// Load a suite from up to three document sources. Only the manifest
    /// is mandatory; omitting app data or style entirely is a normal
    /// success path.
    ///
    /// All configured documents are fetched before any parsing starts;
    /// the manifest parses (including post-processing) before app data and
    /// style, whose records resolve IDs that only exist afterwards. Any
    /// fatal error anywhere aborts the whole operation with nothing
    /// published.
    pub fn load(
        &self,
        manifest: DocumentSource,
        app_data: Option<DocumentSource>,
        style: Option<DocumentSource>,
    ) -> Result<Arc<Suite>> {
        // Fetch phase: the three fetches are independent.
        let (manifest_bytes, (app_data_bytes, style_bytes)) = rayon::join(
            || self.resolve_source(manifest),
            || {
                rayon::join(
                    || app_data.map(|s| self.resolve_source(s)).transpose(),
                    || style.map(|s| self.resolve_source(s)).transpose(),
                )
            },
        );
        let manifest_bytes = manifest_bytes?;
        let app_data_bytes = app_data_bytes?;
        let style_bytes = style_bytes?;

        // Parse phase: manifest first, then the companion documents.
        let manifest = Manifest::parse(&manifest_bytes, &self.settings.region)?;
        let (app_data, style) = rayon::join(
            || {
                app_data_bytes
                    .as_deref()
                    .map(AppDataSet::parse)
                    .transpose()
            },
            || style_bytes.as_deref().map(StyleSet::parse).transpose(),
        );
        let suite = Arc::new(Suite::link(
            manifest,
            app_data?,
            style?,
            self.settings.clone(),
        ));

        // Single atomic publish; no reader ever sees a partial suite.
        *self.current.write() = Some(Arc::clone(&suite));
        log::info!("published suite: {:?}", suite);

        self.spawn_enrichment(&suite);

        Ok(suite)
    }

    fn resolve_source(&self, source: DocumentSource) -> Result<Vec<u8>> {
        match source {
            DocumentSource::Bytes(bytes) => Ok(bytes),
            DocumentSource::File(path) => Ok(std::fs::read(path)?),
            DocumentSource::Remote(address) => {
                let fetcher = self
                    .fetcher
                    .as_ref()
                    .ok_or_else(|| Error::NoFetcher(address.to_string()))?;
                fetcher.fetch(&address).map_err(|e| Error::Fetch {
                    address: address.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Kick off the detached enrichment passes. They run arbitrarily past
    /// this load's completion and can only ever add to the suite's
    /// enrichment store.
    fn spawn_enrichment(&self, suite: &Arc<Suite>) {
        if let Some(api) = &self.talent_api {
            let suite = Arc::clone(suite);
            let api = Arc::clone(api);
            std::thread::spawn(move || enrich::run_talent_enrichment(&suite, api.as_ref()));
        }
        if let Some(loader) = &self.image_loader {
            let suite = Arc::clone(suite);
            let loader = Arc::clone(loader);
            std::thread::spawn(move || enrich::run_location_enrichment(&suite, loader.as_ref()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<MediaManifest>
        <Experiences>
            <Experience ExperienceID="E1">
                <Audiovisual><Type>Main</Type></Audiovisual>
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

    const APP_DATA: &str = r#"<ManifestAppDataSet>
        <ManifestAppData AppID="APP_1">
            <NVPair Name="experience_id"><Text>E2</Text></NVPair>
            <NVPair Name="location">
                <Location><Name>Stage 16</Name></Location>
            </NVPair>
        </ManifestAppData>
    </ManifestAppDataSet>"#;

    fn bytes(text: &str) -> DocumentSource {
        DocumentSource::Bytes(text.as_bytes().to_vec())
    }

    #[test]
    fn test_manifest_only_load_succeeds() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let suite = manager.load(bytes(MANIFEST), None, None).unwrap();
        assert_eq!(suite.manifest().main_experience().id, "E1");
        assert!(suite.app_data().is_none());
        assert!(suite.style().is_none());
        assert!(manager.current().is_some());
    }

    #[test]
    fn test_load_with_app_data() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let suite = manager
            .load(bytes(MANIFEST), Some(bytes(APP_DATA)), None)
            .unwrap();
        let items = suite.items_for_experience("E2");
        assert_eq!(items.len(), 1);
        assert!(items[0].is_location());
    }

    #[test]
    fn test_out_and_in_movie_convention() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let suite = manager.load(bytes(MANIFEST), None, None).unwrap();
        assert_eq!(suite.manifest().out_of_movie_experience().id, "E2");
        assert_eq!(suite.manifest().in_movie_experience().id, "E3");
    }

    #[test]
    fn test_failed_load_keeps_previous_suite_current() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let first = manager.load(bytes(MANIFEST), None, None).unwrap();

        let error = manager.load(bytes("<MediaManifest/>"), None, None);
        assert!(error.is_err());

        let current = manager.current().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
    }

    #[test]
    fn test_atomic_replacement_preserves_old_readers() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let old = manager.load(bytes(MANIFEST), None, None).unwrap();

        let replacement = MANIFEST.replace("ExperienceID=\"E3\"", "ExperienceID=\"E3X\"")
            .replace("<ExperienceID>E3</ExperienceID>", "<ExperienceID>E3X</ExperienceID>");
        let new = manager.load(bytes(&replacement), None, None).unwrap();

        // the old snapshot stays fully consistent for its holders
        assert_eq!(old.manifest().in_movie_experience().id, "E3");
        assert_eq!(new.manifest().in_movie_experience().id, "E3X");
        assert!(Arc::ptr_eq(&manager.current().unwrap(), &new));
    }

    #[test]
    fn test_broken_app_data_aborts_whole_load() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let result = manager.load(
            bytes(MANIFEST),
            Some(bytes("<ManifestAppDataSet><ManifestAppData/></ManifestAppDataSet>")),
            None,
        );
        assert!(matches!(result, Err(Error::AppData(_))));
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_remote_without_fetcher_fails() {
        let manager = SuiteManager::new(Settings::for_region("US"));
        let url = url::Url::parse("http://cdn.example.com/manifest.xml").unwrap();
        let result = manager.load(DocumentSource::Remote(url), None, None);
        assert!(matches!(result, Err(Error::NoFetcher(_))));
    }
}
