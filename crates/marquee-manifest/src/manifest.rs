//! The Manifest document root: parsing, post-processing, and lookup.
//!
//! A Manifest owns every inventory and structural entity, keyed by its
//! natural ID. Entities never hold references to each other - they hold
//! identifier strings resolved on demand through these indices, which is
//! what lets forward references (an entity referencing another declared
//! later, or in a different document) work without two-pass construction.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use marquee_xml::XmlDocument;
use url::Url;

use crate::experience::Experience;
use crate::groups::{AppGroup, TextGroup};
use crate::inventory::{Audio, Image, Interactive, Metadata, TextObject, Video};
use crate::picture::{Picture, PictureGroup};
use crate::presentation::{PlayableSequence, Presentation};
use crate::timed_event::{TimedEvent, TimedEventSequence};
use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Locates one flattened timed event: the owning experience, the sequence
/// it came from, and its index within that sequence.
#[derive(Debug, Clone)]
pub struct TimedEventRef {
    pub experience_id: String,
    pub sequence_id: String,
    pub index: usize,
}

/// A fully parsed and post-processed Manifest document.
pub struct Manifest {
    audios: FxHashMap<String, Audio>,
    videos: FxHashMap<String, Video>,
    images: FxHashMap<String, Image>,
    interactives: FxHashMap<String, Interactive>,
    text_objects: FxHashMap<String, TextObject>,
    metadatas: FxHashMap<String, Metadata>,

    presentations: FxHashMap<String, Presentation>,
    playable_sequences: FxHashMap<String, PlayableSequence>,
    picture_groups: FxHashMap<String, PictureGroup>,
    text_groups: FxHashMap<String, TextGroup>,
    app_groups: FxHashMap<String, AppGroup>,
    timed_event_sequences: FxHashMap<String, TimedEventSequence>,

    experiences: FxHashMap<String, Experience>,
    /// Document order of experience IDs, for deterministic discovery.
    experience_order: Vec<String>,

    // Well-known roles discovered by post-processing convention.
    main_experience_id: String,
    out_of_movie_id: String,
    in_movie_id: String,

    // Reverse indices built in one walk after parsing.
    timed_events: Vec<TimedEventRef>,
    galleries: FxHashMap<String, String>,
    presentation_to_av: FxHashMap<String, String>,
    pictures: FxHashMap<String, (String, usize)>,
}

impl Manifest {
    /// Parse a Manifest document from raw bytes, filtering experiences for
    /// the given region code.
    pub fn parse(bytes: &[u8], region: &str) -> Result<Self> {
        let document = XmlDocument::parse(bytes).map_err(Error::Doc)?;
        Self::from_document(&document, region)
    }

    /// Build a Manifest from an already-parsed document.
    pub fn from_document(document: &XmlDocument, region: &str) -> Result<Self> {
        let root = document.root();
        if root.tag() != "MediaManifest" {
            return Err(Error::UnexpectedRoot {
                found: root.tag().to_string(),
            });
        }

        let mut audios = FxHashMap::default();
        let mut videos = FxHashMap::default();
        let mut images = FxHashMap::default();
        let mut interactives = FxHashMap::default();
        let mut text_objects = FxHashMap::default();
        let mut metadatas = FxHashMap::default();

        if let Some(inventory) = root.child("Inventory") {
            for element in inventory.children_named("Audio") {
                if let Some(audio) = Audio::from_element(element)? {
                    audios.insert(audio.id.clone(), audio);
                }
            }
            for element in inventory.children_named("Video") {
                if let Some(video) = Video::from_element(element)? {
                    videos.insert(video.id.clone(), video);
                }
            }
            for element in inventory.children_named("Image") {
                if let Some(image) = Image::from_element(element)? {
                    images.insert(image.id.clone(), image);
                }
            }
            for element in inventory.children_named("Interactive") {
                if let Some(interactive) = Interactive::from_element(element)? {
                    interactives.insert(interactive.id.clone(), interactive);
                }
            }
            for element in inventory.children_named("TextObject") {
                let text_object = TextObject::from_element(element)?;
                text_objects.insert(text_object.id.clone(), text_object);
            }
            for element in inventory.children_named("Metadata") {
                let metadata = Metadata::from_element(element)?;
                metadatas.insert(metadata.id.clone(), metadata);
            }
        }

        let mut presentations = FxHashMap::default();
        if let Some(section) = root.child("Presentations") {
            for element in section.children_named("Presentation") {
                let presentation = Presentation::from_element(element)?;
                presentations.insert(presentation.id.clone(), presentation);
            }
        }

        let mut playable_sequences = FxHashMap::default();
        if let Some(section) = root.child("PlayableSequences") {
            for element in section.children_named("PlayableSequence") {
                let sequence = PlayableSequence::from_element(element)?;
                playable_sequences.insert(sequence.id.clone(), sequence);
            }
        }

        let mut picture_groups = FxHashMap::default();
        if let Some(section) = root.child("PictureGroups") {
            for element in section.children_named("PictureGroup") {
                let group = PictureGroup::from_element(element)?;
                picture_groups.insert(group.id.clone(), group);
            }
        }

        let mut text_groups = FxHashMap::default();
        if let Some(section) = root.child("TextGroups") {
            for element in section.children_named("TextGroup") {
                let group = TextGroup::from_element(element)?;
                text_groups.insert(group.id.clone(), group);
            }
        }

        let mut app_groups = FxHashMap::default();
        if let Some(section) = root.child("AppGroups") {
            for element in section.children_named("AppGroup") {
                let group = AppGroup::from_element(element)?;
                app_groups.insert(group.id.clone(), group);
            }
        }

        let mut timed_event_sequences = FxHashMap::default();
        if let Some(section) = root.child("TimedEventSequences") {
            for element in section.children_named("TimedEventSequence") {
                let sequence = TimedEventSequence::from_element(element)?;
                timed_event_sequences.insert(sequence.id.clone(), sequence);
            }
        }

        let mut experiences: FxHashMap<String, Experience> = FxHashMap::default();
        let mut experience_order = Vec::new();
        let experiences_section = root.require_child("Experiences").map_err(Error::Doc)?;
        for element in experiences_section.children_named("Experience") {
            let Some(experience) = Experience::from_element(element, region)? else {
                continue;
            };
            if experiences.contains_key(&experience.id) {
                log::warn!("dropping duplicate experience '{}'", experience.id);
                continue;
            }
            experience_order.push(experience.id.clone());
            experiences.insert(experience.id.clone(), experience);
        }

        // Post-processing, strict order.

        // 1. Main experience discovery.
        let main_experience_id = experience_order
            .iter()
            .find(|id| experiences[id.as_str()].is_main())
            .cloned()
            .ok_or(Error::MissingMainExperience)?;

        // 2. Supplemental experiences by positional convention: the main
        // experience's first resolving child is the out-of-movie tree, its
        // last the in-movie tree. Nothing else in the schema marks these
        // roles; the convention is load-bearing.
        let supplemental: Vec<String> = experiences[main_experience_id.as_str()]
            .children
            .iter()
            .filter(|c| experiences.contains_key(c.experience_id.as_str()))
            .map(|c| c.experience_id.clone())
            .collect();
        if supplemental.len() != 2 {
            return Err(Error::MissingSupplementalExperiences {
                found: supplemental.len(),
            });
        }
        let out_of_movie_id = supplemental[0].clone();
        let in_movie_id = supplemental[1].clone();

        // 3. One walk over every experience builds the reverse indices.
        let mut timed_events = Vec::new();
        let mut galleries: FxHashMap<String, String> = FxHashMap::default();
        let mut presentation_to_av: FxHashMap<String, String> = FxHashMap::default();
        for experience_id in &experience_order {
            let experience = &experiences[experience_id.as_str()];

            for sequence_id in &experience.timed_sequence_ids {
                match timed_event_sequences.get(sequence_id.as_str()) {
                    Some(sequence) => {
                        for index in 0..sequence.events.len() {
                            timed_events.push(TimedEventRef {
                                experience_id: experience_id.clone(),
                                sequence_id: sequence_id.clone(),
                                index,
                            });
                        }
                    }
                    None => log::warn!(
                        "experience '{}': unresolved timed sequence '{}'",
                        experience_id,
                        sequence_id
                    ),
                }
            }

            if let Some(gallery) = &experience.gallery {
                galleries
                    .entry(gallery.id.clone())
                    .or_insert_with(|| experience_id.clone());
            }

            if let Some(av) = &experience.audiovisual {
                if let Some(presentation_id) = &av.presentation_id {
                    presentation_to_av
                        .entry(presentation_id.clone())
                        .or_insert_with(|| experience_id.clone());
                }
                if let Some(sequence_id) = &av.playable_sequence_id {
                    if let Some(sequence) = playable_sequences.get(sequence_id.as_str()) {
                        for clip in &sequence.clips {
                            presentation_to_av
                                .entry(clip.presentation_id.clone())
                                .or_insert_with(|| experience_id.clone());
                        }
                    }
                }
            }
        }
        timed_events.sort_by(|a, b| {
            let start = |r: &TimedEventRef| {
                timed_event_sequences[r.sequence_id.as_str()].events[r.index].start_seconds
            };
            start(a)
                .partial_cmp(&start(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // 4. Flatten picture groups into a picture-by-ID index.
        let mut pictures: FxHashMap<String, (String, usize)> = FxHashMap::default();
        for (group_id, group) in &picture_groups {
            for (index, picture) in group.pictures.iter().enumerate() {
                pictures
                    .entry(picture.id.clone())
                    .or_insert_with(|| (group_id.clone(), index));
            }
        }

        Ok(Self {
            audios,
            videos,
            images,
            interactives,
            text_objects,
            metadatas,
            presentations,
            playable_sequences,
            picture_groups,
            text_groups,
            app_groups,
            timed_event_sequences,
            experiences,
            experience_order,
            main_experience_id,
            out_of_movie_id,
            in_movie_id,
            timed_events,
            galleries,
            presentation_to_av,
            pictures,
        })
    }

    // Entity lookup

    #[inline]
    pub fn audio(&self, id: &str) -> Option<&Audio> {
        self.audios.get(id)
    }

    #[inline]
    pub fn video(&self, id: &str) -> Option<&Video> {
        self.videos.get(id)
    }

    #[inline]
    pub fn image(&self, id: &str) -> Option<&Image> {
        self.images.get(id)
    }

    #[inline]
    pub fn interactive(&self, id: &str) -> Option<&Interactive> {
        self.interactives.get(id)
    }

    #[inline]
    pub fn text_object(&self, id: &str) -> Option<&TextObject> {
        self.text_objects.get(id)
    }

    #[inline]
    pub fn metadata(&self, id: &str) -> Option<&Metadata> {
        self.metadatas.get(id)
    }

    #[inline]
    pub fn presentation(&self, id: &str) -> Option<&Presentation> {
        self.presentations.get(id)
    }

    #[inline]
    pub fn playable_sequence(&self, id: &str) -> Option<&PlayableSequence> {
        self.playable_sequences.get(id)
    }

    #[inline]
    pub fn picture_group(&self, id: &str) -> Option<&PictureGroup> {
        self.picture_groups.get(id)
    }

    #[inline]
    pub fn text_group(&self, id: &str) -> Option<&TextGroup> {
        self.text_groups.get(id)
    }

    #[inline]
    pub fn app_group(&self, id: &str) -> Option<&AppGroup> {
        self.app_groups.get(id)
    }

    #[inline]
    pub fn timed_event_sequence(&self, id: &str) -> Option<&TimedEventSequence> {
        self.timed_event_sequences.get(id)
    }

    #[inline]
    pub fn experience(&self, id: &str) -> Option<&Experience> {
        self.experiences.get(id)
    }

    /// A flattened picture by ID, from any picture group.
    pub fn picture(&self, id: &str) -> Option<&Picture> {
        let (group_id, index) = self.pictures.get(id)?;
        self.picture_groups
            .get(group_id.as_str())
            .and_then(|g| g.pictures.get(*index))
    }

    // Well-known experiences

    /// The experience whose AudioVisual is marked type "Main".
    pub fn main_experience(&self) -> &Experience {
        &self.experiences[self.main_experience_id.as_str()]
    }

    /// The out-of-movie (bonus menu) experience: by convention the main
    /// experience's first child.
    pub fn out_of_movie_experience(&self) -> &Experience {
        &self.experiences[self.out_of_movie_id.as_str()]
    }

    /// The in-movie (timeline extras) experience: by convention the main
    /// experience's last child.
    pub fn in_movie_experience(&self) -> &Experience {
        &self.experiences[self.in_movie_id.as_str()]
    }

    /// Whether an ID names one of the three well-known root experiences.
    pub fn is_root_experience(&self, id: &str) -> bool {
        id == self.main_experience_id || id == self.out_of_movie_id || id == self.in_movie_id
    }

    // Traversal

    /// Experience IDs in document order.
    #[inline]
    pub fn experience_ids(&self) -> &[String] {
        &self.experience_order
    }

    /// All experiences in document order.
    pub fn experiences(&self) -> impl Iterator<Item = &Experience> {
        self.experience_order
            .iter()
            .map(|id| &self.experiences[id.as_str()])
    }

    /// All metadata records, unordered.
    pub fn metadatas(&self) -> impl Iterator<Item = &Metadata> {
        self.metadatas.values()
    }

    /// Resolve an experience's child edges, dropping (with a diagnostic)
    /// any edge whose target does not exist in this manifest.
    pub fn children_of<'a>(&'a self, experience: &Experience) -> Vec<&'a Experience> {
        experience
            .children
            .iter()
            .filter_map(|edge| {
                let child = self.experiences.get(edge.experience_id.as_str());
                if child.is_none() {
                    log::warn!(
                        "experience '{}': unresolved child '{}'",
                        experience.id,
                        edge.experience_id
                    );
                }
                child
            })
            .collect()
    }

    // Reverse indices

    /// All timed events across the manifest, sorted by start time, each
    /// stamped with its owning experience.
    pub fn timed_events(&self) -> impl Iterator<Item = (&TimedEvent, &TimedEventRef)> {
        self.timed_events.iter().map(|r| {
            let event = &self.timed_event_sequences[r.sequence_id.as_str()].events[r.index];
            (event, r)
        })
    }

    /// Timed events tied to a presentation, directly or through a playable
    /// sequence clip.
    pub fn timed_events_for_presentation(
        &self,
        presentation_id: &str,
    ) -> Vec<(&TimedEvent, &TimedEventRef)> {
        self.timed_events()
            .filter(|(_, r)| {
                let sequence = &self.timed_event_sequences[r.sequence_id.as_str()];
                if sequence.presentation_id.as_deref() == Some(presentation_id) {
                    return true;
                }
                sequence
                    .playable_sequence_id
                    .as_deref()
                    .and_then(|id| self.playable_sequences.get(id))
                    .is_some_and(|ps| {
                        ps.clips.iter().any(|c| c.presentation_id == presentation_id)
                    })
            })
            .collect()
    }

    /// The experience owning a gallery, by gallery ID.
    pub fn gallery_owner(&self, gallery_id: &str) -> Option<&Experience> {
        self.galleries
            .get(gallery_id)
            .and_then(|id| self.experiences.get(id.as_str()))
    }

    /// The audiovisual experience presenting a given presentation.
    pub fn audiovisual_experience_for_presentation(
        &self,
        presentation_id: &str,
    ) -> Option<&Experience> {
        self.presentation_to_av
            .get(presentation_id)
            .and_then(|id| self.experiences.get(id.as_str()))
    }

    /// Artwork URL for an experience from its own metadata, in the given
    /// language.
    pub fn experience_art_url(&self, experience: &Experience, language: &str) -> Option<&Url> {
        experience
            .metadata_id()
            .and_then(|id| self.metadatas.get(id))
            .and_then(|m| m.art_url(language))
    }
}

impl std::fmt::Debug for Manifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manifest")
            .field("experiences", &self.experiences.len())
            .field("presentations", &self.presentations.len())
            .field("videos", &self.videos.len())
            .field("audios", &self.audios.len())
            .field("images", &self.images.len())
            .field("timed_events", &self.timed_events.len())
            .finish()
    }
}
