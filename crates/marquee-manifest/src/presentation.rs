//! Presentations and playable sequences.

use marquee_xml::XmlElement;

use crate::inventory::{Audio, Video};
use crate::{Manifest, Result};

/// A playable unit referencing video and audio tracks.
///
/// Track identifier lists are concatenated across all `<TrackMetadata>`
/// children in document order and never deduplicated.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub id: String,
    pub video_track_ids: Vec<String>,
    pub audio_track_ids: Vec<String>,
}

impl Presentation {
    /// Construct from a `<Presentation>` element.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("PresentationID")?.to_string();

        let mut video_track_ids = Vec::new();
        let mut audio_track_ids = Vec::new();
        for track_metadata in element.children_named("TrackMetadata") {
            for reference in track_metadata.children_named("VideoTrackReference") {
                for track_id in reference.children_named("VideoTrackID") {
                    if !track_id.text().is_empty() {
                        video_track_ids.push(track_id.text().to_string());
                    }
                }
            }
            for reference in track_metadata.children_named("AudioTrackReference") {
                for track_id in reference.children_named("AudioTrackID") {
                    if !track_id.text().is_empty() {
                        audio_track_ids.push(track_id.text().to_string());
                    }
                }
            }
        }

        Ok(Self {
            id,
            video_track_ids,
            audio_track_ids,
        })
    }

    /// The first video track that resolves in the owning manifest.
    pub fn first_video<'a>(&self, manifest: &'a Manifest) -> Option<&'a Video> {
        self.video_track_ids
            .iter()
            .find_map(|id| manifest.video(id))
    }

    /// The first audio track that resolves in the owning manifest.
    pub fn first_audio<'a>(&self, manifest: &'a Manifest) -> Option<&'a Audio> {
        self.audio_track_ids
            .iter()
            .find_map(|id| manifest.audio(id))
    }
}

/// One clip reference inside a playable sequence.
#[derive(Debug, Clone)]
pub struct Clip {
    pub presentation_id: String,
    pub sequence: i64,
}

/// An ordered chain of presentations.
#[derive(Debug, Clone)]
pub struct PlayableSequence {
    pub id: String,
    /// Clips sorted by their `sequence` attribute (ties keep document order).
    pub clips: Vec<Clip>,
}

impl PlayableSequence {
    /// Construct from a `<PlayableSequence>` element.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("PlayableSequenceID")?.to_string();

        let mut clips = Vec::new();
        for clip in element.children_named("Clip") {
            clips.push(Clip {
                presentation_id: clip.require_attr("PresentationID")?.to_string(),
                sequence: clip.attr_i64("sequence").unwrap_or(0),
            });
        }
        clips.sort_by_key(|c| c.sequence);

        Ok(Self { id, clips })
    }

    /// Resolve the clip chain against the owning manifest.
    ///
    /// Clips whose presentation ID fails to resolve are dropped with a
    /// diagnostic; a sequence with some broken links still plays the links
    /// that work.
    pub fn presentations<'a>(&self, manifest: &'a Manifest) -> Vec<&'a Presentation> {
        self.clips
            .iter()
            .filter_map(|clip| {
                let presentation = manifest.presentation(&clip.presentation_id);
                if presentation.is_none() {
                    log::warn!(
                        "playable sequence '{}': dropping unresolved clip '{}'",
                        self.id,
                        clip.presentation_id
                    );
                }
                presentation
            })
            .collect()
    }
}
