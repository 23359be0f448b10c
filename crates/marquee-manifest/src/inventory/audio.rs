//! Audio track inventory entity.

use marquee_xml::XmlElement;
use url::Url;

use crate::ident::container_location;
use crate::Result;

/// Role of an audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioType {
    /// Main program audio.
    #[default]
    Primary,
    /// Commentary track.
    Commentary,
}

impl AudioType {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("primary") {
            Some(Self::Primary)
        } else if value.eq_ignore_ascii_case("commentary") {
            Some(Self::Commentary)
        } else {
            None
        }
    }
}

/// Recognized audio codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    Aac,
    Mp3,
    Ac3,
    Eac3,
    Dts,
}

impl AudioCodec {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "AAC" => Some(Self::Aac),
            "MP3" => Some(Self::Mp3),
            "AC-3" | "AC3" => Some(Self::Ac3),
            "E-AC-3" | "EAC3" => Some(Self::Eac3),
            "DTS" => Some(Self::Dts),
            _ => None,
        }
    }
}

/// Optional encoding details of an audio track.
#[derive(Debug, Clone)]
pub struct AudioEncoding {
    pub codec: AudioCodec,
    pub sample_rate: Option<u32>,
    pub sample_bit_depth: Option<u32>,
    pub channel_mapping: Option<String>,
}

/// An audio track from the `<Inventory>` section.
#[derive(Debug, Clone)]
pub struct Audio {
    pub id: String,
    pub audio_type: AudioType,
    pub encoding: Option<AudioEncoding>,
    /// Whether any declared language is flagged as dubbed.
    pub dubbed: bool,
    /// Declared languages, defaulting to `["en"]` when absent.
    pub languages: Vec<String>,
    pub location: Option<Url>,
}

impl Audio {
    /// Construct from an `<Audio>` element.
    ///
    /// Returns `Ok(None)` (skip) for an unrecognized type or codec.
    pub fn from_element(element: &XmlElement) -> Result<Option<Self>> {
        let id = element.require_attr("AudioTrackID")?.to_string();

        let audio_type = match element.child_str("Type") {
            Some(raw) => match AudioType::parse(raw) {
                Some(t) => t,
                None => {
                    log::warn!("skipping audio '{}': unknown type '{}'", id, raw);
                    return Ok(None);
                }
            },
            None => AudioType::default(),
        };

        let encoding = if element.has_child("Encoding") {
            let enc = element.require_child("Encoding")?;
            let raw = enc.require_child_str("Codec")?;
            let codec = match AudioCodec::parse(raw) {
                Some(c) => c,
                None => {
                    log::warn!("skipping audio '{}': unknown codec '{}'", id, raw);
                    return Ok(None);
                }
            };
            Some(AudioEncoding {
                codec,
                sample_rate: enc.child_u32("SampleRate"),
                sample_bit_depth: enc.child_u32("SampleBitDepth"),
                channel_mapping: enc.child_str("ChannelMapping").map(str::to_string),
            })
        } else {
            None
        };

        let mut dubbed = false;
        let mut languages = Vec::new();
        for language in element.children_named("Language") {
            if language.text().is_empty() {
                continue;
            }
            dubbed |= language.attr_bool("dubbed").unwrap_or(false);
            languages.push(language.text().to_string());
        }
        if languages.is_empty() {
            languages.push("en".to_string());
        }

        Ok(Some(Self {
            id,
            audio_type,
            encoding,
            dubbed,
            languages,
            location: container_location(element),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    fn parse(xml: &str) -> Result<Option<Audio>> {
        let doc = XmlDocument::parse_str(xml).unwrap();
        Audio::from_element(doc.root())
    }

    #[test]
    fn test_full_audio() {
        let audio = parse(
            r#"<Audio AudioTrackID="A1">
                <Type>primary</Type>
                <Encoding>
                    <Codec>AAC</Codec>
                    <SampleRate>48000</SampleRate>
                    <SampleBitDepth>16</SampleBitDepth>
                    <ChannelMapping>L/R</ChannelMapping>
                </Encoding>
                <Language dubbed="Y">fr</Language>
                <ContainerReference>
                    <ContainerLocation>http://cdn.example.com/a1.mp4</ContainerLocation>
                </ContainerReference>
            </Audio>"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(audio.id, "A1");
        assert_eq!(audio.audio_type, AudioType::Primary);
        let enc = audio.encoding.unwrap();
        assert_eq!(enc.codec, AudioCodec::Aac);
        assert_eq!(enc.sample_rate, Some(48000));
        assert!(audio.dubbed);
        assert_eq!(audio.languages, ["fr"]);
        assert!(audio.location.is_some());
    }

    #[test]
    fn test_defaults() {
        let audio = parse(r#"<Audio AudioTrackID="A1"/>"#).unwrap().unwrap();
        assert_eq!(audio.audio_type, AudioType::Primary);
        assert_eq!(audio.languages, ["en"]);
        assert!(!audio.dubbed);
        assert!(audio.encoding.is_none());
    }

    #[test]
    fn test_unknown_codec_skips() {
        let result = parse(
            r#"<Audio AudioTrackID="A1">
                <Encoding><Codec>FLAC-NEXT</Codec></Encoding>
            </Audio>"#,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unknown_type_skips() {
        let result = parse(r#"<Audio AudioTrackID="A1"><Type>descriptive</Type></Audio>"#).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_id_is_fatal() {
        assert!(parse(r#"<Audio><Type>primary</Type></Audio>"#).is_err());
    }
}
