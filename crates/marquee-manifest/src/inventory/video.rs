//! Video track inventory entity.

use marquee_xml::{parse_iso8601_duration, XmlElement};
use url::Url;

use crate::ident::container_location;
use crate::Result;

/// Role of a video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoType {
    /// Main program video.
    #[default]
    Primary,
    /// Alternate camera angle.
    Angle,
}

impl VideoType {
    fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("primary") {
            Some(Self::Primary)
        } else if value.eq_ignore_ascii_case("angle") {
            Some(Self::Angle)
        } else {
            None
        }
    }
}

/// Recognized video codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    H264,
    H265,
    Prores,
}

impl VideoCodec {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "H.264" | "H264" | "AVC" => Some(Self::H264),
            "H.265" | "H265" | "HEVC" => Some(Self::H265),
            "PRORES" => Some(Self::Prores),
            _ => None,
        }
    }
}

/// Pixel dimensions of a video or image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// Optional encoding details of a video track.
#[derive(Debug, Clone)]
pub struct VideoEncoding {
    pub codec: VideoCodec,
    /// Runtime parsed from the ISO-8601 `ActualLength`, in seconds.
    pub length_seconds: Option<f64>,
}

/// A video track from the `<Inventory>` section.
#[derive(Debug, Clone)]
pub struct Video {
    pub id: String,
    pub video_type: VideoType,
    pub encoding: Option<VideoEncoding>,
    pub size: Option<PixelSize>,
    pub location: Option<Url>,
}

impl Video {
    /// Construct from a `<Video>` element.
    ///
    /// Returns `Ok(None)` (skip) for an unrecognized type or codec.
    pub fn from_element(element: &XmlElement) -> Result<Option<Self>> {
        let id = element.require_attr("VideoTrackID")?.to_string();

        let video_type = match element.child_str("Type") {
            Some(raw) => match VideoType::parse(raw) {
                Some(t) => t,
                None => {
                    log::warn!("skipping video '{}': unknown type '{}'", id, raw);
                    return Ok(None);
                }
            },
            None => VideoType::default(),
        };

        let encoding = if element.has_child("Encoding") {
            let enc = element.require_child("Encoding")?;
            let raw = enc.require_child_str("Codec")?;
            let codec = match VideoCodec::parse(raw) {
                Some(c) => c,
                None => {
                    log::warn!("skipping video '{}': unknown codec '{}'", id, raw);
                    return Ok(None);
                }
            };
            Some(VideoEncoding {
                codec,
                length_seconds: enc
                    .child_str("ActualLength")
                    .and_then(parse_iso8601_duration),
            })
        } else {
            None
        };

        let size = if element.has_child("Picture") {
            let picture = element.require_child("Picture")?;
            Some(PixelSize {
                width: picture.require_child_u32("WidthPixels")?,
                height: picture.require_child_u32("HeightPixels")?,
            })
        } else {
            None
        };

        Ok(Some(Self {
            id,
            video_type,
            encoding,
            size,
            location: container_location(element),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    fn parse(xml: &str) -> Result<Option<Video>> {
        let doc = XmlDocument::parse_str(xml).unwrap();
        Video::from_element(doc.root())
    }

    #[test]
    fn test_full_video() {
        let video = parse(
            r#"<Video VideoTrackID="V1">
                <Type>primary</Type>
                <Encoding>
                    <Codec>H.264</Codec>
                    <ActualLength>PT1H30M</ActualLength>
                </Encoding>
                <Picture>
                    <WidthPixels>1920</WidthPixels>
                    <HeightPixels>1080</HeightPixels>
                </Picture>
            </Video>"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(video.id, "V1");
        assert_eq!(video.video_type, VideoType::Primary);
        let enc = video.encoding.unwrap();
        assert_eq!(enc.codec, VideoCodec::H264);
        assert_eq!(enc.length_seconds, Some(5400.0));
        assert_eq!(
            video.size,
            Some(PixelSize {
                width: 1920,
                height: 1080
            })
        );
    }

    #[test]
    fn test_unknown_codec_skips() {
        let result = parse(
            r#"<Video VideoTrackID="V1"><Encoding><Codec>AV2</Codec></Encoding></Video>"#,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_bad_pixel_size_is_fatal() {
        let result = parse(
            r#"<Video VideoTrackID="V1">
                <Picture><WidthPixels>wide</WidthPixels><HeightPixels>1080</HeightPixels></Picture>
            </Video>"#,
        );
        assert!(result.is_err());
    }
}
