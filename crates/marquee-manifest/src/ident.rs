//! Parsing helpers for namespaced identifiers and container references.

use marquee_common::{ContentIdentifier, Hash};
use marquee_xml::{Result, XmlElement};
use url::Url;

/// Parse a `<Namespace>`/`<Identifier>`/optional `<Location>` triple.
pub(crate) fn content_identifier(element: &XmlElement) -> Result<ContentIdentifier> {
    Ok(ContentIdentifier {
        namespace: element.require_child_str("Namespace")?.to_string(),
        identifier: element.require_child_str("Identifier")?.to_string(),
        location: element.child_url("Location"),
    })
}

/// Resolve the `<ContainerReference>/<ContainerLocation>` URL of an
/// inventory element, if declared.
pub(crate) fn container_location(element: &XmlElement) -> Option<Url> {
    element
        .child("ContainerReference")
        .and_then(|c| c.child_url("ContainerLocation"))
}

/// Resolve the `<ContainerReference>/<Hash method="...">` checksum of an
/// inventory element, if declared.
pub(crate) fn container_hash(element: &XmlElement) -> Option<Hash> {
    let hash = element.child("ContainerReference")?.child("Hash")?;
    let method = hash.attr("method")?;
    if hash.text().is_empty() {
        return None;
    }
    Some(Hash {
        method: method.to_string(),
        value: hash.text().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    #[test]
    fn test_content_identifier() {
        let doc = XmlDocument::parse_str(
            r#"<OtherID>
                <Namespace>AppDataID</Namespace>
                <Identifier>APP_7</Identifier>
            </OtherID>"#,
        )
        .unwrap();
        let id = content_identifier(doc.root()).unwrap();
        assert_eq!(id.namespace, "AppDataID");
        assert_eq!(id.identifier, "APP_7");
        assert!(id.location.is_none());
    }

    #[test]
    fn test_container_reference() {
        let doc = XmlDocument::parse_str(
            r#"<Image>
                <ContainerReference>
                    <ContainerLocation>http://cdn.example.com/a.jpg</ContainerLocation>
                    <Hash method="MD5">d41d8cd98f00b204e9800998ecf8427e</Hash>
                </ContainerReference>
            </Image>"#,
        )
        .unwrap();
        let url = container_location(doc.root()).unwrap();
        assert_eq!(url.as_str(), "http://cdn.example.com/a.jpg");
        let hash = container_hash(doc.root()).unwrap();
        assert_eq!(hash.method, "MD5");
    }
}
