//! Metadata, localized info, and people.

use marquee_common::ContentIdentifier;
use marquee_xml::{parse_iso8601_duration, XmlElement};
use url::Url;

use crate::ident::content_identifier;
use crate::Result;

/// One language's worth of display strings for a Metadata record.
#[derive(Debug, Clone)]
pub struct LocalizedInfo {
    /// Language tag (e.g. `"en-US"`).
    pub language: String,
    /// Whether this entry is the declared default.
    pub is_default: bool,
    pub title_display: Option<String>,
    pub title_sort: Option<String>,
    pub summary_short: Option<String>,
    pub summary_full: Option<String>,
    /// Artwork image URL.
    pub art_reference: Option<Url>,
}

impl LocalizedInfo {
    fn from_element(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            language: element.require_attr("language")?.to_string(),
            is_default: element.attr_bool("default").unwrap_or(false),
            title_display: element
                .child_str("TitleDisplayUnlimited")
                .map(str::to_string),
            title_sort: element.child_str("TitleSort").map(str::to_string),
            summary_short: element.child_str("Summary190").map(str::to_string),
            summary_full: element.child_str("Summary400").map(str::to_string),
            art_reference: element.child_url("ArtReference"),
        })
    }
}

/// A credited person on a Metadata record.
#[derive(Debug, Clone)]
pub struct Person {
    pub display_name: String,
    pub job_function: Option<String>,
    pub character: Option<String>,
    /// Position within the billing block; people sort by this ascending.
    pub billing_order: i64,
    /// Alternate identifiers, matched against talent API namespaces.
    pub identifiers: Vec<ContentIdentifier>,
}

impl Person {
    fn from_element(element: &XmlElement) -> Result<Self> {
        let name = element.require_child("Name")?;
        let display_name = name.require_child_str("DisplayName")?.to_string();

        let (job_function, character, billing_order) = match element.child("Job") {
            Some(job) => (
                job.child_str("JobFunction").map(str::to_string),
                job.child_str("Character").map(str::to_string),
                job.child_i64("BillingBlockOrder").unwrap_or(0),
            ),
            None => (None, None, 0),
        };

        let mut identifiers = Vec::new();
        for id in element.children_named("Identifier") {
            identifiers.push(content_identifier(id)?);
        }

        Ok(Self {
            display_name,
            job_function,
            character,
            billing_order,
            identifiers,
        })
    }

    /// The identifier declared in the given namespace, if any.
    pub fn identifier_in(&self, namespace: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|i| i.namespace == namespace)
            .map(|i| i.identifier.as_str())
    }
}

/// A metadata record from the `<Inventory>` section.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub id: String,
    /// 1..N localized records; lookup falls back requested language ->
    /// default-flagged entry -> first entry and never fails.
    localized: Vec<LocalizedInfo>,
    pub alt_identifiers: Vec<ContentIdentifier>,
    /// People sorted by billing block order ascending.
    pub people: Vec<Person>,
    pub run_length_seconds: Option<f64>,
    pub release_year: Option<u32>,
}

impl Metadata {
    /// Construct from a `<Metadata>` element. At least one LocalizedInfo
    /// is required.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let id = element.require_attr("ContentID")?.to_string();
        let basic = element.child("BasicMetadata").unwrap_or(element);

        let mut localized = Vec::new();
        for info in basic.children_named("LocalizedInfo") {
            localized.push(LocalizedInfo::from_element(info)?);
        }
        if localized.is_empty() {
            return Err(marquee_xml::Error::MissingChild {
                element: basic.tag().to_string(),
                child: "LocalizedInfo".to_string(),
            }
            .into());
        }

        let mut alt_identifiers = Vec::new();
        for alt in basic.children_named("AltIdentifier") {
            alt_identifiers.push(content_identifier(alt)?);
        }

        let mut people = Vec::new();
        for person in basic.children_named("People") {
            people.push(Person::from_element(person)?);
        }
        people.sort_by_key(|p| p.billing_order);

        Ok(Self {
            id,
            localized,
            alt_identifiers,
            people,
            run_length_seconds: basic.child_str("RunLength").and_then(parse_iso8601_duration),
            release_year: basic.child_u32("ReleaseYear"),
        })
    }

    /// All localized records in document order.
    #[inline]
    pub fn localized(&self) -> &[LocalizedInfo] {
        &self.localized
    }

    /// Language-based lookup: requested language, else the default-flagged
    /// entry, else the first entry.
    pub fn localized_info(&self, language: &str) -> &LocalizedInfo {
        self.localized
            .iter()
            .find(|l| l.language.eq_ignore_ascii_case(language))
            .or_else(|| self.localized.iter().find(|l| l.is_default))
            .unwrap_or(&self.localized[0])
    }

    /// Display title in the given language, with the standard fallback.
    pub fn title(&self, language: &str) -> Option<&str> {
        self.localized_info(language).title_display.as_deref()
    }

    /// Artwork URL in the given language, with the standard fallback.
    pub fn art_url(&self, language: &str) -> Option<&Url> {
        self.localized_info(language).art_reference.as_ref()
    }

    /// The person carrying the given identifier in the given namespace.
    pub fn person_with_identifier(&self, namespace: &str, identifier: &str) -> Option<&Person> {
        self.people
            .iter()
            .find(|p| p.identifier_in(namespace) == Some(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_xml::XmlDocument;

    const METADATA: &str = r#"<Metadata ContentID="md1">
        <BasicMetadata>
            <LocalizedInfo language="en-US" default="true">
                <TitleDisplayUnlimited>The Movie</TitleDisplayUnlimited>
                <Summary190>Short summary.</Summary190>
                <ArtReference>http://cdn.example.com/art-en.jpg</ArtReference>
            </LocalizedInfo>
            <LocalizedInfo language="fr-FR">
                <TitleDisplayUnlimited>Le Film</TitleDisplayUnlimited>
            </LocalizedInfo>
            <RunLength>PT2H</RunLength>
            <ReleaseYear>2015</ReleaseYear>
            <People>
                <Job>
                    <JobFunction>Actor</JobFunction>
                    <BillingBlockOrder>2</BillingBlockOrder>
                </Job>
                <Name><DisplayName>Second Billed</DisplayName></Name>
            </People>
            <People>
                <Job>
                    <JobFunction>Actor</JobFunction>
                    <BillingBlockOrder>1</BillingBlockOrder>
                </Job>
                <Name><DisplayName>First Billed</DisplayName></Name>
                <Identifier>
                    <Namespace>baseline.api</Namespace>
                    <Identifier>4242</Identifier>
                </Identifier>
            </People>
        </BasicMetadata>
    </Metadata>"#;

    fn parse() -> Metadata {
        let doc = XmlDocument::parse_str(METADATA).unwrap();
        Metadata::from_element(doc.root()).unwrap()
    }

    #[test]
    fn test_language_fallback_chain() {
        let metadata = parse();
        assert_eq!(metadata.title("fr-FR"), Some("Le Film"));
        // unknown language falls back to the default-flagged entry
        assert_eq!(metadata.title("de-DE"), Some("The Movie"));
        assert_eq!(metadata.localized_info("de-DE").language, "en-US");
    }

    #[test]
    fn test_people_sorted_by_billing_order() {
        let metadata = parse();
        let names: Vec<_> = metadata
            .people
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, ["First Billed", "Second Billed"]);
    }

    #[test]
    fn test_person_identifier_lookup() {
        let metadata = parse();
        let person = metadata.person_with_identifier("baseline.api", "4242").unwrap();
        assert_eq!(person.display_name, "First Billed");
        assert!(metadata.person_with_identifier("other.api", "4242").is_none());
    }

    #[test]
    fn test_run_length_and_year() {
        let metadata = parse();
        assert_eq!(metadata.run_length_seconds, Some(7200.0));
        assert_eq!(metadata.release_year, Some(2015));
    }

    #[test]
    fn test_missing_localized_info_is_fatal() {
        let doc = XmlDocument::parse_str(
            r#"<Metadata ContentID="md1"><BasicMetadata/></Metadata>"#,
        )
        .unwrap();
        assert!(Metadata::from_element(doc.root()).is_err());
    }
}
