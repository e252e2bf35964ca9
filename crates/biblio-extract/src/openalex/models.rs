//! Typed shape of the `/works` response
//!
//! Only the fields the tables need are modeled; everything else in the
//! payload is ignored. Identity fields are required, descriptive fields and
//! nested collections are `Option` so absence is visible in the type.

use biblio_common::types::AuthorPosition;
use serde::Deserialize;

/// One page of a filtered works query
#[derive(Debug, Clone, Deserialize)]
pub struct WorksPage {
    pub results: Vec<Work>,
    pub meta: Meta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    /// Total number of works matching the filter
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Work {
    /// URL-like identifier, e.g. `https://openalex.org/W2741809807`
    pub id: String,
    pub doi: Option<String>,
    pub title: Option<String>,
    pub publication_date: Option<String>,
    pub publication_year: Option<i32>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    pub biblio: Option<Biblio>,
    pub primary_location: Option<Location>,
    pub cited_by_count: Option<u64>,
    pub referenced_works_count: Option<u64>,
    authorships: Option<Vec<Authorship>>,
    topics: Option<Vec<Topic>>,
    counts_by_year: Option<Vec<YearCount>>,
}

impl Work {
    pub fn authorships(&self) -> &[Authorship] {
        self.authorships.as_deref().unwrap_or_default()
    }

    pub fn topics(&self) -> &[Topic] {
        self.topics.as_deref().unwrap_or_default()
    }

    pub fn counts_by_year(&self) -> &[YearCount] {
        self.counts_by_year.as_deref().unwrap_or_default()
    }

    /// Venue the work was published in, if known
    pub fn source(&self) -> Option<&Source> {
        self.primary_location.as_ref()?.source.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Biblio {
    pub volume: Option<String>,
    pub issue: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub display_name: Option<String>,
    pub host_organization_name: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Authorship {
    pub author_position: AuthorPosition,
    pub author: Author,
    institutions: Option<Vec<Institution>>,
    raw_affiliation_strings: Option<Vec<String>>,
    /// Older single-string form of the field above
    raw_affiliation_string: Option<String>,
}

impl Authorship {
    pub fn institutions(&self) -> &[Institution] {
        self.institutions.as_deref().unwrap_or_default()
    }

    /// First raw affiliation string, falling back to the legacy field
    pub fn affiliation(&self) -> Option<&str> {
        self.raw_affiliation_strings
            .as_deref()
            .and_then(|all| all.iter().map(String::as_str).find(|s| !s.trim().is_empty()))
            .or_else(|| {
                self.raw_affiliation_string
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Institution {
    pub id: String,
    pub display_name: Option<String>,
    pub country_code: Option<String>,
    #[serde(rename = "type")]
    pub institution_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topic {
    pub display_name: String,
    pub subfield: Option<Classification>,
    pub field: Option<Classification>,
    pub domain: Option<Classification>,
}

/// Subfield, field or domain of a topic
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub cited_by_count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_work_has_empty_collections() {
        let work: Work = serde_json::from_value(json!({
            "id": "https://openalex.org/W1",
            "authorships": null
        }))
        .unwrap();

        assert!(work.authorships().is_empty());
        assert!(work.topics().is_empty());
        assert!(work.counts_by_year().is_empty());
        assert!(work.source().is_none());
    }

    #[test]
    fn test_page_ignores_unmodeled_fields() {
        let page: WorksPage = serde_json::from_value(json!({
            "meta": { "count": 1, "page": 1, "per_page": 25, "db_response_time_ms": 12 },
            "results": [{
                "id": "https://openalex.org/W1",
                "biblio": { "volume": "4", "issue": "2", "first_page": "10", "last_page": "19" },
                "primary_location": {
                    "source": {
                        "id": "https://openalex.org/S1",
                        "issn_l": "0028-0836",
                        "type": "journal"
                    }
                },
                "topics": [
                    { "id": "https://openalex.org/T1", "display_name": "Optics", "score": 0.9 }
                ]
            }],
            "group_by": []
        }))
        .unwrap();

        assert_eq!(page.meta.count, 1);
        let work = &page.results[0];
        assert_eq!(work.biblio.as_ref().and_then(|b| b.volume.as_deref()), Some("4"));
        assert_eq!(work.source().and_then(|s| s.source_type.as_deref()), Some("journal"));
        assert_eq!(work.topics()[0].display_name, "Optics");
    }

    #[test]
    fn test_location_without_source() {
        let work: Work = serde_json::from_value(json!({
            "id": "https://openalex.org/W1",
            "primary_location": { "source": null, "is_oa": false }
        }))
        .unwrap();
        assert!(work.source().is_none());
    }

    #[test]
    fn test_work_without_id_is_rejected() {
        let result: Result<Work, _> = serde_json::from_value(json!({ "title": "Untitled" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_affiliation_prefers_list_field() {
        let authorship: Authorship = serde_json::from_value(json!({
            "author_position": "first",
            "author": { "id": "https://openalex.org/A1" },
            "raw_affiliation_strings": ["", "Dept. of Physics"],
            "raw_affiliation_string": "Legacy Dept."
        }))
        .unwrap();
        assert_eq!(authorship.affiliation(), Some("Dept. of Physics"));
    }

    #[test]
    fn test_affiliation_falls_back_to_legacy_field() {
        let authorship: Authorship = serde_json::from_value(json!({
            "author_position": "last",
            "author": { "id": "https://openalex.org/A1" },
            "raw_affiliation_strings": [],
            "raw_affiliation_string": "Legacy Dept."
        }))
        .unwrap();
        assert_eq!(authorship.affiliation(), Some("Legacy Dept."));
        assert!(authorship.institutions().is_empty());
    }

    #[test]
    fn test_unknown_author_position_is_rejected() {
        let result: Result<Authorship, _> = serde_json::from_value(json!({
            "author_position": "corresponding",
            "author": { "id": "https://openalex.org/A1" }
        }));
        assert!(result.is_err());
    }
}
