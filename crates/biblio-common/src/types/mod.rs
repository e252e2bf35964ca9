//! Normalized table row shapes
//!
//! One struct per output table. Field order is column order; optional fields
//! render as empty CSV cells.

mod table;

pub use table::{build_table, Table, TableRow};

use serde::{Deserialize, Serialize};

/// Position of an author in a work's byline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorPosition {
    First,
    Middle,
    Last,
}

impl std::fmt::Display for AuthorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorPosition::First => write!(f, "first"),
            AuthorPosition::Middle => write!(f, "middle"),
            AuthorPosition::Last => write!(f, "last"),
        }
    }
}

// ============================================================================
// Entity Tables
// ============================================================================

/// One row per work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkRow {
    /// Short id (e.g. `W2741809807`)
    pub id: String,
    pub doi: Option<String>,
    /// Full identifier URL the short id was taken from
    pub openalex_url: String,
    pub title: Option<String>,
    pub publication_date: Option<String>,
    pub publication_year: Option<i32>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    /// Venue display name; null when the work has no venue
    pub source: Option<String>,
    pub source_organization: Option<String>,
    pub source_type: Option<String>,
    pub citation_count: Option<u64>,
    pub reference_count: Option<u64>,
}

impl TableRow for WorkRow {
    const NAME: &'static str = "works";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "doi",
        "openalex_url",
        "title",
        "publication_date",
        "publication_year",
        "volume",
        "issue",
        "type",
        "source",
        "source_organization",
        "source_type",
        "citation_count",
        "reference_count",
    ];

    type DedupKey = String;
    #[allow(clippy::type_complexity)]
    type SortKey = (
        Option<String>,
        Option<String>,
        Option<String>,
        Option<i32>,
        Option<String>,
        Option<String>,
        String,
    );

    fn dedup_key(&self) -> Self::DedupKey {
        self.id.clone()
    }

    fn sort_key(&self) -> Self::SortKey {
        (
            self.source_type.clone(),
            self.source_organization.clone(),
            self.source.clone(),
            self.publication_year,
            self.volume.clone(),
            self.issue.clone(),
            self.id.clone(),
        )
    }
}

/// One row per distinct author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRow {
    pub id: String,
    pub name: Option<String>,
    /// First affiliation string seen for this author
    pub affiliation: Option<String>,
}

impl TableRow for AuthorRow {
    const NAME: &'static str = "authors";
    const HEADERS: &'static [&'static str] = &["id", "name", "affiliation"];

    type DedupKey = String;
    type SortKey = (Option<String>, String);

    fn dedup_key(&self) -> Self::DedupKey {
        self.id.clone()
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.name.clone(), self.id.clone())
    }

    fn merge(&mut self, duplicate: Self) {
        if self.name.is_none() {
            self.name = duplicate.name;
        }
        if self.affiliation.is_none() {
            self.affiliation = duplicate.affiliation;
        }
    }
}

/// One row per distinct institution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstitutionRow {
    pub id: String,
    pub name: Option<String>,
    pub country_code: Option<String>,
    #[serde(rename = "type")]
    pub institution_type: Option<String>,
}

impl TableRow for InstitutionRow {
    const NAME: &'static str = "institutions";
    const HEADERS: &'static [&'static str] = &["id", "name", "country_code", "type"];

    type DedupKey = String;
    type SortKey = (Option<String>, String);

    fn dedup_key(&self) -> Self::DedupKey {
        self.id.clone()
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.name.clone(), self.id.clone())
    }

    fn merge(&mut self, duplicate: Self) {
        self.name = self.name.take().or(duplicate.name);
        self.country_code = self.country_code.take().or(duplicate.country_code);
        self.institution_type = self.institution_type.take().or(duplicate.institution_type);
    }
}

// ============================================================================
// Junction Tables
// ============================================================================

/// Work to author, with byline position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkAuthorRow {
    pub work_id: String,
    pub author_id: String,
    pub position: AuthorPosition,
}

impl TableRow for WorkAuthorRow {
    const NAME: &'static str = "works_authors";
    const HEADERS: &'static [&'static str] = &["work_id", "author_id", "position"];

    type DedupKey = (String, String);
    type SortKey = (String, String);

    fn dedup_key(&self) -> Self::DedupKey {
        (self.work_id.clone(), self.author_id.clone())
    }

    fn sort_key(&self) -> Self::SortKey {
        self.dedup_key()
    }
}

/// Which institution an author was affiliated with on a given work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkAuthorInstitutionRow {
    pub work_id: String,
    pub author_id: String,
    pub institution_id: String,
}

impl TableRow for WorkAuthorInstitutionRow {
    const NAME: &'static str = "works_authors_institutions";
    const HEADERS: &'static [&'static str] = &["work_id", "author_id", "institution_id"];

    type DedupKey = (String, String, String);
    type SortKey = (String, String, String);

    fn dedup_key(&self) -> Self::DedupKey {
        (
            self.work_id.clone(),
            self.author_id.clone(),
            self.institution_id.clone(),
        )
    }

    fn sort_key(&self) -> Self::SortKey {
        self.dedup_key()
    }
}

/// Topic classification of a work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRow {
    pub work_id: String,
    pub topic: String,
    pub subfield: Option<String>,
    pub field: Option<String>,
    pub domain: Option<String>,
}

impl TableRow for TopicRow {
    const NAME: &'static str = "topics";
    const HEADERS: &'static [&'static str] = &["work_id", "topic", "subfield", "field", "domain"];

    type DedupKey = (String, String);
    type SortKey = (String, String);

    fn dedup_key(&self) -> Self::DedupKey {
        (self.work_id.clone(), self.topic.clone())
    }

    fn sort_key(&self) -> Self::SortKey {
        self.dedup_key()
    }
}

/// Citations received by a work in one calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyCitationRow {
    pub work_id: String,
    pub year: i32,
    pub citation_count: u64,
}

impl TableRow for YearlyCitationRow {
    const NAME: &'static str = "yearly_citations";
    const HEADERS: &'static [&'static str] = &["work_id", "year", "citation_count"];

    type DedupKey = (String, i32);
    type SortKey = (String, i32);

    fn dedup_key(&self) -> Self::DedupKey {
        (self.work_id.clone(), self.year)
    }

    fn sort_key(&self) -> Self::SortKey {
        self.dedup_key()
    }
}

// ============================================================================
// Citation Graph
// ============================================================================

/// Edge `referenced_by -> reference_id` found by asking what a work cites
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencedWorkRow {
    pub reference_id: String,
    pub referenced_by: String,
}

impl TableRow for ReferencedWorkRow {
    const NAME: &'static str = "referenced_works";
    const HEADERS: &'static [&'static str] = &["reference_id", "referenced_by"];

    type DedupKey = (String, String);
    type SortKey = (String, String);

    fn dedup_key(&self) -> Self::DedupKey {
        (self.reference_id.clone(), self.referenced_by.clone())
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.referenced_by.clone(), self.reference_id.clone())
    }
}

/// Edge `referenced_by -> reference_id` found by asking who cites a work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitingWorkRow {
    pub reference_id: String,
    pub referenced_by: String,
}

impl TableRow for CitingWorkRow {
    const NAME: &'static str = "citing_works";
    const HEADERS: &'static [&'static str] = &["reference_id", "referenced_by"];

    type DedupKey = (String, String);
    type SortKey = (String, String);

    fn dedup_key(&self) -> Self::DedupKey {
        (self.reference_id.clone(), self.referenced_by.clone())
    }

    fn sort_key(&self) -> Self::SortKey {
        self.dedup_key()
    }
}
