//! Flatten raw works into normalized tables
//!
//! [`normalize`] is a pure transform: every projection below produces plain
//! rows, and [`build_table`] applies each table's dedup and sort keys. The
//! same [`Extraction`] always yields byte-identical rendered tables.

pub mod ids;

use crate::error::Result;
use crate::openalex::Work;
use biblio_common::types::{
    build_table, AuthorRow, CitingWorkRow, InstitutionRow, ReferencedWorkRow, Table, TableRow,
    TopicRow, WorkAuthorInstitutionRow, WorkAuthorRow, WorkRow, YearlyCitationRow,
};
use ids::short_id;

/// Everything fetched in one run
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Works matched by the venue query
    pub works: Vec<Work>,
    /// Citation sub-query results, one entry per primary work
    pub neighbourhoods: Vec<CitationNeighbourhood>,
}

/// Works one hop away from a primary work in the citation graph
#[derive(Debug, Clone, Default)]
pub struct CitationNeighbourhood {
    /// Short id of the primary work
    pub work_id: String,
    /// Works the primary work cites
    pub referenced: Vec<Work>,
    /// Works that cite the primary work
    pub citing: Vec<Work>,
}

impl Extraction {
    /// Primary works followed by every neighbour, in fetch order
    pub fn all_works(&self) -> impl Iterator<Item = &Work> {
        self.works.iter().chain(
            self.neighbourhoods
                .iter()
                .flat_map(|n| n.referenced.iter().chain(n.citing.iter())),
        )
    }
}

/// The complete output of a run
#[derive(Debug, Clone)]
pub struct Tables {
    pub works: Table<WorkRow>,
    pub authors: Table<AuthorRow>,
    pub institutions: Table<InstitutionRow>,
    pub works_authors: Table<WorkAuthorRow>,
    pub works_authors_institutions: Table<WorkAuthorInstitutionRow>,
    pub topics: Table<TopicRow>,
    pub yearly_citations: Table<YearlyCitationRow>,
    pub referenced_works: Table<ReferencedWorkRow>,
    pub citing_works: Table<CitingWorkRow>,
}

/// A table rendered to CSV bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub name: &'static str,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

impl Tables {
    /// Render every table, in a fixed order
    pub fn render(&self) -> Result<Vec<RenderedTable>> {
        Ok(vec![
            render(&self.works)?,
            render(&self.authors)?,
            render(&self.institutions)?,
            render(&self.works_authors)?,
            render(&self.works_authors_institutions)?,
            render(&self.topics)?,
            render(&self.yearly_citations)?,
            render(&self.referenced_works)?,
            render(&self.citing_works)?,
        ])
    }
}

fn render<R: TableRow>(table: &Table<R>) -> Result<RenderedTable> {
    Ok(RenderedTable {
        name: table.name(),
        rows: table.len(),
        bytes: table.to_csv_bytes()?,
    })
}

/// Rows collected before dedup and sort
#[derive(Default)]
struct Projection {
    works: Vec<WorkRow>,
    authors: Vec<AuthorRow>,
    institutions: Vec<InstitutionRow>,
    works_authors: Vec<WorkAuthorRow>,
    works_authors_institutions: Vec<WorkAuthorInstitutionRow>,
    topics: Vec<TopicRow>,
    yearly_citations: Vec<YearlyCitationRow>,
    referenced_works: Vec<ReferencedWorkRow>,
    citing_works: Vec<CitingWorkRow>,
}

/// Project, deduplicate and sort every table
pub fn normalize(extraction: &Extraction) -> Result<Tables> {
    let mut out = Projection::default();

    for work in extraction.all_works() {
        project_work(work, &mut out)?;
    }

    for neighbourhood in &extraction.neighbourhoods {
        for cited in &neighbourhood.referenced {
            out.referenced_works.push(ReferencedWorkRow {
                reference_id: short_id("work", &cited.id)?.to_string(),
                referenced_by: neighbourhood.work_id.clone(),
            });
        }
        for citing in &neighbourhood.citing {
            out.citing_works.push(CitingWorkRow {
                reference_id: neighbourhood.work_id.clone(),
                referenced_by: short_id("work", &citing.id)?.to_string(),
            });
        }
    }

    Ok(Tables {
        works: build_table(out.works),
        authors: build_table(out.authors),
        institutions: build_table(out.institutions),
        works_authors: build_table(out.works_authors),
        works_authors_institutions: build_table(out.works_authors_institutions),
        topics: build_table(out.topics),
        yearly_citations: build_table(out.yearly_citations),
        referenced_works: build_table(out.referenced_works),
        citing_works: build_table(out.citing_works),
    })
}

/// Scalar row for one work; venue columns are null without a venue
pub fn work_row(work: &Work) -> Result<WorkRow> {
    let source = work.source();
    let biblio = work.biblio.as_ref();

    Ok(WorkRow {
        id: short_id("work", &work.id)?.to_string(),
        doi: work.doi.clone(),
        openalex_url: work.id.clone(),
        title: work.title.clone(),
        publication_date: work.publication_date.clone(),
        publication_year: work.publication_year,
        volume: biblio.and_then(|b| b.volume.clone()),
        issue: biblio.and_then(|b| b.issue.clone()),
        work_type: work.work_type.clone(),
        source: source.and_then(|s| s.display_name.clone()),
        source_organization: source.and_then(|s| s.host_organization_name.clone()),
        source_type: source.and_then(|s| s.source_type.clone()),
        citation_count: work.cited_by_count,
        reference_count: work.referenced_works_count,
    })
}

fn project_work(work: &Work, out: &mut Projection) -> Result<()> {
    let row = work_row(work)?;
    let work_id = row.id.clone();
    out.works.push(row);

    for authorship in work.authorships() {
        let author_id = short_id("author", &authorship.author.id)?.to_string();

        out.authors.push(AuthorRow {
            id: author_id.clone(),
            name: authorship.author.display_name.clone(),
            affiliation: authorship.affiliation().map(str::to_string),
        });
        out.works_authors.push(WorkAuthorRow {
            work_id: work_id.clone(),
            author_id: author_id.clone(),
            position: authorship.author_position,
        });

        for institution in authorship.institutions() {
            let institution_id = short_id("institution", &institution.id)?.to_string();

            out.institutions.push(InstitutionRow {
                id: institution_id.clone(),
                name: institution.display_name.clone(),
                country_code: institution.country_code.clone(),
                institution_type: institution.institution_type.clone(),
            });
            out.works_authors_institutions.push(WorkAuthorInstitutionRow {
                work_id: work_id.clone(),
                author_id: author_id.clone(),
                institution_id,
            });
        }
    }

    for topic in work.topics() {
        out.topics.push(TopicRow {
            work_id: work_id.clone(),
            topic: topic.display_name.clone(),
            subfield: topic.subfield.as_ref().and_then(|c| c.display_name.clone()),
            field: topic.field.as_ref().and_then(|c| c.display_name.clone()),
            domain: topic.domain.as_ref().and_then(|c| c.display_name.clone()),
        });
    }

    for bucket in work.counts_by_year() {
        out.yearly_citations.push(YearlyCitationRow {
            work_id: work_id.clone(),
            year: bucket.year,
            citation_count: bucket.cited_by_count,
        });
    }

    Ok(())
}
