//! Filter expressions for the works endpoint

use chrono::NaiveDate;

/// Venue type the citation sub-queries are restricted to
const JOURNAL_ONLY: &str = "primary_location.source.type:journal";

/// The three queries a run issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkFilter {
    /// Works published in a venue within a date range
    Venue {
        issn: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// Works referenced by the given work (short id)
    ReferencedBy(String),
    /// Works citing the given work (short id)
    Citing(String),
}

impl WorkFilter {
    /// Value of the `filter` query parameter
    pub fn expression(&self) -> String {
        match self {
            WorkFilter::Venue { issn, from, to } => format!(
                "primary_location.source.issn:{},from_publication_date:{},to_publication_date:{}",
                issn,
                from.format("%Y-%m-%d"),
                to.format("%Y-%m-%d")
            ),
            WorkFilter::ReferencedBy(work_id) => format!("cited_by:{},{}", work_id, JOURNAL_ONLY),
            WorkFilter::Citing(work_id) => format!("cites:{},{}", work_id, JOURNAL_ONLY),
        }
    }

    /// Value of the `sort` query parameter, if any
    pub fn sort(&self) -> Option<&'static str> {
        match self {
            WorkFilter::Venue { .. } => Some("publication_year"),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_expression() {
        let filter = WorkFilter::Venue {
            issn: "0028-0836".into(),
            from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        };
        assert_eq!(
            filter.expression(),
            "primary_location.source.issn:0028-0836,\
             from_publication_date:2020-01-01,\
             to_publication_date:2020-12-31"
        );
        assert_eq!(filter.sort(), Some("publication_year"));
    }

    #[test]
    fn test_citation_expressions() {
        assert_eq!(
            WorkFilter::ReferencedBy("W1".into()).expression(),
            "cited_by:W1,primary_location.source.type:journal"
        );
        assert_eq!(
            WorkFilter::Citing("W1".into()).to_string(),
            "cites:W1,primary_location.source.type:journal"
        );
        assert_eq!(WorkFilter::Citing("W1".into()).sort(), None);
    }
}
