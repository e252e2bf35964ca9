//! Extraction configuration
//!
//! [`ExtractConfig`] is built once by the CLI layer and passed into the
//! pipeline; nothing below this module reads the environment.

use crate::error::{ExtractError, Result};
use crate::openalex::RetryPolicy;
use chrono::NaiveDate;
use std::path::PathBuf;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

/// Largest page size the works endpoint accepts
pub const MAX_PER_PAGE: u32 = 200;

pub const DEFAULT_PER_PAGE: u32 = MAX_PER_PAGE;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Everything one extraction run needs
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Venue ISSN, e.g. `0028-0836`
    pub issn: String,

    pub from_date: NaiveDate,

    pub to_date: NaiveDate,

    /// Contact address sent as `mailto` on every request
    pub mailto: Option<String>,

    /// Directory the tables are written to; created if missing
    pub output_dir: PathBuf,

    pub base_url: String,

    pub per_page: u32,

    /// Per-request timeout
    pub timeout_secs: u64,

    pub retry: RetryPolicy,

    /// Query referenced and citing works for every primary work
    pub include_citations: bool,

    pub show_progress: bool,
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        validate_issn(&self.issn)?;

        if self.from_date > self.to_date {
            return Err(ExtractError::config(format!(
                "from date {} is after to date {}",
                self.from_date, self.to_date
            )));
        }

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(ExtractError::config(format!(
                "per-page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }

        if self.base_url.trim().is_empty() {
            return Err(ExtractError::config("API base URL cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(ExtractError::config("Timeout must be greater than 0"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ExtractError::config("At least one request attempt is required"));
        }

        if let Some(mailto) = &self.mailto {
            if !mailto.contains('@') {
                return Err(ExtractError::config(format!(
                    "contact email '{}' is not an email address",
                    mailto
                )));
            }
        }

        Ok(())
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ExtractError::config(format!("{} '{}' is not a YYYY-MM-DD date: {}", field, value, e))
    })
}

/// Check the `NNNN-NNNC` shape of an ISSN (C is a digit or `X`)
fn validate_issn(issn: &str) -> Result<()> {
    let bytes = issn.as_bytes();
    let well_formed = bytes.len() == 9
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..8].iter().all(u8::is_ascii_digit)
        && (bytes[8].is_ascii_digit() || bytes[8] == b'X' || bytes[8] == b'x');

    if well_formed {
        Ok(())
    } else {
        Err(ExtractError::config(format!(
            "ISSN '{}' must look like 1234-567X",
            issn
        )))
    }
}

/// Builder for ExtractConfig
#[derive(Debug, Default)]
pub struct ExtractConfigBuilder {
    issn: Option<String>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    mailto: Option<String>,
    output_dir: Option<PathBuf>,
    base_url: Option<String>,
    per_page: Option<u32>,
    timeout_secs: Option<u64>,
    retry: Option<RetryPolicy>,
    include_citations: Option<bool>,
    show_progress: Option<bool>,
}

impl ExtractConfigBuilder {
    pub fn issn(mut self, issn: impl Into<String>) -> Self {
        self.issn = Some(issn.into());
        self
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }

    pub fn mailto(mut self, mailto: impl Into<String>) -> Self {
        self.mailto = Some(mailto.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn include_citations(mut self, include: bool) -> Self {
        self.include_citations = Some(include);
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = Some(show);
        self
    }

    /// Assemble and validate; missing ISSN or dates is a config error
    pub fn build(self) -> Result<ExtractConfig> {
        let config = ExtractConfig {
            issn: self
                .issn
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| ExtractError::config("ISSN is required"))?,
            from_date: self
                .from_date
                .ok_or_else(|| ExtractError::config("from date is required"))?,
            to_date: self
                .to_date
                .ok_or_else(|| ExtractError::config("to date is required"))?,
            mailto: self.mailto.filter(|s| !s.trim().is_empty()),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            retry: self.retry.unwrap_or_default(),
            include_citations: self.include_citations.unwrap_or(true),
            show_progress: self.show_progress.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
