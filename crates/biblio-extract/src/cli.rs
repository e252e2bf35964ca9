//! Command-line arguments
//!
//! Every flag can also come from the environment (or a `.env` file loaded
//! by the binary), so `ISSN=... FROM=... TO=... biblio-extract` works.

use crate::config::{
    parse_date, ExtractConfig, DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR, DEFAULT_PER_PAGE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::{ExtractError, Result};
use crate::openalex::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "biblio-extract")]
#[command(
    author,
    version,
    about = "Extract a journal's works from OpenAlex into normalized CSV tables"
)]
pub struct Cli {
    /// Journal ISSN (e.g. 0028-0836)
    #[arg(long, env = "ISSN")]
    pub issn: Option<String>,

    /// First publication date, YYYY-MM-DD
    #[arg(long, env = "FROM")]
    pub from: Option<String>,

    /// Last publication date, YYYY-MM-DD
    #[arg(long, env = "TO")]
    pub to: Option<String>,

    /// Contact email sent with every request
    #[arg(long, env = "EMAIL")]
    pub email: Option<String>,

    /// Directory the CSV tables are written to
    #[arg(short, long, env = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// OpenAlex API base URL
    #[arg(long, env = "OPENALEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Results per page (1-200)
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Attempts per request before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Skip the referenced/citing queries (link tables are written empty)
    #[arg(long)]
    pub no_citations: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Turn parsed arguments into a validated configuration
    pub fn to_config(&self) -> Result<ExtractConfig> {
        let from = self
            .from
            .as_deref()
            .ok_or_else(|| ExtractError::config("from date is required (--from or FROM)"))?;
        let to = self
            .to
            .as_deref()
            .ok_or_else(|| ExtractError::config("to date is required (--to or TO)"))?;
        let issn = self
            .issn
            .clone()
            .ok_or_else(|| ExtractError::config("ISSN is required (--issn or ISSN)"))?;

        let mut builder = ExtractConfig::builder()
            .issn(issn)
            .from_date(parse_date("from date", from)?)
            .to_date(parse_date("to date", to)?)
            .output_dir(self.output.clone())
            .base_url(self.base_url.clone())
            .per_page(self.per_page)
            .timeout_secs(self.timeout_secs)
            .retry(RetryPolicy::default().with_max_attempts(self.max_attempts))
            .include_citations(!self.no_citations)
            .show_progress(!self.no_progress);

        if let Some(email) = &self.email {
            builder = builder.mailto(email.clone());
        }

        builder.build()
    }
}
