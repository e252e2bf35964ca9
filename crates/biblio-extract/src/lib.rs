//! Biblio Extract Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Pulls every work a journal published in a date range from the OpenAlex
//! works API, together with the works they cite and the works citing them,
//! and flattens the records into normalized CSV tables:
//!
//! `works`, `authors`, `institutions`, `works_authors`,
//! `works_authors_institutions`, `topics`, `yearly_citations`,
//! `referenced_works`, `citing_works`.
//!
//! # Example
//!
//! ```no_run
//! use biblio_extract::{config::ExtractConfig, config::parse_date, pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ExtractConfig::builder()
//!         .issn("0028-0836")
//!         .from_date(parse_date("from", "2020-01-01")?)
//!         .to_date(parse_date("to", "2020-12-31")?)
//!         .mailto("you@example.org")
//!         .output_dir("./data")
//!         .build()?;
//!
//!     let summary = pipeline::run(&config).await?;
//!     println!("{} tables written", summary.tables.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod normalize;
pub mod openalex;
pub mod output;
pub mod pipeline;
pub mod progress;

// Re-export commonly used types
pub use cli::Cli;
pub use error::{ExtractError, Result};
