//! Biblio Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the biblio workspace.
//!
//! # Overview
//!
//! - **Types**: Normalized table row shapes and the [`types::TableRow`] descriptor trait
//! - **Checksums**: SHA-256 digests of rendered tables
//! - **Logging**: Centralized `tracing` setup
//!
//! # Example
//!
//! ```no_run
//! use biblio_common::types::{build_table, AuthorRow};
//!
//! let rows = vec![AuthorRow {
//!     id: "A1".to_string(),
//!     name: Some("Ada Lovelace".to_string()),
//!     affiliation: None,
//! }];
//! let table = build_table(rows);
//! let csv = table.to_csv_bytes().unwrap();
//! assert!(csv.starts_with(b"id,name,affiliation"));
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{BiblioError, Result};
