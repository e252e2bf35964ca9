//! OpenAlex works API
//!
//! - **client**: page-walking HTTP client
//! - **filter**: the venue and citation filter expressions
//! - **models**: typed response records
//! - **retry**: backoff policy for transient failures

pub mod client;
pub mod filter;
pub mod models;
pub mod retry;

pub use client::OpenAlexClient;
pub use filter::WorkFilter;
pub use models::{Authorship, Work, WorksPage};
pub use retry::RetryPolicy;
