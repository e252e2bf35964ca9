//! HTTP client for the OpenAlex works endpoint
//!
//! Walks page-numbered results for a [`WorkFilter`], retrying each page
//! request independently under the configured [`RetryPolicy`].

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::openalex::{RetryPolicy, Work, WorkFilter, WorksPage};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("biblio-extract/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body kept in [`ExtractError::Status`]
const MAX_ERROR_BODY: usize = 300;

/// API client for OpenAlex
pub struct OpenAlexClient {
    client: Client,
    base_url: String,
    mailto: Option<String>,
    retry: RetryPolicy,
}

impl OpenAlexClient {
    pub fn new(
        base_url: impl Into<String>,
        mailto: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mailto,
            retry,
        })
    }

    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.mailto.clone(),
            Duration::from_secs(config.timeout_secs),
            config.retry,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every work matching `filter`.
    ///
    /// Pages are requested from 1 until `page * per_page` covers the
    /// reported count. An empty page before that point is an error rather
    /// than a silent truncation.
    pub async fn fetch_works(&self, filter: &WorkFilter, per_page: u32) -> Result<Vec<Work>> {
        if per_page == 0 {
            return Err(ExtractError::config("per-page must be at least 1"));
        }

        let mut works = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch = self.fetch_page(filter, page, per_page).await?;
            let total = batch.meta.count;
            let received = batch.results.len();
            works.extend(batch.results);

            debug!(filter = %filter, page, received, total, "Fetched page");

            if u64::from(page) * u64::from(per_page) >= total {
                if works.len() as u64 != total {
                    warn!(
                        filter = %filter,
                        collected = works.len(),
                        total,
                        "Collected record count differs from reported total"
                    );
                }
                break;
            }

            if received == 0 {
                return Err(ExtractError::pagination(format!(
                    "page {} of '{}' was empty after {} of {} records",
                    page,
                    filter,
                    works.len(),
                    total
                )));
            }

            page += 1;
        }

        info!(filter = %filter, count = works.len(), pages = page, "Fetched works");
        Ok(works)
    }

    /// Fetch one page, with retries
    pub async fn fetch_page(
        &self,
        filter: &WorkFilter,
        page: u32,
        per_page: u32,
    ) -> Result<WorksPage> {
        let label = format!("{} page {}", filter, page);
        self.retry
            .run(&label, || self.request_page(filter, page, per_page))
            .await
    }

    /// Single attempt at one page
    async fn request_page(
        &self,
        filter: &WorkFilter,
        page: u32,
        per_page: u32,
    ) -> Result<WorksPage> {
        let url = format!("{}/works", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per-page", per_page.to_string()),
            ("filter", filter.expression()),
        ];
        if let Some(sort) = filter.sort() {
            params.push(("sort", sort.to_string()));
        }
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let request_url = response.url().to_string();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| {
                ExtractError::data_shape(format!("'{}' page {}: {}", filter, page, e))
            });
        }

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExtractError::Unavailable {
                status: status.as_u16(),
                url: request_url,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ExtractError::Status {
            status: status.as_u16(),
            url: request_url,
            message: truncate(body.trim(), MAX_ERROR_BODY),
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_base_url() {
        let client = OpenAlexClient::new(
            "http://localhost:8000/",
            None,
            Duration::from_secs(5),
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééé", 2), "éé...");
    }

    #[tokio::test]
    async fn test_zero_per_page_is_rejected() {
        let client = OpenAlexClient::new(
            "http://localhost:9",
            None,
            Duration::from_secs(1),
            RetryPolicy::default(),
        )
        .unwrap();
        let err = client
            .fetch_works(&WorkFilter::Citing("W1".into()), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }
}
