//! Shared fixtures for the integration tests

#![allow(dead_code)]

use biblio_extract::openalex::{OpenAlexClient, RetryPolicy};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::{Request, Respond, ResponseTemplate};

/// Retry schedule with millisecond waits
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::default().with_delays(
        Duration::from_millis(5),
        Duration::from_millis(5),
        Duration::from_millis(20),
    )
}

pub fn client(base_url: &str) -> OpenAlexClient {
    OpenAlexClient::new(base_url, None, Duration::from_secs(10), fast_retry())
        .expect("client should build")
}

/// Minimal work record with the given short id
pub fn work_json(id: &str) -> Value {
    json!({ "id": format!("https://openalex.org/{}", id) })
}

pub fn page_json(results: Vec<Value>, count: usize) -> Value {
    json!({ "results": results, "meta": { "count": count, "page": 1, "per_page": 25 } })
}

/// Serves `total` synthetic works, honoring `page` and `per-page`
pub struct PagedWorks {
    pub total: usize,
}

impl Respond for PagedWorks {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let params: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let page: usize = params
            .get("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let per_page: usize = params
            .get("per-page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(25);

        let start = (page - 1) * per_page;
        let end = (start + per_page).min(self.total);
        let results: Vec<Value> = (start..end)
            .map(|i| work_json(&format!("W{}", i + 1)))
            .collect();

        ResponseTemplate::new(200).set_body_json(page_json(results, self.total))
    }
}
