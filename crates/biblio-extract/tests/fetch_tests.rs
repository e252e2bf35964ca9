//! Fetcher tests against a mock OpenAlex server
//!
//! - Pagination covers the reported total exactly
//! - Transient failures are retried up to the attempt cap
//! - Client errors and malformed bodies fail on the first attempt

mod common;

use biblio_extract::openalex::WorkFilter;
use biblio_extract::ExtractError;
use common::{client, page_json, work_json, PagedWorks};
use proptest::prelude::*;
use std::collections::HashSet;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn citing_w1() -> WorkFilter {
    WorkFilter::Citing("W1".into())
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

/// Fetch from a paging server and return (unique ids, records, requests)
async fn fetch_from_paging_server(total: usize, per_page: u32) -> (usize, usize, usize) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(PagedWorks { total })
        .mount(&server)
        .await;

    let works = client(&server.uri())
        .fetch_works(&citing_w1(), per_page)
        .await
        .unwrap();

    let unique: HashSet<&str> = works.iter().map(|w| w.id.as_str()).collect();
    (unique.len(), works.len(), request_count(&server).await)
}

#[tokio::test]
async fn test_exact_page_multiple_stops_without_extra_request() {
    let (unique, records, requests) = fetch_from_paging_server(4, 2).await;
    assert_eq!(unique, 4);
    assert_eq!(records, 4);
    assert_eq!(requests, 2);
}

#[tokio::test]
async fn test_partial_last_page() {
    let (unique, records, requests) = fetch_from_paging_server(5, 2).await;
    assert_eq!(unique, 5);
    assert_eq!(records, 5);
    assert_eq!(requests, 3);
}

#[tokio::test]
async fn test_empty_result_set_takes_one_request() {
    let (unique, records, requests) = fetch_from_paging_server(0, 25).await;
    assert_eq!(unique, 0);
    assert_eq!(records, 0);
    assert_eq!(requests, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_pagination_returns_every_record_once(total in 0usize..60, per_page in 1u32..12) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (unique, records, requests) =
            runtime.block_on(fetch_from_paging_server(total, per_page));

        let expected_requests = total.div_ceil(per_page as usize).max(1);
        prop_assert_eq!(unique, total);
        prop_assert_eq!(records, total);
        prop_assert_eq!(requests, expected_requests);
    }
}

#[tokio::test]
async fn test_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("page", "1"))
        .and(query_param("per-page", "200"))
        .and(query_param("filter", "cites:W1,primary_location.source.type:journal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![work_json("W2")], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let works = client(&server.uri())
        .fetch_works(&citing_w1(), 200)
        .await
        .unwrap();
    assert_eq!(works.len(), 1);
}

#[tokio::test]
async fn test_empty_page_before_total_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![work_json("W1"), work_json("W2")], 10)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 10)))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .fetch_works(&citing_w1(), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Pagination(_)), "got {err}");
}

/// Server failing with 503 `failures` times, then serving one work
async fn flaky_server(failures: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(failures)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![work_json("W7")], 1)))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_transient_failures_below_cap_recover() {
    for failures in 1..5 {
        let server = flaky_server(failures).await;

        let works = client(&server.uri())
            .fetch_works(&citing_w1(), 25)
            .await
            .unwrap();

        assert_eq!(works.len(), 1);
        assert_eq!(request_count(&server).await, failures as usize + 1);
    }
}

#[tokio::test]
async fn test_transient_failures_at_cap_are_fatal() {
    let server = flaky_server(5).await;

    let err = client(&server.uri())
        .fetch_works(&citing_w1(), 25)
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::RetriesExhausted { attempts: 5, .. }), "got {err}");
    assert_eq!(request_count(&server).await, 5);
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .mount(&server)
        .await;

    let works = client(&server.uri())
        .fetch_works(&citing_w1(), 25)
        .await
        .unwrap();
    assert!(works.is_empty());
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "Invalid query parameters error." })),
        )
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .fetch_works(&citing_w1(), 25)
        .await
        .unwrap_err();

    match err {
        ExtractError::Status { status, message, .. } => {
            assert_eq!(status, 400);
            assert!(message.contains("Invalid query"));
        },
        other => panic!("expected status error, got {other}"),
    }
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_malformed_body_is_a_data_shape_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"results": [{"title": "no id"}], "meta": {"count": 1}}"#),
        )
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .fetch_works(&citing_w1(), 25)
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::DataShape(_)), "got {err}");
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_unreachable_server_exhausts_retries() {
    // Nothing listens on the discard port
    let err = client("http://127.0.0.1:9")
        .fetch_works(&citing_w1(), 25)
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::RetriesExhausted { attempts: 5, .. }), "got {err}");
}
