//! Integration tests for CitySearchClient using wiremock.

use std::time::Duration;

use cityweather_core::RetryConfig;
use cityweather_geo::{CitySearchClient, GeoError, SearchQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DATASET: &str = "geonames-all-cities-with-a-population-1000";

fn test_record(id: &str, name: &str, country: &str, timezone: &str) -> serde_json::Value {
    serde_json::json!({
        "datasetid": DATASET,
        "recordid": id,
        "fields": {
            "name": name,
            "cou_name_en": country,
            "timezone": timezone,
            "population": 12000,
            "coordinates": [48.85, 2.35]
        }
    })
}

fn client_for(server: &MockServer, max_retries: u32) -> CitySearchClient {
    CitySearchClient::new(
        &format!("{}/api/records/1.0/search/", server.uri()),
        DATASET,
        Duration::from_secs(5),
    )
    .unwrap()
    .with_retry(RetryConfig::new(max_retries, 1, 5))
}

#[tokio::test]
async fn test_search_sends_term_rows_and_offset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .and(query_param("dataset", DATASET))
        .and(query_param("q", "paris"))
        .and(query_param("rows", "20"))
        .and(query_param("start", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 75,
            "records": [
                test_record("r1", "Paris", "France", "Europe/Paris"),
                test_record("r2", "Paris", "United States", "America/Chicago"),
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 0);
    let page = client.search(&SearchQuery::new("paris", 3, 20)).await.unwrap();

    assert_eq!(page.records.len(), 2);
    assert_eq!(page.total_hits, 75);
    assert_eq!(page.offset, 40);
    assert_eq!(page.records[0].name, "Paris");
    assert_eq!(page.records[0].country, "France");
    assert_eq!(page.records[1].timezone, "America/Chicago");
    assert_eq!(page.records[0].population, Some(12000));
    assert!(page.has_more());
}

#[tokio::test]
async fn test_empty_term_lists_everything() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .and(query_param("q", ""))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 140000,
            "records": [test_record("r1", "Tokyo", "Japan", "Asia/Tokyo")]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 0);
    let page = client.search(&SearchQuery::new("", 1, 20)).await.unwrap();

    assert_eq!(page.records[0].name, "Tokyo");
    assert!(page.has_more());
}

#[tokio::test]
async fn test_empty_page_ends_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 0,
            "records": []
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 0);
    let page = client.search(&SearchQuery::new("zzzzqqq", 1, 20)).await.unwrap();

    assert!(page.records.is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_bad_request_is_invalid_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errorcode": 10002,
            "error": "Query syntax error"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 2);
    let err = client
        .search(&SearchQuery::new("a AND (", 1, 20))
        .await
        .unwrap_err();

    match err {
        GeoError::InvalidQuery(msg) => assert_eq!(msg, "Query syntax error"),
        other => unreachable!("expected InvalidQuery, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 0);
    let err = client.search(&SearchQuery::new("x", 1, 20)).await.unwrap_err();

    assert!(matches!(err, GeoError::RateLimited(12)));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 0);
    let err = client.search(&SearchQuery::new("x", 1, 20)).await.unwrap_err();

    assert!(matches!(err, GeoError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_retry_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 1,
            "records": [test_record("r1", "Oslo", "Norway", "Europe/Oslo")]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 2);
    let page = client.search(&SearchQuery::new("oslo", 1, 20)).await.unwrap();

    assert_eq!(page.records[0].name, "Oslo");
}

#[tokio::test]
async fn test_zero_rows_rejected_locally() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 0);

    let err = client.search(&SearchQuery::new("x", 1, 0)).await.unwrap_err();
    assert!(matches!(err, GeoError::InvalidQuery(_)));
}
