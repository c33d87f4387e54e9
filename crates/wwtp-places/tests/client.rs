//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wwtp_core::Coordinate;
use wwtp_places::{PlacesClient, PlacesError};

const NEARBY: &str = "/maps/api/place/nearbysearch/json";
const DETAILS: &str = "/maps/api/place/details/json";

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 5, "wwtp-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn bengaluru() -> Coordinate {
    Coordinate::new(12.97, 77.59).unwrap()
}

fn place(id: &str, name: &str, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "place_id": id,
        "name": name,
        "geometry": { "location": { "lat": lat, "lng": lng } },
        "types": ["point_of_interest", "establishment"]
    })
}

#[tokio::test]
async fn nearby_search_returns_hits_and_token() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            place("A", "Koramangala STP", 12.93, 77.62),
            place("B", "Hebbal WWTP", 13.04, 77.59)
        ],
        "next_page_token": "TOKEN-2"
    });

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("location", "12.97,77.59"))
        .and(query_param("radius", "10000"))
        .and(query_param("keyword", "sewage treatment plant"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .nearby_search(bengaluru(), 10_000, "sewage treatment plant")
        .await
        .expect("should parse search page");

    assert_eq!(page.hits.len(), 2);
    assert_eq!(page.hits[0].provider_id, "A");
    assert_eq!(page.hits[1].name, "Hebbal WWTP");
    assert_eq!(page.next_page_token.as_deref(), Some("TOKEN-2"));
}

#[tokio::test]
async fn zero_results_is_an_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .nearby_search(bengaluru(), 500, "STP")
        .await
        .expect("ZERO_RESULTS is not an error");

    assert!(page.hits.is_empty());
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn next_page_uses_pagetoken_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("pagetoken", "TOKEN-2"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("C", "Third", 12.9, 77.5)]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .nearby_search_page("TOKEN-2")
        .await
        .expect("should parse follow-up page");

    assert_eq!(page.hits.len(), 1);
    assert_eq!(page.hits[0].provider_id, "C");
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn request_denied_is_an_api_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry_policy(3, 0);
    let result = client.nearby_search(bengaluru(), 1_000, "STP").await;

    assert!(
        matches!(result, Err(PlacesError::ApiStatus { ref status, .. }) if status == "REQUEST_DENIED"),
        "expected ApiStatus(REQUEST_DENIED), got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry_policy(2, 0);
    let result = client.nearby_search(bengaluru(), 1_000, "STP").await;

    assert!(matches!(
        result,
        Err(PlacesError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn error_display_does_not_leak_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .nearby_search(bengaluru(), 1_000, "STP")
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("test-key"), "leaked key: {err}");
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.nearby_search(bengaluru(), 1_000, "STP").await;

    assert!(matches!(result, Err(PlacesError::Deserialize { .. })));
}

#[tokio::test]
async fn place_address_returns_formatted_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAILS))
        .and(query_param("place_id", "A"))
        .and(query_param("fields", "formatted_address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": { "formatted_address": "1 Lake Rd, Bengaluru, Karnataka 560034, India" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let address = client.place_address("A").await.expect("should parse details");

    assert_eq!(
        address.as_deref(),
        Some("1 Lake Rd, Bengaluru, Karnataka 560034, India")
    );
}

#[tokio::test]
async fn place_address_missing_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DETAILS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "OK", "result": {}})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let address = client.place_address("A").await.expect("should parse details");

    assert!(address.is_none());
}
