use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, "wwtp-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_params_then_key() {
    let client = test_client("https://maps.googleapis.com");
    let url = client
        .build_url(DETAILS_PATH, &[("place_id", "ChIJ1")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.googleapis.com/maps/api/place/details/json?place_id=ChIJ1&key=test-key"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("http://localhost:8080/proxy/");
    let url = client.build_url(NEARBY_SEARCH_PATH, &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/proxy/maps/api/place/nearbysearch/json?key=test-key"
    );
}

#[test]
fn build_url_encodes_keyword() {
    let client = test_client("https://maps.googleapis.com");
    let url = client
        .build_url(NEARBY_SEARCH_PATH, &[("keyword", "sewage treatment plant")])
        .unwrap();
    assert!(
        url.as_str().contains("keyword=sewage+treatment+plant"),
        "keyword should be form-encoded: {url}"
    );
}

#[test]
fn check_status_accepts_zero_results() {
    assert!(check_status("OK", None).is_ok());
    assert!(check_status("ZERO_RESULTS", None).is_ok());
}

#[test]
fn check_status_surfaces_provider_message() {
    let denied = "The provided API key is invalid.";
    let err = check_status("REQUEST_DENIED", Some(denied)).unwrap_err();
    assert!(matches!(
        err,
        PlacesError::ApiStatus { ref status, ref message }
            if status == "REQUEST_DENIED" && message.as_deref() == Some(denied)
    ));
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PlacesClient::with_base_url("k", 30, "ua", "not a url");
    assert!(matches!(result, Err(PlacesError::InvalidBaseUrl(_))));
}
