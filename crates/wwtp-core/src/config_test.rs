use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_MAPS_API_KEY", "maps-key");
    m.insert("GEMINI_API_KEY", "gemini-key");
    m
}

#[test]
fn build_app_config_fails_without_maps_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_MAPS_API_KEY"),
        "expected MissingEnvVar(GOOGLE_MAPS_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_gemini_key() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("GOOGLE_MAPS_API_KEY", "maps-key");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"),
        "expected MissingEnvVar(GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn blank_required_var_counts_as_missing() {
    let mut map = full_env();
    map.insert("GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
    assert_eq!(cfg.google_maps_api_key, "maps-key");
    assert_eq!(cfg.gemini_api_key, "gemini-key");
    assert_eq!(cfg.gemini_model, "gemini-1.5-flash");
    assert_eq!(cfg.maps_base_url, "https://maps.googleapis.com");
    assert_eq!(
        cfg.gemini_base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.call_timeout_secs, 90);
    assert_eq!(cfg.page_delay_ms, 2000);
    assert_eq!(cfg.max_in_flight, 1);
    assert_eq!(cfg.places_max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
    assert_eq!(cfg.user_agent, "wwtp-finder/0.1 (facility-discovery)");
    assert_eq!(
        cfg.search_keywords,
        vec![
            "wastewater treatment plant",
            "sewage treatment plant",
            "water treatment facility",
            "WWTP",
            "STP",
        ]
    );
}

#[test]
fn page_delay_override() {
    let mut map = full_env();
    map.insert("WWTP_PAGE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_delay_ms, 0);
}

#[test]
fn page_delay_invalid() {
    let mut map = full_env();
    map.insert("WWTP_PAGE_DELAY_MS", "two seconds");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WWTP_PAGE_DELAY_MS"),
        "expected InvalidEnvVar(WWTP_PAGE_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn zero_call_timeout_is_rejected() {
    let mut map = full_env();
    map.insert("WWTP_CALL_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WWTP_CALL_TIMEOUT_SECS"),
        "expected InvalidEnvVar(WWTP_CALL_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn zero_request_timeout_is_rejected() {
    let mut map = full_env();
    map.insert("WWTP_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WWTP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(WWTP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn call_timeout_override() {
    let mut map = full_env();
    map.insert("WWTP_CALL_TIMEOUT_SECS", "1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.call_timeout_secs, 1);
}

#[test]
fn max_in_flight_zero_is_raised_to_one() {
    let mut map = full_env();
    map.insert("WWTP_MAX_IN_FLIGHT", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_in_flight, 1);
}

#[test]
fn max_in_flight_override() {
    let mut map = full_env();
    map.insert("WWTP_MAX_IN_FLIGHT", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_in_flight, 4);
}

#[test]
fn keywords_override_keeps_order_and_drops_blanks() {
    let mut map = full_env();
    map.insert("WWTP_SEARCH_KEYWORDS", " STP , ,effluent plant,");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_keywords, vec!["STP", "effluent plant"]);
}

#[test]
fn keywords_override_must_not_be_empty() {
    let mut map = full_env();
    map.insert("WWTP_SEARCH_KEYWORDS", " , ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WWTP_SEARCH_KEYWORDS")
    );
}

#[test]
fn debug_redacts_api_keys() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("maps-key"));
    assert!(!rendered.contains("gemini-key"));
    assert!(rendered.contains("[redacted]"));
}
