#[derive(Clone)]
pub struct AppConfig {
    pub google_maps_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub maps_base_url: String,
    pub gemini_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub call_timeout_secs: u64,
    pub page_delay_ms: u64,
    pub max_in_flight: usize,
    pub places_max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub user_agent: String,
    pub search_keywords: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_maps_api_key", &"[redacted]")
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("maps_base_url", &self.maps_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("max_in_flight", &self.max_in_flight)
            .field("places_max_retries", &self.places_max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("user_agent", &self.user_agent)
            .field("search_keywords", &self.search_keywords)
            .finish()
    }
}
