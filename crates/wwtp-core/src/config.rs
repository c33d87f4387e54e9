use crate::app_config::AppConfig;
use crate::ConfigError;

/// Keywords searched when `WWTP_SEARCH_KEYWORDS` is unset, in search order.
pub const DEFAULT_SEARCH_KEYWORDS: &[&str] = &[
    "wastewater treatment plant",
    "sewage treatment plant",
    "water treatment facility",
    "WWTP",
    "STP",
];

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_timeout_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least 1 second".to_string(),
            }),
            secs => Ok(secs),
        }
    };

    let google_maps_api_key = require("GOOGLE_MAPS_API_KEY")?;
    let gemini_api_key = require("GEMINI_API_KEY")?;

    let gemini_model = or_default("WWTP_GEMINI_MODEL", "gemini-1.5-flash");
    let maps_base_url = or_default("WWTP_MAPS_BASE_URL", "https://maps.googleapis.com");
    let gemini_base_url = or_default(
        "WWTP_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let log_level = or_default("WWTP_LOG_LEVEL", "info");

    let request_timeout_secs = parse_timeout_secs("WWTP_REQUEST_TIMEOUT_SECS", "30")?;
    let call_timeout_secs = parse_timeout_secs("WWTP_CALL_TIMEOUT_SECS", "90")?;
    let page_delay_ms = parse_u64("WWTP_PAGE_DELAY_MS", "2000")?;
    let max_in_flight = parse_usize("WWTP_MAX_IN_FLIGHT", "1")?.max(1);
    let places_max_retries = parse_u32("WWTP_PLACES_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("WWTP_RETRY_BACKOFF_BASE_SECS", "2")?;
    let user_agent = or_default("WWTP_USER_AGENT", "wwtp-finder/0.1 (facility-discovery)");

    let search_keywords = match lookup("WWTP_SEARCH_KEYWORDS") {
        Ok(raw) => parse_keywords(&raw)?,
        Err(_) => DEFAULT_SEARCH_KEYWORDS
            .iter()
            .map(|k| (*k).to_string())
            .collect(),
    };

    Ok(AppConfig {
        google_maps_api_key,
        gemini_api_key,
        gemini_model,
        maps_base_url,
        gemini_base_url,
        log_level,
        request_timeout_secs,
        call_timeout_secs,
        page_delay_ms,
        max_in_flight,
        places_max_retries,
        retry_backoff_base_secs,
        user_agent,
        search_keywords,
    })
}

/// Split a comma-separated keyword list, dropping blanks and keeping order.
fn parse_keywords(raw: &str) -> Result<Vec<String>, ConfigError> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    if keywords.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "WWTP_SEARCH_KEYWORDS".to_string(),
            reason: "must contain at least one keyword".to_string(),
        });
    }
    Ok(keywords)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
