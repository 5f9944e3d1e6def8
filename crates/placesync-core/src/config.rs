use crate::app_config::{AppConfig, Environment, ProviderKind};
use crate::ConfigError;

/// Google Places caps `maxResultCount` at 20.
const MAX_RESULT_COUNT_LIMIT: u32 = 20;

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PLACESYNC_ENV", "development"))?;
    let log_level = or_default("PLACESYNC_LOG_LEVEL", env.default_log_level());
    let provider = parse_provider(&or_default("PLACESYNC_PROVIDER", "none"))?;

    let kakao_api_key = lookup("KAKAO_REST_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let google_places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    match provider {
        ProviderKind::Keyword if kakao_api_key.is_none() => {
            return Err(ConfigError::MissingEnvVar("KAKAO_REST_API_KEY".to_string()));
        }
        ProviderKind::Text if google_places_api_key.is_none() => {
            return Err(ConfigError::MissingEnvVar(
                "GOOGLE_PLACES_API_KEY".to_string(),
            ));
        }
        _ => {}
    }

    let provider_timeout_secs = parse_u64("PLACESYNC_PROVIDER_TIMEOUT_SECS", "30")?;
    let search_language = or_default("PLACESYNC_SEARCH_LANGUAGE", "ko");

    let max_result_count = parse_u32("PLACESYNC_MAX_RESULT_COUNT", "15")?;
    if max_result_count == 0 || max_result_count > MAX_RESULT_COUNT_LIMIT {
        return Err(invalid(
            "PLACESYNC_MAX_RESULT_COUNT",
            format!("must be between 1 and {MAX_RESULT_COUNT_LIMIT}, got {max_result_count}"),
        ));
    }

    let debounce_ms = parse_u64("PLACESYNC_DEBOUNCE_MS", "300")?;
    let recent_queries_capacity = parse_usize("PLACESYNC_RECENT_QUERIES", "10")?;

    let page_size = parse_usize("PLACESYNC_PAGE_SIZE", "10")?;
    if page_size == 0 {
        return Err(invalid("PLACESYNC_PAGE_SIZE", "must be at least 1".to_string()));
    }

    Ok(AppConfig {
        env,
        log_level,
        provider,
        kakao_api_key,
        google_places_api_key,
        provider_timeout_secs,
        search_language,
        max_result_count,
        debounce_ms,
        recent_queries_capacity,
        page_size,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACESYNC_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_provider(s: &str) -> Result<ProviderKind, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "keyword" | "kakao" => Ok(ProviderKind::Keyword),
        "text" | "google" => Ok(ProviderKind::Text),
        "none" | "" => Ok(ProviderKind::Disabled),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACESYNC_PROVIDER".to_string(),
            reason: format!("expected keyword, text, or none; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
