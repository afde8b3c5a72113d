use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
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
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        or_default(var, default)
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let env = parse_environment(&or_default("GMBSCOUT_ENV", "development"))?;
    let log_level = or_default("GMBSCOUT_LOG_LEVEL", "info");
    let niches_path = PathBuf::from(or_default("GMBSCOUT_NICHES_PATH", "./config/niches.yaml"));
    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let location = or_default("GMBSCOUT_LOCATION", "Berlin, Germany");

    let sample_size = parse_usize("GMBSCOUT_SAMPLE_SIZE", "30")?;
    let max_per_category = parse_usize("GMBSCOUT_MAX_PER_CATEGORY", "20")?;
    let request_timeout_secs = parse_u64("GMBSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("GMBSCOUT_INTER_REQUEST_DELAY_MS", "500")?;
    let max_retries = parse_u32("GMBSCOUT_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("GMBSCOUT_RETRY_BACKOFF_BASE_MS", "1000")?;
    let max_concurrent_niches = parse_usize("GMBSCOUT_MAX_CONCURRENT_NICHES", "1")?;

    let window_min = parse_u8("GMBSCOUT_WINDOW_MIN", "30")?;
    let window_max = parse_u8("GMBSCOUT_WINDOW_MAX", "70")?;
    if window_max > 100 {
        return Err(invalid(
            "GMBSCOUT_WINDOW_MAX",
            format!("{window_max} exceeds the maximum score of 100"),
        ));
    }
    if window_min > window_max {
        return Err(invalid(
            "GMBSCOUT_WINDOW_MIN",
            format!("{window_min} is greater than GMBSCOUT_WINDOW_MAX ({window_max})"),
        ));
    }

    if sample_size == 0 {
        return Err(invalid("GMBSCOUT_SAMPLE_SIZE", "must be at least 1".to_string()));
    }

    Ok(AppConfig {
        env,
        log_level,
        niches_path,
        places_api_key,
        location,
        sample_size,
        max_per_category,
        request_timeout_secs,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_ms,
        max_concurrent_niches,
        window_min,
        window_max,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GMBSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
