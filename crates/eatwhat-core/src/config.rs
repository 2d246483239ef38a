use crate::app_config::{AppConfig, BaseConfig, Environment};
use crate::ConfigError;

/// Minimum spacing the places provider accepts between a page and its
/// continuation token request.
pub const MIN_PAGE_DELAY_MS: u64 = 2_000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
/// A missing places credential is reported here, once, rather than per request.
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

/// Load the configuration shared by every command, without the places
/// credential.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_base_config() -> Result<BaseConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_base_config(|key| std::env::var(key))
}

fn build_base_config<F>(lookup: F) -> Result<BaseConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let request_timeout_secs = or_default("EATWHAT_REQUEST_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "EATWHAT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: e.to_string(),
        })?;

    Ok(BaseConfig {
        log_level: or_default("EATWHAT_LOG_LEVEL", "info"),
        saved_api_url: or_default("EATWHAT_SAVED_API_URL", "http://127.0.0.1:3000"),
        settings_path: std::path::PathBuf::from(or_default(
            "EATWHAT_SETTINGS_PATH",
            "./config/settings.yaml",
        )),
        request_timeout_secs,
        user_agent: or_default("EATWHAT_USER_AGENT", "eatwhat/0.1"),
    })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let places_api_key = require("EATWHAT_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("EATWHAT_ENV", "development"))?;

    let bind_addr = parse_addr("EATWHAT_BIND_ADDR", "0.0.0.0:3000")?;
    let places_base_url = or_default("EATWHAT_PLACES_BASE_URL", "https://maps.googleapis.com");
    let BaseConfig {
        log_level,
        saved_api_url,
        settings_path,
        request_timeout_secs,
        user_agent,
    } = build_base_config(&lookup)?;
    let page_delay_ms = parse_u64("EATWHAT_PAGE_DELAY_MS", "2000")?;
    if page_delay_ms < MIN_PAGE_DELAY_MS {
        return Err(ConfigError::InvalidEnvVar {
            var: "EATWHAT_PAGE_DELAY_MS".to_string(),
            reason: format!("must be at least {MIN_PAGE_DELAY_MS} ms, got {page_delay_ms}"),
        });
    }
    let max_retries = parse_u32("EATWHAT_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("EATWHAT_RETRY_BACKOFF_BASE_MS", "1000")?;
    let geolocation_timeout_secs = parse_u64("EATWHAT_GEOLOCATION_TIMEOUT_SECS", "5")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        saved_api_url,
        settings_path,
        request_timeout_secs,
        user_agent,
        page_delay_ms,
        max_retries,
        retry_backoff_base_ms,
        geolocation_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EATWHAT_ENV".to_string(),
            reason: format!("expected development, test or production, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
