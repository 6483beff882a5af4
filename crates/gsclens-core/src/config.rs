use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_GSC_BASE_URL: &str = "https://www.googleapis.com/webmasters/v3/";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

/// Search Console caps a single `searchAnalytics` query at this many rows.
const MAX_ROW_LIMIT: u32 = 25_000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values are treated as unset so `KEY=` in a .env file disables a credential.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let parse_f32 = |var: &str, default: &str| -> Result<f32, ConfigError> {
        or_default(var, default)
            .parse::<f32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("GSCLENS_ENV", "development"))?;
    let log_level = or_default("GSCLENS_LOG_LEVEL", "info");
    let keywords_path = PathBuf::from(or_default(
        "GSCLENS_KEYWORDS_PATH",
        "./config/keywords.yaml",
    ));
    let default_property = optional("GSCLENS_DEFAULT_PROPERTY");

    let gsc_access_token = optional("GSC_ACCESS_TOKEN");
    let gsc_base_url = or_default("GSC_BASE_URL", DEFAULT_GSC_BASE_URL);
    let gsc_request_timeout_secs = parse_u64("GSC_REQUEST_TIMEOUT_SECS", "30")?;
    let gsc_row_limit = parse_u32("GSC_ROW_LIMIT", "5000")?;
    if gsc_row_limit == 0 || gsc_row_limit > MAX_ROW_LIMIT {
        return Err(invalid(
            "GSC_ROW_LIMIT",
            format!("must be between 1 and {MAX_ROW_LIMIT}, got {gsc_row_limit}"),
        ));
    }

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_base_url = or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
    let openai_model = or_default("OPENAI_MODEL", "gpt-4");
    let narrative_max_tokens = parse_u32("NARRATIVE_MAX_TOKENS", "1500")?;
    let narrative_temperature = parse_f32("NARRATIVE_TEMPERATURE", "0.7")?;
    if !(0.0..=2.0).contains(&narrative_temperature) {
        return Err(invalid(
            "NARRATIVE_TEMPERATURE",
            format!("must be between 0.0 and 2.0, got {narrative_temperature}"),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        keywords_path,
        default_property,
        gsc_access_token,
        gsc_base_url,
        gsc_request_timeout_secs,
        gsc_row_limit,
        openai_api_key,
        openai_base_url,
        openai_model,
        narrative_max_tokens,
        narrative_temperature,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GSCLENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
