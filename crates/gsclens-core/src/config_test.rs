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

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GSCLENS_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.keywords_path.to_string_lossy(),
        "./config/keywords.yaml"
    );
    assert!(cfg.default_property.is_none());
    assert!(cfg.gsc_access_token.is_none());
    assert_eq!(cfg.gsc_base_url, "https://www.googleapis.com/webmasters/v3/");
    assert_eq!(cfg.gsc_request_timeout_secs, 30);
    assert_eq!(cfg.gsc_row_limit, 5000);
    assert!(cfg.openai_api_key.is_none());
    assert_eq!(cfg.openai_base_url, "https://api.openai.com/v1/");
    assert_eq!(cfg.openai_model, "gpt-4");
    assert_eq!(cfg.narrative_max_tokens, 1500);
    assert!((cfg.narrative_temperature - 0.7).abs() < f32::EPSILON);
    assert!(!cfg.narrative_configured());
}

#[test]
fn openai_key_enables_narrative() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "sk-test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.narrative_configured());
}

#[test]
fn blank_openai_key_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.openai_api_key.is_none());
    assert!(!cfg.narrative_configured());
}

#[test]
fn debug_redacts_credentials() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "sk-very-secret");
    map.insert("GSC_ACCESS_TOKEN", "ya29.secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("sk-very-secret"));
    assert!(!rendered.contains("ya29.secret-token"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn gsc_row_limit_override() {
    let mut map = HashMap::new();
    map.insert("GSC_ROW_LIMIT", "25000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.gsc_row_limit, 25_000);
}

#[test]
fn gsc_row_limit_out_of_range() {
    let mut map = HashMap::new();
    map.insert("GSC_ROW_LIMIT", "30000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSC_ROW_LIMIT"),
        "expected InvalidEnvVar(GSC_ROW_LIMIT), got: {result:?}"
    );
}

#[test]
fn gsc_row_limit_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("GSC_ROW_LIMIT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn gsc_request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("GSC_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSC_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GSC_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn narrative_temperature_override() {
    let mut map = HashMap::new();
    map.insert("NARRATIVE_TEMPERATURE", "0.2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.narrative_temperature - 0.2).abs() < f32::EPSILON);
}

#[test]
fn narrative_temperature_out_of_range() {
    let mut map = HashMap::new();
    map.insert("NARRATIVE_TEMPERATURE", "3.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NARRATIVE_TEMPERATURE"),
        "expected InvalidEnvVar(NARRATIVE_TEMPERATURE), got: {result:?}"
    );
}

#[test]
fn narrative_max_tokens_invalid() {
    let mut map = HashMap::new();
    map.insert("NARRATIVE_MAX_TOKENS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NARRATIVE_MAX_TOKENS"),
        "expected InvalidEnvVar(NARRATIVE_MAX_TOKENS), got: {result:?}"
    );
}

#[test]
fn default_property_override() {
    let mut map = HashMap::new();
    map.insert("GSCLENS_DEFAULT_PROPERTY", "sc-domain:example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.default_property.as_deref(),
        Some("sc-domain:example.com")
    );
}

#[test]
fn invalid_environment_fails_build() {
    let mut map = HashMap::new();
    map.insert("GSCLENS_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSCLENS_ENV"));
}
