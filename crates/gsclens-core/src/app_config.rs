use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub keywords_path: PathBuf,
    pub default_property: Option<String>,
    /// Bearer token issued by the external OAuth flow.
    pub gsc_access_token: Option<String>,
    pub gsc_base_url: String,
    pub gsc_request_timeout_secs: u64,
    pub gsc_row_limit: u32,
    /// When unset, narrative analyses run in fallback mode.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub narrative_max_tokens: u32,
    pub narrative_temperature: f32,
}

impl AppConfig {
    /// Returns `true` when a non-blank language-model API key is present.
    #[must_use]
    pub fn narrative_configured(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("keywords_path", &self.keywords_path)
            .field("default_property", &self.default_property)
            .field(
                "gsc_access_token",
                &self.gsc_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("gsc_base_url", &self.gsc_base_url)
            .field("gsc_request_timeout_secs", &self.gsc_request_timeout_secs)
            .field("gsc_row_limit", &self.gsc_row_limit)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("narrative_max_tokens", &self.narrative_max_tokens)
            .field("narrative_temperature", &self.narrative_temperature)
            .finish()
    }
}
