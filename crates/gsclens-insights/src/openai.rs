//! Chat-completions client for `OpenAI`-compatible endpoints.

use std::time::Duration;

use gsclens_core::AppConfig;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::generator::{CompletionRequest, NarrativeGenerator};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Narrative generator backed by `POST {base}/chat/completions`.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Creates a client against the public API.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, model: &str) -> Result<Self, GeneratorError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (proxies, wiremock).
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Unavailable`] for a blank key or unparsable URL,
    /// [`GeneratorError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, GeneratorError> {
        if api_key.trim().is_empty() {
            return Err(GeneratorError::Unavailable("API key is blank".to_string()));
        }

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| GeneratorError::Unavailable(format!("invalid base URL '{base_url}': {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    /// Builds the client from application config.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Unavailable`] when `OPENAI_API_KEY` is unset or blank,
    /// plus anything [`OpenAiClient::with_base_url`] returns.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeneratorError> {
        let api_key = config
            .openai_api_key
            .as_deref()
            .filter(|_| config.narrative_configured())
            .ok_or_else(|| GeneratorError::Unavailable("OPENAI_API_KEY is not set".to_string()))?;
        Self::with_base_url(api_key, &config.openai_model, &config.openai_base_url)
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, GeneratorError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = request.user_prompt.len(),
            max_tokens = request.max_output_tokens,
            "requesting completion"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map_or_else(|_| text.trim().to_string(), |env| env.error.message);
            return Err(GeneratorError::Request(format!(
                "status {}: {message}",
                status.as_u16()
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GeneratorError::Request(format!("unreadable completion response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GeneratorError::Request("response contained no completion".to_string()))
    }
}

impl NarrativeGenerator for OpenAiClient {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, GeneratorError>> + Send {
        self.send(request)
    }
}
