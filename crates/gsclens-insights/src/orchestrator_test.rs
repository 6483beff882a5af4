use std::future::Future;
use std::sync::Mutex;

use chrono::NaiveDate;
use gsclens_analytics::NO_DATA;
use gsclens_core::{AppConfig, Environment, Record};

use super::*;
use crate::error::GeneratorError;

/// Returns a canned reply and records every request it receives.
struct StubGenerator {
    reply: Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubGenerator {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> CompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("generator was not called")
    }
}

impl NarrativeGenerator for StubGenerator {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, GeneratorError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.reply.clone().map_err(GeneratorError::Request);
        async move { reply }
    }
}

fn rec(day: u32, query: &str, clicks: u64, impressions: u64, ctr: f64, position: f64) -> Record {
    Record {
        date: NaiveDate::from_ymd_opt(2025, 1, day),
        query: Some(query.to_string()),
        page: Some(format!("https://example.com/{}", query.replace(' ', "-"))),
        clicks,
        impressions,
        ctr,
        position,
    }
}

fn sample() -> Dataset {
    Dataset::from_records(vec![
        rec(1, "buy nike shoes", 5, 50, 0.1, 2.0),
        rec(2, "running shoes", 3, 600, 0.005, 6.0),
        rec(3, "trail shoes", 9, 90, 0.1, 3.5),
    ])
}

fn fallback() -> ReportOrchestrator<StubGenerator> {
    ReportOrchestrator::new(None, NarrativeSettings::default())
}

#[tokio::test]
async fn fallback_returns_digest_and_suggestion() {
    let orchestrator = fallback();
    assert_eq!(orchestrator.mode(), Mode::Fallback);

    let text = orchestrator
        .custom_query(&sample(), "What happened?", None)
        .await;
    assert!(!text.is_empty());
    assert!(text.contains("Total clicks: 17"));
    assert!(text.ends_with(ENABLE_AI_SUGGESTION));
}

#[tokio::test]
async fn fallback_tolerates_empty_dataset() {
    let text = fallback()
        .custom_query(&Dataset::empty(), "anything", None)
        .await;
    assert!(text.starts_with(NO_DATA));
    assert!(text.contains(ENABLE_AI_SUGGESTION));
}

#[tokio::test]
async fn ai_mode_returns_generator_text_verbatim() {
    let settings = NarrativeSettings {
        max_output_tokens: 800,
        temperature: 0.2,
    };
    let orchestrator = ReportOrchestrator::new(Some(StubGenerator::replying("All good.")), settings);
    assert_eq!(orchestrator.mode(), Mode::AiAvailable);

    let context = serde_json::json!({ "segment": "blog" });
    let text = orchestrator
        .custom_query(&sample(), "How are we doing?", Some(&context))
        .await;
    assert_eq!(text, "All good.");

    let request = orchestrator
        .generator
        .as_ref()
        .map(StubGenerator::last_request)
        .unwrap();
    assert_eq!(request.system_instructions, SYSTEM_INSTRUCTIONS);
    assert_eq!(request.max_output_tokens, 800);
    assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    assert!(request.user_prompt.contains("How are we doing?"));
    assert!(request.user_prompt.contains("Total clicks: 17"));
    assert!(request.user_prompt.contains("\"segment\": \"blog\""));
}

#[tokio::test]
async fn generator_failure_is_recovered_with_fallback() {
    let orchestrator = ReportOrchestrator::new(
        Some(StubGenerator::failing("quota exceeded")),
        NarrativeSettings::default(),
    );
    let text = orchestrator.traffic_trends(&sample()).await;
    assert!(text.starts_with("Error during AI analysis: "));
    assert!(text.contains("quota exceeded"));
    assert!(text.contains("Total clicks: 17"));
    assert!(text.ends_with(ENABLE_AI_SUGGESTION));
}

#[tokio::test]
async fn reconfigure_switches_mode() {
    let mut orchestrator = fallback();
    orchestrator.reconfigure(Some(StubGenerator::replying("ok")));
    assert_eq!(orchestrator.mode(), Mode::AiAvailable);
    assert_eq!(orchestrator.custom_query(&sample(), "q", None).await, "ok");

    orchestrator.reconfigure(None);
    assert_eq!(orchestrator.mode(), Mode::Fallback);
}

#[tokio::test]
async fn traffic_trends_reports_direction() {
    let text = fallback().traffic_trends(&sample()).await;
    assert!(text.contains("Daily trend: growing"));
}

#[tokio::test]
async fn keyword_opportunities_lists_low_ctr_queries() {
    let text = fallback()
        .keyword_opportunities(&sample(), &OpportunityCriteria::with_min_impressions(100))
        .await;
    assert!(text.contains("1. running shoes"));
    assert!(!text.contains("trail shoes"));
}

#[tokio::test]
async fn content_performance_ranks_pages() {
    let text = fallback().content_performance(&sample(), 2).await;
    assert!(text.contains("1. https://example.com/trail-shoes"));
    assert!(text.contains("2. https://example.com/buy-nike-shoes"));
    assert!(!text.contains("3. "));
}

#[tokio::test]
async fn period_comparison_uses_both_windows() {
    let previous = Dataset::from_records(vec![rec(1, "running shoes", 10, 100, 0.1, 4.0)]);
    let text = fallback().period_comparison(&sample(), &previous).await;
    assert!(text.contains("Clicks: 17 vs 10"));
    assert!(text.contains("Change in clicks: +70.0%"));
}

#[tokio::test]
async fn branded_analysis_splits_on_keywords() {
    let text = fallback()
        .branded_analysis(&sample(), &["Nike".to_string()])
        .await;
    assert!(text.contains("branded: 5 clicks"));
    assert!(text.contains("non_branded: 12 clicks"));

    let unconfigured = fallback().branded_analysis(&sample(), &[]).await;
    assert!(unconfigured.starts_with("No brand keywords configured"));
}

fn config(openai_api_key: Option<&str>) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        keywords_path: "./config/keywords.yaml".into(),
        default_property: None,
        gsc_access_token: None,
        gsc_base_url: "https://www.googleapis.com/webmasters/v3/".to_string(),
        gsc_request_timeout_secs: 30,
        gsc_row_limit: 5000,
        openai_api_key: openai_api_key.map(str::to_string),
        openai_base_url: "https://api.openai.com/v1/".to_string(),
        openai_model: "gpt-4".to_string(),
        narrative_max_tokens: 800,
        narrative_temperature: 0.2,
    }
}

#[test]
fn from_config_without_api_key_falls_back() {
    assert_eq!(ReportOrchestrator::from_config(&config(None)).mode(), Mode::Fallback);
    assert_eq!(
        ReportOrchestrator::from_config(&config(Some("   "))).mode(),
        Mode::Fallback
    );
}

#[test]
fn from_config_with_api_key_enables_ai() {
    let orchestrator = ReportOrchestrator::from_config(&config(Some("sk-test")));
    assert_eq!(orchestrator.mode(), Mode::AiAvailable);
}
