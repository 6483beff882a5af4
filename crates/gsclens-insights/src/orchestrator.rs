//! Report orchestration: digest, then narrate or fall back.
//!
//! The orchestrator is in one of two modes, chosen at construction from
//! whether a generator is supplied. In [`Mode::AiAvailable`] each analysis
//! builds a prompt around its digest and returns the generator's text. In
//! [`Mode::Fallback`] it returns the digest plus a hint for enabling AI.
//! A failed completion never aborts an analysis; the error is reported in
//! front of the fallback text.

use std::fmt::Write as _;

use gsclens_analytics::{
    aggregate_digest, brand_digest, classify_branded, compare_periods, daily_series,
    daily_trend_direction, dataset_digest, find_opportunities, group_and_reduce,
    opportunity_digest, top_n, trend_digest, GroupBy, OpportunityCriteria, SortKey,
};
use gsclens_core::{AppConfig, Dataset};

use crate::generator::{CompletionRequest, NarrativeGenerator};
use crate::openai::OpenAiClient;
use crate::prompt::{build_prompt, ENABLE_AI_SUGGESTION, SYSTEM_INSTRUCTIONS};

/// Whether narratives come from the generator or from the digest alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AiAvailable,
    Fallback,
}

/// Sampling limits passed to every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrativeSettings {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: 1500,
            temperature: 0.7,
        }
    }
}

impl NarrativeSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_output_tokens: config.narrative_max_tokens,
            temperature: config.narrative_temperature,
        }
    }
}

pub struct ReportOrchestrator<G> {
    generator: Option<G>,
    settings: NarrativeSettings,
}

impl ReportOrchestrator<OpenAiClient> {
    /// Picks the mode from config: AI when an `OpenAiClient` can be built,
    /// fallback otherwise.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let generator = match OpenAiClient::from_config(config) {
            Ok(client) => {
                tracing::info!(model = %config.openai_model, "AI analysis enabled");
                Some(client)
            }
            Err(e) => {
                tracing::info!(reason = %e, "AI analysis disabled, using deterministic summaries");
                None
            }
        };
        Self::new(generator, NarrativeSettings::from_config(config))
    }
}

impl<G: NarrativeGenerator> ReportOrchestrator<G> {
    #[must_use]
    pub fn new(generator: Option<G>, settings: NarrativeSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.generator.is_some() {
            Mode::AiAvailable
        } else {
            Mode::Fallback
        }
    }

    /// Swaps the generator. `None` switches to fallback mode.
    pub fn reconfigure(&mut self, generator: Option<G>) {
        self.generator = generator;
        tracing::info!(mode = ?self.mode(), "report orchestrator reconfigured");
    }

    /// Turns a digest into the final analysis text.
    pub async fn narrate(
        &self,
        digest: &str,
        question: &str,
        context: Option<&serde_json::Value>,
    ) -> String {
        let fallback = format!("{digest}\n\n{ENABLE_AI_SUGGESTION}");
        let Some(generator) = &self.generator else {
            return fallback;
        };

        let request = CompletionRequest {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
            user_prompt: build_prompt(digest, question, context),
            max_output_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
        };

        match generator.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "AI analysis failed, returning deterministic summary");
                format!("Error during AI analysis: {e}\n\n{fallback}")
            }
        }
    }

    /// Daily traffic over the window with its trend direction.
    pub async fn traffic_trends(&self, by_date: &Dataset) -> String {
        let reading = daily_trend_direction(&daily_series(by_date));
        let mut digest = dataset_digest(by_date);
        if !by_date.is_empty() {
            if reading.insufficient_data() {
                digest.push_str("\nDaily trend: insufficient data");
            } else {
                let _ = write!(digest, "\nDaily trend: {}", reading.direction);
            }
        }
        self.narrate(
            &digest,
            "Analyse the traffic trends in this period. Which patterns stand out and what is driving them?",
            None,
        )
        .await
    }

    /// Queries with high impressions, weak position and low CTR.
    pub async fn keyword_opportunities(
        &self,
        by_query: &Dataset,
        criteria: &OpportunityCriteria,
    ) -> String {
        let rows = find_opportunities(by_query, criteria);
        let digest = opportunity_digest(&rows, criteria.ctr_threshold);
        self.narrate(
            &digest,
            "Which of these queries should we optimise first, and how can we raise their CTR?",
            None,
        )
        .await
    }

    /// Top pages by clicks.
    pub async fn content_performance(&self, by_page: &Dataset, limit: usize) -> String {
        let pages = top_n(&group_and_reduce(by_page, GroupBy::Page), limit, SortKey::Clicks);
        let digest = aggregate_digest("Top pages by clicks", &pages);
        self.narrate(
            &digest,
            "Evaluate the performance of these pages. Which content works, and which pages need improvement?",
            None,
        )
        .await
    }

    /// Current window against the preceding one.
    pub async fn period_comparison(&self, current: &Dataset, previous: &Dataset) -> String {
        let result = compare_periods(current, previous);
        let digest = trend_digest(&result, current);
        self.narrate(
            &digest,
            "Compare the two periods. What changed, why, and what should we do about it?",
            None,
        )
        .await
    }

    /// Branded versus non-branded traffic.
    pub async fn branded_analysis(&self, by_query: &Dataset, brand_keywords: &[String]) -> String {
        let digest = if brand_keywords.is_empty() {
            format!(
                "No brand keywords configured; all traffic is counted as non-branded.\n{}",
                brand_digest(&classify_branded(by_query, brand_keywords))
            )
        } else {
            brand_digest(&classify_branded(by_query, brand_keywords))
        };
        self.narrate(
            &digest,
            "How is branded traffic performing against non-branded traffic, and how can we grow each?",
            None,
        )
        .await
    }

    /// Free-form question over a general digest of the dataset.
    pub async fn custom_query(
        &self,
        dataset: &Dataset,
        question: &str,
        context: Option<&serde_json::Value>,
    ) -> String {
        let digest = dataset_digest(dataset);
        self.narrate(&digest, question, context).await
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
