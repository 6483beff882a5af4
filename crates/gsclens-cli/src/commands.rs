//! Subcommand handlers.
//!
//! Each handler fetches the breakdowns its analysis needs through the
//! Search Console client, runs the analysis and prints plain text to stdout.

use std::path::Path;

use chrono::NaiveDate;
use gsclens_analytics::{
    competitor_digest, competitor_report, executive_report, performance_summary,
    OpportunityCriteria,
};
use gsclens_core::{load_keywords, AppConfig, ConfigError, Dataset, Dimension, KeywordSets, QueryWindow};
use gsclens_insights::{suggested_questions, OpenAiClient, ReportOrchestrator};
use gsclens_search_console::{SearchAnalyticsRequest, SearchConsoleClient};

use crate::window::{resolve_property, WindowArgs};

/// Everything a handler needs, built once in `main`.
pub(crate) struct Context {
    pub config: AppConfig,
    pub today: NaiveDate,
    pub orchestrator: ReportOrchestrator<OpenAiClient>,
}

impl Context {
    /// Builds a Search Console client from the configured access token.
    ///
    /// # Errors
    ///
    /// Returns an error if `GSC_ACCESS_TOKEN` is unset or the client cannot
    /// be constructed.
    pub(crate) fn client(&self) -> anyhow::Result<SearchConsoleClient> {
        let token = self.config.gsc_access_token.as_deref().ok_or_else(|| {
            anyhow::anyhow!("GSC_ACCESS_TOKEN is not set; cannot query Search Console")
        })?;
        SearchConsoleClient::with_base_url(
            token,
            self.config.gsc_request_timeout_secs,
            &self.config.gsc_base_url,
        )
        .map_err(|e| anyhow::anyhow!("failed to build Search Console client: {e}"))
    }

    fn window(&self, args: &WindowArgs, dimensions: Vec<Dimension>) -> anyhow::Result<QueryWindow> {
        args.to_window(&self.config, self.today, dimensions)
    }

    async fn fetch(
        &self,
        client: &SearchConsoleClient,
        window: QueryWindow,
    ) -> anyhow::Result<Dataset> {
        let request = SearchAnalyticsRequest::new(window, self.config.gsc_row_limit);
        Ok(client.fetch_dataset(&request).await?)
    }

    async fn fetch_for(
        &self,
        args: &WindowArgs,
        dimensions: Vec<Dimension>,
    ) -> anyhow::Result<Dataset> {
        let client = self.client()?;
        let window = self.window(args, dimensions)?;
        self.fetch(&client, window).await
    }
}

/// Loads keyword sets, treating a missing file as empty sets.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or fails validation.
pub(crate) fn load_keywords_or_default(path: &Path) -> anyhow::Result<KeywordSets> {
    match load_keywords(path) {
        Ok(sets) => Ok(sets),
        Err(ConfigError::KeywordsFileIo { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::debug!(path = %path.display(), "keywords file not found, using empty sets");
            Ok(KeywordSets::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn run_properties(ctx: &Context) -> anyhow::Result<()> {
    let sites = ctx.client()?.list_properties().await?;
    if sites.is_empty() {
        println!("No properties available for this account.");
        return Ok(());
    }
    for site in sites {
        println!("{}\t{}", site.site_url, site.permission_level);
    }
    Ok(())
}

pub(crate) async fn run_sitemaps(ctx: &Context, property: Option<&str>) -> anyhow::Result<()> {
    let property = resolve_property(property, &ctx.config)?;
    let client = ctx.client()?;
    let site = client.get_site(&property).await?;
    println!("{} ({})", site.site_url, site.permission_level);

    let sitemaps = client.list_sitemaps(&property).await?;
    if sitemaps.is_empty() {
        println!("No sitemaps submitted.");
        return Ok(());
    }
    for sitemap in sitemaps {
        println!(
            "{}\tsubmitted {}\tdownloaded {}\twarnings {}\terrors {}{}",
            sitemap.path,
            sitemap.last_submitted.as_deref().unwrap_or("-"),
            sitemap.last_downloaded.as_deref().unwrap_or("-"),
            sitemap.warnings,
            sitemap.errors,
            if sitemap.is_pending { "\tpending" } else { "" },
        );
    }
    Ok(())
}

pub(crate) async fn run_overview(ctx: &Context, args: &WindowArgs) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let by_date_window = ctx.window(args, vec![Dimension::Date])?;
    let by_query_window = by_date_window.with_dimensions(vec![Dimension::Query]);
    let by_date = ctx.fetch(&client, by_date_window.clone()).await?;
    let by_query = ctx.fetch(&client, by_query_window).await?;

    let summary = performance_summary(&by_date, &by_query);
    println!(
        "{} ({} - {})",
        by_date_window.property_url, by_date_window.start_date, by_date_window.end_date
    );
    println!("Clicks:           {}", summary.total_clicks);
    println!("Impressions:      {}", summary.total_impressions);
    println!("CTR:              {:.2}%", summary.ctr_percent);
    println!("Average position: {:.1}", summary.avg_position);
    println!("Queries:          {}", summary.total_queries);
    Ok(())
}

pub(crate) async fn run_trends(ctx: &Context, args: &WindowArgs) -> anyhow::Result<()> {
    let by_date = ctx.fetch_for(args, vec![Dimension::Date]).await?;
    println!("{}", ctx.orchestrator.traffic_trends(&by_date).await);
    Ok(())
}

pub(crate) async fn run_opportunities(
    ctx: &Context,
    args: &WindowArgs,
    min_impressions: u64,
) -> anyhow::Result<()> {
    let by_query = ctx.fetch_for(args, vec![Dimension::Query]).await?;
    let criteria = OpportunityCriteria {
        limit: args.limit,
        ..OpportunityCriteria::with_min_impressions(min_impressions)
    };
    println!(
        "{}",
        ctx.orchestrator
            .keyword_opportunities(&by_query, &criteria)
            .await
    );
    Ok(())
}

pub(crate) async fn run_content(ctx: &Context, args: &WindowArgs) -> anyhow::Result<()> {
    let by_page = ctx.fetch_for(args, vec![Dimension::Page]).await?;
    println!(
        "{}",
        ctx.orchestrator
            .content_performance(&by_page, args.limit)
            .await
    );
    Ok(())
}

pub(crate) async fn run_compare(ctx: &Context, args: &WindowArgs) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let current_window = ctx.window(args, vec![Dimension::Date])?;
    let previous_window = current_window
        .preceding()
        .ok_or_else(|| anyhow::anyhow!("no preceding window before {}", current_window.start_date))?;

    tracing::info!(
        current_start = %current_window.start_date,
        previous_start = %previous_window.start_date,
        days = current_window.day_count(),
        "comparing periods"
    );

    let current = ctx.fetch(&client, current_window).await?;
    let previous = ctx.fetch(&client, previous_window).await?;
    println!(
        "{}",
        ctx.orchestrator.period_comparison(&current, &previous).await
    );
    Ok(())
}

pub(crate) async fn run_branded(
    ctx: &Context,
    args: &WindowArgs,
    keywords: &KeywordSets,
) -> anyhow::Result<()> {
    let by_query = ctx.fetch_for(args, vec![Dimension::Query]).await?;
    println!(
        "{}",
        ctx.orchestrator
            .branded_analysis(&by_query, &keywords.brand)
            .await
    );
    Ok(())
}

pub(crate) async fn run_competitors(
    ctx: &Context,
    args: &WindowArgs,
    keywords: &KeywordSets,
) -> anyhow::Result<()> {
    if keywords.competitors.is_empty() {
        println!("{}", competitor_digest(&competitor_report::<String>(&Dataset::empty(), &[])));
        return Ok(());
    }
    let by_query = ctx.fetch_for(args, vec![Dimension::Query]).await?;
    let report = competitor_report(&by_query, &keywords.competitors);
    println!("{}", competitor_digest(&report));
    Ok(())
}

pub(crate) async fn run_report(
    ctx: &Context,
    args: &WindowArgs,
    period: &str,
) -> anyhow::Result<()> {
    let dataset = ctx
        .fetch_for(args, vec![Dimension::Date, Dimension::Query])
        .await?;
    println!("{}", executive_report(&dataset, period));
    Ok(())
}

pub(crate) async fn run_ask(
    ctx: &Context,
    args: &WindowArgs,
    question: &str,
) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let window = ctx.window(args, vec![Dimension::Date, Dimension::Query, Dimension::Page])?;
    let context = serde_json::json!({
        "property": window.property_url,
        "start_date": window.start_date,
        "end_date": window.end_date,
    });
    let dataset = ctx.fetch(&client, window).await?;
    println!(
        "{}",
        ctx.orchestrator
            .custom_query(&dataset, question, Some(&context))
            .await
    );
    Ok(())
}

pub(crate) fn run_suggestions() {
    for (i, question) in suggested_questions().iter().enumerate() {
        println!("{}. {question}", i + 1);
    }
}
