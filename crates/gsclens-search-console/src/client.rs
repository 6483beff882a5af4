//! HTTP client for the Google Search Console (`webmasters/v3`) REST API.
//!
//! Wraps `reqwest` with bearer-token auth, property URL encoding, Google's
//! JSON error envelope and typed response deserialization. Requests are never
//! retried here: a failed call surfaces to the caller immediately.

use std::time::Duration;

use gsclens_core::Dataset;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::GscError;
use crate::normalize::normalize_rows;
use crate::types::{
    ApiErrorEnvelope, QueryBody, RawRow, SearchAnalyticsRequest, SearchAnalyticsResponse,
    SiteEntry, Sitemap, SitemapsResponse, SitesResponse,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/webmasters/v3/";

/// Property URLs (`https://example.com/`, `sc-domain:example.com`) travel as a
/// single path segment, so everything but unreserved characters is escaped.
const SITE_URL_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Client for the Search Console API.
///
/// The access token comes from the caller's OAuth flow; this client neither
/// refreshes nor inspects it. Use [`SearchConsoleClient::new`] for production
/// or [`SearchConsoleClient::with_base_url`] to point at a mock server.
pub struct SearchConsoleClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl SearchConsoleClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GscError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, GscError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GscError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`GscError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GscError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("gsclens/0.1 (search-analytics)")
            .build()?;

        // A trailing slash makes `Url::join` append rather than replace the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GscError::InvalidUrl(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Lists the properties visible to the authenticated user.
    ///
    /// # Errors
    ///
    /// - [`GscError::Api`] on a non-2xx status.
    /// - [`GscError::Http`] on network failure.
    /// - [`GscError::Deserialize`] if the response does not match the expected shape.
    pub async fn list_properties(&self) -> Result<Vec<SiteEntry>, GscError> {
        let url = self.endpoint("sites")?;
        let body: SitesResponse = self.send(self.client.get(url), "sites.list").await?;
        Ok(body.site_entry)
    }

    /// Fetches the permission entry for a single property.
    ///
    /// # Errors
    ///
    /// - [`GscError::Api`] on a non-2xx status (404 for unknown properties).
    /// - [`GscError::Http`] on network failure.
    /// - [`GscError::Deserialize`] if the response does not match the expected shape.
    pub async fn get_site(&self, property_url: &str) -> Result<SiteEntry, GscError> {
        let url = self.site_endpoint(property_url, "")?;
        self.send(
            self.client.get(url),
            &format!("sites.get({property_url})"),
        )
        .await
    }

    /// Lists the sitemaps submitted for a property.
    ///
    /// # Errors
    ///
    /// - [`GscError::Api`] on a non-2xx status.
    /// - [`GscError::Http`] on network failure.
    /// - [`GscError::Deserialize`] if the response does not match the expected shape.
    pub async fn list_sitemaps(&self, property_url: &str) -> Result<Vec<Sitemap>, GscError> {
        let url = self.site_endpoint(property_url, "sitemaps")?;
        let body: SitemapsResponse = self
            .send(
                self.client.get(url),
                &format!("sitemaps.list({property_url})"),
            )
            .await?;
        Ok(body.sitemap)
    }

    /// Runs a `searchAnalytics` query and returns the raw rows.
    ///
    /// An empty result is `Ok(vec![])`, not an error.
    ///
    /// # Errors
    ///
    /// - [`GscError::Api`] on a non-2xx status.
    /// - [`GscError::Http`] on network failure.
    /// - [`GscError::Deserialize`] if the response does not match the expected shape.
    pub async fn query(&self, request: &SearchAnalyticsRequest) -> Result<Vec<RawRow>, GscError> {
        let window = &request.window;
        let url = self.site_endpoint(&window.property_url, "searchAnalytics/query")?;
        let body = QueryBody::from_request(request);

        tracing::debug!(
            property = %window.property_url,
            start = %window.start_date,
            end = %window.end_date,
            dimensions = ?window.dimensions,
            row_limit = request.row_limit,
            "querying search analytics"
        );

        let response: SearchAnalyticsResponse = self
            .send(
                self.client.post(url).json(&body),
                &format!("searchAnalytics.query({})", window.property_url),
            )
            .await?;

        tracing::info!(
            property = %window.property_url,
            rows = response.rows.len(),
            "search analytics query complete"
        );

        Ok(response.rows)
    }

    /// Runs a `searchAnalytics` query and normalizes the rows into a [`Dataset`].
    ///
    /// # Errors
    ///
    /// Everything [`SearchConsoleClient::query`] returns, plus the row
    /// normalizer's malformed-row errors.
    pub async fn fetch_dataset(
        &self,
        request: &SearchAnalyticsRequest,
    ) -> Result<Dataset, GscError> {
        let rows = self.query(request).await?;
        normalize_rows(&rows, &request.window)
    }

    /// Resolves a path relative to the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, GscError> {
        self.base_url
            .join(path)
            .map_err(|e| GscError::InvalidUrl(format!("cannot join '{path}': {e}")))
    }

    /// Builds `sites/{encoded property}[/tail]`.
    fn site_endpoint(&self, property_url: &str, tail: &str) -> Result<Url, GscError> {
        let site = utf8_percent_encode(property_url, SITE_URL_SEGMENT);
        let path = if tail.is_empty() {
            format!("sites/{site}")
        } else {
            format!("sites/{site}/{tail}")
        };
        self.endpoint(&path)
    }

    /// Sends an authenticated request and decodes the JSON body.
    ///
    /// Non-2xx responses are mapped to [`GscError::Api`], using the message
    /// from Google's error envelope when the body carries one.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, GscError> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| body.trim().to_string());
            tracing::warn!(context, status = status.as_u16(), %message, "Search Console request failed");
            return Err(GscError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GscError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
