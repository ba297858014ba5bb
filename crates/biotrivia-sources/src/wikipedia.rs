//! Wikipedia (MediaWiki action API) markup source.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use biotrivia_core::error::SourceError;
use biotrivia_core::model::RawMarkup;
use biotrivia_core::traits::MarkupSource;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "biotrivia/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/MysterionRise/biotrivia)"
);
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Fetches article markup from a MediaWiki installation.
///
/// By default the rendered HTML of the whole article is requested; with
/// `legacy` set, the wikitext of the lead section is requested instead.
pub struct WikipediaSource {
    base_url: String,
    legacy: bool,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl WikipediaSource {
    pub fn new(base_url: Option<String>, user_agent: Option<String>, timeout_secs: u64) -> Self {
        let base = base_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.trim_end_matches('/').to_string(),
            legacy: false,
            timeout_secs,
            client,
        }
    }

    /// Request lead-section wikitext instead of rendered HTML.
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    fn api_url(&self, params: &[(&str, &str)]) -> Result<reqwest::Url, SourceError> {
        reqwest::Url::parse_with_params(&format!("{}/w/api.php", self.base_url), params)
            .map_err(|e| SourceError::NetworkError(format!("invalid API URL: {e}")))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        target: &str,
        url: reqwest::Url,
    ) -> Result<T, SourceError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(SourceError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 404 {
            return Err(SourceError::ArticleNotFound(target.to_string()));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError { status, message });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::MalformedResponse(format!("failed to parse response: {e}")))
    }

    async fn fetch_rendered(&self, target: &str) -> Result<RawMarkup, SourceError> {
        let url = self.api_url(&[
            ("action", "parse"),
            ("page", target),
            ("prop", "text"),
            ("formatversion", "2"),
            ("redirects", "1"),
            ("format", "json"),
        ])?;

        let body: ParseResponse = self.get_json(target, url).await?;
        if let Some(error) = body.error {
            return Err(map_api_error(target, error));
        }
        let html = body
            .parse
            .map(|p| p.text)
            .ok_or_else(|| SourceError::MalformedResponse("missing parse.text".into()))?;
        Ok(RawMarkup::Structural(html))
    }

    async fn fetch_wikitext(&self, target: &str) -> Result<RawMarkup, SourceError> {
        let url = self.api_url(&[
            ("action", "query"),
            ("prop", "revisions"),
            ("rvprop", "content"),
            ("rvslots", "main"),
            ("rvsection", "0"),
            ("titles", target),
            ("redirects", "1"),
            ("formatversion", "2"),
            ("format", "json"),
        ])?;

        let body: QueryResponse = self.get_json(target, url).await?;
        if let Some(error) = body.error {
            return Err(map_api_error(target, error));
        }
        let page = body
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| SourceError::MalformedResponse("missing query.pages".into()))?;
        if page.missing || page.invalid {
            return Err(SourceError::ArticleNotFound(target.to_string()));
        }
        let content = page
            .revisions
            .into_iter()
            .next()
            .and_then(|r| r.slots.map(|s| s.main.content).or(r.content))
            .ok_or_else(|| SourceError::MalformedResponse("missing revision content".into()))?;
        Ok(RawMarkup::Legacy(content))
    }
}

fn map_api_error(target: &str, error: ApiErrorBody) -> SourceError {
    match error.code.as_str() {
        "missingtitle" | "invalidtitle" | "nosuchpageid" => {
            SourceError::ArticleNotFound(target.to_string())
        }
        "ratelimited" => SourceError::RateLimited {
            retry_after_ms: 5000,
        },
        _ => SourceError::ApiError {
            status: 200,
            message: format!("{}: {}", error.code, error.info),
        },
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Deserialize)]
struct ParseResponse {
    #[serde(default)]
    parse: Option<ParseBody>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ParseBody {
    text: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Deserialize)]
struct QueryPage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Deserialize)]
struct Revision {
    #[serde(default)]
    slots: Option<Slots>,
    /// Pre-slots responses put the content directly on the revision.
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Slots {
    main: SlotContent,
}

#[derive(Deserialize)]
struct SlotContent {
    content: String,
}

#[async_trait]
impl MarkupSource for WikipediaSource {
    fn name(&self) -> &str {
        "wikipedia"
    }

    #[instrument(skip(self), fields(legacy = self.legacy))]
    async fn fetch_raw_markup(&self, target: &str) -> anyhow::Result<RawMarkup> {
        let raw = if self.legacy {
            self.fetch_wikitext(target).await?
        } else {
            self.fetch_rendered(target).await?
        };
        tracing::debug!(bytes = raw.as_str().len(), "fetched markup");
        Ok(raw)
    }
}
