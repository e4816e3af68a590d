//! DuckDuckGo search provider (HTML endpoint)

use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use vidquest_core::error::Result;
use vidquest_core::{RawHit, SafeSearch, SearchQuery, SearchService};

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo `kp` parameter for a safe-search level
fn safe_search_param(level: SafeSearch) -> &'static str {
    match level {
        SafeSearch::Strict => "1",
        SafeSearch::Moderate => "-1",
        SafeSearch::Off => "-2",
    }
}

/// DuckDuckGo web search over the JavaScript-free HTML endpoint
pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoProvider {
    /// Create a new DuckDuckGo provider
    ///
    /// # Arguments
    /// * `user_agent` - User agent header sent with every request
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        Self::with_endpoint(DUCKDUCKGO_HTML_URL.to_string(), user_agent, timeout_secs)
    }

    /// Create a provider against a custom endpoint (mirrors, tests)
    pub fn with_endpoint(endpoint: String, user_agent: &str, timeout_secs: u64) -> Result<Self> {
        info!("Initializing DuckDuckGo search provider");
        info!("  Endpoint: {endpoint}");
        info!("  Timeout: {timeout_secs}s");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| SearchError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SearchService for DuckDuckGoProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>> {
        let mut params = vec![
            ("q", query.text.as_str()),
            ("kp", safe_search_param(query.safe_search)),
        ];
        if let Some(region) = query.region.as_deref() {
            params.push(("kl", region));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection"
                } else {
                    "request"
                };
                SearchError::RequestError(format!("'{}' failed ({error_kind}): {e}", query.text))
            })?;

        let status = response.status();
        // DuckDuckGo answers throttled clients with 202 and a challenge page
        if status == StatusCode::ACCEPTED || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited(format!(
                "'{}' returned {status}",
                query.text
            ))
            .into());
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(SearchError::RequestError(format!(
                "'{}' returned error {status}: {error_text}",
                query.text
            ))
            .into());
        }

        let page = response
            .text()
            .await
            .map_err(|e| SearchError::RequestError(format!("Failed to read result page: {e}")))?;

        let hits = parse_results_page(&page, query.max_results)?;
        debug!("DuckDuckGo '{}': {} hits", query.text, hits.len());
        Ok(hits)
    }
}

fn selector(css: &str) -> std::result::Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::ParseError(format!("invalid selector '{css}': {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve DuckDuckGo redirect links (`//duckduckgo.com/l/?uddg=...`) to the target URL
pub(crate) fn decode_result_url(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    if let Ok(url) = Url::parse(&absolute) {
        if url.path() == "/l/" {
            if let Some((_, target)) = url.query_pairs().find(|(k, _)| k == "uddg") {
                return target.into_owned();
            }
        }
    }
    absolute
}

/// Extract organic results from an HTML result page, skipping ads
pub(crate) fn parse_results_page(
    page: &str,
    max_results: usize,
) -> std::result::Result<Vec<RawHit>, SearchError> {
    let document = Html::parse_document(page);
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut hits = Vec::new();
    for result in document.select(&result_sel) {
        if hits.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(link) = result.select(&title_sel).next() else {
            continue;
        };
        let title = element_text(link);
        let href = link.value().attr("href").map(decode_result_url);
        let body = result
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty());

        hits.push(RawHit {
            title: Some(title).filter(|t| !t.is_empty()),
            href,
            body,
            ..Default::default()
        });
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
<html><body>
<div class="result results_links results_links_deep result--ad">
  <h2 class="result__title"><a class="result__a" href="https://ads.example/">Sponsored</a></h2>
  <a class="result__snippet">Buy now</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">Rust   Programming
      Language</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">A language empowering <b>everyone</b>.</a>
</div>
<div class="result results_links web-result">
  <h2 class="result__title"><a class="result__a" href="https://doc.rust-lang.org/book/">The Book</a></h2>
</div>
<div class="result results_links web-result">
  <h2 class="result__title"><a class="result__a" href="https://crates.io/">crates.io</a></h2>
  <a class="result__snippet">Package registry</a>
</div>
</body></html>
"#;

    #[test]
    fn test_safe_search_param() {
        assert_eq!(safe_search_param(SafeSearch::Strict), "1");
        assert_eq!(safe_search_param(SafeSearch::Moderate), "-1");
        assert_eq!(safe_search_param(SafeSearch::Off), "-2");
    }

    #[test]
    fn test_decode_redirect_url() {
        assert_eq!(
            decode_result_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&rut=abc"),
            "https://www.rust-lang.org/"
        );
        assert_eq!(
            decode_result_url("https://crates.io/"),
            "https://crates.io/"
        );
    }

    #[test]
    fn test_parse_results_skips_ads() {
        let hits = parse_results_page(PAGE, 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(
            hits[0],
            RawHit {
                title: Some("Rust Programming Language".to_string()),
                href: Some("https://www.rust-lang.org/".to_string()),
                url: None,
                body: Some("A language empowering everyone.".to_string()),
                snippet: None,
            }
        );
        assert_eq!(hits[1].title.as_deref(), Some("The Book"));
        assert_eq!(hits[1].body, None);
    }

    #[test]
    fn test_parse_results_respects_limit() {
        let hits = parse_results_page(PAGE, 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].href.as_deref(), Some("https://doc.rust-lang.org/book/"));
    }

    #[test]
    fn test_parse_empty_page() {
        let hits = parse_results_page("<html><body><div class=\"no-results\"></div></body></html>", 5)
            .unwrap();
        assert!(hits.is_empty());
    }
}
