//! DuckDuckGo web search

use crate::sources::{SourceError, WebResult, WebSearch};
use async_trait::async_trait;
use std::time::Duration;

/// Web search against the DuckDuckGo HTML endpoint, no API key required
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(max_results: usize, timeout_secs: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent("querywave/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_results,
        })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, SourceError> {
        tracing::info!(query, "searching DuckDuckGo");

        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let results = parse_results(&html, self.max_results);

        tracing::info!(count = results.len(), "web search complete");

        Ok(results)
    }
}

/// Scrape result anchors and snippets out of the HTML results page
fn parse_results(html: &str, max: usize) -> Vec<WebResult> {
    let mut results = Vec::new();

    for segment in html.split("class=\"result__a\"").skip(1).take(max) {
        let title = extract_between(segment, ">", "</a>")
            .unwrap_or_default()
            .replace("<b>", "")
            .replace("</b>", "");

        let url = extract_between(segment, "href=\"", "\"").unwrap_or_default();

        let snippet = if let Some(snippet_segment) =
            segment.split("class=\"result__snippet\"").nth(1)
        {
            extract_between(snippet_segment, ">", "</")
                .unwrap_or_default()
                .replace("<b>", "")
                .replace("</b>", "")
        } else {
            String::new()
        };

        if !title.is_empty() {
            results.push(WebResult {
                title: title.trim().to_string(),
                snippet: snippet.trim().to_string(),
                url: url.trim().to_string(),
            });
        }
    }

    results
}

fn extract_between(text: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = text.find(start)? + start.len();
    let remaining = &text[start_idx..];
    let end_idx = remaining.find(end)?;
    Some(remaining[..end_idx].to_string())
}
