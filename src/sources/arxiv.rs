//! arXiv paper fetching via the export API

use crate::sources::{PaperFetcher, SourceError};
use async_trait::async_trait;
use std::time::Duration;

/// Fetches paper title and abstract from the arXiv Atom API
///
/// Queries `{base_url}/api/query?id_list={id}` and pulls the entry's title
/// and summary out of the Atom feed. The combined text is what gets chunked
/// and indexed for paper-scoped retrieval.
pub struct ArxivFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivFetcher {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent("querywave/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PaperFetcher for ArxivFetcher {
    async fn fetch(&self, paper_id: &str) -> Result<String, SourceError> {
        tracing::info!(paper_id, "fetching arXiv paper");

        let url = format!(
            "{}/api/query?id_list={}",
            self.base_url,
            urlencoding::encode(paper_id)
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_entry_text(&body).ok_or_else(|| SourceError::PaperNotFound {
            id: paper_id.to_string(),
        })
    }
}

/// Pull title and summary out of the first `<entry>` of an Atom feed
///
/// Returns None when the feed has no entry (unknown ID) or the extracted
/// text is blank. Plain string scanning is enough for the fixed feed shape.
fn parse_entry_text(feed: &str) -> Option<String> {
    let entry = feed.split("<entry>").nth(1)?;

    let title = extract_between(entry, "<title>", "</title>")
        .unwrap_or_default()
        .trim()
        .to_string();
    let summary = extract_between(entry, "<summary>", "</summary>")
        .unwrap_or_default()
        .trim()
        .to_string();

    let text = match (title.is_empty(), summary.is_empty()) {
        (true, true) => return None,
        (false, true) => title,
        (true, false) => summary,
        (false, false) => format!("{}\n\n{}", title, summary),
    };

    Some(text)
}

fn extract_between(text: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = text.find(start)? + start.len();
    let remaining = &text[start_idx..];
    let end_idx = remaining.find(end)?;
    Some(remaining[..end_idx].to_string())
}
