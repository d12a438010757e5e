use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A fetched page handed from the crawler to whoever scans it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    /// The URL that was dispatched.
    pub url: String,
    /// The URL after redirects. Links are resolved against this one.
    pub final_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub response_time: Duration,
    pub depth: usize,
    pub body: String,
    pub links_found: Vec<String>,
}

impl CrawlResult {
    pub fn new(url: String) -> Self {
        Self {
            final_url: url.clone(),
            url,
            status_code: 0,
            content_type: None,
            content_length: None,
            response_time: Duration::from_secs(0),
            depth: 0,
            body: String::new(),
            links_found: Vec::new(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    pub fn line_count(&self) -> usize {
        self.body.lines().count()
    }
}

/// What a finished crawl looked like from the crawler's side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub dispatched: Vec<String>,
    pub pages_scanned: usize,
    pub failures: usize,
    pub cancelled: bool,
}
