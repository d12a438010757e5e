use crate::detect::{DetectionEngine, DetectionOptions};
use crate::finding::{EndpointMatch, FileTypeMatch, Finding, PatternMatch};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tracing::{debug, info, warn};
use trawler_scanner::error::Result;
use trawler_scanner::{
    CancelFlag, CrawlMode, CrawlResult, Crawler, FetchSettings, IgnoreSet, ScopePolicy, Target,
};

/// Options for configuring a scan run
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub target: String,
    pub mode: CrawlMode,
    pub concurrency: usize,
    /// Zero means unlimited.
    pub max_depth: usize,
    pub fetch: FetchSettings,
    pub ignore: IgnoreSet,
    pub detection: DetectionOptions,
    /// Emit a report for every scanned response, not only those with findings.
    pub report_every_response: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            target: String::new(),
            mode: CrawlMode::Normal,
            concurrency: 20,
            max_depth: 0,
            fetch: FetchSettings::default(),
            ignore: IgnoreSet::new(),
            detection: DetectionOptions::default(),
            report_every_response: false,
        }
    }
}

/// Callback for every URL dispatched to the fetcher
pub type UrlCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback for the findings of one scanned response
pub type ReportCallback = Arc<dyn Fn(PageReport) + Send + Sync>;

/// Everything learned from one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub words: usize,
    pub lines: usize,
    pub findings: Vec<Finding>,
}

impl PageReport {
    pub fn from_result(result: &CrawlResult, findings: Vec<Finding>) -> Self {
        Self {
            url: result.url.clone(),
            status_code: result.status_code,
            content_type: result.content_type.clone(),
            content_length: result.content_length,
            words: result.word_count(),
            lines: result.line_count(),
            findings,
        }
    }

    /// Single-line JSON encoding of this report.
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Accumulated output of a whole run, grouped by finding kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResults {
    pub urls: Vec<String>,
    pub secrets: Vec<PatternMatch>,
    pub endpoints: Vec<EndpointMatch>,
    pub file_types: Vec<FileTypeMatch>,
    pub errors: Vec<PatternMatch>,
    pub infos: Vec<PatternMatch>,
    pub pages_scanned: usize,
    pub failures: usize,
    pub cancelled: bool,
}

impl ScanResults {
    pub fn record(&mut self, findings: &[Finding]) {
        for finding in findings {
            match finding.clone() {
                Finding::Secret(m) => self.secrets.push(m),
                Finding::Endpoint(e) => self.endpoints.push(e),
                Finding::FileType(f) => self.file_types.push(f),
                Finding::Error(m) => self.errors.push(m),
                Finding::Info(m) => self.infos.push(m),
            }
        }
    }

    pub fn finding_count(&self) -> usize {
        self.secrets.len()
            + self.endpoints.len()
            + self.file_types.len()
            + self.errors.len()
            + self.infos.len()
    }
}

/// Lock the accumulator, recovering the guard if a worker panicked while
/// holding it.
fn lock_results(accumulated: &StdMutex<ScanResults>) -> MutexGuard<'_, ScanResults> {
    accumulated.lock().unwrap_or_else(|poisoned| {
        warn!("Scan results lock was poisoned, recovering accumulated findings");
        poisoned.into_inner()
    })
}

/// Execute a scan with the given options
///
/// Only a malformed target or an unusable transport configuration fails the
/// run. Per-URL failures are counted and logged at debug level.
pub async fn execute_scan(
    options: ScanOptions,
    cancel: CancelFlag,
    url_callback: Option<UrlCallback>,
    report_callback: Option<ReportCallback>,
) -> Result<ScanResults> {
    let ScanOptions {
        target,
        mode,
        concurrency,
        max_depth,
        fetch,
        ignore,
        detection,
        report_every_response,
    } = options;

    let target = Target::parse(&target, mode)?;
    info!(
        "Scanning {} (scope host: {}, mode: {:?})",
        target.seed(),
        target.scope_host(),
        mode
    );
    let policy = Arc::new(ScopePolicy::new(target, ignore));

    let scan_bodies = detection.any_enabled() || report_every_response;
    let engine = Arc::new(DetectionEngine::new(detection));
    let accumulated = Arc::new(StdMutex::new(ScanResults::default()));

    let mut crawler = Crawler::with_settings(fetch)?
        .with_max_depth(max_depth)
        .with_cancel_flag(cancel.clone());

    if let Some(callback) = url_callback {
        crawler = crawler.with_dispatch_callback(callback);
    }

    if scan_bodies {
        let engine = engine.clone();
        let accumulated = accumulated.clone();
        let cancel = cancel.clone();
        crawler = crawler.with_result_callback(Arc::new(move |result: CrawlResult| {
            let findings = engine.scan(&result.url, &result.body);

            // Nothing found after cancellation is reported.
            if cancel.is_cancelled() {
                debug!("Dropping findings for {} after cancellation", result.url);
                return;
            }

            lock_results(&accumulated).record(&findings);

            if let Some(ref callback) = report_callback
                && (report_every_response || !findings.is_empty())
            {
                callback(PageReport::from_result(&result, findings));
            }
        }));
    }

    let summary = crawler.crawl(policy, concurrency).await?;

    let mut results = std::mem::take(&mut *lock_results(&accumulated));
    results.urls = summary.dispatched;
    results.pages_scanned = summary.pages_scanned;
    results.failures = summary.failures;
    results.cancelled = summary.cancelled;

    info!(
        "Scan finished: {} URLs, {} findings",
        results.urls.len(),
        results.finding_count()
    );
    Ok(results)
}
