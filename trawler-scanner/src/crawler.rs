use crate::agent::random_user_agent;
use crate::error::{Result, ScanError};
use crate::extract::{DocumentKind, discover_links};
use crate::result::{CrawlResult, CrawlSummary};
use crate::scope::ScopePolicy;
use crate::visited::VisitedSet;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Called with every URL right before it is requested.
pub type DispatchCallback = Arc<dyn Fn(&str) + Send + Sync>;
/// Called with every successfully fetched page.
pub type ResultCallback = Arc<dyn Fn(CrawlResult) + Send + Sync>;

type WorkQueues = Arc<Vec<Mutex<VecDeque<(String, usize)>>>>;

/// Shared stop switch. Once set, workers stop taking new URLs and pages
/// still in flight are dropped without reaching the result callback.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Transport level knobs for every request of a run.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    /// Pause a worker takes before each request.
    pub delay: Duration,
    pub proxy: Option<String>,
    /// Explicit user agent. Wins over `random_user_agent`.
    pub user_agent: Option<String>,
    /// Pick a fresh browser user agent for every request.
    pub random_user_agent: bool,
    pub headers: Vec<(String, String)>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            delay: Duration::ZERO,
            proxy: None,
            user_agent: None,
            random_user_agent: false,
            headers: Vec::new(),
        }
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| ScanError::Other(format!("Invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| ScanError::Other(format!("Invalid value for header '{}': {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

pub struct Crawler {
    client: Client,
    visited: Arc<VisitedSet>,
    max_depth: usize,
    delay: Duration,
    rotate_user_agent: bool,
    dispatch_callback: Option<DispatchCallback>,
    result_callback: Option<ResultCallback>,
    cancel: CancelFlag,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Self::with_settings(FetchSettings::default())
    }

    pub fn with_settings(settings: FetchSettings) -> Result<Self> {
        let timeout_secs = settings.timeout_secs.max(1);
        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(|| random_user_agent().to_string());

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .default_headers(header_map(&settings.headers)?)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .danger_accept_invalid_certs(true);

        if let Some(proxy) = &settings.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| ScanError::Other(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            visited: Arc::new(VisitedSet::new()),
            max_depth: 0,
            delay: settings.delay,
            rotate_user_agent: settings.random_user_agent && settings.user_agent.is_none(),
            dispatch_callback: None,
            result_callback: None,
            cancel: CancelFlag::new(),
        })
    }

    /// Maximum link-following depth, the seed being depth 1. Zero means
    /// unlimited.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_dispatch_callback(mut self, callback: DispatchCallback) -> Self {
        self.dispatch_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub async fn crawl(&self, policy: Arc<ScopePolicy>, workers: usize) -> Result<CrawlSummary> {
        let workers = workers.max(1);
        info!(
            "Starting crawl of {} with {} workers",
            policy.target().seed(),
            workers
        );

        // Each worker owns a queue of (url, depth); idle workers steal.
        let worker_queues: WorkQueues =
            Arc::new((0..workers).map(|_| Mutex::new(VecDeque::new())).collect());
        // Queued plus in-progress items. Zero means the crawl is finished.
        let pending = Arc::new(AtomicUsize::new(0));
        let dispatched = Arc::new(Mutex::new(Vec::new()));
        let pages = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));

        let mut target_worker = 0;
        for seed in policy.seed_urls() {
            let seed = String::from(seed);
            if self.visited.insert(&seed).await {
                pending.fetch_add(1, Ordering::SeqCst);
                worker_queues[target_worker].lock().await.push_back((seed, 1));
                target_worker = (target_worker + 1) % workers;
            }
        }

        let mut worker_handles = Vec::new();

        for worker_id in 0..workers {
            let worker = Worker {
                id: worker_id,
                client: self.client.clone(),
                policy: policy.clone(),
                visited: self.visited.clone(),
                queues: worker_queues.clone(),
                pending: pending.clone(),
                dispatched: dispatched.clone(),
                pages: pages.clone(),
                failures: failures.clone(),
                max_depth: self.max_depth,
                delay: self.delay,
                rotate_user_agent: self.rotate_user_agent,
                dispatch_callback: self.dispatch_callback.clone(),
                result_callback: self.result_callback.clone(),
                cancel: self.cancel.clone(),
            };

            worker_handles.push(tokio::spawn(worker.run()));
        }

        for result in futures::future::join_all(worker_handles).await {
            result?;
        }

        let summary = CrawlSummary {
            dispatched: dispatched.lock().await.clone(),
            pages_scanned: pages.load(Ordering::SeqCst),
            failures: failures.load(Ordering::SeqCst),
            cancelled: self.cancel.is_cancelled(),
        };
        info!(
            "Crawl complete. Dispatched {} URLs, scanned {} pages",
            summary.dispatched.len(),
            summary.pages_scanned
        );
        Ok(summary)
    }

    pub async fn get_visited_count(&self) -> usize {
        self.visited.len().await
    }
}

struct Worker {
    id: usize,
    client: Client,
    policy: Arc<ScopePolicy>,
    visited: Arc<VisitedSet>,
    queues: WorkQueues,
    pending: Arc<AtomicUsize>,
    dispatched: Arc<Mutex<Vec<String>>>,
    pages: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
    max_depth: usize,
    delay: Duration,
    rotate_user_agent: bool,
    dispatch_callback: Option<DispatchCallback>,
    result_callback: Option<ResultCallback>,
    cancel: CancelFlag,
}

impl Worker {
    async fn run(self) {
        debug!("Worker {} started", self.id);

        loop {
            if self.cancel.is_cancelled() {
                debug!("Worker {} observed cancellation", self.id);
                break;
            }

            let Some((url, depth)) = self.next_item().await else {
                if self.pending.load(Ordering::SeqCst) == 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            };

            self.process(url, depth).await;
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }

        debug!("Worker {} finished", self.id);
    }

    /// Own queue first, then steal from the back of the others.
    async fn next_item(&self) -> Option<(String, usize)> {
        if let Some(item) = self.queues[self.id].lock().await.pop_front() {
            return Some(item);
        }
        for offset in 1..self.queues.len() {
            let victim = (self.id + offset) % self.queues.len();
            if let Some(item) = self.queues[victim].lock().await.pop_back() {
                debug!("[Worker {}] Stole work from worker {}", self.id, victim);
                return Some(item);
            }
        }
        None
    }

    async fn process(&self, url: String, depth: usize) {
        if let Some(ref callback) = self.dispatch_callback {
            callback(&url);
        }
        self.dispatched.lock().await.push(url.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut page = match fetch_page(&self.client, &url, depth, self.rotate_user_agent).await {
            Ok(page) => page,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                debug!("Fetch failed for {}: {}", url, e);
                return;
            }
        };

        if self.cancel.is_cancelled() {
            debug!("Dropping {} fetched after cancellation", url);
            return;
        }

        let links = match Url::parse(&page.final_url) {
            Ok(page_url) => {
                let kind = DocumentKind::detect(page.content_type.as_deref(), &page_url);
                discover_links(&page.body, kind, &page_url, &self.policy)
            }
            Err(e) => {
                debug!("Cannot resolve links of {}: {}", page.final_url, e);
                Vec::new()
            }
        };

        let child_depth = depth + 1;
        if self.max_depth == 0 || child_depth <= self.max_depth {
            self.enqueue(&links, child_depth).await;
        }

        page.links_found = links;
        self.pages.fetch_add(1, Ordering::SeqCst);

        if let Some(ref callback) = self.result_callback {
            callback(page);
        }
    }

    /// Round-robin new URLs across every worker queue.
    async fn enqueue(&self, links: &[String], depth: usize) {
        let mut target_worker = self.id;
        for link in links {
            if !self.visited.insert(link).await {
                continue;
            }
            target_worker = (target_worker + 1) % self.queues.len();
            debug!("[Worker {}] Queuing {} to worker {}", self.id, link, target_worker);
            self.pending.fetch_add(1, Ordering::SeqCst);
            self.queues[target_worker]
                .lock()
                .await
                .push_back((link.clone(), depth));
        }
    }
}

async fn fetch_page(
    client: &Client,
    url: &str,
    depth: usize,
    rotate_user_agent: bool,
) -> Result<CrawlResult> {
    debug!("Fetching {}", url);

    let mut request = client.get(url);
    if rotate_user_agent {
        request = request.header(USER_AGENT, random_user_agent());
    }

    let start = Instant::now();
    let response = request.send().await?;
    let response_time = start.elapsed();

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let content_length = response.content_length();
    let body = response.text().await?;

    let mut result = CrawlResult::new(url.to_string());
    result.final_url = final_url;
    result.status_code = status.as_u16();
    result.content_type = content_type;
    result.content_length = content_length;
    result.response_time = response_time;
    result.depth = depth;
    result.body = body;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{CrawlMode, IgnoreSet, Target};
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html")
            .set_body_string(body.to_string())
    }

    async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .expect(hits)
            .mount(server)
            .await;
    }

    fn policy_for(server: &MockServer, ignore: IgnoreSet) -> Arc<ScopePolicy> {
        let target = Target::parse(&server.uri(), CrawlMode::Normal).unwrap();
        Arc::new(ScopePolicy::new(target, ignore))
    }

    /// Test basic link discovery
    #[tokio::test]
    async fn test_link_discovery() {
        let mock_server = MockServer::start().await;

        mount(
            &mock_server,
            "/",
            html(r#"<html><body><a href="/page1">1</a><a href="page2">2</a></body></html>"#),
            1,
        )
        .await;
        mount(&mock_server, "/page1", html("<html><body>P1</body></html>"), 1).await;
        mount(&mock_server, "/page2", html("<html><body>P2</body></html>"), 1).await;

        let crawler = Crawler::new().unwrap();
        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 1)
            .await
            .unwrap();

        let base = mock_server.uri();
        for expected in ["/", "/page1", "/page2", "/robots.txt", "/sitemap.xml"] {
            let url = format!("{}{}", base, expected);
            assert!(
                summary.dispatched.contains(&url),
                "{} missing from {:?}",
                url,
                summary.dispatched
            );
        }
        assert_eq!(summary.pages_scanned, 3);
        // robots.txt and sitemap.xml are 404 on this server
        assert_eq!(summary.failures, 2);
        assert!(!summary.cancelled);
    }

    #[tokio::test]
    async fn test_sitemap_links_are_followed() {
        let mock_server = MockServer::start().await;
        let sitemap = format!(
            r#"<?xml version="1.0"?><urlset><url><loc>{}/from-sitemap</loc></url></urlset>"#,
            mock_server.uri()
        );

        mount(&mock_server, "/", html("<html></html>"), 1).await;
        mount(&mock_server, "/robots.txt", ResponseTemplate::new(200).set_body_string("User-agent: *"), 1).await;
        mount(
            &mock_server,
            "/sitemap.xml",
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_string(sitemap),
            1,
        )
        .await;
        mount(&mock_server, "/from-sitemap", html("<html></html>"), 1).await;

        let crawler = Crawler::new().unwrap();
        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 2)
            .await
            .unwrap();

        assert_eq!(summary.pages_scanned, 4);
        assert_eq!(summary.failures, 0);
    }

    #[tokio::test]
    async fn test_no_probes_for_nested_target() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/app/", html("<html></html>"), 1).await;
        mount(&mock_server, "/robots.txt", ResponseTemplate::new(200), 0).await;
        mount(&mock_server, "/sitemap.xml", ResponseTemplate::new(200), 0).await;

        let target = Target::parse(&format!("{}/app/", mock_server.uri()), CrawlMode::Normal).unwrap();
        let policy = Arc::new(ScopePolicy::new(target, IgnoreSet::new()));

        let summary = Crawler::new().unwrap().crawl(policy, 2).await.unwrap();
        assert_eq!(summary.dispatched.len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_scope_and_ignored_links_are_never_fetched() {
        let mock_server = MockServer::start().await;
        let other_server = MockServer::start().await;

        let root = format!(
            r#"<a href="{}/elsewhere">x</a><a href="/logout">out</a><a href="/keep">keep</a>"#,
            other_server.uri()
        );
        mount(&mock_server, "/", html(&root), 1).await;
        mount(&mock_server, "/keep", html("<html></html>"), 1).await;
        mount(&mock_server, "/logout", html("<html></html>"), 0).await;
        mount(&other_server, "/elsewhere", html("<html></html>"), 0).await;

        let crawler = Crawler::new().unwrap();
        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::parse_inline("logout")), 3)
            .await
            .unwrap();

        assert!(summary.dispatched.iter().all(|u| !u.contains("logout")));
        assert!(summary.dispatched.iter().all(|u| u.starts_with(&mock_server.uri())));
    }

    #[tokio::test]
    async fn test_no_duplicate_dispatch_with_many_workers() {
        let mock_server = MockServer::start().await;

        // Every page links to every other page.
        let mut links = String::new();
        for i in 0..15 {
            links.push_str(&format!(r#"<a href="/p{}">p</a>"#, i));
        }
        mount(&mock_server, "/", html(&links), 1).await;
        for i in 0..15 {
            mount(&mock_server, &format!("/p{}", i), html(&links), 1).await;
        }

        let dispatch_log = Arc::new(StdMutex::new(Vec::new()));
        let log = dispatch_log.clone();
        let crawler = Crawler::new()
            .unwrap()
            .with_dispatch_callback(Arc::new(move |url: &str| {
                log.lock().unwrap().push(url.to_string());
            }));

        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 8)
            .await
            .unwrap();

        let dispatched = dispatch_log.lock().unwrap().clone();
        let unique: HashSet<&String> = dispatched.iter().collect();
        assert_eq!(unique.len(), dispatched.len(), "duplicate dispatch: {:?}", dispatched);
        // root, 15 pages, robots.txt, sitemap.xml
        assert_eq!(dispatched.len(), 18);
        assert_eq!(summary.dispatched.len(), 18);
        assert_eq!(crawler.get_visited_count().await, 18);
    }

    #[tokio::test]
    async fn test_max_depth_limits_following() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/", html(r#"<a href="/page1">1</a>"#), 1).await;
        mount(&mock_server, "/page1", html(r#"<a href="/page2">2</a>"#), 1).await;
        mount(&mock_server, "/page2", html("<html></html>"), 0).await;

        let crawler = Crawler::new().unwrap().with_max_depth(2);
        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 2)
            .await
            .unwrap();

        assert_eq!(summary.pages_scanned, 2);
    }

    #[tokio::test]
    async fn test_max_depth_one_fetches_seed_and_probes_only() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/", html(r#"<a href="/page1">1</a>"#), 1).await;
        mount(&mock_server, "/page1", html("<html></html>"), 0).await;

        let crawler = Crawler::new().unwrap().with_max_depth(1);
        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 2)
            .await
            .unwrap();

        let base = mock_server.uri();
        assert_eq!(summary.pages_scanned, 1);
        assert_eq!(summary.dispatched.len(), 3);
        for probe in ["/robots.txt", "/sitemap.xml"] {
            assert!(summary.dispatched.contains(&format!("{}{}", base, probe)));
        }
        assert!(!summary.dispatched.contains(&format!("{}/page1", base)));
    }

    #[tokio::test]
    async fn test_plain_text_sitemap_is_followed() {
        let mock_server = MockServer::start().await;
        let sitemap = format!(
            "<urlset><url><loc>{}/from-sitemap</loc></url></urlset>",
            mock_server.uri()
        );
        mount(&mock_server, "/", html("<html></html>"), 1).await;
        mount(
            &mock_server,
            "/sitemap.xml",
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string(sitemap),
            1,
        )
        .await;
        mount(&mock_server, "/from-sitemap", html("<html></html>"), 1).await;

        let crawler = Crawler::new().unwrap();
        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 2)
            .await
            .unwrap();

        assert!(
            summary
                .dispatched
                .contains(&format!("{}/from-sitemap", mock_server.uri()))
        );
    }

    #[tokio::test]
    async fn test_cancelled_crawl_dispatches_nothing() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "/", html("<html></html>"), 0).await;

        let results = Arc::new(StdMutex::new(Vec::new()));
        let sink = results.clone();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let crawler = Crawler::new()
            .unwrap()
            .with_cancel_flag(cancel)
            .with_result_callback(Arc::new(move |page: CrawlResult| {
                sink.lock().unwrap().push(page.url);
            }));

        let summary = crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 4)
            .await
            .unwrap();

        assert!(summary.cancelled);
        assert!(summary.dispatched.is_empty());
        assert!(results.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_result_callback_gets_body_and_links() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            "/",
            html(r#"<html><body>secret page<a href="/next">n</a></body></html>"#),
            1,
        )
        .await;
        mount(&mock_server, "/next", html("<html></html>"), 1).await;

        let results = Arc::new(StdMutex::new(Vec::new()));
        let sink = results.clone();
        let crawler = Crawler::new()
            .unwrap()
            .with_result_callback(Arc::new(move |page: CrawlResult| {
                sink.lock().unwrap().push(page);
            }));

        crawler
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 1)
            .await
            .unwrap();

        let results = results.lock().unwrap();
        let root = results
            .iter()
            .find(|page| page.url == format!("{}/", mock_server.uri()))
            .expect("root page reported");
        assert!(root.body.contains("secret page"));
        assert_eq!(root.status_code, 200);
        assert_eq!(root.depth, 1);
        assert_eq!(root.links_found, vec![format!("{}/next", mock_server.uri())]);
    }

    #[tokio::test]
    async fn test_custom_headers_and_user_agent_are_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("x-api-key", "abc123"))
            .and(header("user-agent", "trawler-test"))
            .respond_with(html("<html></html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let settings = FetchSettings {
            user_agent: Some("trawler-test".to_string()),
            random_user_agent: true,
            headers: vec![("X-Api-Key".to_string(), "abc123".to_string())],
            ..FetchSettings::default()
        };
        let summary = Crawler::with_settings(settings)
            .unwrap()
            .crawl(policy_for(&mock_server, IgnoreSet::new()), 1)
            .await
            .unwrap();

        assert_eq!(summary.pages_scanned, 1);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let bad_header = FetchSettings {
            headers: vec![("bad header".to_string(), "v".to_string())],
            ..FetchSettings::default()
        };
        assert!(Crawler::with_settings(bad_header).is_err());

        let bad_proxy = FetchSettings {
            proxy: Some("http://bad host:99999".to_string()),
            ..FetchSettings::default()
        };
        assert!(Crawler::with_settings(bad_proxy).is_err());
    }
}
