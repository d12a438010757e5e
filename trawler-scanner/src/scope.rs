//! Deciding which discovered URLs are eligible to be crawled.

use crate::error::{Result, ScanError};
use crate::normalize::{authority, has_scheme, root_host};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// How far the crawl may wander from the seed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrawlMode {
    /// Stay on the exact host of the target.
    #[default]
    Normal,
    /// Follow any subdomain of the target's registrable root domain.
    Intensive,
}

/// The user supplied root of a crawl, normalized once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    seed: Url,
    protocol: String,
    host: String,
    scope_host: String,
    mode: CrawlMode,
}

impl Target {
    /// Parse the operator's target. A missing scheme defaults to `http`.
    /// In intensive mode the scope host is the registrable root domain.
    pub fn parse(raw: &str, mode: CrawlMode) -> Result<Self> {
        let raw = raw.trim();
        let with_scheme = if has_scheme(raw) {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        };

        let mut seed = Url::parse(&with_scheme)
            .map_err(|e| ScanError::MalformedTarget(format!("{} ({})", raw, e)))?;
        seed.set_fragment(None);

        if !matches!(seed.scheme(), "http" | "https") {
            return Err(ScanError::MalformedTarget(raw.to_string()));
        }

        let host = authority(&seed)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ScanError::MalformedTarget(raw.to_string()))?;

        let scope_host = match mode {
            CrawlMode::Normal => host.clone(),
            CrawlMode::Intensive => root_host(&seed)
                .map_err(|e| ScanError::MalformedTarget(format!("{} ({})", raw, e)))?,
        };

        Ok(Self {
            protocol: seed.scheme().to_string(),
            seed,
            host,
            scope_host,
            mode,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Scheme used for the seed and the synthesized probes.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Exact host (with explicit port) of the seed.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host candidates are compared against: the exact host in normal
    /// mode, the root domain in intensive mode.
    pub fn scope_host(&self) -> &str {
        &self.scope_host
    }

    pub fn mode(&self) -> CrawlMode {
        self.mode
    }

    /// `robots.txt` and `sitemap.xml` next to the seed. Only offered when
    /// the target points at the site root.
    pub fn probe_urls(&self) -> Vec<Url> {
        if self.seed.path() != "/" {
            return Vec::new();
        }
        ["/robots.txt", "/sitemap.xml"]
            .iter()
            .filter_map(|probe| self.seed.join(probe).ok())
            .collect()
    }
}

/// Substrings that exclude a URL from the crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    entries: Vec<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary entries. Blank entries and duplicates are
    /// dropped, order is kept.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if !entry.is_empty() && !set.entries.iter().any(|e| e == entry) {
                set.entries.push(entry.to_string());
            }
        }
        set
    }

    /// Parse an inline comma separated list such as `logout,/static/`.
    pub fn parse_inline(value: &str) -> Self {
        Self::from_entries(value.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn matches(&self, url: &str) -> bool {
        self.entries.iter().any(|entry| url.contains(entry.as_str()))
    }
}

/// Scope check for one absolute candidate URL.
pub fn in_scope(candidate: &Url, target: &Target, ignore: &IgnoreSet) -> bool {
    let host_ok = match target.mode() {
        CrawlMode::Normal => authority(candidate).is_some_and(|host| host == target.host()),
        CrawlMode::Intensive => match root_host(candidate) {
            Ok(root) => root == target.scope_host(),
            Err(e) => {
                debug!("Out of scope, no root domain for {}: {}", candidate, e);
                false
            }
        },
    };

    host_ok && !ignore.matches(candidate.as_str())
}

/// A target and its ignore list bundled for sharing across workers.
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    target: Target,
    ignore: IgnoreSet,
}

impl ScopePolicy {
    pub fn new(target: Target, ignore: IgnoreSet) -> Self {
        Self { target, ignore }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn ignore(&self) -> &IgnoreSet {
        &self.ignore
    }

    pub fn in_scope(&self, candidate: &Url) -> bool {
        in_scope(candidate, &self.target, &self.ignore)
    }

    /// The URLs dispatched when a crawl starts: the probes the ignore list
    /// lets through, then the seed itself. None of them go through the
    /// host check since they come from the target.
    pub fn seed_urls(&self) -> Vec<Url> {
        let mut seeds: Vec<Url> = self
            .target
            .probe_urls()
            .into_iter()
            .filter(|probe| !self.ignore.matches(probe.as_str()))
            .collect();
        seeds.push(self.target.seed().clone());
        seeds
    }
}
