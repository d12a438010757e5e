use crate::corpus::parameters::{CUSTOM_ATTACK, attacks_for};
use crate::corpus::{Detector, ERRORS, FileCategory, INFOS, SECRETS};
use crate::finding::{EndpointMatch, FileTypeMatch, Finding, Parameter, PatternMatch};
use std::collections::HashSet;
use trawler_scanner::normalize::url_extension;
use url::Url;

/// Bodies at or below this many bytes are never scanned for secrets.
pub const MIN_BODY_LENGTH: usize = 10;

/// Which detection passes run, and how.
#[derive(Debug, Clone, Default)]
pub struct DetectionOptions {
    pub secrets: bool,
    pub endpoints: bool,
    /// Highest active file category level (1-7). `None` disables the pass.
    pub file_type_level: Option<u8>,
    pub errors: bool,
    pub infos: bool,
    /// Lowercase extensions (no dot) whose bodies skip secret and error scanning.
    pub ignore_extensions: Vec<String>,
    /// Extra parameter names to annotate as custom on endpoint findings.
    pub custom_parameters: Vec<String>,
}

impl DetectionOptions {
    /// Every pass enabled at the widest file-type level.
    pub fn all() -> Self {
        Self {
            secrets: true,
            endpoints: true,
            file_type_level: Some(7),
            errors: true,
            infos: true,
            ..Default::default()
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.secrets
            || self.endpoints
            || self.file_type_level.is_some()
            || self.errors
            || self.infos
    }
}

/// Runs the pattern corpus over a response and turns matches into findings.
///
/// The engine only reads the static corpus, so one instance can be shared
/// across workers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DetectionEngine {
    options: DetectionOptions,
}

impl DetectionEngine {
    pub fn new(options: DetectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Scan one response. Passes run independently and their results are
    /// concatenated in the order secrets, endpoint, file type, errors, infos.
    pub fn scan(&self, url: &str, body: &str) -> Vec<Finding> {
        let parsed = Url::parse(url).ok();
        let extension = parsed.as_ref().and_then(url_extension);
        let excluded = extension
            .as_deref()
            .is_some_and(|ext| self.options.ignore_extensions.iter().any(|e| e == ext));

        let mut findings = Vec::new();

        if self.options.secrets && !excluded {
            findings.extend(hunt_secrets(url, body).into_iter().map(Finding::Secret));
        }

        if self.options.endpoints
            && let Some(ref parsed) = parsed
            && let Some(endpoint) = hunt_endpoint(parsed, &self.options.custom_parameters)
        {
            findings.push(Finding::Endpoint(endpoint));
        }

        if let Some(level) = self.options.file_type_level
            && let Some(ref parsed) = parsed
            && let Some(file_type) = hunt_file_type(parsed, level)
        {
            findings.push(Finding::FileType(file_type));
        }

        if self.options.errors && !excluded {
            findings.extend(hunt_errors(url, body).into_iter().map(Finding::Error));
        }

        if self.options.infos {
            findings.extend(hunt_infos(url, body).into_iter().map(Finding::Info));
        }

        findings
    }
}

fn run_detectors(detectors: &[Detector], url: &str, body: &str) -> Vec<PatternMatch> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut matches = Vec::new();

    for detector in detectors {
        for hit in detector.pattern.find_iter(body) {
            if !seen.insert((detector.name, hit.as_str())) {
                continue;
            }
            matches.push(PatternMatch {
                url: url.to_string(),
                name: detector.name.to_string(),
                description: detector.description.to_string(),
                matched: hit.as_str().to_string(),
                cwe_id: detector.reference.to_string(),
            });
        }
    }

    matches
}

pub fn hunt_secrets(url: &str, body: &str) -> Vec<PatternMatch> {
    if body.len() <= MIN_BODY_LENGTH {
        return Vec::new();
    }
    run_detectors(&SECRETS, url, body)
}

pub fn hunt_errors(url: &str, body: &str) -> Vec<PatternMatch> {
    run_detectors(&ERRORS, url, body)
}

pub fn hunt_infos(url: &str, body: &str) -> Vec<PatternMatch> {
    run_detectors(&INFOS, url, body)
}

/// Report the query parameters of `url`, or `None` when it has none.
pub fn hunt_endpoint(url: &Url, custom: &[String]) -> Option<EndpointMatch> {
    let mut names: Vec<String> = Vec::new();
    for (name, _) in url.query_pairs() {
        if !name.is_empty() && !names.iter().any(|n| n == name.as_ref()) {
            names.push(name.into_owned());
        }
    }

    if names.is_empty() {
        return None;
    }

    let parameters = names
        .into_iter()
        .map(|name| {
            let mut attacks: Vec<String> =
                attacks_for(&name).iter().map(|a| a.to_string()).collect();
            if custom.iter().any(|c| c.eq_ignore_ascii_case(&name)) {
                attacks.push(CUSTOM_ATTACK.to_string());
            }
            Parameter { name, attacks }
        })
        .collect();

    Some(EndpointMatch {
        url: url.to_string(),
        parameters,
    })
}

/// Classify `url` by extension if its category is active at `level`.
pub fn hunt_file_type(url: &Url, level: u8) -> Option<FileTypeMatch> {
    let extension = url_extension(url)?;
    let category = FileCategory::classify(&extension)?;
    if !category.is_active(level) {
        return None;
    }

    Some(FileTypeMatch {
        url: url.to_string(),
        extension,
        category,
        level: category.level(),
    })
}
