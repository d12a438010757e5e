use crate::corpus::FileCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// A body match from one of the regex corpora (secrets, errors, infos).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub url: String,
    pub name: String,
    pub description: String,
    pub matched: String,
    pub cwe_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Vulnerability classes usually associated with this parameter name.
    pub attacks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMatch {
    pub url: String,
    pub parameters: Vec<Parameter>,
}

impl EndpointMatch {
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeMatch {
    pub url: String,
    pub extension: String,
    pub category: FileCategory,
    pub level: u8,
}

/// One structured detection result tied to the URL it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Secret(PatternMatch),
    Endpoint(EndpointMatch),
    FileType(FileTypeMatch),
    Error(PatternMatch),
    Info(PatternMatch),
}

impl Finding {
    pub fn url(&self) -> &str {
        match self {
            Finding::Secret(m) | Finding::Error(m) | Finding::Info(m) => &m.url,
            Finding::Endpoint(e) => &e.url,
            Finding::FileType(f) => &f.url,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::Secret(_) => Severity::High,
            Finding::Error(_) => Severity::Medium,
            Finding::FileType(f) if f.level <= 2 => Severity::High,
            Finding::FileType(f) if f.level <= 4 => Severity::Medium,
            Finding::FileType(_) => Severity::Low,
            Finding::Endpoint(_) | Finding::Info(_) => Severity::Info,
        }
    }

    /// Short human label, e.g. the detector name or the file category.
    pub fn title(&self) -> String {
        match self {
            Finding::Secret(m) | Finding::Error(m) | Finding::Info(m) => m.name.clone(),
            Finding::Endpoint(e) => format!("Parameters: {}", e.parameter_names().join(", ")),
            Finding::FileType(f) => f.category.label().to_string(),
        }
    }
}
