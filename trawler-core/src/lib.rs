pub mod corpus;
pub mod crawl;
pub mod detect;
pub mod finding;

pub use crawl::{
    PageReport, ReportCallback, ScanOptions, ScanResults, UrlCallback, execute_scan,
};
pub use detect::{DetectionEngine, DetectionOptions, MIN_BODY_LENGTH};
pub use finding::{
    EndpointMatch, FileTypeMatch, Finding, Parameter, PatternMatch, Severity,
};
