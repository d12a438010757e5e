//! Static detector tables. Compiled once, never mutated.

pub mod errors;
pub mod extensions;
pub mod infos;
pub mod parameters;
pub mod secrets;

use regex::Regex;

/// A named pattern for one kind of finding.
#[derive(Debug)]
pub struct Detector {
    pub name: &'static str,
    pub description: &'static str,
    pub pattern: Regex,
    /// CWE entry the finding falls under.
    pub reference: &'static str,
}

impl Detector {
    fn compile(table: &[(&'static str, &'static str, &'static str)], reference: &'static str) -> Vec<Detector> {
        table
            .iter()
            .map(|&(name, description, pattern)| Detector {
                name,
                description,
                pattern: Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("detector '{}' has an invalid pattern: {}", name, e)),
                reference,
            })
            .collect()
    }
}

pub use errors::ERRORS;
pub use extensions::FileCategory;
pub use infos::INFOS;
pub use secrets::SECRETS;
