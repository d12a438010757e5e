pub mod agent;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod result;
pub mod scope;
pub mod visited;

pub use crawler::{CancelFlag, Crawler, DispatchCallback, FetchSettings, ResultCallback};
pub use error::ScanError;
pub use result::{CrawlResult, CrawlSummary};
pub use scope::{CrawlMode, IgnoreSet, ScopePolicy, Target};
pub use visited::VisitedSet;
