//! Output traits and types
//!
//! This module defines the progress-reporting interface used by the
//! coordinator and the summary handed to it at the end of a run.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary statistics for one crawl run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    /// Catalog pages reported by the pagination indicator
    pub total_pages: usize,

    /// Catalog pages whose worker finished (successfully or not)
    pub pages_completed: usize,

    /// Records collected
    pub records: usize,

    /// Records still equal to the all-defaults record
    pub default_records: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

/// Observer of crawl progress
///
/// Implementations are shared between page workers and must tolerate
/// concurrent calls.
pub trait ProgressSink: Send + Sync {
    /// Called once the page count is known
    fn start(&self, _total_pages: usize) {}

    /// Called once per finished catalog page; `completed` is the running total
    fn page_done(&self, completed: usize, total: usize);

    /// Called when the run is over
    fn finish(&self, _summary: &CrawlSummary) {}
}
