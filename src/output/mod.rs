//! Output module for progress reporting and persisted results
//!
//! This module handles:
//! - Progress sinks observing the crawl page by page
//! - Run summaries
//! - Writing the crawl result as a JSON document

mod json;
mod progress;
pub mod stats;
mod traits;

pub use json::{default_output_path, format_records, load_records, save_records};
pub use progress::{NoProgress, ProgressCounter, TracingProgress};
pub use stats::{print_summary, summarize};
pub use traits::{CrawlSummary, OutputError, OutputResult, ProgressSink};
