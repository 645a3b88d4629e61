//! Progress sinks and the shared page counter

use crate::output::traits::{CrawlSummary, ProgressSink};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Logs progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn start(&self, total_pages: usize) {
        tracing::info!("Scraping {} catalog pages", total_pages);
    }

    fn page_done(&self, completed: usize, total: usize) {
        let percent = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        tracing::info!("Progress: {}/{} pages ({:.1}%)", completed, total, percent);
    }

    fn finish(&self, summary: &CrawlSummary) {
        tracing::info!(
            "Scraped {} records from {}/{} pages in {:?} ({} with default values)",
            summary.records,
            summary.pages_completed,
            summary.total_pages,
            summary.duration,
            summary.default_records
        );
    }
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn page_done(&self, _completed: usize, _total: usize) {}
}

/// Counts finished pages across workers and forwards each tick to a sink
#[derive(Clone)]
pub struct ProgressCounter {
    completed: Arc<AtomicUsize>,
    total: usize,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressCounter {
    pub fn new(total: usize, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total,
            sink,
        }
    }

    /// Records one finished page and returns the new running total
    pub fn tick(&self) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.sink.page_done(completed, self.total);
        completed
    }

    /// Pages finished so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
