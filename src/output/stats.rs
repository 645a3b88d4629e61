//! Run statistics derived from a crawl result

use crate::output::traits::CrawlSummary;
use crate::record::Record;
use std::time::Duration;

/// Builds a summary of a finished run
///
/// # Arguments
///
/// * `records` - The collected records
/// * `total_pages` - Page count reported by the catalog
/// * `pages_completed` - Pages whose worker finished
/// * `duration` - Wall-clock run time
pub fn summarize(
    records: &[Record],
    total_pages: usize,
    pages_completed: usize,
    duration: Duration,
) -> CrawlSummary {
    let empty = Record::default();
    let default_records = records.iter().filter(|record| **record == empty).count();

    CrawlSummary {
        total_pages,
        pages_completed,
        records: records.len(),
        default_records,
        duration,
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &CrawlSummary, output: Option<&std::path::Path>) {
    println!("=== Scrape Summary ===\n");
    println!("  Catalog pages: {}/{}", summary.pages_completed, summary.total_pages);
    println!("  Records: {}", summary.records);
    println!("  Records with default values: {}", summary.default_records);
    println!("  Duration: {:.1}s", summary.duration.as_secs_f64());
    if let Some(path) = output {
        println!("  Saved to: {}", path.display());
    }
}
