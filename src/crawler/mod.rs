//! Crawler module for catalog and item page processing
//!
//! This module contains the core scraping pipeline, including:
//! - HTTP fetching
//! - Page-count resolution from the first catalog page
//! - Item URL harvesting from catalog pages
//! - Record extraction from item pages
//! - Overall crawl coordination and the daily scheduler

mod catalog;
mod coordinator;
mod fetcher;
mod item;
mod pagination;
mod scheduler;

pub use catalog::CatalogFetcher;
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, RunPhase};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use item::ItemParser;
pub use pagination::PageCountResolver;
pub use scheduler::Scheduler;
