//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one complete run:
//! - Resolving the catalog page count
//! - Fanning catalog pages out to a bounded pool of workers
//! - Collecting every worker's records into one result
//! - Optionally persisting the result as JSON
//!
//! A run never fails because of a page or an item. Failures only shrink the
//! result or leave record fields at their defaults.

use crate::config::Config;
use crate::crawler::catalog::CatalogFetcher;
use crate::crawler::item::ItemParser;
use crate::crawler::pagination::PageCountResolver;
use crate::crawler::build_http_client;
use crate::output::{
    default_output_path, save_records, summarize, CrawlSummary, ProgressCounter, ProgressSink,
    TracingProgress,
};
use crate::record::Record;
use crate::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Phases of a single run, in order; a run never moves backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    ResolvingPageCount,
    Crawling,
    Aggregating,
    Persisting,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ResolvingPageCount => "resolving page count",
            Self::Crawling => "crawling",
            Self::Aggregating => "aggregating",
            Self::Persisting => "persisting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Collected records, in no particular order
    pub records: Vec<Record>,

    /// Run statistics
    pub summary: CrawlSummary,

    /// Where the records were written, if persistence was requested and succeeded
    pub saved_to: Option<PathBuf>,

    /// Phases the run passed through
    pub phases: Vec<RunPhase>,
}

/// Main crawler coordinator structure
///
/// A coordinator can run any number of times; each call to [`Coordinator::run`]
/// is an independent run. Overlapping runs are not coordinated with each other.
pub struct Coordinator {
    catalog: Arc<CatalogFetcher>,
    items: Arc<ItemParser>,
    resolver: PageCountResolver,
    workers: usize,
    output_path: PathBuf,
    progress: Arc<dyn ProgressSink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrapeError)` - The root URL or HTTP client could not be set up
    pub fn new(config: &Config) -> Result<Self> {
        let root = Url::parse(&config.catalog.root_url)?;
        let client = build_http_client(&config.http)?;

        Ok(Self {
            catalog: Arc::new(CatalogFetcher::new(client.clone(), root)),
            items: Arc::new(ItemParser::new(client)),
            resolver: PageCountResolver::new(),
            workers: config.catalog.workers.max(1),
            output_path: default_output_path(&config.output.file_name),
            progress: Arc::new(TracingProgress),
        })
    }

    /// Replaces the progress sink (defaults to [`TracingProgress`])
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Overrides where persisted records are written
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Where persisted records are written
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Maximum number of catalog pages in flight
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs a crawl and returns only the collected records
    pub async fn run_crawl(&self, persist: bool) -> Vec<Record> {
        self.run(persist).await.records
    }

    /// Runs a crawl
    ///
    /// 1. Resolve the page count; `0` ends the run with an empty result
    /// 2. Crawl pages `1..=count`, at most `workers` at a time
    /// 3. Gather the shared result
    /// 4. Persist it if `persist` is set
    pub async fn run(&self, persist: bool) -> CrawlOutcome {
        let start_time = Instant::now();
        let mut phases = vec![RunPhase::Idle];

        enter(&mut phases, RunPhase::ResolvingPageCount);
        let page_count = self.resolver.resolve_page_count(&self.catalog).await;
        tracing::info!("Catalog has {} pages", page_count);

        if page_count == 0 {
            enter(&mut phases, RunPhase::Done);
            let summary = summarize(&[], 0, 0, start_time.elapsed());
            self.progress.finish(&summary);
            return CrawlOutcome {
                records: Vec::new(),
                summary,
                saved_to: None,
                phases,
            };
        }

        enter(&mut phases, RunPhase::Crawling);
        self.progress.start(page_count);
        let counter = ProgressCounter::new(page_count, self.progress.clone());
        let results = Arc::new(Mutex::new(Vec::new()));
        self.crawl_pages(page_count, &results, &counter).await;

        enter(&mut phases, RunPhase::Aggregating);
        let records = std::mem::take(&mut *results.lock().unwrap_or_else(PoisonError::into_inner));

        let mut saved_to = None;
        if persist {
            enter(&mut phases, RunPhase::Persisting);
            match self.persist(&records) {
                Ok(path) => saved_to = Some(path),
                Err(e) => tracing::error!(
                    "Failed to save records to {}: {}",
                    self.output_path.display(),
                    e
                ),
            }
        }

        enter(&mut phases, RunPhase::Done);
        let summary = summarize(&records, page_count, counter.completed(), start_time.elapsed());
        self.progress.finish(&summary);

        CrawlOutcome {
            records,
            summary,
            saved_to,
            phases,
        }
    }

    /// Writes `records` to the output path, replacing any previous file
    pub fn persist(&self, records: &[Record]) -> Result<PathBuf> {
        save_records(records, &self.output_path)?;
        Ok(self.output_path.clone())
    }

    /// Crawls pages `1..=page_count` with at most `workers` pages in flight
    ///
    /// A worker holds its permit for its whole page, catalog fetch and every
    /// item fetch included. Returns once every page worker has finished.
    async fn crawl_pages(
        &self,
        page_count: usize,
        results: &Arc<Mutex<Vec<Record>>>,
        counter: &ProgressCounter,
    ) {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut workers = JoinSet::new();

        for page in 1..=page_count {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Worker pool closed before page {}: {}", page, e);
                    break;
                }
            };

            let catalog = Arc::clone(&self.catalog);
            let items = Arc::clone(&self.items);
            let results = Arc::clone(results);
            let counter = counter.clone();

            workers.spawn(async move {
                let _permit = permit;
                crawl_page(page, &catalog, &items, &results).await;
                counter.tick();
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Page worker failed: {}", e);
            }
        }
    }
}

/// Harvests one catalog page and parses its items one after another
async fn crawl_page(
    page: usize,
    catalog: &CatalogFetcher,
    items: &ItemParser,
    results: &Mutex<Vec<Record>>,
) {
    let urls = catalog.fetch_catalog_page(page).await;

    for url in urls {
        let record = match items.try_parse_item(&url).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Dropping item");
                continue;
            }
        };

        results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

fn enter(phases: &mut Vec<RunPhase>, next: RunPhase) {
    if let Some(current) = phases.last() {
        tracing::debug!("Run phase: {} -> {}", current, next);
    }
    phases.push(next);
}

/// Runs one crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use shelf_sweep::config::Config;
/// use shelf_sweep::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let records = run_crawl(&Config::default(), true).await?;
/// println!("{} records", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, persist: bool) -> Result<Vec<Record>> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run_crawl(persist).await)
}
