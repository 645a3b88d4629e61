//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and exercise the full
//! crawl cycle end-to-end.

use shelf_sweep::config::Config;
use shelf_sweep::crawler::{Coordinator, RunPhase};
use shelf_sweep::output::{load_records, CrawlSummary, NoProgress, ProgressSink};
use shelf_sweep::{Number, Record};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock catalog
fn create_test_config(server: &MockServer, workers: usize) -> Config {
    let mut config = Config::default();
    config.catalog.root_url = format!("{}/catalogue/", server.uri());
    config.catalog.workers = workers;
    config.http.timeout_secs = 10;
    config.http.connect_timeout_secs = 5;
    config
}

fn catalog_page(page: usize, total: usize, hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="col-xs-6"><article class="product_pod"><h3><a href="{}">Book</a></h3></article></li>"#,
                href
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <section><ol class="row">{}</ol>
        <ul class="pager"><li class="current">
            Page {} of {}
        </li></ul></section>
        </body></html>"#,
        items, page, total
    )
}

fn item_page(title: &str, price: &str, stock: &str, rating: &str, upc: &str) -> String {
    format!(
        r#"<html><body>
        <article class="product_page">
            <div class="row">
                <div class="col-sm-6 product_main">
                    <h1>{title}</h1>
                    <p class="price_color">{price}</p>
                    <p class="instock availability"><i class="icon-ok"></i> {stock}</p>
                    <p class="star-rating {rating}"><i class="icon-star"></i></p>
                </div>
            </div>
            <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
            <p>About {title}.</p>
            <table class="table table-striped">
                <tr><th>UPC</th><td>{upc}</td></tr>
                <tr><th>Availability</th><td>{stock}</td></tr>
            </table>
        </article>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a two-page catalog with three item pages
async fn mount_catalog(server: &MockServer) {
    mount_html(
        server,
        "/catalogue/page-1.html",
        catalog_page(1, 2, &["light_1000/index.html", "velvet_999/index.html"]),
    )
    .await;
    mount_html(
        server,
        "/catalogue/page-2.html",
        catalog_page(2, 2, &["soumission_998/index.html"]),
    )
    .await;

    mount_html(
        server,
        "/catalogue/light_1000/index.html",
        item_page("A Light in the Attic", "£51.77", "In stock (22 available)", "Three", "a897fe39b1053632"),
    )
    .await;
    mount_html(
        server,
        "/catalogue/velvet_999/index.html",
        item_page("Tipping the Velvet", "£53.74", "In stock (20 available)", "One", "90fa61229261140a"),
    )
    .await;
    mount_html(
        server,
        "/catalogue/soumission_998/index.html",
        item_page("Soumission", "£50", "In stock (20 available)", "Nope", "6957f44c3847a760"),
    )
    .await;
}

fn sorted_by_title(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| a.title.cmp(&b.title));
    records
}

#[derive(Default)]
struct CountingProgress {
    started: Mutex<Option<usize>>,
    ticks: AtomicUsize,
    finished: Mutex<Option<CrawlSummary>>,
}

impl ProgressSink for CountingProgress {
    fn start(&self, total_pages: usize) {
        *self.started.lock().unwrap() = Some(total_pages);
    }

    fn page_done(&self, _completed: usize, _total: usize) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self, summary: &CrawlSummary) {
        *self.finished.lock().unwrap() = Some(summary.clone());
    }
}

#[tokio::test]
async fn test_full_crawl_collects_every_item() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("books_data.txt");
    let progress = Arc::new(CountingProgress::default());

    let coordinator = Coordinator::new(&create_test_config(&server, 25))
        .expect("Failed to create coordinator")
        .with_progress(progress.clone())
        .with_output_path(&output);

    let outcome = coordinator.run(true).await;
    let records = sorted_by_title(outcome.records.clone());

    assert_eq!(records.len(), 3);

    let light = &records[0];
    assert_eq!(light.title, "A Light in the Attic");
    assert_eq!(light.price, Number::Float(51.77));
    assert_eq!(light.available, 22);
    assert_eq!(light.rating, 3);
    assert_eq!(light.description, "About A Light in the Attic.");
    assert_eq!(light.additional_info["UPC"], "a897fe39b1053632");
    assert_eq!(light.additional_info["Availability"], "In stock (22 available)");

    let soumission = &records[1];
    assert_eq!(soumission.title, "Soumission");
    assert_eq!(soumission.price, Number::Int(50));
    assert_eq!(soumission.rating, 0);

    assert_eq!(records[2].title, "Tipping the Velvet");
    assert_eq!(records[2].rating, 1);

    assert_eq!(
        outcome.phases,
        vec![
            RunPhase::Idle,
            RunPhase::ResolvingPageCount,
            RunPhase::Crawling,
            RunPhase::Aggregating,
            RunPhase::Persisting,
            RunPhase::Done,
        ]
    );
    assert_eq!(outcome.saved_to.as_deref(), Some(output.as_path()));

    let saved = sorted_by_title(load_records(&output).expect("Failed to read saved records"));
    assert_eq!(saved, records);

    assert_eq!(*progress.started.lock().unwrap(), Some(2));
    assert_eq!(progress.ticks.load(Ordering::SeqCst), 2);
    let summary = progress.finished.lock().unwrap().clone().unwrap();
    assert_eq!(summary.records, 3);
    assert_eq!(summary.pages_completed, 2);
    assert_eq!(summary.total_pages, 2);
}

#[tokio::test]
async fn test_without_persistence_writes_nothing() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("books_data.txt");
    let coordinator = Coordinator::new(&create_test_config(&server, 2))
        .unwrap()
        .with_progress(Arc::new(NoProgress))
        .with_output_path(&output);

    let records = coordinator.run_crawl(false).await;

    assert_eq!(records.len(), 3);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_pagination_means_no_crawl() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/catalogue/page-1.html",
        r#"<html><body><ol class="row"><li><h3><a href="light_1000/index.html">x</a></h3></li></ol></body></html>"#
            .to_string(),
    )
    .await;

    let coordinator = Coordinator::new(&create_test_config(&server, 25))
        .unwrap()
        .with_progress(Arc::new(NoProgress));

    let outcome = coordinator.run(true).await;

    assert!(outcome.records.is_empty());
    assert!(outcome.saved_to.is_none());
    assert_eq!(outcome.phases.last(), Some(&RunPhase::Done));
    assert!(!outcome.phases.contains(&RunPhase::Crawling));
}

#[tokio::test]
async fn test_unparseable_page_count_means_no_crawl() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/catalogue/page-1.html",
        r#"<ul class="pager"><li class="current">Page one</li></ul>"#.to_string(),
    )
    .await;

    let coordinator = Coordinator::new(&create_test_config(&server, 25))
        .unwrap()
        .with_progress(Arc::new(NoProgress));

    assert!(coordinator.run_crawl(false).await.is_empty());
}

#[tokio::test]
async fn test_failed_catalog_page_is_skipped() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/catalogue/page-1.html",
        catalog_page(1, 3, &["light_1000/index.html"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/catalogue/page-3.html", catalog_page(3, 3, &[])).await;
    mount_html(
        &server,
        "/catalogue/light_1000/index.html",
        item_page("A Light in the Attic", "£51.77", "In stock (22 available)", "Three", "a897fe39b1053632"),
    )
    .await;

    let progress = Arc::new(CountingProgress::default());
    let coordinator = Coordinator::new(&create_test_config(&server, 25))
        .unwrap()
        .with_progress(progress.clone());

    let records = coordinator.run_crawl(false).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "A Light in the Attic");
    // Every page ticks once, including the failed and the empty one
    assert_eq!(progress.ticks.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_item_failures_degrade_individually() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/catalogue/page-1.html",
        catalog_page(
            1,
            1,
            &["light_1000/index.html", "gone_1/index.html", "broken_2/index.html"],
        ),
    )
    .await;
    mount_html(
        &server,
        "/catalogue/light_1000/index.html",
        item_page("A Light in the Attic", "£51.77", "In stock (22 available)", "Three", "a897fe39b1053632"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/catalogue/gone_1/index.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/catalogue/broken_2/index.html",
        "<html><body><p>Under maintenance</p></body></html>".to_string(),
    )
    .await;

    let coordinator = Coordinator::new(&create_test_config(&server, 25))
        .unwrap()
        .with_progress(Arc::new(NoProgress));

    let outcome = coordinator.run(false).await;
    let records = sorted_by_title(outcome.records);

    // The unreachable item is absent; the structurally broken one is all defaults
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], Record::default());
    assert_eq!(records[1].title, "A Light in the Attic");
    assert_eq!(outcome.summary.default_records, 1);
}

#[tokio::test]
async fn test_repeated_crawls_agree() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let coordinator = Coordinator::new(&create_test_config(&server, 3))
        .unwrap()
        .with_progress(Arc::new(NoProgress));

    let first = sorted_by_title(coordinator.run_crawl(false).await);
    let second = sorted_by_title(coordinator.run_crawl(false).await);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_worker_limit_bounds_pages_in_flight() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(300);

    for page in 1..=4 {
        Mock::given(method("GET"))
            .and(path(format!("/catalogue/page-{}.html", page)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(catalog_page(page, 4, &[]))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
    }

    let coordinator = Coordinator::new(&create_test_config(&server, 2))
        .unwrap()
        .with_progress(Arc::new(NoProgress));

    let start = Instant::now();
    let outcome = coordinator.run(false).await;
    let elapsed = start.elapsed();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.summary.pages_completed, 4);
    // Resolution plus two waves of two pages each
    assert!(
        elapsed >= delay * 3,
        "4 pages with 2 workers finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_persisting_empty_catalog_page_writes_empty_array() {
    let server = MockServer::start().await;
    mount_html(&server, "/catalogue/page-1.html", catalog_page(1, 1, &[])).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("books_data.txt");
    let coordinator = Coordinator::new(&create_test_config(&server, 25))
        .unwrap()
        .with_progress(Arc::new(NoProgress))
        .with_output_path(&output);

    let outcome = coordinator.run(true).await;

    assert!(outcome.records.is_empty());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
}
