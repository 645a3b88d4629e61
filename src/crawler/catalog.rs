//! Catalog page fetching
//!
//! A catalog page (`<root>/page-<n>.html`) lists items as headings inside an
//! `<ol class="row">`, each heading wrapping a link to the item's detail page.
//! This module turns one such page into the absolute URLs of its items.

use crate::crawler::fetcher::fetch_url;
use crate::extract::{find_all, parse_document, ClassMatch, Locator};
use crate::Result;
use reqwest::Client;
use url::Url;

/// Fetches catalog pages and harvests item URLs from them
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    client: Client,
    root: Url,
    listing: Locator,
    heading: Locator,
    link: Locator,
}

impl CatalogFetcher {
    /// Creates a fetcher for the catalog rooted at `root`
    ///
    /// `root` should end with a slash so that page names and item hrefs
    /// resolve beneath it.
    pub fn new(client: Client, root: Url) -> Self {
        Self {
            client,
            root,
            listing: Locator::new("ol", ClassMatch::exact("row")),
            heading: Locator::new("h3", ClassMatch::Any),
            link: Locator::new("a", ClassMatch::Unclassed),
        }
    }

    /// Builds the URL of catalog page `page` (1-based)
    pub fn page_url(&self, page: usize) -> Result<Url> {
        Ok(self.root.join(&format!("page-{}.html", page))?)
    }

    /// Fetches the raw body of catalog page `page`
    pub async fn fetch_page_body(&self, page: usize) -> Result<String> {
        let url = self.page_url(page)?;
        fetch_url(&self.client, url.as_str())
            .await
            .into_body(url.as_str())
    }

    /// Fetches catalog page `page` and returns the item URLs it lists
    ///
    /// Any failure yields an empty list; the page is skipped, not retried.
    pub async fn fetch_catalog_page(&self, page: usize) -> Vec<String> {
        match self.fetch_page_body(page).await {
            Ok(body) => {
                let urls = self.extract_item_urls(&body);
                tracing::debug!("Catalog page {} lists {} items", page, urls.len());
                urls
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Skipping catalog page");
                Vec::new()
            }
        }
    }

    /// Extracts absolute item URLs from a catalog page body
    ///
    /// Headings without a link, or links without an `href`, are skipped.
    /// Duplicate links are reported once, in first-seen order.
    pub fn extract_item_urls(&self, body: &str) -> Vec<String> {
        let document = parse_document(body);

        let Some(listing) = self.listing.locate(document.root_element()) else {
            tracing::debug!("No item listing on catalog page");
            return Vec::new();
        };

        let mut urls: Vec<String> = Vec::new();
        for heading in find_all(listing, &self.heading.tag, &self.heading.class) {
            let Some(link) = self.link.locate(heading) else {
                continue;
            };

            let href = match link.value().attr("href").map(str::trim) {
                Some(href) if !href.is_empty() => href,
                _ => continue,
            };

            match self.root.join(href) {
                Ok(url) => {
                    let url = url.to_string();
                    if !urls.contains(&url) {
                        urls.push(url);
                    }
                }
                Err(e) => tracing::debug!("Unresolvable item href {}: {}", href, e),
            }
        }

        urls
    }
}
