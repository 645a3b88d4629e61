//! Catalog page-count resolution
//!
//! The first catalog page carries a pagination indicator such as
//! `<li class="current">Page 1 of 50</li>`. The trailing number is the total
//! page count. Every failure maps to `0`, which means "nothing to crawl".

use crate::crawler::catalog::CatalogFetcher;
use crate::extract::{parse_document, text_of, ClassMatch, Locator};
use regex::Regex;

/// Determines how many catalog pages exist
#[derive(Debug, Clone)]
pub struct PageCountResolver {
    indicator: Locator,
    pattern: Regex,
}

impl Default for PageCountResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCountResolver {
    pub fn new() -> Self {
        Self {
            indicator: Locator::new("li", ClassMatch::exact("current")),
            pattern: Regex::new(r"of (\d+)").expect("valid page count regex"),
        }
    }

    /// Fetches catalog page 1 and reads the total page count from it
    pub async fn resolve_page_count(&self, catalog: &CatalogFetcher) -> usize {
        match catalog.fetch_page_body(1).await {
            Ok(body) => self.parse_page_count(&body),
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch first catalog page");
                0
            }
        }
    }

    /// Reads the page count from a catalog page body, `0` if it cannot be found
    pub fn parse_page_count(&self, body: &str) -> usize {
        let document = parse_document(body);

        let Some(indicator) = self.indicator.locate(document.root_element()) else {
            tracing::debug!("No pagination indicator on first catalog page");
            return 0;
        };

        self.parse_indicator_text(&text_of(indicator))
    }

    /// Extracts `N` from text of the form `... of N`
    pub fn parse_indicator_text(&self, text: &str) -> usize {
        self.pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .and_then(|count| count.as_str().parse().ok())
            .unwrap_or(0)
    }
}
