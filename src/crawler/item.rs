//! Item detail page parsing
//!
//! A detail page holds its data under `<article class="product_page">`.
//! The primary block (`<div class="col-sm-6 product_main">`) carries title,
//! price, availability and rating; the description is the first unclassed
//! paragraph of the article, and an optional striped table holds extra
//! key/value rows.

use crate::crawler::fetcher::fetch_url;
use crate::extract::{
    find_all, merge_value, parse_document, text_of, ClassMatch, DecodeMode, FieldExtractor,
    FieldRule, Locator,
};
use crate::record::{Record, RecordField};
use crate::Result;
use regex::Regex;
use reqwest::Client;
use scraper::ElementRef;
use std::collections::BTreeMap;

/// Fetches item pages and extracts one [`Record`] from each
#[derive(Debug, Clone)]
pub struct ItemParser {
    client: Client,
    extractor: FieldExtractor,
    root: Locator,
    primary: Locator,
    primary_rules: Vec<FieldRule>,
    root_rules: Vec<FieldRule>,
    table: Locator,
    row: Locator,
    header_cell: Locator,
    data_cell: Locator,
}

impl ItemParser {
    pub fn new(client: Client) -> Self {
        let primary_pattern = Regex::new(".* product_main").expect("valid primary block regex");
        let rating_pattern = Regex::new("star-rating .*").expect("valid rating regex");

        let primary_rules = vec![
            FieldRule::new(
                RecordField::Title,
                Locator::new("h1", ClassMatch::Unclassed),
                DecodeMode::Text,
            ),
            FieldRule::new(
                RecordField::Price,
                Locator::new("p", ClassMatch::exact("price_color")),
                DecodeMode::Numeric,
            ),
            FieldRule::new(
                RecordField::Available,
                Locator::new("p", ClassMatch::exact("instock availability")),
                DecodeMode::Numeric,
            ),
            FieldRule::new(
                RecordField::Rating,
                Locator::new("p", ClassMatch::Pattern(rating_pattern)),
                DecodeMode::Rating,
            ),
        ];

        let root_rules = vec![FieldRule::new(
            RecordField::Description,
            Locator::new("p", ClassMatch::Unclassed),
            DecodeMode::Text,
        )];

        Self {
            client,
            extractor: FieldExtractor::new(),
            root: Locator::new("article", ClassMatch::exact("product_page")),
            primary: Locator::new("div", ClassMatch::Pattern(primary_pattern)),
            primary_rules,
            root_rules,
            table: Locator::new("table", ClassMatch::exact("table table-striped")),
            row: Locator::new("tr", ClassMatch::Any),
            header_cell: Locator::new("th", ClassMatch::Unclassed),
            data_cell: Locator::new("td", ClassMatch::Unclassed),
        }
    }

    /// Fetches `url` and extracts its record
    ///
    /// Never fails: an unreachable page or one without the expected
    /// structure yields [`Record::default`].
    pub async fn parse_item(&self, url: &str) -> Record {
        match self.try_parse_item(url).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(url, error = %e, "Item page unavailable, using defaults");
                Record::default()
            }
        }
    }

    /// Fetches `url` and extracts its record, reporting transport failures
    ///
    /// Structural mismatches are not errors; they still yield defaults.
    pub async fn try_parse_item(&self, url: &str) -> Result<Record> {
        let body = fetch_url(&self.client, url).await.into_body(url)?;
        Ok(self.parse_item_html(&body))
    }

    /// Extracts a record from an item page body
    pub fn parse_item_html(&self, body: &str) -> Record {
        let mut record = Record::default();
        let document = parse_document(body);

        let Some(root) = self.root.locate(document.root_element()) else {
            tracing::debug!("No product article on item page");
            return record;
        };

        let Some(primary) = self.primary.locate(root) else {
            tracing::debug!("No primary block on item page");
            return record;
        };

        self.apply_rules(&mut record, primary, &self.primary_rules);
        self.apply_rules(&mut record, root, &self.root_rules);

        if let Some(table) = self.table.locate(root) {
            record.additional_info = self.read_table(table);
        }

        record
    }

    fn apply_rules(&self, record: &mut Record, parent: ElementRef<'_>, rules: &[FieldRule]) {
        for rule in rules {
            if let Some(value) = self.extractor.apply(parent, rule) {
                merge_value(record, rule.field, value);
            }
        }
    }

    /// Reads `<th>`/`<td>` pairs from each table row
    ///
    /// Rows without a header cell are skipped; a header without a data cell
    /// leaves its key out rather than recording an empty value.
    fn read_table(&self, table: ElementRef<'_>) -> BTreeMap<String, String> {
        let mut rows = BTreeMap::new();

        for row in find_all(table, &self.row.tag, &self.row.class) {
            let Some(header) = self.header_cell.locate(row) else {
                continue;
            };
            let Some(data) = self.data_cell.locate(row) else {
                continue;
            };
            rows.insert(text_of(header), text_of(data).trim().to_string());
        }

        rows
    }
}
