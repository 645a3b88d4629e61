//! Declarative field extraction
//!
//! A [`FieldRule`] names a record field, where to find its source node
//! inside a parent element, and how to decode that node. Decoding never
//! fails loudly: when a rule cannot be satisfied the extractor returns
//! `None` and the record field keeps its default.

use crate::extract::document::{find_first, text_of, ClassMatch};
use crate::record::{Number, Record, RecordField};
use regex::Regex;
use scraper::ElementRef;

/// Rating words in ordinal order; the index is the rating value
const RATING_WORDS: [&str; 6] = ["zero", "one", "two", "three", "four", "five"];

/// How the text of a located node is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Trimmed inner text
    Text,

    /// First number embedded in the text
    Numeric,

    /// Ordinal rating from the second class token (`star-rating Three`)
    Rating,
}

/// Where to find a rule's source node within its parent
#[derive(Debug, Clone)]
pub struct Locator {
    pub tag: String,
    pub class: ClassMatch,
}

impl Locator {
    pub fn new(tag: impl Into<String>, class: ClassMatch) -> Self {
        Self {
            tag: tag.into(),
            class,
        }
    }

    /// Finds the first node under `parent` matching this locator
    pub fn locate<'a>(&self, parent: ElementRef<'a>) -> Option<ElementRef<'a>> {
        find_first(parent, &self.tag, &self.class)
    }
}

/// One static extraction rule: target field, source locator, decoding mode
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: RecordField,
    pub locator: Locator,
    pub mode: DecodeMode,
}

impl FieldRule {
    pub fn new(field: RecordField, locator: Locator, mode: DecodeMode) -> Self {
        Self {
            field,
            locator,
            mode,
        }
    }
}

/// A successfully decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Rating(u8),
}

/// Decodes field values from document nodes
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    number_pattern: Regex,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            number_pattern: Regex::new(r"\d*\.\d+|\d+\.?").expect("valid number regex"),
        }
    }

    /// Locates the rule's node under `parent` and decodes it
    pub fn apply(&self, parent: ElementRef<'_>, rule: &FieldRule) -> Option<FieldValue> {
        let node = rule.locator.locate(parent);
        if node.is_none() {
            tracing::trace!("No node for field {} ({})", rule.field, rule.locator.tag);
        }
        self.extract(node, rule.mode)
    }

    /// Decodes an already located node; `None` means "absent"
    pub fn extract(&self, node: Option<ElementRef<'_>>, mode: DecodeMode) -> Option<FieldValue> {
        let node = node?;
        match mode {
            DecodeMode::Text => Some(FieldValue::Text(text_of(node).trim().to_string())),
            DecodeMode::Numeric => self.parse_number(&text_of(node)).map(FieldValue::Number),
            DecodeMode::Rating => parse_rating(node.value().attr("class")?).map(FieldValue::Rating),
        }
    }

    /// Finds the first run of digits (with at most one decimal point) in `text`
    pub fn parse_number(&self, text: &str) -> Option<Number> {
        let found = self.number_pattern.find(text)?.as_str();
        if found.contains('.') {
            found.parse().ok().map(Number::Float)
        } else {
            found.parse().ok().map(Number::Int)
        }
    }
}

/// Decodes the rating word carried by the second class token
pub fn parse_rating(class_attr: &str) -> Option<u8> {
    let word = class_attr.split_whitespace().nth(1)?.to_lowercase();
    RATING_WORDS
        .iter()
        .position(|candidate| *candidate == word)
        .map(|index| index as u8)
}

/// Writes a decoded value into the matching record field
///
/// Values whose kind does not fit the field are ignored, leaving the default.
pub fn merge_value(record: &mut Record, field: RecordField, value: FieldValue) {
    match (field, value) {
        (RecordField::Title, FieldValue::Text(text)) => record.title = text,
        (RecordField::Description, FieldValue::Text(text)) => record.description = text,
        (RecordField::Price, FieldValue::Number(number)) => record.price = number,
        (RecordField::Available, FieldValue::Number(number)) => record.available = number.as_i64(),
        (RecordField::Rating, FieldValue::Rating(rating)) => record.rating = rating,
        (field, value) => {
            tracing::debug!("Ignoring {:?} for field {}", value, field);
        }
    }
}
