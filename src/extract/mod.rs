//! Extraction module for turning parsed HTML into record fields
//!
//! This module contains:
//! - Document lookup by tag name and class condition
//! - Typed field rules and the extractor that decodes them

pub mod document;
mod field;

pub use document::{find_all, find_first, parse_document, text_of, ClassMatch};
pub use field::{merge_value, parse_rating, DecodeMode, FieldExtractor, FieldRule, FieldValue, Locator};
