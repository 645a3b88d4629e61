//! Record data model
//!
//! One [`Record`] is produced per item detail page. Every field carries a
//! valid default, so a record is complete even when nothing could be
//! extracted from its page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A numeric value that remembers whether it was written with a decimal point
///
/// `£51.77` decodes to `Float(51.77)` and `22` to `Int(22)`; the distinction
/// survives persistence (`51.77` vs `22` in JSON).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as an integer, truncating any fractional part
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Int(n) => n,
            Self::Float(f) => f.trunc() as i64,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Structured data extracted from one item detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Item title (first heading of the primary block)
    pub title: String,

    /// Price with its currency symbol stripped
    pub price: Number,

    /// Star rating, 0 to 5
    pub rating: u8,

    /// Number of copies in stock
    pub available: i64,

    /// Free-text description
    pub description: String,

    /// Key/value rows of the "product information" table
    pub additional_info: BTreeMap<String, String>,
}

/// Identifies one of the scalar fields of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Title,
    Price,
    Rating,
    Available,
    Description,
}

impl RecordField {
    /// Returns the persisted key for this field
    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Available => "available",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
