//! Document lookup primitives
//!
//! The scraping core only needs two things from the HTML layer: parse raw
//! text into a tree, and find descendants by tag name plus a class
//! condition. Both are provided here on top of `scraper`.

use regex::Regex;
use scraper::{ElementRef, Html};

/// Condition on an element's `class` attribute
#[derive(Debug, Clone)]
pub enum ClassMatch {
    /// Any element, with or without a class
    Any,

    /// Only elements that carry no `class` attribute
    Unclassed,

    /// A single class token, or the entire class attribute, equals the string
    Exact(String),

    /// The pattern is found in a single class token or in the entire attribute
    Pattern(Regex),
}

impl ClassMatch {
    /// Convenience constructor for [`ClassMatch::Exact`]
    pub fn exact(class: impl Into<String>) -> Self {
        Self::Exact(class.into())
    }

    /// Returns true if an element with the given `class` attribute satisfies this condition
    pub fn matches(&self, class_attr: Option<&str>) -> bool {
        match (self, class_attr) {
            (Self::Any, _) => true,
            (Self::Unclassed, attr) => attr.is_none(),
            (_, None) => false,
            (Self::Exact(wanted), Some(attr)) => {
                let wanted = wanted.trim();
                attr.split_whitespace().any(|token| token == wanted) || normalize(attr) == wanted
            }
            (Self::Pattern(pattern), Some(attr)) => {
                attr.split_whitespace().any(|token| pattern.is_match(token))
                    || pattern.is_match(&normalize(attr))
            }
        }
    }
}

/// Collapses runs of whitespace in a class attribute to single spaces
fn normalize(attr: &str) -> String {
    attr.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses raw HTML text into a navigable document
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Iterates over every descendant of `scope` (excluding `scope` itself)
/// with the given tag name that satisfies `class`, in document order
pub fn find_all<'a, 'm>(
    scope: ElementRef<'a>,
    tag: &'m str,
    class: &'m ClassMatch,
) -> impl Iterator<Item = ElementRef<'a>> + 'm
where
    'a: 'm,
{
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |element| {
            element.value().name().eq_ignore_ascii_case(tag)
                && class.matches(element.value().attr("class"))
        })
}

/// Finds the first descendant of `scope` matching tag and class
pub fn find_first<'a>(scope: ElementRef<'a>, tag: &str, class: &ClassMatch) -> Option<ElementRef<'a>> {
    find_all(scope, tag, class).next()
}

/// Returns the concatenated text of an element and all its descendants
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
