//! Client-side search and sorting over an in-memory collection
//!
//! [`apply`] always starts from the full collection, so changing the search term
//! or the sort never depends on the previous result.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::browse::{apply, SearchFilter, SortKey, SortOrder, SortSpec};
//! use catalog_service::models::Product;
//!
//! let products: Vec<Product> = serde_json::from_value(serde_json::json!([
//!     {"id": 1, "name": "Phone X", "description": "Smartphone", "price": "499.00"},
//!     {"id": 2, "name": "T-Shirt", "description": "Coton", "price": "15.00"}
//! ])).unwrap();
//!
//! let found = apply(
//!     &products,
//!     &SearchFilter::new("phone"),
//!     &SortSpec::new(SortKey::Price, SortOrder::Asc),
//! );
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].name, "Phone X");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;

use crate::models::Product;

/// Field a collection can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Price,
    /// Category display name, empty when uncategorized
    Category,
    Status,
}

impl SortKey {
    pub const ALL: [Self; 5] = [Self::Id, Self::Name, Self::Price, Self::Category, Self::Status];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Category => "category",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown sort key '{}', expected one of: id, name, price, category, status",
                    s
                )
            })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{}', expected asc or desc", other)),
        }
    }
}

/// Sort key and direction; defaults to id, descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// Free-text search over name and description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    term: Option<String>,
}

impl SearchFilter {
    /// A blank term matches everything
    pub fn new(term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();
        Self {
            term: (!term.is_empty()).then(|| term.to_lowercase()),
        }
    }

    pub fn from_option(term: Option<&str>) -> Self {
        term.map(Self::new).unwrap_or_default()
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Case-insensitive substring match on name or description
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match &self.term {
            None => true,
            Some(term) => {
                record.name().to_lowercase().contains(term.as_str())
                    || record.description().to_lowercase().contains(term.as_str())
            }
        }
    }
}

/// Value a record exposes for one sort key
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(Cow<'a, str>),
    Missing,
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Missing => 2,
        }
    }

    /// Ascending order: numbers, then text, then missing values
    pub fn compare(&self, other: &Self, collation: &Collation) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => collation.compare(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Anything the search and sort can inspect
pub trait Record {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn sort_value(&self, key: SortKey) -> SortValue<'_>;
}

impl Record for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::Id => SortValue::Number(self.id as f64),
            SortKey::Name => SortValue::Text(Cow::Borrowed(&self.name)),
            SortKey::Price => self
                .price_value()
                .map_or(SortValue::Missing, SortValue::Number),
            SortKey::Category => SortValue::Text(Cow::Borrowed(self.category_name())),
            SortKey::Status => SortValue::Text(Cow::Borrowed(self.status.as_str())),
        }
    }
}

/// Untyped records as decoded from an envelope
impl Record for Value {
    fn name(&self) -> &str {
        self.get("name").and_then(Value::as_str).unwrap_or("")
    }

    fn description(&self) -> &str {
        self.get("description").and_then(Value::as_str).unwrap_or("")
    }

    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        if key == SortKey::Category {
            let name = self
                .get("category")
                .and_then(|c| c.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("");
            return SortValue::Text(Cow::Borrowed(name));
        }

        match self.get(key.as_str()) {
            Some(Value::Number(n)) => n.as_f64().map_or(SortValue::Missing, SortValue::Number),
            Some(Value::String(s)) if key == SortKey::Price => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .map_or(SortValue::Missing, SortValue::Number),
            Some(Value::String(s)) => SortValue::Text(Cow::Borrowed(s)),
            _ => SortValue::Missing,
        }
    }
}

/// Filter `items` by `filter`, then stable-sort by `sort`
pub fn apply<T: Record + Clone>(items: &[T], filter: &SearchFilter, sort: &SortSpec) -> Vec<T> {
    let mut selected: Vec<T> = items
        .iter()
        .filter(|item| filter.matches(*item))
        .cloned()
        .collect();

    let collation = Collation::new();
    selected.sort_by(|a, b| {
        let ordering = a
            .sort_value(sort.key)
            .compare(&b.sort_value(sort.key), &collation);
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    selected
}

/// Locale-aware string ordering
///
/// Uses the CLDR collation for French, so case and accents order the way a
/// reader expects ("eau" < "église" < "Fromage"). Strings the collator considers
/// equal fall back to their raw order.
pub struct Collation {
    collator: Option<Collator>,
}

impl Collation {
    pub fn new() -> Self {
        let collator = Collator::try_new(&locale!("fr").into(), CollatorOptions::new())
            .map_err(|e| {
                tracing::warn!(error = ?e, "Locale collation unavailable, using case-insensitive order");
            })
            .ok();
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let ordering = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        ordering.then_with(|| a.cmp(b))
    }
}

impl Default for Collation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collation")
            .field("locale", &"fr")
            .field("available", &self.collator.is_some())
            .finish()
    }
}

/// Compare two strings once; prefer a shared [`Collation`] when sorting
pub fn collate(a: &str, b: &str) -> Ordering {
    Collation::new().compare(a, b)
}
