//! Query string parameters of the listing endpoints
//!
//! Parsing is lenient where browsers and old clients are sloppy: a page number
//! keeps its leading digits (`3abc` is page 3) and anything unparsable is page 1.
//! Filters are strict and reject unknown values with a 400.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::ProductStatus;
use crate::repository::ProductFilter;

/// Path prefix of a category reference, e.g. `/api/categories/4`
pub const CATEGORY_REFERENCE_PREFIX: &str = "/api/categories/";

/// `?page=N`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page, 1 when absent or unparsable
    pub fn page_number(&self) -> i64 {
        self.page.as_deref().map(parse_page).unwrap_or(1).max(1)
    }
}

/// `?category=&status=&page=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl ProductsQuery {
    pub fn page_number(&self) -> i64 {
        PageQuery {
            page: self.page.clone(),
        }
        .page_number()
    }

    /// Repository filter for the category/status parameters
    ///
    /// Empty parameters are ignored.
    pub fn filter(&self) -> Result<ProductFilter> {
        let mut filter = ProductFilter::default();

        if let Some(raw) = non_empty(self.category.as_deref()) {
            let id = parse_category_reference(raw).ok_or_else(|| {
                Error::BadRequest(format!(
                    "Invalid category '{}', expected an id or {}{{id}}",
                    raw, CATEGORY_REFERENCE_PREFIX
                ))
            })?;
            filter = filter.with_category(id);
        }

        if let Some(raw) = non_empty(self.status.as_deref()) {
            let status = raw.parse::<ProductStatus>().map_err(Error::BadRequest)?;
            filter = filter.with_status(status);
        }

        Ok(filter)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Integer value of the leading `[+-]?[0-9]+` of `raw`, 0 if there is none
///
/// Values too large for an `i64` saturate.
pub fn parse_page(raw: &str) -> i64 {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Category id from `4` or `/api/categories/4`
pub fn parse_category_reference(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let id = raw.strip_prefix(CATEGORY_REFERENCE_PREFIX).unwrap_or(raw);
    id.parse::<i64>().ok()
}

/// Reference form of a category id
pub fn category_reference(id: i64) -> String {
    format!("{}{}", CATEGORY_REFERENCE_PREFIX, id)
}
