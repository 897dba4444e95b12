//! Offset pagination over ordered collections
//!
//! The repository hands back a full, ordered collection; [`paginate`] slices it into
//! one fixed-size page and [`Page`] answers the navigation questions the envelope
//! needs (last page, previous/next availability).
//!
//! # Example
//!
//! ```rust
//! use catalog_service::pagination::paginate;
//!
//! let ids: Vec<u32> = (1..=23).rev().collect();
//! let page = paginate(ids, 3, 10);
//!
//! assert_eq!(page.items, vec![3, 2, 1]);
//! assert_eq!(page.last_page(), 3);
//! assert!(page.has_previous());
//! assert!(!page.has_next());
//! ```

use serde::Serialize;

/// Page size used by the listing endpoints unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of an ordered collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Records on this page, at most `page_size` of them
    pub items: Vec<T>,
    /// 1-indexed page number
    pub page_number: u32,
    /// Fixed page size, always at least 1
    pub page_size: u32,
    /// Size of the whole collection
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Number of the last non-empty page, 0 for an empty collection
    pub fn last_page(&self) -> u32 {
        last_page(self.total_items, self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.last_page()
    }

    /// Offset of the first record of this page within the collection
    pub fn offset(&self) -> u64 {
        offset(self.page_number, self.page_size)
    }

    /// Transform the records while keeping the navigation data
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_items: self.total_items,
        }
    }
}

/// Coerce a requested page number: anything below 1 becomes 1
pub fn normalize_page(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

/// `ceil(total / page_size)`
pub fn last_page(total_items: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total_items.div_ceil(page_size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn offset(page_number: u32, page_size: u32) -> u64 {
    u64::from(page_number.saturating_sub(1)) * u64::from(page_size)
}

/// Slice an ordered collection into the requested page
///
/// Out-of-range pages are empty rather than an error. A `page_size` of 0 is
/// treated as 1.
pub fn paginate<T>(all: Vec<T>, page_number: i64, page_size: u32) -> Page<T> {
    let page_number = normalize_page(page_number);
    let page_size = page_size.max(1);
    let total_items = all.len() as u64;

    let start = offset(page_number, page_size);
    let items = if start >= total_items {
        Vec::new()
    } else {
        all.into_iter()
            .skip(start as usize)
            .take(page_size as usize)
            .collect()
    };

    Page {
        items,
        page_number,
        page_size,
        total_items,
    }
}
