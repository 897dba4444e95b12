//! Reassembling paginated collections
//!
//! A [`PageFetcher`] returns the raw envelope of one page. [`pages`] turns it into a
//! bounded, lazy stream of decoded pages; [`fetch_all`] drains that stream into a
//! single collection and [`fetch_one`] reads exactly one page.
//!
//! Page `n + 1` is requested only after page `n` has been decoded. The stream stops
//! after the first of:
//!
//! - the running item count reaches the total reported by the latest page
//! - a page comes back empty
//! - `max_pages` pages have been fetched
//! - a fetch fails (the error is yielded, then the stream ends)
//!
//! # Example
//!
//! ```rust
//! use catalog_service::client::{fetch_all, ClientError};
//! use serde_json::{json, Value};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let fetcher = |page: u32| async move {
//!     let items: Vec<u32> = (1..=25).skip((page as usize - 1) * 10).take(10).collect();
//!     Ok::<Value, ClientError>(json!({"hydra:member": items, "hydra:totalItems": 25}))
//! };
//!
//! let all = fetch_all(&fetcher, 10).await.unwrap();
//! assert_eq!(all.total_items, 25);
//! # });
//! ```

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

use super::error::ClientError;
use crate::envelope::{decode, view_of, Collection, HydraView};

/// Source of raw collection envelopes, one per page number (1-indexed)
pub trait PageFetcher {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Value, ClientError>> + Send;
}

impl<F, Fut> PageFetcher for F
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Value, ClientError>> + Send,
{
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Value, ClientError>> + Send {
        self(page)
    }
}

/// One decoded page of a stream
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub page_number: u32,
    pub collection: Collection<Value>,
}

/// Result of [`fetch_one`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePage<T> {
    pub items: Vec<T>,
    /// Total reported by the server for the whole collection
    pub total_items: u64,
    pub page_number: u32,
    /// Number of items actually returned on this page
    pub items_per_page: usize,
    /// Navigation links, when the server sent a `hydra:view`
    pub view: Option<HydraView>,
}

impl<T> SinglePage<T> {
    pub fn has_previous(&self) -> bool {
        match &self.view {
            Some(view) => view.previous.is_some(),
            None => self.page_number > 1,
        }
    }

    /// Whether a next page exists; unknown without a `hydra:view`
    pub fn has_next(&self) -> Option<bool> {
        self.view.as_ref().map(|view| view.next.is_some())
    }
}

impl SinglePage<Value> {
    /// Typed records of the page; see [`Collection::into_typed`]
    pub fn into_typed<T: DeserializeOwned>(self) -> SinglePage<T> {
        let collection: Collection<T> = Collection {
            items: self.items,
            total_items: self.total_items,
        }
        .into_typed();

        SinglePage {
            items_per_page: collection.items.len(),
            items: collection.items,
            total_items: collection.total_items,
            page_number: self.page_number,
            view: self.view,
        }
    }
}

struct Cursor<'a, F> {
    fetcher: &'a F,
    next_page: u32,
    max_pages: u32,
    accumulated: u64,
    reported_total: Option<u64>,
    done: bool,
}

/// Lazy stream of decoded pages, at most `max_pages` long
pub fn pages<F: PageFetcher>(
    fetcher: &F,
    max_pages: u32,
) -> impl Stream<Item = Result<FetchedPage, ClientError>> + '_ {
    let cursor = Cursor {
        fetcher,
        next_page: 1,
        max_pages,
        accumulated: 0,
        reported_total: None,
        done: false,
    };

    stream::unfold(cursor, |mut cursor| async move {
        if cursor.done || cursor.next_page > cursor.max_pages {
            return None;
        }

        let page_number = cursor.next_page;
        tracing::debug!(page = page_number, "Fetching collection page");

        let raw = match cursor.fetcher.fetch_page(page_number).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(page = page_number, "Collection page fetch failed: {}", e);
                cursor.done = true;
                return Some((Err(e), cursor));
            }
        };

        let collection = decode(raw);

        if let Some(previous) = cursor.reported_total {
            if previous != collection.total_items {
                tracing::warn!(
                    page = page_number,
                    previous,
                    current = collection.total_items,
                    "Collection total changed between pages"
                );
            }
        }
        cursor.reported_total = Some(collection.total_items);
        cursor.accumulated += collection.items.len() as u64;
        cursor.next_page += 1;

        if collection.is_empty() || cursor.accumulated >= collection.total_items {
            cursor.done = true;
        }

        Some((
            Ok(FetchedPage {
                page_number,
                collection,
            }),
            cursor,
        ))
    })
}

/// Fetch pages `1..` and concatenate their items
///
/// The returned `total_items` is the number of items actually collected, which is
/// below the server's figure when `max_pages` cuts the walk short. Any failed fetch
/// fails the whole call.
pub async fn fetch_all<F: PageFetcher>(
    fetcher: &F,
    max_pages: u32,
) -> Result<Collection<Value>, ClientError> {
    let mut items = Vec::new();
    let mut fetched = 0u32;

    let stream = pages(fetcher, max_pages);
    futures::pin_mut!(stream);
    while let Some(page) = stream.try_next().await? {
        fetched += 1;
        items.extend(page.collection.items);
    }

    tracing::debug!(pages = fetched, items = items.len(), "Collection aggregated");

    Ok(Collection {
        total_items: items.len() as u64,
        items,
    })
}

/// Fetch a single page
pub async fn fetch_one<F: PageFetcher>(
    fetcher: &F,
    page_number: u32,
) -> Result<SinglePage<Value>, ClientError> {
    let page_number = page_number.max(1);
    let raw = fetcher.fetch_page(page_number).await?;
    let view = view_of(&raw);
    let collection = decode(raw);

    Ok(SinglePage {
        items_per_page: collection.items.len(),
        items: collection.items,
        total_items: collection.total_items,
        page_number,
        view,
    })
}
