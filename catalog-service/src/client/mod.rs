//! Client for the catalog API
//!
//! [`ApiClient`] performs the HTTP calls; the aggregation functions work over any
//! [`PageFetcher`], so tests drive them with plain closures.

mod aggregate;
mod api;
mod error;

pub use aggregate::{fetch_all, fetch_one, pages, FetchedPage, PageFetcher, SinglePage};
pub use api::{
    category_param, resolve_base_url, ApiClient, ProductQuery, BASE_URL_ENV, DEFAULT_BASE_URL,
};
pub use error::ClientError;
