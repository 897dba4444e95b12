//! HTTP client for the catalog API

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use super::aggregate::{fetch_all, fetch_one, PageFetcher, SinglePage};
use super::error::ClientError;
use crate::config::ClientConfig;
use crate::envelope::Collection;
use crate::handlers::CATEGORY_REFERENCE_PREFIX;
use crate::models::{Category, Product, ProductStatus};

/// Environment variable consulted when no base URL is configured
pub const BASE_URL_ENV: &str = "CATALOG_API_BASE_URL";

/// Base URL used when neither configuration nor environment provide one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

const LD_JSON: &str = "application/ld+json";

/// Pick the base URL: explicit value, then `CATALOG_API_BASE_URL`, then the default
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    let from_env = std::env::var(BASE_URL_ENV).ok();
    choose_base_url(explicit, from_env.as_deref())
}

fn choose_base_url(explicit: Option<&str>, from_env: Option<&str>) -> String {
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Category filter in the reference form the server expects
///
/// Numeric ids become `/api/categories/{id}`; anything starting with `/` or not
/// numeric is passed through.
pub fn category_param(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('/') {
        return raw.to_string();
    }
    match raw.parse::<i64>() {
        Ok(id) => format!("{}{}", CATEGORY_REFERENCE_PREFIX, id),
        Err(_) => raw.to_string(),
    }
}

/// Filters for the product collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category id or `/api/categories/{id}` reference
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductQuery {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            params.push(("category", category_param(category)));
        }
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        params.push(("page", page.to_string()));
        params
    }
}

/// Configured client for the catalog API
///
/// Holds the base URL, default JSON-LD headers, the per-request timeout and the
/// page bound used by aggregating calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    max_pages: u32,
}

impl ApiClient {
    /// Build a client from configuration, resolving the base URL
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = resolve_base_url(config.base_url.as_deref());
        Self::with_base_url(&base_url, config.timeout(), config.max_pages)
    }

    /// Build a client for an explicit base URL (including the `/api` prefix)
    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        max_pages: u32,
    ) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .ok_or_else(|| ClientError::InvalidBaseUrl(base_url.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(LD_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(LD_JSON));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        tracing::debug!(base_url = %base_url, ?timeout, max_pages, "API client configured");

        Ok(Self {
            http,
            base_url,
            max_pages,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Service root, i.e. the base URL without its trailing `/api`
    fn root_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let root = base.strip_suffix("/api").unwrap_or(base);
        format!("{}{}", root, path)
    }

    async fn get_json(
        &self,
        url: String,
        params: Vec<(&'static str, String)>,
    ) -> Result<Value, ClientError> {
        tracing::debug!(url = %url, ?params, "GET");

        let response = self.http.get(&url).query(&params).send().await.map_err(|e| {
            let err = ClientError::from(e);
            tracing::error!(url = %url, "API request failed: {}", err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            tracing::warn!(status = status.as_u16(), url = %url, "API error response");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(url = %url, bytes = body.len(), "Response body is not JSON: {}", e);
                Ok(Value::Null)
            }
        }
    }

    /// Fetcher over `/products` pages with the given filters
    pub fn products_fetcher<'a>(&'a self, query: &'a ProductQuery) -> impl PageFetcher + 'a {
        move |page: u32| self.get_json(self.url("/products"), query.params(page))
    }

    /// Fetcher over `/categories/{id}/products` pages
    pub fn category_products_fetcher(&self, category_id: i64) -> impl PageFetcher + '_ {
        move |page: u32| {
            self.get_json(
                self.url(&format!("/categories/{}/products", category_id)),
                vec![("page", page.to_string())],
            )
        }
    }

    /// Every product matching `query`, bounded by `max_pages`
    ///
    /// Records that are not products are skipped, and `total_items` counts the
    /// products returned.
    pub async fn all_products(&self, query: &ProductQuery) -> Result<Collection<Product>, ClientError> {
        let fetcher = self.products_fetcher(query);
        let mut products: Collection<Product> =
            fetch_all(&fetcher, self.max_pages).await?.into_typed();
        products.total_items = products.items.len() as u64;
        Ok(products)
    }

    /// One server page of products
    pub async fn products_page(
        &self,
        query: &ProductQuery,
        page: u32,
    ) -> Result<SinglePage<Product>, ClientError> {
        let fetcher = self.products_fetcher(query);
        Ok(fetch_one(&fetcher, page).await?.into_typed())
    }

    /// One server page of a category's products
    pub async fn category_products(
        &self,
        category_id: i64,
        page: u32,
    ) -> Result<SinglePage<Product>, ClientError> {
        let fetcher = self.category_products_fetcher(category_id);
        Ok(fetch_one(&fetcher, page).await?.into_typed())
    }

    /// All categories
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let fetcher = move |page: u32| {
            self.get_json(self.url("/categories"), vec![("page", page.to_string())])
        };
        Ok(fetch_all(&fetcher, self.max_pages).await?.into_typed().items)
    }

    /// A single product
    pub async fn product(&self, id: i64) -> Result<Product, ClientError> {
        let raw = self.get_json(self.url(&format!("/products/{}", id)), Vec::new()).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Liveness endpoint of the service
    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get_json(self.root_url("/health"), Vec::new()).await
    }

    /// Readiness endpoint; a not-ready service answers 503
    pub async fn readiness(&self) -> Result<Value, ClientError> {
        self.get_json(self.root_url("/ready"), Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::router;
    use crate::models::{Category, Product};
    use crate::repository::InMemoryCatalogRepository;
    use crate::state::AppState;
    use axum::routing::get;
    use std::sync::Arc;

    #[test]
    fn test_base_url_resolution_order() {
        assert_eq!(
            choose_base_url(Some("http://shop.test/api/"), Some("http://env.test/api")),
            "http://shop.test/api"
        );
        assert_eq!(
            choose_base_url(None, Some("http://env.test/api")),
            "http://env.test/api"
        );
        assert_eq!(choose_base_url(Some("  "), None), DEFAULT_BASE_URL);
        assert_eq!(choose_base_url(None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_category_param() {
        assert_eq!(category_param("3"), "/api/categories/3");
        assert_eq!(category_param("/api/categories/3"), "/api/categories/3");
        assert_eq!(category_param("books"), "books");
    }

    #[test]
    fn test_product_query_params() {
        let query = ProductQuery::default()
            .with_category("2")
            .with_status(ProductStatus::Online);
        assert_eq!(
            query.params(4),
            vec![
                ("category", "/api/categories/2".to_string()),
                ("status", "online".to_string()),
                ("page", "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        for bad in ["not a url", "ftp://catalog.test/api", ""] {
            let err = ApiClient::with_base_url(bad, Duration::from_secs(1), 10).unwrap_err();
            assert!(matches!(err, ClientError::InvalidBaseUrl(_)), "{}", bad);
        }
    }

    #[test]
    fn test_root_url_strips_api_prefix() {
        let client =
            ApiClient::with_base_url("http://127.0.0.1:8000/api", Duration::from_secs(1), 10)
                .unwrap();
        assert_eq!(client.root_url("/health"), "http://127.0.0.1:8000/health");
        assert_eq!(client.url("/products"), "http://127.0.0.1:8000/api/products");
    }

    async fn spawn_catalog(product_count: i64) -> String {
        let category = Category {
            id: 1,
            name: "Électronique".to_string(),
        };
        let products = (1..=product_count)
            .map(|id| Product {
                id,
                name: format!("Phone {}", id),
                description: String::new(),
                price: format!("{}.99", id),
                status: ProductStatus::Online,
                category: Some(category.clone()),
            })
            .collect();
        let repo = InMemoryCatalogRepository::new(vec![category], products);
        let app = router(AppState::new(Config::default(), Arc::new(repo)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api", addr)
    }

    #[tokio::test]
    async fn test_all_products_against_live_server() {
        let base_url = spawn_catalog(25).await;
        let client = ApiClient::with_base_url(&base_url, Duration::from_secs(5), 10).unwrap();

        let all = client
            .all_products(&ProductQuery::default().with_category("1"))
            .await
            .unwrap();

        assert_eq!(all.total_items, 25);
        let ids: Vec<i64> = all.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=25).rev().collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_page_bound_against_live_server() {
        let base_url = spawn_catalog(25).await;
        let client = ApiClient::with_base_url(&base_url, Duration::from_secs(5), 2).unwrap();

        let all = client.all_products(&ProductQuery::default()).await.unwrap();
        assert_eq!(all.items.len(), 20);
    }

    #[tokio::test]
    async fn test_single_pages_against_live_server() {
        let base_url = spawn_catalog(23).await;
        let client = ApiClient::with_base_url(&base_url, Duration::from_secs(5), 10).unwrap();

        let page = client.category_products(1, 3).await.unwrap();
        assert_eq!(page.items_per_page, 3);
        assert_eq!(page.total_items, 23);
        assert!(page.has_previous());
        assert_eq!(page.has_next(), Some(false));

        let page = client.products_page(&ProductQuery::default(), 1).await.unwrap();
        assert_eq!(page.items_per_page, 10);

        let categories = client.categories().await.unwrap();
        assert_eq!(categories.len(), 1);

        let product = client.product(7).await.unwrap();
        assert_eq!(product.price, "7.99");
    }

    #[tokio::test]
    async fn test_missing_product_is_status_error() {
        let base_url = spawn_catalog(1).await;
        let client = ApiClient::with_base_url(&base_url, Duration::from_secs(5), 10).unwrap();

        let err = client.product(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_health_against_live_server() {
        let base_url = spawn_catalog(0).await;
        let client = ApiClient::with_base_url(&base_url, Duration::from_secs(5), 10).unwrap();

        let body = client.health().await.unwrap();
        assert_eq!(body["status"], "healthy");

        let body = client.readiness().await.unwrap();
        assert_eq!(body["ready"], true);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let app = axum::Router::new().route(
            "/api/products",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = ApiClient::with_base_url(
            &format!("http://{}/api", addr),
            Duration::from_millis(100),
            10,
        )
        .unwrap();

        let err = client
            .all_products(&ProductQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }), "{:?}", err);
    }

    async fn spawn_stub(app: axum::Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        ApiClient::with_base_url(&format!("http://{}/api", addr), Duration::from_secs(5), 10)
            .unwrap()
    }

    #[tokio::test]
    async fn test_non_json_body_is_an_empty_collection() {
        let client = spawn_stub(axum::Router::new().route(
            "/api/products",
            get(|| async { "<html>maintenance</html>" }),
        ))
        .await;

        let all = client.all_products(&ProductQuery::default()).await.unwrap();
        assert!(all.items.is_empty());
        assert_eq!(all.total_items, 0);

        let page = client.products_page(&ProductQuery::default(), 1).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_records_do_not_abort_aggregation() {
        let client = spawn_stub(axum::Router::new().route(
            "/api/products",
            get(|| async {
                axum::Json(serde_json::json!({
                    "hydra:member": [
                        {"id": 3, "name": "Lamp", "price": "12.00", "category": "/api/categories/1"},
                        {"id": 2, "name": "Phone", "price": "99.00",
                         "category": {"id": 1, "name": "Électronique"}},
                        {"id": "broken"}
                    ],
                    "hydra:totalItems": 3
                }))
            }),
        ))
        .await;

        let all = client.all_products(&ProductQuery::default()).await.unwrap();
        let ids: Vec<i64> = all.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(all.total_items, 2);
        assert!(all.items[0].category.is_none());
        assert_eq!(all.items[1].category_name(), "Électronique");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::with_base_url(
            &format!("http://{}/api", addr),
            Duration::from_secs(2),
            10,
        )
        .unwrap();

        let err = client.categories().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "{:?}", err);
    }
}
