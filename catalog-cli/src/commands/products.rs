use anyhow::{Context, Result};
use catalog_service::browse::{SearchFilter, SortKey, SortOrder, SortSpec};
use catalog_service::client::{ApiClient, ProductQuery};
use catalog_service::models::{Product, ProductStatus};
use catalog_service::view::{CatalogView, LoadState};
use clap::Args;

use crate::utils::{self, format};

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Category id or /api/categories/{id} reference
    #[arg(long, value_name = "ID")]
    pub category: Option<String>,

    /// Publication status (online|offline)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<ProductStatus>,

    /// Case-insensitive text searched in name and description
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Sort key (id|name|price|category|status)
    #[arg(long, default_value_t = SortKey::Id)]
    pub sort: SortKey,

    /// Sort order (asc|desc)
    #[arg(long, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Page of the result to show, 12 products per page
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Upper bound on server pages fetched
    #[arg(long, value_name = "N")]
    pub max_pages: Option<u32>,
}

impl ProductsArgs {
    fn query(&self) -> ProductQuery {
        ProductQuery {
            category: self.category.clone(),
            status: self.status,
        }
    }
}

pub async fn execute(client: &ApiClient, args: ProductsArgs) -> Result<()> {
    let mut view: CatalogView<Product> = CatalogView::new();

    match client.all_products(&args.query()).await {
        Ok(collection) => view.load(collection.items),
        Err(e) => {
            view.fail();
            return Err(e).context(view.to_string());
        }
    }

    arrange(&mut view, &args);
    render(&view);

    Ok(())
}

/// Apply the command-line search, sort and page to a loaded view
fn arrange(view: &mut CatalogView<Product>, args: &ProductsArgs) {
    view.set_sort(SortSpec::new(args.sort, args.order));
    view.set_filter(SearchFilter::from_option(args.search.as_deref()));
    view.go_to(args.page);
}

fn render(view: &CatalogView<Product>) {
    utils::section("Products");

    if let Some(notice) = view.notice() {
        match view.state() {
            LoadState::Failed => utils::error(notice),
            _ => utils::warning(notice),
        }
        return;
    }

    for product in view.items() {
        println!("  {}", format::product_line(product));
    }

    println!();
    utils::info(&view.count_label());
    if let Some(label) = view.page_label() {
        let mut hints = Vec::new();
        if view.has_previous() {
            hints.push(format!("--page {} for previous", view.page() - 1));
        }
        if view.has_next() {
            hints.push(format!("--page {} for next", view.page() + 1));
        }
        if hints.is_empty() {
            utils::info(&label);
        } else {
            utils::info(&format!("{} ({})", label, hints.join(", ")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price: price.to_string(),
            status: ProductStatus::Online,
            category: None,
        }
    }

    fn args(search: Option<&str>, sort: SortKey, order: SortOrder, page: usize) -> ProductsArgs {
        ProductsArgs {
            category: None,
            status: None,
            search: search.map(str::to_string),
            sort,
            order,
            page,
            max_pages: None,
        }
    }

    #[test]
    fn test_arrange_filters_sorts_and_pages() {
        let mut view = CatalogView::new();
        view.load(
            (1..=30)
                .map(|id| product(id, &format!("Phone {}", id), &format!("{}.00", 31 - id)))
                .chain([product(31, "T-Shirt", "1.00")])
                .collect(),
        );

        arrange(
            &mut view,
            &args(Some("phone"), SortKey::Price, SortOrder::Asc, 2),
        );

        assert_eq!(view.result_count(), 30);
        assert_eq!(view.page(), 2);
        assert_eq!(view.items()[0].price, "13.00");
    }

    #[test]
    fn test_arrange_clamps_page() {
        let mut view = CatalogView::new();
        view.load(vec![product(1, "Phone", "1.00")]);

        arrange(&mut view, &args(None, SortKey::Id, SortOrder::Desc, 9));
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_query_keeps_server_filters() {
        let mut a = args(None, SortKey::Id, SortOrder::Desc, 1);
        a.category = Some("2".to_string());
        a.status = Some(ProductStatus::Online);

        let query = a.query();
        assert_eq!(query.category.as_deref(), Some("2"));
        assert_eq!(query.status, Some(ProductStatus::Online));
    }
}
