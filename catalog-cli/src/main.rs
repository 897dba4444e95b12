use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod utils;

use commands::products::ProductsArgs;

/// catalog - browse a running catalog API
#[derive(Parser)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL, including the /api prefix (defaults to $CATALOG_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all categories
    Categories,
    /// Show one server page of a category's products
    Category {
        /// Category id
        #[arg(value_name = "ID")]
        id: i64,

        /// Page number (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search, sort and page through all products
    Products(ProductsArgs),
    /// Show a single product
    Product {
        /// Product id
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Check service health and readiness
    Health {
        /// Print response bodies
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let overrides = commands::ClientOverrides {
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
        max_pages: match &cli.command {
            Commands::Products(args) => args.max_pages,
            _ => None,
        },
    };

    let result = match commands::client(&overrides) {
        Ok(client) => match cli.command {
            Commands::Categories => commands::categories::execute(&client).await,
            Commands::Category { id, page } => commands::category::execute(&client, id, page).await,
            Commands::Products(args) => commands::products::execute(&client, args).await,
            Commands::Product { id } => commands::product::execute(&client, id).await,
            Commands::Health { verbose } => commands::health::execute(&client, verbose).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_service::browse::{SortKey, SortOrder};
    use catalog_service::models::ProductStatus;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_products_defaults() {
        let cli = Cli::try_parse_from(["catalog", "products"]).unwrap();
        let Commands::Products(args) = cli.command else {
            panic!("expected products command");
        };
        assert_eq!(args.sort, SortKey::Id);
        assert_eq!(args.order, SortOrder::Desc);
        assert_eq!(args.page, 1);
        assert!(args.search.is_none());
        assert!(args.max_pages.is_none());
    }

    #[test]
    fn test_products_options() {
        let cli = Cli::try_parse_from([
            "catalog",
            "products",
            "--category",
            "2",
            "--status",
            "offline",
            "--search",
            "phone",
            "--sort",
            "price",
            "--order",
            "asc",
            "--page",
            "3",
            "--max-pages",
            "5",
            "--base-url",
            "http://localhost:9000/api",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000/api"));
        let Commands::Products(args) = cli.command else {
            panic!("expected products command");
        };
        assert_eq!(args.category.as_deref(), Some("2"));
        assert_eq!(args.status, Some(ProductStatus::Offline));
        assert_eq!(args.sort, SortKey::Price);
        assert_eq!(args.order, SortOrder::Asc);
        assert_eq!(args.page, 3);
        assert_eq!(args.max_pages, Some(5));
    }

    #[test]
    fn test_invalid_sort_is_rejected() {
        assert!(Cli::try_parse_from(["catalog", "products", "--sort", "weight"]).is_err());
        assert!(Cli::try_parse_from(["catalog", "products", "--status", "archived"]).is_err());
    }

    #[test]
    fn test_category_page() {
        let cli = Cli::try_parse_from(["catalog", "category", "1", "--page", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Category { id: 1, page: 3 }));
    }
}
