use catalog_service::models::{Product, ProductStatus};

/// Price with its currency, e.g. `19.90 €`
pub fn format_price(price: &str) -> String {
    format!("{} €", price.trim())
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

pub fn status_label(status: ProductStatus) -> &'static str {
    match status {
        ProductStatus::Online => "online",
        ProductStatus::Offline => "offline",
    }
}

/// One-line summary used in listings
pub fn product_line(product: &Product) -> String {
    let category = match product.category_name() {
        "" => "-",
        name => name,
    };
    format!(
        "#{:<5} {:<32} {:>12}  {:<16} {}",
        product.id,
        truncate(&product.name, 32),
        format_price(&product.price),
        truncate(category, 16),
        status_label(product.status)
    )
}

/// "yes" / "no"
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_service::models::Category;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("19.90"), "19.90 €");
        assert_eq!(format_price(" 5.00 "), "5.00 €");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Phone", 10), "Phone");
        assert_eq!(truncate("Électroménager", 6), "Élect…");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_product_line() {
        let product = Product {
            id: 7,
            name: "Phone X".to_string(),
            description: String::new(),
            price: "499.00".to_string(),
            status: ProductStatus::Offline,
            category: Some(Category {
                id: 1,
                name: "Électronique".to_string(),
            }),
        };

        let line = product_line(&product);
        assert!(line.starts_with("#7 "));
        assert!(line.contains("Phone X"));
        assert!(line.contains("499.00 €"));
        assert!(line.contains("Électronique"));
        assert!(line.ends_with("offline"));

        let uncategorized = Product {
            category: None,
            ..product
        };
        assert!(product_line(&uncategorized).contains(" - "));
    }
}
