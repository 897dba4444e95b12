//! Catalog records as they travel over the wire

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Publication status of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Online,
    Offline,
}

impl ProductStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(format!(
                "unknown product status '{}', expected 'online' or 'offline'",
                other
            )),
        }
    }
}

/// A catalog product
///
/// `price` is kept as the decimal string the storage layer produces (two fraction
/// digits, e.g. `"19.90"`), never as a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub status: ProductStatus,
    /// Embedded category; a bare reference such as `"/api/categories/1"` reads as `None`
    #[serde(
        default,
        deserialize_with = "embedded_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
}

fn embedded_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CategoryField {
        Embedded(Category),
        Reference(String),
    }

    Ok(match Option::<CategoryField>::deserialize(deserializer)? {
        Some(CategoryField::Embedded(category)) => Some(category),
        Some(CategoryField::Reference(_)) | None => None,
    })
}

impl Product {
    /// Numeric value of the price, if it parses
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse::<f64>().ok().filter(|p| p.is_finite())
    }

    /// Display name of the product's category, empty when uncategorized
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}
