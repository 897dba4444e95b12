//! Collection envelopes
//!
//! Listing endpoints wrap a [`Page`] in a Hydra collection:
//!
//! ```json
//! {
//!   "hydra:member": [ ... ],
//!   "hydra:totalItems": 23,
//!   "hydra:view": {
//!     "@id": "/api/categories/1/products?page=2",
//!     "@type": "hydra:PartialCollectionView",
//!     "hydra:first": "/api/categories/1/products?page=1",
//!     "hydra:last": "/api/categories/1/products?page=3",
//!     "hydra:previous": "/api/categories/1/products?page=1",
//!     "hydra:next": "/api/categories/1/products?page=3"
//!   }
//! }
//! ```
//!
//! Older deployments emit the same data as `member` / `totalItems`. [`decode`]
//! accepts both and degrades anything else to an empty [`Collection`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::Page;

/// `@type` of the view descriptor
pub const PARTIAL_COLLECTION_VIEW: &str = "hydra:PartialCollectionView";

/// Placeholder substituted with the page number in link templates
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Wire form of a page (current shape)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydraCollection<T> {
    #[serde(rename = "hydra:member")]
    pub member: Vec<T>,
    #[serde(rename = "hydra:totalItems")]
    pub total_items: u64,
    #[serde(rename = "hydra:view")]
    pub view: HydraView,
}

/// Navigation links of a partial collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydraView {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "hydra:first")]
    pub first: String,
    #[serde(rename = "hydra:last")]
    pub last: String,
    #[serde(rename = "hydra:previous", default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(rename = "hydra:next", default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Expand a link template such as `/api/categories/1/products?page={page}`
pub fn page_url(template: &str, page: u32) -> String {
    template.replace(PAGE_PLACEHOLDER, &page.to_string())
}

/// Wrap a page in a Hydra collection with links built from `template`
///
/// `hydra:last` points at `ceil(total / page_size)`, which is page 0 for an empty
/// collection.
pub fn encode<T>(page: Page<T>, template: &str) -> HydraCollection<T> {
    let last_page = page.last_page();
    let view = HydraView {
        id: page_url(template, page.page_number),
        kind: PARTIAL_COLLECTION_VIEW.to_string(),
        first: page_url(template, 1),
        last: page_url(template, last_page),
        previous: page
            .has_previous()
            .then(|| page_url(template, page.page_number - 1)),
        next: page
            .has_next()
            .then(|| page_url(template, page.page_number + 1)),
    };

    HydraCollection {
        member: page.items,
        total_items: page.total_items,
        view,
    }
}

/// Records and reported total extracted from an envelope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

impl<T> Collection<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Collection<Value> {
    /// Deserialize the records into `T`
    ///
    /// A record that does not fit `T` is skipped with a warning; the reported
    /// total is left untouched.
    pub fn into_typed<T: DeserializeOwned>(self) -> Collection<T> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value(raw) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, "Skipping malformed collection record: {}", e);
                    None
                }
            })
            .collect();

        Collection {
            items,
            total_items: self.total_items,
        }
    }
}

/// The envelope layouts understood by [`decode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `member` / `totalItems`
    Legacy,
    /// `hydra:member` / `hydra:totalItems`
    Hydra,
}

impl EnvelopeShape {
    /// Detection order
    pub const PRIORITY: [Self; 2] = [Self::Legacy, Self::Hydra];

    pub const fn items_key(self) -> &'static str {
        match self {
            Self::Legacy => "member",
            Self::Hydra => "hydra:member",
        }
    }

    pub const fn total_key(self) -> &'static str {
        match self {
            Self::Legacy => "totalItems",
            Self::Hydra => "hydra:totalItems",
        }
    }

    /// First shape whose items key is present and not `null`
    pub fn detect(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        Self::PRIORITY
            .into_iter()
            .find(|shape| map.get(shape.items_key()).is_some_and(|items| !items.is_null()))
    }
}

fn total_from(value: Option<&Value>) -> u64 {
    match value {
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        None => 0,
    }
}

/// Navigation links of a raw envelope, when it carries a well-formed `hydra:view`
pub fn view_of(raw: &Value) -> Option<HydraView> {
    raw.get("hydra:view")
        .and_then(|view| HydraView::deserialize(view).ok())
}

/// Extract records and total from either envelope shape
///
/// Never fails: a payload with no known key, or whose items are not an array,
/// decodes to an empty collection. The total is read from the same shape as the
/// items and defaults to 0.
pub fn decode(raw: Value) -> Collection<Value> {
    let Some(shape) = EnvelopeShape::detect(&raw) else {
        return Collection::empty();
    };
    let Value::Object(mut map) = raw else {
        return Collection::empty();
    };

    let items = match map.remove(shape.items_key()) {
        Some(Value::Array(items)) => items,
        _ => return Collection::empty(),
    };

    Collection {
        items,
        total_items: total_from(map.get(shape.total_key())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::paginate;
    use serde_json::json;

    const TEMPLATE: &str = "/api/categories/1/products?page={page}";

    #[test]
    fn test_encode_middle_page() {
        let envelope = encode(paginate((1..=23).collect::<Vec<i64>>(), 2, 10), TEMPLATE);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["hydra:totalItems"], 23);
        assert_eq!(value["hydra:member"].as_array().unwrap().len(), 10);
        let view = &value["hydra:view"];
        assert_eq!(view["@id"], "/api/categories/1/products?page=2");
        assert_eq!(view["@type"], PARTIAL_COLLECTION_VIEW);
        assert_eq!(view["hydra:first"], "/api/categories/1/products?page=1");
        assert_eq!(view["hydra:last"], "/api/categories/1/products?page=3");
        assert_eq!(view["hydra:previous"], "/api/categories/1/products?page=1");
        assert_eq!(view["hydra:next"], "/api/categories/1/products?page=3");
    }

    #[test]
    fn test_encode_omits_unavailable_links() {
        let first = serde_json::to_value(encode(paginate(vec![1, 2], 1, 10), TEMPLATE)).unwrap();
        assert!(first["hydra:view"].get("hydra:previous").is_none());
        assert!(first["hydra:view"].get("hydra:next").is_none());

        let last = encode(paginate((1..=23).collect::<Vec<i64>>(), 3, 10), TEMPLATE);
        assert!(last.view.previous.is_some());
        assert!(last.view.next.is_none());
    }

    #[test]
    fn test_encode_empty_collection() {
        let envelope = encode(paginate(Vec::<i64>::new(), 1, 10), TEMPLATE);
        assert_eq!(envelope.total_items, 0);
        assert_eq!(envelope.view.last, "/api/categories/1/products?page=0");
        assert!(envelope.view.next.is_none());
    }

    #[test]
    fn test_both_shapes_decode_identically() {
        let items = json!([{"id": 2, "name": "Phone X"}, {"id": 1, "name": "T-Shirt"}]);
        let legacy = decode(json!({"member": items.clone(), "totalItems": 2}));
        let hydra = decode(json!({"hydra:member": items, "hydra:totalItems": 2}));

        assert_eq!(legacy, hydra);
        assert_eq!(legacy.items.len(), 2);
        assert_eq!(legacy.total_items, 2);
    }

    #[test]
    fn test_decode_empty_object() {
        assert_eq!(decode(json!({})), Collection::empty());
    }

    #[test]
    fn test_decode_malformed_payloads() {
        assert_eq!(decode(json!({"member": "oops", "totalItems": 3})), Collection::empty());
        assert_eq!(decode(json!([1, 2, 3])), Collection::empty());
        assert_eq!(decode(json!(null)), Collection::empty());
        assert_eq!(decode(json!({"items": [1]})), Collection::empty());
    }

    #[test]
    fn test_legacy_shape_takes_priority() {
        let decoded = decode(json!({
            "member": [1],
            "totalItems": 1,
            "hydra:member": [1, 2],
            "hydra:totalItems": 2
        }));
        assert_eq!(decoded.items, vec![json!(1)]);
        assert_eq!(decoded.total_items, 1);
    }

    #[test]
    fn test_null_legacy_items_fall_through_to_hydra() {
        let decoded = decode(json!({
            "member": null,
            "totalItems": null,
            "hydra:member": [1, 2],
            "hydra:totalItems": 2
        }));
        assert_eq!(decoded.items, vec![json!(1), json!(2)]);
        assert_eq!(decoded.total_items, 2);
        assert_eq!(EnvelopeShape::detect(&json!({"member": null})), None);
    }

    #[test]
    fn test_missing_total_defaults_to_zero() {
        let decoded = decode(json!({"hydra:member": [1, 2]}));
        assert_eq!(decoded.items.len(), 2);
        assert_eq!(decoded.total_items, 0);

        let negative = decode(json!({"member": [], "totalItems": -4}));
        assert_eq!(negative.total_items, 0);
    }

    #[test]
    fn test_round_trip_through_encoder() {
        let envelope = encode(paginate(vec![json!({"id": 1})], 1, 10), TEMPLATE);
        let decoded = decode(serde_json::to_value(envelope).unwrap());
        assert_eq!(decoded.items, vec![json!({"id": 1})]);
        assert_eq!(decoded.total_items, 1);
    }

    #[test]
    fn test_into_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Row {
            id: i64,
        }

        let typed: Collection<Row> =
            decode(json!({"member": [{"id": 4}], "totalItems": 9})).into_typed();
        assert_eq!(typed.items, vec![Row { id: 4 }]);
        assert_eq!(typed.total_items, 9);

        let mixed: Collection<Row> = decode(json!({
            "member": [{"id": "x"}, {"id": 5}, "loose string", {"id": 6}],
            "totalItems": 4
        }))
        .into_typed();
        assert_eq!(mixed.items, vec![Row { id: 5 }, Row { id: 6 }]);
        assert_eq!(mixed.total_items, 4);
    }

    #[test]
    fn test_view_of() {
        let envelope = encode(paginate((1..=23).collect::<Vec<i64>>(), 3, 10), TEMPLATE);
        let view = view_of(&serde_json::to_value(envelope).unwrap()).unwrap();
        assert_eq!(view.previous.as_deref(), Some("/api/categories/1/products?page=2"));
        assert!(view.next.is_none());

        assert!(view_of(&json!({"member": [], "totalItems": 0})).is_none());
        assert!(view_of(&json!({"hydra:view": "nope"})).is_none());
    }
}
