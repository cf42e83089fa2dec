//! Wire types for the remote product API and their local projections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tienda_core::{CategoryId, ProductId};

// =============================================================================
// Remote shapes
// =============================================================================

/// A product as the remote API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    pub id: ProductId,
    pub title: String,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<RemoteCategory>,
}

/// The category object nested inside a remote product.
///
/// Only the id is projected; the remote also sends name and image.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCategory {
    pub id: CategoryId,
}

/// Payload sent to the remote API on create and update.
#[derive(Debug, Clone, Serialize)]
pub struct RemotePayload {
    pub title: Option<String>,
    pub price: i64,
    pub description: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub images: Vec<Option<String>>,
}

// =============================================================================
// Local projections
// =============================================================================

/// The simplified product shape returned to local clients.
///
/// Transient: built per request, never persisted. `category_id` is only
/// populated on detail fetches and omitted from serialized list entries.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    /// Mapped from the remote `title`.
    pub name: String,
    pub price: i64,
    pub description: String,
    /// First element of the remote `images` array, or empty string.
    pub image: String,
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// A locally validated create/update request body.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: Option<String>,
    pub price: i64,
    pub description: Option<String>,
    pub category_id: i64,
    pub image: Option<String>,
}

impl NewProduct {
    /// Build the payload the remote API expects; the single image becomes
    /// a one-element `images` array.
    #[must_use]
    pub fn into_payload(self) -> RemotePayload {
        RemotePayload {
            title: self.title,
            price: self.price,
            description: self.description,
            category_id: self.category_id,
            images: vec![self.image],
        }
    }
}

/// Parse a create/update request body.
///
/// `price` and `categoryId` accept either a JSON number or a numeric
/// string ("25" coerces to 25); anything else is an error. The string
/// fields pass through as-is, absent ones as null, matching what the
/// remote API receives from a permissive client.
///
/// # Errors
///
/// Returns a human-readable message when the body is not JSON or a
/// numeric field cannot be coerced.
pub fn parse_new_product(body: &str) -> Result<NewProduct, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("invalid JSON body: {e}"))?;

    let price = coerce_i64(value.get("price"), "price")?;
    let category_id = coerce_i64(value.get("categoryId"), "categoryId")?;

    Ok(NewProduct {
        title: string_field(&value, "title"),
        price,
        description: string_field(&value, "description"),
        category_id,
        image: string_field(&value, "image"),
    })
}

/// Coerce a JSON number or numeric string to i64.
fn coerce_i64(value: Option<&Value>, field: &str) -> Result<i64, String> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("field '{field}' is not an integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("field '{field}' is not numeric: '{s}'")),
        _ => Err(format!("field '{field}' is missing or not numeric")),
    }
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_new_product_with_string_numbers() {
        let body = r#"{"title":"Shirt","price":"25","description":"d","categoryId":"3","image":"http://x/i.png"}"#;
        let product = parse_new_product(body).unwrap();
        assert_eq!(product.price, 25);
        assert_eq!(product.category_id, 3);
        assert_eq!(product.title.as_deref(), Some("Shirt"));
    }

    #[test]
    fn test_parse_new_product_with_json_numbers() {
        let body = r#"{"title":"Shirt","price":25,"description":"d","categoryId":3,"image":"i"}"#;
        let product = parse_new_product(body).unwrap();
        assert_eq!(product.price, 25);
        assert_eq!(product.category_id, 3);
    }

    #[test]
    fn test_parse_new_product_rejects_non_numeric_price() {
        let body = r#"{"title":"Shirt","price":"cheap","categoryId":3}"#;
        let err = parse_new_product(body).unwrap_err();
        assert!(err.contains("price"));
    }

    #[test]
    fn test_parse_new_product_rejects_invalid_json() {
        let err = parse_new_product("{not json").unwrap_err();
        assert!(err.contains("invalid JSON body"));
    }

    #[test]
    fn test_parse_new_product_missing_strings_become_null() {
        let body = r#"{"price":1,"categoryId":2}"#;
        let product = parse_new_product(body).unwrap();
        assert!(product.title.is_none());

        let payload = serde_json::to_value(product.into_payload()).unwrap();
        assert_eq!(payload["title"], Value::Null);
        assert_eq!(payload["images"], json!([null]));
    }

    #[test]
    fn test_payload_wraps_image_in_array() {
        let product = parse_new_product(
            r#"{"title":"t","price":1,"description":"d","categoryId":2,"image":"http://x/i.png"}"#,
        )
        .unwrap();
        let payload = serde_json::to_value(product.into_payload()).unwrap();
        assert_eq!(payload["images"], json!(["http://x/i.png"]));
        assert_eq!(payload["categoryId"], json!(2));
    }
}
