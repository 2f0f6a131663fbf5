//! Catalog row → embedding input and index payload.

use domain_catalog::ProductRecord;
use domain_vector::Payload;
use serde_json::Value;

const SEPARATOR: &str = " | ";

/// Text fed to the embedding model for one product.
///
/// Field order is fixed: name, brand, category, type, description.
pub fn embeddable_document(product: &ProductRecord) -> String {
    [
        format!("Product: {}", product.name),
        format!("Brand: {}", product.brand),
        format!("Category: {}", product.category),
        format!("Type: {}", product.product_type),
        format!("Description: {}", product.description),
    ]
    .join(SEPARATOR)
}

/// Payload stored alongside the vector; `category` and `brand` are the
/// filterable keys.
pub fn index_payload(product: &ProductRecord) -> Payload {
    let mut payload = Payload::new();
    payload.insert("product_id".into(), Value::from(product.product_id.clone()));
    payload.insert("name".into(), Value::from(product.name.clone()));
    payload.insert("category".into(), Value::from(product.category.clone()));
    payload.insert("brand".into(), Value::from(product.brand.clone()));
    payload.insert("type".into(), Value::from(product.product_type.clone()));
    payload.insert("description".into(), Value::from(product.description.clone()));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> ProductRecord {
        ProductRecord::new("SKU-1", "Arc Lamp", "Lighting", "Lumen", "Floor lamp", "Brass arc")
    }

    #[test]
    fn test_document_format() {
        assert_eq!(
            embeddable_document(&lamp()),
            "Product: Arc Lamp | Brand: Lumen | Category: Lighting | Type: Floor lamp | Description: Brass arc"
        );
    }

    #[test]
    fn test_empty_fields_keep_labels() {
        let bare = ProductRecord::new("SKU-2", "Stool", "", "", "", "");
        assert_eq!(
            embeddable_document(&bare),
            "Product: Stool | Brand:  | Category:  | Type:  | Description: "
        );
    }

    #[test]
    fn test_payload_fields() {
        let payload = index_payload(&lamp());
        assert_eq!(payload.len(), 6);
        assert_eq!(payload["product_id"], "SKU-1");
        assert_eq!(payload["type"], "Floor lamp");
        assert_eq!(payload["brand"], "Lumen");
    }
}
