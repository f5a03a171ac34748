use serde_json::Value;

use crate::domain::entities::document::{
    ExportDocument, LEGACY_PRICE_TABLE_KEY, PRICE_TABLE_KEY,
};
use crate::domain::entities::price::PriceTable;
use crate::usecase::error::ValidationError;

pub fn parse_document(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|err| ValidationError::MalformedDocument(err.to_string()))
}

/// Extracts the price table from an import document, accepting the legacy key.
pub fn price_table_from_document(document: &Value) -> Result<PriceTable, ValidationError> {
    let table = document
        .as_object()
        .and_then(|object| {
            object
                .get(PRICE_TABLE_KEY)
                .or_else(|| object.get(LEGACY_PRICE_TABLE_KEY))
        })
        .filter(|value| value.is_object())
        .ok_or(ValidationError::MissingPriceTable)?;

    serde_json::from_value(table.clone()).map_err(|err| {
        ValidationError::MalformedDocument(format!("unreadable price table: {err}"))
    })
}

pub fn render_document(document: &ExportDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::price::PricePair;
    use serde_json::json;

    #[test]
    fn missing_price_fields_default_to_zero() {
        let table = price_table_from_document(&json!({
            "priceTable": { "Oran": { "home": 650 } }
        }))
        .expect("table should parse");

        assert_eq!(table.get("Oran"), Some(&PricePair::new(650, 0)));
    }

    #[test]
    fn legacy_key_is_accepted() {
        let table = price_table_from_document(&json!({
            "deliveryPrices": { "Blida": { "home": 500, "desk": 300 } },
            "exportDate": "1/1/2024"
        }))
        .expect("legacy document should parse");

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn documents_without_table_are_rejected() {
        assert_eq!(
            price_table_from_document(&json!({ "regions": [] })),
            Err(ValidationError::MissingPriceTable)
        );
        assert_eq!(
            price_table_from_document(&json!({ "priceTable": [1, 2] })),
            Err(ValidationError::MissingPriceTable)
        );
        assert_eq!(
            price_table_from_document(&json!([])),
            Err(ValidationError::MissingPriceTable)
        );
    }

    #[test]
    fn negative_prices_make_the_document_malformed() {
        let result = price_table_from_document(&json!({
            "priceTable": { "Oran": { "home": -1, "desk": 0 } }
        }));

        assert!(matches!(result, Err(ValidationError::MalformedDocument(_))));
    }
}
