use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::price::PriceTable;

/// Key holding the table in export/import documents.
pub const PRICE_TABLE_KEY: &str = "priceTable";
/// Key written by the older admin panel; still accepted on import.
pub const LEGACY_PRICE_TABLE_KEY: &str = "deliveryPrices";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub price_table: PriceTable,
    pub export_timestamp: String,
    pub region_count: usize,
}

impl ExportDocument {
    pub fn new(price_table: PriceTable, exported_at: DateTime<Utc>) -> Self {
        let region_count = price_table.len();
        Self {
            price_table,
            export_timestamp: exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            region_count,
        }
    }
}

pub fn export_file_name(date: NaiveDate, extension: &str) -> String {
    format!("delivery-prices-{}.{extension}", date.format("%Y-%m-%d"))
}
