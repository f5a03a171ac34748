use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder entry shown as "select a region" in storefront forms.
pub const UNSELECTED_REGION: &str = "إختر الولاية";

pub fn is_sentinel(region: &str) -> bool {
    region == UNSELECTED_REGION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Home,
    Desk,
}

impl PriceField {
    pub const ALL: [PriceField; 2] = [PriceField::Home, PriceField::Desk];

    pub fn as_str(self) -> &'static str {
        match self {
            PriceField::Home => "home",
            PriceField::Desk => "desk",
        }
    }
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Home-delivery and desk-pickup prices for one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    #[serde(default)]
    pub home: u64,
    #[serde(default)]
    pub desk: u64,
}

impl PricePair {
    pub fn new(home: u64, desk: u64) -> Self {
        Self { home, desk }
    }

    pub fn get(&self, field: PriceField) -> u64 {
        match field {
            PriceField::Home => self.home,
            PriceField::Desk => self.desk,
        }
    }

    pub fn set(&mut self, field: PriceField, value: u64) {
        match field {
            PriceField::Home => self.home = value,
            PriceField::Desk => self.desk = value,
        }
    }
}

/// Region name to prices, iterated in alphabetical order.
pub type PriceTable = BTreeMap<String, PricePair>;

pub fn committed_value(table: &PriceTable, region: &str, field: PriceField) -> u64 {
    table
        .get(region)
        .map(|prices| prices.get(field))
        .unwrap_or(0)
}

/// Reads a price typed into the table the way a number input reports it:
/// leading digits win, anything unparsable or negative reads as 0.
pub fn parse_price_input(text: &str) -> u64 {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return 0;
    }
    let digits: String = trimmed
        .trim_start_matches('+')
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Like [`parse_price_input`] but keeps the sign, so validation can reject
/// negative prices instead of silently clamping them.
pub fn parse_signed_price_input(text: &str) -> i64 {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.trim_start_matches('+')),
    };
    let digits: String = rest.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    let value = digits.parse::<i64>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}
