//! KB market price lookup.
//!
//! The production lookup lives behind a web service; the desk only depends on the
//! [`PriceLookup`] capability. [`MockKbPriceLookup`] returns canned figures for a few
//! well-known complexes and a flat estimate for everything else.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEstimate {
    pub price: Decimal,
    pub source_label: String,
}

/// Resolves a free-text address to a best-effort market price.
pub trait PriceLookup: Send + Sync {
    fn lookup_price(&self, address: &str) -> PriceEstimate;
}

#[derive(Debug, Clone)]
pub struct MockKbPriceLookup {
    entries: Vec<(&'static str, Decimal)>,
    fallback: Decimal,
}

impl Default for MockKbPriceLookup {
    fn default() -> Self {
        Self {
            entries: vec![
                ("잠실엘스", dec!(2750000000)),
                ("래미안", dec!(1850000000)),
                ("정자아이파크", dec!(1360000000)),
                ("해운대", dec!(820000000)),
            ],
            fallback: dec!(500000000),
        }
    }
}

impl PriceLookup for MockKbPriceLookup {
    fn lookup_price(&self, address: &str) -> PriceEstimate {
        let compact: String = address.split_whitespace().collect();
        match self
            .entries
            .iter()
            .find(|(needle, _)| compact.contains(needle))
        {
            Some((needle, price)) => PriceEstimate {
                price: *price,
                source_label: format!("KB시세 일반평균가 (모의: {needle})"),
            },
            None => PriceEstimate {
                price: self.fallback,
                source_label: "KB시세 미확인 (기본 추정치)".to_string(),
            },
        }
    }
}
