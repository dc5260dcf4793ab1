use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::admin::AdminStore;
use crate::desk::{DeskService, QuoteInput};
use crate::lending::LoanStructure;
use crate::pricing::{PriceEstimate, PriceLookup};
use crate::registry::PatternSummarizer;

/// Price lookup returning one fixed figure and counting how often it was asked.
#[derive(Default)]
pub(super) struct FixedPrices {
    calls: AtomicUsize,
}

impl FixedPrices {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PriceLookup for FixedPrices {
    fn lookup_price(&self, _address: &str) -> PriceEstimate {
        self.calls.fetch_add(1, Ordering::Relaxed);
        PriceEstimate {
            price: dec!(1360000000),
            source_label: "fixed".to_string(),
        }
    }
}

pub(super) type TestService = DeskService<FixedPrices, PatternSummarizer>;

pub(super) fn build_service() -> (tempfile::TempDir, Arc<FixedPrices>, TestService) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(AdminStore::new(dir.path()));
    let prices = Arc::new(FixedPrices::default());
    let service = DeskService::new(store, prices.clone(), Arc::new(PatternSummarizer));
    (dir, prices, service)
}

pub(super) fn refinance_input() -> QuoteInput {
    QuoteInput {
        property_value: Some(dec!(1360000000)),
        address: None,
        existing_loan_balance: dec!(877000000),
        loan_structure: LoanStructure::Refinance,
        region_key: "과밀억제권역".to_string(),
        trust_or_mci_exempt: true,
        credit_score: 850,
        senior_bond_ratio: None,
    }
}

pub(super) fn decimal_field(value: &Value, field: &str) -> Decimal {
    let raw = value
        .get(field)
        .unwrap_or_else(|| panic!("missing field {field}"));
    match raw {
        Value::String(text) => text.parse().expect("decimal string"),
        other => other.to_string().parse().expect("decimal number"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
