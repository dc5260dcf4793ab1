use crate::lending::LoanStructure;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Borrower registered through the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: u32,
    pub name: String,
    pub property_address: String,
    pub kb_price: Decimal,
    pub existing_loan: Decimal,
    pub credit_score: u16,
    pub loan_structure: LoanStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub registered_on: NaiveDate,
}

/// Client details before an id and registration date are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub property_address: String,
    pub kb_price: Decimal,
    pub existing_loan: Decimal,
    pub credit_score: u16,
    pub loan_structure: LoanStructure,
    #[serde(default)]
    pub memo: Option<String>,
}

impl NewClient {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("client name must not be empty".to_string());
        }
        if self.kb_price <= Decimal::ZERO {
            return Err(format!("kb_price must be positive (got {})", self.kb_price));
        }
        if self.existing_loan < Decimal::ZERO {
            return Err(format!(
                "existing_loan must not be negative (got {})",
                self.existing_loan
            ));
        }
        Ok(())
    }

    pub(crate) fn into_record(self, id: u32, registered_on: NaiveDate) -> ClientRecord {
        ClientRecord {
            id,
            name: self.name.trim().to_string(),
            property_address: self.property_address.trim().to_string(),
            kb_price: self.kb_price,
            existing_loan: self.existing_loan,
            credit_score: self.credit_score,
            loan_structure: self.loan_structure,
            memo: self.memo.filter(|memo| !memo.trim().is_empty()),
            registered_on,
        }
    }
}
