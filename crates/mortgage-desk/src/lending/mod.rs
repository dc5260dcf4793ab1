//! Loan capacity estimation across the partner lender table.

pub mod capacity;
pub mod domain;
pub mod rate;
pub mod tables;
pub mod views;

pub use capacity::{CapacityAssessment, ExcludedLender, LoanCapacityCalculator};
pub use domain::{
    DeductionRegion, Lender, LenderId, LenderOffer, LenderValidationError, LoanRequest,
    LoanRequestError, LoanStructure, RateRange, RegionValidationError,
};
pub use rate::estimate_rate;
pub use tables::{DeductionTable, LenderTable, LendingConfig, DEFAULT_DEDUCTION};
pub use views::{OfferRow, QuoteSheet, RequestSummary};
