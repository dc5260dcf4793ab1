use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier for a partner lender (the institution's registered name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LenderId(pub String);

impl fmt::Display for LenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Partner lender guideline: LTV cap and the advertised rate band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub id: LenderId,
    pub display_name: String,
    pub ltv_max: Decimal,
    pub rate_min: Decimal,
    pub rate_max: Decimal,
}

impl Lender {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        ltv_max: Decimal,
        rate_min: Decimal,
        rate_max: Decimal,
    ) -> Result<Self, LenderValidationError> {
        let lender = Self {
            id: LenderId(id.into()),
            display_name: display_name.into(),
            ltv_max,
            rate_min,
            rate_max,
        };
        lender.validate()?;
        Ok(lender)
    }

    pub fn validate(&self) -> Result<(), LenderValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(LenderValidationError::MissingId);
        }
        if self.ltv_max <= Decimal::ZERO || self.ltv_max > Decimal::ONE {
            return Err(LenderValidationError::LtvOutOfRange {
                lender: self.id.clone(),
                ltv_max: self.ltv_max,
            });
        }
        if self.rate_min < Decimal::ZERO || self.rate_min > self.rate_max {
            return Err(LenderValidationError::InvertedRateBand {
                lender: self.id.clone(),
                rate_min: self.rate_min,
                rate_max: self.rate_max,
            });
        }
        Ok(())
    }

    pub fn rate_range(&self) -> RateRange {
        RateRange {
            min: self.rate_min,
            max: self.rate_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LenderValidationError {
    #[error("lender id must not be empty")]
    MissingId,
    #[error("lender {lender}: ltv_max {ltv_max} must be within (0, 1]")]
    LtvOutOfRange { lender: LenderId, ltv_max: Decimal },
    #[error("lender {lender}: rate band {rate_min}~{rate_max} is inverted or negative")]
    InvertedRateBand {
        lender: LenderId,
        rate_min: Decimal,
        rate_max: Decimal,
    },
    #[error("lender {0} appears more than once")]
    DuplicateId(LenderId),
    #[error("the lender table must contain at least one lender")]
    EmptyTable,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionValidationError {
    #[error("region key must not be empty")]
    MissingKey,
    #[error("region '{region}' has a negative deduction ({amount})")]
    NegativeDeduction { region: String, amount: Decimal },
    #[error("region '{0}' appears more than once")]
    DuplicateKey(String),
}

/// Region category and its small-tenant deposit deduction (방공제).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRegion {
    pub region_key: String,
    pub deduction_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStructure {
    /// 대환: the new loan pays off the existing balance.
    Refinance,
    /// 후순위: the new loan sits behind the existing senior lien.
    Subordinate,
}

impl LoanStructure {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Refinance => "대환",
            Self::Subordinate => "후순위(추가대출)",
        }
    }
}

impl FromStr for LoanStructure {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "refinance" | "대환" => Ok(Self::Refinance),
            "subordinate" | "후순위" | "후순위(추가대출)" => Ok(Self::Subordinate),
            _ => Err(format!(
                "unknown loan structure '{trimmed}' (expected refinance/대환 or subordinate/후순위)"
            )),
        }
    }
}

/// Inputs for a single capacity calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub property_value: Decimal,
    pub existing_loan_balance: Decimal,
    pub loan_structure: LoanStructure,
    pub region_key: String,
    #[serde(default)]
    pub trust_or_mci_exempt: bool,
    pub credit_score: u16,
    #[serde(default = "default_senior_bond_ratio")]
    pub senior_bond_ratio: Decimal,
}

/// Registered maximum on an existing senior lien is customarily 120% of principal.
pub fn default_senior_bond_ratio() -> Decimal {
    Decimal::new(12, 1)
}

/// Largest won amount a request may carry (1,000조).
pub const MAX_REQUEST_AMOUNT: Decimal = dec!(1000000000000000);
pub const MIN_SENIOR_BOND_RATIO: Decimal = dec!(1);
pub const MAX_SENIOR_BOND_RATIO: Decimal = dec!(3);

impl LoanRequest {
    /// Rejects amounts and ratios outside the range the calculator is defined for.
    pub fn validate(&self) -> Result<(), LoanRequestError> {
        for (field, value) in [
            ("property_value", self.property_value),
            ("existing_loan_balance", self.existing_loan_balance),
        ] {
            if value < Decimal::ZERO || value > MAX_REQUEST_AMOUNT {
                return Err(LoanRequestError::AmountOutOfRange { field, value });
            }
        }
        if self.senior_bond_ratio < MIN_SENIOR_BOND_RATIO
            || self.senior_bond_ratio > MAX_SENIOR_BOND_RATIO
        {
            return Err(LoanRequestError::SeniorBondRatioOutOfRange(
                self.senior_bond_ratio,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanRequestError {
    #[error("{field} must be between 0 and {max} won (got {value})", max = MAX_REQUEST_AMOUNT)]
    AmountOutOfRange { field: &'static str, value: Decimal },
    #[error(
        "senior_bond_ratio must be between {min} and {max} (got {0})",
        min = MIN_SENIOR_BOND_RATIO,
        max = MAX_SENIOR_BOND_RATIO
    )]
    SeniorBondRatioOutOfRange(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl fmt::Display for RateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}%", self.min.normalize(), self.max.normalize())
    }
}

/// Capacity estimate for one lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderOffer {
    pub lender_id: LenderId,
    pub display_name: String,
    pub ltv_applied: Decimal,
    pub estimated_rate: Decimal,
    pub deduction_applied: Decimal,
    pub total_limit: Decimal,
    pub net_new_cash: Decimal,
    pub rate_range: RateRange,
}
