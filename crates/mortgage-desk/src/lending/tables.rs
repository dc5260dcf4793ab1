use super::domain::{
    DeductionRegion, Lender, LenderId, LenderValidationError, RegionValidationError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashSet;

/// Deduction applied when a region key has no entry in the table.
pub const DEFAULT_DEDUCTION: Decimal = dec!(25000000);

/// Ordered set of partner lenders. Iteration order is the table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LenderTable {
    lenders: Vec<Lender>,
}

impl LenderTable {
    /// Partner guideline table as of 2026-01-02.
    pub fn standard() -> Self {
        Self {
            lenders: standard_lenders(),
        }
    }

    pub fn new(lenders: Vec<Lender>) -> Result<Self, LenderValidationError> {
        if lenders.is_empty() {
            return Err(LenderValidationError::EmptyTable);
        }
        let mut seen = HashSet::new();
        for lender in &lenders {
            lender.validate()?;
            if !seen.insert(lender.id.clone()) {
                return Err(LenderValidationError::DuplicateId(lender.id.clone()));
            }
        }
        Ok(Self { lenders })
    }

    pub fn lenders(&self) -> &[Lender] {
        &self.lenders
    }
}

/// Region key to deduction amount, with a fallback for unmapped keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeductionTable {
    regions: Vec<DeductionRegion>,
    default_amount: Decimal,
}

impl DeductionTable {
    /// Small-tenant deposit amounts assumed for 2025.
    pub fn standard() -> Self {
        Self {
            regions: vec![
                region("서울", dec!(55000000)),
                region("과밀억제권역(경기/인천 등)", dec!(48000000)),
                region("광역시", dec!(28000000)),
                region("그외", dec!(25000000)),
            ],
            default_amount: DEFAULT_DEDUCTION,
        }
    }

    /// Keys are trimmed before the duplicate check, matching how `lookup` trims its input.
    pub fn new(regions: Vec<DeductionRegion>) -> Result<Self, RegionValidationError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(regions.len());
        for region in regions {
            let region_key = region.region_key.trim().to_string();
            if region_key.is_empty() {
                return Err(RegionValidationError::MissingKey);
            }
            if region.deduction_amount < Decimal::ZERO {
                return Err(RegionValidationError::NegativeDeduction {
                    region: region_key,
                    amount: region.deduction_amount,
                });
            }
            if !seen.insert(region_key.clone()) {
                return Err(RegionValidationError::DuplicateKey(region_key));
            }
            normalized.push(DeductionRegion {
                region_key,
                deduction_amount: region.deduction_amount,
            });
        }

        Ok(Self {
            regions: normalized,
            default_amount: DEFAULT_DEDUCTION,
        })
    }

    pub fn lookup(&self, region_key: &str) -> Decimal {
        let key = region_key.trim();
        self.regions
            .iter()
            .find(|entry| entry.region_key == key)
            .map(|entry| entry.deduction_amount)
            .unwrap_or(self.default_amount)
    }

    pub fn regions(&self) -> &[DeductionRegion] {
        &self.regions
    }
}

/// Immutable configuration snapshot consumed by the calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LendingConfig {
    pub lenders: LenderTable,
    pub deductions: DeductionTable,
}

impl LendingConfig {
    pub fn standard() -> Self {
        Self {
            lenders: LenderTable::standard(),
            deductions: DeductionTable::standard(),
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn region(key: &str, amount: Decimal) -> DeductionRegion {
    DeductionRegion {
        region_key: key.to_string(),
        deduction_amount: amount,
    }
}

fn lender(id: &str, name: &str, ltv_max: Decimal, rate_min: Decimal, rate_max: Decimal) -> Lender {
    Lender {
        id: LenderId(id.to_string()),
        display_name: name.to_string(),
        ltv_max,
        rate_min,
        rate_max,
    }
}

fn standard_lenders() -> Vec<Lender> {
    vec![
        lender("애큐온저축은행", "애큐온", dec!(0.85), dec!(5.8), dec!(6.9)),
        lender("키움예스저축은행", "키움Yes", dec!(0.85), dec!(6.5), dec!(7.8)),
        lender("OK저축은행", "OK저축", dec!(0.90), dec!(7.5), dec!(9.5)),
        lender("SBI저축은행", "SBI", dec!(0.80), dec!(5.9), dec!(7.2)),
        lender("애큐온캐피탈", "애큐온CAP", dec!(0.80), dec!(6.2), dec!(7.5)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_are_valid() {
        let config = LendingConfig::standard();
        assert_eq!(config.lenders.lenders().len(), 5);
        assert!(LenderTable::new(config.lenders.lenders().to_vec()).is_ok());
        assert_eq!(config.deductions.regions().len(), 4);
    }

    #[test]
    fn deduction_lookup_falls_back_for_unknown_region() {
        let table = DeductionTable::standard();
        assert_eq!(table.lookup("서울"), dec!(55000000));
        assert_eq!(table.lookup(" 광역시 "), dec!(28000000));
        assert_eq!(table.lookup("과밀억제권역"), DEFAULT_DEDUCTION);
    }

    #[test]
    fn lender_table_must_not_be_empty() {
        assert_eq!(
            LenderTable::new(Vec::new()),
            Err(LenderValidationError::EmptyTable)
        );
    }

    #[test]
    fn deduction_table_rejects_duplicate_and_blank_keys() {
        let err = DeductionTable::new(vec![
            region("서울", dec!(55000000)),
            region(" 서울 ", dec!(60000000)),
        ])
        .unwrap_err();
        assert_eq!(err, RegionValidationError::DuplicateKey("서울".to_string()));

        assert_eq!(
            DeductionTable::new(vec![region("  ", dec!(1))]).unwrap_err(),
            RegionValidationError::MissingKey
        );
        assert!(matches!(
            DeductionTable::new(vec![region("서울", dec!(-1))]),
            Err(RegionValidationError::NegativeDeduction { .. })
        ));

        let table = DeductionTable::new(vec![region(" 세종 ", dec!(34000000))])
            .expect("valid regions");
        assert_eq!(table.lookup("세종"), dec!(34000000));
    }

    #[test]
    fn lender_table_rejects_duplicate_ids() {
        let mut lenders = standard_lenders();
        lenders.push(lenders[0].clone());
        let err = LenderTable::new(lenders).unwrap_err();
        assert!(matches!(err, LenderValidationError::DuplicateId(_)));
    }
}
