use super::domain::{Lender, LenderId, LenderOffer, LoanRequest, LoanStructure};
use super::rate::estimate_rate;
use super::tables::LendingConfig;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// Per-lender capacity calculator over an immutable configuration snapshot.
#[derive(Debug, Clone)]
pub struct LoanCapacityCalculator {
    config: Arc<LendingConfig>,
}

/// Lender whose computed new cash did not clear zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedLender {
    pub lender_id: LenderId,
    pub display_name: String,
    pub net_new_cash: Decimal,
}

/// Full result of a calculation, including the lenders that were filtered out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityAssessment {
    pub offers: Vec<LenderOffer>,
    pub excluded: Vec<ExcludedLender>,
}

impl LoanCapacityCalculator {
    pub fn new(config: Arc<LendingConfig>) -> Self {
        Self { config }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(LendingConfig::standard()))
    }

    /// Ranked offers with positive new cash. An empty vector means no lender qualifies.
    pub fn calculate(&self, request: &LoanRequest) -> Vec<LenderOffer> {
        self.assess(request).offers
    }

    pub fn assess(&self, request: &LoanRequest) -> CapacityAssessment {
        let deduction = self.deduction_for(request);
        let mut offers = Vec::new();
        let mut excluded = Vec::new();

        for lender in self.config.lenders.lenders() {
            let offer = offer_for(lender, request, deduction);
            if offer.net_new_cash > Decimal::ZERO {
                offers.push(offer);
            } else {
                excluded.push(ExcludedLender {
                    lender_id: offer.lender_id,
                    display_name: offer.display_name,
                    net_new_cash: offer.net_new_cash,
                });
            }
        }

        rank_offers(&mut offers);
        CapacityAssessment { offers, excluded }
    }

    pub fn deduction_for(&self, request: &LoanRequest) -> Decimal {
        if request.trust_or_mci_exempt {
            Decimal::ZERO
        } else {
            self.config.deductions.lookup(&request.region_key)
        }
    }
}

fn offer_for(lender: &Lender, request: &LoanRequest, deduction: Decimal) -> LenderOffer {
    let ltv_limit = request.property_value * lender.ltv_max;
    let max_limit = ltv_limit - deduction;

    let (total_limit, net_new_cash) = match request.loan_structure {
        LoanStructure::Refinance => (max_limit, max_limit - request.existing_loan_balance),
        LoanStructure::Subordinate => {
            let senior_bond_amount = request.existing_loan_balance * request.senior_bond_ratio;
            let available = max_limit - senior_bond_amount;
            (available, available)
        }
    };

    LenderOffer {
        lender_id: lender.id.clone(),
        display_name: lender.display_name.clone(),
        ltv_applied: lender.ltv_max,
        estimated_rate: estimate_rate(lender, request.credit_score),
        deduction_applied: deduction,
        total_limit,
        net_new_cash,
        rate_range: lender.rate_range(),
    }
}

/// Most new cash first, then cheapest rate. Stable, so full ties keep table order.
pub(crate) fn rank_offers(offers: &mut [LenderOffer]) {
    offers.sort_by(|a, b| match b.net_new_cash.cmp(&a.net_new_cash) {
        Ordering::Equal => a.estimated_rate.cmp(&b.estimated_rate),
        other => other,
    });
}
