use super::capacity::CapacityAssessment;
use super::domain::{LenderOffer, LoanRequest};
use super::rate::clamp_credit_score;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

const MANWON: Decimal = dec!(10000);
const EOK: Decimal = dec!(100000000);

/// Table row in the shape loan officers read: amounts in 만원, LTV as a percent.
#[derive(Debug, Clone, Serialize)]
pub struct OfferRow {
    pub lender: String,
    pub display_name: String,
    pub ltv_label: String,
    pub estimated_rate: Decimal,
    pub total_limit_manwon: i64,
    pub net_new_cash_manwon: i64,
    pub rate_range: String,
}

impl From<&LenderOffer> for OfferRow {
    fn from(offer: &LenderOffer) -> Self {
        Self {
            lender: offer.lender_id.0.clone(),
            display_name: offer.display_name.clone(),
            ltv_label: percent_label(offer.ltv_applied),
            estimated_rate: offer.estimated_rate,
            total_limit_manwon: to_manwon(offer.total_limit),
            net_new_cash_manwon: to_manwon(offer.net_new_cash),
            rate_range: offer.rate_range.to_string(),
        }
    }
}

/// Header metrics shown above the offer table.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    pub property_value_label: String,
    pub existing_loan_label: String,
    pub credit_score_label: String,
    pub structure_label: &'static str,
}

impl From<&LoanRequest> for RequestSummary {
    fn from(request: &LoanRequest) -> Self {
        Self {
            property_value_label: eok_label(request.property_value, 1),
            existing_loan_label: eok_label(request.existing_loan_balance, 2),
            credit_score_label: format!("{}점", clamp_credit_score(request.credit_score)),
            structure_label: request.loan_structure.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteSheet {
    pub summary: RequestSummary,
    pub rows: Vec<OfferRow>,
    pub best: Option<OfferRow>,
}

impl QuoteSheet {
    pub fn new(request: &LoanRequest, assessment: &CapacityAssessment) -> Self {
        let rows: Vec<OfferRow> = assessment.offers.iter().map(OfferRow::from).collect();
        Self {
            summary: RequestSummary::from(request),
            best: rows.first().cloned(),
            rows,
        }
    }
}

/// Truncates toward zero, matching how the desk quotes 만원 figures.
pub fn to_manwon(amount: Decimal) -> i64 {
    (amount / MANWON).trunc().to_i64().unwrap_or_default()
}

/// e.g. 34700 renders as "34,700만원".
pub fn manwon_label(manwon: i64) -> String {
    format!("{}만원", group_thousands(&manwon.to_string()))
}

pub fn percent_label(ratio: Decimal) -> String {
    let percent = (ratio * dec!(100)).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    format!("{}%", percent.normalize())
}

/// e.g. 1,360,000,000 with one decimal place renders as "13.6억".
pub fn eok_label(amount: Decimal, decimals: u32) -> String {
    let eok = (amount / EOK).round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{}억", group_thousands(&format!("{eok:.prec$}", prec = decimals as usize)))
}

fn group_thousands(value: &str) -> String {
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manwon_truncates() {
        assert_eq!(to_manwon(dec!(279000000)), 27900);
        assert_eq!(to_manwon(dec!(103609999)), 10360);
        assert_eq!(to_manwon(dec!(-15000)), -1);
    }

    #[test]
    fn labels_match_desk_formatting() {
        assert_eq!(percent_label(dec!(0.85)), "85%");
        assert_eq!(percent_label(dec!(0.90)), "90%");
        assert_eq!(eok_label(dec!(1360000000), 1), "13.6억");
        assert_eq!(eok_label(dec!(877000000), 2), "8.77억");
        assert_eq!(eok_label(dec!(123456000000), 1), "1,234.6억");
        assert_eq!(manwon_label(34700), "34,700만원");
        assert_eq!(manwon_label(-1), "-1만원");
    }
}
