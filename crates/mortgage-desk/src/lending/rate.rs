use super::domain::Lender;
use rust_decimal::{Decimal, RoundingStrategy};

/// NICE score floor; anything lower is priced at the top of the band.
pub const MIN_CREDIT_SCORE: u16 = 600;
/// NICE score ceiling; anything higher is priced at the bottom of the band.
pub const MAX_CREDIT_SCORE: u16 = 1000;

pub fn clamp_credit_score(credit_score: u16) -> u16 {
    credit_score.clamp(MIN_CREDIT_SCORE, MAX_CREDIT_SCORE)
}

/// Interpolates linearly within the lender's rate band: a score of 1000 maps to
/// `rate_min`, 600 (or lower) maps to `rate_max`. Rounded to two decimal places.
pub fn estimate_rate(lender: &Lender, credit_score: u16) -> Decimal {
    let score = Decimal::from(clamp_credit_score(credit_score));
    let floor = Decimal::from(MIN_CREDIT_SCORE);
    let span = Decimal::from(MAX_CREDIT_SCORE - MIN_CREDIT_SCORE);

    let ratio = Decimal::ONE - (score - floor) / span;
    let estimated = lender.rate_min + (lender.rate_max - lender.rate_min) * ratio;

    estimated.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn acuon() -> Lender {
        Lender::new("애큐온저축은행", "애큐온", dec!(0.85), dec!(5.8), dec!(6.9))
            .expect("valid lender")
    }

    #[test]
    fn scores_at_or_below_floor_price_at_rate_max() {
        let lender = acuon();
        for score in [0, 350, 599, 600] {
            assert_eq!(estimate_rate(&lender, score), dec!(6.9), "score {score}");
        }
    }

    #[test]
    fn scores_at_or_above_ceiling_price_at_rate_min() {
        let lender = acuon();
        for score in [1000, 1001, u16::MAX] {
            assert_eq!(estimate_rate(&lender, score), dec!(5.8), "score {score}");
        }
    }

    #[test]
    fn interpolates_within_the_band() {
        // 5.8 + 1.1 * 0.375 = 6.2125
        assert_eq!(estimate_rate(&acuon(), 850), dec!(6.21));
        assert_eq!(estimate_rate(&acuon(), 800), dec!(6.35));
    }

    #[test]
    fn exact_midpoints_round_away_from_zero() {
        let kiwoom = Lender::new("키움예스저축은행", "키움Yes", dec!(0.85), dec!(6.5), dec!(7.8))
            .expect("valid lender");
        // 6.5 + 1.3 * 0.95 = 7.735
        assert_eq!(estimate_rate(&kiwoom, 620), dec!(7.74));
    }

    #[test]
    fn higher_scores_never_raise_the_rate() {
        let lender = acuon();
        let mut previous = estimate_rate(&lender, 550);
        for score in (560..=1050).step_by(10) {
            let current = estimate_rate(&lender, score);
            assert!(current <= previous, "rate rose at score {score}");
            previous = current;
        }
    }

    #[test]
    fn flat_band_always_returns_the_same_rate() {
        let lender = Lender::new("flat", "flat", dec!(0.7), dec!(6.5), dec!(6.5))
            .expect("valid lender");
        assert_eq!(estimate_rate(&lender, 600), dec!(6.5));
        assert_eq!(estimate_rate(&lender, 1000), dec!(6.5));
    }
}
