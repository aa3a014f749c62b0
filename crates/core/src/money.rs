//! Money

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to whole cents, away from zero on midpoints.
///
/// All monetary values exposed by this crate pass through here before they
/// are stored or summed, so `0.125` becomes `0.13` rather than `0.12`.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `points` percent of `amount`, rounded to whole cents.
///
/// `points` is expressed in percentage points (`25` means 25%), matching how
/// catalog discounts and coupon values are declared.
#[must_use]
pub fn percent_of(points: Decimal, amount: Decimal) -> Decimal {
    let rate = Percentage::from(points / Decimal::ONE_HUNDRED);

    round_cents(rate * amount)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rounds_midpoints_away_from_zero() -> TestResult {
        assert_eq!(round_cents("0.125".parse()?), "0.13".parse::<Decimal>()?);
        assert_eq!(round_cents("2.675".parse()?), "2.68".parse::<Decimal>()?);
        assert_eq!(round_cents("-0.125".parse()?), "-0.13".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn whole_cents_are_untouched() -> TestResult {
        assert_eq!(round_cents("19.99".parse()?), "19.99".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn percent_of_rounds_to_cents() -> TestResult {
        // 25% of 185.97 is 46.4925, which rounds to 46.49.
        assert_eq!(
            percent_of(Decimal::from(25), "185.97".parse()?),
            "46.49".parse::<Decimal>()?
        );
        // 10% of 0.05 is 0.005, which rounds away from zero.
        assert_eq!(
            percent_of(Decimal::from(10), "0.05".parse()?),
            "0.01".parse::<Decimal>()?
        );

        Ok(())
    }

    #[test]
    fn percent_of_zero_is_zero() -> TestResult {
        assert_eq!(percent_of(Decimal::from(15), Decimal::ZERO), Decimal::ZERO);

        Ok(())
    }
}
