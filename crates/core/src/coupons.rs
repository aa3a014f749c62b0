//! Coupons

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while redeeming a coupon code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The code does not exist in the coupon table.
    #[error("unknown coupon code `{0}`")]
    UnknownCode(String),

    /// The cart subtotal has not reached the coupon's minimum spend.
    #[error("coupon requires a minimum subtotal of {required}, cart is at {subtotal}")]
    BelowMinimum {
        /// Minimum spend the coupon demands.
        required: Decimal,

        /// Subtotal the cart stood at when redemption was attempted.
        subtotal: Decimal,
    },
}

/// How a coupon's `value` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` is a percentage of the subtotal, in points.
    Percentage,

    /// `value` is an amount taken straight off the subtotal.
    Fixed,
}

/// A redeemable discount code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Canonical upper-case code.
    pub code: String,

    /// How [`Coupon::value`] is applied.
    pub kind: CouponKind,

    /// Percentage points or a fixed amount, depending on [`Coupon::kind`].
    pub value: Decimal,

    /// Minimum subtotal before the coupon grants anything.
    pub min_subtotal: Decimal,

    /// Upper bound on the granted discount, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Decimal>,
}

static COUPON_TABLE: LazyLock<FxHashMap<&'static str, Coupon>> = LazyLock::new(|| {
    [
        ("WELCOME10", CouponKind::Percentage, 10, 0, Some(100)),
        ("FREE50", CouponKind::Fixed, 50, 100, Some(50)),
        ("SUMMER25", CouponKind::Percentage, 25, 50, None),
    ]
    .into_iter()
    .map(|(code, kind, value, min_subtotal, max_discount)| {
        let coupon = Coupon {
            code: code.to_owned(),
            kind,
            value: Decimal::from(value),
            min_subtotal: Decimal::from(min_subtotal),
            max_discount: max_discount.map(Decimal::from),
        };

        (code, coupon)
    })
    .collect()
});

/// Looks up a coupon by code, ignoring case and surrounding whitespace.
#[must_use]
pub fn lookup(code: &str) -> Option<Coupon> {
    COUPON_TABLE
        .get(code.trim().to_uppercase().as_str())
        .cloned()
}

/// Validates `code` against the coupon table and the current cart subtotal.
///
/// # Errors
///
/// * [`CouponError::UnknownCode`] if the code is not in the table.
/// * [`CouponError::BelowMinimum`] if the subtotal has not reached the
///   coupon's minimum spend.
pub fn redeem(code: &str, subtotal: Decimal) -> Result<Coupon, CouponError> {
    let Some(coupon) = lookup(code) else {
        return Err(CouponError::UnknownCode(code.trim().to_owned()));
    };

    if subtotal < coupon.min_subtotal {
        return Err(CouponError::BelowMinimum {
            required: coupon.min_subtotal,
            subtotal,
        });
    }

    Ok(coupon)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn lookup_normalises_the_code() {
        let coupon = lookup("  welcome10  ");

        assert!(
            matches!(coupon, Some(ref found) if found.code == "WELCOME10"),
            "expected a case-insensitive, trimmed match"
        );
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let result = redeem("BOGUS", Decimal::from(500));

        assert!(matches!(result, Err(CouponError::UnknownCode(code)) if code == "BOGUS"));
    }

    #[test]
    fn minimum_spend_is_enforced() -> TestResult {
        let result = redeem("FREE50", "80.00".parse()?);

        assert!(matches!(
            result,
            Err(CouponError::BelowMinimum { required, .. }) if required == Decimal::from(100)
        ));

        Ok(())
    }

    #[test]
    fn minimum_spend_is_inclusive() -> TestResult {
        let coupon = redeem("FREE50", "100.00".parse()?)?;

        assert_eq!(coupon.kind, CouponKind::Fixed);
        assert_eq!(coupon.value, Decimal::from(50));

        Ok(())
    }

    #[test]
    fn serialises_in_camel_case() -> TestResult {
        let coupon = redeem("SUMMER25", Decimal::from(60))?;
        let value = serde_json::to_value(&coupon)?;

        assert_eq!(
            value.get("kind").and_then(serde_json::Value::as_str),
            Some("percentage")
        );
        assert!(
            value.get("minSubtotal").is_some(),
            "expected camelCase field names"
        );
        assert!(
            value.get("maxDiscount").is_none(),
            "expected an absent cap to be omitted"
        );

        Ok(())
    }
}
