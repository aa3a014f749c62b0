//! Pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::coupons::{Coupon, CouponKind};
use crate::money::{percent_of, round_cents};
use crate::shipping::ShippingMethod;

/// Pricing breakdown for a cart and shipping selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of `unit_price × quantity` over all lines.
    pub subtotal: Decimal,

    /// Coupon discount, between zero and the subtotal.
    pub discount: Decimal,

    /// Shipping fee for the chosen method.
    pub shipping: Decimal,

    /// `subtotal − discount + shipping`, floored at zero.
    pub total: Decimal,
}

/// Sums `unit_price × quantity` over `items`.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Returns the discount `coupon` grants at the given subtotal.
///
/// The minimum spend is re-checked here on every call, so an applied coupon
/// contributes nothing while the cart sits below it and comes back once the
/// cart grows again. The grant is rounded to cents, capped at the coupon's
/// `max_discount` when one is set, and never exceeds the subtotal.
#[must_use]
pub fn discount(subtotal: Decimal, coupon: Option<&Coupon>) -> Decimal {
    let Some(coupon) = coupon else {
        return Decimal::ZERO;
    };

    if subtotal < coupon.min_subtotal {
        return Decimal::ZERO;
    }

    let granted = match coupon.kind {
        CouponKind::Percentage => percent_of(coupon.value, subtotal),
        CouponKind::Fixed => round_cents(coupon.value),
    };

    let capped = coupon.max_discount.map_or(granted, |cap| granted.min(cap));

    capped.min(subtotal).max(Decimal::ZERO)
}

/// Returns the shipping fee for `method` at the given subtotal.
#[must_use]
pub fn shipping_cost(subtotal: Decimal, method: ShippingMethod) -> Decimal {
    method.cost(subtotal)
}

/// Prices `items` under `coupon` and `method` in one pass.
///
/// Every call recomputes from scratch; nothing is cached, so a quote can
/// never go stale against the cart it was taken from.
#[must_use]
pub fn quote(items: &[LineItem], coupon: Option<&Coupon>, method: ShippingMethod) -> Totals {
    let subtotal = self::subtotal(items);
    let discount = self::discount(subtotal, coupon);
    let shipping = method.cost(subtotal);
    let total = (subtotal - discount + shipping).max(Decimal::ZERO);

    Totals {
        subtotal,
        discount,
        shipping,
        total,
    }
}
