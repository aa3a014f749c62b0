//! Shipping

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subtotal at or above which standard shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat fee for standard shipping below the free-shipping threshold.
pub const STANDARD_FEE: Decimal = Decimal::from_parts(499, 0, 0, false, 2);

/// Flat fee for express shipping.
pub const EXPRESS_FEE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// How an order leaves the warehouse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingMethod {
    /// Standard delivery, free at or above [`FREE_SHIPPING_THRESHOLD`].
    #[default]
    Standard,

    /// Express delivery at a flat fee regardless of order size.
    Express,

    /// Collection in store, always free.
    Pickup,
}

impl ShippingMethod {
    /// Returns the shipping fee for this method at the given cart subtotal.
    #[must_use]
    pub fn cost(self, subtotal: Decimal) -> Decimal {
        match self {
            Self::Standard => {
                if subtotal >= FREE_SHIPPING_THRESHOLD {
                    Decimal::ZERO
                } else {
                    STANDARD_FEE
                }
            }
            Self::Express => EXPRESS_FEE,
            Self::Pickup => Decimal::ZERO,
        }
    }

    /// Returns the kebab-case name used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Pickup => "pickup",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a shipping method name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shipping method `{0}`")]
pub struct ParseShippingMethodError(String);

impl FromStr for ShippingMethod {
    type Err = ParseShippingMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "pickup" => Ok(Self::Pickup),
            _ => Err(ParseShippingMethodError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn standard_is_free_at_the_threshold() -> TestResult {
        assert_eq!(
            ShippingMethod::Standard.cost("50.00".parse()?),
            Decimal::ZERO
        );
        assert_eq!(
            ShippingMethod::Standard.cost("120.50".parse()?),
            Decimal::ZERO
        );

        Ok(())
    }

    #[test]
    fn standard_charges_below_the_threshold() -> TestResult {
        assert_eq!(ShippingMethod::Standard.cost("49.99".parse()?), STANDARD_FEE);
        assert_eq!(ShippingMethod::Standard.cost(Decimal::ZERO), STANDARD_FEE);

        Ok(())
    }

    #[test]
    fn express_always_charges() -> TestResult {
        assert_eq!(ShippingMethod::Express.cost("500.00".parse()?), EXPRESS_FEE);

        Ok(())
    }

    #[test]
    fn pickup_is_always_free() -> TestResult {
        assert_eq!(ShippingMethod::Pickup.cost("3.50".parse()?), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn parses_names_case_insensitively() -> TestResult {
        assert_eq!("standard".parse::<ShippingMethod>()?, ShippingMethod::Standard);
        assert_eq!("Express".parse::<ShippingMethod>()?, ShippingMethod::Express);
        assert_eq!("PICKUP".parse::<ShippingMethod>()?, ShippingMethod::Pickup);

        Ok(())
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(
            "overnight".parse::<ShippingMethod>().is_err(),
            "expected an unknown method to fail parsing"
        );
    }
}
