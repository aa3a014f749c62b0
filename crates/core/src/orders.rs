//! Orders

use std::fmt;

use jiff::Timestamp;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::LineItem;
use crate::catalog::ProductId;
use crate::checkout::{Address, CheckoutForm, Contact, PaymentMethod};
use crate::pricing::Totals;
use crate::shipping::ShippingMethod;

/// Unique identifier of a placed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generates a fresh, time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-facing order number, `TILL-` followed by five digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Draws a fresh order number from `rng`.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let suffix = rng.gen_range(0..100_000u32);

        Self(format!("TILL-{suffix:05}"))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfilment state of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, not yet picked.
    #[default]
    Pending,

    /// Being picked and packed.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Arrived at the customer.
    Delivered,

    /// Cancelled before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Returns the lowercase name used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment.
    #[default]
    Pending,

    /// Payment received.
    Paid,

    /// Payment returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Returns the lowercase name used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order, frozen at checkout time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product the line refers to.
    pub id: ProductId,

    /// Product name at checkout time.
    pub name: String,

    /// Price per unit at checkout time.
    #[serde(rename = "price")]
    pub unit_price: Decimal,

    /// Units bought.
    pub quantity: u32,

    /// `unit_price × quantity` for this line.
    pub total: Decimal,
}

/// Who placed the order and where it goes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Contact details.
    pub contact: Contact,

    /// Shipping address.
    pub shipping: Address,

    /// Billing address when it differs from the shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,
}

/// An immutable record of a completed checkout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order id.
    pub id: OrderId,

    /// Human-facing order number.
    pub number: OrderNumber,

    /// Moment the order was placed.
    pub created_at: Timestamp,

    /// Deep copy of the cart lines at checkout time.
    pub items: Vec<OrderLine>,

    /// Pricing breakdown evaluated at checkout time.
    pub totals: Totals,

    /// Customer and addresses.
    pub customer: Customer,

    /// Chosen shipping method.
    pub shipping_method: ShippingMethod,

    /// Chosen payment method.
    pub payment: PaymentMethod,

    /// Free-text delivery notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Whether the customer opted into the newsletter.
    pub newsletter_opt_in: bool,

    /// Fulfilment state.
    pub status: OrderStatus,

    /// Payment state.
    pub payment_status: PaymentStatus,
}

impl Order {
    /// Freezes the given cart lines, totals and form into an order.
    ///
    /// The lines are copied, so later cart mutations cannot reach into the
    /// archived order.
    #[must_use]
    pub fn snapshot(
        items: &[LineItem],
        totals: Totals,
        form: &CheckoutForm,
        number: OrderNumber,
        created_at: Timestamp,
    ) -> Self {
        let items = items
            .iter()
            .map(|item| OrderLine {
                id: item.id,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                total: item.line_total(),
            })
            .collect();

        let billing = if form.billing_same_as_shipping {
            None
        } else {
            form.billing.clone()
        };

        Self {
            id: OrderId::generate(),
            number,
            created_at,
            items,
            totals,
            customer: Customer {
                contact: form.contact.clone(),
                shipping: form.shipping.clone(),
                billing,
            },
            shipping_method: form.shipping_method,
            payment: form.payment,
            notes: form.notes.clone(),
            newsletter_opt_in: form.newsletter_opt_in,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use testresult::TestResult;

    use crate::pricing;

    use super::*;

    fn line(id: u32, price: &str, quantity: u32) -> TestResult<LineItem> {
        Ok(LineItem {
            id: ProductId(id),
            name: format!("Product {id}"),
            unit_price: price.parse()?,
            quantity,
            stock: None,
            image: String::new(),
            sku: None,
        })
    }

    #[test]
    fn order_numbers_carry_the_prefix_and_five_digits() {
        let mut rng = StepRng::new(7, 11);
        let number = OrderNumber::generate(&mut rng);
        let suffix = number.as_str().strip_prefix("TILL-");

        assert!(
            suffix.is_some_and(|digits| {
                digits.chars().count() == 5 && digits.chars().all(|c| c.is_ascii_digit())
            }),
            "expected TILL- followed by exactly five digits, got {number}"
        );
    }

    #[test]
    fn order_ids_are_unique() {
        assert_ne!(OrderId::generate(), OrderId::generate());
    }

    #[test]
    fn snapshot_freezes_lines_with_their_totals() -> TestResult {
        let items = vec![line(1, "67.99", 2)?, line(2, "49.99", 1)?];
        let totals = pricing::quote(&items, None, ShippingMethod::Standard);
        let form = CheckoutForm::default();

        let order = Order::snapshot(
            &items,
            totals,
            &form,
            OrderNumber("TILL-00042".to_owned()),
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(order.items.len(), 2);
        assert_eq!(
            order.items.first().map(|item| item.total),
            Some("135.98".parse()?)
        );
        assert_eq!(order.totals.subtotal, "185.97".parse()?);
        assert_eq!(order.status, OrderStatus::Pending);

        Ok(())
    }

    #[test]
    fn snapshot_drops_the_billing_address_when_mirrored() {
        let form = CheckoutForm {
            billing: Some(Address {
                city: "Utrecht".to_owned(),
                ..Address::default()
            }),
            ..CheckoutForm::default()
        };

        let order = Order::snapshot(
            &[],
            pricing::quote(&[], None, ShippingMethod::Pickup),
            &form,
            OrderNumber("TILL-00001".to_owned()),
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(order.customer.billing, None, "mirrored billing must not be stored");
    }

    #[test]
    fn orders_serialise_in_camel_case() -> TestResult {
        let order = Order::snapshot(
            &[],
            pricing::quote(&[], None, ShippingMethod::Pickup),
            &CheckoutForm::default(),
            OrderNumber("TILL-00001".to_owned()),
            Timestamp::UNIX_EPOCH,
        );

        let value = serde_json::to_value(&order)?;

        assert!(value.get("createdAt").is_some());
        assert!(value.get("paymentStatus").is_some());
        assert!(value.get("newsletterOptIn").is_some());

        Ok(())
    }
}
