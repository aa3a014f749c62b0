//! Checkout

use std::fmt;
use std::str::FromStr;

use jiff::civil;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shipping::ShippingMethod;
use crate::storage::StorageError;

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart holds no lines to build an order from.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// One or more form fields failed validation.
    #[error(transparent)]
    Invalid(#[from] FieldErrors),

    /// Persisting the order or clearing the cart failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// How the customer wants to pay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Credit or debit card; requires [`CardDetails`] at checkout.
    #[default]
    Card,

    /// PayPal redirect, no details collected here.
    Paypal,

    /// Manual bank transfer after ordering.
    BankTransfer,
}

impl PaymentMethod {
    /// Returns the kebab-case name used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::BankTransfer => "bank-transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a payment method name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method `{0}`")]
pub struct ParsePaymentMethodError(String);

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "bank-transfer" => Ok(Self::BankTransfer),
            _ => Err(ParsePaymentMethodError(s.to_owned())),
        }
    }
}

/// How to reach the customer about the order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    /// Email address for the confirmation.
    pub email: String,

    /// Phone number for delivery updates.
    pub phone: String,
}

/// A postal address for shipping or billing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    /// Recipient first name.
    pub first_name: String,

    /// Recipient last name.
    pub last_name: String,

    /// Street and house number.
    pub address: String,

    /// Apartment, suite or floor, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,

    /// City or town.
    pub city: String,

    /// Postal code.
    pub zip: String,

    /// Country name or code.
    pub country: String,
}

/// Card fields collected at checkout.
///
/// Never serialised; the checkout form strips these before persisting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardDetails {
    /// Card number, spaces allowed.
    pub number: String,

    /// Name printed on the card.
    pub holder: String,

    /// Expiry in `MM/YY` form.
    pub expiry: String,

    /// Security code, three or four digits.
    pub cvc: String,
}

/// Everything the customer fills in before placing an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Contact details.
    pub contact: Contact,

    /// Shipping address.
    pub shipping: Address,

    /// Whether the billing address mirrors the shipping address.
    pub billing_same_as_shipping: bool,

    /// Separate billing address, when not mirroring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,

    /// Chosen shipping method.
    pub shipping_method: ShippingMethod,

    /// Chosen payment method.
    pub payment: PaymentMethod,

    /// Card details when paying by card; never persisted.
    #[serde(skip)]
    pub card: Option<CardDetails>,

    /// Free-text delivery notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Whether the customer opted into the newsletter.
    pub newsletter_opt_in: bool,

    /// Whether the terms checkbox was ticked; never persisted.
    #[serde(skip)]
    pub accept_terms: bool,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            contact: Contact::default(),
            shipping: Address::default(),
            billing_same_as_shipping: true,
            billing: None,
            shipping_method: ShippingMethod::default(),
            payment: PaymentMethod::default(),
            card: None,
            notes: None,
            newsletter_opt_in: false,
            accept_terms: false,
        }
    }
}

/// A single violated form field with a human-readable reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the violated field, e.g. `firstName`.
    pub field: &'static str,

    /// What the field must satisfy, phrased to follow the field name.
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Every field violation found by one validation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Returns the number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field was violated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the violations in validation order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns `true` if `field` is among the violated fields.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, error) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct AddressFields {
    first_name: &'static str,
    last_name: &'static str,
    address: &'static str,
    city: &'static str,
    zip: &'static str,
    country: &'static str,
}

const SHIPPING_FIELDS: AddressFields = AddressFields {
    first_name: "firstName",
    last_name: "lastName",
    address: "address",
    city: "city",
    zip: "zip",
    country: "country",
};

const BILLING_FIELDS: AddressFields = AddressFields {
    first_name: "billingFirstName",
    last_name: "billingLastName",
    address: "billingAddress",
    city: "billingCity",
    zip: "billingZip",
    country: "billingCountry",
};

/// Checks every form field and reports all violations at once.
///
/// `today` anchors the card expiry check so callers control the clock.
///
/// # Errors
///
/// * [`FieldErrors`] listing every violated field, never just the first.
pub fn validate(form: &CheckoutForm, today: civil::Date) -> Result<(), FieldErrors> {
    let mut errors = Vec::new();

    validate_contact(&form.contact, &mut errors);
    validate_address(&form.shipping, &SHIPPING_FIELDS, &mut errors);

    if !form.billing_same_as_shipping {
        match form.billing.as_ref() {
            Some(billing) => validate_address(billing, &BILLING_FIELDS, &mut errors),
            None => validate_address(&Address::default(), &BILLING_FIELDS, &mut errors),
        }
    }

    if form.payment == PaymentMethod::Card {
        validate_card(form.card.as_ref(), today, &mut errors);
    }

    if !form.accept_terms {
        errors.push(FieldError {
            field: "terms",
            message: "must be accepted before placing the order",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FieldErrors(errors))
    }
}

fn validate_contact(contact: &Contact, errors: &mut Vec<FieldError>) {
    if contact.email.trim().is_empty() {
        errors.push(FieldError {
            field: "email",
            message: "is required",
        });
    } else if !is_valid_email(&contact.email) {
        errors.push(FieldError {
            field: "email",
            message: "must be a valid email address",
        });
    }

    if contact.phone.trim().is_empty() {
        errors.push(FieldError {
            field: "phone",
            message: "is required",
        });
    } else if !is_valid_phone(&contact.phone) {
        errors.push(FieldError {
            field: "phone",
            message: "must be a valid phone number",
        });
    }
}

fn validate_address(address: &Address, fields: &AddressFields, errors: &mut Vec<FieldError>) {
    require(&address.first_name, fields.first_name, errors);
    require(&address.last_name, fields.last_name, errors);
    require(&address.address, fields.address, errors);
    require(&address.city, fields.city, errors);
    require(&address.zip, fields.zip, errors);
    require(&address.country, fields.country, errors);
}

fn validate_card(card: Option<&CardDetails>, today: civil::Date, errors: &mut Vec<FieldError>) {
    let Some(card) = card else {
        for field in ["cardNumber", "cardName", "cardExpiry", "cardCvc"] {
            errors.push(FieldError {
                field,
                message: "is required",
            });
        }

        return;
    };

    if card.number.trim().is_empty() {
        errors.push(FieldError {
            field: "cardNumber",
            message: "is required",
        });
    } else if !is_valid_card_number(&card.number) {
        errors.push(FieldError {
            field: "cardNumber",
            message: "must have at least 13 digits",
        });
    }

    require(&card.holder, "cardName", errors);

    if card.expiry.trim().is_empty() {
        errors.push(FieldError {
            field: "cardExpiry",
            message: "is required",
        });
    } else {
        match parse_expiry(&card.expiry) {
            Some((month, year)) if expiry_in_future(month, year, today) => {}
            Some(_) => errors.push(FieldError {
                field: "cardExpiry",
                message: "is in the past",
            }),
            None => errors.push(FieldError {
                field: "cardExpiry",
                message: "must be in MM/YY format",
            }),
        }
    }

    if card.cvc.trim().is_empty() {
        errors.push(FieldError {
            field: "cardCvc",
            message: "is required",
        });
    } else if !is_valid_cvc(&card.cvc) {
        errors.push(FieldError {
            field: "cardCvc",
            message: "must be 3 or 4 digits",
        });
    }
}

fn require(value: &str, field: &'static str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError {
            field,
            message: "is required",
        });
    }
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !name.is_empty() && !tld.is_empty()
}

fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0usize;

    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits += 1;
        } else if !matches!(c, ' ' | '-' | '.' | '(' | ')') {
            return false;
        }
    }

    digits >= 10
}

fn is_valid_card_number(number: &str) -> bool {
    let mut digits = 0usize;

    for c in number.chars() {
        if c == ' ' {
            continue;
        }

        if !c.is_ascii_digit() {
            return false;
        }

        digits += 1;
    }

    digits >= 13
}

fn parse_expiry(expiry: &str) -> Option<(i8, i16)> {
    let (month, year) = expiry.trim().split_once('/')?;

    if month.len() != 2 || year.len() != 2 {
        return None;
    }

    if !month.chars().all(|c| c.is_ascii_digit()) || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let month: i8 = month.parse().ok()?;
    let year: i16 = year.parse().ok()?;

    (1..=12).contains(&month).then_some((month, year))
}

fn expiry_in_future(month: i8, year: i16, today: civil::Date) -> bool {
    let current_year = today.year().rem_euclid(100);
    let current_month = i16::from(today.month());
    let month = i16::from(month);

    year > current_year || (year == current_year && month >= current_month)
}

fn is_valid_cvc(cvc: &str) -> bool {
    let cvc = cvc.trim();
    let length = cvc.chars().count();

    (3..=4).contains(&length) && cvc.chars().all(|c| c.is_ascii_digit())
}
