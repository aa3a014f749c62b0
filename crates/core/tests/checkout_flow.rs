//! Integration tests walking a cart through checkout into the order archive.
//!
//! Built on the demo catalog: the headphones list at 79.99 with 15% off
//! (11.9985 rounds to 12.00, so 67.99 each) and the speaker at 49.99.
//! Two headphones plus the speaker come to 185.97, SUMMER25 takes 25% off
//! (46.4925 rounds to 46.49) and the subtotal clears free shipping, so
//! the order total lands at 139.48.

use anyhow::bail;
use jiff::{Timestamp, civil, tz::TimeZone};
use rust_decimal::Decimal;
use testresult::TestResult;

use till::{
    catalog::ProductId,
    checkout::{Address, CardDetails, CheckoutError, CheckoutForm, Contact, PaymentMethod},
    fixtures,
    orders::{OrderStatus, PaymentStatus},
    storage::MemoryBackend,
    store::Store,
};

/// A checkout form that passes every validation rule.
fn valid_form() -> CheckoutForm {
    CheckoutForm {
        contact: Contact {
            email: "iris.vos@example.com".to_owned(),
            phone: "+31 6 1234 5678".to_owned(),
        },
        shipping: Address {
            first_name: "Iris".to_owned(),
            last_name: "Vos".to_owned(),
            address: "Keizersgracht 12".to_owned(),
            address2: None,
            city: "Amsterdam".to_owned(),
            zip: "1015 CS".to_owned(),
            country: "Netherlands".to_owned(),
        },
        card: Some(CardDetails {
            number: "4111 1111 1111 1111".to_owned(),
            holder: "Iris Vos".to_owned(),
            expiry: "12/30".to_owned(),
            cvc: "123".to_owned(),
        }),
        accept_terms: true,
        ..CheckoutForm::default()
    }
}

/// A clock pinned to a date where `12/30` cards are still valid.
fn fixed_now() -> TestResult<Timestamp> {
    Ok(civil::date(2026, 8, 23)
        .at(12, 0, 0, 0)
        .to_zoned(TimeZone::UTC)?
        .timestamp())
}

/// Two headphones and one speaker, subtotal 185.97.
fn loaded_store() -> anyhow::Result<Store<MemoryBackend>> {
    let catalog = fixtures::demo_catalog()?;
    let mut store = Store::open(MemoryBackend::new())?;
    store.add_product(catalog.require(ProductId(1))?, 2)?;
    store.add_product(catalog.require(ProductId(2))?, 1)?;
    Ok(store)
}

#[test]
fn placing_an_order_archives_a_snapshot_and_clears_the_cart() -> TestResult {
    let mut store = loaded_store()?;
    store.apply_coupon("SUMMER25")?;

    let order = store.place_order(&valid_form(), fixed_now()?)?;

    assert_eq!(order.totals.subtotal, "185.97".parse::<Decimal>()?);
    assert_eq!(order.totals.discount, "46.49".parse::<Decimal>()?);
    assert_eq!(order.totals.shipping, Decimal::ZERO);
    assert_eq!(order.totals.total, "139.48".parse::<Decimal>()?);

    assert_eq!(order.items.len(), 2);
    let headphones_total = "135.98".parse::<Decimal>()?;
    let headphones = order.items.iter().find(|line| line.id == ProductId(1));
    assert!(headphones.is_some_and(|line| line.quantity == 2 && line.total == headphones_total));

    assert!(order.number.as_str().starts_with("TILL-"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    assert!(store.items().is_empty());
    assert!(store.coupon().is_none());

    let archive = store.orders()?;
    assert_eq!(archive.len(), 1);
    assert!(archive.first().is_some_and(|kept| kept.id == order.id));
    assert!(store.last_order()?.is_some_and(|last| last.id == order.id));
    assert!(store.find_order(order.number.as_str())?.is_some());

    Ok(())
}

#[test]
fn archived_totals_survive_later_cart_changes() -> TestResult {
    let mut store = loaded_store()?;
    let order = store.place_order(&valid_form(), fixed_now()?)?;

    let catalog = fixtures::demo_catalog()?;
    store.add_product(catalog.require(ProductId(8))?, 5)?;

    let last = store.last_order()?;
    assert!(last.is_some_and(|kept| {
        kept.id == order.id && kept.totals.subtotal == order.totals.subtotal
    }));

    Ok(())
}

#[test]
fn empty_cart_is_refused() -> TestResult {
    let mut store = Store::open(MemoryBackend::new())?;

    let result = store.place_order(&valid_form(), fixed_now()?);

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    assert!(store.orders()?.is_empty());

    Ok(())
}

#[test]
fn rejected_form_reports_every_field_and_keeps_the_cart() -> anyhow::Result<()> {
    let mut store = loaded_store()?;
    store.apply_coupon("SUMMER25")?;

    let form = CheckoutForm {
        contact: Contact {
            email: "not-an-address".to_owned(),
            ..valid_form().contact
        },
        shipping: Address {
            last_name: String::new(),
            ..valid_form().shipping
        },
        accept_terms: false,
        ..valid_form()
    };

    let now = civil::date(2026, 8, 23)
        .at(12, 0, 0, 0)
        .to_zoned(TimeZone::UTC)?
        .timestamp();
    let Err(CheckoutError::Invalid(errors)) = store.place_order(&form, now) else {
        bail!("expected the form to be rejected");
    };

    assert_eq!(errors.len(), 3);
    assert!(errors.contains("email"));
    assert!(errors.contains("lastName"));
    assert!(errors.contains("terms"));

    assert_eq!(store.items().len(), 2);
    assert!(store.coupon().is_some());
    assert!(store.orders()?.is_empty());

    Ok(())
}

#[test]
fn card_expiring_last_month_is_rejected() -> anyhow::Result<()> {
    let mut store = loaded_store()?;

    let mut form = valid_form();
    if let Some(card) = form.card.as_mut() {
        card.expiry = "07/26".to_owned();
    }

    let now = civil::date(2026, 8, 23)
        .at(12, 0, 0, 0)
        .to_zoned(TimeZone::UTC)?
        .timestamp();
    let Err(CheckoutError::Invalid(errors)) = store.place_order(&form, now) else {
        bail!("expected the expired card to be rejected");
    };

    assert_eq!(errors.len(), 1);
    assert!(errors.contains("cardExpiry"));

    Ok(())
}

#[test]
fn card_checks_are_skipped_for_paypal() -> TestResult {
    let mut store = loaded_store()?;

    let form = CheckoutForm {
        payment: PaymentMethod::Paypal,
        card: None,
        ..valid_form()
    };

    let order = store.place_order(&form, fixed_now()?)?;

    assert_eq!(order.payment, PaymentMethod::Paypal);
    assert!(store.items().is_empty());

    Ok(())
}
