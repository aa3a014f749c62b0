use clap::{Args, Subcommand};
use jiff::Timestamp;
use till::{
    checkout::{Address, CardDetails, CheckoutError, PaymentMethod},
    shipping::ShippingMethod,
};

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    Place(PlaceArgs),
    Form(FormCommand),
}

#[derive(Debug, Args)]
struct FormCommand {
    #[command(subcommand)]
    command: FormSubcommand,
}

#[derive(Debug, Subcommand)]
enum FormSubcommand {
    Set(FormSetArgs),
    Show,
}

#[derive(Debug, Args)]
struct PlaceArgs {
    /// Shipping method override (standard, express, pickup)
    #[arg(long)]
    shipping: Option<ShippingMethod>,

    /// Payment method override (card, paypal, bank-transfer)
    #[arg(long)]
    payment: Option<PaymentMethod>,

    /// Card number
    #[arg(long)]
    card_number: Option<String>,

    /// Name on the card
    #[arg(long)]
    card_name: Option<String>,

    /// Card expiry, MM/YY
    #[arg(long)]
    card_expiry: Option<String>,

    /// Card security code
    #[arg(long)]
    card_cvc: Option<String>,

    /// Confirm the shop terms
    #[arg(long)]
    accept_terms: bool,
}

#[derive(Debug, Args)]
struct FormSetArgs {
    /// Contact email address
    #[arg(long)]
    email: Option<String>,

    /// Contact phone number
    #[arg(long)]
    phone: Option<String>,

    /// Shipping first name
    #[arg(long)]
    first_name: Option<String>,

    /// Shipping last name
    #[arg(long)]
    last_name: Option<String>,

    /// Shipping street address
    #[arg(long)]
    address: Option<String>,

    /// Shipping apartment, suite or floor
    #[arg(long)]
    address2: Option<String>,

    /// Shipping city
    #[arg(long)]
    city: Option<String>,

    /// Shipping postal code
    #[arg(long)]
    zip: Option<String>,

    /// Shipping country
    #[arg(long)]
    country: Option<String>,

    /// Use the shipping address for billing (true, false)
    #[arg(long)]
    billing_same_as_shipping: Option<bool>,

    /// Billing first name
    #[arg(long)]
    billing_first_name: Option<String>,

    /// Billing last name
    #[arg(long)]
    billing_last_name: Option<String>,

    /// Billing street address
    #[arg(long)]
    billing_address: Option<String>,

    /// Billing apartment, suite or floor
    #[arg(long)]
    billing_address2: Option<String>,

    /// Billing city
    #[arg(long)]
    billing_city: Option<String>,

    /// Billing postal code
    #[arg(long)]
    billing_zip: Option<String>,

    /// Billing country
    #[arg(long)]
    billing_country: Option<String>,

    /// Shipping method (standard, express, pickup)
    #[arg(long)]
    shipping: Option<ShippingMethod>,

    /// Payment method (card, paypal, bank-transfer)
    #[arg(long)]
    payment: Option<PaymentMethod>,

    /// Delivery notes
    #[arg(long)]
    notes: Option<String>,

    /// Newsletter opt-in (true, false)
    #[arg(long)]
    newsletter: Option<bool>,
}

pub(crate) fn run(context: &mut CliContext, command: CheckoutCommand) -> Result<(), String> {
    match command.command {
        CheckoutSubcommand::Place(args) => place(context, args),
        CheckoutSubcommand::Form(form) => match form.command {
            FormSubcommand::Set(args) => form_set(context, args),
            FormSubcommand::Show => form_show(context),
        },
    }
}

fn place(context: &mut CliContext, args: PlaceArgs) -> Result<(), String> {
    let mut form = context
        .store
        .checkout_form()
        .map_err(|error| format!("failed to load the saved form: {error}"))?
        .unwrap_or_default();

    if let Some(method) = args.shipping {
        form.shipping_method = method;
    }

    if let Some(method) = args.payment {
        form.payment = method;
    }

    if args.card_number.is_some()
        || args.card_name.is_some()
        || args.card_expiry.is_some()
        || args.card_cvc.is_some()
    {
        form.card = Some(CardDetails {
            number: args.card_number.unwrap_or_default(),
            holder: args.card_name.unwrap_or_default(),
            expiry: args.card_expiry.unwrap_or_default(),
            cvc: args.card_cvc.unwrap_or_default(),
        });
    }

    form.accept_terms = args.accept_terms;

    let order = match context.store.place_order(&form, Timestamp::now()) {
        Ok(order) => order,
        Err(CheckoutError::Invalid(errors)) => {
            let mut message = String::from("the checkout form is incomplete:");

            for error in &errors {
                message.push_str(&format!("\n  {error}"));
            }

            return Err(message);
        }
        Err(error) => return Err(error.to_string()),
    };

    println!("order_number: {}", order.number);
    println!("created_at: {}", order.created_at);
    println!("items: {}", order.items.len());
    println!("subtotal: {}", render::money(order.totals.subtotal));
    println!("discount: {}", render::money(order.totals.discount));
    println!("shipping: {}", render::money(order.totals.shipping));
    println!("total: {}", render::money(order.totals.total));

    Ok(())
}

fn form_set(context: &mut CliContext, args: FormSetArgs) -> Result<(), String> {
    let mut form = context
        .store
        .checkout_form()
        .map_err(|error| format!("failed to load the saved form: {error}"))?
        .unwrap_or_default();

    if let Some(email) = args.email {
        form.contact.email = email;
    }

    if let Some(phone) = args.phone {
        form.contact.phone = phone;
    }

    let shipping_fields = AddressFields {
        first_name: args.first_name,
        last_name: args.last_name,
        address: args.address,
        address2: args.address2,
        city: args.city,
        zip: args.zip,
        country: args.country,
    };
    shipping_fields.apply(&mut form.shipping);

    let billing_fields = AddressFields {
        first_name: args.billing_first_name,
        last_name: args.billing_last_name,
        address: args.billing_address,
        address2: args.billing_address2,
        city: args.billing_city,
        zip: args.billing_zip,
        country: args.billing_country,
    };

    if !billing_fields.is_empty() {
        billing_fields.apply(form.billing.get_or_insert_with(Address::default));
        form.billing_same_as_shipping = false;
    }

    if let Some(same) = args.billing_same_as_shipping {
        form.billing_same_as_shipping = same;
    }

    if let Some(method) = args.shipping {
        form.shipping_method = method;
    }

    if let Some(method) = args.payment {
        form.payment = method;
    }

    if let Some(notes) = args.notes {
        form.notes = Some(notes);
    }

    if let Some(newsletter) = args.newsletter {
        form.newsletter_opt_in = newsletter;
    }

    context
        .store
        .save_checkout_form(&form)
        .map_err(|error| format!("failed to save the form: {error}"))?;

    println!("checkout form saved");

    Ok(())
}

fn form_show(context: &CliContext) -> Result<(), String> {
    let Some(form) = context
        .store
        .checkout_form()
        .map_err(|error| format!("failed to load the saved form: {error}"))?
    else {
        println!("no saved checkout form");
        return Ok(());
    };

    println!("email: {}", form.contact.email);
    println!("phone: {}", form.contact.phone);
    print_address("shipping", &form.shipping);

    if form.billing_same_as_shipping {
        println!("billing: same as shipping");
    } else if let Some(billing) = &form.billing {
        print_address("billing", billing);
    }

    println!("shipping_method: {}", form.shipping_method);
    println!("payment: {}", form.payment);

    if let Some(notes) = &form.notes {
        println!("notes: {notes}");
    }

    println!("newsletter: {}", form.newsletter_opt_in);

    Ok(())
}

fn print_address(label: &str, address: &Address) {
    let mut parts = vec![
        format!("{} {}", address.first_name, address.last_name),
        address.address.clone(),
    ];

    if let Some(address2) = &address.address2 {
        parts.push(address2.clone());
    }

    parts.push(format!("{} {}", address.zip, address.city));
    parts.push(address.country.clone());

    println!("{label}: {}", parts.join(", "));
}

/// Optional address updates gathered from the command line.
struct AddressFields {
    first_name: Option<String>,
    last_name: Option<String>,
    address: Option<String>,
    address2: Option<String>,
    city: Option<String>,
    zip: Option<String>,
    country: Option<String>,
}

impl AddressFields {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.address.is_none()
            && self.address2.is_none()
            && self.city.is_none()
            && self.zip.is_none()
            && self.country.is_none()
    }

    fn apply(self, target: &mut Address) {
        if let Some(value) = self.first_name {
            target.first_name = value;
        }
        if let Some(value) = self.last_name {
            target.last_name = value;
        }
        if let Some(value) = self.address {
            target.address = value;
        }
        if let Some(value) = self.address2 {
            target.address2 = Some(value);
        }
        if let Some(value) = self.city {
            target.city = value;
        }
        if let Some(value) = self.zip {
            target.zip = value;
        }
        if let Some(value) = self.country {
            target.country = value;
        }
    }
}
