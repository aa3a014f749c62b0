use clap::{Args, Subcommand};
use tabled::builder::Builder;
use till::orders::Order;

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    List,
    Last,
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Order number, e.g. TILL-00042
    number: String,
}

pub(crate) fn run(context: &CliContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List => list(context),
        OrdersSubcommand::Last => last(context),
        OrdersSubcommand::Show(args) => show(context, &args),
    }
}

fn list(context: &CliContext) -> Result<(), String> {
    let orders = context
        .store
        .orders()
        .map_err(|error| format!("failed to read the order archive: {error}"))?;

    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Number", "Placed", "Lines", "Total", "Status"]);

    for order in &orders {
        builder.push_record([
            order.number.to_string(),
            order.created_at.to_string(),
            order.items.len().to_string(),
            render::money(order.totals.total),
            order.status.to_string(),
        ]);
    }

    println!("{}", render::finish(builder, 3..4));

    Ok(())
}

fn last(context: &CliContext) -> Result<(), String> {
    let order = context
        .store
        .last_order()
        .map_err(|error| format!("failed to read the order archive: {error}"))?;

    match order {
        Some(order) => print_order(&order),
        None => println!("no orders yet"),
    }

    Ok(())
}

fn show(context: &CliContext, args: &ShowArgs) -> Result<(), String> {
    let order = context
        .store
        .find_order(&args.number)
        .map_err(|error| format!("failed to read the order archive: {error}"))?
        .ok_or_else(|| format!("no order {}", args.number))?;

    print_order(&order);

    Ok(())
}

fn print_order(order: &Order) {
    println!("order_number: {}", order.number);
    println!("created_at: {}", order.created_at);
    println!("status: {}", order.status);
    println!("payment: {} ({})", order.payment, order.payment_status);
    println!("shipping_method: {}", order.shipping_method);
    println!(
        "customer: {} {} <{}>",
        order.customer.shipping.first_name,
        order.customer.shipping.last_name,
        order.customer.contact.email
    );

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "Qty", "Total"]);

    for line in &order.items {
        builder.push_record([
            line.id.to_string(),
            line.name.clone(),
            render::money(line.unit_price),
            line.quantity.to_string(),
            render::money(line.total),
        ]);
    }

    println!("{}", render::finish(builder, 2..5));

    println!("subtotal: {}", render::money(order.totals.subtotal));
    println!("discount: {}", render::money(order.totals.discount));
    println!("shipping: {}", render::money(order.totals.shipping));
    println!("total: {}", render::money(order.totals.total));
}
