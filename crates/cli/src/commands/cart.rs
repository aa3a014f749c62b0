use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use tabled::builder::Builder;
use till::{
    cart::{MAX_QUANTITY, QuantityOutcome},
    catalog::ProductId,
    shipping::ShippingMethod,
};

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    Show(ShowArgs),
    Add(AddArgs),
    SetQty(SetQtyArgs),
    Remove(RemoveArgs),
    Clear,
    MoveToWishlist(MoveToWishlistArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Shipping method used for the quote (standard, express, pickup)
    #[arg(long, default_value_t = ShippingMethod::Standard)]
    shipping: ShippingMethod,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    id: ProductId,

    /// Number of units to add
    #[arg(long, default_value_t = 1)]
    qty: u32,
}

#[derive(Debug, Args)]
struct SetQtyArgs {
    /// Product id
    id: ProductId,

    /// New quantity; zero or less removes the line
    #[arg(allow_negative_numbers = true)]
    qty: i64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id
    id: ProductId,
}

#[derive(Debug, Args)]
struct MoveToWishlistArgs {
    /// Product id
    id: ProductId,
}

pub(crate) fn run(context: &mut CliContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show(context, &args),
        CartSubcommand::Add(args) => add(context, &args),
        CartSubcommand::SetQty(args) => set_qty(context, &args),
        CartSubcommand::Remove(args) => remove(context, &args),
        CartSubcommand::Clear => clear(context),
        CartSubcommand::MoveToWishlist(args) => move_to_wishlist(context, &args),
    }
}

fn show(context: &CliContext, args: &ShowArgs) -> Result<(), String> {
    let items = context.store.items();

    if items.is_empty() {
        println!("the cart is empty");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "Qty", "Total"]);

    for line in items {
        builder.push_record([
            line.id.to_string(),
            line.name.clone(),
            render::money(line.unit_price),
            line.quantity.to_string(),
            render::money(line.line_total()),
        ]);
    }

    println!("{}", render::finish(builder, 2..5));

    let totals = context.store.quote(args.shipping);

    println!("subtotal: {}", render::money(totals.subtotal));

    if let Some(coupon) = context.store.coupon() {
        println!(
            "discount: -{} ({})",
            render::money(totals.discount),
            coupon.code
        );
    }

    if totals.shipping == Decimal::ZERO {
        println!("shipping: free");
    } else {
        println!("shipping: {}", render::money(totals.shipping));
    }

    println!("total: {}", render::money(totals.total));

    Ok(())
}

fn add(context: &mut CliContext, args: &AddArgs) -> Result<(), String> {
    let product = context
        .catalog
        .require(args.id)
        .map_err(|error| error.to_string())?;

    if !product.in_stock() {
        return Err(format!("{} is out of stock", product.name));
    }

    let quantity = context
        .store
        .add_product(product, args.qty)
        .map_err(|error| format!("failed to save the cart: {error}"))?;

    println!("{} x{quantity} in the cart", product.name);

    Ok(())
}

fn set_qty(context: &mut CliContext, args: &SetQtyArgs) -> Result<(), String> {
    let outcome = context
        .store
        .set_quantity(args.id, args.qty)
        .map_err(|error| format!("failed to save the cart: {error}"))?;

    match outcome {
        QuantityOutcome::NotInCart => {
            return Err(format!("product {} is not in the cart", args.id));
        }
        QuantityOutcome::Updated { quantity } => println!("quantity set to {quantity}"),
        QuantityOutcome::Removed => println!("removed from the cart"),
        QuantityOutcome::ClampedToMax => println!("quantity capped at {MAX_QUANTITY} per line"),
        QuantityOutcome::ClampedToStock { stock } => {
            println!("only {stock} in stock, quantity set to {stock}");
        }
    }

    Ok(())
}

fn remove(context: &mut CliContext, args: &RemoveArgs) -> Result<(), String> {
    let removed = context
        .store
        .remove_item(args.id)
        .map_err(|error| format!("failed to save the cart: {error}"))?;

    if removed {
        println!("removed from the cart");
    } else {
        println!("the cart does not hold product {}", args.id);
    }

    Ok(())
}

fn clear(context: &mut CliContext) -> Result<(), String> {
    context
        .store
        .clear_cart()
        .map_err(|error| format!("failed to save the cart: {error}"))?;

    println!("cart cleared");

    Ok(())
}

fn move_to_wishlist(context: &mut CliContext, args: &MoveToWishlistArgs) -> Result<(), String> {
    let moved = context
        .store
        .move_to_wishlist(args.id)
        .map_err(|error| format!("failed to save the cart: {error}"))?;

    if moved {
        println!("moved to the wishlist");
    } else {
        println!("the cart does not hold product {}", args.id);
    }

    Ok(())
}
