use clap::{Args, Subcommand};
use tabled::builder::Builder;
use till::catalog::ProductId;

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    Show,
    Toggle(ToggleArgs),
}

#[derive(Debug, Args)]
struct ToggleArgs {
    /// Product id
    id: ProductId,
}

pub(crate) fn run(context: &mut CliContext, command: WishlistCommand) -> Result<(), String> {
    match command.command {
        WishlistSubcommand::Show => show(context),
        WishlistSubcommand::Toggle(args) => toggle(context, &args),
    }
}

fn show(context: &CliContext) -> Result<(), String> {
    let wishlist = context.store.wishlist();

    if wishlist.is_empty() {
        println!("the wishlist is empty");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "Stock"]);

    for &id in wishlist {
        match context.catalog.get(id) {
            Some(product) => builder.push_record([
                product.id.to_string(),
                product.name.clone(),
                render::money(product.effective_price()),
                match product.stock {
                    Some(0) => "out".to_owned(),
                    Some(level) => level.to_string(),
                    None => String::new(),
                },
            ]),
            None => builder.push_record([
                id.to_string(),
                "(no longer in the catalog)".to_owned(),
                String::new(),
                String::new(),
            ]),
        }
    }

    println!("{}", render::finish(builder, 2..3));

    Ok(())
}

fn toggle(context: &mut CliContext, args: &ToggleArgs) -> Result<(), String> {
    let added = context
        .store
        .toggle_wishlist(args.id)
        .map_err(|error| format!("failed to save the wishlist: {error}"))?;

    if added {
        println!("added to the wishlist");
    } else {
        println!("removed from the wishlist");
    }

    Ok(())
}
