use clap::{Args, Subcommand};
use tabled::builder::Builder;
use till::{catalog::ProductId, store::CompareOutcome};

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct CompareCommand {
    #[command(subcommand)]
    command: CompareSubcommand,
}

#[derive(Debug, Subcommand)]
enum CompareSubcommand {
    Add(AddArgs),
    Remove(RemoveArgs),
    Show,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    id: ProductId,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id
    id: ProductId,
}

pub(crate) fn run(context: &mut CliContext, command: CompareCommand) -> Result<(), String> {
    match command.command {
        CompareSubcommand::Add(args) => add(context, &args),
        CompareSubcommand::Remove(args) => remove(context, &args),
        CompareSubcommand::Show => show(context),
    }
}

fn add(context: &mut CliContext, args: &AddArgs) -> Result<(), String> {
    let product = context
        .catalog
        .require(args.id)
        .map_err(|error| error.to_string())?;

    let outcome = context
        .store
        .add_compare(args.id)
        .map_err(|error| format!("failed to save the comparison: {error}"))?;

    match outcome {
        CompareOutcome::Added => println!("{} added to the comparison", product.name),
        CompareOutcome::AlreadyListed => println!("{} is already in the comparison", product.name),
        CompareOutcome::TrayFull => {
            return Err("the comparison already holds four products".to_owned());
        }
    }

    Ok(())
}

fn remove(context: &mut CliContext, args: &RemoveArgs) -> Result<(), String> {
    let removed = context
        .store
        .remove_compare(args.id)
        .map_err(|error| format!("failed to save the comparison: {error}"))?;

    if removed {
        println!("removed from the comparison");
    } else {
        println!("product {} is not in the comparison", args.id);
    }

    Ok(())
}

fn show(context: &CliContext) -> Result<(), String> {
    let products: Vec<_> = context
        .store
        .compare()
        .iter()
        .filter_map(|&id| context.catalog.get(id))
        .collect();

    if products.is_empty() {
        println!("the comparison is empty");
        return Ok(());
    }

    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(products.iter().map(|product| product.name.clone()));
    builder.push_record(header);

    let mut price_row = vec!["Price".to_owned()];
    price_row.extend(
        products
            .iter()
            .map(|product| render::money(product.effective_price())),
    );
    builder.push_record(price_row);

    let mut rating_row = vec!["Rating".to_owned()];
    rating_row.extend(
        products
            .iter()
            .map(|product| format!("{} ({})", product.rating, product.review_count)),
    );
    builder.push_record(rating_row);

    let mut category_row = vec!["Category".to_owned()];
    category_row.extend(products.iter().map(|product| product.category.clone()));
    builder.push_record(category_row);

    let mut brand_row = vec!["Brand".to_owned()];
    brand_row.extend(products.iter().map(|product| product.brand().to_owned()));
    builder.push_record(brand_row);

    let mut stock_row = vec!["Stock".to_owned()];
    stock_row.extend(products.iter().map(|product| match product.stock {
        Some(0) => "out".to_owned(),
        Some(level) => level.to_string(),
        None => String::new(),
    }));
    builder.push_record(stock_row);

    println!("{}", render::finish(builder, 0..0));

    Ok(())
}
