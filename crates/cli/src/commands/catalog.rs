use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use tabled::builder::Builder;
use till::catalog::{Catalog, Product, ProductFilter, ProductId, SortKey, paginate};

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    List(ListArgs),
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only show products in these categories
    #[arg(long)]
    category: Vec<String>,

    /// Only show products from these brands
    #[arg(long)]
    brand: Vec<String>,

    /// Lowest effective price to include
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest effective price to include
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Minimum star rating
    #[arg(long)]
    min_rating: Option<Decimal>,

    /// Only show products in stock
    #[arg(long)]
    in_stock: bool,

    /// Only show discounted products
    #[arg(long)]
    on_sale: bool,

    /// Only show products that ship free on their own
    #[arg(long)]
    free_shipping: bool,

    /// Match against name, description and category
    #[arg(long)]
    search: Option<String>,

    /// Sort order (featured, price-low, price-high, rating, newest, popularity)
    #[arg(long, default_value_t = SortKey::Featured)]
    sort: SortKey,

    /// Page number, twelve products per page
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Product id
    id: ProductId,
}

pub(crate) fn run(context: &CliContext, command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list(context, args),
        CatalogSubcommand::Show(args) => show(context, args),
    }
}

fn list(context: &CliContext, args: ListArgs) -> Result<(), String> {
    let filter = ProductFilter {
        categories: args.category,
        brands: args.brand,
        min_price: args.min_price,
        max_price: args.max_price,
        min_rating: args.min_rating,
        in_stock: args.in_stock,
        on_sale: args.on_sale,
        free_shipping: args.free_shipping,
        search: args.search,
    };

    let mut products = context.catalog.filter(&filter);
    args.sort.apply(&mut products);

    let page = paginate(&products, args.page);

    if page.items.is_empty() {
        println!("no products match");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Category", "Price", "Was", "Rating", "Stock"]);

    for product in &page.items {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            render::money(product.effective_price()),
            if product.on_sale() {
                render::money(product.price)
            } else {
                String::new()
            },
            format!("{} ({})", product.rating, product.review_count),
            match product.stock {
                Some(0) => "out".to_owned(),
                Some(level) => level.to_string(),
                None => String::new(),
            },
        ]);
    }

    println!("{}", render::finish(builder, 3..5));
    println!(
        "page {} of {} ({} products)",
        page.page, page.page_count, page.total
    );

    Ok(())
}

fn show(context: &CliContext, args: ShowArgs) -> Result<(), String> {
    let product = context
        .catalog
        .require(args.id)
        .map_err(|error| error.to_string())?;

    print_product(&context.catalog, product);

    Ok(())
}

pub(super) fn print_product(catalog: &Catalog, product: &Product) {
    println!("name: {}", product.name);
    println!("id: {}", product.id);
    println!("category: {}", product.category);
    println!("brand: {}", product.brand());

    if product.on_sale() {
        println!(
            "price: {} ({}% off {})",
            render::money(product.effective_price()),
            product.discount,
            render::money(product.price)
        );
    } else {
        println!("price: {}", render::money(product.price));
    }

    println!(
        "rating: {} from {} reviews",
        product.rating, product.review_count
    );

    match product.stock {
        Some(0) => println!("stock: out of stock"),
        Some(level) => println!("stock: {level}"),
        None => {}
    }

    println!(
        "ships_free: {}",
        if product.ships_free() { "yes" } else { "no" }
    );
    println!("added: {}", product.date_added);

    if !product.description.is_empty() {
        println!("description: {}", product.description);
    }

    if !product.specs.is_empty() {
        let mut specs: Vec<_> = product.specs.iter().collect();
        specs.sort_unstable_by_key(|(key, _)| key.as_str());

        println!("specs:");
        for (key, value) in specs {
            println!("  {key}: {value}");
        }
    }

    let related = catalog.related(product.id, 4);
    if !related.is_empty() {
        let names: Vec<String> = related
            .iter()
            .map(|other| format!("{} ({})", other.name, other.id))
            .collect();

        println!("related: {}", names.join(", "));
    }
}
