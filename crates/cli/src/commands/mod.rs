//! Command definitions and dispatch.

use clap::{Parser, Subcommand};

use crate::{
    config::{LoggingConfig, StoreConfig},
    context::CliContext,
    logging,
};

mod cart;
mod catalog;
mod checkout;
mod compare;
mod coupon;
mod orders;
mod recent;
mod view;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "till", about = "Storefront demo over a local data directory", long_about = None)]
pub(crate) struct Cli {
    /// Store location settings.
    #[command(flatten)]
    store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Cart(cart::CartCommand),
    Coupon(coupon::CouponCommand),
    Checkout(checkout::CheckoutCommand),
    Orders(orders::OrdersCommand),
    Wishlist(wishlist::WishlistCommand),
    View(view::ViewArgs),
    Recent(recent::RecentCommand),
    Compare(compare::CompareCommand),
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        logging::init(&self.logging)?;

        let mut context = CliContext::open(&self.store)?;

        match self.command {
            Commands::Catalog(command) => catalog::run(&context, command),
            Commands::Cart(command) => cart::run(&mut context, command),
            Commands::Coupon(command) => coupon::run(&mut context, command),
            Commands::Checkout(command) => checkout::run(&mut context, command),
            Commands::Orders(command) => orders::run(&context, command),
            Commands::Wishlist(command) => wishlist::run(&mut context, command),
            Commands::View(args) => view::run(&mut context, args),
            Commands::Recent(command) => recent::run(&context, command),
            Commands::Compare(command) => compare::run(&mut context, command),
        }
    }
}
