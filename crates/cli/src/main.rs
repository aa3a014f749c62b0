//! Till storefront CLI

use std::process;

use clap::Parser;

use crate::commands::Cli;

mod commands;
mod config;
mod context;
mod logging;
mod render;

fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = cli.run() {
        eprintln!("{error}");
        process::exit(1);
    }
}
