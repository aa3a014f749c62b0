use clap::{Args, Subcommand};
use tabled::builder::Builder;

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct RecentCommand {
    #[command(subcommand)]
    command: RecentSubcommand,
}

#[derive(Debug, Subcommand)]
enum RecentSubcommand {
    Show,
}

pub(crate) fn run(context: &CliContext, command: RecentCommand) -> Result<(), String> {
    match command.command {
        RecentSubcommand::Show => show(context),
    }
}

fn show(context: &CliContext) -> Result<(), String> {
    let viewed = context.store.recently_viewed();

    if viewed.is_empty() {
        println!("nothing viewed yet");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Category", "Price"]);

    for view in viewed {
        builder.push_record([
            view.id.to_string(),
            view.name.clone(),
            view.category.clone(),
            render::money(view.price),
        ]);
    }

    println!("{}", render::finish(builder, 3..4));

    Ok(())
}
