use clap::Args;
use till::catalog::ProductId;

use crate::{commands::catalog, context::CliContext};

#[derive(Debug, Args)]
pub(crate) struct ViewArgs {
    /// Product id
    id: ProductId,
}

pub(crate) fn run(context: &mut CliContext, args: ViewArgs) -> Result<(), String> {
    let product = context
        .catalog
        .require(args.id)
        .map_err(|error| error.to_string())?;

    context
        .store
        .record_view(product)
        .map_err(|error| format!("failed to save the viewing history: {error}"))?;

    catalog::print_product(&context.catalog, product);

    Ok(())
}
