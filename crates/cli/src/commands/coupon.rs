use clap::{Args, Subcommand};
use till::coupons::CouponKind;

use crate::{context::CliContext, render};

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Apply(ApplyArgs),
    Remove,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Coupon code, case-insensitive
    code: String,
}

pub(crate) fn run(context: &mut CliContext, command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Apply(args) => apply(context, &args),
        CouponSubcommand::Remove => remove(context),
    }
}

fn apply(context: &mut CliContext, args: &ApplyArgs) -> Result<(), String> {
    let coupon = context
        .store
        .apply_coupon(&args.code)
        .map_err(|error| error.to_string())?;

    match coupon.kind {
        CouponKind::Percentage => println!("applied {}: {}% off", coupon.code, coupon.value),
        CouponKind::Fixed => {
            println!("applied {}: {} off", coupon.code, render::money(coupon.value));
        }
    }

    Ok(())
}

fn remove(context: &mut CliContext) -> Result<(), String> {
    let removed = context
        .store
        .remove_coupon()
        .map_err(|error| format!("failed to save the cart: {error}"))?;

    if removed {
        println!("coupon removed");
    } else {
        println!("no coupon applied");
    }

    Ok(())
}
