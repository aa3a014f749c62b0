//! Table and money rendering helpers.

use std::ops::Range;

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

/// Formats an amount in the shop currency.
pub(crate) fn money(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::EUR).to_string()
}

/// Builds the table from collected records: rounded borders, bold header,
/// the given columns right-aligned.
pub(crate) fn finish(builder: Builder, right_aligned: Range<usize>) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    if !right_aligned.is_empty() {
        table.modify(Columns::new(right_aligned), Alignment::right());
    }

    table.to_string()
}
