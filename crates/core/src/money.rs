//! Exact money arithmetic.
//!
//! Monetary values are `rust_decimal::Decimal` throughout; nothing in the
//! domain touches floating point, so sums are independent of input order.

use rust_decimal::RoundingStrategy;

pub use rust_decimal::Decimal;

/// Value of a stock line: `quantity × unit_price`, or `None` when the
/// product does not fit in a `Decimal`.
pub fn line_value(quantity: u32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price)
}

/// Display an amount with exactly two decimal places (`1234.50`).
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
