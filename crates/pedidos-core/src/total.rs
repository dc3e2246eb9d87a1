//! Money and quantity arithmetic for order totals.
//!
//! All monetary amounts use decimal arithmetic so that currency sums never
//! accumulate binary floating-point error. These functions are pure and
//! perform no validation; rejecting bad values is the order builder's job.

use pedidos_types::LineItem;
use rust_decimal::Decimal;

/// Returns the subtotal of a single line: `quantity * unit_price`.
pub fn line_subtotal(item: &LineItem) -> Decimal {
	item.quantity * item.unit_price
}

/// Returns the sum of all line subtotals.
///
/// An empty sequence yields zero, which is the total of the degenerate
/// zero-item order.
pub fn order_total(items: &[LineItem]) -> Decimal {
	items.iter().map(line_subtotal).sum()
}
