//! Money arithmetic.
//!
//! The one place invoice totals are computed. Summation runs at full
//! precision; amounts are rounded to cents only at the exposure boundary
//! (API responses, dashboard aggregates), so rounding error never compounds
//! across line items.

use crate::models::{Invoice, LineItem};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a currency amount to 2 decimal places, half-up on the cent.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unrounded total of a single line item: `quantity * unit_price * (1 + vat/100)`.
///
/// Summation-time defaults for missing values: quantity 1, unit price 0,
/// VAT rate 0. The VAT default here differs from the 21% applied at
/// creation time; a record that lost its rate displays a total without tax
/// rather than inventing one.
pub fn line_item_total(item: &LineItem) -> Decimal {
    let quantity = item.quantity.unwrap_or(Decimal::ONE);
    let unit_price = item.unit_price.unwrap_or(Decimal::ZERO);
    let iva_rate = item.iva_rate.unwrap_or(Decimal::ZERO);

    let subtotal = quantity * unit_price;
    subtotal + subtotal * iva_rate / Decimal::ONE_HUNDRED
}

/// Unrounded invoice total: the sum of all line item totals. An invoice
/// with no items totals exactly 0; this never fails.
pub fn invoice_total(invoice: &Invoice) -> Decimal {
    invoice.items.iter().map(line_item_total).sum()
}
