//! Monetary helpers over [`rust_decimal::Decimal`].
//!
//! Amounts travel on the wire as decimal strings and are never handled as
//! floats. The backends operate in whole currency units for charges
//! derived from the subtotal (tax, delivery), hence the single rounding
//! helper here.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to the nearest whole currency unit.
///
/// Midpoints round away from zero, which reproduces the behavior the
/// backends expect for non-negative amounts (2.5 → 3).
#[must_use]
pub fn round_to_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
