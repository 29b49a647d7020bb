//! Refinance scenario engine: derived quantities and the five
//! scenario calculations a loan officer presents to a homeowner.

pub mod cash_out;
pub mod comparison;
pub mod consolidation;
pub mod quantities;
pub mod rate_reduction;
pub mod schedule;
pub mod term_reduction;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Closing costs financed into the new loan, as a fraction of balance.
pub const DEFAULT_CLOSING_COST_RATE: Decimal = dec!(0.03);

/// Rate markdown applied to term-reduction offers, in decimal points
/// (0.0025 = 25 basis points off the quoted offer rate).
pub const TERM_REDUCTION_RATE_MARKDOWN: Decimal = dec!(0.0025);

pub(crate) fn default_closing_cost_rate() -> Decimal {
    DEFAULT_CLOSING_COST_RATE
}
