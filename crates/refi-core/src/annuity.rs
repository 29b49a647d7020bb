//! Spreadsheet-style annuity primitives (PMT / NPER / PV) and the unit
//! and rounding helpers the scenario functions are built on.
//!
//! Sign convention follows spreadsheets: cash outflows are negative, so
//! `pmt` on a positive principal returns a negative payment and callers
//! take `.abs()` when they want the positive payment amount. All math in
//! `rust_decimal::Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RefiError;
use crate::types::{Money, Rate, Years};
use crate::RefiResult;

/// Months per year, as a Decimal for rate and period conversions.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// When within a period the payment falls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    /// Ordinary annuity: payment at period end (spreadsheet type 0).
    #[default]
    End,
    /// Annuity due: payment at period start (spreadsheet type 1).
    Start,
}

/// Fixed periodic payment amortizing `present_value` (plus `future_value`)
/// over `periods` at periodic rate `rate`. Negative for positive principal.
pub fn pmt(
    rate: Rate,
    periods: Decimal,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> RefiResult<Money> {
    if rate <= dec!(-1) {
        return Err(RefiError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }
    if periods.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "PMT with zero periods".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / periods);
    }

    let pvif = (Decimal::ONE + rate).powd(periods);
    let denom = pvif - Decimal::ONE;
    if denom.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let mut payment = rate * (present_value * pvif + future_value) / denom;
    if timing == PaymentTiming::Start {
        payment /= Decimal::ONE + rate;
    }
    Ok(-payment)
}

/// Number of periods needed for `payment` to amortize `present_value`
/// (plus `future_value`) at periodic rate `rate`. Fractional result.
///
/// Errors with [`RefiError::NonAmortizing`] when the payment does not
/// cover the periodic interest, making the log argument non-positive.
/// Scenario callers clamp that case to a zero term.
pub fn nper(
    rate: Rate,
    payment: Money,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> RefiResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(RefiError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    if rate.is_zero() {
        if payment.is_zero() {
            return Err(RefiError::DivisionByZero {
                context: "NPER with zero rate and zero payment".into(),
            });
        }
        return Ok(-(present_value + future_value) / payment);
    }

    let pay = if timing == PaymentTiming::Start {
        payment * (Decimal::ONE + rate)
    } else {
        payment
    };

    let denom = pay + rate * present_value;
    if denom.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "NPER log argument denominator".into(),
        });
    }

    let log_arg = (pay - rate * future_value) / denom;
    if log_arg <= Decimal::ZERO {
        return Err(RefiError::NonAmortizing(format!(
            "payment {} does not amortize principal {} at periodic rate {}",
            pay.abs(),
            present_value,
            rate
        )));
    }

    Ok(log_arg.ln() / (Decimal::ONE + rate).ln())
}

/// Maximum principal a fixed `payment` supports over `periods` at periodic
/// rate `rate` (plus discounted `future_value`). Negative for positive
/// payments, per the sign convention.
pub fn present_value(
    rate: Rate,
    periods: Decimal,
    payment: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> RefiResult<Money> {
    if rate <= dec!(-1) {
        return Err(RefiError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(payment * periods + future_value));
    }

    let pvif = (Decimal::ONE + rate).powd(periods);
    if pvif.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "PV interest factor".into(),
        });
    }

    let pay = if timing == PaymentTiming::Start {
        payment * (Decimal::ONE + rate)
    } else {
        payment
    };

    Ok(-(pay * (pvif - Decimal::ONE) / rate + future_value) / pvif)
}

/// Round to the cent, half away from zero.
///
/// Symmetric for negative amounts: -2.675 rounds to -2.68, not -2.67.
/// A negative saving rounds with the same magnitude as the positive one.
pub fn round2(n: Decimal) -> Decimal {
    n.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Nominal annual rate to monthly periodic rate. Simple division, not
/// compounding-adjusted.
pub fn apr_to_monthly(apr: Rate) -> Rate {
    apr / MONTHS_PER_YEAR
}

/// Whole months in a (possibly fractional) year count, rounded half-up.
pub fn years_to_periods(years: Years) -> Decimal {
    (years * MONTHS_PER_YEAR).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `n` if strictly positive, else `fallback`.
pub fn clamp_pos(n: Decimal, fallback: Decimal) -> Decimal {
    if n > Decimal::ZERO {
        n
    } else {
        fallback
    }
}

/// Round a fractional year count up to whole years (23.1 -> 24). A partial
/// final year still requires payments, so terms are never rounded down.
pub fn round_up_years(years: Years) -> u32 {
    years.ceil().to_u32().unwrap_or(0)
}

/// Decimal rate to display percentage (0.0575 -> 5.75), rounded to 2 dp.
pub fn rate_to_percent(rate: Rate) -> Decimal {
    round2(rate * dec!(100))
}
