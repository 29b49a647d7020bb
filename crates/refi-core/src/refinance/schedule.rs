//! Level-pay amortization schedule for a fixed-rate loan, month by month.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{self, round2, PaymentTiming};
use crate::error::RefiError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::RefiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Nominal annual rate, as a decimal.
    pub annual_rate: Rate,
    pub term_years: Years,
}

/// One month of the schedule. Money-rounded for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub beginning_balance: Money,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub ending_balance: Money,
    /// Interest less principal: positive while interest dominates early
    /// in the loan, crossing negative at the payoff midpoint.
    pub interest_less_principal: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub rows: Vec<AmortizationRow>,
}

/// Generate the full amortization schedule for a loan.
pub fn generate_schedule(input: &ScheduleInput) -> RefiResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_schedule(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Pay Amortization Schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn compute_schedule(
    input: &ScheduleInput,
) -> RefiResult<(ScheduleOutput, Vec<String>)> {
    validate(input)?;
    let warnings = Vec::new();

    let monthly_rate = annuity::apr_to_monthly(input.annual_rate);
    let periods = annuity::years_to_periods(input.term_years);
    let monthly_payment = annuity::pmt(
        monthly_rate,
        periods,
        input.principal,
        Decimal::ZERO,
        PaymentTiming::End,
    )?
    .abs();

    let num_payments = periods.to_u32().ok_or_else(|| RefiError::InvalidInput {
        field: "term_years".into(),
        reason: "Term is out of range".into(),
    })? as usize;

    let mut rows = Vec::with_capacity(num_payments);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for month in 1..=num_payments as u32 {
        let interest = balance * monthly_rate;
        let principal_paid = monthly_payment - interest;
        let ending = balance - principal_paid;

        total_interest += interest;
        total_paid += monthly_payment;

        rows.push(AmortizationRow {
            month,
            beginning_balance: round2(balance),
            payment: round2(monthly_payment),
            principal: round2(principal_paid),
            interest: round2(interest),
            ending_balance: round2(ending.max(Decimal::ZERO)),
            interest_less_principal: round2(interest - principal_paid),
        });

        balance = ending;
        if balance <= Decimal::ZERO {
            break;
        }
    }

    Ok((
        ScheduleOutput {
            monthly_payment: round2(monthly_payment),
            total_interest: round2(total_interest),
            total_paid: round2(total_paid),
            rows,
        },
        warnings,
    ))
}

fn validate(input: &ScheduleInput) -> RefiResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.term_years <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be positive".into(),
        });
    }
    if input.annual_rate < Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_schedule_runs_full_term() {
        let input = ScheduleInput {
            principal: dec!(200000),
            annual_rate: dec!(0.06),
            term_years: dec!(30),
        };
        let out = generate_schedule(&input).unwrap().result;
        assert_eq!(out.rows.len(), 360);
        assert!((out.monthly_payment - dec!(1199.10)).abs() < dec!(0.02));
        // Final balance amortizes away to within a few cents of noise.
        assert!(out.rows.last().unwrap().ending_balance < dec!(0.05));
    }

    #[test]
    fn test_schedule_balances_chain() {
        let input = ScheduleInput {
            principal: dec!(100000),
            annual_rate: dec!(0.05),
            term_years: dec!(10),
        };
        let out = generate_schedule(&input).unwrap().result;
        let first = &out.rows[0];
        assert_eq!(first.beginning_balance, dec!(100000));
        // First-month interest is balance * monthly rate.
        assert_eq!(first.interest, round2(dec!(100000) * dec!(0.05) / dec!(12)));
        // Principal + interest make up the payment.
        assert!((first.principal + first.interest - first.payment).abs() <= dec!(0.01));
    }

    #[test]
    fn test_schedule_interest_declines() {
        let input = ScheduleInput {
            principal: dec!(150000),
            annual_rate: dec!(0.065),
            term_years: dec!(15),
        };
        let out = generate_schedule(&input).unwrap().result;
        assert!(out.rows.first().unwrap().interest > out.rows.last().unwrap().interest);
        assert!(out.total_interest > Decimal::ZERO);
        assert!(
            (out.total_paid - out.monthly_payment * Decimal::from(out.rows.len() as u32)).abs()
                < dec!(1)
        );
    }

    #[test]
    fn test_schedule_zero_rate_straight_line() {
        let input = ScheduleInput {
            principal: dec!(12000),
            annual_rate: dec!(0),
            term_years: dec!(1),
        };
        let out = generate_schedule(&input).unwrap().result;
        assert_eq!(out.rows.len(), 12);
        assert_eq!(out.monthly_payment, dec!(1000));
        assert_eq!(out.total_interest, Decimal::ZERO);
    }
}
