//! Cash-out at the same payment: how much equity the homeowner can pull
//! while keeping the monthly payment they already make.
//!
//! Solves the maximum loan the old payment supports at the offer rate
//! over the offer term; the cash out is whatever that exceeds the
//! preliminary loan (balance plus closing costs). The payment is held
//! constant by construction, so all savings fields are zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{self, rate_to_percent, round2, PaymentTiming};
use crate::error::RefiError;
use crate::refinance::quantities;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::RefiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashOutInput {
    pub mortgage_balance: Money,
    pub current_apr: Rate,
    pub current_term_years: Years,
    pub offer_rate: Rate,
    pub offer_term_years: Years,
    #[serde(default = "super::default_closing_cost_rate")]
    pub closing_cost_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashOutOutput {
    /// Term of the new loan (the offer term; nothing is solved for).
    pub term_years_new: Years,
    pub mortgage_balance: Money,
    pub closing_costs: Money,
    /// The maximum loan the old payment supports.
    pub new_balance: Money,
    pub offer_rate_pct: Decimal,
    /// Equity extracted: max loan less the preliminary loan. Negative
    /// means the offer cannot even refinance the existing balance at the
    /// old payment.
    pub cash_out: Money,
    pub old_payment: Money,
    pub new_payment: Money,
    pub monthly: Money,
    pub annual: Money,
    pub five_year: Money,
}

/// Quote a same-payment cash-out refinance.
pub fn analyze_cash_out(input: &CashOutInput) -> RefiResult<ComputationOutput<CashOutOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_cash_out(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash-Out Refinance (Same Payment)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn compute_cash_out(
    input: &CashOutInput,
) -> RefiResult<(CashOutOutput, Vec<String>)> {
    validate(input)?;
    let mut warnings = Vec::new();

    let amounts =
        quantities::loan_amounts(input.mortgage_balance, input.closing_cost_rate, Decimal::ZERO);
    let old_payment = quantities::current_payment(
        input.mortgage_balance,
        input.current_apr,
        input.current_term_years,
    )?;

    let monthly_rate = annuity::apr_to_monthly(input.offer_rate);
    let periods = annuity::years_to_periods(input.offer_term_years);
    let max_loan = -annuity::present_value(
        monthly_rate,
        periods,
        old_payment,
        Decimal::ZERO,
        PaymentTiming::End,
    )?;

    let cash_out = max_loan - amounts.preliminary_loan;
    if cash_out < Decimal::ZERO {
        warnings.push(format!(
            "Old payment supports only {} against a preliminary loan of {}; no equity can be \
             extracted at this rate and term",
            round2(max_loan),
            amounts.preliminary_loan
        ));
    }

    Ok((
        CashOutOutput {
            term_years_new: input.offer_term_years,
            mortgage_balance: round2(input.mortgage_balance),
            closing_costs: amounts.closing_costs,
            new_balance: round2(max_loan),
            offer_rate_pct: rate_to_percent(input.offer_rate),
            cash_out: round2(cash_out),
            old_payment: round2(old_payment),
            // Same payment by construction; savings are structurally zero.
            new_payment: round2(old_payment),
            monthly: Decimal::ZERO,
            annual: Decimal::ZERO,
            five_year: Decimal::ZERO,
        },
        warnings,
    ))
}

fn validate(input: &CashOutInput) -> RefiResult<()> {
    if input.mortgage_balance <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "mortgage_balance".into(),
            reason: "Mortgage balance must be positive".into(),
        });
    }
    if input.current_term_years <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "current_term_years".into(),
            reason: "Current term must be positive".into(),
        });
    }
    if input.offer_term_years <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "offer_term_years".into(),
            reason: "Offer term must be positive".into(),
        });
    }
    if input.closing_cost_rate < Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "closing_cost_rate".into(),
            reason: "Closing cost rate cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> CashOutInput {
        CashOutInput {
            mortgage_balance: dec!(400000),
            current_apr: dec!(0.07),
            current_term_years: dec!(30),
            offer_rate: dec!(0.0575),
            offer_term_years: dec!(30),
            closing_cost_rate: dec!(0.03),
        }
    }

    #[test]
    fn test_cash_out_holds_payment_constant() {
        let out = analyze_cash_out(&sample_input()).unwrap().result;
        assert_eq!(out.new_payment, out.old_payment);
        assert_eq!(out.monthly, Decimal::ZERO);
        assert_eq!(out.annual, Decimal::ZERO);
        assert_eq!(out.five_year, Decimal::ZERO);
    }

    #[test]
    fn test_cash_out_extracts_equity_at_lower_rate() {
        // Dropping from 7% to 5.75% at the same payment supports a larger
        // loan than balance + closing costs, so cash comes out.
        let out = analyze_cash_out(&sample_input()).unwrap().result;
        assert!(out.cash_out > Decimal::ZERO, "cash_out = {}", out.cash_out);
        assert_eq!(
            out.new_balance,
            round2(out.cash_out + dec!(412000)),
            "max loan = preliminary loan + cash out"
        );
    }

    #[test]
    fn test_cash_out_negative_when_rate_rises() {
        let mut input = sample_input();
        input.offer_rate = dec!(0.09);
        let out = analyze_cash_out(&input).unwrap();
        assert!(out.result.cash_out < Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_cash_out_omits_effective_rate_field() {
        let out = analyze_cash_out(&sample_input()).unwrap();
        let json = serde_json::to_value(&out.result).unwrap();
        assert!(json.get("effective_rate_pct").is_none());
    }
}
