//! Rate reduction: same term, lower rate, closing costs financed.
//!
//! The old payment is computed on the raw balance so the homeowner sees a
//! fair before/after comparison; the new payment is computed on the
//! preliminary loan (balance plus closing costs). Per stakeholder rule
//! this scenario reports no approximate effective rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{rate_to_percent, round2};
use crate::error::RefiError;
use crate::refinance::quantities::{self, SavingsBreakdown};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::RefiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateReductionInput {
    /// Balance to refinance (may already include requested cash).
    pub mortgage_balance: Money,
    /// Current nominal annual rate, as a decimal.
    pub current_apr: Rate,
    /// Remaining term on the current mortgage, in years.
    pub current_term_years: Years,
    /// Offered nominal annual rate, as a decimal.
    pub offer_rate: Rate,
    /// Offered term, in years.
    pub offer_term_years: Years,
    /// Closing costs financed into the loan, as a fraction of balance.
    #[serde(default = "super::default_closing_cost_rate")]
    pub closing_cost_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateReductionOutput {
    /// Term of the new loan (unchanged from the offer).
    pub term_years: Years,
    pub mortgage_balance: Money,
    pub closing_costs: Money,
    /// The actual amount financed: balance plus closing costs.
    pub new_balance: Money,
    pub offer_rate_pct: Decimal,
    pub old_payment: Money,
    pub new_payment: Money,
    pub monthly: Money,
    pub annual: Money,
    pub five_year: Money,
}

/// Quote a rate-reduction refinance.
pub fn analyze_rate_reduction(
    input: &RateReductionInput,
) -> RefiResult<ComputationOutput<RateReductionOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_rate_reduction(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rate Reduction Refinance",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn compute_rate_reduction(
    input: &RateReductionInput,
) -> RefiResult<(RateReductionOutput, Vec<String>)> {
    validate(input)?;
    let mut warnings = Vec::new();

    let amounts =
        quantities::loan_amounts(input.mortgage_balance, input.closing_cost_rate, Decimal::ZERO);

    // Baseline on the raw balance, without closing costs.
    let old_payment = quantities::current_payment(
        input.mortgage_balance,
        input.current_apr,
        input.current_term_years,
    )?;
    let new_payment = quantities::current_payment(
        amounts.preliminary_loan,
        input.offer_rate,
        input.offer_term_years,
    )?;
    let sv: SavingsBreakdown = quantities::savings(old_payment, new_payment);

    if input.offer_rate >= input.current_apr {
        warnings.push(format!(
            "Offer rate {} is not below the current APR {}; no rate benefit",
            input.offer_rate, input.current_apr
        ));
    }

    Ok((
        RateReductionOutput {
            term_years: input.offer_term_years,
            mortgage_balance: round2(input.mortgage_balance),
            closing_costs: amounts.closing_costs,
            new_balance: amounts.preliminary_loan,
            offer_rate_pct: rate_to_percent(input.offer_rate),
            old_payment: round2(old_payment),
            new_payment: round2(new_payment),
            monthly: sv.monthly,
            annual: sv.annual,
            five_year: sv.five_year,
        },
        warnings,
    ))
}

fn validate(input: &RateReductionInput) -> RefiResult<()> {
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

    fn sample_input() -> RateReductionInput {
        RateReductionInput {
            mortgage_balance: dec!(500000),
            current_apr: dec!(0.065),
            current_term_years: dec!(30),
            offer_rate: dec!(0.0575),
            offer_term_years: dec!(30),
            closing_cost_rate: dec!(0.03),
        }
    }

    #[test]
    fn test_rate_reduction_concrete_scenario() {
        let out = analyze_rate_reduction(&sample_input()).unwrap().result;
        assert_eq!(out.closing_costs, dec!(15000));
        assert_eq!(out.new_balance, dec!(515000));
        assert_eq!(out.term_years, dec!(30));
        assert_eq!(out.offer_rate_pct, dec!(5.75));
        assert!((out.old_payment - dec!(3160.34)).abs() < dec!(0.02));
        assert!((out.new_payment - dec!(3005.40)).abs() < dec!(0.02));
        assert!((out.monthly - dec!(154.94)).abs() < dec!(0.04));
        assert_eq!(out.annual, out.monthly * dec!(12));
        assert_eq!(out.five_year, out.monthly * dec!(60));
    }

    #[test]
    fn test_rate_reduction_omits_effective_rate_field() {
        let out = analyze_rate_reduction(&sample_input()).unwrap();
        let json = serde_json::to_value(&out.result).unwrap();
        assert!(json.get("effective_rate_pct").is_none());
    }

    #[test]
    fn test_rate_reduction_warns_when_offer_not_lower() {
        let mut input = sample_input();
        input.offer_rate = dec!(0.07);
        let out = analyze_rate_reduction(&input).unwrap();
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_rate_reduction_rejects_nonpositive_balance() {
        let mut input = sample_input();
        input.mortgage_balance = Decimal::ZERO;
        assert!(matches!(
            analyze_rate_reduction(&input),
            Err(RefiError::InvalidInput { .. })
        ));
    }
}
