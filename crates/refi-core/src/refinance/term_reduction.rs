//! Term reduction: pay the loan off faster at a marked-down rate.
//!
//! Two variants. The fixed-term variant re-amortizes over a caller-chosen
//! shorter term (typically 15 years). The same-payment variant holds the
//! homeowner's current payment and solves for how fast the preliminary
//! loan retires, reporting the term rounded up to whole years. Both apply
//! the 25bp term-reduction markdown to the offer rate and finance closing
//! costs into the loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{
    self, clamp_pos, rate_to_percent, round2, round_up_years, PaymentTiming, MONTHS_PER_YEAR,
};
use crate::error::RefiError;
use crate::refinance::quantities::{self, SavingsBreakdown};
use crate::refinance::TERM_REDUCTION_RATE_MARKDOWN;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::RefiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermReductionInput {
    pub mortgage_balance: Money,
    pub current_apr: Rate,
    pub current_term_years: Years,
    pub offer_rate: Rate,
    /// The shorter term to re-amortize over (e.g. 15 years).
    pub new_term_years: Years,
    #[serde(default = "super::default_closing_cost_rate")]
    pub closing_cost_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermReductionSamePaymentInput {
    pub mortgage_balance: Money,
    pub current_apr: Rate,
    pub current_term_years: Years,
    pub offer_rate: Rate,
    #[serde(default = "super::default_closing_cost_rate")]
    pub closing_cost_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermReductionOutput {
    pub term_years_new: Years,
    pub mortgage_balance: Money,
    pub closing_costs: Money,
    pub new_balance: Money,
    /// Rate actually applied: offer rate less the markdown, as a percent.
    pub offer_rate_pct: Decimal,
    pub old_payment: Money,
    pub new_payment: Money,
    pub monthly: Money,
    pub annual: Money,
    pub five_year: Money,
    pub effective_rate_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermReductionSamePaymentOutput {
    /// Solved payoff term, rounded up to whole years. Zero means the old
    /// payment cannot amortize the new loan at the marked-down rate.
    /// Always a whole number, kept as `Years` so every scenario output
    /// carries the same term representation.
    pub term_years_new: Years,
    pub mortgage_balance: Money,
    pub closing_costs: Money,
    pub new_balance: Money,
    pub offer_rate_pct: Decimal,
    pub old_payment: Money,
    pub new_payment: Money,
    pub monthly: Money,
    pub annual: Money,
    pub five_year: Money,
    pub effective_rate_pct: Decimal,
}

/// Quote a fixed-term term-reduction refinance.
pub fn analyze_term_reduction(
    input: &TermReductionInput,
) -> RefiResult<ComputationOutput<TermReductionOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_term_reduction(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Term Reduction Refinance",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Quote a same-payment term-reduction refinance.
pub fn analyze_term_reduction_same_payment(
    input: &TermReductionSamePaymentInput,
) -> RefiResult<ComputationOutput<TermReductionSamePaymentOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_term_reduction_same_payment(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Term Reduction Refinance (Same Payment)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn compute_term_reduction(
    input: &TermReductionInput,
) -> RefiResult<(TermReductionOutput, Vec<String>)> {
    validate_common(
        input.mortgage_balance,
        input.current_term_years,
        input.closing_cost_rate,
    )?;
    if input.new_term_years <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "new_term_years".into(),
            reason: "New term must be positive".into(),
        });
    }
    let mut warnings = Vec::new();

    let amounts =
        quantities::loan_amounts(input.mortgage_balance, input.closing_cost_rate, Decimal::ZERO);
    let old_payment = quantities::current_payment(
        input.mortgage_balance,
        input.current_apr,
        input.current_term_years,
    )?;

    let adjusted_rate = input.offer_rate - TERM_REDUCTION_RATE_MARKDOWN;
    if adjusted_rate <= Decimal::ZERO {
        warnings.push(format!(
            "Marked-down offer rate {} is not positive",
            adjusted_rate
        ));
    }

    let new_payment =
        quantities::current_payment(amounts.preliminary_loan, adjusted_rate, input.new_term_years)?;
    let sv: SavingsBreakdown = quantities::savings(old_payment, new_payment);

    Ok((
        TermReductionOutput {
            term_years_new: input.new_term_years,
            mortgage_balance: round2(input.mortgage_balance),
            closing_costs: amounts.closing_costs,
            new_balance: amounts.preliminary_loan,
            offer_rate_pct: rate_to_percent(adjusted_rate),
            old_payment: round2(old_payment),
            new_payment: round2(new_payment),
            monthly: sv.monthly,
            annual: sv.annual,
            five_year: sv.five_year,
            effective_rate_pct: quantities::effective_rate_approx(
                sv.five_year,
                amounts.preliminary_loan,
            ),
        },
        warnings,
    ))
}

pub(crate) fn compute_term_reduction_same_payment(
    input: &TermReductionSamePaymentInput,
) -> RefiResult<(TermReductionSamePaymentOutput, Vec<String>)> {
    validate_common(
        input.mortgage_balance,
        input.current_term_years,
        input.closing_cost_rate,
    )?;
    let mut warnings = Vec::new();

    let amounts =
        quantities::loan_amounts(input.mortgage_balance, input.closing_cost_rate, Decimal::ZERO);
    let old_payment = quantities::current_payment(
        input.mortgage_balance,
        input.current_apr,
        input.current_term_years,
    )?;

    let adjusted_rate = input.offer_rate - TERM_REDUCTION_RATE_MARKDOWN;
    let monthly_rate = annuity::apr_to_monthly(adjusted_rate);

    // Hold the old payment and solve how long the bigger loan takes to
    // retire. A payment that cannot cover interest clamps to a zero term
    // and is surfaced as a warning, not an error.
    let solved_periods = match annuity::nper(
        monthly_rate,
        -old_payment,
        amounts.preliminary_loan,
        Decimal::ZERO,
        PaymentTiming::End,
    ) {
        Ok(n) => clamp_pos(n, Decimal::ZERO),
        // Interest-only exactly (division by zero) never amortizes either.
        Err(RefiError::NonAmortizing(_)) | Err(RefiError::DivisionByZero { .. }) => Decimal::ZERO,
        Err(e) => return Err(e),
    };

    let (term_years_new, new_payment) = if solved_periods > Decimal::ZERO {
        let payment = annuity::pmt(
            monthly_rate,
            solved_periods,
            amounts.preliminary_loan,
            Decimal::ZERO,
            PaymentTiming::End,
        )?
        .abs();
        (
            Decimal::from(round_up_years(solved_periods / MONTHS_PER_YEAR)),
            payment,
        )
    } else {
        warnings.push(
            "Current payment does not cover interest on the new loan; offer is infeasible at \
             this payment level (term reported as 0)"
                .to_string(),
        );
        (Decimal::ZERO, old_payment)
    };

    let sv: SavingsBreakdown = quantities::savings(old_payment, new_payment);

    Ok((
        TermReductionSamePaymentOutput {
            term_years_new,
            mortgage_balance: round2(input.mortgage_balance),
            closing_costs: amounts.closing_costs,
            new_balance: amounts.preliminary_loan,
            offer_rate_pct: rate_to_percent(adjusted_rate),
            old_payment: round2(old_payment),
            new_payment: round2(new_payment),
            monthly: sv.monthly,
            annual: sv.annual,
            five_year: sv.five_year,
            effective_rate_pct: quantities::effective_rate_approx(
                sv.five_year,
                amounts.preliminary_loan,
            ),
        },
        warnings,
    ))
}

fn validate_common(balance: Money, current_term_years: Years, closing_cost_rate: Rate) -> RefiResult<()> {
    if balance <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "mortgage_balance".into(),
            reason: "Mortgage balance must be positive".into(),
        });
    }
    if current_term_years <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "current_term_years".into(),
            reason: "Current term must be positive".into(),
        });
    }
    if closing_cost_rate < Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "closing_cost_rate".into(),
            reason: "Closing cost rate cannot be negative".into(),
        });
    }
    Ok(())
}
