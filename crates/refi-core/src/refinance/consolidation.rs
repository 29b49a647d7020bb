//! Debt consolidation: roll non-mortgage debts into the refinanced loan.
//!
//! Only debts flagged `include` are rolled; their minimum payments
//! disappear from the homeowner's monthly outflow, so savings compare
//! total outflows (old mortgage payment + dropped minimums against the
//! new payment). Closing costs apply to the mortgage balance only, not to
//! the rolled debts. Two modes: re-amortize over the offer term, or hold
//! the old mortgage-only payment and solve the payoff term.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{
    self, clamp_pos, rate_to_percent, round2, round_up_years, PaymentTiming, MONTHS_PER_YEAR,
};
use crate::error::RefiError;
use crate::refinance::quantities;
use crate::types::{with_metadata, ComputationOutput, Debt, Money, Rate, Years};
use crate::RefiResult;

/// How the consolidated loan is repaid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsolidationMode {
    /// Re-amortize the consolidated balance over the offer term.
    #[default]
    SameTerm,
    /// Hold the old mortgage payment and solve the payoff term.
    SamePayment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationInput {
    pub mortgage_balance: Money,
    pub current_apr: Rate,
    pub current_term_years: Years,
    pub offer_rate: Rate,
    pub offer_term_years: Years,
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub mode: ConsolidationMode,
    #[serde(default = "super::default_closing_cost_rate")]
    pub closing_cost_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationOutput {
    pub mode: ConsolidationMode,
    /// Offer term in `sameTerm` mode; solved and rounded up to whole
    /// years in `samePayment` mode (0 = infeasible at that payment).
    pub term_years_new: Years,
    pub mortgage_balance: Money,
    pub closing_costs: Money,
    /// Preliminary loan plus rolled debt balances.
    pub new_balance: Money,
    pub offer_rate_pct: Decimal,
    /// Sum of included debts' balances rolled into the loan.
    pub rolled_balance: Money,
    /// Sum of included debts' minimum payments, no longer owed monthly.
    pub dropped_min_payments: Money,
    pub old_mortgage_payment: Money,
    pub old_total_outflow: Money,
    /// Alias of `old_total_outflow` for uniform scenario consumption.
    pub old_payment: Money,
    pub new_mortgage_payment: Money,
    pub new_total_outflow: Money,
    /// Alias of `new_total_outflow` for uniform scenario consumption.
    pub new_payment: Money,
    pub monthly: Money,
    pub annual: Money,
    pub five_year: Money,
    pub effective_rate_pct: Decimal,
}

/// Quote a debt-consolidation refinance.
pub fn analyze_consolidation(
    input: &ConsolidationInput,
) -> RefiResult<ComputationOutput<ConsolidationOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_consolidation(input)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Consolidation Refinance",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn compute_consolidation(
    input: &ConsolidationInput,
) -> RefiResult<(ConsolidationOutput, Vec<String>)> {
    validate(input)?;
    let mut warnings = Vec::new();

    let included: Vec<&Debt> = input.debts.iter().filter(|d| d.include).collect();
    let rolled: Money = included
        .iter()
        .map(|d| d.balance.max(Decimal::ZERO))
        .sum();
    let dropped_mins: Money = included
        .iter()
        .map(|d| d.min_payment.max(Decimal::ZERO))
        .sum();
    if included.is_empty() {
        warnings.push("No debts marked for consolidation; rolling the mortgage only".to_string());
    }

    let old_mortgage_payment = quantities::current_payment(
        input.mortgage_balance,
        input.current_apr,
        input.current_term_years,
    )?;
    let old_total_outflow = old_mortgage_payment + dropped_mins;

    // Closing costs on the mortgage balance only, not on the debts.
    let amounts =
        quantities::loan_amounts(input.mortgage_balance, input.closing_cost_rate, Decimal::ZERO);
    let consolidated_balance = amounts.preliminary_loan + rolled;
    let monthly_rate = annuity::apr_to_monthly(input.offer_rate);

    let (term_years_new, new_payment) = match input.mode {
        ConsolidationMode::SamePayment => {
            let solved = match annuity::nper(
                monthly_rate,
                -old_mortgage_payment,
                consolidated_balance,
                Decimal::ZERO,
                PaymentTiming::End,
            ) {
                Ok(n) => clamp_pos(n, Decimal::ZERO),
                Err(RefiError::NonAmortizing(_)) | Err(RefiError::DivisionByZero { .. }) => {
                    Decimal::ZERO
                }
                Err(e) => return Err(e),
            };
            if solved > Decimal::ZERO {
                let payment = annuity::pmt(
                    monthly_rate,
                    solved,
                    consolidated_balance,
                    Decimal::ZERO,
                    PaymentTiming::End,
                )?
                .abs();
                (
                    Decimal::from(round_up_years(solved / MONTHS_PER_YEAR)),
                    payment,
                )
            } else {
                warnings.push(
                    "Old mortgage payment does not cover interest on the consolidated balance; \
                     offer is infeasible at this payment level (term reported as 0)"
                        .to_string(),
                );
                (Decimal::ZERO, old_mortgage_payment)
            }
        }
        ConsolidationMode::SameTerm => {
            let payment = quantities::current_payment(
                consolidated_balance,
                input.offer_rate,
                input.offer_term_years,
            )?;
            (input.offer_term_years, payment)
        }
    };

    let new_total_outflow = new_payment;
    let monthly = round2(old_total_outflow - new_total_outflow);
    let annual = round2(monthly * Decimal::from(12));
    let five_year = round2(monthly * Decimal::from(60));

    Ok((
        ConsolidationOutput {
            mode: input.mode,
            term_years_new,
            mortgage_balance: round2(input.mortgage_balance),
            closing_costs: amounts.closing_costs,
            new_balance: round2(consolidated_balance),
            offer_rate_pct: rate_to_percent(input.offer_rate),
            rolled_balance: round2(rolled),
            dropped_min_payments: round2(dropped_mins),
            old_mortgage_payment: round2(old_mortgage_payment),
            old_total_outflow: round2(old_total_outflow),
            old_payment: round2(old_total_outflow),
            new_mortgage_payment: round2(new_payment),
            new_total_outflow: round2(new_total_outflow),
            new_payment: round2(new_payment),
            monthly,
            annual,
            five_year,
            effective_rate_pct: quantities::effective_rate_approx(
                five_year,
                consolidated_balance,
            ),
        },
        warnings,
    ))
}

fn validate(input: &ConsolidationInput) -> RefiResult<()> {
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
