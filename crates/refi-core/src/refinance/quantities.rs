//! Derived quantities shared by every scenario: the homeowner's current
//! payment, pairwise savings projections, the approximate blended rate,
//! and closing-cost loan sizing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::annuity::{self, PaymentTiming};
use crate::types::{Money, Rate, Years};
use crate::RefiResult;

/// Monthly/annual/five-year savings from a payment change. Positive means
/// the new scenario is cheaper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavingsBreakdown {
    pub monthly: Money,
    pub annual: Money,
    pub five_year: Money,
}

/// Loan sizing with financed closing costs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoanAmounts {
    /// Closing costs financed into the loan.
    pub closing_costs: Money,
    /// Balance plus closing costs.
    pub preliminary_loan: Money,
    /// Preliminary loan plus any additional cash requested.
    pub final_loan: Money,
}

/// The fixed monthly payment amortizing `balance` over `term_years` at
/// nominal annual rate `apr`. Always positive.
pub fn current_payment(balance: Money, apr: Rate, term_years: Years) -> RefiResult<Money> {
    let rate = annuity::apr_to_monthly(apr);
    let periods = annuity::years_to_periods(term_years);
    let payment = annuity::pmt(rate, periods, balance, Decimal::ZERO, PaymentTiming::End)?;
    Ok(payment.abs())
}

/// Payment delta projected monthly, annually, and over five years.
///
/// Annual and five-year figures derive from the already-rounded monthly
/// delta, so `annual == monthly * 12` and `five_year == monthly * 60`
/// hold exactly.
pub fn savings(old_payment: Money, new_payment: Money) -> SavingsBreakdown {
    let monthly = annuity::round2(old_payment - new_payment);
    SavingsBreakdown {
        monthly,
        annual: annuity::round2(monthly * Decimal::from(12)),
        five_year: annuity::round2(monthly * Decimal::from(60)),
    }
}

/// Rough indicative rate: five-year savings relative to the new balance,
/// as a percentage. Not a true IRR; the denominator is floored at 1 to
/// keep degenerate balances from dividing by zero.
pub fn effective_rate_approx(five_year_savings: Money, new_balance: Money) -> Decimal {
    annuity::round2(five_year_savings / new_balance.max(Decimal::ONE) * Decimal::from(100))
}

/// Size the new loan: closing costs on the balance, then any additional
/// cash on top. All figures money-rounded.
pub fn loan_amounts(balance: Money, closing_cost_rate: Rate, additional_cash: Money) -> LoanAmounts {
    let closing_costs = balance * closing_cost_rate;
    let preliminary_loan = balance + closing_costs;
    let final_loan = preliminary_loan + additional_cash;
    LoanAmounts {
        closing_costs: annuity::round2(closing_costs),
        preliminary_loan: annuity::round2(preliminary_loan),
        final_loan: annuity::round2(final_loan),
    }
}
