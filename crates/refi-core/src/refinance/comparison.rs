//! The full scenario board for one saved scenario record: every refinance
//! option a loan officer presents side by side.
//!
//! Additional cash requested by the homeowner is added to the balance
//! before closing costs are applied, and folded into the reported cash-out
//! figure, mirroring how the scenario record is assembled upstream.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::round2;
use crate::refinance::cash_out::{self, CashOutInput, CashOutOutput};
use crate::refinance::consolidation::{
    self, ConsolidationInput, ConsolidationMode, ConsolidationOutput,
};
use crate::refinance::rate_reduction::{self, RateReductionInput, RateReductionOutput};
use crate::refinance::term_reduction::{
    self, TermReductionInput, TermReductionOutput, TermReductionSamePaymentInput,
    TermReductionSamePaymentOutput,
};
use crate::types::{with_metadata, ComputationOutput, Money, ScenarioRecord};
use crate::RefiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub rate_reduction: RateReductionOutput,
    pub term_reduction: TermReductionOutput,
    pub term_reduction_same_payment: TermReductionSamePaymentOutput,
    pub cash_out: CashOutOutput,
    pub consolidation_same_term: ConsolidationOutput,
    pub consolidation_same_payment: ConsolidationOutput,
}

/// Run every scenario off one saved record.
pub fn compare_scenarios(
    record: &ScenarioRecord,
) -> RefiResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let additional_cash = record.additional_cash.max(Decimal::ZERO);
    if record.additional_cash < Decimal::ZERO {
        warnings.push("Negative additional cash treated as zero".to_string());
    }
    // Cash the homeowner wants out rides on the balance from the start, so
    // every scenario prices the loan they would actually take.
    let balance: Money = record.mortgage_balance + additional_cash;

    let (rate_reduction, w) =
        rate_reduction::compute_rate_reduction(&RateReductionInput {
            mortgage_balance: balance,
            current_apr: record.current_apr,
            current_term_years: record.current_term_years,
            offer_rate: record.offer_rate,
            offer_term_years: record.offer_term_years,
            closing_cost_rate: record.closing_cost_rate,
        })?;
    warnings.extend(w);

    let (term_reduction, w) = term_reduction::compute_term_reduction(&TermReductionInput {
        mortgage_balance: balance,
        current_apr: record.current_apr,
        current_term_years: record.current_term_years,
        offer_rate: record.offer_rate,
        new_term_years: record.reduced_term_years,
        closing_cost_rate: record.closing_cost_rate,
    })?;
    warnings.extend(w);

    let (term_reduction_same_payment, w) =
        term_reduction::compute_term_reduction_same_payment(&TermReductionSamePaymentInput {
            mortgage_balance: balance,
            current_apr: record.current_apr,
            current_term_years: record.current_term_years,
            offer_rate: record.offer_rate,
            closing_cost_rate: record.closing_cost_rate,
        })?;
    warnings.extend(w);

    let (mut cash_out, w) = cash_out::compute_cash_out(&CashOutInput {
        mortgage_balance: balance,
        current_apr: record.current_apr,
        current_term_years: record.current_term_years,
        offer_rate: record.offer_rate,
        offer_term_years: record.offer_term_years,
        closing_cost_rate: record.closing_cost_rate,
    })?;
    warnings.extend(w);
    // The requested cash is already financed in the balance; report it as
    // part of what the homeowner walks away with.
    cash_out.cash_out = round2(cash_out.cash_out + additional_cash);

    let (consolidation_same_term, w) =
        consolidation::compute_consolidation(&ConsolidationInput {
            mortgage_balance: balance,
            current_apr: record.current_apr,
            current_term_years: record.current_term_years,
            offer_rate: record.offer_rate,
            offer_term_years: record.offer_term_years,
            debts: record.debts.clone(),
            mode: ConsolidationMode::SameTerm,
            closing_cost_rate: record.closing_cost_rate,
        })?;
    warnings.extend(w);

    let (consolidation_same_payment, w) =
        consolidation::compute_consolidation(&ConsolidationInput {
            mortgage_balance: balance,
            current_apr: record.current_apr,
            current_term_years: record.current_term_years,
            offer_rate: record.offer_rate,
            offer_term_years: record.offer_term_years,
            debts: record.debts.clone(),
            mode: ConsolidationMode::SamePayment,
            closing_cost_rate: record.closing_cost_rate,
        })?;
    warnings.extend(w);

    let output = ComparisonOutput {
        rate_reduction,
        term_reduction,
        term_reduction_same_payment,
        cash_out,
        consolidation_same_term,
        consolidation_same_payment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance Scenario Comparison",
        record,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Debt;
    use rust_decimal_macros::dec;

    fn sample_record() -> ScenarioRecord {
        ScenarioRecord {
            name: "Smith refi".into(),
            client_name: "J. Smith".into(),
            property_address: "12 Oak Ln".into(),
            campaign_date: None,
            mortgage_balance: dec!(400000),
            additional_cash: dec!(20000),
            closing_cost_rate: dec!(0.03),
            reduced_term_years: dec!(15),
            offer_rate: dec!(0.0575),
            offer_term_years: dec!(30),
            current_apr: dec!(0.07),
            current_term_years: dec!(30),
            debts: vec![
                Debt {
                    balance: dec!(8000),
                    min_payment: dec!(250),
                    include: true,
                },
                Debt {
                    balance: dec!(3000),
                    min_payment: dec!(90),
                    include: false,
                },
            ],
        }
    }

    #[test]
    fn test_additional_cash_rides_on_balance() {
        let out = compare_scenarios(&sample_record()).unwrap().result;
        // 420k + 3% closing costs across the board.
        assert_eq!(out.rate_reduction.new_balance, dec!(432600));
        assert_eq!(out.rate_reduction.closing_costs, dec!(12600));
        assert_eq!(out.term_reduction.new_balance, dec!(432600));
    }

    #[test]
    fn test_additional_cash_folds_into_cash_out() {
        let record = sample_record();
        let with_cash = compare_scenarios(&record).unwrap().result;

        let mut no_cash = record.clone();
        no_cash.additional_cash = Decimal::ZERO;
        no_cash.mortgage_balance = dec!(420000);
        let equivalent = compare_scenarios(&no_cash).unwrap().result;

        assert_eq!(
            with_cash.cash_out.cash_out,
            equivalent.cash_out.cash_out + dec!(20000)
        );
    }

    #[test]
    fn test_only_included_debts_roll() {
        let out = compare_scenarios(&sample_record()).unwrap().result;
        assert_eq!(out.consolidation_same_term.rolled_balance, dec!(8000));
        assert_eq!(out.consolidation_same_term.dropped_min_payments, dec!(250));
        assert_eq!(
            out.consolidation_same_payment.rolled_balance,
            out.consolidation_same_term.rolled_balance
        );
    }

    #[test]
    fn test_record_defaults_from_minimal_json() {
        let record: ScenarioRecord = serde_json::from_value(serde_json::json!({
            "mortgage_balance": "250000",
            "offer_rate": "0.055",
            "offer_term_years": "30",
            "current_apr": "0.0675",
            "current_term_years": "28"
        }))
        .unwrap();
        assert_eq!(record.closing_cost_rate, dec!(0.03));
        assert_eq!(record.reduced_term_years, dec!(15));
        assert_eq!(record.additional_cash, Decimal::ZERO);
        assert!(record.debts.is_empty());
        let out = compare_scenarios(&record).unwrap();
        assert_eq!(out.result.rate_reduction.closing_costs, dec!(7500));
    }
}
