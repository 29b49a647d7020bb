use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use refi_core::refinance::cash_out::{self, CashOutInput};
use refi_core::refinance::comparison;
use refi_core::refinance::consolidation::{self, ConsolidationInput};
use refi_core::refinance::rate_reduction::{self, RateReductionInput};
use refi_core::refinance::term_reduction::{
    self, TermReductionInput, TermReductionSamePaymentInput,
};
use refi_core::types::ScenarioRecord;

use crate::input;

/// Arguments for the rate-reduction scenario
#[derive(Args)]
pub struct RateReductionArgs {
    /// Balance to refinance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Current nominal annual rate as a decimal (e.g. 0.065 for 6.5%)
    #[arg(long)]
    pub current_apr: Option<Decimal>,

    /// Remaining term on the current mortgage, in years
    #[arg(long)]
    pub current_term: Option<Decimal>,

    /// Offered nominal annual rate as a decimal
    #[arg(long)]
    pub offer_rate: Option<Decimal>,

    /// Offered term, in years
    #[arg(long)]
    pub offer_term: Option<Decimal>,

    /// Closing costs financed into the loan, as a fraction of balance
    #[arg(long, default_value = "0.03")]
    pub closing_cost_rate: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the fixed-term term-reduction scenario
#[derive(Args)]
pub struct TermReductionArgs {
    #[arg(long)]
    pub balance: Option<Decimal>,

    #[arg(long)]
    pub current_apr: Option<Decimal>,

    #[arg(long)]
    pub current_term: Option<Decimal>,

    #[arg(long)]
    pub offer_rate: Option<Decimal>,

    /// The shorter term to re-amortize over, in years
    #[arg(long, default_value = "15")]
    pub new_term: Decimal,

    #[arg(long, default_value = "0.03")]
    pub closing_cost_rate: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the same-payment term-reduction scenario
#[derive(Args)]
pub struct TermReductionSamePaymentArgs {
    #[arg(long)]
    pub balance: Option<Decimal>,

    #[arg(long)]
    pub current_apr: Option<Decimal>,

    #[arg(long)]
    pub current_term: Option<Decimal>,

    #[arg(long)]
    pub offer_rate: Option<Decimal>,

    #[arg(long, default_value = "0.03")]
    pub closing_cost_rate: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the same-payment cash-out scenario
#[derive(Args)]
pub struct CashOutArgs {
    #[arg(long)]
    pub balance: Option<Decimal>,

    #[arg(long)]
    pub current_apr: Option<Decimal>,

    #[arg(long)]
    pub current_term: Option<Decimal>,

    #[arg(long)]
    pub offer_rate: Option<Decimal>,

    #[arg(long)]
    pub offer_term: Option<Decimal>,

    #[arg(long, default_value = "0.03")]
    pub closing_cost_rate: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for debt consolidation (debt list requires JSON input)
#[derive(Args)]
pub struct ConsolidateArgs {
    /// Path to JSON input file with balances, rates, and the debt list
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the full scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON scenario record
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rate_reduction(args: RateReductionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rr_input: RateReductionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RateReductionInput {
            mortgage_balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            current_apr: args
                .current_apr
                .ok_or("--current-apr is required (or provide --input)")?,
            current_term_years: args
                .current_term
                .ok_or("--current-term is required (or provide --input)")?,
            offer_rate: args
                .offer_rate
                .ok_or("--offer-rate is required (or provide --input)")?,
            offer_term_years: args
                .offer_term
                .ok_or("--offer-term is required (or provide --input)")?,
            closing_cost_rate: args.closing_cost_rate,
        }
    };
    let result = rate_reduction::analyze_rate_reduction(&rr_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_term_reduction(args: TermReductionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tr_input: TermReductionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        TermReductionInput {
            mortgage_balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            current_apr: args
                .current_apr
                .ok_or("--current-apr is required (or provide --input)")?,
            current_term_years: args
                .current_term
                .ok_or("--current-term is required (or provide --input)")?,
            offer_rate: args
                .offer_rate
                .ok_or("--offer-rate is required (or provide --input)")?,
            new_term_years: args.new_term,
            closing_cost_rate: args.closing_cost_rate,
        }
    };
    let result = term_reduction::analyze_term_reduction(&tr_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_term_reduction_same_payment(
    args: TermReductionSamePaymentArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let tr_input: TermReductionSamePaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        TermReductionSamePaymentInput {
            mortgage_balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            current_apr: args
                .current_apr
                .ok_or("--current-apr is required (or provide --input)")?,
            current_term_years: args
                .current_term
                .ok_or("--current-term is required (or provide --input)")?,
            offer_rate: args
                .offer_rate
                .ok_or("--offer-rate is required (or provide --input)")?,
            closing_cost_rate: args.closing_cost_rate,
        }
    };
    let result = term_reduction::analyze_term_reduction_same_payment(&tr_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_cash_out(args: CashOutArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let co_input: CashOutInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CashOutInput {
            mortgage_balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            current_apr: args
                .current_apr
                .ok_or("--current-apr is required (or provide --input)")?,
            current_term_years: args
                .current_term
                .ok_or("--current-term is required (or provide --input)")?,
            offer_rate: args
                .offer_rate
                .ok_or("--offer-rate is required (or provide --input)")?,
            offer_term_years: args
                .offer_term
                .ok_or("--offer-term is required (or provide --input)")?,
            closing_cost_rate: args.closing_cost_rate,
        }
    };
    let result = cash_out::analyze_cash_out(&co_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_consolidate(args: ConsolidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dc_input: ConsolidationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for debt consolidation".into());
    };
    let result = consolidation::analyze_consolidation(&dc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let record: ScenarioRecord = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for scenario comparison".into());
    };
    let result = comparison::compare_scenarios(&record)?;
    Ok(serde_json::to_value(result)?)
}
