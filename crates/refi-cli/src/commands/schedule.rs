use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use refi_core::refinance::schedule::{self, ScheduleInput};

use crate::input;

/// Arguments for amortization schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate as a decimal (e.g. 0.0575 for 5.75%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sched_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.term.ok_or("--term is required (or provide --input)")?,
        }
    };
    let result = schedule::generate_schedule(&sched_input)?;
    Ok(serde_json::to_value(result)?)
}
