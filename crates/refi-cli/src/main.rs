mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::scenarios::{
    CashOutArgs, CompareArgs, ConsolidateArgs, RateReductionArgs, TermReductionArgs,
    TermReductionSamePaymentArgs,
};
use commands::schedule::ScheduleArgs;

/// Mortgage refinance scenario calculations
#[derive(Parser)]
#[command(
    name = "refi",
    version,
    about = "Mortgage refinance scenario calculations",
    long_about = "A CLI for comparing a homeowner's current mortgage against refinance \
                  offers with decimal precision. Supports rate reduction, term reduction, \
                  cash-out, debt consolidation, full scenario comparison, and amortization \
                  schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower rate, same term, closing costs financed
    RateReduction(RateReductionArgs),
    /// Shorter term at the marked-down offer rate
    TermReduction(TermReductionArgs),
    /// Keep the current payment, solve the payoff term
    TermReductionSamePayment(TermReductionSamePaymentArgs),
    /// Extract equity while keeping the current payment
    CashOut(CashOutArgs),
    /// Roll non-mortgage debts into the refinance
    Consolidate(ConsolidateArgs),
    /// Run the full scenario board off a saved scenario record
    Compare(CompareArgs),
    /// Level-pay amortization schedule for a loan
    Schedule(ScheduleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::RateReduction(args) => commands::scenarios::run_rate_reduction(args),
        Commands::TermReduction(args) => commands::scenarios::run_term_reduction(args),
        Commands::TermReductionSamePayment(args) => {
            commands::scenarios::run_term_reduction_same_payment(args)
        }
        Commands::CashOut(args) => commands::scenarios::run_cash_out(args),
        Commands::Consolidate(args) => commands::scenarios::run_consolidate(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("refi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
