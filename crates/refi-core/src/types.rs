use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Decimal throughout to keep cents exact.
pub type Money = Decimal;

/// Rates expressed as decimals (0.065 = 6.5%). Never as percentages,
/// except in fields explicitly suffixed `_pct`.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// A non-mortgage debt a homeowner may roll into a refinance.
///
/// `include = false` debts are shown to the client but excluded from
/// consolidation math. Absent from JSON means excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub balance: Money,
    pub min_payment: Money,
    #[serde(default)]
    pub include: bool,
}

fn default_closing_cost_rate() -> Rate {
    crate::refinance::DEFAULT_CLOSING_COST_RATE
}

fn default_reduced_term_years() -> Years {
    dec!(15)
}

/// A saved refinance scenario as persisted by the external store.
///
/// Carries everything needed to reconstruct the full scenario board for
/// one client. The informational fields (name, client, address, campaign
/// date) pass through untouched by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub property_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_date: Option<NaiveDate>,

    pub mortgage_balance: Money,
    /// Extra cash the homeowner wants out, added to the balance before
    /// closing costs are applied.
    #[serde(default)]
    pub additional_cash: Money,
    /// Closing costs financed into the loan, as a fraction of balance.
    #[serde(default = "default_closing_cost_rate")]
    pub closing_cost_rate: Rate,
    /// Target term for the fixed term-reduction scenario.
    #[serde(default = "default_reduced_term_years")]
    pub reduced_term_years: Years,

    pub offer_rate: Rate,
    pub offer_term_years: Years,
    pub current_apr: Rate,
    pub current_term_years: Years,

    #[serde(default)]
    pub debts: Vec<Debt>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
