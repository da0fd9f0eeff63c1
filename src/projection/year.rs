//! Projection output structures

use serde::{Deserialize, Serialize};

/// Net worth that counts as the first-million milestone
pub const MILLION: f64 = 1_000_000.0;

/// One simulated year
///
/// Monetary values are rounded to whole units for every year after year 0;
/// year 0 carries the raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    // Timing
    pub year: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<i32>,
    pub age: u32,
    pub is_alive: bool,
    pub is_working_age: bool,

    // Income and spending
    pub annual_active_income: f64,
    pub annual_passive_income: f64,
    pub total_income: f64,
    pub annual_expenses: f64,
    /// Portion of `annual_expenses` from recurring life events
    pub life_event_expenses: f64,
    /// Mortgage repayments, kept apart from `annual_expenses`
    pub mortgage_payment: f64,
    pub savings_contribution: f64,
    pub investment_contribution: f64,
    pub net_cashflow: f64,

    // Bank balance
    /// Part of a deficit covered by existing savings
    pub savings_withdrawn: f64,
    pub lump_sum_withdrawal: f64,
    pub bank_balance: f64,
    pub is_shortfall: bool,

    // Net worth and protection
    pub net_worth: f64,
    pub insurance_need: f64,

    // Extended model components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquid_assets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_portfolio: Option<f64>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly rows, year 0 first
    pub years: Vec<ProjectionYear>,

    /// Net worth needed to count as retirement-ready
    pub retirement_target: f64,
}

impl ProjectionResult {
    pub fn new(retirement_target: f64, capacity: usize) -> Self {
        Self {
            years: Vec::with_capacity(capacity),
            retirement_target,
        }
    }

    /// Add a projected year
    pub fn add_year(&mut self, row: ProjectionYear) {
        self.years.push(row);
    }

    /// Row for a given year offset
    pub fn year(&self, year: u32) -> Option<&ProjectionYear> {
        find_year(&self.years, year)
    }

    pub fn net_worth_at(&self, year: u32) -> Option<f64> {
        self.year(year).map(|row| row.net_worth)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary::from_years(&self.years, self.retirement_target)
    }
}

/// Row for a given year offset; rows are ordered so the index usually matches
pub fn find_year(years: &[ProjectionYear], year: u32) -> Option<&ProjectionYear> {
    match years.get(year as usize) {
        Some(row) if row.year == year => Some(row),
        _ => years.iter().find(|row| row.year == year),
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_years: usize,
    pub final_bank_balance: f64,
    pub final_net_worth: f64,
    pub shortfall_years: usize,
    pub first_shortfall_age: Option<u32>,
    pub first_million_year: Option<u32>,
    pub retirement_ready_year: Option<u32>,
}

impl ProjectionSummary {
    pub fn from_years(years: &[ProjectionYear], retirement_target: f64) -> Self {
        let last = years.last();
        Self {
            total_years: years.len(),
            final_bank_balance: last.map(|r| r.bank_balance).unwrap_or(0.0),
            final_net_worth: last.map(|r| r.net_worth).unwrap_or(0.0),
            shortfall_years: years.iter().filter(|r| r.is_shortfall).count(),
            first_shortfall_age: years.iter().find(|r| r.is_shortfall).map(|r| r.age),
            first_million_year: years.iter().find(|r| r.net_worth >= MILLION).map(|r| r.year),
            retirement_ready_year: years
                .iter()
                .find(|r| r.net_worth >= retirement_target)
                .map(|r| r.year),
        }
    }
}
