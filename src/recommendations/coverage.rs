//! Life-cover breakdown: what a payout would need to replace or settle

use crate::profile::{Profile, MORTGAGE_YEARS_REMAINING};
use serde::{Deserialize, Serialize};

/// Years of coverage when the caller doesn't choose
pub const DEFAULT_COVERAGE_YEARS: u32 = 20;

/// Income replacement never covers more than this many years
pub const MAX_INCOME_REPLACEMENT_YEARS: u32 = 25;

/// Education fund set aside per dependent
pub const EDUCATION_FUND_PER_DEPENDENT: f64 = 150_000.0;

/// Years of annual expenses held as an emergency buffer
pub const EMERGENCY_BUFFER_YEARS: f64 = 2.0;

/// Totals are rounded to this step
pub const COVERAGE_ROUNDING: f64 = 50_000.0;

/// No recommendation goes below this
pub const MIN_COVERAGE: f64 = 200_000.0;

/// Extra cover a scenario asks for on top of the base components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoverageBuffer {
    #[default]
    None,
    /// A number of years of current annual expenses
    ExpenseYears { years: f64 },
    /// A fixed amount
    Amount { amount: f64 },
    /// One more dependent's education plus years of annual expenses
    NewDependent { expense_years: f64 },
}

impl CoverageBuffer {
    pub fn amount(&self, profile: &Profile) -> f64 {
        match self {
            CoverageBuffer::None => 0.0,
            CoverageBuffer::ExpenseYears { years } => profile.annual_expenses() * years,
            CoverageBuffer::Amount { amount } => *amount,
            CoverageBuffer::NewDependent { expense_years } => {
                EDUCATION_FUND_PER_DEPENDENT + profile.annual_expenses() * expense_years
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        let value = match self {
            CoverageBuffer::None => 0.0,
            CoverageBuffer::ExpenseYears { years } => *years,
            CoverageBuffer::Amount { amount } => *amount,
            CoverageBuffer::NewDependent { expense_years } => *expense_years,
        };
        value.is_finite() && value >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageBreakdown {
    /// Recommended cover, rounded to 50k with a 200k floor
    pub total_coverage: f64,
    pub income_replacement: f64,
    pub education_fund: f64,
    pub outstanding_mortgage: f64,
    pub emergency_buffer: f64,
    pub scenario_buffer: f64,
    /// Liquid savings already available, netted off the total
    pub current_savings: f64,
    pub years: u32,
}

/// Cover needed to replace income and settle obligations over `years`
pub fn coverage_needs(profile: &Profile, buffer: &CoverageBuffer, years: u32) -> CoverageBreakdown {
    let income_replacement =
        12.0 * profile.monthly_active_income * years.min(MAX_INCOME_REPLACEMENT_YEARS) as f64;
    let education_fund = profile.dependents as f64 * EDUCATION_FUND_PER_DEPENDENT;
    let outstanding_mortgage = 12.0 * profile.monthly_mortgage * MORTGAGE_YEARS_REMAINING as f64;
    let emergency_buffer = profile.annual_expenses() * EMERGENCY_BUFFER_YEARS;
    let scenario_buffer = buffer.amount(profile);
    let current_savings = profile.bank_balance;

    let raw = income_replacement + education_fund + outstanding_mortgage + emergency_buffer + scenario_buffer
        - current_savings;
    let total_coverage = ((raw / COVERAGE_ROUNDING).round() * COVERAGE_ROUNDING).max(MIN_COVERAGE);

    CoverageBreakdown {
        total_coverage,
        income_replacement: income_replacement.round(),
        education_fund: education_fund.round(),
        outstanding_mortgage: outstanding_mortgage.round(),
        emergency_buffer: emergency_buffer.round(),
        scenario_buffer: scenario_buffer.round(),
        current_savings: current_savings.round(),
        years,
    }
}
