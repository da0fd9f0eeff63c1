//! Life events the simulator reads while stepping through the years

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};

/// A one-time or recurring expense attached to a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifeEvent {
    /// Take `amount` out of the bank balance in projection year `year`
    LumpSumWithdrawal { year: u32, amount: f64 },

    /// Add `monthly_amount` of expenses from `from_age` onward,
    /// inflated from the event age at the expense inflation rate
    ExpenseIncrease { from_age: u32, monthly_amount: f64 },
}

impl LifeEvent {
    pub fn validate(&self) -> Result<()> {
        let (label, amount) = match self {
            LifeEvent::LumpSumWithdrawal { amount, .. } => ("lump_sum_withdrawal", *amount),
            LifeEvent::ExpenseIncrease { monthly_amount, .. } => ("expense_increase", *monthly_amount),
        };
        if !amount.is_finite() || amount < 0.0 {
            return Err(ProjectionError::InvalidInput(format!(
                "{} amount must be non-negative, got {}",
                label, amount
            )));
        }
        Ok(())
    }
}

/// Total lump sums scheduled for a projection year
pub(crate) fn lump_sum_for_year(events: &[LifeEvent], year: u32) -> f64 {
    events
        .iter()
        .map(|event| match event {
            LifeEvent::LumpSumWithdrawal { year: at, amount } if *at == year => *amount,
            _ => 0.0,
        })
        .sum()
}

/// Annual expense bump from every recurring event already started at `age`
pub(crate) fn expense_bump_at_age(events: &[LifeEvent], age: u32, inflation: f64) -> f64 {
    events
        .iter()
        .map(|event| match event {
            LifeEvent::ExpenseIncrease { from_age, monthly_amount } if age >= *from_age => {
                let years_since = (age - from_age) as f64;
                12.0 * monthly_amount * (1.0 + inflation).powf(years_since)
            }
            _ => 0.0,
        })
        .sum()
}
