//! Household profile: the immutable starting point of every projection

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Months of expenses a healthy emergency fund should cover
pub const EMERGENCY_FUND_MONTHS: f64 = 6.0;

/// Net worth needed to retire, as a multiple of current annual expenses
pub const RETIREMENT_EXPENSE_MULTIPLE: f64 = 25.0;

/// Years of repayments assumed left on a mortgage
pub const MORTGAGE_YEARS_REMAINING: u32 = 15;

/// Oldest age a profile may carry
pub const MAX_AGE: u32 = 150;

/// A household's financial snapshot at the start of the projection
///
/// Missing fields in JSON input fall back to [`Profile::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Free-form label (client name or id), not used by the engine
    pub client_id: String,

    /// Number of people in the household
    pub household_size: u32,

    /// Monthly salary / wage income
    pub monthly_active_income: f64,

    /// Monthly rental, dividend or annuity income
    pub monthly_passive_income: f64,

    /// Monthly household expenses
    pub monthly_expenses: f64,

    /// Current liquid savings (bank balance / emergency buffer)
    pub bank_balance: f64,

    /// Current total net worth
    pub net_worth: f64,

    /// Monthly contribution to investments
    pub monthly_investment: f64,

    /// Scheduled monthly savings added to cashflow while alive
    pub monthly_savings: f64,

    pub current_age: u32,
    pub retirement_age: u32,

    /// Death age or end of plan
    pub horizon_age: u32,

    /// CPF contribution as a percentage of active income (0-100)
    pub cpf_contribution_pct: f64,

    /// Starting CPF balance (extended net-worth model only)
    pub cpf_balance: f64,

    /// Life cover already held
    pub existing_life_cover: f64,

    /// Monthly mortgage repayment
    pub monthly_mortgage: f64,

    /// Children or other dependents relying on the household's income
    pub dependents: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            household_size: 1,
            monthly_active_income: 8000.0,
            monthly_passive_income: 0.0,
            monthly_expenses: 5000.0,
            bank_balance: 50_000.0,
            net_worth: 50_000.0,
            monthly_investment: 1000.0,
            monthly_savings: 0.0,
            current_age: 34,
            retirement_age: 65,
            horizon_age: 85,
            cpf_contribution_pct: 20.0,
            cpf_balance: 0.0,
            existing_life_cover: 0.0,
            monthly_mortgage: 0.0,
            dependents: 0,
        }
    }
}

impl Profile {
    /// Check every invariant the projection relies on
    pub fn validate(&self) -> Result<()> {
        let monetary = [
            ("monthly_active_income", self.monthly_active_income),
            ("monthly_passive_income", self.monthly_passive_income),
            ("monthly_expenses", self.monthly_expenses),
            ("bank_balance", self.bank_balance),
            ("net_worth", self.net_worth),
            ("monthly_investment", self.monthly_investment),
            ("monthly_savings", self.monthly_savings),
            ("cpf_balance", self.cpf_balance),
            ("existing_life_cover", self.existing_life_cover),
            ("monthly_mortgage", self.monthly_mortgage),
        ];
        for (name, value) in monetary {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::InvalidInput(format!(
                    "{} must be a non-negative amount, got {}",
                    name, value
                )));
            }
        }

        if self.household_size == 0 {
            return Err(ProjectionError::InvalidInput(
                "household_size must be at least 1".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.cpf_contribution_pct) {
            return Err(ProjectionError::InvalidInput(format!(
                "cpf_contribution_pct must be within [0, 100], got {}",
                self.cpf_contribution_pct
            )));
        }

        for (name, age) in [
            ("current_age", self.current_age),
            ("retirement_age", self.retirement_age),
            ("horizon_age", self.horizon_age),
        ] {
            if age > MAX_AGE {
                return Err(ProjectionError::InvalidInput(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_AGE, age
                )));
            }
        }

        if self.retirement_age < self.current_age {
            return Err(ProjectionError::InvalidInput(format!(
                "retirement_age {} is before current_age {}",
                self.retirement_age, self.current_age
            )));
        }

        if self.horizon_age < self.current_age {
            return Err(ProjectionError::InvalidInput(format!(
                "horizon_age {} is before current_age {}",
                self.horizon_age, self.current_age
            )));
        }

        Ok(())
    }

    /// Active plus passive monthly income
    pub fn monthly_income(&self) -> f64 {
        self.monthly_active_income + self.monthly_passive_income
    }

    /// Monthly income left after expenses, mortgage and investing
    pub fn monthly_net_cash_flow(&self) -> f64 {
        self.monthly_income() - self.monthly_expenses - self.monthly_mortgage - self.monthly_investment
    }

    pub fn annual_expenses(&self) -> f64 {
        self.monthly_expenses * 12.0
    }

    pub fn annual_investment(&self) -> f64 {
        self.monthly_investment * 12.0
    }

    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn emergency_fund_target(&self) -> f64 {
        self.monthly_expenses * EMERGENCY_FUND_MONTHS
    }

    /// Net worth at which the household counts as retirement-ready
    pub fn retirement_target(&self) -> f64 {
        self.annual_expenses() * RETIREMENT_EXPENSE_MULTIPLE
    }
}

/// Numeric profile fields addressable by scenario changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    HouseholdSize,
    MonthlyActiveIncome,
    MonthlyPassiveIncome,
    MonthlyExpenses,
    BankBalance,
    NetWorth,
    MonthlyInvestment,
    MonthlySavings,
    CurrentAge,
    RetirementAge,
    HorizonAge,
    CpfContributionPct,
    CpfBalance,
    ExistingLifeCover,
    MonthlyMortgage,
    Dependents,
}

impl ProfileField {
    pub const ALL: [ProfileField; 16] = [
        ProfileField::HouseholdSize,
        ProfileField::MonthlyActiveIncome,
        ProfileField::MonthlyPassiveIncome,
        ProfileField::MonthlyExpenses,
        ProfileField::BankBalance,
        ProfileField::NetWorth,
        ProfileField::MonthlyInvestment,
        ProfileField::MonthlySavings,
        ProfileField::CurrentAge,
        ProfileField::RetirementAge,
        ProfileField::HorizonAge,
        ProfileField::CpfContributionPct,
        ProfileField::CpfBalance,
        ProfileField::ExistingLifeCover,
        ProfileField::MonthlyMortgage,
        ProfileField::Dependents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::HouseholdSize => "household_size",
            ProfileField::MonthlyActiveIncome => "monthly_active_income",
            ProfileField::MonthlyPassiveIncome => "monthly_passive_income",
            ProfileField::MonthlyExpenses => "monthly_expenses",
            ProfileField::BankBalance => "bank_balance",
            ProfileField::NetWorth => "net_worth",
            ProfileField::MonthlyInvestment => "monthly_investment",
            ProfileField::MonthlySavings => "monthly_savings",
            ProfileField::CurrentAge => "current_age",
            ProfileField::RetirementAge => "retirement_age",
            ProfileField::HorizonAge => "horizon_age",
            ProfileField::CpfContributionPct => "cpf_contribution_pct",
            ProfileField::CpfBalance => "cpf_balance",
            ProfileField::ExistingLifeCover => "existing_life_cover",
            ProfileField::MonthlyMortgage => "monthly_mortgage",
            ProfileField::Dependents => "dependents",
        }
    }

    /// Whether the field is stored as a whole number
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ProfileField::HouseholdSize
                | ProfileField::CurrentAge
                | ProfileField::RetirementAge
                | ProfileField::HorizonAge
                | ProfileField::Dependents
        )
    }

    pub fn get(&self, profile: &Profile) -> f64 {
        match self {
            ProfileField::HouseholdSize => profile.household_size as f64,
            ProfileField::MonthlyActiveIncome => profile.monthly_active_income,
            ProfileField::MonthlyPassiveIncome => profile.monthly_passive_income,
            ProfileField::MonthlyExpenses => profile.monthly_expenses,
            ProfileField::BankBalance => profile.bank_balance,
            ProfileField::NetWorth => profile.net_worth,
            ProfileField::MonthlyInvestment => profile.monthly_investment,
            ProfileField::MonthlySavings => profile.monthly_savings,
            ProfileField::CurrentAge => profile.current_age as f64,
            ProfileField::RetirementAge => profile.retirement_age as f64,
            ProfileField::HorizonAge => profile.horizon_age as f64,
            ProfileField::CpfContributionPct => profile.cpf_contribution_pct,
            ProfileField::CpfBalance => profile.cpf_balance,
            ProfileField::ExistingLifeCover => profile.existing_life_cover,
            ProfileField::MonthlyMortgage => profile.monthly_mortgage,
            ProfileField::Dependents => profile.dependents as f64,
        }
    }

    /// Write a value back; integer fields are rounded and must stay non-negative
    pub fn set(&self, profile: &mut Profile, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ProjectionError::InvalidInput(format!(
                "{} would become {}",
                self.as_str(),
                value
            )));
        }

        let whole = || -> Result<u32> {
            let rounded = value.round();
            if rounded < 0.0 || rounded > u32::MAX as f64 {
                return Err(ProjectionError::InvalidInput(format!(
                    "{} would become {}",
                    self.as_str(),
                    rounded
                )));
            }
            Ok(rounded as u32)
        };

        match self {
            ProfileField::HouseholdSize => profile.household_size = whole()?,
            ProfileField::CurrentAge => profile.current_age = whole()?,
            ProfileField::RetirementAge => profile.retirement_age = whole()?,
            ProfileField::HorizonAge => profile.horizon_age = whole()?,
            ProfileField::MonthlyActiveIncome => profile.monthly_active_income = value,
            ProfileField::MonthlyPassiveIncome => profile.monthly_passive_income = value,
            ProfileField::MonthlyExpenses => profile.monthly_expenses = value,
            ProfileField::BankBalance => profile.bank_balance = value,
            ProfileField::NetWorth => profile.net_worth = value,
            ProfileField::MonthlyInvestment => profile.monthly_investment = value,
            ProfileField::MonthlySavings => profile.monthly_savings = value,
            ProfileField::CpfContributionPct => profile.cpf_contribution_pct = value,
            ProfileField::CpfBalance => profile.cpf_balance = value,
            ProfileField::ExistingLifeCover => profile.existing_life_cover = value,
            ProfileField::MonthlyMortgage => profile.monthly_mortgage = value,
            ProfileField::Dependents => profile.dependents = whole()?,
        }
        Ok(())
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        ProfileField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ProjectionError::Configuration(format!("unknown profile field '{}'", s)))
    }
}
