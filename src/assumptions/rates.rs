//! Macro rate assumptions driving every projection

use super::loader::{self, LoadedRates};
use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_EXPENSE_INFLATION_RATE: f64 = 0.017;
pub const DEFAULT_ACTIVE_INCOME_GROWTH_RATE: f64 = 0.05;
pub const DEFAULT_PASSIVE_INCOME_GROWTH_RATE: f64 = 0.02;
pub const DEFAULT_INVESTMENT_RETURN_RATE: f64 = 0.05;
pub const DEFAULT_BANK_GROWTH_RATE: f64 = 0.06;
pub const DEFAULT_CPF_RETURN_RATE: f64 = 0.025;

/// Annual rates, all fractional (0.065 = 6.5%)
///
/// Rates may be zero or negative (a pay cut is a negative growth rate),
/// but `1 + rate` must stay positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateModel {
    pub expense_inflation_rate: f64,
    pub active_income_growth_rate: f64,
    pub passive_income_growth_rate: f64,
    pub investment_return_rate: f64,
    pub bank_growth_rate: f64,

    /// Return credited on the CPF balance (extended model only)
    pub cpf_return_rate: f64,
}

impl Default for RateModel {
    fn default() -> Self {
        Self {
            expense_inflation_rate: DEFAULT_EXPENSE_INFLATION_RATE,
            active_income_growth_rate: DEFAULT_ACTIVE_INCOME_GROWTH_RATE,
            passive_income_growth_rate: DEFAULT_PASSIVE_INCOME_GROWTH_RATE,
            investment_return_rate: DEFAULT_INVESTMENT_RETURN_RATE,
            bank_growth_rate: DEFAULT_BANK_GROWTH_RATE,
            cpf_return_rate: DEFAULT_CPF_RETURN_RATE,
        }
    }
}

impl RateModel {
    /// All rates zero: no growth, no inflation, no returns
    pub fn flat() -> Self {
        Self {
            expense_inflation_rate: 0.0,
            active_income_growth_rate: 0.0,
            passive_income_growth_rate: 0.0,
            investment_return_rate: 0.0,
            bank_growth_rate: 0.0,
            cpf_return_rate: 0.0,
        }
    }

    /// Load overrides from `rate_model.csv` in the default assumptions directory
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load overrides from `rate_model.csv` in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedRates::load_from(path)?;
        Self::from_loaded(&loaded)
    }

    /// Apply loaded overrides on top of the defaults
    pub fn from_loaded(loaded: &LoadedRates) -> Result<Self> {
        let mut rates = Self::default();
        for (name, value) in &loaded.overrides {
            let parameter: RateParameter = name.parse()?;
            parameter.set(&mut rates, *value);
        }
        rates.validate()?;
        Ok(rates)
    }

    /// Replace the investment return with the preset for a risk profile
    pub fn with_risk_tolerance(mut self, risk: RiskTolerance) -> Self {
        self.investment_return_rate = risk.investment_return_rate();
        self
    }

    pub fn validate(&self) -> Result<()> {
        for parameter in RateParameter::ALL {
            let value = parameter.get(self);
            if !value.is_finite() || value <= -1.0 {
                return Err(ProjectionError::InvalidInput(format!(
                    "{} must be a finite rate above -1, got {}",
                    parameter, value
                )));
            }
        }
        Ok(())
    }
}

/// Investment risk appetite, mapped to an expected annual return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl RiskTolerance {
    pub fn investment_return_rate(&self) -> f64 {
        match self {
            RiskTolerance::Conservative => 0.04,
            RiskTolerance::Balanced => 0.05,
            RiskTolerance::Aggressive => 0.07,
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "balanced" => Ok(RiskTolerance::Balanced),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(ProjectionError::InvalidInput(format!(
                "unknown risk tolerance '{}'",
                other
            ))),
        }
    }
}

/// Named rate parameters, addressable from CSV overrides and scenario changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateParameter {
    ExpenseInflation,
    ActiveIncomeGrowth,
    PassiveIncomeGrowth,
    InvestmentReturn,
    BankGrowth,
    CpfReturn,
}

impl RateParameter {
    pub const ALL: [RateParameter; 6] = [
        RateParameter::ExpenseInflation,
        RateParameter::ActiveIncomeGrowth,
        RateParameter::PassiveIncomeGrowth,
        RateParameter::InvestmentReturn,
        RateParameter::BankGrowth,
        RateParameter::CpfReturn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RateParameter::ExpenseInflation => "expense_inflation_rate",
            RateParameter::ActiveIncomeGrowth => "active_income_growth_rate",
            RateParameter::PassiveIncomeGrowth => "passive_income_growth_rate",
            RateParameter::InvestmentReturn => "investment_return_rate",
            RateParameter::BankGrowth => "bank_growth_rate",
            RateParameter::CpfReturn => "cpf_return_rate",
        }
    }

    pub fn get(&self, rates: &RateModel) -> f64 {
        match self {
            RateParameter::ExpenseInflation => rates.expense_inflation_rate,
            RateParameter::ActiveIncomeGrowth => rates.active_income_growth_rate,
            RateParameter::PassiveIncomeGrowth => rates.passive_income_growth_rate,
            RateParameter::InvestmentReturn => rates.investment_return_rate,
            RateParameter::BankGrowth => rates.bank_growth_rate,
            RateParameter::CpfReturn => rates.cpf_return_rate,
        }
    }

    pub fn set(&self, rates: &mut RateModel, value: f64) {
        match self {
            RateParameter::ExpenseInflation => rates.expense_inflation_rate = value,
            RateParameter::ActiveIncomeGrowth => rates.active_income_growth_rate = value,
            RateParameter::PassiveIncomeGrowth => rates.passive_income_growth_rate = value,
            RateParameter::InvestmentReturn => rates.investment_return_rate = value,
            RateParameter::BankGrowth => rates.bank_growth_rate = value,
            RateParameter::CpfReturn => rates.cpf_return_rate = value,
        }
    }
}

impl fmt::Display for RateParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateParameter {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        RateParameter::ALL
            .iter()
            .copied()
            .find(|parameter| parameter.as_str() == s)
            .ok_or_else(|| ProjectionError::Configuration(format!("unknown rate parameter '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_assumptions() {
        let rates = RateModel::default();
        assert_eq!(rates.expense_inflation_rate, 0.017);
        assert_eq!(rates.active_income_growth_rate, 0.05);
        assert_eq!(rates.bank_growth_rate, 0.06);
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_negative_growth_allowed() {
        let rates = RateModel {
            active_income_growth_rate: -0.15,
            ..Default::default()
        };
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_rate_at_minus_one_rejected() {
        let rates = RateModel {
            bank_growth_rate: -1.0,
            ..Default::default()
        };
        assert!(matches!(rates.validate(), Err(ProjectionError::InvalidInput(_))));
    }

    #[test]
    fn test_risk_tolerance_presets() {
        let rates = RateModel::default().with_risk_tolerance(RiskTolerance::Aggressive);
        assert_eq!(rates.investment_return_rate, 0.07);
        assert_eq!("Conservative".parse::<RiskTolerance>().unwrap(), RiskTolerance::Conservative);
        assert!("reckless".parse::<RiskTolerance>().is_err());
    }

    #[test]
    fn test_unknown_override_is_configuration_error() {
        let loaded = LoadedRates {
            overrides: vec![("mortgage_rate".to_string(), 0.03)],
        };
        assert!(matches!(
            RateModel::from_loaded(&loaded),
            Err(ProjectionError::Configuration(_))
        ));
    }

    #[test]
    fn test_overrides_apply_on_defaults() {
        let loaded = LoadedRates {
            overrides: vec![("bank_growth_rate".to_string(), 0.03)],
        };
        let rates = RateModel::from_loaded(&loaded).unwrap();
        assert_eq!(rates.bank_growth_rate, 0.03);
        assert_eq!(rates.expense_inflation_rate, DEFAULT_EXPENSE_INFLATION_RATE);
    }

    #[test]
    fn test_risk_tolerance_cli_values() {
        let names: Vec<String> = <RiskTolerance as clap::ValueEnum>::value_variants()
            .iter()
            .filter_map(|v| clap::ValueEnum::to_possible_value(v).map(|p| p.get_name().to_string()))
            .collect();
        assert_eq!(names, vec!["conservative", "balanced", "aggressive"]);
        assert_eq!(
            <RiskTolerance as clap::ValueEnum>::from_str("aggressive", false),
            Ok(RiskTolerance::Aggressive)
        );
    }
}
