//! Scenario catalog: the validated list of what-ifs a report runs
//!
//! The built-in catalog holds the six standard household scenarios; a JSON
//! file of the same shape can replace it.

use super::definition::{FieldChange, ScenarioDefinition};
use crate::error::{ProjectionError, Result};
use crate::projection::LifeEvent;
use crate::recommendations::CoverageBuffer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default path to the scenario catalog
pub const DEFAULT_CATALOG_PATH: &str = "data/scenarios/catalog.json";

/// Ordered, validated set of scenario definitions with unique ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    scenarios: Vec<ScenarioDefinition>,
}

impl ScenarioCatalog {
    /// Build a catalog, rejecting invalid definitions and duplicate ids
    pub fn new(scenarios: Vec<ScenarioDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for definition in &scenarios {
            definition.validate()?;
            if !seen.insert(definition.id.as_str()) {
                return Err(ProjectionError::Configuration(format!(
                    "duplicate scenario id '{}'",
                    definition.id
                )));
            }
        }
        Ok(Self { scenarios })
    }

    /// Load the catalog from the default JSON path
    pub fn from_json() -> Result<Self> {
        Self::from_json_path(Path::new(DEFAULT_CATALOG_PATH))
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let raw: ScenarioCatalog = serde_json::from_reader(reader)?;
        Self::new(raw.scenarios)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: ScenarioCatalog = serde_json::from_str(json)?;
        Self::new(raw.scenarios)
    }

    pub fn scenarios(&self) -> &[ScenarioDefinition] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioDefinition> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Keep only the scenarios whose ids are listed, in catalog order
    pub fn select(&self, ids: &[String]) -> Result<Self> {
        if let Some(missing) = ids.iter().find(|id| self.get(id).is_none()) {
            return Err(ProjectionError::Configuration(format!("unknown scenario '{}'", missing)));
        }
        Ok(Self {
            scenarios: self
                .scenarios
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect(),
        })
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self {
            scenarios: default_scenarios(),
        }
    }
}

/// The six standard household scenarios
pub fn default_scenarios() -> Vec<ScenarioDefinition> {
    vec![
        ScenarioDefinition::new("career_growth", "Career Growth")
            .with_description("Promotion with 30% salary increase and some lifestyle inflation")
            .with_change(FieldChange::scale("monthly_active_income", 1.3))
            .with_change(FieldChange::scale("monthly_investment", 1.6))
            .with_change(FieldChange::scale("monthly_expenses", 1.15)),
        ScenarioDefinition::new("job_loss", "Job Loss")
            .with_description("Complete unemployment, living off savings")
            .with_change(FieldChange::scale("monthly_active_income", 0.0))
            .with_change(FieldChange::scale("monthly_investment", 0.0))
            .with_coverage_buffer(CoverageBuffer::ExpenseYears { years: 3.0 }),
        ScenarioDefinition::new("medical", "Medical Emergency")
            .with_description("$70K medical expense, 40% higher ongoing costs")
            .with_change(FieldChange::scale("monthly_expenses", 1.4))
            .with_change(FieldChange::scale("monthly_investment", 0.0))
            .with_event(LifeEvent::LumpSumWithdrawal { year: 0, amount: 70_000.0 })
            .with_coverage_buffer(CoverageBuffer::Amount { amount: 200_000.0 }),
        ScenarioDefinition::new("new_dependent", "New Baby")
            .with_description("New child, higher expenses and reduced investing")
            .with_change(FieldChange::offset("household_size", 1.0))
            .with_change(FieldChange::offset("dependents", 1.0))
            .with_change(FieldChange::scale("monthly_expenses", 1.35))
            .with_change(FieldChange::scale("monthly_investment", 0.6))
            .with_event(LifeEvent::LumpSumWithdrawal { year: 0, amount: 15_000.0 })
            .with_coverage_buffer(CoverageBuffer::NewDependent { expense_years: 5.0 }),
        ScenarioDefinition::new("aggressive_savings", "FIRE Plan")
            .with_description("Cut expenses 30%, invest 2.5x at an aggressive 7% return")
            .with_change(FieldChange::scale("monthly_expenses", 0.7))
            .with_change(FieldChange::scale("monthly_investment", 2.5))
            .with_change(FieldChange::set("investment_return_rate", 0.07)),
        ScenarioDefinition::new("recession", "Recession")
            .with_description("Economic downturn: pay cut, higher costs, portfolio loss")
            .with_change(FieldChange::scale("monthly_active_income", 0.85))
            .with_change(FieldChange::scale("monthly_expenses", 1.1))
            .with_change(FieldChange::scale("monthly_investment", 0.5))
            .with_change(FieldChange::scale("bank_balance", 0.8))
            .with_change(FieldChange::scale("net_worth", 0.8))
            .with_change(FieldChange::set("investment_return_rate", 0.04))
            .with_coverage_buffer(CoverageBuffer::ExpenseYears { years: 2.0 }),
    ]
}
