//! Scenario definitions: named bundles of field changes and life events

use crate::assumptions::{RateModel, RateParameter};
use crate::error::{ProjectionError, Result};
use crate::profile::{Profile, ProfileField};
use crate::projection::LifeEvent;
use crate::recommendations::CoverageBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a change combines with the current field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperator {
    /// `field *= value`
    Scale,
    /// `field += value`
    Offset,
    /// `field = value`
    Set,
}

impl ChangeOperator {
    pub fn apply(&self, current: f64, value: f64) -> f64 {
        match self {
            ChangeOperator::Scale => current * value,
            ChangeOperator::Offset => current + value,
            ChangeOperator::Set => value,
        }
    }
}

/// Any numeric input a scenario can perturb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioField {
    Profile(ProfileField),
    Rate(RateParameter),
}

impl ScenarioField {
    pub fn get(&self, profile: &Profile, rates: &RateModel) -> f64 {
        match self {
            ScenarioField::Profile(field) => field.get(profile),
            ScenarioField::Rate(parameter) => parameter.get(rates),
        }
    }

    pub fn set(&self, profile: &mut Profile, rates: &mut RateModel, value: f64) -> Result<()> {
        match self {
            ScenarioField::Profile(field) => field.set(profile, value),
            ScenarioField::Rate(parameter) => {
                parameter.set(rates, value);
                Ok(())
            }
        }
    }
}

impl fmt::Display for ScenarioField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioField::Profile(field) => fmt::Display::fmt(field, f),
            ScenarioField::Rate(parameter) => fmt::Display::fmt(parameter, f),
        }
    }
}

impl FromStr for ScenarioField {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(field) = s.parse::<ProfileField>() {
            return Ok(ScenarioField::Profile(field));
        }
        if let Ok(parameter) = s.parse::<RateParameter>() {
            return Ok(ScenarioField::Rate(parameter));
        }
        Err(ProjectionError::Configuration(format!("unknown scenario field '{}'", s)))
    }
}

/// One `(field, operator, value)` change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub op: ChangeOperator,
    pub value: f64,
}

impl FieldChange {
    pub fn scale(field: &str, value: f64) -> Self {
        Self { field: field.to_string(), op: ChangeOperator::Scale, value }
    }

    pub fn offset(field: &str, value: f64) -> Self {
        Self { field: field.to_string(), op: ChangeOperator::Offset, value }
    }

    pub fn set(field: &str, value: f64) -> Self {
        Self { field: field.to_string(), op: ChangeOperator::Set, value }
    }

    /// Resolve the field name against the known profile and rate fields
    pub fn target(&self) -> Result<ScenarioField> {
        self.field.parse()
    }
}

/// A named what-if: ordered field changes plus life events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub changes: Vec<FieldChange>,
    #[serde(default)]
    pub events: Vec<LifeEvent>,
    /// Extra life cover the scenario calls for
    #[serde(default)]
    pub coverage_buffer: CoverageBuffer,
}

impl ScenarioDefinition {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            changes: Vec::new(),
            events: Vec::new(),
            coverage_buffer: CoverageBuffer::None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_change(mut self, change: FieldChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_event(mut self, event: LifeEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_coverage_buffer(mut self, buffer: CoverageBuffer) -> Self {
        self.coverage_buffer = buffer;
        self
    }

    /// Every field must resolve and every value and event must be well formed
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ProjectionError::Configuration("scenario id must not be empty".to_string()));
        }
        for change in &self.changes {
            change.target().map_err(|e| e.context(&format!("scenario '{}'", self.id)))?;
            if !change.value.is_finite() {
                return Err(ProjectionError::Configuration(format!(
                    "scenario '{}': change to {} has non-finite value",
                    self.id, change.field
                )));
            }
        }
        for event in &self.events {
            event
                .validate()
                .map_err(|e| ProjectionError::Configuration(format!("scenario '{}': {}", self.id, e)))?;
        }
        if !self.coverage_buffer.is_valid() {
            return Err(ProjectionError::Configuration(format!(
                "scenario '{}': coverage buffer must be finite and non-negative",
                self.id
            )));
        }
        Ok(())
    }
}
