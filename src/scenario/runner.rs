//! Scenario runner for batch what-if projections
//!
//! Holds the rate model and catalog once, then projects a profile under the
//! baseline and every catalog scenario.

use super::applier::apply_scenario;
use super::catalog::ScenarioCatalog;
use super::definition::ScenarioDefinition;
use crate::assumptions::RateModel;
use crate::error::Result;
use crate::profile::Profile;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use log::info;
use rayon::prelude::*;
use std::path::Path;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let run = runner.run_catalog(&profile)?;
/// for scenario in &run.scenarios {
///     println!("{}: {:.0}", scenario.definition.name, scenario.result.summary().final_net_worth);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_rates: RateModel,
    catalog: ScenarioCatalog,
    config: ProjectionConfig,
}

/// One scenario's projection
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub definition: ScenarioDefinition,
    pub result: ProjectionResult,
}

/// Baseline plus every catalog scenario, in catalog order
#[derive(Debug, Clone)]
pub struct CatalogRun {
    pub baseline: ProjectionResult,
    pub scenarios: Vec<ScenarioRun>,
}

impl ScenarioRunner {
    /// Create runner with default rates and the built-in catalog
    pub fn new() -> Self {
        Self {
            base_rates: RateModel::default(),
            catalog: ScenarioCatalog::default(),
            config: ProjectionConfig::default(),
        }
    }

    /// Create runner with rates loaded from the default assumptions directory
    pub fn from_csv() -> Result<Self> {
        Ok(Self::new().with_rates(RateModel::from_csv()?))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self::new().with_rates(RateModel::from_csv_path(path)?))
    }

    pub fn with_rates(mut self, rates: RateModel) -> Self {
        self.base_rates = rates;
        self
    }

    pub fn with_catalog(mut self, catalog: ScenarioCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Projection settings shared by the baseline and every scenario;
    /// scenario events are appended to any events already configured
    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rates(&self) -> &RateModel {
        &self.base_rates
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project the profile as given
    pub fn run_baseline(&self, profile: &Profile) -> Result<ProjectionResult> {
        ProjectionEngine::new(self.base_rates.clone(), self.config.clone()).project(profile)
    }

    /// Project the profile under one scenario
    pub fn run_scenario(&self, profile: &Profile, definition: &ScenarioDefinition) -> Result<ScenarioRun> {
        let (perturbed, rates) = apply_scenario(profile, &self.base_rates, definition)?;
        let mut config = self.config.clone();
        config.events.extend(definition.events.iter().cloned());

        let result = ProjectionEngine::new(rates, config)
            .project(&perturbed)
            .map_err(|e| e.context(&format!("scenario '{}'", definition.id)))?;

        Ok(ScenarioRun {
            definition: definition.clone(),
            result,
        })
    }

    /// Baseline plus every catalog scenario, scenarios projected in parallel
    pub fn run_catalog(&self, profile: &Profile) -> Result<CatalogRun> {
        let baseline = self.run_baseline(profile)?;
        let scenarios = self
            .catalog
            .scenarios()
            .par_iter()
            .map(|definition| self.run_scenario(profile, definition))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "projected '{}' under {} scenarios over {} years",
            profile.client_id,
            scenarios.len(),
            self.config.horizon_years
        );
        Ok(CatalogRun { baseline, scenarios })
    }

    /// Same as [`run_catalog`](Self::run_catalog) on the calling thread
    pub fn run_catalog_sequential(&self, profile: &Profile) -> Result<CatalogRun> {
        let baseline = self.run_baseline(profile)?;
        let scenarios = self
            .catalog
            .scenarios()
            .iter()
            .map(|definition| self.run_scenario(profile, definition))
            .collect::<Result<Vec<_>>>()?;
        Ok(CatalogRun { baseline, scenarios })
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
