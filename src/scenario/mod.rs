//! What-if scenarios: definitions, the catalog, and the batch runner

mod definition;
pub mod applier;
pub mod catalog;
pub mod runner;

pub use applier::apply_scenario;
pub use catalog::{default_scenarios, ScenarioCatalog, DEFAULT_CATALOG_PATH};
pub use definition::{ChangeOperator, FieldChange, ScenarioDefinition, ScenarioField};
pub use runner::{CatalogRun, ScenarioRun, ScenarioRunner};
