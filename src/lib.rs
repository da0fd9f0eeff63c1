//! Household Projection - deterministic multi-year financial projections for households
//!
//! This library provides:
//! - Year-by-year projection of income, expenses, bank balance, net worth and insurance need
//! - Configurable rate assumptions (inflation, income growth, investment and bank returns)
//! - What-if scenarios applied to a baseline profile and run in parallel
//! - Net-worth impact at fixed horizons and baseline recommendations

pub mod error;
pub mod profile;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod impact;
pub mod recommendations;
pub mod analysis;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use profile::Profile;
pub use assumptions::{RateModel, RiskTolerance};
pub use projection::{simulate, ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionYear};
pub use scenario::{apply_scenario, ScenarioCatalog, ScenarioDefinition, ScenarioRunner};
pub use impact::{compute_impact, ImpactSummary, DEFAULT_HORIZONS};
pub use recommendations::{coverage_needs, derive_recommendations, CoverageBreakdown, Recommendations};
pub use analysis::{baseline_analysis, baseline_analysis_with, scenario_report, BaselineAnalysis, ScenarioReport};
