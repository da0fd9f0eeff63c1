//! Net-worth impact of a scenario against the baseline at fixed horizons

use crate::error::{ProjectionError, Result};
use crate::projection::{find_year, ProjectionYear};
use serde::{Deserialize, Serialize};

/// Horizons (in years) reported when the caller doesn't pick their own
pub const DEFAULT_HORIZONS: [u32; 3] = [10, 20, 50];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub horizon_years: u32,
    /// Scenario minus baseline; negative means the scenario is worse off
    pub net_worth_delta: f64,
}

/// Net-worth delta at each horizon, in the order requested
pub fn compute_impact(
    baseline: &[ProjectionYear],
    scenario: &[ProjectionYear],
    horizons: &[u32],
) -> Result<Vec<ImpactSummary>> {
    horizons
        .iter()
        .map(|&horizon| {
            let base = net_worth_at(baseline, horizon)?;
            let alt = net_worth_at(scenario, horizon)?;
            Ok(ImpactSummary {
                horizon_years: horizon,
                net_worth_delta: alt - base,
            })
        })
        .collect()
}

fn net_worth_at(years: &[ProjectionYear], horizon: u32) -> Result<f64> {
    find_year(years, horizon)
        .map(|row| row.net_worth)
        .ok_or(ProjectionError::HorizonNotFound {
            horizon,
            available: years.len(),
        })
}
