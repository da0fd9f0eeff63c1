//! Caller-facing response shapes: baseline analysis and scenario report

use crate::error::Result;
use crate::impact::{compute_impact, ImpactSummary, DEFAULT_HORIZONS};
use crate::profile::Profile;
use crate::projection::{find_year, LifeEvent, ProjectionResult, ProjectionYear};
use crate::recommendations::{
    coverage_needs, derive_recommendations_with, savings_rate_percent, CoverageBreakdown, CoverageBuffer,
    NarrativeRules, Recommendations, DEFAULT_COVERAGE_YEARS,
};
use crate::scenario::{CatalogRun, FieldChange, ScenarioRunner};
use serde::{Deserialize, Serialize};

/// Headline figures for the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub current_age: u32,
    pub retirement_age: u32,
    pub years_to_retirement: u32,
    pub current_net_worth: f64,
    #[serde(rename = "projectedNetWorth_10")]
    pub projected_net_worth_10: Option<f64>,
    #[serde(rename = "projectedNetWorth_20")]
    pub projected_net_worth_20: Option<f64>,
    #[serde(rename = "projectedNetWorth_50")]
    pub projected_net_worth_50: Option<f64>,
    pub first_million_year: Option<u32>,
    pub retirement_ready_year: Option<u32>,
    pub retirement_target: f64,
    pub shortfall_years: usize,
    pub savings_rate: u32,
    /// Income minus expenses, mortgage and investment, per month
    pub monthly_net_cash_flow: f64,
}

impl AnalysisSummary {
    pub fn new(profile: &Profile, result: &ProjectionResult) -> Self {
        let summary = result.summary();
        Self {
            current_age: profile.current_age,
            retirement_age: profile.retirement_age,
            years_to_retirement: profile.years_to_retirement(),
            current_net_worth: profile.net_worth,
            projected_net_worth_10: result.net_worth_at(10),
            projected_net_worth_20: result.net_worth_at(20),
            projected_net_worth_50: result.net_worth_at(50),
            first_million_year: summary.first_million_year,
            retirement_ready_year: summary.retirement_ready_year,
            retirement_target: result.retirement_target,
            shortfall_years: summary.shortfall_years,
            savings_rate: savings_rate_percent(profile),
            monthly_net_cash_flow: profile.monthly_net_cash_flow().round(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineAnalysis {
    pub projections: Vec<ProjectionYear>,
    pub recommendations: Recommendations,
    /// Itemized life cover, shown next to the 10x income figure
    pub coverage: CoverageBreakdown,
    pub summary: AnalysisSummary,
}

impl BaselineAnalysis {
    pub fn from_result(profile: &Profile, result: ProjectionResult) -> Result<Self> {
        Self::from_result_with(profile, result, &NarrativeRules::default())
    }

    pub fn from_result_with(profile: &Profile, result: ProjectionResult, rules: &NarrativeRules) -> Result<Self> {
        let recommendations = derive_recommendations_with(&result.years, profile, rules)?;
        let coverage = coverage_needs(profile, &CoverageBuffer::None, DEFAULT_COVERAGE_YEARS);
        let summary = AnalysisSummary::new(profile, &result);
        Ok(Self {
            projections: result.years,
            recommendations,
            coverage,
            summary,
        })
    }
}

/// Project the profile and summarize the baseline
pub fn baseline_analysis(runner: &ScenarioRunner, profile: &Profile) -> Result<BaselineAnalysis> {
    baseline_analysis_with(runner, profile, &NarrativeRules::default())
}

/// Same as [`baseline_analysis`] with a custom narrative table
pub fn baseline_analysis_with(
    runner: &ScenarioRunner,
    profile: &Profile,
    rules: &NarrativeRules,
) -> Result<BaselineAnalysis> {
    let result = runner.run_baseline(profile)?;
    BaselineAnalysis::from_result_with(profile, result, rules)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projections {
    pub projections: Vec<ProjectionYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub changes: Vec<FieldChange>,
    pub events: Vec<LifeEvent>,
    /// Deltas at the requested horizons
    pub impacts: Vec<ImpactSummary>,
    /// Deltas at the standard chart horizons, when the projection reaches them
    pub impact_10yr: Option<f64>,
    pub impact_20yr: Option<f64>,
    pub impact_50yr: Option<f64>,
    /// Cover for the baseline household plus this scenario's buffer
    pub coverage: CoverageBreakdown,
    pub analysis: Projections,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenarios: Vec<ScenarioEntry>,
    pub baseline: Projections,
}

impl ScenarioReport {
    pub fn from_run(profile: &Profile, run: CatalogRun, horizons: &[u32]) -> Result<Self> {
        let baseline = run.baseline.years;
        let scenarios = run
            .scenarios
            .into_iter()
            .map(|scenario| {
                let years = scenario.result.years;
                let impacts = compute_impact(&baseline, &years, horizons)?;
                let standard = |horizon: u32| -> Option<f64> {
                    let base = find_year(&baseline, horizon)?;
                    let alt = find_year(&years, horizon)?;
                    Some(alt.net_worth - base.net_worth)
                };
                let [h10, h20, h50] = DEFAULT_HORIZONS;
                let definition = scenario.definition;
                let coverage = coverage_needs(profile, &definition.coverage_buffer, DEFAULT_COVERAGE_YEARS);
                Ok(ScenarioEntry {
                    impact_10yr: standard(h10),
                    impact_20yr: standard(h20),
                    impact_50yr: standard(h50),
                    id: definition.id,
                    name: definition.name,
                    description: definition.description,
                    changes: definition.changes,
                    events: definition.events,
                    impacts,
                    coverage,
                    analysis: Projections { projections: years },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            scenarios,
            baseline: Projections { projections: baseline },
        })
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioEntry> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

/// Run every catalog scenario and compare each against the baseline
pub fn scenario_report(runner: &ScenarioRunner, profile: &Profile, horizons: &[u32]) -> Result<ScenarioReport> {
    let run = runner.run_catalog(profile)?;
    ScenarioReport::from_run(profile, run, horizons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;
    use crate::projection::ProjectionConfig;

    #[test]
    fn test_baseline_summary_fields() {
        let runner = ScenarioRunner::new();
        let profile = Profile::default();
        let analysis = baseline_analysis(&runner, &profile).unwrap();

        assert_eq!(analysis.projections.len(), 51);
        assert_eq!(analysis.summary.projected_net_worth_10, Some(analysis.projections[10].net_worth));
        assert_eq!(analysis.summary.savings_rate, 13);
        assert_eq!(analysis.summary.monthly_net_cash_flow, 2000.0);

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["summary"]["projectedNetWorth_50"].is_number());
        assert!(json["recommendations"]["points"].is_array());
        assert_eq!(json["projections"][0]["age"], 34);
    }

    #[test]
    fn test_short_projection_leaves_far_horizons_empty() {
        let runner = ScenarioRunner::new().with_config(ProjectionConfig::with_horizon(15));
        let analysis = baseline_analysis(&runner, &Profile::default()).unwrap();
        assert!(analysis.summary.projected_net_worth_10.is_some());
        assert!(analysis.summary.projected_net_worth_20.is_none());

        let report = scenario_report(&runner, &Profile::default(), &[5, 10]).unwrap();
        assert!(report.scenarios.iter().all(|s| s.impact_50yr.is_none()));
        assert!(matches!(
            scenario_report(&runner, &Profile::default(), &DEFAULT_HORIZONS),
            Err(ProjectionError::HorizonNotFound { horizon: 20, .. })
        ));
    }

    #[test]
    fn test_report_shape() {
        let runner = ScenarioRunner::new();
        let report = scenario_report(&runner, &Profile::default(), &DEFAULT_HORIZONS).unwrap();
        assert_eq!(report.scenarios.len(), 6);

        let career = report.get("career_growth").unwrap();
        assert_eq!(career.impacts.len(), 3);
        assert_eq!(career.impact_10yr, Some(career.impacts[0].net_worth_delta));
        assert!(career.impact_50yr.unwrap() > 0.0);

        let job_loss = report.get("job_loss").unwrap();
        assert!(job_loss.impact_10yr.unwrap() < 0.0);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["scenarios"][0]["analysis"]["projections"].is_array());
        assert!(json["scenarios"][0]["coverage"]["totalCoverage"].is_number());
        assert!(json["baseline"]["projections"].is_array());
    }

    #[test]
    fn test_mortgage_lowers_monthly_net_cash_flow() {
        let runner = ScenarioRunner::new();
        let profile = Profile {
            monthly_mortgage: 1_500.0,
            ..Default::default()
        };
        let analysis = baseline_analysis(&runner, &profile).unwrap();
        assert_eq!(analysis.summary.monthly_net_cash_flow, 500.0);
        assert_eq!(analysis.coverage.outstanding_mortgage, 270_000.0);
    }

    #[test]
    fn test_coverage_sits_beside_insurance_need() {
        let runner = ScenarioRunner::new();
        let profile = Profile {
            dependents: 2,
            ..Default::default()
        };
        let analysis = baseline_analysis(&runner, &profile).unwrap();
        assert_eq!(analysis.recommendations.recommended_life_cover, analysis.projections[0].insurance_need);
        assert_eq!(analysis.coverage.education_fund, 300_000.0);
        assert_eq!(analysis.coverage.scenario_buffer, 0.0);
    }

    #[test]
    fn test_scenario_coverage_adds_buffer() {
        let runner = ScenarioRunner::new();
        let profile = Profile::default();
        let report = scenario_report(&runner, &profile, &DEFAULT_HORIZONS).unwrap();
        let annual_expenses = profile.annual_expenses();

        let job_loss = report.get("job_loss").unwrap();
        assert_eq!(job_loss.coverage.scenario_buffer, (3.0 * annual_expenses).round());

        let baby = report.get("new_dependent").unwrap();
        assert_eq!(baby.coverage.scenario_buffer, (150_000.0 + 5.0 * annual_expenses).round());
        assert!(baby.coverage.total_coverage > report.get("career_growth").unwrap().coverage.total_coverage);
    }

    #[test]
    fn test_custom_rules_drive_points() {
        let runner = ScenarioRunner::new();
        let rules = NarrativeRules::new(Vec::new()).unwrap();
        let analysis = baseline_analysis_with(&runner, &Profile::default(), &rules).unwrap();
        assert!(analysis.recommendations.narrative_points.is_empty());
    }
}
