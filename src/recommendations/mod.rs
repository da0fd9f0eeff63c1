//! Recommendations derived from a baseline projection

mod coverage;
mod rules;

pub use coverage::{
    coverage_needs, CoverageBreakdown, CoverageBuffer, COVERAGE_ROUNDING, DEFAULT_COVERAGE_YEARS,
    EDUCATION_FUND_PER_DEPENDENT, MIN_COVERAGE,
};

pub use rules::{
    format_amount, Condition, Metric, MetricValues, NarrativeRule, NarrativeRules, DEFAULT_RULES_PATH, PLACEHOLDERS,
    TARGET_SAVINGS_RATE_PERCENT,
};

use crate::error::{ProjectionError, Result};
use crate::profile::Profile;
use crate::projection::{find_year, ProjectionSummary, ProjectionYear};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Year-0 insurance need
    #[serde(rename = "lifeCover")]
    pub recommended_life_cover: f64,

    #[serde(rename = "emergencyFund")]
    pub emergency_fund_target: f64,

    #[serde(rename = "savingsRate")]
    pub savings_rate_percent: u32,

    #[serde(rename = "points")]
    pub narrative_points: Vec<String>,
}

/// Monthly investment as a whole percentage of active plus passive income,
/// clamped to [0, 100]; zero when there is no income
pub fn savings_rate_percent(profile: &Profile) -> u32 {
    let income = profile.monthly_income();
    if income <= 0.0 {
        return 0;
    }
    (100.0 * profile.monthly_investment / income).round().clamp(0.0, 100.0) as u32
}

/// Derive recommendations with the default narrative table
pub fn derive_recommendations(baseline: &[ProjectionYear], profile: &Profile) -> Result<Recommendations> {
    derive_recommendations_with(baseline, profile, &NarrativeRules::default())
}

pub fn derive_recommendations_with(
    baseline: &[ProjectionYear],
    profile: &Profile,
    rules: &NarrativeRules,
) -> Result<Recommendations> {
    let first = find_year(baseline, 0).ok_or_else(|| {
        ProjectionError::InvalidInput("baseline projection has no year 0".to_string())
    })?;
    let summary = ProjectionSummary::from_years(baseline, profile.retirement_target());

    let values = MetricValues {
        savings_rate_percent: savings_rate_percent(profile),
        recommended_life_cover: first.insurance_need,
        existing_life_cover: profile.existing_life_cover,
        emergency_fund_target: profile.emergency_fund_target(),
        liquid_savings: profile.bank_balance,
        first_million_year: summary.first_million_year,
        retirement_ready_year: summary.retirement_ready_year,
        years_to_retirement: profile.years_to_retirement(),
        shortfall_years: summary.shortfall_years,
    };

    Ok(Recommendations {
        recommended_life_cover: values.recommended_life_cover,
        emergency_fund_target: values.emergency_fund_target,
        savings_rate_percent: values.savings_rate_percent,
        narrative_points: rules.evaluate(&values),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::RateModel;
    use crate::projection::simulate;

    #[test]
    fn test_targets_from_profile_and_year_zero() {
        let profile = Profile {
            monthly_active_income: 8000.0,
            monthly_passive_income: 0.0,
            monthly_expenses: 5000.0,
            monthly_investment: 1000.0,
            ..Default::default()
        };
        let baseline = simulate(&profile, &RateModel::default(), 50).unwrap();
        let recs = derive_recommendations(&baseline, &profile).unwrap();

        assert_eq!(recs.recommended_life_cover, 960_000.0);
        assert_eq!(recs.emergency_fund_target, 30_000.0);
        // 1000 / 8000 = 12.5% rounds half away from zero
        assert_eq!(recs.savings_rate_percent, 13);
        assert!(recs.narrative_points[0].contains("from 13% to 20%"));
    }

    #[test]
    fn test_savings_rate_edges() {
        let no_income = Profile {
            monthly_active_income: 0.0,
            monthly_passive_income: 0.0,
            ..Default::default()
        };
        assert_eq!(savings_rate_percent(&no_income), 0);

        let over_invested = Profile {
            monthly_active_income: 1000.0,
            monthly_investment: 5000.0,
            ..Default::default()
        };
        assert_eq!(savings_rate_percent(&over_invested), 100);

        let with_passive = Profile {
            monthly_active_income: 3000.0,
            monthly_passive_income: 1000.0,
            monthly_investment: 1000.0,
            ..Default::default()
        };
        assert_eq!(savings_rate_percent(&with_passive), 25);
    }

    #[test]
    fn test_empty_baseline_rejected() {
        let result = derive_recommendations(&[], &Profile::default());
        assert!(matches!(result, Err(ProjectionError::InvalidInput(_))));
    }

    #[test]
    fn test_json_field_names() {
        let recs = Recommendations {
            recommended_life_cover: 1.0,
            emergency_fund_target: 2.0,
            savings_rate_percent: 3,
            narrative_points: vec!["p".to_string()],
        };
        let json = serde_json::to_value(&recs).unwrap();
        assert_eq!(json["lifeCover"], 1.0);
        assert_eq!(json["emergencyFund"], 2.0);
        assert_eq!(json["savingsRate"], 3);
        assert_eq!(json["points"][0], "p");
    }
}
