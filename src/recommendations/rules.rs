//! Threshold table turning baseline metrics into narrative guidance

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Savings rate the default table treats as healthy
pub const TARGET_SAVINGS_RATE_PERCENT: f64 = 20.0;

/// Default path to the narrative rule table
pub const DEFAULT_RULES_PATH: &str = "data/rules/narrative_rules.json";

/// Placeholders a message template may reference
pub const PLACEHOLDERS: [&str; 11] = [
    "savings_rate",
    "life_cover",
    "existing_cover",
    "coverage_gap",
    "emergency_fund",
    "liquid_savings",
    "emergency_gap",
    "first_million_year",
    "retirement_ready_year",
    "years_to_retirement",
    "shortfall_years",
];

/// Baseline figure a rule tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SavingsRatePercent,
    /// Recommended cover minus cover already held
    LifeCoverGap,
    /// Emergency-fund target minus the current bank balance
    EmergencyFundGap,
    LiquidSavings,
    FirstMillionYear,
    RetirementReadyYear,
    /// Years to retirement minus the retirement-ready year
    RetirementReadyMargin,
    ShortfallYears,
}

/// When a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Below(f64),
    AtLeast(f64),
    Above(f64),
    AtMost(f64),
    /// The metric has no value (e.g. a milestone never reached)
    Missing,
}

impl Condition {
    pub fn matches(&self, value: Option<f64>) -> bool {
        match (self, value) {
            (Condition::Missing, value) => value.is_none(),
            (_, None) => false,
            (Condition::Below(t), Some(v)) => v < *t,
            (Condition::AtLeast(t), Some(v)) => v >= *t,
            (Condition::Above(t), Some(v)) => v > *t,
            (Condition::AtMost(t), Some(v)) => v <= *t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRule {
    pub metric: Metric,
    pub when: Condition,
    /// Template with `{placeholder}` slots
    pub message: String,
}

impl NarrativeRule {
    pub fn new(metric: Metric, when: Condition, message: &str) -> Self {
        Self {
            metric,
            when,
            message: message.to_string(),
        }
    }

    /// Every `{...}` slot must name a known placeholder
    pub fn validate(&self) -> Result<()> {
        let mut rest = self.message.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                ProjectionError::Configuration(format!("unclosed placeholder in '{}'", self.message))
            })?;
            let name = &after[..close];
            if !PLACEHOLDERS.contains(&name) {
                return Err(ProjectionError::Configuration(format!(
                    "unknown placeholder '{{{}}}' in '{}'",
                    name, self.message
                )));
            }
            rest = &after[close + 1..];
        }
        Ok(())
    }
}

/// Metric values and placeholder text for one baseline
#[derive(Debug, Clone, Default)]
pub struct MetricValues {
    pub savings_rate_percent: u32,
    pub recommended_life_cover: f64,
    pub existing_life_cover: f64,
    pub emergency_fund_target: f64,
    pub liquid_savings: f64,
    pub first_million_year: Option<u32>,
    pub retirement_ready_year: Option<u32>,
    pub years_to_retirement: u32,
    pub shortfall_years: usize,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SavingsRatePercent => Some(self.savings_rate_percent as f64),
            Metric::LifeCoverGap => Some(self.recommended_life_cover - self.existing_life_cover),
            Metric::EmergencyFundGap => Some(self.emergency_fund_target - self.liquid_savings),
            Metric::LiquidSavings => Some(self.liquid_savings),
            Metric::FirstMillionYear => self.first_million_year.map(f64::from),
            Metric::RetirementReadyYear => self.retirement_ready_year.map(f64::from),
            Metric::RetirementReadyMargin => self
                .retirement_ready_year
                .map(|ready| self.years_to_retirement as f64 - ready as f64),
            Metric::ShortfallYears => Some(self.shortfall_years as f64),
        }
    }

    fn placeholder(&self, name: &str) -> String {
        let optional_year = |year: Option<u32>| year.map_or_else(|| "n/a".to_string(), |y| y.to_string());
        match name {
            "savings_rate" => self.savings_rate_percent.to_string(),
            "life_cover" => format_amount(self.recommended_life_cover),
            "existing_cover" => format_amount(self.existing_life_cover),
            "coverage_gap" => format_amount((self.recommended_life_cover - self.existing_life_cover).max(0.0)),
            "emergency_fund" => format_amount(self.emergency_fund_target),
            "liquid_savings" => format_amount(self.liquid_savings),
            "emergency_gap" => format_amount((self.emergency_fund_target - self.liquid_savings).max(0.0)),
            "first_million_year" => optional_year(self.first_million_year),
            "retirement_ready_year" => optional_year(self.retirement_ready_year),
            "years_to_retirement" => self.years_to_retirement.to_string(),
            "shortfall_years" => self.shortfall_years.to_string(),
            _ => String::new(),
        }
    }

    /// Fill every `{placeholder}` in a template
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    out.push_str(&self.placeholder(&after[..close]));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Whole-unit amount with thousands separators: 1234567.8 -> "1,234,568"
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Ordered rule table; every matching rule contributes one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRules {
    rules: Vec<NarrativeRule>,
}

impl NarrativeRules {
    pub fn new(rules: Vec<NarrativeRule>) -> Result<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: NarrativeRules = serde_json::from_str(json)?;
        Self::new(raw.rules)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let raw: NarrativeRules = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        Self::new(raw.rules)
    }

    pub fn rules(&self) -> &[NarrativeRule] {
        &self.rules
    }

    /// Messages of every matching rule, in table order
    pub fn evaluate(&self, values: &MetricValues) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.when.matches(values.get(rule.metric)))
            .map(|rule| values.render(&rule.message))
            .collect()
    }
}

impl Default for NarrativeRules {
    fn default() -> Self {
        use Condition::*;
        use Metric::*;
        let target = TARGET_SAVINGS_RATE_PERCENT;
        Self {
            rules: vec![
                NarrativeRule::new(
                    SavingsRatePercent,
                    Below(target),
                    "Consider increasing your savings rate from {savings_rate}% to 20% for better financial security",
                ),
                NarrativeRule::new(
                    SavingsRatePercent,
                    AtLeast(target),
                    "Great job! Your {savings_rate}% savings rate meets the recommended 20%",
                ),
                NarrativeRule::new(
                    LifeCoverGap,
                    Above(0.0),
                    "Life cover of ${existing_cover} is ${coverage_gap} short of the recommended ${life_cover}",
                ),
                NarrativeRule::new(
                    EmergencyFundGap,
                    Above(0.0),
                    "Build emergency fund to ${emergency_fund} (6 months expenses)",
                ),
                NarrativeRule::new(
                    EmergencyFundGap,
                    AtMost(0.0),
                    "Emergency fund is healthy at ${liquid_savings}",
                ),
                NarrativeRule::new(
                    FirstMillionYear,
                    AtLeast(0.0),
                    "On track to reach $1M net worth in {first_million_year} years!",
                ),
                NarrativeRule::new(
                    FirstMillionYear,
                    Missing,
                    "Consider increasing investments to reach millionaire status",
                ),
                NarrativeRule::new(
                    RetirementReadyMargin,
                    AtLeast(0.0),
                    "Projected to be retirement-ready in {retirement_ready_year} years",
                ),
                NarrativeRule::new(
                    RetirementReadyMargin,
                    Below(0.0),
                    "May need to adjust retirement timeline or increase savings",
                ),
                NarrativeRule::new(
                    RetirementReadyYear,
                    Missing,
                    "May need to adjust retirement timeline or increase savings",
                ),
                NarrativeRule::new(
                    ShortfallYears,
                    Above(0.0),
                    "Savings run short in {shortfall_years} projected years; review spending after retirement",
                ),
            ],
        }
    }
}
