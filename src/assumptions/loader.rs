//! CSV-based rate assumption loader
//!
//! Loads rate overrides from data/assumptions/rate_model.csv

use crate::error::{ProjectionError, Result};
use std::fs::File;
use std::path::Path;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// File holding `parameter,value` rows
pub const RATE_MODEL_FILE: &str = "rate_model.csv";

/// Load rate overrides from CSV
/// Returns (parameter name, value) pairs in file order
pub fn load_rate_overrides(path: &Path) -> Result<Vec<(String, f64)>> {
    let file = File::open(path.join(RATE_MODEL_FILE))?;
    load_rate_overrides_from_reader(file)
}

/// Load rate overrides from any reader
pub fn load_rate_overrides_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<(String, f64)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut overrides = Vec::new();
    for result in reader.records() {
        let record = result?;
        let (name, raw) = match (record.get(0), record.get(1)) {
            (Some(name), Some(raw)) => (name.to_string(), raw),
            _ => {
                return Err(ProjectionError::Configuration(format!(
                    "{} row needs parameter,value",
                    RATE_MODEL_FILE
                )))
            }
        };
        let value: f64 = raw.parse().map_err(|_| {
            ProjectionError::Configuration(format!("rate '{}' has non-numeric value '{}'", name, raw))
        })?;
        overrides.push((name, value));
    }

    Ok(overrides)
}

/// Raw rate overrides loaded from disk, not yet validated
pub struct LoadedRates {
    pub overrides: Vec<(String, f64)>,
}

impl LoadedRates {
    /// Load from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load from a specific directory
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self {
            overrides: load_rate_overrides(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_rates() {
        let result = LoadedRates::load_default();
        assert!(result.is_ok(), "Failed to load rates: {:?}", result.err());

        let loaded = result.unwrap();
        assert!(loaded
            .overrides
            .iter()
            .any(|(name, value)| name == "bank_growth_rate" && (*value - 0.06).abs() < 1e-12));
    }

    #[test]
    fn test_comments_and_whitespace_ignored() {
        let csv = "parameter,value\n# macro defaults\n expense_inflation_rate , 0.02\n";
        let overrides = load_rate_overrides_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(overrides, vec![("expense_inflation_rate".to_string(), 0.02)]);
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let csv = "parameter,value\nbank_growth_rate,six percent\n";
        let err = load_rate_overrides_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ProjectionError::Configuration(_)));
    }

    #[test]
    fn test_one_column_file_is_configuration_error() {
        let csv = "parameter\nbank_growth_rate\n";
        let err = load_rate_overrides_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ProjectionError::Configuration(_)));
        assert!(err.to_string().contains("parameter,value"));
    }
}
