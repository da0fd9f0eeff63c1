//! Run the scenario catalog for every profile in a profile sheet
//!
//! Outputs one row per profile, scenario and horizon with the net-worth delta

use anyhow::{Context, Result};
use clap::Parser;
use household_projection::{
    assumptions::RateModel,
    impact::{compute_impact, DEFAULT_HORIZONS},
    profile::{load_profiles, loader::DEFAULT_PROFILES_PATH},
    projection::ProjectionConfig,
    recommendations::{coverage_needs, DEFAULT_COVERAGE_YEARS},
    scenario::{ScenarioCatalog, ScenarioRunner},
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_scenarios", about = "Scenario impacts for a sheet of household profiles")]
struct Args {
    /// Profile sheet CSV
    #[arg(long, default_value = DEFAULT_PROFILES_PATH)]
    profiles: PathBuf,

    /// Directory holding rate_model.csv
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Scenario catalog JSON (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "scenario_impacts.csv")]
    output: PathBuf,
}

/// One output line
#[derive(Debug, Serialize)]
struct ImpactRow {
    #[serde(rename = "ClientID")]
    client_id: String,
    #[serde(rename = "Scenario")]
    scenario: String,
    #[serde(rename = "HorizonYears")]
    horizon_years: u32,
    #[serde(rename = "BaselineNetWorth")]
    baseline_net_worth: f64,
    #[serde(rename = "ScenarioNetWorth")]
    scenario_net_worth: f64,
    #[serde(rename = "NetWorthDelta")]
    net_worth_delta: f64,
    #[serde(rename = "ShortfallYears")]
    shortfall_years: usize,
    #[serde(rename = "RecommendedCover")]
    recommended_cover: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading profiles from {}...", args.profiles.display());
    let profiles = load_profiles(&args.profiles)
        .with_context(|| format!("loading profiles from {}", args.profiles.display()))?;
    println!("Loaded {} profiles in {:?}", profiles.len(), start.elapsed());

    let rates = match &args.rates {
        Some(dir) => RateModel::from_csv_path(dir)?,
        None => RateModel::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => ScenarioCatalog::from_json_path(path)?,
        None => ScenarioCatalog::default(),
    };
    let horizon = DEFAULT_HORIZONS.iter().copied().max().unwrap_or(0);
    let runner = ScenarioRunner::new()
        .with_rates(rates)
        .with_catalog(catalog)
        .with_config(ProjectionConfig::with_horizon(horizon));

    println!("Running {} scenarios per profile...", runner.catalog().len());
    let proj_start = Instant::now();

    // Profiles in parallel; each profile's catalog also fans out
    let results: Vec<Vec<ImpactRow>> = profiles
        .par_iter()
        .map(|profile| -> household_projection::Result<Vec<ImpactRow>> {
            let run = runner.run_catalog(profile)?;
            let mut rows = Vec::with_capacity(run.scenarios.len() * DEFAULT_HORIZONS.len());
            for scenario in &run.scenarios {
                let impacts = compute_impact(&run.baseline.years, &scenario.result.years, &DEFAULT_HORIZONS)?;
                let shortfall_years = scenario.result.summary().shortfall_years;
                let cover = coverage_needs(profile, &scenario.definition.coverage_buffer, DEFAULT_COVERAGE_YEARS);
                for impact in impacts {
                    let h = impact.horizon_years;
                    rows.push(ImpactRow {
                        client_id: profile.client_id.clone(),
                        scenario: scenario.definition.id.clone(),
                        horizon_years: h,
                        baseline_net_worth: run.baseline.net_worth_at(h).unwrap_or(0.0),
                        scenario_net_worth: scenario.result.net_worth_at(h).unwrap_or(0.0),
                        net_worth_delta: impact.net_worth_delta,
                        shortfall_years,
                        recommended_cover: cover.total_coverage,
                    });
                }
            }
            Ok(rows)
        })
        .collect::<household_projection::Result<_>>()?;

    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut count = 0;
    for row in results.iter().flatten() {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;

    println!("Wrote {} rows to {}", count, args.output.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
