//! Household Projection CLI
//!
//! Projects one household profile and prints the baseline, optionally with
//! every catalog scenario compared against it

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use household_projection::{
    analysis::{baseline_analysis_with, scenario_report},
    assumptions::{RateModel, RiskTolerance},
    impact::DEFAULT_HORIZONS,
    profile::{load_profile_json, Profile},
    projection::{NetWorthModel, PostHorizonPolicy, ProjectionConfig, DEFAULT_HORIZON_YEARS},
    recommendations::{format_amount, NarrativeRules},
    scenario::{ScenarioCatalog, ScenarioRunner},
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "household_projection", about = "Project a household's finances and compare what-if scenarios")]
struct Args {
    /// Profile JSON file (missing fields use defaults)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Directory holding rate_model.csv
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Investment return preset, applied after any rate file
    #[arg(long, value_enum)]
    risk: Option<RiskTolerance>,

    /// Narrative rule table JSON (defaults to the built-in table)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Scenario catalog JSON (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Years to project after the current year
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    years: u32,

    /// Track net worth as CPF + liquid assets + portfolio
    #[arg(long)]
    extended: bool,

    /// Stop deficit withdrawals and contributions after the horizon age
    #[arg(long)]
    cut_off_after_horizon: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also run the scenario catalog
    #[arg(long)]
    scenarios: bool,

    /// Restrict the catalog to these scenario ids
    #[arg(long = "only", value_delimiter = ',')]
    only: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let profile = match &args.profile {
        Some(path) => load_profile_json(path).with_context(|| format!("loading profile {}", path.display()))?,
        None => Profile::default(),
    };

    let mut rates = match &args.rates {
        Some(dir) => RateModel::from_csv_path(dir).with_context(|| format!("loading rates from {}", dir.display()))?,
        None => RateModel::default(),
    };
    if let Some(risk) = args.risk {
        rates = rates.with_risk_tolerance(risk);
    }

    let rules = match &args.rules {
        Some(path) => NarrativeRules::from_json_path(path)
            .with_context(|| format!("loading narrative rules {}", path.display()))?,
        None => NarrativeRules::default(),
    };

    let mut catalog = match &args.catalog {
        Some(path) => ScenarioCatalog::from_json_path(path)
            .with_context(|| format!("loading scenario catalog {}", path.display()))?,
        None => ScenarioCatalog::default(),
    };
    if !args.only.is_empty() {
        catalog = catalog.select(&args.only)?;
    }

    let config = ProjectionConfig {
        horizon_years: args.years,
        net_worth_model: if args.extended { NetWorthModel::Extended } else { NetWorthModel::Simple },
        post_horizon: if args.cut_off_after_horizon {
            PostHorizonPolicy::CutOff
        } else {
            PostHorizonPolicy::Continue
        },
        start_year: Some(chrono::Local::now().year()),
        ..Default::default()
    };

    let runner = ScenarioRunner::new()
        .with_rates(rates)
        .with_catalog(catalog)
        .with_config(config);

    let analysis = baseline_analysis_with(&runner, &profile, &rules)?;
    let horizons: Vec<u32> = DEFAULT_HORIZONS.into_iter().filter(|h| *h <= args.years).collect();
    let report = if args.scenarios {
        Some(scenario_report(&runner, &profile, &horizons)?)
    } else {
        None
    };

    match args.format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "analysis": analysis, "scenarios": report });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("Household Projection");
            println!("====================\n");
            println!("Client: {}", if profile.client_id.is_empty() { "-" } else { profile.client_id.as_str() });
            println!("  Age {} -> retire {} (horizon {})", profile.current_age, profile.retirement_age, profile.horizon_age);
            println!("  Income ${}/mo, expenses ${}/mo, mortgage ${}/mo, investing ${}/mo",
                format_amount(profile.monthly_income()),
                format_amount(profile.monthly_expenses),
                format_amount(profile.monthly_mortgage),
                format_amount(profile.monthly_investment));
            println!();

            println!("{:>4} {:>5} {:>4} {:>12} {:>12} {:>12} {:>14} {:>14} {:>14}",
                "Year", "Cal", "Age", "Income", "Expenses", "Net", "Bank", "NetWorth", "InsNeed");
            println!("{}", "-".repeat(100));
            for row in &analysis.projections {
                println!("{:>4} {:>5} {:>4} {:>12.0} {:>12.0} {:>12.0} {:>14.0} {:>14.0} {:>14.0}{}",
                    row.year,
                    row.calendar_year.map(|y| y.to_string()).unwrap_or_default(),
                    row.age,
                    row.total_income,
                    row.annual_expenses,
                    row.net_cashflow,
                    row.bank_balance,
                    row.net_worth,
                    row.insurance_need,
                    if row.is_shortfall { "  shortfall" } else { "" });
            }

            let recs = &analysis.recommendations;
            println!();
            println!("Recommendations:");
            println!("  Life cover:     ${}", format_amount(recs.recommended_life_cover));
            println!("  Emergency fund: ${}", format_amount(recs.emergency_fund_target));
            println!("  Savings rate:   {}%", recs.savings_rate_percent);
            for point in &recs.narrative_points {
                println!("  - {}", point);
            }

            let cover = &analysis.coverage;
            println!();
            println!("Coverage breakdown ({} years):", cover.years);
            println!("  Income replacement:   ${}", format_amount(cover.income_replacement));
            println!("  Education fund:       ${}", format_amount(cover.education_fund));
            println!("  Outstanding mortgage: ${}", format_amount(cover.outstanding_mortgage));
            println!("  Emergency buffer:     ${}", format_amount(cover.emergency_buffer));
            println!("  Less savings:         ${}", format_amount(cover.current_savings));
            println!("  Total:                ${}", format_amount(cover.total_coverage));

            if let Some(report) = &report {
                println!();
                print!("{:<20} {:<22}", "Scenario", "Name");
                for h in &horizons {
                    print!(" {:>14}", format!("{}yr", h));
                }
                println!(" {:>14}", "Cover");
                println!("{}", "-".repeat(59 + 15 * horizons.len()));
                for entry in &report.scenarios {
                    print!("{:<20} {:<22}", entry.id, entry.name);
                    for impact in &entry.impacts {
                        print!(" {:>14}", format_amount(impact.net_worth_delta));
                    }
                    println!(" {:>14}", format_amount(entry.coverage.total_coverage));
                }
            }
        }
    }

    Ok(())
}
