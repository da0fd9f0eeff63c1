//! Load household profiles from CSV or JSON

use super::Profile;
use crate::error::Result;
use csv::Reader;
use std::fs::File;
use std::path::Path;

/// Default location of the sample profile sheet
pub const DEFAULT_PROFILES_PATH: &str = "data/profiles/sample_profiles.csv";

/// Raw CSV row matching the profile sheet columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ClientID")]
    client_id: String,
    #[serde(rename = "HouseholdSize")]
    household_size: u32,
    #[serde(rename = "Age")]
    current_age: u32,
    #[serde(rename = "RetirementAge")]
    retirement_age: u32,
    #[serde(rename = "HorizonAge")]
    horizon_age: u32,
    #[serde(rename = "ActiveIncome")]
    monthly_active_income: f64,
    #[serde(rename = "PassiveIncome")]
    monthly_passive_income: f64,
    #[serde(rename = "Expenses")]
    monthly_expenses: f64,
    #[serde(rename = "BankBalance")]
    bank_balance: f64,
    #[serde(rename = "NetWorth")]
    net_worth: f64,
    #[serde(rename = "Investment")]
    monthly_investment: f64,
    #[serde(rename = "Savings", default)]
    monthly_savings: f64,
    #[serde(rename = "CPFPct", default)]
    cpf_contribution_pct: f64,
    #[serde(rename = "CPFBalance", default)]
    cpf_balance: f64,
    #[serde(rename = "LifeCover", default)]
    existing_life_cover: f64,
    #[serde(rename = "Mortgage", default)]
    monthly_mortgage: f64,
    #[serde(rename = "Dependents", default)]
    dependents: u32,
}

impl CsvRow {
    fn to_profile(self) -> Result<Profile> {
        let profile = Profile {
            client_id: self.client_id,
            household_size: self.household_size,
            monthly_active_income: self.monthly_active_income,
            monthly_passive_income: self.monthly_passive_income,
            monthly_expenses: self.monthly_expenses,
            bank_balance: self.bank_balance,
            net_worth: self.net_worth,
            monthly_investment: self.monthly_investment,
            monthly_savings: self.monthly_savings,
            current_age: self.current_age,
            retirement_age: self.retirement_age,
            horizon_age: self.horizon_age,
            cpf_contribution_pct: self.cpf_contribution_pct,
            cpf_balance: self.cpf_balance,
            existing_life_cover: self.existing_life_cover,
            monthly_mortgage: self.monthly_mortgage,
            dependents: self.dependents,
        };
        profile
            .validate()
            .map_err(|e| e.context(&format!("profile '{}'", profile.client_id)))?;
        Ok(profile)
    }
}

/// Load all profiles from a CSV file
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>> {
    let reader = Reader::from_path(path)?;
    collect_profiles(reader)
}

/// Load profiles from any reader (e.g., string buffer)
pub fn load_profiles_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Profile>> {
    collect_profiles(Reader::from_reader(reader))
}

fn collect_profiles<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Profile>> {
    let mut profiles = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        profiles.push(row.to_profile()?);
    }
    Ok(profiles)
}

/// Load the bundled sample profiles
pub fn load_default_profiles() -> Result<Vec<Profile>> {
    load_profiles(DEFAULT_PROFILES_PATH)
}

/// Load a single profile from a JSON document; missing fields take defaults
pub fn load_profile_json<P: AsRef<Path>>(path: P) -> Result<Profile> {
    let file = File::open(path)?;
    let profile: Profile = serde_json::from_reader(file)?;
    profile.validate()?;
    Ok(profile)
}
