//! Household profile data and loading

mod data;
pub mod loader;

pub use data::{
    Profile, ProfileField, EMERGENCY_FUND_MONTHS, MAX_AGE, MORTGAGE_YEARS_REMAINING, RETIREMENT_EXPENSE_MULTIPLE,
};
pub use loader::{load_default_profiles, load_profile_json, load_profiles, load_profiles_from_reader};
