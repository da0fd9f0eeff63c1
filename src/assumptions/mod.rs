//! Rate assumptions: inflation, income growth, investment and bank returns

mod rates;
pub mod loader;

pub use loader::LoadedRates;
pub use rates::{
    RateModel, RateParameter, RiskTolerance, DEFAULT_ACTIVE_INCOME_GROWTH_RATE,
    DEFAULT_BANK_GROWTH_RATE, DEFAULT_CPF_RETURN_RATE, DEFAULT_EXPENSE_INFLATION_RATE,
    DEFAULT_INVESTMENT_RETURN_RATE, DEFAULT_PASSIVE_INCOME_GROWTH_RATE,
};
