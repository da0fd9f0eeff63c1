//! Year-by-year household projection

mod events;
mod state;
mod engine;
mod year;

pub use events::LifeEvent;
pub use state::ProjectionState;
pub use engine::{
    simulate, NetWorthModel, PostHorizonPolicy, ProjectionConfig, ProjectionEngine, DEFAULT_HORIZON_YEARS,
    INSURANCE_INCOME_MULTIPLE,
};
pub use year::{find_year, ProjectionResult, ProjectionSummary, ProjectionYear, MILLION};
