//! Projection engine turning assumptions into a yearly cash-flow series

mod state;
mod engine;
mod series;
pub mod export;

pub use state::ProjectionState;
pub use engine::{
    project, round_half_up, ProjectionConfig, ProjectionEngine, FALLBACK_PRIMARY_AGE,
    INCOME_GROWTH_RATE,
};
pub use series::{MemberAge, Series, SeriesSummary, TimeHorizon, YearRecord};
pub use export::write_series_csv;
