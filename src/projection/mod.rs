//! Projection engine: compounding, calendar arithmetic and the two retirement projections

mod calendar;
mod engine;
mod estimate;
mod money;

pub use calendar::{age, resolve_as_of, time_until_retirement, CalendarDate, TimeToRetirement, DAYS_PER_YEAR};
pub use engine::{
    retirement_info_by_profile, ProjectionConfig, ProjectionEngine, TimingMode,
    DEFAULT_INCOME_INCREASE_RATE, DEFAULT_INFLATION_RATE, DEFAULT_RETIREMENT_RATE_OF_RETURN,
    DEFAULT_TIMES_COMPOUNDED_PER_YEAR, MAX_TIMES_COMPOUNDED_PER_YEAR,
};
pub use estimate::{RetirementEstimate, SavingsBreakdown};
pub use money::{future_value, present_value};
