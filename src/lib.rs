//! Retirement Calculator - projection engine for retirement savings
//!
//! This library provides:
//! - Compound growth and discounting helpers
//! - Age and time-to-retirement arithmetic on a 365-day calendar
//! - Savings-accumulated and savings-needed projections
//! - Profile validation and JSON/CSV loading
//! - Batch projections over many profiles or configurations

pub mod error;
pub mod profile;
pub mod projection;
pub mod runner;

// Re-export commonly used types
pub use error::{CalculatorError, Result};
pub use profile::{Profile, ProfileAssumptions, ProfileInfo};
pub use projection::{
    retirement_info_by_profile, ProjectionConfig, ProjectionEngine, RetirementEstimate, TimingMode,
};
pub use runner::ProjectionRunner;
