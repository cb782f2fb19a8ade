//! Batch runner for projecting many profiles or many configurations
//!
//! Holds a base config and fans work out across threads with rayon. Each
//! projection is independent, so one bad profile never fails the batch.

use crate::error::Result;
use crate::profile::Profile;
use crate::projection::{ProjectionConfig, ProjectionEngine, RetirementEstimate, SavingsBreakdown};
use rayon::prelude::*;

/// Runs projections against a shared base config
///
/// # Example
/// ```ignore
/// let runner = ProjectionRunner::new(ProjectionConfig::default().as_of("2024-06-01"))?;
/// let estimates = runner.run_batch(&profiles);
///
/// // Sensitivity to income growth for a single profile
/// let configs: Vec<_> = [1.0, 2.0, 3.0]
///     .iter()
///     .map(|&rate| ProjectionConfig { income_increase_rate: rate, ..runner.config().clone() })
///     .collect();
/// let results = runner.run_scenarios(&profile, &configs);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectionRunner {
    engine: ProjectionEngine,
}

impl ProjectionRunner {
    pub fn new(config: ProjectionConfig) -> Result<Self> {
        Ok(Self {
            engine: ProjectionEngine::new(config)?,
        })
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Project a single profile
    pub fn run(&self, profile: &Profile) -> Result<RetirementEstimate> {
        self.engine.project(profile)
    }

    /// Project many profiles in parallel, results in input order
    pub fn run_batch(&self, profiles: &[Profile]) -> Vec<Result<RetirementEstimate>> {
        log::info!("Projecting {} profiles", profiles.len());
        profiles.par_iter().map(|p| self.engine.project(p)).collect()
    }

    /// Like [`run_batch`](Self::run_batch), also returning each savings breakdown.
    /// Estimate and breakdown share one evaluation date per profile.
    pub fn run_batch_detailed(&self, profiles: &[Profile]) -> Vec<Result<(RetirementEstimate, SavingsBreakdown)>> {
        log::info!("Projecting {} profiles with breakdowns", profiles.len());
        profiles.par_iter().map(|p| self.engine.project_detailed(p)).collect()
    }

    /// Project one profile under several configs, results in config order
    pub fn run_scenarios(&self, profile: &Profile, configs: &[ProjectionConfig]) -> Vec<Result<RetirementEstimate>> {
        configs
            .par_iter()
            .map(|config| ProjectionEngine::new(config.clone())?.project(profile))
            .collect()
    }
}
