//! Projection output structures

use serde::{Deserialize, Serialize};

/// Result of projecting one profile: what will be saved vs. what is needed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementEstimate {
    /// Projected savings at the retirement date
    pub saved: f64,

    /// Lump sum needed at the retirement date to fund retirement income
    pub needed: f64,
}

impl RetirementEstimate {
    pub fn new(saved: f64, needed: f64) -> Self {
        Self { saved, needed }
    }

    /// Amount still missing at retirement, zero when on track
    pub fn shortfall(&self) -> f64 {
        (self.needed - self.saved).max(0.0)
    }

    pub fn on_track(&self) -> bool {
        self.saved >= self.needed
    }
}

/// Detail behind a savings projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsBreakdown {
    /// Whole compounding periods until retirement (negative when past it)
    pub periods: i64,

    /// Payments in period order; index 0 is the current savings balance
    pub payments: Vec<f64>,

    /// Each payment grown to the retirement date
    pub grown_payments: Vec<f64>,

    /// Prorated contribution for days left over after the last full period
    pub prorated_tail: f64,

    pub total: f64,
}

impl SavingsBreakdown {
    /// Total contributed out of future income, before investment growth
    pub fn total_contributions(&self) -> f64 {
        self.payments.iter().skip(1).sum::<f64>() + self.prorated_tail
    }

    /// Investment growth earned on the balance and contributions
    pub fn investment_growth(&self) -> f64 {
        self.grown_payments.iter().sum::<f64>() - self.payments.iter().sum::<f64>()
    }
}
