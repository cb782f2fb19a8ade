//! Retirement projection engine
//!
//! Two projections are combined into a [`RetirementEstimate`]:
//! - savings accumulated by the retirement date from the current balance plus a
//!   stream of contributions that rise with income
//! - the lump sum needed at the retirement date to pay an inflation-adjusted
//!   income until life expectancy
//!
//! Simplifying assumptions of the savings projection:
//! - income increases once per year, starting one full year after evaluation
//! - compounding starts after the first full period
//! - income is received daily, so leftover days are prorated
//! - there are no leap years

use crate::error::{CalculatorError, Result};
use crate::profile::{check_age, Profile, ProfileInfo};
use super::calendar::{age, resolve_as_of, time_until_retirement, CalendarDate, TimeToRetirement, DAYS_PER_YEAR};
use super::estimate::{RetirementEstimate, SavingsBreakdown};
use super::money::{future_value, present_value};
use serde::{Deserialize, Serialize};

/// Default number of compounding periods per year
pub const DEFAULT_TIMES_COMPOUNDED_PER_YEAR: u32 = 1;

/// Most compounding periods per year accepted (daily)
pub const MAX_TIMES_COMPOUNDED_PER_YEAR: u32 = DAYS_PER_YEAR;

/// Default annual income growth (percent)
pub const DEFAULT_INCOME_INCREASE_RATE: f64 = 2.0;

/// Default annual inflation in retirement (percent)
pub const DEFAULT_INFLATION_RATE: f64 = 3.0;

/// Default annual return on savings during retirement (percent)
pub const DEFAULT_RETIREMENT_RATE_OF_RETURN: f64 = 5.0;

/// How time until retirement is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingMode {
    /// Retirement age minus current whole-year age, no leftover days
    #[default]
    Simplified,
    /// Exact whole years plus leftover days from the evaluation date
    Exact,
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Compounding periods per year for investment returns
    pub times_compounded_per_year: u32,

    /// Annual income growth before retirement (percent)
    pub income_increase_rate: f64,

    /// Annual inflation of retirement income (percent)
    pub inflation_rate: f64,

    /// Annual return used to discount retirement income needs (percent)
    pub retirement_rate_of_return: f64,

    pub timing: TimingMode,

    /// Evaluation date as `YYYY-MM-DD`. `None` or an unparsable value means today.
    pub as_of_date: Option<String>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            times_compounded_per_year: DEFAULT_TIMES_COMPOUNDED_PER_YEAR,
            income_increase_rate: DEFAULT_INCOME_INCREASE_RATE,
            inflation_rate: DEFAULT_INFLATION_RATE,
            retirement_rate_of_return: DEFAULT_RETIREMENT_RATE_OF_RETURN,
            timing: TimingMode::Simplified,
            as_of_date: None,
        }
    }
}

impl ProjectionConfig {
    /// Same config evaluated on a fixed date
    pub fn as_of(mut self, date: impl Into<String>) -> Self {
        self.as_of_date = Some(date.into());
        self
    }

    pub fn with_timing(mut self, timing: TimingMode) -> Self {
        self.timing = timing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.times_compounded_per_year == 0 || self.times_compounded_per_year > MAX_TIMES_COMPOUNDED_PER_YEAR {
            return Err(CalculatorError::validation(
                "times_compounded_per_year",
                format!("must be between 1 and {}", MAX_TIMES_COMPOUNDED_PER_YEAR),
            ));
        }
        for (field, value) in [
            ("income_increase_rate", self.income_increase_rate),
            ("inflation_rate", self.inflation_rate),
            ("retirement_rate_of_return", self.retirement_rate_of_return),
        ] {
            if !value.is_finite() {
                return Err(CalculatorError::validation(field, format!("{} is not a finite number", value)));
            }
        }
        Ok(())
    }

    /// Resolve the evaluation date, reading the clock when needed
    pub fn evaluation_date(&self) -> CalendarDate {
        resolve_as_of(self.as_of_date.as_deref())
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create an engine, rejecting an invalid config up front
    pub fn new(config: ProjectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project both amounts for a profile.
    ///
    /// The evaluation date is resolved once and shared by both projections. The
    /// savings side grows at the profile's expected return; the need side
    /// discounts at the config's retirement-phase return.
    pub fn project(&self, profile: &Profile) -> Result<RetirementEstimate> {
        Ok(self.project_detailed(profile)?.0)
    }

    /// Like [`project`](Self::project), also returning the savings breakdown
    /// computed on the same evaluation date
    pub fn project_detailed(&self, profile: &Profile) -> Result<(RetirementEstimate, SavingsBreakdown)> {
        let as_of = self.config.evaluation_date();
        let info = &profile.user_info;
        let assumptions = &profile.assumptions;

        let breakdown =
            self.savings_breakdown_at(info, assumptions.expected_rate_of_return, assumptions.retirement_age, &as_of)?;
        let saved = breakdown.total;
        let needed = self.needed_at(
            info,
            assumptions.retirement_age,
            assumptions.life_expectancy,
            assumptions.pre_retirement_income_percent,
            &as_of,
        )?;

        log::debug!(
            "Projected {} as of {}: saved={:.2} needed={:.2}",
            info.full_name,
            as_of,
            saved,
            needed
        );
        Ok((RetirementEstimate::new(saved, needed), breakdown))
    }

    /// Total savings at the retirement date
    pub fn will_have_saved(
        &self,
        info: &ProfileInfo,
        expected_rate_of_return: f64,
        retirement_age: u32,
    ) -> Result<f64> {
        Ok(self
            .will_have_saved_breakdown(info, expected_rate_of_return, retirement_age)?
            .total)
    }

    /// Savings projection with its payment schedule
    pub fn will_have_saved_breakdown(
        &self,
        info: &ProfileInfo,
        expected_rate_of_return: f64,
        retirement_age: u32,
    ) -> Result<SavingsBreakdown> {
        let as_of = self.config.evaluation_date();
        self.savings_breakdown_at(info, expected_rate_of_return, retirement_age, &as_of)
    }

    /// Lump sum needed at the retirement date
    pub fn need_to_have_saved(
        &self,
        info: &ProfileInfo,
        retirement_age: u32,
        life_expectancy: u32,
        pre_retirement_income_percent: f64,
    ) -> Result<f64> {
        let as_of = self.config.evaluation_date();
        self.needed_at(info, retirement_age, life_expectancy, pre_retirement_income_percent, &as_of)
    }

    fn time_to_retirement(&self, info: &ProfileInfo, retirement_age: u32, as_of: &CalendarDate) -> TimeToRetirement {
        match self.config.timing {
            TimingMode::Simplified => TimeToRetirement {
                years: retirement_age as i32 - age(&info.date_of_birth, as_of),
                days: 0,
            },
            TimingMode::Exact => time_until_retirement(&info.date_of_birth, retirement_age, as_of),
        }
    }

    fn savings_breakdown_at(
        &self,
        info: &ProfileInfo,
        expected_rate_of_return: f64,
        retirement_age: u32,
        as_of: &CalendarDate,
    ) -> Result<SavingsBreakdown> {
        let retirement_age = check_age("retirement_age", retirement_age)?;
        let config = &self.config;
        let per_year = config.times_compounded_per_year as i64;
        let time = self.time_to_retirement(info, retirement_age, as_of);

        // Whole periods, then the days left after the last one
        let additional_periods = (time.days as i64 * per_year) / DAYS_PER_YEAR as i64;
        let periods = time.years as i64 * per_year + additional_periods;
        let extra_days =
            time.days as f64 - additional_periods as f64 * (DAYS_PER_YEAR as f64 / per_year as f64);

        // Tail contribution earns no investment return
        let annual_contribution = info.household_income * (info.current_savings_rate / 100.0);
        let prorated_tail = (extra_days / DAYS_PER_YEAR as f64)
            * future_value(annual_contribution, config.income_increase_rate, time.years as f64);

        let per_period = annual_contribution / per_year as f64;
        let mut payments = Vec::with_capacity(periods.max(0) as usize + 1);
        payments.push(info.current_retirement_savings);
        payments.extend(
            (0..periods).map(|i| future_value(per_period, config.income_increase_rate, (i / per_year) as f64)),
        );

        let grown_payments: Vec<f64> = payments
            .iter()
            .enumerate()
            .map(|(i, &payment)| future_value(payment, expected_rate_of_return, (periods - i as i64) as f64))
            .collect();
        let total = prorated_tail + grown_payments.iter().sum::<f64>();

        log::debug!(
            "Savings projection: {} years {} days, {} periods, tail={:.2}, total={:.2}",
            time.years,
            time.days,
            periods,
            prorated_tail,
            total
        );

        Ok(SavingsBreakdown {
            periods,
            payments,
            grown_payments,
            prorated_tail,
            total,
        })
    }

    fn needed_at(
        &self,
        info: &ProfileInfo,
        retirement_age: u32,
        life_expectancy: u32,
        pre_retirement_income_percent: f64,
        as_of: &CalendarDate,
    ) -> Result<f64> {
        let retirement_age = check_age("retirement_age", retirement_age)?;
        let life_expectancy = check_age("life_expectancy", life_expectancy)?;
        let config = &self.config;
        let per_year = config.times_compounded_per_year as i64;
        // Leftover days never matter here
        let years = self.time_to_retirement(info, retirement_age, as_of).years;

        let base_income = (pre_retirement_income_percent / 100.0)
            * future_value(info.household_income, config.income_increase_rate, years as f64);
        let years_of_retirement = life_expectancy as i64 - retirement_age as i64;
        let rate_per_period = config.retirement_rate_of_return / per_year as f64;

        (0..years_of_retirement)
            .map(|year| {
                let income_needed = future_value(base_income, config.inflation_rate, year as f64);
                present_value(income_needed, rate_per_period, (year * per_year) as f64)
            })
            .sum()
    }
}

/// Project a profile with every optional parameter at its default, evaluated today
pub fn retirement_info_by_profile(profile: &Profile) -> Result<RetirementEstimate> {
    ProjectionEngine::default().project(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileAssumptions;
    use approx::assert_relative_eq;

    fn info(income: f64, savings_rate: f64, savings: f64) -> ProfileInfo {
        ProfileInfo::new("2001-04-21", income, savings_rate, savings, "Test Person", "1 Main St").unwrap()
    }

    fn engine_at(date: &str, timing: TimingMode) -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig::default().as_of(date).with_timing(timing)).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = ProjectionConfig::default();
        assert_eq!(config.times_compounded_per_year, 1);
        assert_eq!(config.income_increase_rate, 2.0);
        assert_eq!(config.inflation_rate, 3.0);
        assert_eq!(config.retirement_rate_of_return, 5.0);
        assert_eq!(config.timing, TimingMode::Simplified);
        assert!(config.as_of_date.is_none());
    }

    #[test]
    fn test_zero_compounding_is_rejected() {
        let config = ProjectionConfig {
            times_compounded_per_year: 0,
            ..Default::default()
        };
        let err = ProjectionEngine::new(config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_excessive_compounding_is_rejected() {
        let config = ProjectionConfig {
            times_compounded_per_year: u32::MAX,
            ..Default::default()
        };
        assert!(ProjectionEngine::new(config).unwrap_err().is_validation());
        let daily = ProjectionConfig {
            times_compounded_per_year: 365,
            ..Default::default()
        };
        assert!(ProjectionEngine::new(daily).is_ok());
    }

    #[test]
    fn test_huge_ages_fail_without_panicking() {
        let person = info(100_000.0, 10.0, 1000.0);
        for timing in [TimingMode::Simplified, TimingMode::Exact] {
            let engine = engine_at("2024-06-01", timing);
            let err = engine.will_have_saved(&person, 8.0, i32::MAX as u32).unwrap_err();
            assert!(err.is_validation());
            let err = engine.need_to_have_saved(&person, 65, u32::MAX, 70.0).unwrap_err();
            assert!(err.is_validation());
        }

        // Bypassing construction through the public fields is caught too
        let mut profile = Profile::new(person, ProfileAssumptions::new(70.0, 80, 8.0, 65).unwrap());
        profile.assumptions.retirement_age = 2_000_000_000;
        assert!(engine_at("2024-06-01", TimingMode::Exact).project(&profile).is_err());
    }

    #[test]
    fn test_project_detailed_shares_evaluation_date() {
        let profile = Profile::new(
            info(100_000.0, 10.0, 50_000.0),
            ProfileAssumptions::new(70.0, 80, 8.0, 65).unwrap(),
        );
        let engine = engine_at("2024-06-01", TimingMode::Exact);
        let (estimate, breakdown) = engine.project_detailed(&profile).unwrap();
        assert_eq!(estimate.saved, breakdown.total);
        assert_eq!(breakdown, engine.will_have_saved_breakdown(&profile.user_info, 8.0, 65).unwrap());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ProjectionConfig =
            serde_json::from_str(r#"{"timing": "exact", "as_of_date": "2024-01-01"}"#).unwrap();
        assert_eq!(config.timing, TimingMode::Exact);
        assert_eq!(config.income_increase_rate, DEFAULT_INCOME_INCREASE_RATE);
        assert!(serde_json::from_str::<ProjectionConfig>(r#"{"bogus": 1}"#).is_err());
    }

    #[test]
    fn test_will_have_saved_balance_only() {
        // No contributions: just the balance compounded for 2 years at 10%
        let engine = engine_at("2064-04-21", TimingMode::Simplified);
        let saved = engine.will_have_saved(&info(100_000.0, 0.0, 1000.0), 10.0, 65).unwrap();
        assert_relative_eq!(saved, 1210.0, epsilon = 1e-9);
    }

    #[test]
    fn test_will_have_saved_contribution_schedule() {
        // Age 63 on 2064-04-21, two years to go, $1000/yr contributions
        let engine = engine_at("2064-04-21", TimingMode::Simplified);
        let breakdown = engine
            .will_have_saved_breakdown(&info(10_000.0, 10.0, 0.0), 10.0, 65)
            .unwrap();

        assert_eq!(breakdown.periods, 2);
        assert_eq!(breakdown.payments.len(), 3);
        // Income has not increased yet in year 0, increases once by year 1
        assert_relative_eq!(breakdown.payments[1], 1000.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.payments[2], 1020.0, epsilon = 1e-9);
        // 1000 * 1.1^1 + 1020 * 1.1^0
        assert_relative_eq!(breakdown.total, 1000.0 * 1.1 + 1020.0, epsilon = 1e-9);
        assert_eq!(breakdown.prorated_tail, 0.0);
    }

    #[test]
    fn test_will_have_saved_exact_prorates_tail() {
        // 2064-06-01 is past the birthday: 0 whole years, 324 days to 2065-04-21
        let engine = engine_at("2064-06-01", TimingMode::Exact);
        let breakdown = engine
            .will_have_saved_breakdown(&info(36_500.0, 10.0, 0.0), 8.0, 64)
            .unwrap();

        assert_eq!(breakdown.periods, 0);
        assert_eq!(breakdown.payments.len(), 1);
        // 3650/yr prorated over 324 days, no investment growth
        assert_relative_eq!(breakdown.prorated_tail, 3240.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.total, 3240.0, epsilon = 1e-9);
    }

    #[test]
    fn test_will_have_saved_exact_monthly_periods() {
        // 324 days at 12 periods/yr: 10 whole periods, 324 - 10 * 365/12 days left
        let config = ProjectionConfig {
            times_compounded_per_year: 12,
            ..ProjectionConfig::default().as_of("2064-06-01").with_timing(TimingMode::Exact)
        };
        let engine = ProjectionEngine::new(config).unwrap();
        let breakdown = engine
            .will_have_saved_breakdown(&info(36_500.0, 10.0, 0.0), 0.0, 64)
            .unwrap();

        assert_eq!(breakdown.periods, 10);
        let extra_days = 324.0 - 10.0 * (365.0 / 12.0);
        assert_relative_eq!(breakdown.prorated_tail, extra_days / 365.0 * 3650.0, epsilon = 1e-9);
        // Zero return: total is the plain sum of contributions
        assert_relative_eq!(
            breakdown.total,
            10.0 * 3650.0 / 12.0 + breakdown.prorated_tail,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_will_have_saved_past_retirement_in_exact_mode() {
        let engine = engine_at("2070-01-01", TimingMode::Exact);
        let saved = engine.will_have_saved(&info(50_000.0, 10.0, 5000.0), 7.0, 67).unwrap();
        assert_eq!(saved, 5000.0);
    }

    #[test]
    fn test_need_to_have_saved_simple_case() {
        // Already at retirement age: base income is 50% of 100k, two years of need
        let engine = engine_at("2066-04-21", TimingMode::Simplified);
        let needed = engine.need_to_have_saved(&info(100_000.0, 0.0, 0.0), 65, 67, 50.0).unwrap();
        // 50000 + 50000 * 1.03 / 1.05
        assert_relative_eq!(needed, 50_000.0 + 51_500.0 / 1.05, epsilon = 1e-6);
    }

    #[test]
    fn test_need_to_have_saved_grows_income_until_retirement() {
        let engine = engine_at("2064-04-21", TimingMode::Simplified);
        let needed = engine.need_to_have_saved(&info(100_000.0, 0.0, 0.0), 65, 66, 50.0).unwrap();
        // One year of need, base income grown 2 years at 2%
        assert_relative_eq!(needed, 50_000.0 * 1.02 * 1.02, epsilon = 1e-6);
    }

    #[test]
    fn test_need_to_have_saved_discounts_per_sub_period() {
        let config = ProjectionConfig {
            times_compounded_per_year: 4,
            ..ProjectionConfig::default().as_of("2066-04-21")
        };
        let engine = ProjectionEngine::new(config).unwrap();
        let needed = engine.need_to_have_saved(&info(100_000.0, 0.0, 0.0), 65, 67, 50.0).unwrap();
        assert_relative_eq!(needed, 50_000.0 + 51_500.0 / 1.0125f64.powi(4), epsilon = 1e-6);
    }

    #[test]
    fn test_need_to_have_saved_no_retirement_years() {
        let engine = engine_at("2024-01-01", TimingMode::Simplified);
        let needed = engine.need_to_have_saved(&info(100_000.0, 0.0, 0.0), 67, 67, 70.0).unwrap();
        assert_eq!(needed, 0.0);
    }

    #[test]
    fn test_need_to_have_saved_division_by_zero() {
        let config = ProjectionConfig {
            retirement_rate_of_return: -100.0,
            ..ProjectionConfig::default().as_of("2024-01-01")
        };
        let engine = ProjectionEngine::new(config).unwrap();
        let err = engine.need_to_have_saved(&info(100_000.0, 0.0, 0.0), 67, 79, 70.0).unwrap_err();
        assert!(matches!(err, CalculatorError::DivisionByZero { .. }));
    }

    #[test]
    fn test_project_uses_default_retirement_return() {
        let profile = Profile::new(
            info(100_000.0, 10.0, 50_000.0),
            ProfileAssumptions::new(70.0, 80, 8.0, 65).unwrap(),
        );
        let engine = engine_at("2024-06-01", TimingMode::Simplified);
        let estimate = engine.project(&profile).unwrap();

        let needed = engine.need_to_have_saved(&profile.user_info, 65, 80, 70.0).unwrap();
        let saved = engine.will_have_saved(&profile.user_info, 8.0, 65).unwrap();
        assert_eq!(estimate.needed, needed);
        assert_eq!(estimate.saved, saved);
    }

    #[test]
    fn test_retirement_info_by_profile_matches_default_engine() {
        let profile = Profile::new(
            info(170_392.0, 18.0, 458_215.0),
            ProfileAssumptions::new(73.0, 79, 8.0, 67).unwrap(),
        );
        let estimate = retirement_info_by_profile(&profile).unwrap();
        assert!(estimate.saved > 0.0 && estimate.needed > 0.0);
        assert_eq!(estimate, ProjectionEngine::default().project(&profile).unwrap());
    }

    #[test]
    fn test_modes_differ_mid_year() {
        let simplified = engine_at("2024-06-01", TimingMode::Simplified);
        let exact = engine_at("2024-06-01", TimingMode::Exact);
        let person = info(100_000.0, 10.0, 50_000.0);

        let a = simplified.will_have_saved_breakdown(&person, 8.0, 67).unwrap();
        let b = exact.will_have_saved_breakdown(&person, 8.0, 67).unwrap();
        // Age 23 on 2024-06-01: 44 years simplified vs 43 years + 324 days exact
        assert_eq!(a.periods, 44);
        assert_eq!(b.periods, 43);
        assert!(b.prorated_tail > 0.0);
    }
}
