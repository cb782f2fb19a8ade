//! Profile records consumed by the projection engine
//!
//! Inputs arrive loosely typed (JSON numbers, numeric strings, CSV cells) and are
//! validated into [`Profile`] before any projection runs.

use crate::error::{CalculatorError, Result};
use crate::projection::CalendarDate;
use serde::{Deserialize, Serialize};

/// Upper bound for any age or lifespan, in whole years
pub const MAX_AGE_YEARS: u32 = 150;

/// Financial and personal details of the person being projected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub date_of_birth: CalendarDate,

    /// Annual household income
    pub household_income: f64,

    /// Percent of income saved each year (0-100)
    pub current_savings_rate: f64,

    /// Balance already saved for retirement
    pub current_retirement_savings: f64,

    pub full_name: String,
    pub address: String,
}

/// Planning assumptions attached to a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAssumptions {
    /// Replacement ratio: percent of pre-retirement income wanted in retirement
    pub pre_retirement_income_percent: f64,

    /// Age the retirement income must last until
    pub life_expectancy: u32,

    /// Percent return per compounding period while saving
    pub expected_rate_of_return: f64,

    pub retirement_age: u32,
}

/// Full input record: personal info plus assumptions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user_info: ProfileInfo,
    pub assumptions: ProfileAssumptions,
}

impl ProfileInfo {
    /// Build from typed values, validating the date and that amounts are finite
    pub fn new(
        date_of_birth: &str,
        household_income: f64,
        current_savings_rate: f64,
        current_retirement_savings: f64,
        full_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            date_of_birth: parse_date_of_birth(date_of_birth)?,
            household_income: finite("household_income", household_income)?,
            current_savings_rate: finite("current_savings_rate", current_savings_rate)?,
            current_retirement_savings: finite("current_retirement_savings", current_retirement_savings)?,
            full_name: full_name.into(),
            address: address.into(),
        })
    }
}

impl ProfileAssumptions {
    pub fn new(
        pre_retirement_income_percent: f64,
        life_expectancy: u32,
        expected_rate_of_return: f64,
        retirement_age: u32,
    ) -> Result<Self> {
        Ok(Self {
            pre_retirement_income_percent: finite("pre_retirement_income_percent", pre_retirement_income_percent)?,
            life_expectancy: check_age("life_expectancy", life_expectancy)?,
            expected_rate_of_return: finite("expected_rate_of_return", expected_rate_of_return)?,
            retirement_age: check_age("retirement_age", retirement_age)?,
        })
    }
}

impl Profile {
    pub fn new(user_info: ProfileInfo, assumptions: ProfileAssumptions) -> Self {
        Self { user_info, assumptions }
    }

    /// Parse and validate a profile from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawProfile = serde_json::from_str(json)?;
        raw.validate()
    }

    /// Validate a profile from an already-parsed JSON value
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawProfile = serde_json::from_value(value)?;
        raw.validate()
    }
}

fn parse_date_of_birth(value: &str) -> Result<CalendarDate> {
    CalendarDate::parse(value).map_err(|e| match e {
        CalculatorError::Validation { message, .. } => CalculatorError::validation("date_of_birth", message),
        other => other,
    })
}

/// Reject ages past [`MAX_AGE_YEARS`]
pub(crate) fn check_age(field: &str, years: u32) -> Result<u32> {
    if years <= MAX_AGE_YEARS {
        Ok(years)
    } else {
        Err(CalculatorError::validation(
            field,
            format!("{} years is beyond the supported maximum of {}", years, MAX_AGE_YEARS),
        ))
    }
}

fn finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculatorError::validation(field, format!("{} is not a finite number", value)))
    }
}

/// A loosely typed input cell
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    fn describe(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => format!("'{}'", s),
            FieldValue::Other(v) => v.to_string(),
        }
    }

    fn as_number(&self, field: &str) -> Result<f64> {
        let value = match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Other(_) => None,
        };
        match value {
            Some(n) => finite(field, n),
            None => Err(CalculatorError::validation(
                field,
                format!("expected a number, got {}", self.describe()),
            )),
        }
    }

    fn as_whole_years(&self, field: &str) -> Result<u32> {
        let value = match self {
            FieldValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => Some(*n as u32),
            FieldValue::Text(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        value.ok_or_else(|| {
            CalculatorError::validation(
                field,
                format!("expected a whole number of years, got {}", self.describe()),
            )
        })
    }

    fn as_text(&self, field: &str) -> Result<String> {
        match self {
            FieldValue::Text(s) => Ok(s.clone()),
            other => Err(CalculatorError::validation(
                field,
                format!("expected a string, got {}", other.describe()),
            )),
        }
    }
}

fn required<'a>(field: &str, value: &'a Option<FieldValue>) -> Result<&'a FieldValue> {
    value
        .as_ref()
        .ok_or_else(|| CalculatorError::validation(field, "missing required field"))
}

/// Unvalidated `user_info` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProfileInfo {
    #[serde(default)]
    pub date_of_birth: Option<FieldValue>,
    #[serde(default)]
    pub household_income: Option<FieldValue>,
    #[serde(default)]
    pub current_savings_rate: Option<FieldValue>,
    #[serde(default)]
    pub current_retirement_savings: Option<FieldValue>,
    #[serde(default)]
    pub full_name: Option<FieldValue>,
    #[serde(default)]
    pub address: Option<FieldValue>,
}

/// Unvalidated `assumptions` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProfileAssumptions {
    #[serde(default)]
    pub pre_retirement_income_percent: Option<FieldValue>,
    #[serde(default)]
    pub life_expectancy: Option<FieldValue>,
    #[serde(default)]
    pub expected_rate_of_return: Option<FieldValue>,
    #[serde(default)]
    pub retirement_age: Option<FieldValue>,
}

/// Unvalidated profile document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProfile {
    #[serde(default)]
    pub user_info: Option<RawProfileInfo>,
    #[serde(default)]
    pub assumptions: Option<RawProfileAssumptions>,
}

impl RawProfileInfo {
    fn validate(&self) -> Result<ProfileInfo> {
        let date_of_birth = required("date_of_birth", &self.date_of_birth)?.as_text("date_of_birth")?;
        ProfileInfo::new(
            &date_of_birth,
            required("household_income", &self.household_income)?.as_number("household_income")?,
            required("current_savings_rate", &self.current_savings_rate)?.as_number("current_savings_rate")?,
            required("current_retirement_savings", &self.current_retirement_savings)?
                .as_number("current_retirement_savings")?,
            required("full_name", &self.full_name)?.as_text("full_name")?,
            required("address", &self.address)?.as_text("address")?,
        )
    }
}

impl RawProfileAssumptions {
    fn validate(&self) -> Result<ProfileAssumptions> {
        ProfileAssumptions::new(
            required("pre_retirement_income_percent", &self.pre_retirement_income_percent)?
                .as_number("pre_retirement_income_percent")?,
            required("life_expectancy", &self.life_expectancy)?.as_whole_years("life_expectancy")?,
            required("expected_rate_of_return", &self.expected_rate_of_return)?
                .as_number("expected_rate_of_return")?,
            required("retirement_age", &self.retirement_age)?.as_whole_years("retirement_age")?,
        )
    }
}

impl RawProfile {
    pub fn validate(&self) -> Result<Profile> {
        let user_info = self
            .user_info
            .as_ref()
            .ok_or_else(|| CalculatorError::validation("user_info", "missing required section"))?
            .validate()?;
        let assumptions = self
            .assumptions
            .as_ref()
            .ok_or_else(|| CalculatorError::validation("assumptions", "missing required section"))?
            .validate()?;
        Ok(Profile::new(user_info, assumptions))
    }
}
