//! Load profiles from JSON documents or flat CSV files

use super::data::{FieldValue, RawProfile, RawProfileAssumptions, RawProfileInfo};
use super::Profile;
use crate::error::{CalculatorError, Result};
use csv::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw CSV row, one column per profile field
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date_of_birth: String,
    household_income: String,
    current_savings_rate: String,
    current_retirement_savings: String,
    full_name: String,
    address: String,
    pre_retirement_income_percent: String,
    life_expectancy: String,
    expected_rate_of_return: String,
    retirement_age: String,
}

impl CsvRow {
    fn to_profile(self) -> Result<Profile> {
        let text = |s: String| Some(FieldValue::Text(s));
        let raw = RawProfile {
            user_info: Some(RawProfileInfo {
                date_of_birth: text(self.date_of_birth),
                household_income: text(self.household_income),
                current_savings_rate: text(self.current_savings_rate),
                current_retirement_savings: text(self.current_retirement_savings),
                full_name: text(self.full_name),
                address: text(self.address),
            }),
            assumptions: Some(RawProfileAssumptions {
                pre_retirement_income_percent: text(self.pre_retirement_income_percent),
                life_expectancy: text(self.life_expectancy),
                expected_rate_of_return: text(self.expected_rate_of_return),
                retirement_age: text(self.retirement_age),
            }),
        };
        raw.validate()
    }
}

/// Load profiles from a JSON file holding one profile object or an array of them
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>> {
    let file = File::open(path)?;
    load_profiles_from_reader(file)
}

/// Load profiles from any reader of JSON
pub fn load_profiles_from_reader<R: Read>(reader: R) -> Result<Vec<Profile>> {
    let document: serde_json::Value = serde_json::from_reader(reader)?;
    match document {
        serde_json::Value::Array(items) => items.into_iter().map(Profile::from_json_value).collect(),
        serde_json::Value::Object(_) => Ok(vec![Profile::from_json_value(document)?]),
        other => Err(CalculatorError::validation(
            "profile",
            format!("expected a profile object or an array of profiles, got {}", other),
        )),
    }
}

/// Load all profiles from a CSV file
pub fn load_profiles_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>> {
    let reader = Reader::from_path(path)?;
    collect_csv(reader)
}

/// Load CSV profiles from any reader (e.g., string buffer, network stream)
pub fn load_profiles_csv_from_reader<R: Read>(reader: R) -> Result<Vec<Profile>> {
    collect_csv(Reader::from_reader(reader))
}

fn collect_csv<R: Read>(mut reader: Reader<R>) -> Result<Vec<Profile>> {
    let mut profiles = Vec::new();

    for (line, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        let profile = row.to_profile().map_err(|e| match e {
            CalculatorError::Validation { field, message } => {
                CalculatorError::validation(field, format!("row {}: {}", line + 1, message))
            }
            other => other,
        })?;
        profiles.push(profile);
    }

    Ok(profiles)
}
