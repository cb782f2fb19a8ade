//! Retirement Calculator CLI
//!
//! Projects retirement savings for the profiles in a JSON or CSV file

use anyhow::{Context, Result};
use clap::Parser;
use retirement_calculator::profile::{load_profiles, load_profiles_csv};
use retirement_calculator::projection::{
    DEFAULT_INCOME_INCREASE_RATE, DEFAULT_INFLATION_RATE, DEFAULT_RETIREMENT_RATE_OF_RETURN,
    DEFAULT_TIMES_COMPOUNDED_PER_YEAR,
};
use retirement_calculator::projection::SavingsBreakdown;
use retirement_calculator::{Profile, ProjectionConfig, ProjectionRunner, TimingMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "retirement_calculator", version, about = "Project retirement savings against retirement needs")]
struct Cli {
    /// Profile file: a JSON object, a JSON array of objects, or CSV with --csv
    profile: PathBuf,

    /// Read the profile file as CSV, one profile per row
    #[arg(long)]
    csv: bool,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    as_of: Option<String>,

    /// Measure exact years and days to retirement instead of the age difference
    #[arg(long)]
    exact: bool,

    /// Compounding periods per year
    #[arg(long, default_value_t = DEFAULT_TIMES_COMPOUNDED_PER_YEAR)]
    times_compounded_per_year: u32,

    /// Annual income growth before retirement, in percent
    #[arg(long, default_value_t = DEFAULT_INCOME_INCREASE_RATE)]
    income_increase_rate: f64,

    /// Annual inflation during retirement, in percent
    #[arg(long, default_value_t = DEFAULT_INFLATION_RATE)]
    inflation_rate: f64,

    /// Annual return during retirement, in percent
    #[arg(long, default_value_t = DEFAULT_RETIREMENT_RATE_OF_RETURN)]
    retirement_rate_of_return: f64,

    /// Print each profile as JSON after its result
    #[arg(long)]
    see_profile: bool,

    /// Print contributions vs. investment growth behind the savings figure
    #[arg(long)]
    breakdown: bool,

    /// Emit results as a JSON array instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            times_compounded_per_year: self.times_compounded_per_year,
            income_increase_rate: self.income_increase_rate,
            inflation_rate: self.inflation_rate,
            retirement_rate_of_return: self.retirement_rate_of_return,
            timing: if self.exact { TimingMode::Exact } else { TimingMode::Simplified },
            as_of_date: self.as_of.clone(),
        }
    }
}

/// Whole dollars with thousands separators, truncated toward zero
fn format_dollars(amount: f64) -> String {
    let whole = amount.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if whole < 0 {
        out.push('-');
    }
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn print_breakdown(profile: &Profile, breakdown: &SavingsBreakdown) {
    println!("  Compounding periods:  {}", breakdown.periods);
    println!("  Current savings:      {}", format_dollars(profile.user_info.current_retirement_savings));
    println!("  Future contributions: {}", format_dollars(breakdown.total_contributions()));
    println!("  Investment growth:    {}", format_dollars(breakdown.investment_growth()));
    println!();
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let profiles = if cli.csv {
        load_profiles_csv(&cli.profile)
    } else {
        load_profiles(&cli.profile)
    }
    .with_context(|| format!("Failed to load profiles from {}", cli.profile.display()))?;

    let runner = ProjectionRunner::new(cli.config()).context("Invalid projection settings")?;
    let results = runner.run_batch_detailed(&profiles);

    if cli.json {
        let payload: Vec<serde_json::Value> = results
            .iter()
            .map(|result| match result {
                Ok((estimate, _)) => serde_json::json!({ "saved": estimate.saved, "needed": estimate.needed }),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let mut failures = 0;
    for (profile, result) in profiles.iter().zip(results) {
        match result {
            Ok((estimate, breakdown)) => {
                println!("\n{}", profile.user_info.full_name);
                println!("To retire at age {}:\n", profile.assumptions.retirement_age);
                println!("You will need {}\n", format_dollars(estimate.needed));
                println!("You will have saved {}\n", format_dollars(estimate.saved));
                if !estimate.on_track() {
                    println!("Shortfall: {}\n", format_dollars(estimate.shortfall()));
                }
                if cli.breakdown {
                    print_breakdown(profile, &breakdown);
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("\n{}: projection failed: {}\n", profile.user_info.full_name, e);
            }
        }
        if cli.see_profile {
            println!("{}\n", serde_json::to_string(profile)?);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} projections failed", failures, profiles.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0.0), "$0");
        assert_eq!(format_dollars(999.99), "$999");
        assert_eq!(format_dollars(1000.0), "$1,000");
        assert_eq!(format_dollars(4_581_215.7), "$4,581,215");
        assert_eq!(format_dollars(-12_345.6), "-$12,345");
    }

    #[test]
    fn test_cli_config() {
        let cli = Cli::parse_from(["retirement_calculator", "p.json", "--exact", "--as-of", "2024-06-01"]);
        let config = cli.config();
        assert_eq!(config.timing, TimingMode::Exact);
        assert_eq!(config.as_of_date.as_deref(), Some("2024-06-01"));
        assert_eq!(config.income_increase_rate, DEFAULT_INCOME_INCREASE_RATE);
    }
}
