#![deny(warnings)]

//! Core domain models and invariants for Startup Tycoon.
//!
//! This crate defines the serializable types shared by the simulation and
//! advisory engines, the balance configuration, and validation helpers used
//! at the application boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Quarters in a simulated year.
pub const QUARTERS_PER_YEAR: u8 = 4;

/// Longest game a balance file may configure.
pub const MAX_YEAR_LIMIT: u32 = 1000;

/// Lifecycle status of a game. `Won` and `Lost` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Active)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameStatus::Active => "active",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        };
        f.write_str(s)
    }
}

/// Snapshot of a company at the start of a quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyState {
    /// Game status; terminal once won or lost.
    pub status: GameStatus,
    /// Simulated year, starting at 1.
    pub current_year: u32,
    /// Quarter within the year, in [1,4].
    pub current_quarter: u8,
    /// Cash reserves in USD.
    pub cash: Decimal,
    /// Product quality score in [0,100].
    pub quality: f64,
    /// Engineering headcount.
    pub engineers: u32,
    /// Sales headcount.
    pub sales: u32,
    /// Sum of net income over all played quarters.
    pub cumulative_profit: Decimal,
}

impl CompanyState {
    /// Fresh game at Y1 Q1 using the starting values of `cfg`.
    pub fn new_game(cfg: &BalanceConfig) -> Self {
        Self {
            status: GameStatus::Active,
            current_year: 1,
            current_quarter: 1,
            cash: cfg.starting_cash,
            quality: cfg.starting_quality,
            engineers: cfg.starting_engineers,
            sales: cfg.starting_sales,
            cumulative_profit: Decimal::ZERO,
        }
    }

    /// Total engineers plus sales staff.
    pub fn headcount(&self) -> u32 {
        self.engineers + self.sales
    }

    /// Quarters left until the final quarter of `max_year`.
    ///
    /// Zero while playing the last quarter of the last year; saturates at
    /// zero once the calendar has run past it.
    pub fn quarters_remaining(&self, max_year: u32) -> u32 {
        if self.current_year > max_year {
            return 0;
        }
        let years_left = max_year - self.current_year;
        let left_in_year = u32::from(QUARTERS_PER_YEAR.saturating_sub(self.current_quarter));
        years_left
            .saturating_mul(u32::from(QUARTERS_PER_YEAR))
            .saturating_add(left_in_year)
    }
}

/// Calendar position one quarter after `(year, quarter)`.
pub fn next_quarter(year: u32, quarter: u8) -> (u32, u8) {
    if quarter >= QUARTERS_PER_YEAR {
        (year + 1, 1)
    } else {
        (year, quarter + 1)
    }
}

/// Player (or bot) choices for a single quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decisions {
    /// Unit price in USD (> 0).
    pub price: Decimal,
    /// Engineers hired this quarter.
    pub engineers_to_hire: u32,
    /// Sales staff hired this quarter.
    pub sales_to_hire: u32,
    /// Salary as a percentage of the industry base (100 = market rate).
    pub salary_pct: Decimal,
}

impl Decisions {
    pub fn total_hires(&self) -> u32 {
        self.engineers_to_hire + self.sales_to_hire
    }
}

/// Result of one simulated quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcomes {
    pub revenue: Decimal,
    pub units_sold: u64,
    /// Salaries for the post-hire team.
    pub payroll: Decimal,
    /// One-time cost of this quarter's hires.
    pub hiring_cost: Decimal,
    /// Payroll plus hiring cost.
    pub costs: Decimal,
    /// Revenue minus payroll.
    pub net_income: Decimal,
    pub new_cash: Decimal,
    pub new_quality: f64,
    pub new_engineers: u32,
    pub new_sales: u32,
    pub new_cumulative_profit: Decimal,
    pub status: GameStatus,
}

/// Append-only history entry for a played quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Year the decisions were played in.
    pub year: u32,
    /// Quarter the decisions were played in.
    pub quarter: u8,
    pub decisions: Decisions,
    pub outcomes: Outcomes,
}

/// Game balance constants.
///
/// `Default` is the reference balance set; alternate sets can be loaded
/// from YAML for tuning and tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// One-time cost per hired person in USD.
    pub hiring_cost_per_person: Decimal,
    /// Fully loaded quarterly cost of one person at 100% salary.
    pub industry_base_salary: Decimal,
    /// Quality points gained per engineer per quarter.
    pub quality_gain_per_engineer: f64,
    /// Demand contributed per quality point.
    pub quality_demand_weight: f64,
    /// Demand removed per USD of price.
    pub price_demand_weight: f64,
    /// Fraction of demand each salesperson converts into units.
    pub sales_conversion: f64,
    /// Quality ceiling.
    pub max_quality: f64,
    /// Last playable year; surviving past it wins.
    pub max_year: u32,
    pub starting_cash: Decimal,
    pub starting_quality: f64,
    pub starting_engineers: u32,
    pub starting_sales: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            hiring_cost_per_person: Decimal::new(5_000, 0),
            industry_base_salary: Decimal::new(30_000, 0),
            quality_gain_per_engineer: 0.5,
            quality_demand_weight: 10.0,
            price_demand_weight: 0.0001,
            sales_conversion: 0.5,
            max_quality: 100.0,
            max_year: 10,
            starting_cash: Decimal::new(1_000_000, 0),
            starting_quality: 50.0,
            starting_engineers: 4,
            starting_sales: 2,
        }
    }
}

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid balance value: {0}")]
    Invalid(String),
}

impl BalanceConfig {
    /// Parse a YAML document; omitted keys keep their reference values.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: BalanceConfig = serde_yaml::from_str(text)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Load a YAML balance file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_YEAR_LIMIT).contains(&self.max_year) {
            return Err(ConfigError::Invalid(format!(
                "max_year must be within [1, {MAX_YEAR_LIMIT}]"
            )));
        }
        if !(self.max_quality.is_finite() && self.max_quality > 0.0) {
            return Err(ConfigError::Invalid("max_quality must be > 0".into()));
        }
        if !(0.0..=self.max_quality).contains(&self.starting_quality) {
            return Err(ConfigError::Invalid(
                "starting_quality must be within [0, max_quality]".into(),
            ));
        }
        let rates = [
            self.quality_gain_per_engineer,
            self.quality_demand_weight,
            self.price_demand_weight,
            self.sales_conversion,
        ];
        if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(ConfigError::Invalid(
                "rates and weights must be finite and non-negative".into(),
            ));
        }
        if self.hiring_cost_per_person < Decimal::ZERO || self.industry_base_salary < Decimal::ZERO
        {
            return Err(ConfigError::Invalid("costs must be non-negative".into()));
        }
        Ok(())
    }
}

/// Validation errors for boundary checks on caller input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("price {0} is outside the allowed range")]
    PriceOutOfRange(Decimal),
    #[error("cannot hire {0} people in one quarter")]
    TooManyHires(u32),
    #[error("salary {0}% is outside the allowed range")]
    SalaryOutOfRange(Decimal),
    #[error("quarter {0} is not in [1,4]")]
    InvalidQuarter(u8),
    #[error("year must be >= 1")]
    InvalidYear,
    #[error("quality {0} is outside [0,100]")]
    QualityOutOfRange(f64),
}

/// Accepted ranges for player decisions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionLimits {
    pub min_price: Decimal,
    pub max_price: Decimal,
    /// Per role, per quarter.
    pub max_hires: u32,
    pub min_salary_pct: Decimal,
    pub max_salary_pct: Decimal,
}

impl Default for DecisionLimits {
    fn default() -> Self {
        Self {
            min_price: Decimal::ONE,
            max_price: Decimal::new(1_000, 0),
            max_hires: 20,
            min_salary_pct: Decimal::new(50, 0),
            max_salary_pct: Decimal::new(200, 0),
        }
    }
}

/// Validate decisions against the limits accepted at the application boundary.
pub fn validate_decisions(d: &Decisions, limits: &DecisionLimits) -> Result<(), ValidationError> {
    if d.price < limits.min_price || d.price > limits.max_price {
        return Err(ValidationError::PriceOutOfRange(d.price));
    }
    for hires in [d.engineers_to_hire, d.sales_to_hire] {
        if hires > limits.max_hires {
            return Err(ValidationError::TooManyHires(hires));
        }
    }
    if d.salary_pct < limits.min_salary_pct || d.salary_pct > limits.max_salary_pct {
        return Err(ValidationError::SalaryOutOfRange(d.salary_pct));
    }
    Ok(())
}

/// Validate the structural invariants of a state snapshot.
pub fn validate_state(s: &CompanyState) -> Result<(), ValidationError> {
    if s.current_year == 0 {
        return Err(ValidationError::InvalidYear);
    }
    if !(1..=QUARTERS_PER_YEAR).contains(&s.current_quarter) {
        return Err(ValidationError::InvalidQuarter(s.current_quarter));
    }
    if !(s.quality.is_finite() && (0.0..=100.0).contains(&s.quality)) {
        return Err(ValidationError::QualityOutOfRange(s.quality));
    }
    Ok(())
}
