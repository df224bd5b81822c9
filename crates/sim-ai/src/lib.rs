#![deny(warnings)]

//! Rule-based advisors: strategy recommendations and situation briefs.
//!
//! Every function here is a pure function of the company state and the
//! advisor configuration. Advisors never see decisions, outcomes or the
//! market factor.

mod narrative;

pub use narrative::{cash_level, format_usd, quality_level, CashLevel, QualityLevel};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{BalanceConfig, CompanyState, ConfigError, Decisions};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// Named advisory strategies, in presentation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Capital preservation.
    Cfo,
    /// Market capture.
    Growth,
    /// Premium product.
    Quality,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Cfo, Strategy::Growth, Strategy::Quality];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Cfo => "cfo",
            Strategy::Growth => "growth",
            Strategy::Quality => "quality",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| AdvisorError::UnknownStrategy(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AdvisorError {
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// A suggested decision set with its justification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub decisions: Decisions,
    pub reasoning: String,
}

/// Thresholds used by the strategies and the narrative buckets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Last playable year; must match the engine's balance.
    pub max_year: u32,
    /// CFO switches to survival mode below this cash.
    pub cfo_low_cash: Decimal,
    /// Growth hires in large batches above this cash.
    pub growth_hiring_cash: Decimal,
    /// Growth cuts price and raises pay above this cash.
    pub growth_surplus_cash: Decimal,
    /// Quality above this earns premium pricing.
    pub premium_quality: f64,
    /// Hiring engineers below this count (CFO).
    pub cfo_engineer_target: u32,
    /// Hiring sales below this count (CFO).
    pub cfo_sales_target: u32,
    /// Hiring sales below this count (quality, non-premium).
    pub quality_sales_target: u32,
    /// Late-game freeze windows, in quarters remaining.
    pub cfo_freeze_quarters: u32,
    pub growth_freeze_quarters: u32,
    pub quality_freeze_quarters: u32,
    /// CFO talks about the finish line within this many quarters.
    pub cfo_stretch_quarters: u32,
    pub cash_critical: Decimal,
    pub cash_low: Decimal,
    pub cash_strong: Decimal,
    pub quality_poor: f64,
    /// Brief-only: quality below this is flagged as hurting sales.
    pub quality_critical: f64,
    pub quality_excellent: f64,
    /// Growth calls a team this small under-scaled.
    pub small_team: u32,
    /// Brief flags payroll for teams larger than this.
    pub large_team: u32,
    pub final_year_quarters: u32,
    pub horizon_quarters: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            max_year: BalanceConfig::default().max_year,
            cfo_low_cash: Decimal::new(300_000, 0),
            growth_hiring_cash: Decimal::new(500_000, 0),
            growth_surplus_cash: Decimal::new(1_200_000, 0),
            premium_quality: 70.0,
            cfo_engineer_target: 6,
            cfo_sales_target: 4,
            quality_sales_target: 3,
            cfo_freeze_quarters: 4,
            growth_freeze_quarters: 6,
            quality_freeze_quarters: 6,
            cfo_stretch_quarters: 8,
            cash_critical: Decimal::new(200_000, 0),
            cash_low: Decimal::new(500_000, 0),
            cash_strong: Decimal::new(1_500_000, 0),
            quality_poor: 40.0,
            quality_critical: 30.0,
            quality_excellent: 70.0,
            small_team: 8,
            large_team: 20,
            final_year_quarters: 4,
            horizon_quarters: 12,
        }
    }
}

impl AdvisorConfig {
    /// Default thresholds with the horizon taken from `balance`.
    pub fn for_balance(balance: &BalanceConfig) -> Self {
        Self {
            max_year: balance.max_year,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

fn plan(price: i64, engineers_to_hire: u32, sales_to_hire: u32, salary_pct: i64) -> Decisions {
    Decisions {
        price: Decimal::new(price, 0),
        engineers_to_hire,
        sales_to_hire,
        salary_pct: Decimal::new(salary_pct, 0),
    }
}

/// Strategy evaluator bound to a set of thresholds.
#[derive(Clone, Debug, Default)]
pub struct Advisor {
    cfg: AdvisorConfig,
}

impl Advisor {
    pub fn new(cfg: AdvisorConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.cfg
    }

    fn quarters_left(&self, state: &CompanyState) -> u32 {
        state.quarters_remaining(self.cfg.max_year)
    }

    /// Decision set for `strategy` without the narrative.
    pub fn decide(&self, strategy: Strategy, state: &CompanyState) -> Decisions {
        match strategy {
            Strategy::Cfo => self.cfo(state),
            Strategy::Growth => self.growth(state),
            Strategy::Quality => self.quality(state),
        }
    }

    fn cfo(&self, state: &CompanyState) -> Decisions {
        let c = &self.cfg;
        if self.quarters_left(state) <= c.cfo_freeze_quarters || state.cash < c.cfo_low_cash {
            return plan(400, 0, 0, 80);
        }
        plan(
            300,
            u32::from(state.engineers < c.cfo_engineer_target),
            u32::from(state.sales < c.cfo_sales_target),
            90,
        )
    }

    fn growth(&self, state: &CompanyState) -> Decisions {
        let c = &self.cfg;
        if self.quarters_left(state) <= c.growth_freeze_quarters {
            return plan(250, 0, 0, 100);
        }
        let batch = if state.cash > c.growth_hiring_cash { 3 } else { 1 };
        if state.cash > c.growth_surplus_cash {
            plan(150, batch, batch, 120)
        } else {
            plan(200, batch, batch, 100)
        }
    }

    fn quality(&self, state: &CompanyState) -> Decisions {
        let c = &self.cfg;
        let premium = state.quality > c.premium_quality;
        let price = if premium { 500 } else { 400 };
        if self.quarters_left(state) <= c.quality_freeze_quarters {
            return plan(price, 0, 0, 100);
        }
        if premium {
            // Quality is already high; shift headcount toward selling it.
            plan(price, 1, 1, 140)
        } else {
            plan(price, 2, u32::from(state.sales < c.quality_sales_target), 140)
        }
    }

    /// Recommendation for one strategy.
    pub fn recommend(&self, strategy: Strategy, state: &CompanyState) -> Recommendation {
        let decisions = self.decide(strategy, state);
        let reasoning = narrative::reasoning(&self.cfg, strategy, state, &decisions);
        trace!(%strategy, price = %decisions.price, "recommendation built");
        Recommendation {
            strategy,
            decisions,
            reasoning,
        }
    }

    /// Recommendation for a strategy given by name.
    pub fn recommend_named(
        &self,
        name: &str,
        state: &CompanyState,
    ) -> Result<Recommendation, AdvisorError> {
        let strategy: Strategy = name.parse()?;
        Ok(self.recommend(strategy, state))
    }

    /// One recommendation per strategy, in `Strategy::ALL` order.
    pub fn recommend_all(&self, state: &CompanyState) -> Vec<Recommendation> {
        Strategy::ALL
            .into_iter()
            .map(|s| self.recommend(s, state))
            .collect()
    }

    /// Strategy-independent summary of risks and opportunities.
    pub fn situation_brief(&self, state: &CompanyState) -> String {
        narrative::brief(&self.cfg, state)
    }
}

/// `Advisor::recommend` with default thresholds.
pub fn recommend(strategy: Strategy, state: &CompanyState) -> Recommendation {
    Advisor::default().recommend(strategy, state)
}

/// `Advisor::recommend_named` with default thresholds.
pub fn recommend_named(name: &str, state: &CompanyState) -> Result<Recommendation, AdvisorError> {
    Advisor::default().recommend_named(name, state)
}

/// `Advisor::recommend_all` with default thresholds.
pub fn recommend_all(state: &CompanyState) -> Vec<Recommendation> {
    Advisor::default().recommend_all(state)
}

/// `Advisor::situation_brief` with default thresholds.
pub fn situation_brief(state: &CompanyState) -> String {
    Advisor::default().situation_brief(state)
}
