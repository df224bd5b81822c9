#![deny(warnings)]

//! Economic models: per-quarter formulas for Startup Tycoon.
//!
//! This module provides the building blocks the turn engine composes:
//! - Hiring and payroll costs
//! - Quality growth from the engineering team
//! - Price/quality demand and sales-force conversion into units
//! - Money rounding and the daily market-factor curve

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sim_core::BalanceConfig;

/// Market factor used when no external value is available.
pub const DEFAULT_MARKET_FACTOR: f64 = 1.0;

/// Peak deviation of the daily market curve from 1.0.
pub const MARKET_AMPLITUDE: f64 = 0.2;

const DAYS_PER_YEAR: f64 = 365.0;

/// One-time cost of hiring `hires` people.
///
/// Example:
/// let c = hiring_cost(2, &BalanceConfig::default());
/// assert_eq!(c, Decimal::new(10_000, 0));
pub fn hiring_cost(hires: u32, cfg: &BalanceConfig) -> Decimal {
    Decimal::from(hires) * cfg.hiring_cost_per_person
}

/// Quarterly payroll for `headcount` people paid `salary_pct` percent of the
/// industry base salary.
///
/// Example:
/// let p = payroll(Decimal::new(100, 0), 8, &BalanceConfig::default());
/// assert_eq!(p, Decimal::new(240_000, 0));
pub fn payroll(salary_pct: Decimal, headcount: u32, cfg: &BalanceConfig) -> Decimal {
    let per_person = salary_pct / Decimal::new(100, 0) * cfg.industry_base_salary;
    per_person * Decimal::from(headcount)
}

/// Quality after one quarter of work by `engineers`, capped at `max_quality`.
///
/// Quality never decays on its own, so there is no floor clamp.
pub fn grow_quality(quality: f64, engineers: u32, cfg: &BalanceConfig) -> f64 {
    let gained = quality + f64::from(engineers) * cfg.quality_gain_per_engineer;
    gained.min(cfg.max_quality)
}

/// Per-salesperson demand at the given quality and price, floored at zero.
pub fn demand(quality: f64, price: Decimal, cfg: &BalanceConfig) -> f64 {
    let p = price.to_f64().unwrap_or_default();
    (quality * cfg.quality_demand_weight - p * cfg.price_demand_weight).max(0.0)
}

/// Units the sales force closes this quarter.
///
/// Rounds half away from zero and never goes below zero; a non-finite
/// product (e.g. a NaN market factor) sells nothing.
pub fn units_sold(demand: f64, sales: u32, market_factor: f64, cfg: &BalanceConfig) -> u64 {
    let raw = demand * f64::from(sales) * cfg.sales_conversion * market_factor;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round() as u64
}

/// Round a monetary amount to cents, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Deterministic daily market factor in [0.8, 1.2], rounded to 2 decimals.
///
/// A sine wave over the year: 1.0 on day 0, peaking around day 91 and
/// bottoming out around day 274.
pub fn market_factor_for_day(day_of_year: u32) -> f64 {
    let phase = f64::from(day_of_year) / DAYS_PER_YEAR * 2.0 * std::f64::consts::PI;
    let factor = 1.0 + MARKET_AMPLITUDE * phase.sin();
    (factor * 100.0).round() / 100.0
}

/// Market factor for a calendar date.
pub fn market_factor_on(date: NaiveDate) -> f64 {
    market_factor_for_day(date.ordinal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfg() -> BalanceConfig {
        BalanceConfig::default()
    }

    #[test]
    fn hiring_is_per_head() {
        assert_eq!(hiring_cost(0, &cfg()), Decimal::ZERO);
        assert_eq!(hiring_cost(10, &cfg()), Decimal::new(50_000, 0));
    }

    #[test]
    fn payroll_scales_with_salary_and_headcount() {
        assert_eq!(payroll(Decimal::new(100, 0), 8, &cfg()), Decimal::new(240_000, 0));
        assert_eq!(payroll(Decimal::new(200, 0), 16, &cfg()), Decimal::new(960_000, 0));
        assert_eq!(payroll(Decimal::new(75, 0), 2, &cfg()), Decimal::new(45_000, 0));
        assert_eq!(payroll(Decimal::new(150, 0), 0, &cfg()), Decimal::ZERO);
    }

    #[test]
    fn quality_caps_at_ceiling() {
        assert_eq!(grow_quality(50.0, 5, &cfg()), 52.5);
        assert_eq!(grow_quality(99.0, 10, &cfg()), 100.0);
        assert_eq!(grow_quality(0.0, 0, &cfg()), 0.0);
    }

    #[test]
    fn demand_floors_at_zero() {
        let d = demand(52.5, Decimal::new(100, 0), &cfg());
        assert!((d - 524.99).abs() < 1e-9);
        assert_eq!(demand(1.0, Decimal::new(1_000_000, 0), &cfg()), 0.0);
    }

    #[test]
    fn units_round_to_nearest() {
        assert_eq!(units_sold(524.99, 3, 1.0, &cfg()), 787);
        assert_eq!(units_sold(519.99, 2, 1.0, &cfg()), 520);
        assert_eq!(units_sold(524.99, 0, 1.0, &cfg()), 0);
        assert_eq!(units_sold(524.99, 3, 0.0, &cfg()), 0);
        assert_eq!(units_sold(524.99, 3, f64::NAN, &cfg()), 0);
    }

    #[test]
    fn money_rounds_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(12_345, 3)), Decimal::new(1_235, 2));
        assert_eq!(round_money(Decimal::new(-12_345, 3)), Decimal::new(-1_235, 2));
        assert_eq!(round_money(Decimal::new(838_700, 0)), Decimal::new(838_700, 0));
    }

    #[test]
    fn market_curve_landmarks() {
        assert_eq!(market_factor_for_day(0), 1.0);
        assert_eq!(market_factor_for_day(91), 1.2);
        assert_eq!(market_factor_for_day(274), 0.8);
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(market_factor_on(jan1), market_factor_for_day(1));
    }

    proptest! {
        #[test]
        fn market_factor_bounded(day in 0u32..=366) {
            let f = market_factor_for_day(day);
            prop_assert!((0.8..=1.2).contains(&f));
        }

        #[test]
        fn units_monotonic_in_market(d in 0.0f64..1_000.0, sales in 0u32..50, mf in 0.0f64..2.0) {
            let lo = units_sold(d, sales, mf, &cfg());
            let hi = units_sold(d, sales, mf * 2.0, &cfg());
            prop_assert!(hi >= lo);
        }

        #[test]
        fn demand_decreases_with_price(q in 0.0f64..=100.0, p in 1i64..100_000) {
            let cheap = demand(q, Decimal::new(p, 0), &cfg());
            let dear = demand(q, Decimal::new(p + 1_000, 0), &cfg());
            prop_assert!(cheap >= dear);
        }
    }
}
