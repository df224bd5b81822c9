//! The quarterly turn engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{next_quarter, BalanceConfig, CompanyState, Decisions, GameStatus, Outcomes};
use sim_econ::{
    demand, grow_quality, hiring_cost, payroll, round_money, units_sold, DEFAULT_MARKET_FACTOR,
};
use tracing::trace;

/// Replacement state and outcome record produced by one quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub state: CompanyState,
    pub outcome: Outcomes,
}

/// Simulate one quarter.
///
/// Total over trusted input: range checks belong at the application
/// boundary (see `sim_core::validate_decisions`). Terminal games are not
/// rejected here either; callers stop advancing once status is won or lost.
/// Money is rounded to cents only on the returned values.
pub fn advance(
    state: &CompanyState,
    decisions: &Decisions,
    market_factor: f64,
    cfg: &BalanceConfig,
) -> TurnResult {
    debug_assert!(decisions.price > Decimal::ZERO, "price must be positive");
    debug_assert!(
        market_factor.is_finite() && market_factor >= 0.0,
        "market factor must be finite and non-negative"
    );

    let new_engineers = state.engineers + decisions.engineers_to_hire;
    let new_sales = state.sales + decisions.sales_to_hire;
    let hiring = hiring_cost(decisions.total_hires(), cfg);

    let new_quality = grow_quality(state.quality, new_engineers, cfg);
    let per_rep = demand(new_quality, decisions.price, cfg);
    let units = units_sold(per_rep, new_sales, market_factor, cfg);
    let revenue = decisions.price * Decimal::from(units);

    let salaries = payroll(decisions.salary_pct, new_engineers + new_sales, cfg);
    let net_income = revenue - salaries;
    let new_cash = round_money(state.cash + net_income - hiring);
    let new_cumulative_profit = round_money(state.cumulative_profit + net_income);

    let (next_year, next_q) = next_quarter(state.current_year, state.current_quarter);
    let status = if new_cash <= Decimal::ZERO {
        GameStatus::Lost
    } else if next_year > cfg.max_year {
        GameStatus::Won
    } else {
        GameStatus::Active
    };

    trace!(
        year = state.current_year,
        quarter = state.current_quarter,
        units,
        %revenue,
        %net_income,
        %new_cash,
        ?status,
        "quarter simulated"
    );

    let outcome = Outcomes {
        revenue,
        units_sold: units,
        payroll: salaries,
        hiring_cost: hiring,
        costs: salaries + hiring,
        net_income,
        new_cash,
        new_quality,
        new_engineers,
        new_sales,
        new_cumulative_profit,
        status,
    };
    let state = CompanyState {
        status,
        current_year: next_year,
        current_quarter: next_q,
        cash: new_cash,
        quality: new_quality,
        engineers: new_engineers,
        sales: new_sales,
        cumulative_profit: new_cumulative_profit,
    };
    TurnResult { state, outcome }
}

/// `advance` with the reference balance and a neutral market.
pub fn advance_default(state: &CompanyState, decisions: &Decisions) -> TurnResult {
    advance(state, decisions, DEFAULT_MARKET_FACTOR, &BalanceConfig::default())
}
