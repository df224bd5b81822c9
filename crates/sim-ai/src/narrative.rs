//! Human-readable reasoning and situation briefs.

use crate::{AdvisorConfig, Strategy};
use rust_decimal::Decimal;
use sim_core::{CompanyState, Decisions};
use sim_econ::round_money;

/// Cash bucket shared by reasoning and briefs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CashLevel {
    Critical,
    Low,
    Moderate,
    Strong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityLevel {
    Poor,
    Moderate,
    Excellent,
}

pub fn cash_level(cfg: &AdvisorConfig, cash: Decimal) -> CashLevel {
    if cash < cfg.cash_critical {
        CashLevel::Critical
    } else if cash < cfg.cash_low {
        CashLevel::Low
    } else if cash > cfg.cash_strong {
        CashLevel::Strong
    } else {
        CashLevel::Moderate
    }
}

pub fn quality_level(cfg: &AdvisorConfig, quality: f64) -> QualityLevel {
    if quality < cfg.quality_poor {
        QualityLevel::Poor
    } else if quality > cfg.quality_excellent {
        QualityLevel::Excellent
    } else {
        QualityLevel::Moderate
    }
}

/// Format a USD amount as `$1,234,567.89` (`-$…` when negative).
pub fn format_usd(amount: Decimal) -> String {
    let cents = round_money(amount);
    let sign = if cents < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", cents.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac}")
}

fn pct(quality: f64) -> String {
    format!("{quality:.1}%")
}

pub(crate) fn reasoning(
    cfg: &AdvisorConfig,
    strategy: Strategy,
    state: &CompanyState,
    plan: &Decisions,
) -> String {
    let cash = format_usd(state.cash);
    let price = format_usd(plan.price);
    let left = state.quarters_remaining(cfg.max_year);
    let team = state.headcount();
    let finish = cfg.max_year;

    match strategy {
        Strategy::Cfo => match cash_level(cfg, state.cash) {
            CashLevel::Critical => format!(
                "URGENT: cash at {cash} is dangerously low. Freeze hiring, price at {price} and \
                 trim salaries to {}% to survive.",
                plan.salary_pct
            ),
            CashLevel::Low => format!(
                "Cash reserves at {cash} need protection. Price at {price} with minimal hiring \
                 and build runway before scaling."
            ),
            _ if left <= cfg.cfo_stretch_quarters => format!(
                "{left} quarters to the Year {finish} finish. Hold pricing at {price} and keep \
                 operations lean to close out the win."
            ),
            _ => format!(
                "With {cash} in reserves, stay balanced: price at {price}, hire conservatively \
                 (team: {team}) and protect margins at {}% salary.",
                plan.salary_pct
            ),
        },
        Strategy::Growth => {
            if left <= cfg.growth_freeze_quarters {
                return format!(
                    "{left} quarters left: switching to survival mode. Stop hiring and price at \
                     {price} for steady revenue to cross the Year {finish} line with cash in the bank."
                );
            }
            match cash_level(cfg, state.cash) {
                CashLevel::Critical => format!(
                    "Cash at {cash} is too thin for aggressive growth. Hire only {}+{} at {price} \
                     and consider the CFO plan until reserves recover.",
                    plan.engineers_to_hire, plan.sales_to_hire
                ),
                CashLevel::Strong => format!(
                    "A {cash} war chest enables maximum aggression. Price low at {price}, hire \
                     {}+{} and pay {}% of market to scale while the runway lasts.",
                    plan.engineers_to_hire, plan.sales_to_hire, plan.salary_pct
                ),
                _ if team < cfg.small_team => format!(
                    "A team of {team} is too small to scale. Hire {} engineers and {} sales at \
                     {price} pricing, even if margins are thin short-term.",
                    plan.engineers_to_hire, plan.sales_to_hire
                ),
                _ => format!(
                    "Scale with {cash} available. Low pricing at {price} captures volume; keep \
                     hiring (currently {team} staff)."
                ),
            }
        }
        Strategy::Quality => {
            let quality = pct(state.quality);
            if left <= cfg.quality_freeze_quarters {
                return format!(
                    "{left} quarters to the finish. Freeze hiring and ride premium pricing at \
                     {price}; quality at {quality} should carry the company home."
                );
            }
            match quality_level(cfg, state.quality) {
                QualityLevel::Poor => format!(
                    "Quality at {quality} is hurting sales badly. Add {} engineers at {}% salary \
                     to attract top talent; premium pricing follows quality.",
                    plan.engineers_to_hire, plan.salary_pct
                ),
                QualityLevel::Excellent => format!(
                    "Quality at {quality} justifies premium pricing at {price}. With {} engineers \
                     maintaining it, shift hiring toward sales to monetize the product.",
                    state.engineers
                ),
                QualityLevel::Moderate => format!(
                    "Build product excellence from {quality} with {} new engineers at {}% salary. \
                     Price at {price}; customers pay more for quality. Currently {} engineers.",
                    plan.engineers_to_hire, plan.salary_pct, state.engineers
                ),
            }
        }
    }
}

pub(crate) fn brief(cfg: &AdvisorConfig, state: &CompanyState) -> String {
    let mut parts: Vec<String> = Vec::new();
    let cash = format_usd(state.cash);

    match cash_level(cfg, state.cash) {
        CashLevel::Critical => parts.push(format!("CASH CRITICAL at {cash}, bankruptcy risk is high")),
        CashLevel::Low => parts.push(format!("Cash reserves are running low at {cash}")),
        CashLevel::Strong => parts.push(format!("Strong cash position of {cash} for expansion")),
        CashLevel::Moderate => {}
    }

    if state.quality < cfg.quality_critical {
        parts.push(format!("Product quality at {} is severely impacting sales", pct(state.quality)));
    } else if state.quality > cfg.quality_excellent {
        parts.push(format!(
            "Excellent product quality at {} is driving premium demand",
            pct(state.quality)
        ));
    }

    if state.engineers == 0 {
        parts.push("No engineers, so quality will stagnate".to_string());
    }
    if state.sales == 0 {
        parts.push("No sales team, so the revenue pipeline is empty".to_string());
    }
    if state.headcount() > cfg.large_team {
        parts.push(format!(
            "Large team of {}, payroll is a significant cost",
            state.headcount()
        ));
    }

    // No countdown once the game is decided or the calendar ran past the end.
    if !state.status.is_terminal() && state.current_year <= cfg.max_year {
        let left = state.quarters_remaining(cfg.max_year);
        if left <= cfg.final_year_quarters {
            parts.push("Final year! Just survive to win".to_string());
        } else if left <= cfg.horizon_quarters {
            parts.push(format!("Less than {} years to the finish line", cfg.horizon_quarters / 4));
        }
    }

    if parts.is_empty() {
        return format!(
            "Steady state at Y{} Q{}. Evaluate advisor strategies to optimize your next move.",
            state.current_year, state.current_quarter
        );
    }
    parts.join(". ") + "."
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::GameStatus;

    fn state(cash: i64, quality: f64, engineers: u32, sales: u32) -> CompanyState {
        CompanyState {
            status: GameStatus::Active,
            current_year: 3,
            current_quarter: 2,
            cash: Decimal::new(cash, 0),
            quality,
            engineers,
            sales,
            cumulative_profit: Decimal::ZERO,
        }
    }

    #[test]
    fn usd_grouping() {
        assert_eq!(format_usd(Decimal::new(1_000_000, 0)), "$1,000,000.00");
        assert_eq!(format_usd(Decimal::new(999, 0)), "$999.00");
        assert_eq!(format_usd(Decimal::new(123_456_789, 2)), "$1,234,567.89");
        assert_eq!(format_usd(Decimal::new(-8_093_005, 1)), "-$809,300.50");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
        assert_eq!(format_usd(Decimal::new(100_000, 0)), "$100,000.00");
    }

    #[test]
    fn buckets() {
        let cfg = AdvisorConfig::default();
        assert_eq!(cash_level(&cfg, Decimal::new(199_999, 0)), CashLevel::Critical);
        assert_eq!(cash_level(&cfg, Decimal::new(200_000, 0)), CashLevel::Low);
        assert_eq!(cash_level(&cfg, Decimal::new(500_000, 0)), CashLevel::Moderate);
        assert_eq!(cash_level(&cfg, Decimal::new(1_500_001, 0)), CashLevel::Strong);
        assert_eq!(quality_level(&cfg, 39.9), QualityLevel::Poor);
        assert_eq!(quality_level(&cfg, 70.0), QualityLevel::Moderate);
        assert_eq!(quality_level(&cfg, 70.1), QualityLevel::Excellent);
    }

    #[test]
    fn reasoning_quotes_state_values() {
        let cfg = AdvisorConfig::default();
        let s = state(150_000, 52.5, 4, 2);
        let plan = crate::Advisor::default().decide(Strategy::Cfo, &s);
        let text = reasoning(&cfg, Strategy::Cfo, &s, &plan);
        assert!(text.starts_with("URGENT"));
        assert!(text.contains("$150,000.00"));
        assert!(text.contains("$400.00"));

        let plan = crate::Advisor::default().decide(Strategy::Quality, &s);
        let text = reasoning(&cfg, Strategy::Quality, &s, &plan);
        assert!(text.contains("52.5%"));
    }

    #[test]
    fn brief_orders_observations() {
        let cfg = AdvisorConfig::default();
        let mut s = state(100_000, 20.0, 0, 25);
        s.current_year = 10;
        let text = brief(&cfg, &s);
        let order = ["CASH CRITICAL", "Product quality", "No engineers", "Large team", "Final year"];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| text.find(needle).expect(needle))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
        assert!(!text.contains("No sales team"));
        assert!(text.ends_with('.'));
    }

    #[test]
    fn finished_game_has_no_countdown() {
        let cfg = AdvisorConfig::default();
        let mut won = state(872_000, 60.0, 4, 4);
        won.status = GameStatus::Won;
        won.current_year = 11;
        won.current_quarter = 1;
        let text = brief(&cfg, &won);
        assert!(!text.contains("Final year"), "{text}");
        assert!(text.starts_with("Steady state at Y11 Q1"), "{text}");

        let mut lost = state(-809_300, 60.0, 4, 4);
        lost.status = GameStatus::Lost;
        lost.current_year = 10;
        assert!(!brief(&cfg, &lost).contains("Final year"));

        lost.status = GameStatus::Active;
        assert!(brief(&cfg, &lost).contains("Final year"));
    }

    #[test]
    fn brief_flags_empty_sales_and_horizon() {
        let cfg = AdvisorConfig::default();
        let mut s = state(2_000_000, 80.0, 3, 0);
        s.current_year = 8;
        s.current_quarter = 1;
        assert_eq!(
            brief(&cfg, &s),
            "Strong cash position of $2,000,000.00 for expansion. \
             Excellent product quality at 80.0% is driving premium demand. \
             No sales team, so the revenue pipeline is empty. \
             Less than 3 years to the finish line."
        );
    }

    #[test]
    fn steady_state_mentions_calendar() {
        let cfg = AdvisorConfig::default();
        let text = brief(&cfg, &state(1_000_000, 50.0, 4, 2));
        assert_eq!(
            text,
            "Steady state at Y3 Q2. Evaluate advisor strategies to optimize your next move."
        );
    }
}
