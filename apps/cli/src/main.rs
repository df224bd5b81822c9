#![deny(warnings)]

//! Headless CLI: plays a bot-driven game to the finish and prints KPIs.

use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate, Utc};
use sim_ai::{format_usd, Advisor, AdvisorConfig, Strategy};
use sim_core::{BalanceConfig, TurnRecord};
use sim_runtime::GameSession;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: cli [--strategy cfo|growth|quality] [--config balance.yaml] \
[--advisor advisor.yaml] [--date YYYY-MM-DD | --market-factor F] [--json] [--version]";

/// Where each turn's market factor comes from.
#[derive(Debug, Clone, Copy)]
enum MarketSource {
    Fixed(f64),
    /// Daily curve, one simulated tick per day starting at this date.
    Daily(NaiveDate),
}

impl MarketSource {
    fn factor(self, turn: u32) -> f64 {
        match self {
            MarketSource::Fixed(f) => f,
            MarketSource::Daily(start) => start
                .checked_add_days(Days::new(u64::from(turn)))
                .map(sim_econ::market_factor_on)
                .unwrap_or(sim_econ::DEFAULT_MARKET_FACTOR),
        }
    }
}

#[derive(Debug)]
struct Args {
    strategy: Strategy,
    balance: Option<PathBuf>,
    advisor: Option<PathBuf>,
    market: MarketSource,
    json: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Args> {
    let mut args = Args {
        strategy: Strategy::Cfo,
        balance: None,
        advisor: None,
        market: MarketSource::Daily(Utc::now().date_naive()),
        json: false,
        version: false,
    };
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--strategy" => {
                let name = it.next().context("--strategy needs a value")?;
                args.strategy = name.parse()?;
            }
            "--config" => {
                let path = it.next().context("--config needs a value")?;
                args.balance = Some(PathBuf::from(path));
            }
            "--advisor" => {
                let path = it.next().context("--advisor needs a value")?;
                args.advisor = Some(PathBuf::from(path));
            }
            "--date" => {
                let raw = it.next().context("--date needs a value")?;
                let date: NaiveDate = raw.parse().with_context(|| format!("bad date {raw}"))?;
                args.market = MarketSource::Daily(date);
            }
            "--market-factor" => {
                let raw = it.next().context("--market-factor needs a value")?;
                let f: f64 = raw.parse().with_context(|| format!("bad market factor {raw}"))?;
                if !(f.is_finite() && f >= 0.0) {
                    bail!("market factor must be finite and non-negative");
                }
                args.market = MarketSource::Fixed(f);
            }
            "--json" => args.json = true,
            "--version" => args.version = true,
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }
    Ok(args)
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_advisor(path: Option<&PathBuf>, balance: &BalanceConfig) -> Result<Advisor> {
    let mut cfg = match path {
        Some(p) => AdvisorConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => AdvisorConfig::for_balance(balance),
    };
    if cfg.max_year != balance.max_year {
        warn!(
            advisor = cfg.max_year,
            balance = balance.max_year,
            "advisor horizon differs from balance; using balance"
        );
        cfg.max_year = balance.max_year;
    }
    Ok(Advisor::new(cfg))
}

fn kpi_line(t: &TurnRecord) -> String {
    let o = &t.outcomes;
    format!(
        "Y{}Q{} | price: {} | hires: {}+{} | units: {} | revenue: {} | costs: {} | net: {} | cash: {} | quality: {:.1} | team: {}+{} | {}",
        t.year,
        t.quarter,
        format_usd(t.decisions.price),
        t.decisions.engineers_to_hire,
        t.decisions.sales_to_hire,
        o.units_sold,
        format_usd(o.revenue),
        format_usd(o.costs),
        format_usd(o.net_income),
        format_usd(o.new_cash),
        o.new_quality,
        o.new_engineers,
        o.new_sales,
        o.status
    )
}

fn main() -> Result<()> {
    // Logging setup
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "startup-tycoon cli {} ({} built {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }

    let balance = match &args.balance {
        Some(p) => BalanceConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => BalanceConfig::default(),
    };
    let advisor = load_advisor(args.advisor.as_ref(), &balance)?;
    let mut game = GameSession::new(balance).with_advisor(advisor);
    info!(
        strategy = %args.strategy,
        market = ?args.market,
        max_year = game.balance().max_year,
        "starting game"
    );

    if !args.json {
        println!("Brief | {}", game.advisor().situation_brief(game.state()));
        for rec in game.advisor().recommend_all(game.state()) {
            println!("Advisor {} | {}", rec.strategy, rec.reasoning);
        }
    }

    let market = args.market;
    let played = game.play_out(args.strategy, |turn| market.factor(turn))?;
    let final_state = game.state();
    info!(played, status = %final_state.status, "game finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(game.history())?);
        return Ok(());
    }
    for turn in game.history() {
        println!("{}", kpi_line(turn));
    }
    println!(
        "Result | {} after {} quarters | cash: {} | cumulative profit: {}",
        final_state.status,
        played,
        format_usd(final_state.cash),
        format_usd(final_state.cumulative_profit)
    );
    println!("Brief | {}", game.advisor().situation_brief(final_state));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_market_is_constant() {
        let m = MarketSource::Fixed(1.1);
        assert_eq!(m.factor(0), 1.1);
        assert_eq!(m.factor(39), 1.1);
    }

    #[test]
    fn daily_market_steps_one_day_per_turn() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let m = MarketSource::Daily(start);
        assert_eq!(m.factor(0), sim_econ::market_factor_for_day(1));
        assert_eq!(m.factor(90), sim_econ::market_factor_for_day(91));
    }

    fn argv(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_paths_and_market() {
        let args = parse_args(argv(&[
            "--strategy",
            "quality",
            "--config",
            "b.yaml",
            "--advisor",
            "a.yaml",
            "--market-factor",
            "0.9",
            "--json",
        ]))
        .unwrap();
        assert_eq!(args.strategy, Strategy::Quality);
        assert_eq!(args.balance, Some(PathBuf::from("b.yaml")));
        assert_eq!(args.advisor, Some(PathBuf::from("a.yaml")));
        assert!(matches!(args.market, MarketSource::Fixed(f) if f == 0.9));
        assert!(args.json);
    }

    #[test]
    fn flag_without_value_is_an_error() {
        for flag in ["--config", "--advisor", "--strategy", "--date", "--market-factor"] {
            let err = parse_args(argv(&[flag])).unwrap_err();
            assert!(err.to_string().contains("needs a value"), "{flag}: {err}");
        }
        assert!(parse_args(argv(&["--json", "--config"])).is_err());
    }

    #[test]
    fn log_filter_defaults_to_info() {
        assert!(log_filter(None).to_string().eq_ignore_ascii_case("info"));
        assert!(log_filter(Some("error".into())).to_string().eq_ignore_ascii_case("error"));
    }

    #[test]
    fn kpi_line_mentions_status() {
        let mut game = GameSession::new(BalanceConfig::default());
        game.autoplay(Strategy::Growth, 1.0).unwrap();
        let line = kpi_line(&game.history()[0]);
        assert!(line.starts_with("Y1Q1"));
        assert!(line.ends_with("active"));
    }
}
