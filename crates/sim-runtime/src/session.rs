//! Caller-side game session: turn history, version checks and bot autoplay.

use crate::engine::advance;
use sim_ai::{Advisor, AdvisorConfig, Strategy};
use sim_core::{
    validate_decisions, validate_state, BalanceConfig, CompanyState, DecisionLimits, Decisions,
    GameStatus, TurnRecord, ValidationError,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("game is over ({0})")]
    GameOver(GameStatus),
    #[error("concurrent update detected: expected version {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("invalid decisions: {0}")]
    InvalidDecisions(#[from] ValidationError),
    #[error("invalid state snapshot: {0}")]
    InvalidState(#[source] ValidationError),
}

/// One company's game, advanced a quarter at a time.
#[derive(Clone, Debug)]
pub struct GameSession {
    balance: BalanceConfig,
    limits: DecisionLimits,
    advisor: Advisor,
    state: CompanyState,
    version: u64,
    history: Vec<TurnRecord>,
}

impl GameSession {
    /// Start a new game with the starting values of `balance`.
    pub fn new(balance: BalanceConfig) -> Self {
        let state = CompanyState::new_game(&balance);
        Self::from_parts(balance, state, 0)
    }

    /// Continue from a persisted snapshot and its version.
    pub fn resume(
        balance: BalanceConfig,
        state: CompanyState,
        version: u64,
    ) -> Result<Self, SessionError> {
        validate_state(&state).map_err(SessionError::InvalidState)?;
        Ok(Self::from_parts(balance, state, version))
    }

    fn from_parts(balance: BalanceConfig, state: CompanyState, version: u64) -> Self {
        let advisor = Advisor::new(AdvisorConfig::for_balance(&balance));
        Self {
            balance,
            limits: DecisionLimits::default(),
            advisor,
            state,
            version,
            history: Vec::new(),
        }
    }

    pub fn with_limits(mut self, limits: DecisionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn state(&self) -> &CompanyState {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Turns played through this session, oldest first.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn balance(&self) -> &BalanceConfig {
        &self.balance
    }

    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    /// Play one quarter with `decisions`.
    ///
    /// `expected_version` is the version the caller read the state at; a
    /// mismatch means someone else advanced the game in between.
    pub fn submit(
        &mut self,
        expected_version: u64,
        decisions: Decisions,
        market_factor: f64,
    ) -> Result<&TurnRecord, SessionError> {
        if self.state.status.is_terminal() {
            debug!(status = %self.state.status, "rejecting turn on finished game");
            return Err(SessionError::GameOver(self.state.status));
        }
        if expected_version != self.version {
            debug!(expected_version, actual = self.version, "rejecting stale turn");
            return Err(SessionError::VersionConflict {
                expected: expected_version,
                actual: self.version,
            });
        }
        validate_decisions(&decisions, &self.limits)?;

        let result = advance(&self.state, &decisions, market_factor, &self.balance);
        let record = TurnRecord {
            year: self.state.current_year,
            quarter: self.state.current_quarter,
            decisions,
            outcomes: result.outcome,
        };
        debug!(
            year = record.year,
            quarter = record.quarter,
            status = %record.outcomes.status,
            cash = %record.outcomes.new_cash,
            "turn applied"
        );
        self.state = result.state;
        self.version += 1;
        self.history.push(record);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Apply `strategy`'s recommendation for the current state.
    pub fn autoplay(
        &mut self,
        strategy: Strategy,
        market_factor: f64,
    ) -> Result<&TurnRecord, SessionError> {
        let rec = self.advisor.recommend(strategy, &self.state);
        let version = self.version;
        self.submit(version, rec.decisions, market_factor)
    }

    /// Autoplay until the game is won or lost.
    ///
    /// `feed` supplies the market factor for each turn, indexed from zero.
    /// Returns the number of quarters played.
    pub fn play_out<F>(&mut self, strategy: Strategy, mut feed: F) -> Result<u32, SessionError>
    where
        F: FnMut(u32) -> f64,
    {
        let max_turns = self.state.quarters_remaining(self.balance.max_year) + 1;
        let mut played = 0;
        while !self.state.status.is_terminal() && played < max_turns {
            let mf = feed(played);
            self.autoplay(strategy, mf)?;
            played += 1;
        }
        Ok(played)
    }
}
