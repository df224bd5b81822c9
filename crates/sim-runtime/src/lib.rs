#![deny(warnings)]

//! Turn runtime for the simulation: the pure quarterly engine plus the
//! session layer callers use to drive a game.

pub mod engine;
pub mod session;

pub use engine::{advance, advance_default, TurnResult};
pub use session::{GameSession, SessionError};
