//! Snake & Ladder turn engine.
//!
//! [`TurnEngine`] owns one game: the roster, the board, the phase and the
//! turn bookkeeping. Time is injected through a [`Scheduler`] and dice
//! through a [`DiceSource`], so a test can drive a whole game
//! deterministically on a [`ManualScheduler`]. The [`driver`] module runs a
//! game as a tokio task for real-time use.

pub mod board;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;
pub mod rng;
pub mod rules;
pub mod scheduler;

pub use board::BoardMap;
pub use config::{EngineConfig, PlayerSpec, Timing};
pub use engine::TurnEngine;
pub use error::EngineError;
pub use model::*;
pub use registry::PlayerRegistry;
pub use rng::{DiceSource, ScriptedDice, SeededDice};
pub use scheduler::{ManualScheduler, Scheduler};
