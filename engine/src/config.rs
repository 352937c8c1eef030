//! Engine configuration.
//!
//! Every field has a default, so `{}` is a valid JSON config describing the
//! two-player classic game.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EngineError;
use crate::model::{BoardFeature, PlayerId};
use crate::rules::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSpec {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
}

impl PlayerSpec {
    pub fn new(id: u32, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self { id: PlayerId(id), name: name.into(), color: color.into() }
    }
}

/// Delays that drive the roll choreography, in milliseconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timing {
    pub roll_tick_ms: u64,
    pub roll_duration_ms: u64,
    pub feature_delay_ms: u64,
    pub advance_delay_ms: u64,
    pub message_ms: u64,
    pub win_message_ms: u64,
    pub feature_message_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            roll_tick_ms: ROLL_TICK_MS,
            roll_duration_ms: ROLL_DURATION_MS,
            feature_delay_ms: FEATURE_DELAY_MS,
            advance_delay_ms: ADVANCE_DELAY_MS,
            message_ms: MESSAGE_MS,
            win_message_ms: WIN_MESSAGE_MS,
            feature_message_ms: FEATURE_MESSAGE_MS,
        }
    }
}

impl Timing {
    pub fn roll_tick(&self) -> Duration { Duration::from_millis(self.roll_tick_ms) }
    pub fn roll_duration(&self) -> Duration { Duration::from_millis(self.roll_duration_ms) }
    pub fn feature_delay(&self) -> Duration { Duration::from_millis(self.feature_delay_ms) }
    pub fn advance_delay(&self) -> Duration { Duration::from_millis(self.advance_delay_ms) }
    pub fn message(&self) -> Duration { Duration::from_millis(self.message_ms) }
    pub fn win_message(&self) -> Duration { Duration::from_millis(self.win_message_ms) }
    pub fn feature_message(&self) -> Duration { Duration::from_millis(self.feature_message_ms) }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub players: Vec<PlayerSpec>,
    /// `None` selects the classic board.
    pub board: Option<Vec<BoardFeature>>,
    pub timing: Timing,
    /// Seeds the transient dice faces shown while rolling.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            players: vec![
                PlayerSpec::new(1, "Player 1", "#FF6B6B"),
                PlayerSpec::new(2, "Player 2", "#4ECDC4"),
            ],
            board: None,
            timing: Timing::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_players(mut self, players: Vec<PlayerSpec>) -> Self {
        self.players = players;
        self
    }

    pub fn with_board(mut self, board: Vec<BoardFeature>) -> Self {
        self.board = Some(board);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
