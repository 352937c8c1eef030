use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String, // opaque to the engine
    pub position: u8,  // 0 = not started, 100 = finished
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Waiting,
    Playing,
    Finished,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind { Snake, Ladder }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardFeature {
    pub start: u8,
    pub end: u8,
    pub kind: FeatureKind,
}

impl BoardFeature {
    pub const fn ladder(start: u8, end: u8) -> Self { Self { start, end, kind: FeatureKind::Ladder } }
    pub const fn snake(start: u8, end: u8) -> Self { Self { start, end, kind: FeatureKind::Snake } }
}

/// Ephemeral per-game turn bookkeeping.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnState {
    pub current: usize,
    pub dice_value: u8, // 0 until a face is showing
    pub rolling: bool,
    /// Held from roll start until the turn advances or the game ends.
    pub resolving: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity { Info, Success, Warning, Danger }

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub id: u64,
    pub text: String,
    pub severity: Severity,
    pub duration: Duration,
}

/// Everything a view layer needs to draw one frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub generation: u64,
    pub phase: GamePhase,
    pub players: Vec<Player>,
    pub current_player: usize,
    pub dice_value: u8,
    pub rolling: bool,
    pub resolving: bool,
    pub message: Option<StatusMessage>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    GameStarted,
    GameReset,
    RollStarted,
    RollFace,
    Rolled,
    Moved,
    Overshoot,
    FeatureApplied,
    GameWon,
    TurnAdvanced,
    MessageShown,
    MessageCleared,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    pub generation: u64,
    pub ty: EventType,
    pub payload: serde_json::Value,
}
