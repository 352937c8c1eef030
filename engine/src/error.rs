use crate::model::{FeatureKind, PlayerId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A game needs at least one player to rotate turns over.
    #[error("roster is empty")]
    NoPlayers,

    #[error("duplicate player id {0}")]
    DuplicatePlayerId(PlayerId),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("feature {start}->{end} is off the playable cells 1..=99")]
    FeatureOutOfRange { start: u8, end: u8 },

    #[error("feature on cell {0} starts and ends on the same cell")]
    DegenerateFeature(u8),

    #[error("{kind:?} {start}->{end} points the wrong way")]
    WrongDirection { kind: FeatureKind, start: u8, end: u8 },

    #[error("two features start on cell {0}")]
    DuplicateFeature(u8),

    #[error("feature {start}->{end} ends on the start of another feature")]
    ChainedFeature { start: u8, end: u8 },

    #[error("scripted dice need at least one face")]
    EmptyScript,

    #[error("die face {0} is outside 1..=6")]
    FaceOutOfRange(u8),

    #[error("game task has stopped")]
    Stopped,

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
