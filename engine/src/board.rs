use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::model::{BoardFeature, FeatureKind};
use crate::rules::{BOARD_SIZE, BOARD_WIDTH};

const CLASSIC: [BoardFeature; 16] = [
    BoardFeature::ladder(4, 14),
    BoardFeature::ladder(9, 31),
    BoardFeature::ladder(20, 38),
    BoardFeature::ladder(28, 84),
    BoardFeature::ladder(40, 59),
    BoardFeature::ladder(51, 67),
    BoardFeature::ladder(63, 81),
    BoardFeature::ladder(71, 91),
    BoardFeature::snake(17, 7),
    BoardFeature::snake(54, 34),
    BoardFeature::snake(62, 19),
    BoardFeature::snake(64, 60),
    BoardFeature::snake(87, 24),
    BoardFeature::snake(93, 73),
    BoardFeature::snake(95, 75),
    BoardFeature::snake(99, 78),
];

/// Snakes and ladders keyed by start cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardMap {
    features: BTreeMap<u8, BoardFeature>,
}

impl Default for BoardMap {
    fn default() -> Self { Self::classic() }
}

impl BoardMap {
    /// The built-in 8-ladder, 8-snake board.
    pub fn classic() -> Self {
        Self { features: CLASSIC.iter().map(|f| (f.start, *f)).collect() }
    }

    /// Builds a board from a custom table, rejecting tables that could chain
    /// features or put two features on one cell.
    pub fn new(table: impl IntoIterator<Item = BoardFeature>) -> Result<Self, EngineError> {
        let mut features = BTreeMap::new();
        for f in table {
            let playable = 1..BOARD_SIZE;
            if !playable.contains(&f.start) || !playable.contains(&f.end) {
                return Err(EngineError::FeatureOutOfRange { start: f.start, end: f.end });
            }
            if f.start == f.end { return Err(EngineError::DegenerateFeature(f.start)); }
            let upward = f.end > f.start;
            if upward != (f.kind == FeatureKind::Ladder) {
                return Err(EngineError::WrongDirection { kind: f.kind, start: f.start, end: f.end });
            }
            if features.insert(f.start, f).is_some() {
                return Err(EngineError::DuplicateFeature(f.start));
            }
        }
        if let Some(f) = features.values().find(|f| features.contains_key(&f.end)) {
            return Err(EngineError::ChainedFeature { start: f.start, end: f.end });
        }
        Ok(Self { features })
    }

    #[inline]
    pub fn feature_at(&self, cell: u8) -> Option<&BoardFeature> { self.features.get(&cell) }

    pub fn features(&self) -> impl Iterator<Item = &BoardFeature> { self.features.values() }

    pub fn ladders(&self) -> impl Iterator<Item = &BoardFeature> {
        self.features().filter(|f| f.kind == FeatureKind::Ladder)
    }

    pub fn snakes(&self) -> impl Iterator<Item = &BoardFeature> {
        self.features().filter(|f| f.kind == FeatureKind::Snake)
    }

    pub fn len(&self) -> usize { self.features.len() }

    pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// Cell numbers as drawn on screen: top row first, alternating direction
    /// so consecutive cells stay adjacent.
    pub fn layout() -> Vec<[u8; BOARD_WIDTH as usize]> {
        (0..BOARD_WIDTH).rev().map(|row| {
            let mut cells = [0u8; BOARD_WIDTH as usize];
            for (col, cell) in cells.iter_mut().enumerate() {
                let col = col as u8;
                *cell = if row % 2 == 1 { row * BOARD_WIDTH + col + 1 } else { row * BOARD_WIDTH + (BOARD_WIDTH - col) };
            }
            cells
        }).collect()
    }
}
