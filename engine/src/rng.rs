use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::EngineError;
use crate::rules::DIE_FACES;

/// Source of authoritative die faces, uniform over 1..=6.
pub trait DiceSource {
    fn roll(&mut self) -> u8;
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll(&mut self) -> u8 { (**self).roll() }
}

#[derive(Clone, Debug)]
pub struct SeededDice { rng: StdRng }

impl SeededDice {
    pub fn new(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }
    pub fn from_entropy() -> Self { Self { rng: StdRng::from_entropy() } }
}

impl DiceSource for SeededDice {
    fn roll(&mut self) -> u8 { self.rng.gen_range(1..=DIE_FACES) }
}

/// Replays a fixed list of faces, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Result<Self, EngineError> {
        let faces: Vec<u8> = faces.into_iter().collect();
        if faces.is_empty() { return Err(EngineError::EmptyScript); }
        if let Some(&bad) = faces.iter().find(|f| !(1..=DIE_FACES).contains(*f)) {
            return Err(EngineError::FaceOutOfRange(bad));
        }
        Ok(Self { faces, next: 0 })
    }

    /// Number of faces handed out so far.
    pub fn rolls(&self) -> usize { self.next }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}
