use std::collections::HashSet;

use crate::config::PlayerSpec;
use crate::error::EngineError;
use crate::model::{Player, PlayerId};

/// Seating-ordered roster. Fixed in size for the life of a game.
#[derive(Clone, Debug)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new(roster: &[PlayerSpec]) -> Result<Self, EngineError> {
        if roster.is_empty() { return Err(EngineError::NoPlayers); }
        let mut seen = HashSet::with_capacity(roster.len());
        let mut players = Vec::with_capacity(roster.len());
        for spec in roster {
            if !seen.insert(spec.id) { return Err(EngineError::DuplicatePlayerId(spec.id)); }
            players.push(Player { id: spec.id, name: spec.name.clone(), color: spec.color.clone(), position: 0 });
        }
        Ok(Self { players })
    }

    pub fn len(&self) -> usize { self.players.len() }

    pub fn is_empty(&self) -> bool { self.players.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> { self.players.iter() }

    pub fn as_slice(&self) -> &[Player] { &self.players }

    pub fn at(&self, index: usize) -> Option<&Player> { self.players.get(index) }

    pub fn get(&self, id: PlayerId) -> Option<&Player> { self.players.iter().find(|p| p.id == id) }

    /// Moves `id` to `position`, returning where it was.
    pub fn set_position(&mut self, id: PlayerId, position: u8) -> Result<u8, EngineError> {
        let p = self.players.iter_mut().find(|p| p.id == id).ok_or(EngineError::UnknownPlayer(id))?;
        Ok(std::mem::replace(&mut p.position, position))
    }

    pub fn reset_positions(&mut self) {
        for p in &mut self.players { p.position = 0; }
    }

    pub fn occupants(&self, cell: u8) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.position == cell)
    }

    /// Furthest player; ties go to the earlier seat.
    pub fn leader(&self) -> &Player {
        let mut best = &self.players[0];
        for p in &self.players[1..] {
            if p.position > best.position { best = p; }
        }
        best
    }
}

impl<'a> IntoIterator for &'a PlayerRegistry {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;
    fn into_iter(self) -> Self::IntoIter { self.players.iter() }
}
