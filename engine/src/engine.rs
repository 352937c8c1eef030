//! The turn engine.
//!
//! A roll runs as a chain of scheduled continuations:
//!
//! ```text
//! roll_dice ─► RollTick × n ─► RollSettle ─► move ─┬─► (overshoot) AdvanceTurn now
//!                                                 ├─► (100) finished
//!                                                 └─► ResolveFeature ─► AdvanceTurn
//! ```
//!
//! `start_game` and `reset_game` cancel whatever part of that chain is still
//! pending and bump the generation. A continuation from an older generation
//! that still reaches `fire` is dropped.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::board::BoardMap;
use crate::config::{EngineConfig, Timing};
use crate::error::EngineError;
use crate::model::*;
use crate::registry::PlayerRegistry;
use crate::rng::DiceSource;
use crate::rules::{is_winning_position, landing_cell, remaining_to_win, DIE_FACES};
use crate::scheduler::{ManualScheduler, Scheduled, Scheduler, Task};

pub const START_TEXT: &str = "Game started! Roll the dice to begin!";
pub const SNAKE_TEXT: &str = "🐍 Oops! Bitten by a snake - LOOSER! 🐍";
pub const LADDER_TEXT: &str = "🪜 Climbing up the ladder - HURRY! 🪜";

/// Undrained events kept before the oldest are dropped.
pub const EVENT_BACKLOG: usize = 1024;

pub struct TurnEngine<D, S> {
    board: BoardMap,
    players: PlayerRegistry,
    phase: GamePhase,
    turn: TurnState,
    message: Option<StatusMessage>,
    timing: Timing,
    dice: D,
    scheduler: S,
    flicker: StdRng,
    generation: u64,
    message_seq: u64,
    events_seq: u64,
    events: VecDeque<Event>,
}

impl<D: DiceSource, S: Scheduler> TurnEngine<D, S> {
    pub fn new(config: EngineConfig, dice: D, scheduler: S) -> Result<Self, EngineError> {
        let players = PlayerRegistry::new(&config.players)?;
        let board = match config.board {
            Some(table) => BoardMap::new(table)?,
            None => BoardMap::classic(),
        };
        let flicker = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ 0x5EED),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            board, players, phase: GamePhase::Waiting, turn: TurnState::default(), message: None,
            timing: config.timing, dice, scheduler, flicker,
            generation: 0, message_seq: 0, events_seq: 0, events: VecDeque::new(),
        })
    }

    pub fn start_game(&mut self) {
        let dropped = self.begin_generation();
        self.phase = GamePhase::Playing;
        self.message = None;
        info!(generation = self.generation, dropped, players = self.players.len(), "game started");
        self.emit(EventType::GameStarted, json!({ "players": self.players.len() }));
        self.show_message(START_TEXT.to_string(), Severity::Info, self.timing.message());
    }

    pub fn reset_game(&mut self) {
        let dropped = self.begin_generation();
        self.phase = GamePhase::Waiting;
        self.clear_message();
        info!(generation = self.generation, dropped, "game reset");
        self.emit(EventType::GameReset, json!({}));
    }

    /// Starts a roll for the current player. Ignored outside play and while a
    /// previous roll is still spinning or resolving.
    ///
    /// Unlike the original browser game, a second roll during the feature and
    /// turn-advance delays is refused rather than moving the same player again.
    pub fn roll_dice(&mut self) {
        if self.phase != GamePhase::Playing || self.turn.rolling || self.turn.resolving {
            debug!(phase = ?self.phase, rolling = self.turn.rolling, resolving = self.turn.resolving, "roll ignored");
            return;
        }
        self.turn.rolling = true;
        self.turn.resolving = true;
        self.turn.dice_value = 0;
        debug!(player = self.turn.current, "roll started");
        self.emit(EventType::RollStarted, json!({ "playerIdx": self.turn.current }));

        let tick = self.timing.roll_tick();
        let total = self.timing.roll_duration();
        if !tick.is_zero() {
            let mut at = tick;
            while at < total {
                self.schedule(at, Task::RollTick);
                at += tick;
            }
        }
        self.schedule(total, Task::RollSettle);
    }

    /// Runs every continuation whose deadline has passed. Returns how many ran.
    pub fn fire_due(&mut self) -> Result<usize, EngineError> {
        let mut fired = 0;
        while let Some(job) = self.scheduler.pop_due() {
            self.fire(job)?;
            fired += 1;
        }
        Ok(fired)
    }

    fn fire(&mut self, job: Scheduled) -> Result<(), EngineError> {
        if job.generation != self.generation {
            debug!(task = ?job.task, stale = job.generation, current = self.generation, "dropping stale task");
            return Ok(());
        }
        match job.task {
            Task::RollTick => {
                if self.turn.rolling {
                    let face = self.flicker.gen_range(1..=DIE_FACES);
                    self.turn.dice_value = face;
                    trace!(face, "dice flicker");
                    self.emit(EventType::RollFace, json!({ "face": face }));
                }
            }
            Task::RollSettle => {
                if self.turn.rolling {
                    let value = self.dice.roll();
                    debug_assert!((1..=DIE_FACES).contains(&value));
                    self.turn.dice_value = value;
                    self.turn.rolling = false;
                    debug!(player = self.turn.current, value, "rolled");
                    self.emit(EventType::Rolled, json!({ "playerIdx": self.turn.current, "value": value }));
                    self.resolve_move(value)?;
                }
            }
            Task::ResolveFeature { player, cell } => self.resolve_feature(player, cell)?,
            Task::AdvanceTurn => self.advance_turn(),
            Task::ClearMessage { message_id } => {
                if self.message.as_ref().is_some_and(|m| m.id == message_id) {
                    self.clear_message();
                }
            }
        }
        Ok(())
    }

    fn resolve_move(&mut self, steps: u8) -> Result<(), EngineError> {
        let (id, name, from) = match self.players.at(self.turn.current) {
            Some(p) => (p.id, p.name.clone(), p.position),
            None => return Err(EngineError::NoPlayers),
        };

        let Some(target) = landing_cell(from, steps) else {
            let need = remaining_to_win(from);
            debug!(player = %id, from, steps, need, "overshoot");
            self.emit(EventType::Overshoot, json!({ "player": id, "position": from, "steps": steps, "needed": need }));
            self.show_message(format!("{name} needs exactly {need} to win!"), Severity::Warning, self.timing.message());
            self.advance_turn();
            return Ok(());
        };

        self.players.set_position(id, target)?;
        debug!(player = %id, from, to = target, "moved");
        self.emit(EventType::Moved, json!({ "player": id, "from": from, "to": target, "steps": steps }));

        if is_winning_position(target) {
            self.phase = GamePhase::Finished;
            self.turn.resolving = false;
            info!(player = %id, name = %name, "game won");
            self.emit(EventType::GameWon, json!({ "player": id, "name": name }));
            self.show_message(format!("🎉 {name} wins the game! 🎉"), Severity::Success, self.timing.win_message());
            return Ok(());
        }

        self.schedule(self.timing.feature_delay(), Task::ResolveFeature { player: id, cell: target });
        Ok(())
    }

    fn resolve_feature(&mut self, player: PlayerId, cell: u8) -> Result<(), EngineError> {
        if let Some(feature) = self.board.feature_at(cell).copied() {
            let (text, severity) = match feature.kind {
                FeatureKind::Snake => (SNAKE_TEXT, Severity::Danger),
                FeatureKind::Ladder => (LADDER_TEXT, Severity::Success),
            };
            self.show_message(text.to_string(), severity, self.timing.feature_message());
            self.players.set_position(player, feature.end)?;
            debug!(player = %player, kind = ?feature.kind, from = cell, to = feature.end, "feature applied");
            self.emit(EventType::FeatureApplied, json!({ "player": player, "kind": feature.kind, "from": cell, "to": feature.end }));
        }
        self.schedule(self.timing.advance_delay(), Task::AdvanceTurn);
        Ok(())
    }

    fn advance_turn(&mut self) {
        let from = self.turn.current;
        self.turn.current = (from + 1) % self.players.len();
        self.turn.resolving = false;
        debug!(from, to = self.turn.current, "turn advanced");
        self.emit(EventType::TurnAdvanced, json!({ "from": from, "to": self.turn.current }));
    }

    fn begin_generation(&mut self) -> usize {
        let dropped = self.scheduler.cancel_all();
        self.generation += 1;
        self.turn = TurnState::default();
        self.players.reset_positions();
        dropped
    }

    fn schedule(&mut self, delay: Duration, task: Task) {
        self.scheduler.schedule(delay, Scheduled { generation: self.generation, task });
    }

    fn show_message(&mut self, text: String, severity: Severity, duration: Duration) {
        self.message_seq += 1;
        let id = self.message_seq;
        self.emit(EventType::MessageShown, json!({
            "id": id, "text": text, "severity": severity, "durationMs": duration.as_millis() as u64,
        }));
        self.message = Some(StatusMessage { id, text, severity, duration });
        self.schedule(duration, Task::ClearMessage { message_id: id });
    }

    fn clear_message(&mut self) {
        if let Some(m) = self.message.take() {
            self.emit(EventType::MessageCleared, json!({ "id": m.id }));
        }
    }

    fn emit(&mut self, ty: EventType, payload: serde_json::Value) {
        self.events_seq += 1;
        if self.events.len() == EVENT_BACKLOG {
            self.events.pop_front();
        }
        self.events.push_back(Event { seq: self.events_seq, generation: self.generation, ty, payload });
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.generation,
            phase: self.phase,
            players: self.players.as_slice().to_vec(),
            current_player: self.turn.current,
            dice_value: self.turn.dice_value,
            rolling: self.turn.rolling,
            resolving: self.turn.resolving,
            message: self.message.clone(),
        }
    }

    /// Takes every event recorded since the last drain. At most
    /// [`EVENT_BACKLOG`] are kept in between; older ones are dropped, and the
    /// gap shows in `seq`.
    pub fn drain_events(&mut self) -> Vec<Event> { self.events.drain(..).collect() }

    pub fn phase(&self) -> GamePhase { self.phase }
    pub fn turn(&self) -> TurnState { self.turn }
    pub fn generation(&self) -> u64 { self.generation }
    pub fn message(&self) -> Option<&StatusMessage> { self.message.as_ref() }
    pub fn board(&self) -> &BoardMap { &self.board }
    pub fn players(&self) -> &PlayerRegistry { &self.players }
    pub fn timing(&self) -> &Timing { &self.timing }
    pub fn scheduler(&self) -> &S { &self.scheduler }
    pub fn scheduler_mut(&mut self) -> &mut S { &mut self.scheduler }
    pub fn dice(&self) -> &D { &self.dice }

    pub fn current_player(&self) -> &Player {
        // The registry is never empty and `current` is always reduced mod its length.
        &self.players.as_slice()[self.turn.current]
    }

    pub fn leader(&self) -> &Player { self.players.leader() }

    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| is_winning_position(p.position))
    }

    pub fn occupants(&self, cell: u8) -> Vec<&Player> { self.players.occupants(cell).collect() }
}

impl<D: DiceSource> TurnEngine<D, ManualScheduler> {
    /// Moves virtual time forward by `by`, firing continuations in deadline order.
    pub fn advance(&mut self, by: Duration) -> Result<usize, EngineError> {
        let target = self.scheduler.now() + by;
        let mut fired = self.fire_due()?;
        while let Some(at) = self.scheduler.next_deadline() {
            if at > target { break; }
            self.scheduler.set_now(at);
            fired += self.fire_due()?;
        }
        self.scheduler.set_now(target);
        Ok(fired)
    }

    /// Fires everything pending, jumping virtual time from deadline to deadline.
    pub fn run_until_idle(&mut self) -> Result<usize, EngineError> {
        let mut fired = self.fire_due()?;
        while let Some(at) = self.scheduler.next_deadline() {
            self.scheduler.set_now(at);
            fired += self.fire_due()?;
        }
        Ok(fired)
    }
}
