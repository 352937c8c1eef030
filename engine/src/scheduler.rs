//! Timed continuations.
//!
//! The engine never sleeps. Every delayed step of a roll is queued here as a
//! [`Task`] and handed back to the engine once its deadline has passed.
//! Deadlines are measured from an arbitrary per-scheduler origin.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::model::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Show a transient face while the die spins.
    RollTick,
    /// Draw the authoritative face and move.
    RollSettle,
    ResolveFeature { player: PlayerId, cell: u8 },
    AdvanceTurn,
    ClearMessage { message_id: u64 },
}

/// A task tagged with the game generation it was scheduled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub generation: u64,
    pub task: Task,
}

/// Deadline-ordered queue; equal deadlines pop in insertion order.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(Duration, u64), Scheduled>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, deadline: Duration, job: Scheduled) {
        self.seq += 1;
        self.entries.insert((deadline, self.seq), job);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|&(at, _)| at)
    }

    pub fn pop_due(&mut self, now: Duration) -> Option<Scheduled> {
        let key = *self.entries.keys().next()?;
        if key.0 > now { return None; }
        self.entries.remove(&key)
    }

    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

pub trait Scheduler {
    /// Current instant, relative to the scheduler's origin.
    fn now(&self) -> Duration;

    fn schedule_at(&mut self, deadline: Duration, job: Scheduled);

    fn schedule(&mut self, delay: Duration, job: Scheduled) {
        let at = self.now() + delay;
        self.schedule_at(at, job);
    }

    fn next_deadline(&self) -> Option<Duration>;

    /// Next job whose deadline is at or before `now()`.
    fn pop_due(&mut self) -> Option<Scheduled>;

    /// Drops every pending job, returning how many were dropped.
    fn cancel_all(&mut self) -> usize;

    fn pending(&self) -> usize;
}

/// Virtual clock that only moves when told to. Used by tests and the demo.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self { Self::default() }

    /// Moves the clock forward. Never moves it backwards.
    pub fn set_now(&mut self, at: Duration) {
        if at > self.now { self.now = at; }
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration { self.now }
    fn schedule_at(&mut self, deadline: Duration, job: Scheduled) { self.queue.push(deadline, job) }
    fn next_deadline(&self) -> Option<Duration> { self.queue.next_deadline() }
    fn pop_due(&mut self) -> Option<Scheduled> { self.queue.pop_due(self.now) }
    fn cancel_all(&mut self) -> usize { self.queue.clear() }
    fn pending(&self) -> usize { self.queue.len() }
}
