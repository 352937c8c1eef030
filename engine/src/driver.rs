//! Runs one game per tokio task.
//!
//! The task owns its [`TurnEngine`] outright. Commands arrive over an mpsc
//! channel, and the task sleeps until the next pending continuation. Snapshots
//! go out on a watch channel and events on a broadcast channel.

use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engine::TurnEngine;
use crate::error::EngineError;
use crate::model::{Event, Snapshot};
use crate::rng::DiceSource;
use crate::scheduler::{Scheduled, Scheduler, TimerQueue};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command { Start, Reset, Roll, Shutdown }

/// Scheduler on tokio's clock, so paused-time tests run instantly.
#[derive(Debug)]
pub struct TokioScheduler {
    origin: Instant,
    queue: TimerQueue,
}

impl Default for TokioScheduler {
    fn default() -> Self { Self::new() }
}

impl TokioScheduler {
    pub fn new() -> Self { Self { origin: Instant::now(), queue: TimerQueue::new() } }

    pub fn instant_at(&self, offset: Duration) -> Instant { self.origin + offset }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration { self.origin.elapsed() }
    fn schedule_at(&mut self, deadline: Duration, job: Scheduled) { self.queue.push(deadline, job) }
    fn next_deadline(&self) -> Option<Duration> { self.queue.next_deadline() }
    fn pop_due(&mut self) -> Option<Scheduled> { self.queue.pop_due(self.now()) }
    fn cancel_all(&mut self) -> usize { self.queue.clear() }
    fn pending(&self) -> usize { self.queue.len() }
}

pub struct GameHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    events: broadcast::Sender<Event>,
    task: JoinHandle<()>,
}

/// Spawns a game task on the current tokio runtime.
pub fn spawn<D>(config: EngineConfig, dice: D) -> Result<GameHandle, EngineError>
where
    D: DiceSource + Send + 'static,
{
    let engine = TurnEngine::new(config, dice, TokioScheduler::new())?;
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snap_tx, snap_rx) = watch::channel(engine.snapshot());
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
    let task = tokio::spawn(run(engine, cmd_rx, snap_tx, event_tx.clone()));
    Ok(GameHandle { commands: cmd_tx, snapshots: snap_rx, events: event_tx, task })
}

impl GameHandle {
    pub async fn send(&self, cmd: Command) -> Result<(), EngineError> {
        self.commands.send(cmd).await.map_err(|_| EngineError::Stopped)
    }

    pub async fn start(&self) -> Result<(), EngineError> { self.send(Command::Start).await }
    pub async fn reset(&self) -> Result<(), EngineError> { self.send(Command::Reset).await }
    pub async fn roll(&self) -> Result<(), EngineError> { self.send(Command::Roll).await }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot { self.snapshots.borrow().clone() }

    pub fn watch(&self) -> watch::Receiver<Snapshot> { self.snapshots.clone() }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> { self.events.subscribe() }

    /// Stops the task and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown).await;
        if let Err(err) = self.task.await {
            warn!(%err, "game task ended abnormally");
        }
    }
}

async fn run<D: DiceSource>(
    mut engine: TurnEngine<D, TokioScheduler>,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<Event>,
) {
    loop {
        let deadline = engine.scheduler().next_deadline().map(|d| engine.scheduler().instant_at(d));
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(Command::Start) => engine.start_game(),
                Some(Command::Reset) => engine.reset_game(),
                Some(Command::Roll) => engine.roll_dice(),
                Some(Command::Shutdown) | None => break,
            },
            _ = sleep_until_opt(deadline) => {}
        }
        if let Err(err) = engine.fire_due() {
            warn!(%err, "continuation failed");
        }
        for ev in engine.drain_events() {
            // no subscribers is fine
            let _ = events.send(ev);
        }
        snapshots.send_replace(engine.snapshot());
    }
    debug!(generation = engine.generation(), "game task stopped");
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
