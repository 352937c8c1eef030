//! Plays one seeded game on virtual time and logs every event.
//!
//! Usage: `snl_demo [seed] [config.json]`

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake_ladder_engine::rules::progress_percent;
use snake_ladder_engine::{
    EngineConfig, EventType, GamePhase, ManualScheduler, SeededDice, TurnEngine,
};

const MAX_ROLLS: usize = 10_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("seed must be an integer, got {s:?}"))?,
        None => 12345,
    };
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            EngineConfig::from_json(&text)?
        }
        None => EngineConfig::default(),
    };

    let mut engine = TurnEngine::new(config.with_seed(seed), SeededDice::new(seed), ManualScheduler::new())?;
    info!(seed, players = engine.players().len(), features = engine.board().len(), "demo game");

    engine.start_game();
    let mut rolls = 0;
    while engine.phase() == GamePhase::Playing {
        if rolls == MAX_ROLLS {
            bail!("no winner after {MAX_ROLLS} rolls");
        }
        engine.roll_dice();
        engine.run_until_idle()?;
        rolls += 1;
        for ev in engine.drain_events() {
            match ev.ty {
                EventType::RollFace | EventType::RollStarted => {}
                _ => info!(seq = ev.seq, ty = ?ev.ty, payload = %ev.payload, "event"),
            }
        }
    }

    // let the win message expire like a view would
    engine.advance(Duration::from_millis(engine.timing().win_message_ms))?;
    let winner = engine.winner().context("finished without a winner")?;
    info!(rolls, winner = %winner.name, "game over");
    for p in engine.players() {
        println!("{:<12} {:>3} ({}%)", p.name, p.position, progress_percent(p.position));
    }
    Ok(())
}
