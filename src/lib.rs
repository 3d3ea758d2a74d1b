//! Turn-based multiplayer dice game.
//!
//! Players (human or automated) take turns rolling two dice over a fixed
//! number of rounds. Every mutation of game state happens on the single
//! worker of a [`Dispatcher`], so a roll, its animation and its turn
//! continuation never overlap with anything else.
//!
//! ## Architecture
//!
//! - [`Table`]: Owned game session handle for starting games, submitting rolls and reading state
//! - [`Dispatcher`]: Single-worker serialized task queue with delayed submission
//! - [`Session`]: Worker-owned state executing roll actions and continuations
//! - [`Game`]: Turn and round state machine over a [`Ring`] of [`Player`]s
//!
//! ## Presentation
//!
//! - [`Signal`]: Outbound events (dice frames, announcements, input lock)
//! - [`Snapshot`]: Query surface published after every mutation
//! - [`Presenter`]: Trait for pluggable front ends, run by a [`Screen`]

mod dice;
mod dispatcher;
mod error;
mod game;
mod job;
mod latch;
mod outcome;
mod pacing;
mod phase;
mod player;
mod ring;
mod scoring;
mod screen;
mod session;
mod signal;
mod snapshot;
mod table;

#[cfg(feature = "cli")]
mod console;

pub use dice::*;
pub use dispatcher::*;
pub use error::*;
pub use game::*;
pub use job::*;
pub use latch::*;
pub use outcome::*;
pub use pacing::*;
pub use phase::*;
pub use player::*;
pub use ring::*;
pub use scoring::*;
pub use screen::*;
pub use session::*;
pub use signal::*;
pub use snapshot::*;
pub use table::*;

#[cfg(feature = "cli")]
pub use console::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Accumulated points of a player.
pub type Score = u32;
/// Index into the turn ring, in configuration order.
pub type Position = usize;
/// Monotonic game counter. Jobs carry the epoch of the game they belong to.
pub type Epoch = u64;

// ============================================================================
// DICE
// ============================================================================
/// Faces on each die.
pub const FACES: u8 = 6;

// ============================================================================
// PACING
// The animation occupies the worker for roughly two and a half seconds:
// frame n waits FRAME_BASE_MS + n²/3 milliseconds.
// ============================================================================
/// Intermediate dice frames shown before the applied outcome.
pub const FRAMES: usize = 19;
/// Base wait between two animation frames (milliseconds).
pub const FRAME_BASE_MS: u64 = 100;
/// Time a human gets to read their own result before the turn advances.
pub const HUMAN_GRACE: std::time::Duration = std::time::Duration::from_secs(5);
/// Delay before a bot rolls right after another bot.
pub const MACHINE_DELAY: std::time::Duration = std::time::Duration::from_millis(100);
/// Delay before a bot rolls right after a human.
pub const HANDOFF_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

// ============================================================================
// SETUP LIMITS
// Bounds for interactive setup and command-line flags only.
// ============================================================================
/// Largest round count offered during setup.
pub const MAX_ROUNDS: usize = 10;
/// Largest lineup offered during setup.
pub const MAX_PLAYERS: usize = 8;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, WARN to terminal
/// so the game output stays readable.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Warn,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}

/// Register Ctrl+C handler that halts the table's dispatcher, then exits.
/// A roll caught mid-animation is aborted without touching any score.
#[cfg(feature = "cli")]
pub fn kys(table: &Table) {
    let halt = table.halter();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, halting dispatcher");
            halt.halt();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            std::process::exit(0);
        }
    });
}
