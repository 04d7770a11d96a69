//! Input recording and deterministic replay.
//!
//! A [`ReplayLog`] holds a sealed save to start from, the [`InputFrame`]s fed
//! during recording, and periodic state hash checkpoints. [`replay`] loads
//! the save into a world, feeds the same inputs tick by tick, and compares
//! hashes at every checkpoint.
//!
//! Ticks in a log count from zero at the initial save. Both the recording and
//! the replaying world must use equivalent collaborators, since lazily
//! generated levels come from the level generator.
//!
//! ```no_run
//! use delve_world::prelude::*;
//! use delve_world::replay::{replay, ReplayRecorder};
//!
//! # fn run(world: &mut World) -> anyhow::Result<()> {
//! let mut recorder = ReplayRecorder::start(world, 10)?;
//! for tick in 0..100 {
//!     let input = InputFrame::new();
//!     world.apply_input(&input);
//!     recorder.record_tick(tick, &input, Some(world.state_hash()?));
//!     world.update();
//! }
//! let log = recorder.finish();
//!
//! let result = replay(world, &log)?;
//! assert!(result.first_divergence.is_none());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use anyhow::Context;
use delve_save::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::InputFrame;
use crate::world::World;

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    /// The world as it was when recording started.
    pub initial_save: SaveFile,
    /// Ticks recorded. Replay runs exactly this many.
    pub total_ticks: u64,
    pub entries: Vec<ReplayEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// Input applied before tick `tick` ran.
    Input { tick: u64, input: InputFrame },
    /// State hash after the input of `tick`, before the tick ran.
    Checkpoint { tick: u64, state_hash: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub completed: bool,
    pub ticks_replayed: u64,
    /// First checkpoint whose hash did not match. `None` means deterministic.
    pub first_divergence: Option<ReplayDivergence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayDivergence {
    pub tick: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Builds a [`ReplayLog`] while a world runs.
pub struct ReplayRecorder {
    log: ReplayLog,
    checkpoint_interval: u64,
    ticks_recorded: u64,
    last_tick: Option<u64>,
}

impl ReplayRecorder {
    /// Save `world` and reload it from that save, so the recording starts
    /// from exactly the state a replay will start from.
    ///
    /// With a `checkpoint_interval` of 0 every supplied hash is kept.
    pub fn start(world: &mut World, checkpoint_interval: u64) -> anyhow::Result<Self> {
        let initial_save = world.save_file().context("saving initial replay state")?;
        world
            .load_file(&initial_save)
            .context("reloading initial replay state")?;
        Ok(Self {
            log: ReplayLog {
                initial_save,
                total_ticks: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            ticks_recorded: 0,
            last_tick: None,
        })
    }

    /// Record one tick. Call after applying `input` and before updating.
    ///
    /// # Panics
    ///
    /// Panics if `tick` is not strictly greater than the previous call's.
    pub fn record_tick(&mut self, tick: u64, input: &InputFrame, state_hash: Option<String>) {
        if let Some(prev) = self.last_tick {
            assert!(
                tick > prev,
                "ReplayRecorder::record_tick: tick {tick} is not after previous tick {prev}"
            );
        }
        self.last_tick = Some(tick);
        self.ticks_recorded += 1;

        if !input.is_empty() {
            self.log.entries.push(ReplayEntry::Input {
                tick,
                input: input.clone(),
            });
        }

        if let Some(hash) = state_hash {
            let due = self.checkpoint_interval == 0 || tick % self.checkpoint_interval == 0;
            if due {
                self.log.entries.push(ReplayEntry::Checkpoint {
                    tick,
                    state_hash: hash,
                });
            }
        }
    }

    pub fn finish(mut self) -> ReplayLog {
        self.log.total_ticks = self.ticks_recorded;
        self.log
    }
}

// ---------------------------------------------------------------------------
// replay()
// ---------------------------------------------------------------------------

/// Replay `log` on `world` and report the first hash divergence.
///
/// # Errors
///
/// Fails on duplicate entries or an initial save that does not load. The log
/// is validated before the world is touched.
pub fn replay(world: &mut World, log: &ReplayLog) -> anyhow::Result<ReplayResult> {
    let mut inputs: BTreeMap<u64, &InputFrame> = BTreeMap::new();
    let mut checkpoints: BTreeMap<u64, &str> = BTreeMap::new();
    for entry in &log.entries {
        match entry {
            ReplayEntry::Input { tick, input } => {
                if inputs.insert(*tick, input).is_some() {
                    anyhow::bail!("replay log contains duplicate Input entry at tick {tick}");
                }
            }
            ReplayEntry::Checkpoint { tick, state_hash } => {
                if checkpoints.insert(*tick, state_hash).is_some() {
                    anyhow::bail!("replay log contains duplicate Checkpoint entry at tick {tick}");
                }
            }
        }
    }
    log.initial_save
        .verify()
        .context("replay log carries a damaged initial save")?;

    world
        .load_file(&log.initial_save)
        .context("failed to load initial save for replay")?;

    let mut ticks_replayed = 0;
    for tick in 0..log.total_ticks {
        if let Some(input) = inputs.get(&tick) {
            world.apply_input(input);
        }

        if let Some(&expected) = checkpoints.get(&tick) {
            let actual = world.state_hash()?;
            if actual != expected {
                tracing::warn!(tick, %expected, %actual, "replay diverged");
                return Ok(ReplayResult {
                    completed: false,
                    ticks_replayed,
                    first_divergence: Some(ReplayDivergence {
                        tick,
                        expected_hash: expected.to_owned(),
                        actual_hash: actual,
                    }),
                });
            }
        }

        world.update();
        ticks_replayed += 1;
    }

    Ok(ReplayResult {
        completed: true,
        ticks_replayed,
        first_divergence: None,
    })
}
