//! Per-tick reporting.
//!
//! [`World::update`](crate::world::World::update) returns a [`TickReport`]
//! describing what happened during the tick: which levels ran, what actors
//! did that the outside world has to react to, and how long it took.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::geometry::Tile;
use crate::level::LevelIndex;

// ---------------------------------------------------------------------------
// ActorEvent
// ---------------------------------------------------------------------------

/// Something an actor did this tick that needs a reaction outside the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorEvent {
    /// `attacker` reached `target` and swung at it.
    MeleeSwing { attacker: ActorId, target: ActorId },
    /// A player reached an NPC and wants to talk.
    TalkRequested { player: ActorId, npc: ActorId },
    /// A player picked an item off the floor.
    ItemPickedUp {
        actor: ActorId,
        item: String,
        tile: Tile,
    },
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// Outcome of one [`World::update`](crate::world::World::update).
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Tick number after the update.
    pub tick: u64,
    /// Levels that were simulated, in the order they ran.
    pub updated_levels: Vec<LevelIndex>,
    pub events: Vec<ActorEvent>,
    pub diagnostics: TickDiagnostics,
}

impl TickReport {
    pub fn swings(&self) -> impl Iterator<Item = (ActorId, ActorId)> + '_ {
        self.events.iter().filter_map(|e| match e {
            ActorEvent::MeleeSwing { attacker, target } => Some((*attacker, *target)),
            _ => None,
        })
    }
}

/// Wall-clock timings of the last tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Time spent per simulated level, in update order.
    pub level_times: Vec<(LevelIndex, Duration)>,
    pub hover_time: Duration,
    pub total_time: Duration,
}
