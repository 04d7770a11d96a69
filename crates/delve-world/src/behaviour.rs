//! Actor decision making.
//!
//! Each tick a level runs the [`Behaviour`] of every actor it hosts. A
//! behaviour only reads the level; what it decides comes back as an
//! [`Intent`] that the level applies to the actor afterwards.
//!
//! [`Behaviour::BasicMonster`] follows three rules, checked against the
//! nearest player on the same level:
//!
//! 1. Within the engagement radius: target that player.
//! 2. Beyond the disengagement radius: do nothing.
//! 3. Otherwise, after idling for the wander period, maybe step to a random
//!    nearby tile. The decision is seeded from the monster's own state, so a
//!    reloaded save makes the same choices.

use std::cmp::Reverse;

use delve_save::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::actor::{Actor, ActorId};
use crate::config::WorldConfig;
use crate::geometry::Tile;
use crate::level::GameLevel;

/// Save tag of [`Behaviour::Null`].
pub const NULL_BEHAVIOUR_TAG: &str = "null-behaviour";
/// Save tag of [`Behaviour::BasicMonster`].
pub const BASIC_MONSTER_TAG: &str = "basic-monster-behaviour";

/// A decision a behaviour hands back to its actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Target this player.
    Engage(ActorId),
    /// Walk to this tile.
    MoveTo(Tile),
}

/// Read-only view a behaviour decides against.
pub struct BehaviourContext<'a> {
    pub level: &'a GameLevel,
    /// Roster of players, highest id first.
    pub players: &'a [ActorId],
    pub config: &'a WorldConfig,
}

// ---------------------------------------------------------------------------
// Behaviour
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Behaviour {
    /// Never decides anything. Players and NPCs use this.
    #[default]
    Null,
    BasicMonster(BasicMonster),
}

impl Behaviour {
    pub fn basic_monster() -> Self {
        Behaviour::BasicMonster(BasicMonster::default())
    }

    /// Link the behaviour to the actor that owns it.
    pub fn attach(&mut self, actor: ActorId) {
        if let Behaviour::BasicMonster(monster) = self {
            monster.actor = Some(actor);
        }
    }

    /// The actor this behaviour drives, if linked.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Behaviour::Null => None,
            Behaviour::BasicMonster(monster) => monster.actor,
        }
    }

    /// Advance one tick.
    pub fn update(&mut self, ctx: &BehaviourContext<'_>) -> Option<Intent> {
        match self {
            Behaviour::Null => None,
            Behaviour::BasicMonster(monster) => monster.update(ctx),
        }
    }

    pub(crate) fn load_basic_monster(loader: &mut GameLoader<'_>) -> Result<Self, SaveError> {
        Ok(Behaviour::BasicMonster(BasicMonster {
            ticks_since_last_action: loader.load()?,
            actor: None,
        }))
    }
}

impl Persist for Behaviour {
    fn type_tag(&self) -> &'static str {
        match self {
            Behaviour::Null => NULL_BEHAVIOUR_TAG,
            Behaviour::BasicMonster(_) => BASIC_MONSTER_TAG,
        }
    }

    fn save(&self, saver: &mut GameSaver) -> Result<(), SaveError> {
        match self {
            Behaviour::Null => Ok(()),
            Behaviour::BasicMonster(monster) => saver.save(&monster.ticks_since_last_action),
        }
    }
}

// ---------------------------------------------------------------------------
// BasicMonster
// ---------------------------------------------------------------------------

/// Chase-or-wander monster brain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicMonster {
    ticks_since_last_action: u64,
    /// Relinked after load; never written to a save.
    actor: Option<ActorId>,
}

impl BasicMonster {
    pub fn ticks_since_last_action(&self) -> u64 {
        self.ticks_since_last_action
    }

    fn update(&mut self, ctx: &BehaviourContext<'_>) -> Option<Intent> {
        self.ticks_since_last_action += 1;

        let Some(id) = self.actor else {
            tracing::debug!("basic monster behaviour has no linked actor");
            return None;
        };
        let actor = ctx.level.actor(id)?;
        if actor.is_dead() {
            return None;
        }

        let (player, dist) = nearest_player(ctx.level, ctx.players, actor)?;
        let engage = ctx.config.engagement_radius;
        let disengage = ctx.config.disengagement_radius;

        if dist <= engage * engage {
            return Some(Intent::Engage(player));
        }
        if dist >= disengage * disengage {
            return None;
        }

        if self.ticks_since_last_action > ctx.config.wander_threshold_ticks()
            && !actor.has_target()
            && !actor.is_moving()
        {
            let tile = wander_destination(
                self.ticks_since_last_action,
                actor,
                ctx.level,
                ctx.config,
            )?;
            self.ticks_since_last_action = 0;
            return Some(Intent::MoveTo(tile));
        }

        None
    }
}

// ---------------------------------------------------------------------------
// Decision helpers
// ---------------------------------------------------------------------------

/// The closest roster player standing on `level`, with its squared distance.
///
/// Ties go to the higher id, which is the roster's own order.
pub fn nearest_player(
    level: &GameLevel,
    players: &[ActorId],
    from: &Actor,
) -> Option<(ActorId, i64)> {
    let here = from.position().current();
    players
        .iter()
        .filter(|&&id| id != from.id())
        .filter_map(|&id| {
            level
                .actor(id)
                .map(|player| (id, player.position().current().distance_squared(here)))
        })
        .min_by_key(|&(id, dist)| (dist, Reverse(id)))
}

/// Pick a wander tile for `actor`, or `None` if it stays put this time.
///
/// Seeded from `ticks + id + x`, so the same monster state always produces
/// the same answer.
pub fn wander_destination(
    ticks: u64,
    actor: &Actor,
    level: &GameLevel,
    config: &WorldConfig,
) -> Option<Tile> {
    let here = actor.position().current();
    let seed = ticks
        .wrapping_add(u64::from(actor.id().0))
        .wrapping_add(i64::from(here.x) as u64);
    let mut rng = Pcg32::seed_from_u64(seed);

    if rng.next_u32() % 100 <= config.wander_chance_threshold {
        return None;
    }

    for _ in 0..config.wander_attempts {
        let dx = wander_offset(&mut rng);
        let dy = wander_offset(&mut rng);
        let candidate = here.offset(dx, dy);
        if candidate != here && level.is_passable(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// One axis of a wander step, in `-2..=2`.
fn wander_offset(rng: &mut Pcg32) -> i32 {
    let sign = (rng.next_u32() % 3) as i32 - 1;
    let stride = (rng.next_u32() % 2) as i32 + 1;
    sign * stride
}
