//! The world: every level, every player, and the tick that moves them.
//!
//! A [`World`] owns the [`LevelStore`], the player roster and the
//! collaborators it reports to. Only one world may be alive per thread;
//! constructing a second one while the first still exists panics.
//!
//! Spatial queries live in [`targeting`](crate::targeting), level changes in
//! [`transition`](crate::transition), pointer and keyboard handling in
//! [`input`](crate::input), and save/load in [`persist`](crate::persist).
//! All of them are further `impl World` blocks.

use std::cell::Cell;
use std::time::Instant;

use delve_save::prelude::*;

use crate::actor::{Actor, ActorId, ActorIds, ActorSpec};
use crate::collaborators::Collaborators;
use crate::config::WorldConfig;
use crate::geometry::Tile;
use crate::hover::HoverState;
use crate::input::InputLatches;
use crate::level::{GameLevel, LevelIndex};
use crate::level_store::LevelStore;
use crate::persist::{self, SavedObject};
use crate::tick::{ActorEvent, TickReport};
use crate::town::TownLayout;
use crate::WorldError;

thread_local! {
    static WORLD_LIVE: Cell<bool> = const { Cell::new(false) };
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) levels: LevelStore,
    /// Highest id first.
    pub(crate) players: Vec<ActorId>,
    pub(crate) current_player: Option<ActorId>,
    pub(crate) ticks: u64,
    pub(crate) ids: ActorIds,
    pub(crate) hover: HoverState,
    pub(crate) latches: InputLatches,
    pub(crate) collaborators: Collaborators,
    pub(crate) registry: FactoryRegistry<SavedObject>,
}

impl World {
    /// Create the world for this thread.
    ///
    /// # Panics
    ///
    /// Panics if another `World` is alive on the current thread, or if
    /// `config` fails [`WorldConfig::validate`].
    pub fn new(config: WorldConfig, collaborators: Collaborators) -> Self {
        config.validate();
        WORLD_LIVE.with(|live| {
            assert!(
                !live.get(),
                "a World is already alive on this thread; drop it before creating another"
            );
            live.set(true);
        });

        let registry = persist::registry();
        tracing::info!(
            ticks_per_second = config.ticks_per_second,
            level_count = config.level_count,
            tags = ?registry.registered_tags(),
            "world created"
        );

        Self {
            levels: LevelStore::new(
                config.generated_level_width,
                config.generated_level_height,
                config.ticks_per_step,
            ),
            config,
            players: Vec::new(),
            current_player: None,
            ticks: 0,
            ids: ActorIds::new(),
            hover: HoverState::default(),
            latches: InputLatches::default(),
            collaborators,
            registry,
        }
    }

    /// Whether a world is alive on the current thread.
    pub fn is_live() -> bool {
        WORLD_LIVE.with(Cell::get)
    }

    // ---------- Accessors ----------

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Ticks simulated since creation or the last load.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The id the next spawned actor gets.
    pub fn next_actor_id(&self) -> u32 {
        self.ids.peek()
    }

    pub fn levels(&self) -> &LevelStore {
        &self.levels
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }

    pub fn registry(&self) -> &FactoryRegistry<SavedObject> {
        &self.registry
    }

    // ---------- Levels ----------

    /// Build the town from `town` and reserve every dungeon slot.
    pub fn generate_levels(&mut self, town: &TownLayout) -> Result<(), WorldError> {
        let level = town.build(&mut self.ids, self.config.ticks_per_step)?;
        tracing::info!(npcs = level.actor_count(), "built town");
        self.levels.insert(0, level);
        for index in 1..self.config.level_count {
            self.levels.reserve(index);
        }
        Ok(())
    }

    /// Level `index`, generating it on first access. `None` if there is no
    /// such slot.
    pub fn get_level(&mut self, index: LevelIndex) -> Option<&mut GameLevel> {
        self.levels
            .get(index, self.collaborators.generator.as_mut(), &mut self.ids)
    }

    /// Level `index` if it has already been generated.
    pub fn level(&self, index: LevelIndex) -> Option<&GameLevel> {
        self.levels.get_generated(index)
    }

    pub fn current_level_index(&self) -> Option<LevelIndex> {
        self.current_player().map(Actor::level)
    }

    pub fn current_level(&self) -> Option<&GameLevel> {
        self.level(self.current_level_index()?)
    }

    pub fn current_level_mut(&mut self) -> Option<&mut GameLevel> {
        let index = self.current_level_index()?;
        self.levels.get_generated_mut(index)
    }

    // ---------- Actors ----------

    pub fn actor_by_id(&self, id: ActorId) -> Option<&Actor> {
        self.levels.iter_generated().find_map(|level| level.actor(id))
    }

    pub fn actor_by_id_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.levels
            .iter_generated_mut()
            .find_map(|level| level.actor_mut(id))
    }

    /// The actor standing on `tile` of the current level.
    pub fn actor_at(&self, tile: Tile) -> Option<&Actor> {
        self.current_level()?.actor_at(tile)
    }

    /// Every actor on every generated level, level by level.
    pub fn all_actors(&self) -> impl Iterator<Item = &Actor> {
        self.levels.iter_generated().flat_map(GameLevel::actors)
    }

    /// Create an actor from `spec` on level `level`.
    pub fn spawn_actor(&mut self, level: LevelIndex, spec: ActorSpec) -> Result<ActorId, WorldError> {
        let id = self.ids.allocate();
        let ticks_per_step = self.config.ticks_per_step;
        let target = self.get_level(level).ok_or(WorldError::NoSuchLevel(level))?;
        target.insert_actor(Actor::new(id, spec, ticks_per_step))?;
        tracing::debug!(%id, level, "spawned actor");
        Ok(id)
    }

    /// Move an actor to `tile` on level `level`, across levels if needed.
    ///
    /// Returns `false` and leaves the actor in place if either the actor or
    /// the destination level does not exist.
    pub fn teleport(&mut self, id: ActorId, level: LevelIndex, tile: Tile) -> bool {
        let Some(from) = self.actor_by_id(id).map(Actor::level) else {
            return false;
        };
        if self.get_level(level).is_none() {
            return false;
        }
        let Some(mut actor) = self
            .levels
            .get_generated_mut(from)
            .and_then(|l| l.remove_actor(id))
        else {
            return false;
        };
        actor.place_at(tile);
        let Some(destination) = self.levels.get_generated_mut(level) else {
            return false;
        };
        match destination.insert_actor(actor) {
            Ok(()) => {
                tracing::debug!(%id, from, to = level, %tile, "teleported actor");
                true
            }
            Err(err) => {
                tracing::warn!(%id, %err, "teleport failed");
                false
            }
        }
    }

    // ---------- Players ----------

    /// Roster of player ids, highest first.
    pub fn players(&self) -> &[ActorId] {
        &self.players
    }

    /// Add `id` to the roster, keeping it sorted by descending id.
    pub fn register_player(&mut self, id: ActorId) {
        if self.players.contains(&id) {
            tracing::debug!(%id, "player already registered");
            return;
        }
        let at = self.players.partition_point(|&p| p >= id);
        self.players.insert(at, id);
    }

    pub fn deregister_player(&mut self, id: ActorId) {
        self.players.retain(|&p| p != id);
        if self.current_player == Some(id) {
            self.current_player = None;
        }
    }

    pub fn current_player_id(&self) -> Option<ActorId> {
        self.current_player
    }

    pub fn current_player(&self) -> Option<&Actor> {
        self.actor_by_id(self.current_player?)
    }

    pub fn current_player_mut(&mut self) -> Option<&mut Actor> {
        let id = self.current_player?;
        self.actor_by_id_mut(id)
    }

    /// Place a player on `level`, add it to the roster and make it current.
    pub fn add_current_player(&mut self, spec: ActorSpec, level: LevelIndex) -> Result<ActorId, WorldError> {
        let id = self.spawn_actor(level, spec)?;
        self.register_player(id);
        self.current_player = Some(id);
        tracing::info!(%id, level, "current player set");
        Ok(id)
    }

    // ---------- Simulation ----------

    /// Advance the world one tick.
    ///
    /// Only levels hosting a player run; the rest stay frozen. Afterwards the
    /// hover description follows the pointer, or is cleared while a modal
    /// dialog is up.
    pub fn update(&mut self) -> TickReport {
        let started = Instant::now();
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            ..Default::default()
        };

        let mut active: Vec<LevelIndex> = Vec::new();
        for &id in &self.players {
            if let Some(level) = self.actor_by_id(id).map(Actor::level) {
                if !active.contains(&level) {
                    active.push(level);
                }
            }
        }

        for index in active {
            let level_started = Instant::now();
            if let Some(level) = self.levels.get_generated_mut(index) {
                level.update(&self.players, &self.config, &mut report.events);
                report.updated_levels.push(index);
                report
                    .diagnostics
                    .level_times
                    .push((index, level_started.elapsed()));
            }
        }

        self.react_to_events(&report.events);

        let hover_started = Instant::now();
        if self.collaborators.gui.is_modal_dialog_open() {
            if self.hover.clear() {
                self.collaborators.gui.set_description_text("");
            }
        } else if self.current_player.is_some() {
            let point = self.collaborators.pointer.position();
            self.update_hover(point);
        }
        report.diagnostics.hover_time = hover_started.elapsed();
        report.diagnostics.total_time = started.elapsed();

        tracing::trace!(
            tick = self.ticks,
            levels = report.updated_levels.len(),
            events = report.events.len(),
            "world tick"
        );
        report
    }

    fn react_to_events(&mut self, events: &[ActorEvent]) {
        for event in events {
            match event {
                ActorEvent::TalkRequested { player, npc } if Some(*player) == self.current_player => {
                    // The dialog swallows the mouse release, so unlock here.
                    self.latches.target_lock = false;
                    let name = self
                        .actor_by_id(*npc)
                        .map(|a| a.name().to_owned())
                        .unwrap_or_default();
                    tracing::debug!(%player, %npc, "opening dialog");
                    self.collaborators.gui.open_dialog(&name);
                }
                ActorEvent::MeleeSwing { attacker, target } => {
                    tracing::debug!(%attacker, %target, "melee swing");
                }
                _ => {}
            }
        }
    }
}

impl Drop for World {
    fn drop(&mut self) {
        WORLD_LIVE.with(|live| live.set(false));
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("ticks", &self.ticks)
            .field("levels", &self.levels.len())
            .field("players", &self.players)
            .field("current_player", &self.current_player)
            .field("next_actor_id", &self.ids.peek())
            .finish_non_exhaustive()
    }
}
