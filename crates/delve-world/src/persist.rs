//! Saving and loading a whole world.
//!
//! Stream layout, in order:
//!
//! 1. number of level slots
//! 2. for each slot: its index, whether it was generated, and the level body
//!    if it was
//! 3. the current player's id
//! 4. the next actor id to hand out
//!
//! Loading happens in two phases. Everything is read first; links between
//! objects (behaviour owners, occupancy, the roster and the current player)
//! are only restored once all levels exist.

use delve_save::prelude::*;

use crate::actor::{Actor, ActorId, ActorIds, ACTOR_TAG, PLAYER_TAG};
use crate::behaviour::{Behaviour, BASIC_MONSTER_TAG, NULL_BEHAVIOUR_TAG};
use crate::input::InputLatches;
use crate::hover::HoverState;
use crate::level::{GameLevel, LevelIndex};
use crate::level_store::LevelStore;
use crate::world::World;
use crate::WorldError;

/// Anything the world registry can rebuild from a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum SavedObject {
    Actor(Actor),
    Behaviour(Behaviour),
}

/// Registry with a factory for every tag a world save can contain.
pub fn registry() -> FactoryRegistry<SavedObject> {
    let mut registry = FactoryRegistry::new();
    registry.register(ACTOR_TAG, |loader, registry| {
        Actor::load(loader, registry, false).map(SavedObject::Actor)
    });
    registry.register(PLAYER_TAG, |loader, registry| {
        Actor::load(loader, registry, true).map(SavedObject::Actor)
    });
    registry.register(NULL_BEHAVIOUR_TAG, |_, _| {
        Ok(SavedObject::Behaviour(Behaviour::Null))
    });
    registry.register(BASIC_MONSTER_TAG, |loader, _| {
        Behaviour::load_basic_monster(loader).map(SavedObject::Behaviour)
    });
    registry
}

impl World {
    /// Write the whole world to `saver`.
    pub fn save(&self, saver: &mut GameSaver) -> Result<(), SaveError> {
        saver.save(&self.levels.len())?;
        for (index, level) in self.levels.slots() {
            saver.scoped("Level", |s| {
                s.save(&index)?;
                s.save(&level.is_some())?;
                match level {
                    Some(level) => level.save(s),
                    None => Ok(()),
                }
            })?;
        }
        saver.save(&self.current_player)?;
        saver.save(&self.ids.peek())?;
        Ok(())
    }

    /// Save into a sealed, hashed file.
    pub fn save_file(&self) -> Result<SaveFile, SaveError> {
        let mut saver = GameSaver::new();
        self.save(&mut saver)?;
        Ok(SaveFile::seal(saver))
    }

    /// Replace the world's state with what `loader` holds.
    ///
    /// The current player must be a player actor on some level. On error the
    /// world is left untouched.
    pub fn load(&mut self, loader: &mut GameLoader<'_>) -> Result<(), WorldError> {
        // Phase one: read.
        let slot_count: usize = loader.load()?;
        let mut levels = LevelStore::new(
            self.config.generated_level_width,
            self.config.generated_level_height,
            self.config.ticks_per_step,
        );
        for _ in 0..slot_count {
            let index: LevelIndex = loader.load()?;
            let generated: bool = loader.load()?;
            if generated {
                let level = GameLevel::load(loader, &self.registry, index)?;
                levels.insert(index, level);
            } else {
                levels.reserve(index);
            }
        }
        let current: Option<ActorId> = loader.load()?;
        let next_id: u32 = loader.load()?;

        // Phase two: link.
        let current = current.ok_or(WorldError::MissingCurrentPlayer(None))?;
        let mut ids = ActorIds::resume_at(next_id);
        let mut players = Vec::new();
        let mut seen = std::collections::BTreeSet::new();
        let mut found_current = false;
        for actor in levels.iter_generated().flat_map(GameLevel::actors) {
            if !seen.insert(actor.id()) {
                return Err(WorldError::DuplicateActor(actor.id()));
            }
            ids.observe(actor.id());
            if actor.is_player() {
                players.push(actor.id());
                found_current |= actor.id() == current;
            }
        }
        if !found_current {
            return Err(WorldError::MissingCurrentPlayer(Some(current)));
        }

        self.levels = levels;
        self.ids = ids;
        self.players.clear();
        for id in players {
            self.register_player(id);
        }
        self.current_player = Some(current);
        self.ticks = 0;
        self.hover = HoverState::default();
        self.latches = InputLatches::default();

        tracing::info!(
            levels = self.levels.len(),
            players = self.players.len(),
            %current,
            next_actor_id = self.ids.peek(),
            "world loaded"
        );
        Ok(())
    }

    /// Verify `file` and load it.
    pub fn load_file(&mut self, file: &SaveFile) -> Result<(), WorldError> {
        let mut loader = file.loader()?;
        self.load(&mut loader)?;
        if !loader.is_exhausted() {
            tracing::warn!(remaining = loader.remaining(), "save has trailing entries");
        }
        Ok(())
    }

    /// BLAKE3 digest of everything a save would contain.
    pub fn state_hash(&self) -> Result<String, SaveError> {
        let mut saver = GameSaver::new();
        self.save(&mut saver)?;
        Ok(content_hash(saver.entries()))
    }
}
