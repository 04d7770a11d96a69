//! Lazily generated level slots.

use std::collections::BTreeMap;

use crate::actor::ActorIds;
use crate::collaborators::LevelGenerator;
use crate::level::{GameLevel, LevelIndex, LevelRequest};

/// One slot of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSlot {
    /// Reserved, built on first access.
    NotGenerated,
    Generated(Box<GameLevel>),
}

impl LevelSlot {
    pub fn is_generated(&self) -> bool {
        matches!(self, LevelSlot::Generated(_))
    }
}

/// Every level slot of a world, keyed by index.
///
/// An index with no slot does not exist at all; asking for it yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStore {
    slots: BTreeMap<LevelIndex, LevelSlot>,
    generated_width: u32,
    generated_height: u32,
    ticks_per_step: u32,
}

impl LevelStore {
    /// An empty store whose generated levels are `width` by `height` and
    /// whose generated actors step once every `ticks_per_step` ticks.
    pub fn new(generated_width: u32, generated_height: u32, ticks_per_step: u32) -> Self {
        Self {
            slots: BTreeMap::new(),
            generated_width,
            generated_height,
            ticks_per_step,
        }
    }

    /// Return level `index`, generating it first if it was only reserved.
    pub fn get(
        &mut self,
        index: LevelIndex,
        generator: &mut dyn LevelGenerator,
        ids: &mut ActorIds,
    ) -> Option<&mut GameLevel> {
        let slot = self.slots.get_mut(&index)?;
        if let LevelSlot::NotGenerated = slot {
            let request = LevelRequest {
                width: self.generated_width,
                height: self.generated_height,
                level_index: index,
                up_link: index.checked_sub(1),
                down_link: index.checked_add(1),
                ticks_per_step: self.ticks_per_step,
            };
            let level = generator.generate(&request, ids);
            for actor in level.actors() {
                ids.observe(actor.id());
            }
            tracing::info!(
                index,
                actors = level.actor_count(),
                width = level.width(),
                height = level.height(),
                "generated level"
            );
            *slot = LevelSlot::Generated(Box::new(level));
        }
        match slot {
            LevelSlot::Generated(level) => Some(level.as_mut()),
            LevelSlot::NotGenerated => None,
        }
    }

    /// Store a finished level, replacing whatever the slot held.
    pub fn insert(&mut self, index: LevelIndex, level: GameLevel) {
        self.slots.insert(index, LevelSlot::Generated(Box::new(level)));
    }

    /// Create a slot that is generated on first access.
    pub fn reserve(&mut self, index: LevelIndex) {
        self.slots.entry(index).or_insert(LevelSlot::NotGenerated);
    }

    pub fn contains(&self, index: LevelIndex) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn is_generated(&self, index: LevelIndex) -> bool {
        self.slots.get(&index).is_some_and(LevelSlot::is_generated)
    }

    /// Number of slots, generated or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot indices with their generated level, if any.
    pub fn slots(&self) -> impl Iterator<Item = (LevelIndex, Option<&GameLevel>)> {
        self.slots.iter().map(|(&i, slot)| match slot {
            LevelSlot::Generated(level) => (i, Some(level.as_ref())),
            LevelSlot::NotGenerated => (i, None),
        })
    }

    pub fn iter_generated(&self) -> impl Iterator<Item = &GameLevel> {
        self.slots().filter_map(|(_, level)| level)
    }

    pub fn iter_generated_mut(&mut self) -> impl Iterator<Item = &mut GameLevel> {
        self.slots.values_mut().filter_map(|slot| match slot {
            LevelSlot::Generated(level) => Some(level.as_mut()),
            LevelSlot::NotGenerated => None,
        })
    }

    /// Level `index` if it exists and has been generated. Never generates.
    pub fn get_generated(&self, index: LevelIndex) -> Option<&GameLevel> {
        match self.slots.get(&index)? {
            LevelSlot::Generated(level) => Some(level.as_ref()),
            LevelSlot::NotGenerated => None,
        }
    }

    pub fn get_generated_mut(&mut self, index: LevelIndex) -> Option<&mut GameLevel> {
        match self.slots.get_mut(&index)? {
            LevelSlot::Generated(level) => Some(level.as_mut()),
            LevelSlot::NotGenerated => None,
        }
    }
}
