//! Delve World -- a deterministic, tick-driven dungeon world.
//!
//! The [`World`](world::World) owns every level and the actors on them,
//! advances them one tick at a time, answers screen-space queries about what
//! is under the pointer, and saves and restores itself through
//! [`delve_save`].
//!
//! # Quick Start
//!
//! ```
//! use delve_world::prelude::*;
//!
//! let mut world = World::new(WorldConfig::default(), Collaborators::headless(7));
//! world.generate_levels(&TownLayout::classic()).unwrap();
//! let hero = world
//!     .add_current_player(ActorSpec::player("Warrior", Tile::new(30, 30)), 0)
//!     .unwrap();
//!
//! for _ in 0..10 {
//!     world.update();
//! }
//! assert_eq!(world.ticks(), 10);
//!
//! world.change_level(false);
//! assert_eq!(world.current_level_index(), Some(1));
//! assert_eq!(world.current_player_id(), Some(hero));
//! ```

#![deny(unsafe_code)]

pub mod actor;
pub mod behaviour;
pub mod collaborators;
pub mod config;
pub mod generator;
pub mod geometry;
pub mod hover;
pub mod input;
pub mod level;
pub mod level_store;
pub mod persist;
pub mod projection;
pub mod replay;
pub mod targeting;
pub mod tick;
pub mod town;
pub mod transition;
pub mod world;

use actor::ActorId;
use level::LevelIndex;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building, saving or loading a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Save(#[from] delve_save::SaveError),

    /// The registry rebuilt a different kind of object than the stream
    /// position calls for.
    #[error("save entry {position}: expected {expected}, found {found}")]
    UnexpectedObject {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// A save names no current player, or one that is not on any level.
    #[error("current player {0:?} is not present in the save")]
    MissingCurrentPlayer(Option<ActorId>),

    /// Two actors share an id.
    #[error("duplicate actor {0}")]
    DuplicateActor(ActorId),

    #[error("level {0} does not exist")]
    NoSuchLevel(LevelIndex),

    #[error("invalid town layout: {0}")]
    InvalidTown(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::actor::{
        Actor, ActorId, ActorIds, ActorSpec, EquipSlot, Faction, Item, ItemAction, ItemTarget,
        PlacedItem, Target,
    };
    pub use crate::behaviour::{Behaviour, Intent};
    pub use crate::collaborators::{
        Audio, Collaborators, Gui, LevelGenerator, Pointer, Renderer, ScreenTile, TileHalf,
    };
    pub use crate::config::WorldConfig;
    pub use crate::geometry::{Direction, Point, Position, Tile};
    pub use crate::hover::HoverState;
    pub use crate::input::{InputEvent, InputFrame, KeyboardAction, MouseAction};
    pub use crate::level::{GameLevel, LevelIndex, LevelRequest, TileKind, TileMap};
    pub use crate::level_store::{LevelSlot, LevelStore};
    pub use crate::projection::DiamondProjection;
    pub use crate::tick::{ActorEvent, TickReport};
    pub use crate::town::{NpcSpawn, TownLayout};
    pub use crate::world::World;
    pub use crate::WorldError;
}
