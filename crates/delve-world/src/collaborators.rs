//! Interfaces to the systems around the world.
//!
//! Rendering, audio, the GUI, pointer polling and dungeon generation live
//! outside this crate. The world talks to them only through these traits,
//! bundled in [`Collaborators`]. Calls are fire-and-forget: nothing here can
//! fail the simulation.

use crate::actor::ActorIds;
use crate::generator::ScatterGenerator;
use crate::geometry::{Point, Tile};
use crate::level::{GameLevel, LevelRequest};
use crate::projection::DiamondProjection;

/// Which half of a diamond tile a screen point fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileHalf {
    Left,
    Right,
}

/// Result of mapping a screen point onto the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenTile {
    pub tile: Tile,
    pub half: TileHalf,
}

pub trait Renderer {
    /// The tile under `point` when the view is centred on `viewer`.
    fn tile_for_screen_point(&self, point: Point, viewer: Tile) -> ScreenTile;

    /// Cursor sprite size in pixels, `(width, height)`.
    fn cursor_size(&self) -> (i32, i32);
}

pub trait LevelGenerator {
    /// Build the level described by `request`. Actors it creates must take
    /// their ids from `ids`.
    fn generate(&mut self, request: &LevelRequest, ids: &mut ActorIds) -> GameLevel;
}

pub trait Audio {
    fn play_track(&mut self, name: &str);
}

pub trait Gui {
    fn set_description_text(&mut self, text: &str);
    fn is_modal_dialog_open(&self) -> bool;
    fn is_inventory_open(&self) -> bool;
    /// Open the conversation with the named NPC.
    fn open_dialog(&mut self, npc: &str);
}

pub trait Pointer {
    fn position(&self) -> Point;
    fn is_primary_down(&self) -> bool;
}

/// Everything the world calls out to.
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub generator: Box<dyn LevelGenerator>,
    pub audio: Box<dyn Audio>,
    pub gui: Box<dyn Gui>,
    pub pointer: Box<dyn Pointer>,
}

impl Collaborators {
    /// Collaborators for running without a window: a 640x480 diamond
    /// projection, the scatter generator, no sound, and a GUI and pointer
    /// that never change.
    pub fn headless(seed: u64) -> Self {
        Self {
            renderer: Box::new(DiamondProjection::default()),
            generator: Box::new(ScatterGenerator::new(seed)),
            audio: Box::new(SilentAudio),
            gui: Box::new(HeadlessGui::default()),
            pointer: Box::new(FixedPointer::default()),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// ---------- Headless stand-ins ----------

/// Drops every track request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl Audio for SilentAudio {
    fn play_track(&mut self, name: &str) {
        tracing::trace!(track = name, "audio disabled");
    }
}

/// Remembers the description text and never opens anything.
#[derive(Debug, Default, Clone)]
pub struct HeadlessGui {
    pub description: String,
}

impl Gui for HeadlessGui {
    fn set_description_text(&mut self, text: &str) {
        self.description = text.to_owned();
    }

    fn is_modal_dialog_open(&self) -> bool {
        false
    }

    fn is_inventory_open(&self) -> bool {
        false
    }

    fn open_dialog(&mut self, npc: &str) {
        tracing::debug!(npc, "dialog requested without a GUI");
    }
}

/// A pointer parked at one spot.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedPointer {
    pub position: Point,
    pub primary_down: bool,
}

impl Pointer for FixedPointer {
    fn position(&self) -> Point {
        self.position
    }

    fn is_primary_down(&self) -> bool {
        self.primary_down
    }
}
