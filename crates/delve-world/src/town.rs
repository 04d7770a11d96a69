//! The hand-built town on level 0.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorIds, ActorSpec};
use crate::geometry::{Direction, Tile};
use crate::level::{GameLevel, TileKind, TileMap};
use crate::WorldError;

/// An NPC standing in town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub name: String,
    pub tile: Tile,
    /// Facing as a rotation index, see [`Direction::from_rotation`].
    pub rotation: u8,
}

impl NpcSpawn {
    pub fn new(name: impl Into<String>, x: i32, y: i32, rotation: u8) -> Self {
        Self {
            name: name.into(),
            tile: Tile::new(x, y),
            rotation,
        }
    }
}

/// Everything needed to build the town.
///
/// The map is four sectors stitched two by two: top-left, top-right,
/// bottom-left, bottom-right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownLayout {
    pub sectors: [TileMap; 4],
    pub up_stairs: Tile,
    pub down_stairs: Tile,
    pub npcs: Vec<NpcSpawn>,
}

impl TownLayout {
    /// The classic 100x100 town with its six residents.
    pub fn classic() -> Self {
        let sector = |wall_top: bool, wall_left: bool| {
            let mut map = TileMap::open(50, 50);
            for i in 0..50 {
                let edge = if wall_top { 0 } else { 49 };
                map.set(Tile::new(i, edge), TileKind::Wall);
                let side = if wall_left { 0 } else { 49 };
                map.set(Tile::new(side, i), TileKind::Wall);
            }
            map
        };

        Self {
            sectors: [
                sector(true, true),
                sector(true, false),
                sector(false, true),
                sector(false, false),
            ],
            up_stairs: Tile::new(25, 29),
            down_stairs: Tile::new(75, 68),
            npcs: vec![
                NpcSpawn::new("Griswold", 62, 63, 0),
                NpcSpawn::new("Pepin", 55, 79, 6),
                NpcSpawn::new("Ogden", 55, 62, 0),
                NpcSpawn::new("Cain", 62, 71, 2),
                NpcSpawn::new("Adria", 71, 84, 3),
                NpcSpawn::new("Gillian", 55, 68, 0),
            ],
        }
    }

    /// Stitch the map and place the NPCs.
    ///
    /// # Errors
    ///
    /// [`WorldError::InvalidTown`] when sectors differ in size, or a stair or
    /// NPC tile is not walkable, or two NPCs share a tile.
    pub fn build(&self, ids: &mut ActorIds, ticks_per_step: u32) -> Result<GameLevel, WorldError> {
        let [a, b, c, d] = &self.sectors;
        let tiles = TileMap::stitch_quadrants([a, b, c, d])?;

        for (what, tile) in [("up stairs", self.up_stairs), ("down stairs", self.down_stairs)] {
            if !tiles.is_walkable(tile) {
                return Err(WorldError::InvalidTown(format!("{what} at {tile} are not walkable")));
            }
        }

        let mut level = GameLevel::new(0, tiles, self.up_stairs, self.down_stairs, None, Some(1));
        for npc in &self.npcs {
            if !level.is_passable(npc.tile) {
                return Err(WorldError::InvalidTown(format!(
                    "{} cannot stand at {}",
                    npc.name, npc.tile
                )));
            }
            let spec = ActorSpec::npc(
                npc.name.clone(),
                npc.tile,
                Direction::from_rotation(npc.rotation),
            );
            level.insert_actor(Actor::new(ids.allocate(), spec, ticks_per_step))?;
        }
        Ok(level)
    }
}
