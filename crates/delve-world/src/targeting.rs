//! Screen-space hit testing against the current level.
//!
//! Actors are drawn taller than their tile, so a point over a tile may really
//! be over the sprite of an actor standing one row further down the screen.
//! [`World::targeted_actor`] checks the tiles below the hit in a fixed order
//! to account for that.

use crate::actor::{Actor, EquipSlot, PlacedItem};
use crate::collaborators::{ScreenTile, TileHalf};
use crate::geometry::Point;
use crate::world::World;

impl World {
    /// The tile under `point`, seen from the current player.
    pub fn tile_at(&self, point: Point) -> Option<ScreenTile> {
        let viewer = self.current_player()?.position().current();
        Some(
            self.collaborators
                .renderer
                .tile_for_screen_point(point, viewer),
        )
    }

    /// The live actor under `point`, never the current player.
    ///
    /// Checks the hit tile, then the tile diagonally below it, then the tile
    /// below on the side of the tile that was hit.
    pub fn targeted_actor(&self, point: Point) -> Option<&Actor> {
        let hit = self.tile_at(point)?;
        let level = self.current_level()?;
        let tile = hit.tile;
        let beside = match hit.half {
            TileHalf::Right => tile.offset(1, 0),
            TileHalf::Left => tile.offset(0, 1),
        };

        [tile, tile.offset(1, 1), beside]
            .into_iter()
            .filter(|&t| level.contains(t))
            .find_map(|t| {
                level
                    .actor_at(t)
                    .filter(|a| !a.is_dead() && Some(a.id()) != self.current_player)
            })
    }

    /// The item lying on the tile under `point`.
    pub fn targeted_item(&self, point: Point) -> Option<&PlacedItem> {
        let hit = self.tile_at(point)?;
        self.current_level()?.item_at(hit.tile)
    }

    /// Refresh the hover state and description line for `point`.
    ///
    /// A cursor item wins over anything on screen, then actors, then items.
    /// The description is only rewritten when the hovered thing changes.
    pub fn update_hover(&mut self, point: Point) {
        let cursor_item = self
            .current_player()
            .and_then(Actor::player_state)
            .and_then(|s| s.inventory.item_at(EquipSlot::Cursor))
            .map(|item| item.name.clone());
        if let Some(name) = cursor_item {
            if self.hover.set_cursor_item(&name) {
                self.collaborators.gui.set_description_text(&name);
            }
            return;
        }

        if let Some((id, name)) = self
            .targeted_actor(point)
            .map(|a| (a.id(), a.name().to_owned()))
        {
            if self.hover.set_actor(id) {
                self.collaborators.gui.set_description_text(&name);
            }
            return;
        }

        if let Some((tile, name)) = self
            .targeted_item(point)
            .map(|p| (p.tile, p.item.name.clone()))
        {
            if self.hover.set_item(tile) {
                self.collaborators.gui.set_description_text(&name);
            }
            return;
        }

        if self.hover.clear() {
            self.collaborators.gui.set_description_text("");
        }
    }
}
