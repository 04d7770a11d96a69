//! Isometric screen-to-tile mapping.

use crate::collaborators::{Renderer, ScreenTile, TileHalf};
use crate::geometry::{Point, Tile};

/// Diamond tile projection with the viewer's tile centred on screen.
///
/// Tile `(x, y)` relative to the viewer has its centre at
/// `((x - y) * w / 2, (x + y) * h / 2)` pixels from the screen centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiamondProjection {
    pub tile_width: i32,
    pub tile_height: i32,
    pub screen_width: i32,
    pub screen_height: i32,
    pub cursor: (i32, i32),
}

impl Default for DiamondProjection {
    fn default() -> Self {
        Self {
            tile_width: 64,
            tile_height: 32,
            screen_width: 640,
            screen_height: 480,
            cursor: (28, 28),
        }
    }
}

impl DiamondProjection {
    /// Screen position of the centre of `tile`.
    pub fn screen_centre(&self, tile: Tile, viewer: Tile) -> Point {
        let rx = tile.x - viewer.x;
        let ry = tile.y - viewer.y;
        Point::new(
            self.screen_width / 2 + (rx - ry) * self.tile_width / 2,
            self.screen_height / 2 + (rx + ry) * self.tile_height / 2,
        )
    }
}

impl Renderer for DiamondProjection {
    fn tile_for_screen_point(&self, point: Point, viewer: Tile) -> ScreenTile {
        let (w, h) = (i64::from(self.tile_width), i64::from(self.tile_height));
        let dx = i64::from(point.x - self.screen_width / 2);
        let dy = i64::from(point.y - self.screen_height / 2);

        // Round to the nearest tile centre in the rotated grid.
        let area = w * h;
        let rx = (2 * (dx * h + dy * w) + area).div_euclid(2 * area);
        let ry = (2 * (dy * w - dx * h) + area).div_euclid(2 * area);

        let centre_x = (rx - ry) * w / 2;
        let half = if dx >= centre_x {
            TileHalf::Right
        } else {
            TileHalf::Left
        };

        ScreenTile {
            tile: viewer.offset(rx as i32, ry as i32),
            half,
        }
    }

    fn cursor_size(&self) -> (i32, i32) {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_centre_is_the_viewer_tile() {
        let p = DiamondProjection::default();
        let viewer = Tile::new(40, 40);
        let hit = p.tile_for_screen_point(Point::new(320, 240), viewer);
        assert_eq!(hit.tile, viewer);
        assert_eq!(hit.half, TileHalf::Right);
    }

    #[test]
    fn tile_centres_map_back_to_their_tile() {
        let p = DiamondProjection::default();
        let viewer = Tile::new(10, 10);
        for dx in -3..=3 {
            for dy in -3..=3 {
                let tile = viewer.offset(dx, dy);
                let centre = p.screen_centre(tile, viewer);
                assert_eq!(p.tile_for_screen_point(centre, viewer).tile, tile);
            }
        }
    }

    #[test]
    fn halves_split_at_the_centre_column() {
        let p = DiamondProjection::default();
        let viewer = Tile::new(5, 5);
        let centre = p.screen_centre(viewer, viewer);
        let left = p.tile_for_screen_point(centre.offset(-10, 0), viewer);
        let right = p.tile_for_screen_point(centre.offset(10, 0), viewer);
        assert_eq!(left.tile, viewer);
        assert_eq!(right.tile, viewer);
        assert_eq!(left.half, TileHalf::Left);
        assert_eq!(right.half, TileHalf::Right);
    }

    #[test]
    fn east_corner_belongs_to_the_next_tile() {
        let p = DiamondProjection::default();
        let viewer = Tile::new(0, 0);
        // Half a tile right and half a tile down is the centre of (1, 0).
        let hit = p.tile_for_screen_point(Point::new(320 + 32, 240 + 16), viewer);
        assert_eq!(hit.tile, Tile::new(1, 0));
    }
}
