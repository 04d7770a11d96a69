//! Tiles, screen points, facings and actor positions.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// An integer tile coordinate on a level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The tile displaced by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance in tiles.
    pub fn distance_squared(self, other: Tile) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Whether `other` is one of the eight neighbours of this tile.
    pub fn is_adjacent(self, other: Tile) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    /// The neighbour one step closer to `goal` (diagonals allowed).
    pub fn step_towards(self, goal: Tile) -> Tile {
        self.offset((goal.x - self.x).signum(), (goal.y - self.y).signum())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A screen-space pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the eight facings an actor can have.
///
/// The discriminants follow the rotation order used by the game data, so a
/// stored rotation byte converts with [`Direction::from_rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
}

impl Direction {
    const ALL: [Direction; 8] = [
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
    ];

    /// Facing for a rotation index, wrapping at eight.
    pub fn from_rotation(rotation: u8) -> Self {
        Self::ALL[usize::from(rotation % 8)]
    }

    /// Facing of a step by `(dx, dy)`; `None` for the zero step.
    pub fn from_step(dx: i32, dy: i32) -> Option<Self> {
        let dir = match (dx.signum(), dy.signum()) {
            (0, 1) => Direction::South,
            (-1, 1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, -1) => Direction::NorthWest,
            (0, -1) => Direction::North,
            (1, -1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, 1) => Direction::SouthEast,
            _ => return None,
        };
        Some(dir)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Where an actor stands and where its step in progress is heading.
///
/// `next` equals `current` while the actor is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    current: Tile,
    next: Tile,
    direction: Direction,
}

impl Position {
    pub fn new(tile: Tile) -> Self {
        Self::with_direction(tile, Direction::default())
    }

    pub fn with_direction(tile: Tile, direction: Direction) -> Self {
        Self {
            current: tile,
            next: tile,
            direction,
        }
    }

    /// The tile the actor occupies.
    pub fn current(&self) -> Tile {
        self.current
    }

    /// The tile the current step leads to.
    pub fn next(&self) -> Tile {
        self.next
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether a step between two tiles is in progress.
    pub fn is_stepping(&self) -> bool {
        self.current != self.next
    }

    /// Turn to face `tile`. Facing the own tile keeps the old direction.
    pub fn face(&mut self, tile: Tile) {
        if let Some(direction) = Direction::from_step(tile.x - self.current.x, tile.y - self.current.y)
        {
            self.direction = direction;
        }
    }

    pub(crate) fn begin_step(&mut self, to: Tile) {
        self.face(to);
        self.next = to;
    }

    pub(crate) fn finish_step(&mut self) {
        self.current = self.next;
    }

    pub(crate) fn cancel_step(&mut self) {
        self.next = self.current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_squared_is_symmetric() {
        let a = Tile::new(3, 4);
        let b = Tile::new(0, 0);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(b.distance_squared(a), 25);
    }

    #[test]
    fn adjacency_excludes_self_and_far_tiles() {
        let t = Tile::new(5, 5);
        assert!(t.is_adjacent(Tile::new(6, 6)));
        assert!(t.is_adjacent(Tile::new(5, 4)));
        assert!(!t.is_adjacent(t));
        assert!(!t.is_adjacent(Tile::new(7, 5)));
    }

    #[test]
    fn step_towards_moves_diagonally_then_straight() {
        let start = Tile::new(0, 0);
        let goal = Tile::new(2, 1);
        let first = start.step_towards(goal);
        assert_eq!(first, Tile::new(1, 1));
        assert_eq!(first.step_towards(goal), Tile::new(2, 1));
        assert_eq!(goal.step_towards(goal), goal);
    }

    #[test]
    fn direction_from_step_and_rotation() {
        assert_eq!(Direction::from_step(0, 3), Some(Direction::South));
        assert_eq!(Direction::from_step(-2, -2), Some(Direction::NorthWest));
        assert_eq!(Direction::from_step(0, 0), None);
        assert_eq!(Direction::from_rotation(6), Direction::East);
        assert_eq!(Direction::from_rotation(9), Direction::SouthWest);
    }

    #[test]
    fn position_step_lifecycle() {
        let mut pos = Position::new(Tile::new(1, 1));
        assert!(!pos.is_stepping());

        pos.begin_step(Tile::new(2, 1));
        assert!(pos.is_stepping());
        assert_eq!(pos.direction(), Direction::East);

        pos.finish_step();
        assert_eq!(pos.current(), Tile::new(2, 1));
        assert!(!pos.is_stepping());

        pos.begin_step(Tile::new(2, 0));
        pos.cancel_step();
        assert_eq!(pos.next(), Tile::new(2, 1));
        assert_eq!(pos.direction(), Direction::North);
    }
}
