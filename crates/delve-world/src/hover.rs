//! What the pointer is resting on.

use crate::actor::ActorId;
use crate::geometry::Tile;

/// The last thing the description line was written for.
///
/// Every setter returns `true` only when the state actually changed, so the
/// caller rewrites the description once per change instead of every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Nothing,
    /// An item held on the cursor, by name.
    Cursor(String),
    Actor(ActorId),
    /// A floor item, by the tile it lies on.
    Item(Tile),
}

impl HoverState {
    fn replace(&mut self, next: HoverState) -> bool {
        if *self == next {
            return false;
        }
        *self = next;
        true
    }

    pub fn set_cursor_item(&mut self, name: &str) -> bool {
        if matches!(self, HoverState::Cursor(current) if current == name) {
            return false;
        }
        self.replace(HoverState::Cursor(name.to_owned()))
    }

    pub fn set_actor(&mut self, id: ActorId) -> bool {
        self.replace(HoverState::Actor(id))
    }

    pub fn set_item(&mut self, tile: Tile) -> bool {
        self.replace(HoverState::Item(tile))
    }

    pub fn clear(&mut self) -> bool {
        self.replace(HoverState::Nothing)
    }
}
