//! Moving the current player between levels.

use crate::level::LevelIndex;
use crate::world::World;

/// Music for level `index`, or `None` past the last dungeon floor.
pub fn track_for_level(index: LevelIndex) -> Option<&'static str> {
    match index {
        0 => Some("music/dtowne.wav"),
        1..=4 => Some("music/dlvla.wav"),
        5..=8 => Some("music/dlvlb.wav"),
        9..=12 => Some("music/dlvlc.wav"),
        13..=16 => Some("music/dlvld.wav"),
        _ => None,
    }
}

impl World {
    /// Put the current player on the up stairs of level `index`.
    ///
    /// Does nothing without a current player, when already on that level, or
    /// when the level does not exist.
    pub fn set_level(&mut self, index: LevelIndex) {
        let Some(player) = self.current_player else {
            return;
        };
        if self.current_level_index() == Some(index) {
            return;
        }
        let Some(up_stairs) = self.get_level(index).map(|l| l.up_stairs()) else {
            tracing::debug!(index, "no such level");
            return;
        };

        self.teleport(player, index, up_stairs);
        match track_for_level(index) {
            Some(track) => self.collaborators.audio.play_track(track),
            None => tracing::warn!(index, "no music for level"),
        }
        tracing::info!(%player, index, "entered level");
    }

    /// Take the stairs up (`true`) or down (`false`) from the current level.
    ///
    /// Arriving from below puts the player on the down stairs, arriving from
    /// above on the up stairs.
    pub fn change_level(&mut self, up: bool) {
        let Some(current) = self.current_level() else {
            return;
        };
        let link = if up {
            current.previous_link()
        } else {
            current.next_link()
        };
        let Some(index) = link.filter(|&i| self.levels.contains(i)) else {
            tracing::debug!(up, "no level that way");
            return;
        };

        self.set_level(index);

        let Some(player) = self.current_player else {
            return;
        };
        let Some(stairs) = self
            .level(index)
            .map(|l| if up { l.down_stairs() } else { l.up_stairs() })
        else {
            return;
        };
        self.teleport(player, index, stairs);
    }
}
