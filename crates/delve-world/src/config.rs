//! World configuration.
//!
//! [`WorldConfig`] gathers every tunable constant of the simulation. The
//! defaults reproduce the classic game: 125 ticks per second, 17 levels
//! (town plus sixteen dungeon floors) and 100x100 generated dungeons.

use serde::{Deserialize, Serialize};

/// Tunables for a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Simulation rate. Must be positive.
    pub ticks_per_second: u32,
    /// Width of procedurally generated levels, in tiles.
    pub generated_level_width: u32,
    /// Height of procedurally generated levels, in tiles.
    pub generated_level_height: u32,
    /// Number of level slots, town included.
    pub level_count: u32,
    /// Monsters target a player at or within this many tiles.
    pub engagement_radius: i64,
    /// Monsters further than this from every player stay frozen.
    pub disengagement_radius: i64,
    /// Idle time before a monster considers wandering, in seconds.
    pub wander_period_secs: f32,
    /// A wander happens when `draw % 100` exceeds this value.
    pub wander_chance_threshold: u32,
    /// Candidate destinations tried per wander decision.
    pub wander_attempts: u32,
    /// Ticks spent crossing one tile.
    pub ticks_per_step: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 125,
            generated_level_width: 100,
            generated_level_height: 100,
            level_count: 17,
            engagement_radius: 5,
            disengagement_radius: 100,
            wander_period_secs: 0.5,
            wander_chance_threshold: 80,
            wander_attempts: 10,
            ticks_per_step: 8,
        }
    }
}

impl WorldConfig {
    /// Check the configuration for values the simulation cannot run with.
    ///
    /// # Panics
    ///
    /// Panics on a zero tick rate, zero step time, an empty level range, or an
    /// engagement radius that is not inside the disengagement radius.
    pub fn validate(&self) {
        assert!(
            self.ticks_per_second > 0,
            "ticks_per_second must be positive, got {}",
            self.ticks_per_second
        );
        assert!(
            self.ticks_per_step > 0,
            "ticks_per_step must be positive, got {}",
            self.ticks_per_step
        );
        assert!(self.level_count > 0, "level_count must be positive");
        assert!(
            self.engagement_radius >= 0 && self.engagement_radius < self.disengagement_radius,
            "engagement radius {} must be non-negative and below disengagement radius {}",
            self.engagement_radius,
            self.disengagement_radius
        );
        assert!(
            self.wander_period_secs.is_finite() && self.wander_period_secs >= 0.0,
            "wander_period_secs must be finite and non-negative, got {}",
            self.wander_period_secs
        );
    }

    /// Number of whole ticks covering `seconds`, never less than one.
    pub fn ticks_in_period(&self, seconds: f32) -> u64 {
        let ticks = (self.ticks_per_second as f32 * seconds).round();
        (ticks as u64).max(1)
    }

    /// Duration of one tick in seconds.
    pub fn seconds_per_tick(&self) -> f64 {
        1.0 / f64::from(self.ticks_per_second)
    }

    /// Idle ticks after which a monster may wander.
    pub fn wander_threshold_ticks(&self) -> u64 {
        self.ticks_in_period(self.wander_period_secs)
    }
}
