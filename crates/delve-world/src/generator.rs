//! A small seeded dungeon generator.
//!
//! Real dungeon layouts come from an external generator. [`ScatterGenerator`]
//! is the stand-in used headless: a walled room with scattered pillars,
//! two stairs and a handful of monsters. Output depends only on the seed and
//! the request.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::actor::{Actor, ActorIds, ActorSpec};
use crate::collaborators::LevelGenerator;
use crate::geometry::Tile;
use crate::level::{GameLevel, LevelRequest, TileKind, TileMap};

const MONSTER_NAMES: [&str; 4] = ["Fallen One", "Zombie", "Skeleton", "Scavenger"];

#[derive(Debug, Clone)]
pub struct ScatterGenerator {
    seed: u64,
    /// Fraction of interior tiles turned into pillars.
    pub pillar_density: f64,
}

impl ScatterGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            pillar_density: 0.06,
        }
    }

    fn random_floor(rng: &mut Pcg32, level: &GameLevel) -> Option<Tile> {
        let (w, h) = (level.width() as i32, level.height() as i32);
        if w < 3 || h < 3 {
            return None;
        }
        (0..64)
            .map(|_| Tile::new(rng.gen_range(1..w - 1), rng.gen_range(1..h - 1)))
            .find(|&t| level.is_passable(t))
    }
}

impl LevelGenerator for ScatterGenerator {
    fn generate(&mut self, request: &LevelRequest, ids: &mut ActorIds) -> GameLevel {
        let mut rng = Pcg32::seed_from_u64(self.seed ^ u64::from(request.level_index).rotate_left(32));
        let (w, h) = (request.width as i32, request.height as i32);

        let mut tiles = TileMap::open(request.width, request.height);
        for x in 0..w {
            tiles.set(Tile::new(x, 0), TileKind::Wall);
            tiles.set(Tile::new(x, h - 1), TileKind::Wall);
        }
        for y in 0..h {
            tiles.set(Tile::new(0, y), TileKind::Wall);
            tiles.set(Tile::new(w - 1, y), TileKind::Wall);
        }
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                if rng.gen_bool(self.pillar_density) {
                    tiles.set(Tile::new(x, y), TileKind::Wall);
                }
            }
        }

        let up = Tile::new(1, 1);
        let down = Tile::new(w - 2, h - 2);
        tiles.set(up, TileKind::Floor);
        tiles.set(down, TileKind::Floor);

        let mut level = GameLevel::from_request(request, tiles, up, down);

        let monsters = 4 + request.level_index as usize * 2;
        for _ in 0..monsters {
            let Some(tile) = Self::random_floor(&mut rng, &level) else {
                break;
            };
            if tile == up || tile == down {
                continue;
            }
            let name = MONSTER_NAMES[rng.gen_range(0..MONSTER_NAMES.len())];
            let actor = Actor::new(ids.allocate(), ActorSpec::monster(name, tile), request.ticks_per_step);
            if let Err(err) = level.insert_actor(actor) {
                tracing::warn!(%err, "generator produced a duplicate actor");
            }
        }

        tracing::debug!(
            level = request.level_index,
            seed = self.seed,
            monsters = level.actor_count(),
            "scattered level"
        );
        level
    }
}
