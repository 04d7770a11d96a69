//! Levels: tile maps, resident actors and items lying on the floor.
//!
//! A [`GameLevel`] owns its actors outright. The occupancy index maps tiles
//! to the actor standing on them (or stepping onto them) and is rebuilt from
//! actor positions whenever a level is loaded.

use std::collections::BTreeMap;

use delve_save::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, Faction, Item, ItemAction, PlacedItem, Target};
use crate::behaviour::BehaviourContext;
use crate::config::WorldConfig;
use crate::geometry::Tile;
use crate::persist::SavedObject;
use crate::tick::ActorEvent;
use crate::WorldError;

/// Index of a level within the world. The town is level 0.
pub type LevelIndex = u32;

// ---------------------------------------------------------------------------
// TileMap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
    Door(DoorState),
}

impl TileKind {
    fn is_walkable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Door(DoorState::Open))
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(TileKind::Floor),
            '#' => Some(TileKind::Wall),
            '+' => Some(TileKind::Door(DoorState::Closed)),
            '/' => Some(TileKind::Door(DoorState::Open)),
            _ => None,
        }
    }
}

/// Rectangular grid of tiles, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; (width as usize) * (height as usize)],
        }
    }

    /// All floor.
    pub fn open(width: u32, height: u32) -> Self {
        Self::filled(width, height, TileKind::Floor)
    }

    /// Parse rows of `.` floor, `#` wall, `+` closed door and `/` open door.
    ///
    /// Returns `None` for ragged rows or unknown characters.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut tiles = Vec::with_capacity(width * rows.len());
        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            for c in row.chars() {
                tiles.push(TileKind::from_char(c)?);
            }
        }
        Some(Self {
            width: u32::try_from(width).ok()?,
            height: u32::try_from(rows.len()).ok()?,
            tiles,
        })
    }

    /// Join four equally sized maps into one twice as wide and tall.
    ///
    /// Order is top-left, top-right, bottom-left, bottom-right.
    pub fn stitch_quadrants(quadrants: [&TileMap; 4]) -> Result<Self, WorldError> {
        let (w, h) = (quadrants[0].width, quadrants[0].height);
        if let Some(odd) = quadrants.iter().find(|q| q.width != w || q.height != h) {
            return Err(WorldError::InvalidTown(format!(
                "sector sizes differ: {w}x{h} vs {}x{}",
                odd.width, odd.height
            )));
        }

        let mut map = Self::filled(w * 2, h * 2, TileKind::Wall);
        for (i, quadrant) in quadrants.iter().enumerate() {
            let ox = if i % 2 == 1 { w as i32 } else { 0 };
            let oy = if i >= 2 { h as i32 } else { 0 };
            for y in 0..h as i32 {
                for x in 0..w as i32 {
                    if let Some(kind) = quadrant.get(Tile::new(x, y)) {
                        map.set(Tile::new(ox + x, oy + y), kind);
                    }
                }
            }
        }
        Ok(map)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the tile vector covers exactly `width * height` cells.
    pub fn is_complete(&self) -> bool {
        self.tiles.len() == (self.width as usize) * (self.height as usize)
    }

    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }

    fn index_of(&self, tile: Tile) -> Option<usize> {
        self.contains(tile)
            .then(|| tile.y as usize * self.width as usize + tile.x as usize)
    }

    pub fn get(&self, tile: Tile) -> Option<TileKind> {
        self.index_of(tile).map(|i| self.tiles[i])
    }

    /// Overwrite a tile. Out-of-bounds tiles are ignored.
    pub fn set(&mut self, tile: Tile, kind: TileKind) {
        if let Some(i) = self.index_of(tile) {
            self.tiles[i] = kind;
        }
    }

    pub fn is_walkable(&self, tile: Tile) -> bool {
        self.get(tile).is_some_and(TileKind::is_walkable)
    }

    /// Toggle the door on `tile`. Returns `false` if there is none.
    pub fn activate(&mut self, tile: Tile) -> bool {
        let toggled = match self.get(tile) {
            Some(TileKind::Door(DoorState::Open)) => TileKind::Door(DoorState::Closed),
            Some(TileKind::Door(DoorState::Closed)) => TileKind::Door(DoorState::Open),
            _ => return false,
        };
        self.set(tile, toggled);
        true
    }
}

// ---------------------------------------------------------------------------
// LevelRequest
// ---------------------------------------------------------------------------

/// What a [`LevelGenerator`](crate::collaborators::LevelGenerator) is asked
/// to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRequest {
    pub width: u32,
    pub height: u32,
    pub level_index: LevelIndex,
    /// Level reached by the up stairs. `None` above the town.
    pub up_link: Option<LevelIndex>,
    /// Level reached by the down stairs.
    pub down_link: Option<LevelIndex>,
    /// Movement speed given to generated actors.
    pub ticks_per_step: u32,
}

// ---------------------------------------------------------------------------
// GameLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GameLevel {
    index: LevelIndex,
    tiles: TileMap,
    up_stairs: Tile,
    down_stairs: Tile,
    previous: Option<LevelIndex>,
    next: Option<LevelIndex>,
    actors: BTreeMap<ActorId, Actor>,
    occupancy: BTreeMap<Tile, ActorId>,
    items: BTreeMap<Tile, PlacedItem>,
}

impl GameLevel {
    pub fn new(
        index: LevelIndex,
        tiles: TileMap,
        up_stairs: Tile,
        down_stairs: Tile,
        previous: Option<LevelIndex>,
        next: Option<LevelIndex>,
    ) -> Self {
        Self {
            index,
            tiles,
            up_stairs,
            down_stairs,
            previous,
            next,
            actors: BTreeMap::new(),
            occupancy: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    /// Shell of a level described by `request`.
    pub fn from_request(request: &LevelRequest, tiles: TileMap, up: Tile, down: Tile) -> Self {
        Self::new(
            request.level_index,
            tiles,
            up,
            down,
            request.up_link,
            request.down_link,
        )
    }

    pub fn index(&self) -> LevelIndex {
        self.index
    }

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    pub fn width(&self) -> u32 {
        self.tiles.width()
    }

    pub fn height(&self) -> u32 {
        self.tiles.height()
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.contains(tile)
    }

    pub fn up_stairs(&self) -> Tile {
        self.up_stairs
    }

    pub fn down_stairs(&self) -> Tile {
        self.down_stairs
    }

    /// Level the up stairs lead to.
    pub fn previous_link(&self) -> Option<LevelIndex> {
        self.previous
    }

    /// Level the down stairs lead to.
    pub fn next_link(&self) -> Option<LevelIndex> {
        self.next
    }

    /// Walkable and not claimed by any actor.
    pub fn is_passable(&self, tile: Tile) -> bool {
        self.tiles.is_walkable(tile) && !self.occupancy.contains_key(&tile)
    }

    /// Toggle whatever can be activated on `tile`.
    pub fn activate(&mut self, tile: Tile) -> bool {
        let toggled = self.tiles.activate(tile);
        if toggled {
            tracing::debug!(level = self.index, %tile, "activated tile");
        }
        toggled
    }

    // ---------- Actors ----------

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn actor_at(&self, tile: Tile) -> Option<&Actor> {
        self.occupancy.get(&tile).and_then(|id| self.actors.get(id))
    }

    /// Resident actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Make `actor` a resident of this level.
    pub fn insert_actor(&mut self, mut actor: Actor) -> Result<(), WorldError> {
        let id = actor.id();
        if self.actors.contains_key(&id) {
            return Err(WorldError::DuplicateActor(id));
        }
        actor.set_level(self.index);
        let tile = actor.position().next();
        if let Some(other) = self.occupancy.insert(tile, id) {
            tracing::warn!(level = self.index, %tile, %id, %other, "actor placed on an occupied tile");
        }
        self.actors.insert(id, actor);
        Ok(())
    }

    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(&id)?;
        let tile = actor.position().next();
        if self.occupancy.get(&tile) == Some(&id) {
            self.occupancy.remove(&tile);
        }
        Some(actor)
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy = self
            .actors
            .values()
            .map(|a| (a.position().next(), a.id()))
            .collect();
    }

    // ---------- Items ----------

    pub fn item_at(&self, tile: Tile) -> Option<&PlacedItem> {
        self.items.get(&tile)
    }

    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.items.values()
    }

    /// Put `item` on `tile`, replacing and returning whatever lay there.
    pub fn place_item(&mut self, tile: Tile, item: Item) -> Option<PlacedItem> {
        self.items.insert(tile, PlacedItem { tile, item })
    }

    pub fn take_item(&mut self, tile: Tile) -> Option<PlacedItem> {
        self.items.remove(&tile)
    }

    /// Drop the cursor item of player `id` onto `tile`.
    ///
    /// Fails when the tile is not walkable, already holds an item, or the
    /// player has nothing on the cursor.
    pub fn drop_cursor_item(&mut self, id: ActorId, tile: Tile) -> bool {
        if !self.tiles.is_walkable(tile) || self.items.contains_key(&tile) {
            return false;
        }
        let Some(item) = self
            .actors
            .get_mut(&id)
            .and_then(Actor::player_state_mut)
            .and_then(|p| p.inventory.take_cursor())
        else {
            return false;
        };
        tracing::debug!(level = self.index, %tile, item = %item.name, "dropped cursor item");
        self.place_item(tile, item);
        true
    }

    // ---------- Simulation ----------

    /// Advance every resident actor by one tick, in id order.
    ///
    /// Each actor first runs its behaviour, then pursues its target, then
    /// advances its movement.
    pub fn update(&mut self, players: &[ActorId], config: &WorldConfig, events: &mut Vec<ActorEvent>) {
        let ids: Vec<ActorId> = self.actors.keys().copied().collect();
        for id in ids {
            self.run_behaviour(id, players, config);
            self.pursue_target(id, events);
            self.advance_movement(id);
        }
    }

    fn run_behaviour(&mut self, id: ActorId, players: &[ActorId], config: &WorldConfig) {
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        let mut behaviour = std::mem::take(&mut actor.behaviour);
        let intent = behaviour.update(&BehaviourContext {
            level: &*self,
            players,
            config,
        });
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.behaviour = behaviour;
            if let Some(intent) = intent {
                tracing::trace!(%id, ?intent, "behaviour decided");
                actor.apply_intent(intent);
            }
        }
    }

    fn pursue_target(&mut self, id: ActorId, events: &mut Vec<ActorEvent>) {
        let Some(actor) = self.actors.get(&id) else {
            return;
        };
        if actor.is_dead() {
            return;
        }
        let here = actor.position().current();
        let is_player = actor.is_player();

        match actor.target() {
            Target::None => {}
            Target::Actor(other) => {
                let goal = match self.actors.get(&other) {
                    Some(o) if !o.is_dead() => Some((o.position().current(), o.faction())),
                    _ => None,
                };
                let Some(actor) = self.actors.get_mut(&id) else {
                    return;
                };
                let Some((goal, faction)) = goal else {
                    actor.target = Target::None;
                    return;
                };
                if !here.is_adjacent(goal) {
                    actor.mover.set_destination(goal);
                    return;
                }

                actor.position_mut().face(goal);
                actor.target = Target::None;
                actor.mover.stop();
                match faction {
                    Faction::Npc if is_player => {
                        if let Some(state) = actor.player_state_mut() {
                            state.talking = true;
                        }
                        events.push(ActorEvent::TalkRequested { player: id, npc: other });
                    }
                    Faction::Npc => {}
                    Faction::Monster | Faction::Player => {
                        events.push(ActorEvent::MeleeSwing {
                            attacker: id,
                            target: other,
                        });
                    }
                }
            }
            Target::Item(target) => {
                if !is_player {
                    if let Some(actor) = self.actors.get_mut(&id) {
                        actor.target = Target::None;
                    }
                    return;
                }
                if here != target.tile && !here.is_adjacent(target.tile) {
                    if let Some(actor) = self.actors.get_mut(&id) {
                        actor.mover.set_destination(target.tile);
                    }
                    return;
                }

                let picked = self.items.remove(&target.tile);
                let Some(actor) = self.actors.get_mut(&id) else {
                    return;
                };
                actor.target = Target::None;
                actor.mover.stop();
                let (Some(placed), Some(state)) = (picked, actor.player_state_mut()) else {
                    return;
                };
                let name = placed.item.name.clone();
                match target.action {
                    ItemAction::ToCursor => state.inventory.put_on_cursor(placed.item),
                    ItemAction::AutoEquip => state.inventory.auto_equip(placed.item),
                }
                events.push(ActorEvent::ItemPickedUp {
                    actor: id,
                    item: name,
                    tile: target.tile,
                });
            }
        }
    }

    fn advance_movement(&mut self, id: ActorId) {
        let Some(actor) = self.actors.get(&id) else {
            return;
        };
        if actor.is_dead() {
            return;
        }
        let position = *actor.position();

        if position.is_stepping() {
            let Some(actor) = self.actors.get_mut(&id) else {
                return;
            };
            if actor.mover.tick_step() {
                actor.position_mut().finish_step();
                if actor.mover.destination() == Some(position.next()) {
                    actor.mover.stop();
                }
            }
            return;
        }

        let Some(destination) = actor.mover.destination() else {
            return;
        };
        let here = position.current();
        if destination == here {
            if let Some(actor) = self.actors.get_mut(&id) {
                actor.mover.stop();
            }
            return;
        }

        let step = here.step_towards(destination);
        let passable = self.is_passable(step);
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        if !passable {
            actor.position_mut().cancel_step();
            actor.mover.stop();
            return;
        }
        actor.position_mut().begin_step(step);
        actor.mover.reset_progress();
        if self.occupancy.get(&here) == Some(&id) {
            self.occupancy.remove(&here);
        }
        self.occupancy.insert(step, id);
    }

    // ---------- Persistence ----------

    pub(crate) fn save(&self, saver: &mut GameSaver) -> Result<(), SaveError> {
        saver.save(&self.index)?;
        saver.save(&self.tiles)?;
        saver.save(&self.up_stairs)?;
        saver.save(&self.down_stairs)?;
        saver.save(&self.previous)?;
        saver.save(&self.next)?;
        let items: Vec<&PlacedItem> = self.items.values().collect();
        saver.save(&items)?;
        saver.save(&self.actors.len())?;
        for actor in self.actors.values() {
            saver.scoped("Actor", |s| actor.save_tagged(s))?;
        }
        Ok(())
    }

    /// Rebuild the level stored in slot `slot`.
    pub(crate) fn load(
        loader: &mut GameLoader<'_>,
        registry: &FactoryRegistry<SavedObject>,
        slot: LevelIndex,
    ) -> Result<Self, WorldError> {
        let position = loader.position();
        let index: LevelIndex = loader.load()?;
        if index != slot {
            return Err(SaveError::Malformed {
                position,
                expected: "level index",
                details: format!("level {index} stored in slot {slot}"),
            }
            .into());
        }
        let position = loader.position();
        let tiles: TileMap = loader.load()?;
        if !tiles.is_complete() {
            return Err(SaveError::Malformed {
                position,
                expected: "tile map",
                details: format!(
                    "{} tiles for a {}x{} map",
                    tiles.tiles.len(),
                    tiles.width,
                    tiles.height
                ),
            }
            .into());
        }
        let up_stairs = loader.load()?;
        let down_stairs = loader.load()?;
        let previous = loader.load()?;
        let next = loader.load()?;
        let mut level = Self::new(index, tiles, up_stairs, down_stairs, previous, next);

        let items: Vec<PlacedItem> = loader.load()?;
        level.items = items.into_iter().map(|p| (p.tile, p)).collect();

        let count: usize = loader.load()?;
        for _ in 0..count {
            let position = loader.position();
            match registry.load_tagged(loader)? {
                SavedObject::Actor(actor) => {
                    let id = actor.id();
                    if level.actors.insert(id, actor).is_some() {
                        return Err(WorldError::DuplicateActor(id));
                    }
                }
                SavedObject::Behaviour(_) => {
                    return Err(WorldError::UnexpectedObject {
                        position,
                        expected: "actor",
                        found: "behaviour",
                    })
                }
            }
        }
        for actor in level.actors.values_mut() {
            actor.set_level(index);
        }
        level.rebuild_occupancy();
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorSpec, ItemTarget};

    fn level() -> GameLevel {
        let tiles = TileMap::from_rows(&[
            "......", //
            "..#...", //
            "..+...", //
            "......", //
        ])
        .unwrap();
        GameLevel::new(1, tiles, Tile::new(0, 0), Tile::new(5, 3), Some(0), Some(2))
    }

    fn put(level: &mut GameLevel, id: u32, spec: ActorSpec) -> ActorId {
        let id = ActorId(id);
        level.insert_actor(Actor::new(id, spec, 1)).unwrap();
        id
    }

    #[test]
    fn rows_parse_and_reject_ragged_input() {
        let map = TileMap::from_rows(&[".#", "+/"]).unwrap();
        assert_eq!(map.get(Tile::new(1, 0)), Some(TileKind::Wall));
        assert_eq!(map.get(Tile::new(0, 1)), Some(TileKind::Door(DoorState::Closed)));
        assert!(map.is_walkable(Tile::new(1, 1)));
        assert!(TileMap::from_rows(&["..", "."]).is_none());
        assert!(TileMap::from_rows(&["?"]).is_none());
    }

    #[test]
    fn stitching_places_quadrants() {
        let floor = TileMap::open(2, 2);
        let wall = TileMap::filled(2, 2, TileKind::Wall);
        let map = TileMap::stitch_quadrants([&floor, &wall, &wall, &floor]).unwrap();
        assert_eq!((map.width(), map.height()), (4, 4));
        assert!(map.is_walkable(Tile::new(1, 1)));
        assert!(!map.is_walkable(Tile::new(2, 0)));
        assert!(!map.is_walkable(Tile::new(0, 3)));
        assert!(map.is_walkable(Tile::new(3, 3)));
    }

    #[test]
    fn stitching_rejects_mismatched_sectors() {
        let a = TileMap::open(2, 2);
        let b = TileMap::open(3, 2);
        assert!(matches!(
            TileMap::stitch_quadrants([&a, &a, &b, &a]),
            Err(WorldError::InvalidTown(_))
        ));
    }

    #[test]
    fn doors_toggle_and_block() {
        let mut level = level();
        let door = Tile::new(2, 2);
        assert!(!level.is_passable(door));
        assert!(level.activate(door));
        assert!(level.is_passable(door));
        assert!(!level.activate(Tile::new(0, 0)));
    }

    #[test]
    fn occupied_tiles_are_not_passable() {
        let mut level = level();
        let id = put(&mut level, 4, ActorSpec::monster("Rat", Tile::new(3, 3)));
        assert!(!level.is_passable(Tile::new(3, 3)));
        assert_eq!(level.actor_at(Tile::new(3, 3)).map(Actor::id), Some(id));
        assert!(matches!(
            level.insert_actor(Actor::new(id, ActorSpec::monster("Rat", Tile::new(0, 3)), 1)),
            Err(WorldError::DuplicateActor(_))
        ));
        level.remove_actor(id).unwrap();
        assert!(level.is_passable(Tile::new(3, 3)));
    }

    #[test]
    fn movement_walks_around_nothing_and_stops_at_walls() {
        let mut level = level();
        let id = put(&mut level, 1, ActorSpec::monster("Rat", Tile::new(0, 1)));
        level.actor_mut(id).unwrap().mover_mut().set_destination(Tile::new(3, 1));

        let config = WorldConfig::default();
        let mut events = Vec::new();
        // One tick to begin the step, one to finish it (ticks_per_step = 1).
        level.update(&[], &config, &mut events);
        level.update(&[], &config, &mut events);
        assert_eq!(level.actor(id).unwrap().position().current(), Tile::new(1, 1));

        // The wall at (2, 1) blocks the next step and cancels movement.
        level.update(&[], &config, &mut events);
        let actor = level.actor(id).unwrap();
        assert_eq!(actor.position().current(), Tile::new(1, 1));
        assert!(!actor.is_moving());
        assert!(events.is_empty());
    }

    #[test]
    fn reaching_a_monster_swings() {
        let mut level = level();
        let player = put(&mut level, 1, ActorSpec::player("Hero", Tile::new(4, 0)));
        let rat = put(&mut level, 2, ActorSpec::monster("Rat", Tile::new(5, 1)));
        level.actor_mut(player).unwrap().set_target(Target::Actor(rat));

        let mut events = Vec::new();
        level.update(&[player], &WorldConfig::default(), &mut events);
        assert!(events.contains(&ActorEvent::MeleeSwing {
            attacker: player,
            target: rat
        }));
        assert!(!level.actor(player).unwrap().has_target());
    }

    #[test]
    fn reaching_an_npc_requests_talk() {
        let mut level = level();
        let player = put(&mut level, 1, ActorSpec::player("Hero", Tile::new(0, 0)));
        let npc = put(
            &mut level,
            2,
            ActorSpec::npc("Griswold", Tile::new(1, 0), Default::default()),
        );
        level.actor_mut(player).unwrap().set_target(Target::Actor(npc));

        let mut events = Vec::new();
        level.update(&[player], &WorldConfig::default(), &mut events);
        assert_eq!(events, vec![ActorEvent::TalkRequested { player, npc }]);
        assert!(level.actor(player).unwrap().player_state().unwrap().talking);
    }

    #[test]
    fn adjacent_item_is_picked_up_to_cursor() {
        let mut level = level();
        let player = put(&mut level, 1, ActorSpec::player("Hero", Tile::new(0, 3)));
        level.place_item(Tile::new(1, 3), Item::new("Potion"));
        level.actor_mut(player).unwrap().set_target(Target::Item(ItemTarget {
            action: ItemAction::ToCursor,
            tile: Tile::new(1, 3),
        }));

        let mut events = Vec::new();
        level.update(&[player], &WorldConfig::default(), &mut events);
        assert!(level.item_at(Tile::new(1, 3)).is_none());
        let inventory = &level.actor(player).unwrap().player_state().unwrap().inventory;
        assert_eq!(
            inventory.item_at(crate::actor::EquipSlot::Cursor).map(|i| i.name.as_str()),
            Some("Potion")
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn dropping_needs_a_free_walkable_tile() {
        let mut level = level();
        let player = put(&mut level, 1, ActorSpec::player("Hero", Tile::new(0, 0)));
        level
            .actor_mut(player)
            .unwrap()
            .player_state_mut()
            .unwrap()
            .inventory
            .put_on_cursor(Item::new("Ring"));

        assert!(!level.drop_cursor_item(player, Tile::new(2, 1)), "wall");
        assert!(level.drop_cursor_item(player, Tile::new(4, 2)));
        assert_eq!(level.item_at(Tile::new(4, 2)).unwrap().item.name, "Ring");
        assert!(!level.drop_cursor_item(player, Tile::new(5, 2)), "cursor now empty");
    }
}
