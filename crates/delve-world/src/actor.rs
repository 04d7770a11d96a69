//! Actors, players and the pieces they carry.
//!
//! An [`Actor`] is owned by the [`GameLevel`](crate::level::GameLevel) it
//! stands on. Everything else refers to it through its [`ActorId`].

use std::fmt;

use delve_save::prelude::*;
use serde::{Deserialize, Serialize};

use crate::behaviour::{Behaviour, Intent};
use crate::geometry::{Direction, Position, Tile};
use crate::level::LevelIndex;
use crate::persist::SavedObject;

/// Save tag of an actor without player state.
pub const ACTOR_TAG: &str = "actor";
/// Save tag of an actor carrying [`PlayerState`].
pub const PLAYER_TAG: &str = "player";

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// Stable identity of an actor within one world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// Monotonic actor id allocator.
///
/// Ids start at 1 and never repeat. [`observe`](Self::observe) keeps the
/// allocator ahead of ids that entered the world from elsewhere (a save file
/// or a level generator that built actors by hand).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorIds {
    next: u32,
}

impl ActorIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Resume allocation at `next`, as read back from a save.
    pub fn resume_at(next: u32) -> Self {
        Self { next: next.max(1) }
    }

    /// Hand out a fresh id.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted.
    pub fn allocate(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .unwrap_or_else(|| panic!("actor id space exhausted after {id}"));
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Make sure `id` is never handed out again.
    pub fn observe(&mut self, id: ActorId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

impl Default for ActorIds {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Faction and stats
// ---------------------------------------------------------------------------

/// Which side an actor is on. Decides what happens when something reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Town folk. Players talk to them instead of hitting them.
    Npc,
    Monster,
    Player,
}

/// Hit points and the death flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStats {
    hp: i32,
    max_hp: i32,
    dead: bool,
}

impl ActorStats {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            dead: max_hp <= 0,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract `amount` hit points. Returns `true` if this blow killed.
    pub fn damage(&mut self, amount: i32) -> bool {
        if self.dead {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        if self.hp == 0 {
            self.dead = true;
        }
        self.dead
    }

    pub fn kill(&mut self) {
        self.hp = 0;
        self.dead = true;
    }
}

// ---------------------------------------------------------------------------
// Items and inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An item lying on a level tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub tile: Tile,
    pub item: Item,
}

/// Inventory slots the world cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipSlot {
    /// The item held on the mouse cursor.
    Cursor,
    Backpack(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    cursor: Option<Item>,
    backpack: Vec<Item>,
}

impl Inventory {
    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        self.item_at(slot).is_none()
    }

    pub fn item_at(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Cursor => self.cursor.as_ref(),
            EquipSlot::Backpack(i) => self.backpack.get(i),
        }
    }

    pub fn backpack(&self) -> &[Item] {
        &self.backpack
    }

    /// Put `item` on the cursor. An item already there moves to the backpack.
    pub fn put_on_cursor(&mut self, item: Item) {
        if let Some(previous) = self.cursor.replace(item) {
            self.backpack.push(previous);
        }
    }

    pub fn take_cursor(&mut self) -> Option<Item> {
        self.cursor.take()
    }

    pub fn auto_equip(&mut self, item: Item) {
        self.backpack.push(item);
    }
}

/// What makes an actor a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub inventory: Inventory,
    /// Set while a conversation with an NPC is open.
    pub talking: bool,
}

// ---------------------------------------------------------------------------
// Targets and movement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemAction {
    /// Pick the item up onto the cursor (inventory screen open).
    ToCursor,
    /// Pick the item up straight into the backpack.
    AutoEquip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTarget {
    pub action: ItemAction,
    pub tile: Tile,
}

/// What an actor is currently trying to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Target {
    #[default]
    None,
    Actor(ActorId),
    Item(ItemTarget),
}

impl Target {
    pub fn is_none(&self) -> bool {
        matches!(self, Target::None)
    }
}

/// Walks an actor towards a destination, one tile per `ticks_per_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHandler {
    destination: Option<Tile>,
    ticks_per_step: u32,
    /// Ticks spent on the step in progress.
    progress: u32,
}

impl MoveHandler {
    pub fn new(ticks_per_step: u32) -> Self {
        Self {
            destination: None,
            ticks_per_step: ticks_per_step.max(1),
            progress: 0,
        }
    }

    pub fn destination(&self) -> Option<Tile> {
        self.destination
    }

    pub fn set_destination(&mut self, tile: Tile) {
        self.destination = Some(tile);
    }

    pub fn stop(&mut self) {
        self.destination = None;
    }

    pub fn ticks_per_step(&self) -> u32 {
        self.ticks_per_step
    }

    /// Count one tick of the current step. Returns `true` when it completes.
    pub(crate) fn tick_step(&mut self) -> bool {
        self.progress += 1;
        if self.progress >= self.ticks_per_step {
            self.progress = 0;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset_progress(&mut self) {
        self.progress = 0;
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Everything needed to place a new actor.
#[derive(Debug, Clone)]
pub struct ActorSpec {
    pub name: String,
    pub faction: Faction,
    pub tile: Tile,
    pub direction: Direction,
    pub max_hp: i32,
    pub behaviour: Behaviour,
    pub player: Option<PlayerState>,
}

impl ActorSpec {
    /// A monster driven by [`Behaviour::basic_monster`].
    pub fn monster(name: impl Into<String>, tile: Tile) -> Self {
        Self {
            name: name.into(),
            faction: Faction::Monster,
            tile,
            direction: Direction::default(),
            max_hp: 10,
            behaviour: Behaviour::basic_monster(),
            player: None,
        }
    }

    /// A town NPC that never acts on its own.
    pub fn npc(name: impl Into<String>, tile: Tile, direction: Direction) -> Self {
        Self {
            name: name.into(),
            faction: Faction::Npc,
            tile,
            direction,
            max_hp: 1,
            behaviour: Behaviour::Null,
            player: None,
        }
    }

    pub fn player(name: impl Into<String>, tile: Tile) -> Self {
        Self {
            name: name.into(),
            faction: Faction::Player,
            tile,
            direction: Direction::default(),
            max_hp: 70,
            behaviour: Behaviour::Null,
            player: Some(PlayerState::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    id: ActorId,
    name: String,
    faction: Faction,
    level: LevelIndex,
    position: Position,
    stats: ActorStats,
    pub(crate) target: Target,
    pub(crate) mover: MoveHandler,
    pub(crate) behaviour: Behaviour,
    player: Option<PlayerState>,
}

impl Actor {
    /// Build an actor from `spec`. The behaviour is linked to `id`.
    pub fn new(id: ActorId, spec: ActorSpec, ticks_per_step: u32) -> Self {
        let mut behaviour = spec.behaviour;
        behaviour.attach(id);
        Self {
            id,
            name: spec.name,
            faction: spec.faction,
            level: 0,
            position: Position::with_direction(spec.tile, spec.direction),
            stats: ActorStats::new(spec.max_hp),
            target: Target::None,
            mover: MoveHandler::new(ticks_per_step),
            behaviour,
            player: spec.player,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    /// Index of the level this actor stands on.
    pub fn level(&self) -> LevelIndex {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: LevelIndex) {
        self.level = level;
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub(crate) fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    pub fn stats(&self) -> &ActorStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut ActorStats {
        &mut self.stats
    }

    pub fn is_dead(&self) -> bool {
        self.stats.is_dead()
    }

    pub fn kill(&mut self) {
        self.stats.kill();
        self.target = Target::None;
        self.mover.stop();
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    pub fn has_target(&self) -> bool {
        !self.target.is_none()
    }

    pub fn mover(&self) -> &MoveHandler {
        &self.mover
    }

    pub fn mover_mut(&mut self) -> &mut MoveHandler {
        &mut self.mover
    }

    /// Whether the actor has somewhere to go or is mid-step.
    pub fn is_moving(&self) -> bool {
        self.mover.destination().is_some() || self.position.is_stepping()
    }

    pub fn behaviour(&self) -> &Behaviour {
        &self.behaviour
    }

    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        self.player.as_mut()
    }

    /// Put the actor on `tile`, dropping any step and destination in progress.
    pub(crate) fn place_at(&mut self, tile: Tile) {
        self.position = Position::with_direction(tile, self.position.direction());
        self.mover.stop();
        self.mover.reset_progress();
    }

    pub(crate) fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Engage(player) => self.target = Target::Actor(player),
            Intent::MoveTo(tile) => self.mover.set_destination(tile),
        }
    }

    // ---------- Persistence ----------

    /// Rebuild an actor whose tag has already been consumed.
    pub(crate) fn load(
        loader: &mut GameLoader<'_>,
        registry: &FactoryRegistry<SavedObject>,
        is_player: bool,
    ) -> Result<Self, SaveError> {
        let id: ActorId = loader.load()?;
        let name = loader.load()?;
        let faction = loader.load()?;
        let level = loader.load()?;
        let position = loader.load()?;
        let stats = loader.load()?;
        let target = loader.load()?;
        let mover = loader.load()?;
        let player = if is_player {
            Some(loader.load()?)
        } else {
            None
        };

        let position_before = loader.position();
        let mut behaviour = match registry.load_tagged(loader)? {
            SavedObject::Behaviour(behaviour) => behaviour,
            SavedObject::Actor(other) => {
                return Err(SaveError::Malformed {
                    position: position_before,
                    expected: "behaviour",
                    details: format!("found actor {} instead", other.id()),
                })
            }
        };
        behaviour.attach(id);

        Ok(Self {
            id,
            name,
            faction,
            level,
            position,
            stats,
            target,
            mover,
            behaviour,
            player,
        })
    }
}

impl Persist for Actor {
    fn type_tag(&self) -> &'static str {
        if self.is_player() {
            PLAYER_TAG
        } else {
            ACTOR_TAG
        }
    }

    fn save(&self, saver: &mut GameSaver) -> Result<(), SaveError> {
        saver.save(&self.id)?;
        saver.save(&self.name)?;
        saver.save(&self.faction)?;
        saver.save(&self.level)?;
        saver.save(&self.position)?;
        saver.save(&self.stats)?;
        saver.save(&self.target)?;
        saver.save(&self.mover)?;
        if let Some(player) = &self.player {
            saver.save(player)?;
        }
        self.behaviour.save_tagged(saver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_start_at_one() {
        let mut ids = ActorIds::new();
        assert_eq!(ids.allocate(), ActorId(1));
        assert_eq!(ids.allocate(), ActorId(2));
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn observe_only_moves_forward() {
        let mut ids = ActorIds::new();
        ids.observe(ActorId(10));
        assert_eq!(ids.allocate(), ActorId(11));
        ids.observe(ActorId(4));
        assert_eq!(ids.allocate(), ActorId(12));
    }

    #[test]
    fn damage_sets_the_death_flag_once() {
        let mut stats = ActorStats::new(5);
        assert!(!stats.damage(3));
        assert!(stats.damage(4));
        assert_eq!(stats.hp(), 0);
        assert!(stats.is_dead());
        assert!(!stats.damage(1), "a dead actor cannot be killed again");
    }

    #[test]
    fn cursor_item_swaps_into_backpack() {
        let mut inv = Inventory::default();
        assert!(inv.is_empty(EquipSlot::Cursor));
        inv.put_on_cursor(Item::new("Short Sword"));
        inv.put_on_cursor(Item::new("Buckler"));
        assert_eq!(inv.item_at(EquipSlot::Cursor).unwrap().name, "Buckler");
        assert_eq!(inv.item_at(EquipSlot::Backpack(0)).unwrap().name, "Short Sword");
        assert!(inv.is_empty(EquipSlot::Backpack(1)));
    }

    #[test]
    fn new_actor_links_its_behaviour() {
        let actor = Actor::new(ActorId(7), ActorSpec::monster("Zombie", Tile::new(1, 1)), 8);
        assert_eq!(actor.behaviour().actor(), Some(ActorId(7)));
        assert!(!actor.is_player());
        assert_eq!(actor.type_tag(), ACTOR_TAG);
    }

    #[test]
    fn player_spec_gets_the_player_tag() {
        let actor = Actor::new(ActorId(1), ActorSpec::player("Warrior", Tile::new(0, 0)), 8);
        assert!(actor.is_player());
        assert_eq!(actor.type_tag(), PLAYER_TAG);
        assert_eq!(actor.faction(), Faction::Player);
    }

    #[test]
    fn kill_drops_target_and_destination() {
        let mut actor = Actor::new(ActorId(3), ActorSpec::monster("Bat", Tile::new(4, 4)), 8);
        actor.set_target(Target::Actor(ActorId(1)));
        actor.mover_mut().set_destination(Tile::new(9, 9));
        actor.kill();
        assert!(actor.is_dead());
        assert!(!actor.has_target());
        assert!(!actor.is_moving());
    }

    #[test]
    fn move_handler_counts_ticks_per_step() {
        let mut mover = MoveHandler::new(3);
        assert!(!mover.tick_step());
        assert!(!mover.tick_step());
        assert!(mover.tick_step());
        assert!(!mover.tick_step());
    }
}
