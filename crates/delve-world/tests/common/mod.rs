//! Shared fixtures: a world whose collaborators record what they were told.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use delve_world::generator::ScatterGenerator;
use delve_world::prelude::*;

#[derive(Debug, Default)]
pub struct GuiLog {
    pub descriptions: Vec<String>,
    pub dialogs: Vec<String>,
    pub modal: bool,
    pub inventory_open: bool,
}

struct SharedGui(Rc<RefCell<GuiLog>>);

impl Gui for SharedGui {
    fn set_description_text(&mut self, text: &str) {
        self.0.borrow_mut().descriptions.push(text.to_owned());
    }

    fn is_modal_dialog_open(&self) -> bool {
        self.0.borrow().modal
    }

    fn is_inventory_open(&self) -> bool {
        self.0.borrow().inventory_open
    }

    fn open_dialog(&mut self, npc: &str) {
        self.0.borrow_mut().dialogs.push(npc.to_owned());
    }
}

struct SharedAudio(Rc<RefCell<Vec<String>>>);

impl Audio for SharedAudio {
    fn play_track(&mut self, name: &str) {
        self.0.borrow_mut().push(name.to_owned());
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PointerState {
    pub position: Point,
    pub primary_down: bool,
}

struct SharedPointer(Rc<RefCell<PointerState>>);

impl Pointer for SharedPointer {
    fn position(&self) -> Point {
        self.0.borrow().position
    }

    fn is_primary_down(&self) -> bool {
        self.0.borrow().primary_down
    }
}

/// Scatter generator that remembers which levels it built.
struct CountingGenerator {
    inner: ScatterGenerator,
    calls: Rc<RefCell<Vec<LevelIndex>>>,
}

impl LevelGenerator for CountingGenerator {
    fn generate(&mut self, request: &LevelRequest, ids: &mut ActorIds) -> GameLevel {
        self.calls.borrow_mut().push(request.level_index);
        self.inner.generate(request, ids)
    }
}

pub struct Harness {
    pub world: World,
    pub gui: Rc<RefCell<GuiLog>>,
    pub tracks: Rc<RefCell<Vec<String>>>,
    pub pointer: Rc<RefCell<PointerState>>,
    pub generated: Rc<RefCell<Vec<LevelIndex>>>,
    pub projection: DiamondProjection,
}

/// Where the player starts in town: open ground well away from the NPCs.
pub const START: Tile = Tile::new(30, 30);

pub fn harness(seed: u64) -> Harness {
    harness_with(seed, WorldConfig::default())
}

pub fn harness_with(seed: u64, config: WorldConfig) -> Harness {
    let gui = Rc::new(RefCell::new(GuiLog::default()));
    let tracks = Rc::new(RefCell::new(Vec::new()));
    let pointer = Rc::new(RefCell::new(PointerState::default()));
    let generated = Rc::new(RefCell::new(Vec::new()));
    let projection = DiamondProjection::default();

    let collaborators = Collaborators {
        renderer: Box::new(projection),
        generator: Box::new(CountingGenerator {
            inner: ScatterGenerator::new(seed),
            calls: Rc::clone(&generated),
        }),
        audio: Box::new(SharedAudio(Rc::clone(&tracks))),
        gui: Box::new(SharedGui(Rc::clone(&gui))),
        pointer: Box::new(SharedPointer(Rc::clone(&pointer))),
    };

    Harness {
        world: World::new(config, collaborators),
        gui,
        tracks,
        pointer,
        generated,
        projection,
    }
}

/// A world with the classic town and a current player at [`START`].
pub fn town(seed: u64) -> (Harness, ActorId) {
    town_from(seed, TownLayout::classic())
}

pub fn town_from(seed: u64, layout: TownLayout) -> (Harness, ActorId) {
    let mut h = harness(seed);
    h.world.generate_levels(&layout).unwrap();
    let hero = h
        .world
        .add_current_player(ActorSpec::player("Warrior", START), 0)
        .unwrap();
    (h, hero)
}

impl Harness {
    /// Screen point at the centre of `tile`, as seen by the current player.
    pub fn point_on(&self, tile: Tile) -> Point {
        let viewer = self.world.current_player().unwrap().position().current();
        self.projection.screen_centre(tile, viewer)
    }

    pub fn press(&mut self, tile: Tile) {
        let point = self.point_on(tile);
        self.world.on_mouse(MouseAction::Down, point);
    }

    pub fn release(&mut self) {
        self.world.on_mouse(MouseAction::Release, Point::default());
    }

    pub fn hover_over(&mut self, tile: Tile) {
        let point = self.point_on(tile);
        self.pointer.borrow_mut().position = point;
    }

    pub fn run(&mut self, ticks: usize) -> Vec<ActorEvent> {
        (0..ticks).flat_map(|_| self.world.update().events).collect()
    }

    pub fn last_description(&self) -> Option<String> {
        self.gui.borrow().descriptions.last().cloned()
    }

    pub fn player(&self) -> &Actor {
        self.world.current_player().unwrap()
    }

    pub fn give_cursor_item(&mut self, name: &str) {
        self.world
            .current_player_mut()
            .unwrap()
            .player_state_mut()
            .unwrap()
            .inventory
            .put_on_cursor(Item::new(name));
    }
}
