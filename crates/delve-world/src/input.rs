//! Pointer and keyboard input, turned into actor intents.
//!
//! Input never moves anything directly. A click sets a target or destination
//! on the current player; the player acts on it during the next ticks.

use serde::{Deserialize, Serialize};

use crate::actor::{EquipSlot, ItemAction, ItemTarget, Target};
use crate::geometry::Point;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseAction {
    Down,
    Click,
    Release,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardAction {
    ChangeLevelUp,
    ChangeLevelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Mouse { action: MouseAction, point: Point },
    Keyboard(KeyboardAction),
    /// The game was paused (`true`) or resumed (`false`).
    Pause(bool),
}

/// Input events delivered together before one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Mouse state carried between events of one press-hold-release cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InputLatches {
    /// Set by the first press of a hold; later presses leave the target alone.
    pub(crate) target_lock: bool,
    /// The hold started on empty ground; keep walking to the pointer.
    pub(crate) simple_move: bool,
    /// Ignore presses until the button is released.
    pub(crate) skip_next_press: bool,
}

impl World {
    /// Feed every event of `frame`, in order.
    pub fn apply_input(&mut self, frame: &InputFrame) {
        for event in &frame.events {
            match *event {
                InputEvent::Mouse { action, point } => self.on_mouse(action, point),
                InputEvent::Keyboard(action) => self.on_keyboard(action),
                InputEvent::Pause(paused) => self.on_pause(paused),
            }
        }
    }

    pub fn on_mouse(&mut self, action: MouseAction, point: Point) {
        match action {
            MouseAction::Down => self.on_mouse_down(point),
            MouseAction::Click => self.on_mouse_click(point),
            MouseAction::Release => self.on_mouse_release(),
            MouseAction::Move => {}
        }
    }

    pub fn on_keyboard(&mut self, action: KeyboardAction) {
        if self.collaborators.gui.is_modal_dialog_open() {
            return;
        }
        match action {
            KeyboardAction::ChangeLevelUp => self.change_level(true),
            KeyboardAction::ChangeLevelDown => self.change_level(false),
        }
    }

    /// On resume, a button still held from before the pause must not count
    /// as a fresh press.
    pub fn on_pause(&mut self, paused: bool) {
        if !paused && self.collaborators.pointer.is_primary_down() {
            self.latches.skip_next_press = true;
        }
    }

    fn on_mouse_down(&mut self, point: Point) {
        if self.latches.skip_next_press {
            return;
        }
        let Some(clicked) = self.tile_at(point) else {
            return;
        };

        let target_was_locked = self.latches.target_lock;
        self.latches.target_lock = true;

        if !target_was_locked {
            let holds_item = self
                .current_player()
                .and_then(|p| p.player_state())
                .is_some_and(|s| !s.inventory.is_empty(EquipSlot::Cursor));
            if holds_item {
                self.drop_cursor_item_at(point);
                return;
            }

            if let Some(id) = self.targeted_actor(point).map(|a| a.id()) {
                if let Some(player) = self.current_player_mut() {
                    player.set_target(Target::Actor(id));
                }
                return;
            }

            if let Some(tile) = self.targeted_item(point).map(|i| i.tile) {
                let action = if self.collaborators.gui.is_inventory_open() {
                    ItemAction::ToCursor
                } else {
                    ItemAction::AutoEquip
                };
                if let Some(player) = self.current_player_mut() {
                    player.set_target(Target::Item(ItemTarget { action, tile }));
                }
                return;
            }
        }

        if !target_was_locked || self.latches.simple_move {
            if let Some(player) = self.current_player_mut() {
                player.set_target(Target::None);
                player.mover_mut().set_destination(clicked.tile);
            }
            self.latches.simple_move = true;
        }
    }

    /// The cursor hotspot is its top-left corner, so aim at its centre.
    fn drop_cursor_item_at(&mut self, point: Point) {
        let (w, h) = self.collaborators.renderer.cursor_size();
        let Some(shifted) = self.tile_at(point.offset(-w / 2, -h / 2)) else {
            return;
        };
        let Some(id) = self.current_player else {
            return;
        };
        let dropped = self
            .current_level_mut()
            .is_some_and(|level| level.drop_cursor_item(id, shifted.tile));
        if dropped {
            self.hover.clear();
            self.collaborators.gui.set_description_text("");
        }
    }

    fn on_mouse_click(&mut self, point: Point) {
        let Some(clicked) = self.tile_at(point) else {
            return;
        };
        if let Some(level) = self.current_level_mut() {
            level.activate(clicked.tile);
        }
    }

    fn on_mouse_release(&mut self) {
        self.latches = InputLatches::default();
        if let Some(state) = self
            .current_player_mut()
            .and_then(|p| p.player_state_mut())
        {
            state.talking = false;
        }
    }
}
