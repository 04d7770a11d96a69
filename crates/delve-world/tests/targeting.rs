//! Hit testing and hover descriptions.

mod common;

use common::{town, START};
use delve_world::prelude::*;

fn npc(h: &mut common::Harness, name: &str, tile: Tile) -> ActorId {
    h.world
        .spawn_actor(0, ActorSpec::npc(name, tile, Direction::South))
        .unwrap()
}

fn left_of(point: Point) -> Point {
    point.offset(-10, 0)
}

fn right_of(point: Point) -> Point {
    point.offset(10, 0)
}

#[test]
fn actor_on_the_hit_tile_is_found() {
    let (mut h, _hero) = town(1);
    let id = npc(&mut h, "Wirt", Tile::new(33, 30));
    let point = h.point_on(Tile::new(33, 30));
    assert_eq!(h.world.targeted_actor(point).map(Actor::id), Some(id));
}

#[test]
fn tall_actor_one_row_down_is_found_diagonally() {
    let (mut h, _hero) = town(2);
    let id = npc(&mut h, "Wirt", Tile::new(34, 31));
    let point = h.point_on(Tile::new(33, 30));
    assert_eq!(h.world.targeted_actor(point).map(Actor::id), Some(id));
}

#[test]
fn right_half_checks_the_tile_to_the_east() {
    let (mut h, _hero) = town(3);
    let id = npc(&mut h, "Wirt", Tile::new(34, 30));
    let centre = h.point_on(Tile::new(33, 30));
    assert_eq!(h.world.targeted_actor(right_of(centre)).map(Actor::id), Some(id));
    assert!(h.world.targeted_actor(left_of(centre)).is_none());
}

#[test]
fn left_half_checks_the_tile_to_the_south() {
    let (mut h, _hero) = town(4);
    let id = npc(&mut h, "Wirt", Tile::new(33, 31));
    let centre = h.point_on(Tile::new(33, 30));
    assert_eq!(h.world.targeted_actor(left_of(centre)).map(Actor::id), Some(id));
    assert!(h.world.targeted_actor(right_of(centre)).is_none());
}

#[test]
fn hit_tile_wins_over_the_tiles_below() {
    let (mut h, _hero) = town(5);
    let front = npc(&mut h, "Front", Tile::new(33, 30));
    npc(&mut h, "Behind", Tile::new(34, 31));
    npc(&mut h, "Beside", Tile::new(34, 30));
    let point = right_of(h.point_on(Tile::new(33, 30)));
    assert_eq!(h.world.targeted_actor(point).map(Actor::id), Some(front));
}

#[test]
fn dead_actors_and_the_player_are_never_targeted() {
    let (mut h, hero) = town(6);
    let id = npc(&mut h, "Wirt", Tile::new(33, 30));
    h.world.actor_by_id_mut(id).unwrap().kill();
    let point = h.point_on(Tile::new(33, 30));
    assert!(h.world.targeted_actor(point).is_none());

    let on_player = h.point_on(START);
    assert!(h.world.targeted_actor(on_player).is_none());
    assert!(h.world.actor_at(START).map(Actor::id) == Some(hero));
}

#[test]
fn tiles_past_the_level_edge_are_skipped() {
    let (mut h, hero) = town(7);
    assert!(h.world.teleport(hero, 0, Tile::new(98, 98)));
    let point = h.point_on(Tile::new(99, 99));
    assert!(h.world.targeted_actor(point).is_none());
}

#[test]
fn items_are_only_found_on_the_hit_tile() {
    let (mut h, _hero) = town(8);
    h.world
        .current_level_mut()
        .unwrap()
        .place_item(Tile::new(34, 31), Item::new("Scroll"));
    let diagonal = h.point_on(Tile::new(33, 30));
    assert!(h.world.targeted_item(diagonal).is_none());
    let direct = h.point_on(Tile::new(34, 31));
    assert_eq!(h.world.targeted_item(direct).unwrap().item.name, "Scroll");
}

// ---------- Hover ----------

#[test]
fn hover_description_is_written_once_per_change() {
    let (mut h, _hero) = town(9);
    npc(&mut h, "Ogden", Tile::new(33, 30));
    h.world
        .current_level_mut()
        .unwrap()
        .place_item(Tile::new(30, 33), Item::new("Buckler"));

    h.hover_over(Tile::new(33, 30));
    h.run(3);
    assert_eq!(h.gui.borrow().descriptions, vec!["Ogden".to_owned()]);

    h.hover_over(Tile::new(30, 33));
    h.run(3);
    h.hover_over(Tile::new(28, 28));
    h.run(3);
    assert_eq!(
        h.gui.borrow().descriptions,
        vec!["Ogden".to_owned(), "Buckler".to_owned(), String::new()]
    );
}

#[test]
fn cursor_item_overrides_what_is_under_the_pointer() {
    let (mut h, _hero) = town(10);
    npc(&mut h, "Ogden", Tile::new(33, 30));
    h.hover_over(Tile::new(33, 30));
    h.give_cursor_item("Club");
    h.run(2);
    assert_eq!(h.gui.borrow().descriptions, vec!["Club".to_owned()]);
    assert_eq!(*h.world.hover(), HoverState::Cursor("Club".to_owned()));
}

#[test]
fn modal_dialog_clears_the_hover() {
    let (mut h, _hero) = town(11);
    let id = npc(&mut h, "Ogden", Tile::new(33, 30));
    h.hover_over(Tile::new(33, 30));
    h.world.update();
    assert_eq!(*h.world.hover(), HoverState::Actor(id));

    h.gui.borrow_mut().modal = true;
    h.run(3);
    assert_eq!(*h.world.hover(), HoverState::Nothing);
    assert_eq!(
        h.gui.borrow().descriptions,
        vec!["Ogden".to_owned(), String::new()]
    );
}
