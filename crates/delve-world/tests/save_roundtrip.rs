//! Saving, reloading and rejecting broken saves.

mod common;

use common::town;
use delve_save::prelude::*;
use delve_world::behaviour::{Behaviour, BASIC_MONSTER_TAG};
use delve_world::persist::SavedObject;
use delve_world::prelude::*;

/// A town with a few monsters and one dungeon level visited.
fn busy_world(seed: u64) -> (common::Harness, ActorId) {
    let (mut h, hero) = town(seed);
    for i in 0..4 {
        h.world
            .spawn_actor(0, ActorSpec::monster("Zombie", Tile::new(22 + i * 4, 38)))
            .unwrap();
    }
    h.world
        .current_level_mut()
        .unwrap()
        .place_item(Tile::new(35, 35), Item::new("Spectral Elixir"));
    h.world.get_level(1).unwrap();
    h.run(80);
    (h, hero)
}

fn reseal(entries: Vec<serde_json::Value>) -> SaveFile {
    let hash = content_hash(&entries);
    SaveFile {
        format_version: SAVE_FORMAT_VERSION,
        entries,
        hash,
    }
}

#[test]
fn reload_reproduces_the_same_state() {
    let (mut h, hero) = busy_world(1);
    let before = h.world.state_hash().unwrap();
    let file = h.world.save_file().unwrap();

    h.world.load_file(&file).unwrap();
    assert_eq!(h.world.state_hash().unwrap(), before);
    assert_eq!(h.world.current_player_id(), Some(hero));
    assert_eq!(h.world.players(), &[hero]);
    assert_eq!(h.world.ticks(), 0);
}

#[test]
fn reloaded_world_continues_identically() {
    let (file, expected) = {
        let (mut h, _hero) = busy_world(2);
        let file = h.world.save_file().unwrap();
        h.run(150);
        (file, h.world.state_hash().unwrap())
    };

    let (mut h, _hero) = common::town(2);
    h.world.load_file(&file).unwrap();
    h.run(150);
    assert_eq!(h.world.state_hash().unwrap(), expected);
}

#[test]
fn save_survives_json_text() {
    let (h, _hero) = busy_world(3);
    let file = h.world.save_file().unwrap();
    let text = file.to_json().unwrap();
    let parsed = SaveFile::from_json(&text).unwrap();
    assert_eq!(parsed, file);
    parsed.verify().unwrap();
}

#[test]
fn behaviours_are_relinked_and_ids_keep_increasing() {
    let (mut h, _hero) = busy_world(4);
    let file = h.world.save_file().unwrap();
    h.world.load_file(&file).unwrap();

    let mut monsters = 0;
    for actor in h.world.all_actors() {
        if let Behaviour::BasicMonster(_) = actor.behaviour() {
            monsters += 1;
            assert_eq!(actor.behaviour().actor(), Some(actor.id()));
        }
        assert!(actor.id().0 < h.world.next_actor_id());
    }
    assert!(monsters >= 4);

    let fresh = h
        .world
        .spawn_actor(0, ActorSpec::monster("Late", Tile::new(40, 20)))
        .unwrap();
    assert_eq!(h.world.all_actors().filter(|a| a.id() == fresh).count(), 1);
}

#[test]
fn ungenerated_slots_stay_ungenerated() {
    let (mut h, _hero) = busy_world(5);
    let file = h.world.save_file().unwrap();
    h.world.load_file(&file).unwrap();
    assert_eq!(h.world.levels().len(), 17);
    assert!(h.world.levels().is_generated(0));
    assert!(h.world.levels().is_generated(1));
    assert!(!h.world.levels().is_generated(2));
}

#[test]
fn unknown_behaviour_tag_fails_the_load() {
    let (mut h, _hero) = busy_world(6);
    let before = h.world.state_hash().unwrap();
    let mut entries = h.world.save_file().unwrap().entries;
    let slot = entries
        .iter()
        .position(|e| e.as_str() == Some(BASIC_MONSTER_TAG))
        .unwrap();
    entries[slot] = serde_json::json!("dragon-behaviour");

    let err = h.world.load_file(&reseal(entries)).unwrap_err();
    match err {
        WorldError::Save(SaveError::UnknownTypeTag { tag, registered }) => {
            assert_eq!(tag, "dragon-behaviour");
            assert!(registered.contains(BASIC_MONSTER_TAG));
        }
        other => panic!("expected UnknownTypeTag, got {other:?}"),
    }
    assert_eq!(h.world.state_hash().unwrap(), before, "world must be untouched");
}

#[test]
fn missing_current_player_fails_the_load() {
    let (mut h, _hero) = busy_world(7);
    let mut entries = h.world.save_file().unwrap().entries;
    let current = entries.len() - 2;
    entries[current] = serde_json::json!(9999);

    let err = h.world.load_file(&reseal(entries)).unwrap_err();
    assert!(matches!(
        err,
        WorldError::MissingCurrentPlayer(Some(ActorId(9999)))
    ));
}

#[test]
fn non_player_named_as_current_fails_the_load() {
    let (mut h, hero) = busy_world(11);
    let before = h.world.state_hash().unwrap();
    let npc = h
        .world
        .level(0)
        .unwrap()
        .actors()
        .find(|a| !a.is_player())
        .map(Actor::id)
        .unwrap();
    let mut entries = h.world.save_file().unwrap().entries;
    let current = entries.len() - 2;
    entries[current] = serde_json::json!(npc.0);

    let err = h.world.load_file(&reseal(entries)).unwrap_err();
    assert!(matches!(err, WorldError::MissingCurrentPlayer(Some(id)) if id == npc));
    assert_eq!(h.world.current_player_id(), Some(hero));
    assert_eq!(h.world.state_hash().unwrap(), before);
}

// Town slot: count, index, flag, then the level body starting at entry 3.
const TOWN_INDEX_ENTRY: usize = 3;
const TOWN_TILES_ENTRY: usize = 4;

#[test]
fn short_tile_map_fails_the_load() {
    let (mut h, _hero) = busy_world(12);
    let mut entries = h.world.save_file().unwrap().entries;
    entries[TOWN_TILES_ENTRY]["tiles"] = serde_json::json!(["Floor"]);

    let err = h.world.load_file(&reseal(entries)).unwrap_err();
    assert!(matches!(
        err,
        WorldError::Save(SaveError::Malformed { position: TOWN_TILES_ENTRY, expected: "tile map", .. })
    ));
    assert!(h.world.current_level().unwrap().is_passable(Tile::new(50, 50)));
}

#[test]
fn level_body_in_the_wrong_slot_fails_the_load() {
    let (mut h, _hero) = busy_world(13);
    let mut entries = h.world.save_file().unwrap().entries;
    assert_eq!(entries[TOWN_INDEX_ENTRY], serde_json::json!(0));
    entries[TOWN_INDEX_ENTRY] = serde_json::json!(5);

    let err = h.world.load_file(&reseal(entries)).unwrap_err();
    assert!(matches!(
        err,
        WorldError::Save(SaveError::Malformed { position: TOWN_INDEX_ENTRY, expected: "level index", .. })
    ));
}

#[test]
fn tampered_save_is_rejected() {
    let (mut h, _hero) = busy_world(8);
    let mut file = h.world.save_file().unwrap();
    let last = file.entries.len() - 1;
    file.entries[last] = serde_json::json!(1);
    assert!(matches!(
        h.world.load_file(&file),
        Err(WorldError::Save(SaveError::HashMismatch { .. }))
    ));
}

#[test]
fn truncated_stream_reports_unexpected_end() {
    let (mut h, _hero) = busy_world(9);
    let mut entries = h.world.save_file().unwrap().entries;
    entries.truncate(entries.len() / 2);
    assert!(matches!(
        h.world.load_file(&reseal(entries)),
        Err(WorldError::Save(SaveError::UnexpectedEnd { .. }))
            | Err(WorldError::Save(SaveError::Malformed { .. }))
    ));
}

#[test]
fn empty_registry_cannot_rebuild_anything() {
    let (h, _hero) = busy_world(10);
    let file = h.world.save_file().unwrap();
    let mut loader = file.loader().unwrap();
    // Slot count, slot index and flag, then the eight town header entries.
    for _ in 0..11 {
        loader.load::<serde_json::Value>().unwrap();
    }
    let registry: FactoryRegistry<SavedObject> = FactoryRegistry::new();
    assert!(matches!(
        registry.load_tagged(&mut loader),
        Err(SaveError::UnknownTypeTag { .. })
    ));
}
