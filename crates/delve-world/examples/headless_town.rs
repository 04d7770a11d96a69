//! Headless town walk -- no window, no audio, just the simulation and logs.
//!
//! Run with:
//!   RUST_LOG=delve_world=debug cargo run --example headless_town -p delve-world
//!
//! The player walks across town, heads down to the first dungeon level, lets
//! the monsters there react for a few seconds, then saves and reloads the
//! whole world and checks that nothing changed.

use delve_world::prelude::*;

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

const SECONDS_IN_TOWN: u32 = 2;
const SECONDS_IN_DUNGEON: u32 = 4;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = WorldConfig::default();
    let ticks_per_second = config.ticks_per_second;
    let projection = DiamondProjection::default();
    let mut world = World::new(config, Collaborators::headless(2024));
    world.generate_levels(&TownLayout::classic())?;
    let hero = world.add_current_player(ActorSpec::player("Warrior", Tile::new(30, 30)), 0)?;

    // Click a tile a few steps south-east of the player.
    let goal = Tile::new(36, 34);
    let point = projection.screen_centre(goal, Tile::new(30, 30));
    world.on_mouse(MouseAction::Down, point);
    world.on_mouse(MouseAction::Release, point);

    for _ in 0..SECONDS_IN_TOWN * ticks_per_second {
        world.update();
    }
    let reached = world
        .current_player()
        .map(|p| p.position().current())
        .unwrap_or(goal);
    tracing::info!(%hero, tile = %reached, "walked across town");

    world.on_keyboard(KeyboardAction::ChangeLevelDown);
    let level = world.current_level_index().unwrap_or_default();
    tracing::info!(level, "went down the stairs");

    let mut swings = 0;
    for _ in 0..SECONDS_IN_DUNGEON * ticks_per_second {
        swings += world.update().swings().count();
    }
    tracing::info!(swings, "monsters attacked");

    // Save, reload, and compare.
    let before = world.state_hash()?;
    let json = world.save_file()?.to_json()?;
    let file = delve_save::file::SaveFile::from_json(&json)?;
    world.load_file(&file)?;
    let after = world.state_hash()?;
    anyhow::ensure!(before == after, "reloaded world differs: {before} vs {after}");

    println!("save: {} bytes, hash {after}", json.len());
    Ok(())
}
