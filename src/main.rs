//! Rescue Arena entry point
//!
//! Headless match runner: loads a preset, assembles the field, drops a
//! demo robot onto it, and runs the countdown for a few simulated
//! seconds. Useful for exercising a preset without the full engine.

use std::error::Error;
use std::path::{Path, PathBuf};

use rescue_arena::consts::TIMER_TEXT_KEY;
use rescue_arena::sim::{TileSearchPath, build_match};
use rescue_arena::{ObjectRegistry, SimObject, load_preset};

fn main() {
    env_logger::init();

    let preset_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "presets/rescue.yaml".to_string());

    if let Err(e) = run(Path::new(&preset_path)) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(preset_path: &Path) -> Result<(), Box<dyn Error>> {
    let preset = load_preset(preset_path)?;
    log::info!(
        "preset '{}': {} tiles, {} spawns, {} ticks/s",
        preset_path.display(),
        preset.tiles.len(),
        preset.spawns.len(),
        preset.tick_rate
    );

    // Search for tiles next to the preset file, then in the defaults.
    let mut roots: Vec<PathBuf> = Vec::new();
    if let Some(dir) = preset_path.parent() {
        roots.push(dir.join("tiles"));
        roots.push(dir.to_path_buf());
    }
    roots.extend(["presets/tiles".into(), "presets".into()]);
    let search = TileSearchPath::new(roots);

    let mut registry = ObjectRegistry::new(preset.tick_rate);
    let mut game = build_match(&preset, &search, &mut registry)?;

    // The engine would load robots and the scoreboard; stand in for it.
    registry.insert(SimObject::new("Robot-0"));
    registry.insert(SimObject::new(TIMER_TEXT_KEY).with_text("05:00"));

    game.start_up(&mut registry)?;

    let robot = registry.get("Robot-0").expect("robot registered");
    println!(
        "{} field objects, robot at ({:.1}, {:.1})",
        registry.len(),
        robot.body.position.x,
        robot.body.position.y
    );

    // Run three simulated seconds of match time.
    for tick in 0..(preset.tick_rate as u64 * 3) {
        game.tick(tick, false, &mut registry);
    }
    let shown = registry
        .get(TIMER_TEXT_KEY)
        .and_then(|o| o.text.clone())
        .unwrap_or_default();
    println!("countdown after 3s: {shown}");

    Ok(())
}
