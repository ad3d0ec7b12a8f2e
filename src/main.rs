//! SpaceHole Rogue headless entry point
//!
//! Loads `spacehole.json`, builds a game and simulates a fixed number of
//! ticks, then prints the final frame. Interactive front ends drive `Sim`
//! through `Command`s instead.

use anyhow::Context;

use spacehole_rogue::Settings;
use spacehole_rogue::consts::TICK_RATE;
use spacehole_rogue::persistence::ShipLayout;
use spacehole_rogue::sim::{Priority, Sim};

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("SpaceHole Rogue (headless) starting...");

    let settings = Settings::load();
    let layout = ShipLayout::load(&settings.ship_layout)
        .with_context(|| format!("loading ship layout {}", settings.ship_layout))?;
    let mut sim = Sim::from_settings(&settings, &layout);
    log::info!(
        "Seed {} at {}, running {} ticks",
        sim.master_seed,
        sim.location_name(),
        settings.headless_ticks
    );

    sim.run(settings.headless_ticks);
    if sim.log.has_priority(Priority::Critical) {
        log::warn!("Critical warnings were raised during the run");
    }

    let snapshot = sim.snapshot(80, 24, 10);
    for row in snapshot.grid_rows() {
        println!("{row}");
    }
    println!("{}", snapshot.status_line());
    for entry in snapshot.messages {
        println!("  {}", entry.text);
    }
    log::info!(
        "Simulated {:.1} minutes of game time",
        sim.tick_count as f64 / TICK_RATE as f64 / 60.0
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library and drives it from its own loop
}
