//! NPC ship scheduler
//!
//! Ships step one tile at a time on their own move timer and pick a new
//! heading when their direction timer runs out. Pirates steer toward the
//! shuttle; traders and patrols wander.

use rand::Rng;

use crate::world::rng;
use crate::world::system::{AiKind, DIR_JITTER, SpaceObject, SystemMap, random_direction};

/// Advance every ship in `map` by one tick. `shuttle` is the shuttle's tile
/// before this tick's physics step.
pub fn step_ships(map: &mut SystemMap, shuttle: (i32, i32), sector_seed: u64, tick: u64) {
    let (width, height) = (map.width, map.height);
    for ship in map.objects.iter_mut().filter(|o| o.is_ship()) {
        step_ship(ship, shuttle, width, height, sector_seed, tick);
    }
}

fn step_ship(
    ship: &mut SpaceObject,
    shuttle: (i32, i32),
    width: i32,
    height: i32,
    sector_seed: u64,
    tick: u64,
) {
    let Some(ai) = ship.ai else {
        return;
    };
    ship.move_timer -= 1;
    ship.dir_timer -= 1;

    if ship.move_timer <= 0 {
        (ship.x, ship.dx) = advance_axis(ship.x, ship.dx, width);
        (ship.y, ship.dy) = advance_axis(ship.y, ship.dy, height);
        ship.move_timer = ship.move_rate;
    }

    if ship.dir_timer <= 0 {
        let mut dice = rng::stream(rng::event_seed(sector_seed, ship.x, ship.y, tick));
        (ship.dx, ship.dy) = match ai {
            AiKind::Pirate => pursue(ship.pos(), shuttle),
            AiKind::Trader | AiKind::Patrol => random_direction(&mut dice),
        };
        ship.dir_timer = ai.dir_interval() + dice.random_range(0..DIR_JITTER);
    }
}

/// Step one axis; bounce off the edge band by flipping the heading
fn advance_axis(pos: i32, dir: i32, extent: i32) -> (i32, i32) {
    let next = pos + dir;
    if next <= 1 || next >= extent - 2 {
        (next.clamp(1, extent - 2), -dir)
    } else {
        (next, dir)
    }
}

/// Heading toward `target`; sitting on it counts as heading east
fn pursue(from: (i32, i32), target: (i32, i32)) -> (i32, i32) {
    let dx = (target.0 - from.0).signum();
    let dy = (target.1 - from.1).signum();
    if dx == 0 && dy == 0 { (1, 0) } else { (dx, dy) }
}
