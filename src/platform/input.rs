//! Discrete input commands
//!
//! Front ends map raw key presses to these; the driver consumes them one at a
//! time between ticks.

use serde::{Deserialize, Serialize};

use crate::sim::matter::CargoKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Walk one tile; each component in {-1, 0, 1}
    Move(i32, i32),
    Interact,
    ToggleEquipment,
    /// Jump to a system by index
    NavigateTo(usize),
    /// Scan a planet by object index in the current system
    ScanPlanet(usize),
    Dock,
    ResolveEncounter(usize),
    BuyCargo(CargoKind),
    SellCargo(usize),
    JettisonCargo(usize),
    RepairHull(i32),
    /// Hold shuttle thrust; (0, 0) cuts the engines
    Thrust(i32, i32),
    Land(usize),
    Ascend,
    Launch,
    Hail(usize),
    /// Move the sector map cursor
    MoveCursor(i32, i32),
}

impl Command {
    /// Map a roguelike key to a command. Only keys with a fixed meaning are
    /// covered; targeted commands need a menu selection first.
    pub fn from_key(key: char) -> Option<Self> {
        Some(match key {
            'h' => Command::Move(-1, 0),
            'j' => Command::Move(0, 1),
            'k' => Command::Move(0, -1),
            'l' => Command::Move(1, 0),
            'y' => Command::Move(-1, -1),
            'u' => Command::Move(1, -1),
            'b' => Command::Move(-1, 1),
            'n' => Command::Move(1, 1),
            'e' => Command::Interact,
            't' => Command::ToggleEquipment,
            'd' => Command::Dock,
            '<' => Command::Ascend,
            'L' => Command::Launch,
            _ => return None,
        })
    }
}
