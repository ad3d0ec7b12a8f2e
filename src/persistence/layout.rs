//! Ship layout documents
//!
//! ```json
//! { "name": "...", "class": "...", "width": 16, "height": 9,
//!   "tiles": ["####", ...], "rooms": [{"id": "bridge", "name": "Bridge"}],
//!   "spawn": [2, 2] }
//! ```
//!
//! `#` wall, `.` floor, `+` door, equipment letters sit on floor. Anything
//! else becomes void.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::{EquipmentKind, Tile, TileGrid, TileKind};

/// The layout shipped with the game
const BUILTIN_SHUTTLE: &str = include_str!("../../assets/ships/shuttle.json");

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout declares height {expected} but has {actual} tile rows")]
    HeightMismatch { expected: usize, actual: usize },
    #[error("spawn ({x}, {y}) is outside the {width}x{height} layout")]
    SpawnOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("layout has no tiles")]
    EmptyLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipLayout {
    pub name: String,
    pub class: String,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    pub spawn: [i32; 2],
}

impl ShipLayout {
    /// Load and validate a layout file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let layout = Self::from_json(&json)?;
        log::info!(
            "Loaded ship layout '{}' ({}x{}) from {}",
            layout.name,
            layout.width,
            layout.height,
            path.display()
        );
        Ok(layout)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// The stock shuttle
    pub fn builtin_shuttle() -> Result<Self, LayoutError> {
        Self::from_json(BUILTIN_SHUTTLE)
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::EmptyLayout);
        }
        if self.tiles.len() != self.height {
            return Err(LayoutError::HeightMismatch {
                expected: self.height,
                actual: self.tiles.len(),
            });
        }
        let [x, y] = self.spawn;
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(LayoutError::SpawnOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Build the deck grid. Rows shorter than `width` are padded with void;
    /// longer rows are cut.
    pub fn to_grid(&self) -> TileGrid {
        let mut grid = TileGrid::new(self.width, self.height, TileKind::Void);
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, c) in row.chars().take(self.width).enumerate() {
                grid.set(x as i32, y as i32, tile_for(c));
            }
        }
        grid
    }

    pub fn spawn(&self) -> (i32, i32) {
        (self.spawn[0], self.spawn[1])
    }
}

fn tile_for(c: char) -> Tile {
    match c {
        '#' => Tile::new(TileKind::Wall),
        '.' => Tile::new(TileKind::Floor),
        '+' => Tile::new(TileKind::Door),
        _ => match EquipmentKind::from_layout_char(c) {
            Some(kind) => Tile::with_equipment(TileKind::Floor, kind),
            None => Tile::VOID,
        },
    }
}
