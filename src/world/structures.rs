//! Surface structure templates
//!
//! Each point of interest is a small character grid stamped onto a surface:
//! `#` wall, `.` floor, `+` door, `T` terminal, `L` loot crate; a space
//! leaves the terrain underneath untouched.

use serde::{Deserialize, Serialize};

use crate::tile::{EquipmentKind, Tile, TileGrid, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Ruins,
    MiningRig,
    ResearchLab,
    CrashSite,
    Outpost,
}

const RUINS: &[&str] = &[
    "######", //
    "#..L.#", //
    "#....+", //
    "#.#..#", //
    "######",
];

const MINING_RIG: &[&str] = &[
    "###########",
    "#...#.....#",
    "#.T.+..L..#",
    "#...#.....#",
    "#####.....#",
    "    #.....#",
    "    ###+###",
];

const RESEARCH_LAB: &[&str] = &[
    "#############",
    "#.....#.....#",
    "#..T..+..L..#",
    "#.....#.....#",
    "###+#####+###",
];

const CRASH_SITE: &[&str] = &[
    "  ######  ",
    " ##....## ",
    "#..T..L..#",
    "+........#",
    " ##....## ",
    "  ######  ",
];

const OUTPOST: &[&str] = &[
    "#########", //
    "#.......#", //
    "#.T...L.#", //
    "#.......#", //
    "####+####",
];

impl StructureKind {
    pub const ALL: [StructureKind; 5] = [
        StructureKind::Ruins,
        StructureKind::MiningRig,
        StructureKind::ResearchLab,
        StructureKind::CrashSite,
        StructureKind::Outpost,
    ];

    /// Keyword shown in scan results
    pub fn keyword(self) -> &'static str {
        match self {
            StructureKind::Ruins => "Ruins",
            StructureKind::MiningRig => "Mining Rig",
            StructureKind::ResearchLab => "Research Lab",
            StructureKind::CrashSite => "Crash Site",
            StructureKind::Outpost => "Outpost",
        }
    }

    pub fn template(self) -> &'static [&'static str] {
        match self {
            StructureKind::Ruins => RUINS,
            StructureKind::MiningRig => MINING_RIG,
            StructureKind::ResearchLab => RESEARCH_LAB,
            StructureKind::CrashSite => CRASH_SITE,
            StructureKind::Outpost => OUTPOST,
        }
    }

    /// Template footprint (width, height)
    pub fn size(self) -> (i32, i32) {
        let rows = self.template();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        (width as i32, rows.len() as i32)
    }

    /// Small structures get a cleared approach to their door
    pub fn is_small(self) -> bool {
        self == StructureKind::Ruins
    }
}

/// Where a stamped structure put its notable tiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stamped {
    pub doors: Vec<(i32, i32)>,
    pub terminals: Vec<(i32, i32)>,
    pub loot: Vec<(i32, i32)>,
    /// Interior floor tiles (including terminal and loot tiles)
    pub floor: Vec<(i32, i32)>,
}

/// Stamp a structure with its top-left corner at `(ox, oy)`
pub fn stamp(grid: &mut TileGrid, kind: StructureKind, ox: i32, oy: i32) -> Stamped {
    let mut out = Stamped::default();
    for (dy, row) in kind.template().iter().enumerate() {
        for (dx, c) in row.chars().enumerate() {
            let (x, y) = (ox + dx as i32, oy + dy as i32);
            let tile = match c {
                '#' => Tile::new(TileKind::Wall),
                '.' => Tile::new(TileKind::Floor),
                '+' => {
                    out.doors.push((x, y));
                    Tile::new(TileKind::Door)
                }
                'T' => {
                    out.terminals.push((x, y));
                    Tile::with_equipment(TileKind::Floor, EquipmentKind::Terminal)
                }
                'L' => {
                    out.loot.push((x, y));
                    Tile::with_equipment(TileKind::Floor, EquipmentKind::LootCrate)
                }
                _ => continue,
            };
            if tile.kind == TileKind::Floor {
                out.floor.push((x, y));
            }
            grid.set(x, y, tile);
        }
    }
    out
}
