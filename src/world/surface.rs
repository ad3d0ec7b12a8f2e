//! Planet surface and prologue generation
//!
//! Outdoor maps start as open ground scattered with rock and hazards; interior
//! maps are a walled corridor with rooms branching above and below. Every map
//! gets a shuttle pad and a player spawn beside it. Landings stamp a
//! structure for their point of interest; the prologue additionally runs a
//! reachability pass and scatters the shuttle parts the player must recover.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::{self, PROLOGUE_SALT};
use super::structures::{self, Stamped, StructureKind};
use super::system::PlanetKind;
use crate::consts::{PROLOGUE_HEIGHT, PROLOGUE_WIDTH, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::tile::{EquipmentKind, Tile, TileGrid, TileKind};

const NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Parts scattered across the prologue map
pub const SHUTTLE_PARTS: [EquipmentKind; 3] = [
    EquipmentKind::FuelCell,
    EquipmentKind::SpareParts,
    EquipmentKind::PowerPack,
];

/// Minimum column / row separation between a shuttle part and the pad
const PART_MIN_DX: i32 = 8;
const PART_MIN_DY: i32 = 5;

/// A generated landing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMap {
    pub grid: TileGrid,
    pub spawn: (i32, i32),
    pub pad: (i32, i32),
    /// Tile holding the landing objective (terminal or marker)
    pub objective: Option<(i32, i32)>,
    pub structure: Option<StructureKind>,
    pub seed: u64,
}

/// Where the player wakes up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrologueLocation {
    DerelictStation,
    WreckedFreighter,
    MiningOutpost,
    ResearchBase,
    CrashSite,
    AncientRuins,
}

impl PrologueLocation {
    pub const ALL: [PrologueLocation; 6] = [
        PrologueLocation::DerelictStation,
        PrologueLocation::WreckedFreighter,
        PrologueLocation::MiningOutpost,
        PrologueLocation::ResearchBase,
        PrologueLocation::CrashSite,
        PrologueLocation::AncientRuins,
    ];

    /// Location picked for a master seed when none is configured
    pub fn for_seed(seed: u64) -> Self {
        Self::ALL[(rng::derive(seed, PROLOGUE_SALT) % Self::ALL.len() as u64) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            PrologueLocation::DerelictStation => "Derelict Station",
            PrologueLocation::WreckedFreighter => "Wrecked Freighter",
            PrologueLocation::MiningOutpost => "Mining Outpost",
            PrologueLocation::ResearchBase => "Research Base",
            PrologueLocation::CrashSite => "Crash Site",
            PrologueLocation::AncientRuins => "Ancient Ruins",
        }
    }

    pub fn is_interior(self) -> bool {
        matches!(
            self,
            PrologueLocation::DerelictStation | PrologueLocation::WreckedFreighter
        )
    }

    fn terrain(self) -> PlanetKind {
        match self {
            PrologueLocation::ResearchBase => PlanetKind::Ice,
            PrologueLocation::CrashSite => PlanetKind::Volcanic,
            _ => PlanetKind::Rocky,
        }
    }

    fn structure(self) -> Option<StructureKind> {
        match self {
            PrologueLocation::DerelictStation | PrologueLocation::WreckedFreighter => None,
            PrologueLocation::MiningOutpost => Some(StructureKind::MiningRig),
            PrologueLocation::ResearchBase => Some(StructureKind::ResearchLab),
            PrologueLocation::CrashSite => Some(StructureKind::CrashSite),
            PrologueLocation::AncientRuins => Some(StructureKind::Ruins),
        }
    }
}

/// The opening map, kept until the player launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrologueSurface {
    pub location: PrologueLocation,
    pub map: SurfaceMap,
    /// Tiles holding shuttle parts
    pub parts: Vec<(i32, i32)>,
    /// Tiles holding loot crates (template and scattered)
    pub loot: Vec<(i32, i32)>,
    /// Paths carved by the reachability pass
    pub carved: usize,
}

/// Generate a 40x25 landing surface for a planet
pub fn generate_surface(seed: u64, kind: PlanetKind, poi: StructureKind) -> SurfaceMap {
    let mut rng = rng::stream(seed);
    let (mut grid, spawn, pad) = outdoor_base(&mut rng, SURFACE_WIDTH, SURFACE_HEIGHT, kind);
    let stamped = place_structure(&mut rng, &mut grid, poi);

    let objective = match stamped.terminals.first() {
        Some(&terminal) => Some(terminal),
        None => {
            let open: Vec<_> = stamped
                .floor
                .iter()
                .copied()
                .filter(|&(x, y)| grid.equipment(x, y).is_none())
                .collect();
            if open.is_empty() {
                None
            } else {
                let marker = open[rng.random_range(0..open.len())];
                grid.place_equipment(marker.0, marker.1, EquipmentKind::ObjectiveMarker);
                Some(marker)
            }
        }
    };

    log::debug!("Surface {seed}: {} with {}", kind.name(), poi.keyword());
    SurfaceMap {
        grid,
        spawn,
        pad,
        objective,
        structure: Some(poi),
        seed,
    }
}

/// Generate the 50x30 prologue map for a location
pub fn generate_prologue(seed: u64, location: PrologueLocation) -> PrologueSurface {
    let mut rng = rng::stream(seed);
    let (mut grid, spawn, pad) = if location.is_interior() {
        interior_base(&mut rng, PROLOGUE_WIDTH, PROLOGUE_HEIGHT)
    } else {
        outdoor_base(&mut rng, PROLOGUE_WIDTH, PROLOGUE_HEIGHT, location.terrain())
    };

    let mut loot = Vec::new();
    if let Some(kind) = location.structure() {
        loot.extend(place_structure(&mut rng, &mut grid, kind).loot);
    }

    let carved = ensure_doors_reachable(&mut grid, spawn);
    let reach = flood_fill(&grid, spawn);
    let reachable = |x: i32, y: i32| reach[y as usize * grid.width + x as usize];

    // Shuttle parts: reachable open tiles well away from the pad
    let open: Vec<(i32, i32)> = grid
        .iter()
        .filter(|&(x, y, t)| {
            matches!(t.kind, TileKind::Floor | TileKind::Ground)
                && t.equipment.is_none()
                && reachable(x, y)
                && (x, y) != spawn
        })
        .map(|(x, y, _)| (x, y))
        .collect();
    let mut far: Vec<_> = open
        .iter()
        .copied()
        .filter(|&(x, y)| (x - pad.0).abs() >= PART_MIN_DX || (y - pad.1).abs() >= PART_MIN_DY)
        .collect();
    if far.len() < SHUTTLE_PARTS.len() {
        far = open.clone();
    }
    far.shuffle(&mut rng);
    let parts: Vec<(i32, i32)> = far.iter().copied().take(SHUTTLE_PARTS.len()).collect();
    for (&(x, y), &part) in parts.iter().zip(SHUTTLE_PARTS.iter()) {
        grid.place_equipment(x, y, part);
    }

    // Loot crates prefer reachable floor, falling back to ground outdoors
    let mut crate_spots: Vec<(i32, i32)> = open
        .iter()
        .copied()
        .filter(|&(x, y)| grid.kind(x, y) == TileKind::Floor && grid.equipment(x, y).is_none())
        .collect();
    if crate_spots.is_empty() {
        crate_spots = open
            .iter()
            .copied()
            .filter(|&(x, y)| grid.equipment(x, y).is_none())
            .collect();
    }
    crate_spots.shuffle(&mut rng);
    let crate_count = rng.random_range(2..=4usize);
    for &(x, y) in crate_spots.iter().take(crate_count) {
        grid.place_equipment(x, y, EquipmentKind::LootCrate);
        loot.push((x, y));
    }

    log::debug!(
        "Prologue {} (seed {seed}): {} parts, {} crates, {carved} carves",
        location.name(),
        parts.len(),
        loot.len()
    );

    PrologueSurface {
        location,
        map: SurfaceMap {
            grid,
            spawn,
            pad,
            objective: None,
            structure: location.structure(),
            seed,
        },
        parts,
        loot,
        carved,
    }
}

/// Open ground with rocks and hazards, plus a cleared shuttle pad at the
/// bottom center. Returns (grid, spawn, pad).
fn outdoor_base(
    rng: &mut Pcg32,
    width: usize,
    height: usize,
    kind: PlanetKind,
) -> (TileGrid, (i32, i32), (i32, i32)) {
    let mut grid = TileGrid::new(width, height, TileKind::Ground);
    let rock_density = rng.random_range(0.15f32..0.20);
    let hazard_density = if kind == PlanetKind::Volcanic {
        rng.random_range(0.04f32..0.07)
    } else {
        rng.random_range(0.02f32..0.05)
    };
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let roll = rng.random::<f32>();
            if roll < rock_density {
                grid.set_kind(x, y, TileKind::Rock);
            } else if roll < rock_density + hazard_density {
                grid.set_kind(x, y, TileKind::Hazard);
            }
        }
    }

    let pad = (width as i32 / 2, height as i32 - 3);
    for y in pad.1 - 1..=pad.1 + 1 {
        for x in pad.0 - 2..=pad.0 + 2 {
            grid.set(x, y, Tile::new(TileKind::Ground));
        }
    }
    grid.set(pad.0, pad.1, Tile::new(TileKind::ShuttlePad));
    (grid, (pad.0, pad.1 - 1), pad)
}

/// A walled corridor along the middle row with rooms alternating above and
/// below, each joined to the corridor by a door. The pad sits at the
/// corridor's east end. Returns (grid, spawn, pad).
fn interior_base(rng: &mut Pcg32, width: usize, height: usize) -> (TileGrid, (i32, i32), (i32, i32)) {
    let (w, h) = (width as i32, height as i32);
    let mut grid = TileGrid::new(width, height, TileKind::Void);
    let cy = h / 2;

    fill_rect(&mut grid, 1, cy - 2, w - 2, cy + 2, TileKind::Wall);
    fill_rect(&mut grid, 2, cy - 1, w - 3, cy + 1, TileKind::Floor);

    let mut x = 3;
    let mut above = true;
    loop {
        let rw = rng.random_range(5..=8);
        let rh = rng.random_range(4..=6);
        if x + rw >= w - 6 {
            break;
        }
        // Interior rows and the rows of the door and the pierced corridor wall
        let (top, bottom, door_y, gap_y) = if above {
            (cy - 3 - rh, cy - 4, cy - 3, cy - 2)
        } else {
            (cy + 4, cy + 3 + rh, cy + 3, cy + 2)
        };
        fill_rect(&mut grid, x - 1, top - 1, x + rw, bottom + 1, TileKind::Wall);
        fill_rect(&mut grid, x, top, x + rw - 1, bottom, TileKind::Floor);
        let door_x = rng.random_range(x..x + rw);
        grid.set(door_x, door_y, Tile::new(TileKind::Door));
        grid.set(door_x, gap_y, Tile::new(TileKind::Floor));

        x += rw + 2;
        above = !above;
    }

    // Docking strip: three columns cleared across the corridor's east end
    let pad = (w - 4, cy);
    fill_rect(&mut grid, w - 5, cy - 1, w - 3, cy + 1, TileKind::Floor);
    grid.set(pad.0, pad.1, Tile::new(TileKind::ShuttlePad));
    (grid, (pad.0 - 1, pad.1), pad)
}

fn fill_rect(grid: &mut TileGrid, x0: i32, y0: i32, x1: i32, y1: i32, kind: TileKind) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            grid.set(x, y, Tile::new(kind));
        }
    }
}

/// Stamp a structure in the upper part of the map, clear of the pad area.
/// Small structures get a short cleared approach east of their door.
fn place_structure(rng: &mut Pcg32, grid: &mut TileGrid, kind: StructureKind) -> Stamped {
    let (tw, th) = kind.size();
    let (w, h) = (grid.width as i32, grid.height as i32);
    let max_x = (w - tw - 2).max(2);
    let max_y = (h - th - 7).max(2);
    let ox = rng.random_range(2..=max_x);
    let oy = rng.random_range(2..=max_y);
    let stamped = structures::stamp(grid, kind, ox, oy);

    if kind.is_small() {
        let clear = rng.random_range(1..=4);
        for &(dx, dy) in &stamped.doors {
            for i in 1..=clear {
                if matches!(grid.kind(dx + i, dy), TileKind::Rock | TileKind::Hazard) {
                    grid.set_kind(dx + i, dy, TileKind::Ground);
                }
            }
        }
    }
    stamped
}

/// Tiles reachable on foot from `start` (4-connected), row-major mask
pub fn flood_fill(grid: &TileGrid, start: (i32, i32)) -> Vec<bool> {
    let mut seen = vec![false; grid.width * grid.height];
    if !grid.is_walkable(start.0, start.1) {
        return seen;
    }
    let idx = |x: i32, y: i32| y as usize * grid.width + x as usize;
    let mut queue = VecDeque::from([start]);
    seen[idx(start.0, start.1)] = true;
    while let Some((x, y)) = queue.pop_front() {
        for (ox, oy) in NEIGHBORS {
            let (nx, ny) = (x + ox, y + oy);
            if grid.is_walkable(nx, ny) && !seen[idx(nx, ny)] {
                seen[idx(nx, ny)] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    seen
}

/// Carve paths until every door is reachable from `spawn`. Returns the
/// number of carves made.
pub fn ensure_doors_reachable(grid: &mut TileGrid, spawn: (i32, i32)) -> usize {
    let mut carves = 0;
    for door in grid.positions_of_kind(TileKind::Door) {
        let reach = flood_fill(grid, spawn);
        if reach[door.1 as usize * grid.width + door.0 as usize] {
            continue;
        }
        // Straight-line carve first; walls can defeat it, in which case
        // follow a path that routes around them.
        if let Some(from) = nearest_reachable(grid, &reach, door, true) {
            carve_l_path(grid, from, door);
            carves += 1;
        }
        let reach = flood_fill(grid, spawn);
        if !reach[door.1 as usize * grid.width + door.0 as usize] {
            if let Some(path) = path_around_walls(grid, &reach, door) {
                for (x, y) in path {
                    clear_obstacle(grid, x, y);
                }
                carves += 1;
            } else {
                log::warn!("Door at {door:?} is sealed in and cannot be connected");
            }
        }
    }
    carves
}

/// Breadth-first search outward from `from` for the closest tile in `reach`.
/// With `through_walls` the search crosses anything in bounds.
fn nearest_reachable(
    grid: &TileGrid,
    reach: &[bool],
    from: (i32, i32),
    through_walls: bool,
) -> Option<(i32, i32)> {
    bfs_to_reachable(grid, reach, from, through_walls).map(|path| path[0])
}

/// Path (reachable end first, `from` last) through non-wall tiles
fn path_around_walls(grid: &TileGrid, reach: &[bool], from: (i32, i32)) -> Option<Vec<(i32, i32)>> {
    bfs_to_reachable(grid, reach, from, false)
}

fn bfs_to_reachable(
    grid: &TileGrid,
    reach: &[bool],
    from: (i32, i32),
    through_walls: bool,
) -> Option<Vec<(i32, i32)>> {
    let idx = |x: i32, y: i32| y as usize * grid.width + x as usize;
    let mut parent: Vec<Option<(i32, i32)>> = vec![None; grid.width * grid.height];
    let mut seen = vec![false; grid.width * grid.height];
    let mut queue = VecDeque::from([from]);
    seen[idx(from.0, from.1)] = true;
    while let Some((x, y)) = queue.pop_front() {
        if reach[idx(x, y)] {
            let mut path = vec![(x, y)];
            let mut cur = (x, y);
            while let Some(prev) = parent[idx(cur.0, cur.1)] {
                path.push(prev);
                cur = prev;
            }
            return Some(path);
        }
        for (ox, oy) in NEIGHBORS {
            let (nx, ny) = (x + ox, y + oy);
            if !grid.in_bounds(nx, ny) || seen[idx(nx, ny)] {
                continue;
            }
            let kind = grid.kind(nx, ny);
            if !through_walls && matches!(kind, TileKind::Wall | TileKind::Void) {
                continue;
            }
            seen[idx(nx, ny)] = true;
            parent[idx(nx, ny)] = Some((x, y));
            queue.push_back((nx, ny));
        }
    }
    None
}

/// Carve horizontally then vertically from `from` to `to`
fn carve_l_path(grid: &mut TileGrid, from: (i32, i32), to: (i32, i32)) {
    let (mut x, y) = from;
    while x != to.0 {
        clear_obstacle(grid, x, y);
        x += (to.0 - x).signum();
    }
    let mut y = y;
    while y != to.1 {
        clear_obstacle(grid, x, y);
        y += (to.1 - y).signum();
    }
}

fn clear_obstacle(grid: &mut TileGrid, x: i32, y: i32) {
    if matches!(grid.kind(x, y), TileKind::Rock | TileKind::Hazard) {
        grid.set_kind(x, y, TileKind::Ground);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable(grid: &TileGrid, reach: &[bool], (x, y): (i32, i32)) -> bool {
        reach[y as usize * grid.width + x as usize]
    }

    #[test]
    fn test_surface_dimensions_and_pad() {
        let map = generate_surface(11, PlanetKind::Rocky, StructureKind::Outpost);
        assert_eq!((map.grid.width, map.grid.height), (SURFACE_WIDTH, SURFACE_HEIGHT));
        assert_eq!(map.grid.kind(map.pad.0, map.pad.1), TileKind::ShuttlePad);
        assert!(map.grid.is_walkable(map.spawn.0, map.spawn.1));
        assert!(crate::chebyshev(map.spawn, map.pad) <= 1);
        // Cleared 5x3 apron around the pad
        for y in map.pad.1 - 1..=map.pad.1 + 1 {
            for x in map.pad.0 - 2..=map.pad.0 + 2 {
                assert!(map.grid.is_walkable(x, y));
            }
        }
    }

    #[test]
    fn test_surface_objective_on_terminal_or_marker() {
        for poi in StructureKind::ALL {
            let map = generate_surface(21, PlanetKind::Ice, poi);
            let (x, y) = map.objective.expect("every template has interior floor");
            let eq = map.grid.equipment(x, y).expect("objective has equipment");
            if poi == StructureKind::Ruins {
                assert_eq!(eq.kind, EquipmentKind::ObjectiveMarker);
            } else {
                assert_eq!(eq.kind, EquipmentKind::Terminal);
            }
        }
    }

    #[test]
    fn test_hazard_density_bounds() {
        for seed in 0..10 {
            let map = generate_surface(seed, PlanetKind::Volcanic, StructureKind::Ruins);
            let total = (map.grid.width * map.grid.height) as f32;
            let hazards = map.grid.positions_of_kind(TileKind::Hazard).len() as f32;
            let rocks = map.grid.positions_of_kind(TileKind::Rock).len() as f32;
            // Stamping and pad clearing only ever remove scatter
            assert!(hazards / total < 0.12);
            assert!(rocks / total < 0.28);
            assert!(rocks > 0.0);
        }
    }

    #[test]
    fn test_surface_deterministic() {
        let a = generate_surface(5, PlanetKind::Rocky, StructureKind::MiningRig);
        let b = generate_surface(5, PlanetKind::Rocky, StructureKind::MiningRig);
        assert_eq!(a, b);
    }

    #[test]
    fn test_interior_rooms_connect_to_corridor() {
        let prologue = generate_prologue(3, PrologueLocation::DerelictStation);
        let grid = &prologue.map.grid;
        let doors = grid.positions_of_kind(TileKind::Door);
        assert!(doors.len() >= 3);
        assert_eq!(grid.kind(prologue.map.pad.0, prologue.map.pad.1), TileKind::ShuttlePad);
        let reach = flood_fill(grid, prologue.map.spawn);
        for door in doors {
            assert!(reachable(grid, &reach, door));
        }
        assert_eq!(prologue.carved, 0);
    }

    #[test]
    fn test_prologue_everything_reachable() {
        for location in PrologueLocation::ALL {
            for seed in [1u64, 12345, 99, 2024, 31337] {
                let prologue = generate_prologue(seed, location);
                let grid = &prologue.map.grid;
                let reach = flood_fill(grid, prologue.map.spawn);
                for door in grid.positions_of_kind(TileKind::Door) {
                    assert!(reachable(grid, &reach, door), "{location:?} {seed}: door {door:?}");
                }
                assert_eq!(prologue.parts.len(), SHUTTLE_PARTS.len());
                for &part in &prologue.parts {
                    assert!(reachable(grid, &reach, part));
                    let kind = grid.equipment(part.0, part.1).map(|e| e.kind);
                    assert!(kind.is_some_and(EquipmentKind::is_shuttle_part));
                }
                for &spot in &prologue.loot {
                    assert!(reachable(grid, &reach, spot), "{location:?} {seed}: crate {spot:?}");
                }
            }
        }
    }

    #[test]
    fn test_parts_keep_their_distance_from_pad() {
        let prologue = generate_prologue(77, PrologueLocation::CrashSite);
        let pad = prologue.map.pad;
        for (x, y) in prologue.parts {
            assert!((x - pad.0).abs() >= PART_MIN_DX || (y - pad.1).abs() >= PART_MIN_DY);
        }
    }

    #[test]
    fn test_reachability_pass_opens_buried_door() {
        let mut grid = TileGrid::new(12, 7, TileKind::Ground);
        // Sealed room whose only door faces a wall of rock
        for x in 6..=10 {
            grid.set_kind(x, 1, TileKind::Wall);
            grid.set_kind(x, 5, TileKind::Wall);
        }
        for y in 1..=5 {
            grid.set_kind(6, y, TileKind::Wall);
            grid.set_kind(10, y, TileKind::Wall);
        }
        grid.set_kind(6, 3, TileKind::Door);
        for y in 0..7 {
            grid.set_kind(4, y, TileKind::Rock);
            grid.set_kind(5, y, TileKind::Hazard);
        }
        let spawn = (1, 3);
        assert!(!reachable(&grid, &flood_fill(&grid, spawn), (6, 3)));

        let carves = ensure_doors_reachable(&mut grid, spawn);
        assert!(carves >= 1);
        assert!(reachable(&grid, &flood_fill(&grid, spawn), (6, 3)));
        // Walls are never carved
        assert_eq!(grid.positions_of_kind(TileKind::Wall).len(), 15);
    }

    #[test]
    fn test_prologue_deterministic() {
        for location in PrologueLocation::ALL {
            assert_eq!(generate_prologue(42, location), generate_prologue(42, location));
        }
    }
}
