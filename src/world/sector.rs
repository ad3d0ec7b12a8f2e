//! Sector generation and navigation
//!
//! A sector is 12-15 star systems laid out on a small plane. System 0 sits at
//! the center and is where the game starts; the rest are rejection-sampled so
//! no two systems are closer than 4 units.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::rng::{self, SECTOR_SALT, SYSTEM_SALT};
use super::system::SystemMap;
use crate::consts::{SECTOR_MAX_X, SECTOR_MAX_Y, SECTOR_MIN_X, SECTOR_MIN_Y};

/// Minimum squared distance between two systems
pub const MIN_SYSTEM_SPACING_SQ: i32 = 16;
/// Rejection-sampling attempts per system
pub const PLACEMENT_ATTEMPTS: u32 = 100;
/// Cheapest possible jump
pub const MIN_JUMP_COST: i32 = 5;

const SYSTEM_NAMES: [&str; 24] = [
    "Kepler", "Vesta", "Orpheus", "Cygni", "Talos", "Meridian", "Halcyon", "Nadir", "Thule",
    "Zephyr", "Corvus", "Ardent", "Lyra", "Solace", "Pyxis", "Erebus", "Caelum", "Volans",
    "Ishtar", "Octant", "Tarsis", "Nereid", "Aurelia", "Sable",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarType {
    Yellow,
    Red,
    Blue,
    White,
    Orange,
}

impl StarType {
    pub const ALL: [StarType; 5] = [
        StarType::Yellow,
        StarType::Red,
        StarType::Blue,
        StarType::White,
        StarType::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StarType::Yellow => "yellow dwarf",
            StarType::Red => "red dwarf",
            StarType::Blue => "blue giant",
            StarType::White => "white dwarf",
            StarType::Orange => "orange star",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub star_type: StarType,
    pub visited: bool,
    /// Generated on first visit
    pub map: Option<SystemMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub seed: u64,
    pub systems: Vec<StarSystem>,
    pub current_system: usize,
    pub cursor_system: usize,
}

impl Sector {
    /// Generate a sector from the master seed. The starting system's map is
    /// generated immediately.
    pub fn generate(seed: u64) -> Self {
        let mut rng = rng::stream(rng::derive(seed, SECTOR_SALT));
        let count = rng.random_range(12..=15usize);

        let mut names = SYSTEM_NAMES.to_vec();
        names.shuffle(&mut rng);

        let center = (
            (SECTOR_MIN_X + SECTOR_MAX_X) / 2,
            (SECTOR_MIN_Y + SECTOR_MAX_Y) / 2,
        );
        let mut systems: Vec<StarSystem> = Vec::with_capacity(count);
        systems.push(StarSystem {
            name: names[0].to_string(),
            x: center.0,
            y: center.1,
            star_type: StarType::Yellow,
            visited: true,
            map: None,
        });

        let mut near_misses = 0;
        for i in 1..count {
            let mut pos = (0, 0);
            let mut placed = false;
            for _ in 0..PLACEMENT_ATTEMPTS {
                pos = (
                    rng.random_range(SECTOR_MIN_X..=SECTOR_MAX_X),
                    rng.random_range(SECTOR_MIN_Y..=SECTOR_MAX_Y),
                );
                if systems
                    .iter()
                    .all(|s| dist_sq((s.x, s.y), pos) >= MIN_SYSTEM_SPACING_SQ)
                {
                    placed = true;
                    break;
                }
            }
            if !placed {
                near_misses += 1;
            }
            let star_type = StarType::ALL[rng.random_range(0..StarType::ALL.len())];
            systems.push(StarSystem {
                name: names[i % names.len()].to_string(),
                x: pos.0,
                y: pos.1,
                star_type,
                visited: false,
                map: None,
            });
        }
        log::debug!(
            "Sector {seed}: {} systems ({near_misses} placement near-misses)",
            systems.len()
        );

        let mut sector = Self {
            seed,
            systems,
            current_system: 0,
            cursor_system: 0,
        };
        sector.ensure_map(0);
        sector
    }

    pub fn current(&self) -> &StarSystem {
        &self.systems[self.current_system]
    }

    pub fn current_map(&self) -> Option<&SystemMap> {
        self.systems[self.current_system].map.as_ref()
    }

    pub fn current_map_mut(&mut self) -> Option<&mut SystemMap> {
        self.systems[self.current_system].map.as_mut()
    }

    /// Generate a system's map if it does not exist yet
    pub fn ensure_map(&mut self, idx: usize) -> Option<&mut SystemMap> {
        let seed = rng::derive_indexed(self.seed, SYSTEM_SALT, idx, 0);
        let system = self.systems.get_mut(idx)?;
        if system.map.is_none() {
            system.map = Some(SystemMap::generate(&system.name, system.star_type, seed));
        }
        system.map.as_mut()
    }

    pub fn distance(&self, a: usize, b: usize) -> f32 {
        let (sa, sb) = (&self.systems[a], &self.systems[b]);
        (dist_sq((sa.x, sa.y), (sb.x, sb.y)) as f32).sqrt()
    }

    /// Energy needed to jump from the current system to `target`
    pub fn energy_cost_to(&self, target: usize) -> i32 {
        let cost = (1.5 * self.distance(self.current_system, target)).floor() as i32;
        cost.max(MIN_JUMP_COST)
    }

    /// Nearest system (to the cursor) lying strictly in the requested
    /// direction. A zero component leaves that axis unconstrained.
    pub fn nearest_in_direction(&self, dx: i32, dy: i32) -> Option<usize> {
        let cursor = &self.systems[self.cursor_system];
        let matches = |offset: i32, want: i32| match want.signum() {
            1 => offset > 0,
            -1 => offset < 0,
            _ => true,
        };
        self.systems
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != self.cursor_system)
            .filter(|(_, s)| matches(s.x - cursor.x, dx) && matches(s.y - cursor.y, dy))
            .min_by_key(|(_, s)| dist_sq((s.x, s.y), (cursor.x, cursor.y)))
            .map(|(i, _)| i)
    }

    /// Move the navigation cursor; returns false if nothing lies that way
    pub fn move_cursor(&mut self, dx: i32, dy: i32) -> bool {
        if dx == 0 && dy == 0 {
            return false;
        }
        match self.nearest_in_direction(dx, dy) {
            Some(idx) => {
                self.cursor_system = idx;
                true
            }
            None => false,
        }
    }
}

fn dist_sq(a: (i32, i32), b: (i32, i32)) -> i32 {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_shape() {
        let sector = Sector::generate(42);
        assert!((12..=15).contains(&sector.systems.len()));
        let home = &sector.systems[0];
        assert_eq!(home.star_type, StarType::Yellow);
        assert!(home.visited);
        assert!(home.map.is_some());
        assert_eq!(
            (home.x, home.y),
            ((SECTOR_MIN_X + SECTOR_MAX_X) / 2, (SECTOR_MIN_Y + SECTOR_MAX_Y) / 2)
        );
        assert!(sector.systems[1..].iter().all(|s| !s.visited && s.map.is_none()));
    }

    #[test]
    fn test_sector_is_deterministic() {
        let a = Sector::generate(777);
        let b = Sector::generate(777);
        assert_eq!(a, b);
        let c = Sector::generate(778);
        assert_ne!(a.systems, c.systems);
    }

    #[test]
    fn test_names_are_unique_without_wrap() {
        let sector = Sector::generate(5);
        let mut names: Vec<&str> = sector.systems.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), sector.systems.len());
    }

    #[test]
    fn test_energy_cost_formula() {
        let sector = Sector::generate(42);
        for k in 1..sector.systems.len() {
            let expected = ((1.5 * sector.distance(0, k)).floor() as i32).max(5);
            assert_eq!(sector.energy_cost_to(k), expected);
            assert!(sector.energy_cost_to(k) >= MIN_JUMP_COST);
        }
    }

    fn charted(positions: &[(i32, i32)]) -> Sector {
        let systems = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| StarSystem {
                name: format!("S{i}"),
                x,
                y,
                star_type: StarType::Red,
                visited: i == 0,
                map: None,
            })
            .collect();
        Sector {
            seed: 1,
            systems,
            current_system: 0,
            cursor_system: 0,
        }
    }

    #[test]
    fn test_nearest_in_direction() {
        let mut sector = charted(&[(20, 10), (25, 10), (30, 10), (24, 6), (22, 4), (17, 14)]);
        // Straight east takes any row; the closest wins
        assert_eq!(sector.nearest_in_direction(1, 0), Some(1));
        assert_eq!(sector.nearest_in_direction(1, -1), Some(3));
        assert_eq!(sector.nearest_in_direction(0, 1), Some(5));
        assert_eq!(sector.nearest_in_direction(-1, -1), None);

        assert!(!sector.move_cursor(-1, -1));
        assert_eq!(sector.cursor_system, 0);
        assert!(!sector.move_cursor(0, 0));

        assert!(sector.move_cursor(1, -1));
        assert_eq!(sector.cursor_system, 3);
        // Searches start from the cursor, not the current system
        assert_eq!(sector.nearest_in_direction(-1, 0), Some(4));
        assert_eq!(sector.current_system, 0);
    }
}
