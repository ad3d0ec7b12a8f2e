//! Star system maps
//!
//! One 320x160 plane per system, generated lazily on first visit: the star at
//! the center, 2-5 planets on a squashed ellipse, maybe a station, a few NPC
//! ships, maybe a derelict and some asteroids. Object order is stable, with
//! the star at index 0 followed by the planets.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng;
use super::sector::StarType;
use super::station::StationData;
use crate::consts::{SYSTEM_HEIGHT, SYSTEM_WIDTH};
use crate::sim::physics::ShipPhysics;

const ROMAN: [&str; 5] = ["I", "II", "III", "IV", "V"];

const SHIP_CALLSIGNS: [&str; 12] = [
    "Kestrel", "Magpie", "Long Haul", "Drifter", "Vigil", "Ironside", "Mercy", "Jackal",
    "Red Tide", "Cutlass", "Osprey", "Lantern",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetKind {
    Rocky,
    Ice,
    Gas,
    Volcanic,
}

impl PlanetKind {
    pub const ALL: [PlanetKind; 4] = [
        PlanetKind::Rocky,
        PlanetKind::Ice,
        PlanetKind::Gas,
        PlanetKind::Volcanic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlanetKind::Rocky => "rocky",
            PlanetKind::Ice => "ice",
            PlanetKind::Gas => "gas giant",
            PlanetKind::Volcanic => "volcanic",
        }
    }

    /// Gas giants have no surface to land on
    pub fn is_landable(self) -> bool {
        self != PlanetKind::Gas
    }
}

/// NPC ship behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiKind {
    Trader,
    Patrol,
    Pirate,
}

impl AiKind {
    pub const ALL: [AiKind; 3] = [AiKind::Trader, AiKind::Patrol, AiKind::Pirate];

    /// Ticks between single-tile moves
    pub fn move_rate(self) -> i32 {
        match self {
            AiKind::Trader => 24,
            AiKind::Patrol => 14,
            AiKind::Pirate => 7,
        }
    }

    /// Base ticks between direction changes (jitter is added on top)
    pub fn dir_interval(self) -> i32 {
        match self {
            AiKind::Trader => 300,
            AiKind::Patrol => 200,
            AiKind::Pirate => 90,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AiKind::Trader => "Trader",
            AiKind::Patrol => "Patrol",
            AiKind::Pirate => "Pirate",
        }
    }
}

/// Upper bound (exclusive) of the random direction-timer jitter
pub const DIR_JITTER: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Star,
    Planet,
    Station,
    Derelict,
    Asteroid,
    Ship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceObject {
    pub kind: ObjectKind,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub planet_kind: Option<PlanetKind>,
    pub ai: Option<AiKind>,
    pub dx: i32,
    pub dy: i32,
    pub move_rate: i32,
    pub move_timer: i32,
    pub dir_timer: i32,
}

impl SpaceObject {
    fn fixed(kind: ObjectKind, name: String, x: i32, y: i32) -> Self {
        Self {
            kind,
            name,
            x,
            y,
            planet_kind: None,
            ai: None,
            dx: 0,
            dy: 0,
            move_rate: 0,
            move_timer: 0,
            dir_timer: 0,
        }
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn is_ship(&self) -> bool {
        self.kind == ObjectKind::Ship
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMap {
    pub width: i32,
    pub height: i32,
    pub objects: Vec<SpaceObject>,
    pub shuttle: ShipPhysics,
    /// Generated on first dock
    pub station: Option<StationData>,
    pub seed: u64,
}

impl SystemMap {
    pub fn generate(star_name: &str, star_type: StarType, seed: u64) -> Self {
        let (width, height) = (SYSTEM_WIDTH, SYSTEM_HEIGHT);
        let (cx, cy) = (width / 2, height / 2);
        let mut rng = rng::stream(seed);
        let mut objects = vec![SpaceObject::fixed(
            ObjectKind::Star,
            format!("{star_name} ({})", star_type.name()),
            cx,
            cy,
        )];

        let planet_count = rng.random_range(2..=5usize);
        for i in 0..planet_count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let radius = rng.random_range(25.0f32..115.0);
            let x = (cx as f32 + angle.cos() * radius).round() as i32;
            let y = (cy as f32 + angle.sin() * radius * 0.6).round() as i32;
            let kind = PlanetKind::ALL[rng.random_range(0..PlanetKind::ALL.len())];
            let mut planet = SpaceObject::fixed(
                ObjectKind::Planet,
                format!("{star_name} {}", ROMAN[i % ROMAN.len()]),
                x.clamp(2, width - 3),
                y.clamp(2, height - 3),
            );
            planet.planet_kind = Some(kind);
            objects.push(planet);
        }

        if rng.random_bool(0.5) && planet_count > 0 {
            let host = &objects[1 + rng.random_range(0..planet_count)];
            let (x, y) = ((host.x + 3).clamp(2, width - 3), host.y);
            objects.push(SpaceObject::fixed(
                ObjectKind::Station,
                format!("{star_name} Station"),
                x,
                y,
            ));
        }

        let ship_count = rng.random_range(0..=2);
        for _ in 0..ship_count {
            objects.push(spawn_ship(&mut rng, width, height));
        }

        if rng.random_bool(1.0 / 3.0) {
            let x = rng.random_range(2..width - 2);
            let y = rng.random_range(2..height - 2);
            objects.push(SpaceObject::fixed(
                ObjectKind::Derelict,
                "Derelict hulk".to_string(),
                x,
                y,
            ));
        }

        for _ in 0..rng.random_range(0..=3) {
            let x = rng.random_range(2..width - 2);
            let y = rng.random_range(2..height - 2);
            objects.push(SpaceObject::fixed(
                ObjectKind::Asteroid,
                "Asteroid".to_string(),
                x,
                y,
            ));
        }

        log::debug!(
            "System {star_name}: {planet_count} planets, {ship_count} ships, {} objects",
            objects.len()
        );

        Self {
            width,
            height,
            objects,
            shuttle: ShipPhysics::new((cx - 40) as f32, cy as f32),
            station: None,
            seed,
        }
    }

    pub fn object(&self, idx: usize) -> Option<&SpaceObject> {
        self.objects.get(idx)
    }

    pub fn station_index(&self) -> Option<usize> {
        self.objects.iter().position(|o| o.kind == ObjectKind::Station)
    }

    pub fn has_pirates(&self) -> bool {
        self.objects.iter().any(|o| o.ai == Some(AiKind::Pirate))
    }

    pub fn planets(&self) -> impl Iterator<Item = (usize, &SpaceObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.kind == ObjectKind::Planet)
    }
}

/// Random non-zero step direction; (0, 0) becomes (1, 0)
pub fn random_direction(rng: &mut Pcg32) -> (i32, i32) {
    let dx = rng.random_range(-1..=1);
    let dy = rng.random_range(-1..=1);
    if dx == 0 && dy == 0 { (1, 0) } else { (dx, dy) }
}

fn spawn_ship(rng: &mut Pcg32, width: i32, height: i32) -> SpaceObject {
    let ai = AiKind::ALL[rng.random_range(0..AiKind::ALL.len())];
    let callsign = SHIP_CALLSIGNS[rng.random_range(0..SHIP_CALLSIGNS.len())];
    let x = rng.random_range(2..width - 2);
    let y = rng.random_range(2..height - 2);
    let (dx, dy) = random_direction(rng);
    SpaceObject {
        kind: ObjectKind::Ship,
        name: format!("{} {callsign}", ai.name()),
        x,
        y,
        planet_kind: None,
        ai: Some(ai),
        dx,
        dy,
        move_rate: ai.move_rate(),
        move_timer: ai.move_rate(),
        dir_timer: ai.dir_interval() + rng.random_range(0..DIR_JITTER),
    }
}
