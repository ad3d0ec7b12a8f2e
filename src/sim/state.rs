//! Simulation driver state
//!
//! `Sim` owns the whole world: sector, resources, the player's body and
//! skills, the ship deck, and whichever surface the player is standing on.
//! Cross-references are indices (system, object), never pointers.

use serde::{Deserialize, Serialize};

use super::discovery::DiscoveryLog;
use super::encounter::Encounter;
use super::log::MessageLog;
use super::matter::{Needs, Resources};
use super::refusal::Refusal;
use super::skills::Skills;
use crate::persistence::{Room, ShipLayout};
use crate::settings::Settings;
use crate::tile::{EquipmentKind, Tile, TileGrid};
use crate::world::rng::{self, PROLOGUE_SALT};
use crate::world::surface::{self, SHUTTLE_PARTS};
use crate::world::{PrologueLocation, PrologueSurface, Sector, SurfaceMap, SystemMap};

/// A planet surface the player has landed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub map: SurfaceMap,
    pub system_idx: usize,
    pub object_idx: usize,
    /// The surface objective has paid out
    pub objective_claimed: bool,
}

/// Where the player is standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    /// Stranded at the start, gathering shuttle parts
    Prologue(PrologueSurface),
    /// Aboard the shuttle
    Ship,
    /// Down on a planet
    Surface(Landing),
}

/// One-shot flags raised by `interact()`; the front end clears them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSignals {
    pub nav_activated: bool,
    pub pilot_activated: bool,
    pub dock_activated: bool,
    pub cargo_activated: bool,
    pub scan_activated: bool,
}

impl UiSignals {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.nav_activated
            || self.pilot_activated
            || self.dock_activated
            || self.cargo_activated
            || self.scan_activated
    }
}

/// The shuttle's deck, built from a layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipInterior {
    pub name: String,
    pub class: String,
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub spawn: (i32, i32),
}

impl ShipInterior {
    pub fn from_layout(layout: &ShipLayout) -> Self {
        Self {
            name: layout.name.clone(),
            class: layout.class.clone(),
            grid: layout.to_grid(),
            rooms: layout.rooms.clone(),
            spawn: layout.spawn(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sim {
    /// Ticks simulated so far
    pub tick_count: u64,
    pub master_seed: u64,
    pub sector: Sector,
    pub resources: Resources,
    pub needs: Needs,
    pub skills: Skills,
    pub discovery: DiscoveryLog,
    pub log: MessageLog,
    pub ship: ShipInterior,
    /// Player tile on the current grid
    pub player: (i32, i32),
    pub location: Location,
    /// Held shuttle thrust
    pub thrust: (i32, i32),
    pub docked: bool,
    pub signals: UiSignals,
    pub encounter: Option<Encounter>,
    /// Shuttle parts recovered during the prologue
    pub parts_collected: Vec<EquipmentKind>,
}

impl Sim {
    /// New game stranded at the seed's prologue location
    pub fn new(seed: u64, layout: &ShipLayout) -> Self {
        Self::with_prologue(seed, layout, PrologueLocation::for_seed(seed))
    }

    /// New game stranded at a chosen prologue location
    pub fn with_prologue(seed: u64, layout: &ShipLayout, location: PrologueLocation) -> Self {
        let prologue_seed = rng::derive_indexed(seed, PROLOGUE_SALT, location as usize, 0);
        let prologue = surface::generate_prologue(prologue_seed, location);
        let spawn = prologue.map.spawn;
        let mut sim = Self::base(seed, layout, Location::Prologue(prologue), spawn);
        sim.log.info(format!(
            "You come to in the {}. Your shuttle is grounded.",
            location.name()
        ));
        sim.log.info("Find the fuel cell, spare parts and power pack, then return to the pad.");
        log::info!("New game (seed {seed}) at {}", location.name());
        sim
    }

    /// New game starting aboard the shuttle, straight out of cryo
    pub fn aboard(seed: u64, layout: &ShipLayout) -> Self {
        let ship = ShipInterior::from_layout(layout);
        let spawn = ship.spawn;
        let mut sim = Self::base(seed, layout, Location::Ship, spawn);
        sim.log.info("Cryo cycle complete. Life support online.");
        log::info!("New game (seed {seed}) aboard {}", sim.ship.name);
        sim
    }

    pub fn from_settings(settings: &Settings, layout: &ShipLayout) -> Self {
        let seed = settings.resolve_seed();
        let mut sim = if settings.skip_prologue {
            Self::aboard(seed, layout)
        } else if let Some(location) = settings.prologue_location {
            Self::with_prologue(seed, layout, location)
        } else {
            Self::new(seed, layout)
        };
        let capacity = settings.message_log_capacity;
        let mut log = MessageLog::new(capacity);
        for entry in sim.log.entries() {
            log.push(&entry.text, entry.priority);
        }
        sim.log = log;
        sim
    }

    fn base(seed: u64, layout: &ShipLayout, location: Location, player: (i32, i32)) -> Self {
        let ship = ShipInterior::from_layout(layout);
        let pads = ship.grid.count_equipment(EquipmentKind::CargoTile);
        let sector = Sector::generate(seed);
        let mut discovery = DiscoveryLog::new();
        discovery.visit_system(sector.current_system);
        discovery.see_star_type(sector.current().star_type);

        Self {
            tick_count: 0,
            master_seed: seed,
            sector,
            resources: Resources::new(pads),
            needs: Needs::default(),
            skills: Skills::new(),
            discovery,
            log: MessageLog::default(),
            ship,
            player,
            location,
            thrust: (0, 0),
            docked: false,
            signals: UiSignals::default(),
            encounter: None,
            parts_collected: Vec::new(),
        }
    }

    /// The grid the player is walking on
    pub fn grid(&self) -> &TileGrid {
        match &self.location {
            Location::Prologue(prologue) => &prologue.map.grid,
            Location::Ship => &self.ship.grid,
            Location::Surface(landing) => &landing.map.grid,
        }
    }

    pub fn grid_mut(&mut self) -> &mut TileGrid {
        match &mut self.location {
            Location::Prologue(prologue) => &mut prologue.map.grid,
            Location::Ship => &mut self.ship.grid,
            Location::Surface(landing) => &mut landing.map.grid,
        }
    }

    pub fn is_aboard(&self) -> bool {
        matches!(self.location, Location::Ship)
    }

    pub fn location_name(&self) -> String {
        match &self.location {
            Location::Prologue(prologue) => prologue.location.name().to_string(),
            Location::Ship => self.ship.name.clone(),
            Location::Surface(landing) => self
                .current_map()
                .and_then(|m| m.object(landing.object_idx))
                .map_or_else(|| "Unknown world".to_string(), |o| o.name.clone()),
        }
    }

    /// Tile under the player
    pub fn standing_on(&self) -> Tile {
        self.grid().get(self.player.0, self.player.1)
    }

    pub fn current_map(&self) -> Option<&SystemMap> {
        self.sector.current_map()
    }

    /// Shuttle tile in the current system
    pub fn shuttle_tile(&self) -> Option<(i32, i32)> {
        self.current_map().map(|m| m.shuttle.tile())
    }

    /// Shuttle parts still to find
    pub fn parts_missing(&self) -> usize {
        SHUTTLE_PARTS
            .iter()
            .filter(|p| !self.parts_collected.contains(p))
            .count()
    }

    /// Record a refused operation; always false so callers can `return`
    pub(crate) fn refuse(&mut self, refusal: Refusal) -> bool {
        log::debug!("Refused: {refusal}");
        self.log.warn(refusal.to_string());
        false
    }
}
