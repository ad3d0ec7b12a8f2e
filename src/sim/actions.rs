//! Player operations
//!
//! Every operation either succeeds and returns `true`, or is refused: the
//! world is left untouched, a Warning goes to the message log, and the
//! operation returns `false`.

use rand::Rng;

use super::discovery::{poi_pool, survey_planet};
use super::encounter::{Encounter, Outcome, Parties};
use super::log::Priority;
use super::matter::{CargoKind, MatterType, relieve};
use super::refusal::Refusal;
use super::skills::Skill;
use super::state::{Landing, Location, Sim};
use crate::consts::{HAIL_RANGE, INTERACT_RANGE};
use crate::platform::Command;
use crate::tile::{Equipment, EquipmentKind, PowerMode, TileKind, WEAR_PER_USE};
use crate::world::rng::{self, LOOT_SALT, SURFACE_SALT};
use crate::world::station::StationData;
use crate::world::surface::{SHUTTLE_PARTS, generate_surface};
use crate::world::{ObjectKind, StructureKind};
use crate::chebyshev;

// Life-support station portions
pub const MEAL_SIZE: i32 = 5;
pub const MEAL_RELIEF: i32 = 35;
pub const DRINK_SIZE: i32 = 3;
pub const DRINK_RELIEF: i32 = 25;
pub const SHOWER_WATER: i32 = 3;
pub const SHOWER_RELIEF: i32 = 40;
/// Dirty organics burned per incinerator cycle
pub const INCINERATOR_BATCH: i32 = 5;
/// Credits per hull point
pub const HULL_REPAIR_COST: i64 = 3;

// Discovery rewards
pub const VISIT_CREDITS: i64 = 10;
pub const VISIT_XP: u32 = 8;
pub const STAR_TYPE_CREDITS: i64 = 25;
pub const STAR_TYPE_XP: u32 = 15;
pub const SCAN_CREDITS: i64 = 15;
pub const SCAN_XP: u32 = 8;
pub const RESCAN_XP: u32 = 1;
pub const DOCK_CREDITS: i64 = 10;
pub const DOCK_XP: u32 = 3;
pub const OBJECTIVE_CREDITS: i64 = 20;
pub const OBJECTIVE_XP: u32 = 5;

impl Sim {
    /// Dispatch one input command
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Move(dx, dy) => self.try_move_player(dx, dy),
            Command::Interact => self.interact(),
            Command::ToggleEquipment => self.toggle_equipment(),
            Command::NavigateTo(idx) => self.navigate_to(idx),
            Command::ScanPlanet(idx) => self.scan_planet(idx),
            Command::Dock => self.dock(),
            Command::ResolveEncounter(choice) => self.resolve_encounter(choice).is_some(),
            Command::BuyCargo(kind) => self.buy_cargo(kind),
            Command::SellCargo(pad) => self.sell_cargo(pad),
            Command::JettisonCargo(pad) => self.jettison_cargo(pad),
            Command::RepairHull(amount) => self.repair_hull(amount),
            Command::Thrust(dx, dy) => self.set_thrust(dx, dy),
            Command::Land(idx) => self.land(idx),
            Command::Ascend => self.ascend(),
            Command::Launch => self.launch(),
            Command::Hail(idx) => self.hail(idx),
            Command::MoveCursor(dx, dy) => self.sector.move_cursor(dx, dy),
        }
    }

    /// Step one tile on the current grid if the target is walkable
    pub fn try_move_player(&mut self, dx: i32, dy: i32) -> bool {
        let (dx, dy) = (dx.signum(), dy.signum());
        if dx == 0 && dy == 0 {
            return false;
        }
        let (nx, ny) = (self.player.0 + dx, self.player.1 + dy);
        if !self.grid().is_walkable(nx, ny) {
            return false;
        }
        self.player = (nx, ny);
        true
    }

    /// Use whatever is on the player's tile
    pub fn interact(&mut self) -> bool {
        let (x, y) = self.player;
        let tile = self.standing_on();
        if tile.kind == TileKind::ShuttlePad {
            return match self.location {
                Location::Prologue(_) => self.launch(),
                Location::Surface(_) => self.ascend(),
                Location::Ship => self.refuse(Refusal::NothingHere),
            };
        }
        let Some(eq) = tile.equipment else {
            return self.refuse(Refusal::NothingHere);
        };

        use EquipmentKind::*;
        let result = match eq.kind {
            FoodStation => self.eat(),
            DrinkStation => self.drink(),
            Toilet => self.resources.flush_waste().map(|()| {
                self.log.info("You use the toilet. Waste flushed to the recycler tanks.");
            }),
            Shower => self.shower(),
            Engine | Generator | MatterRecycler => {
                self.flip(x, y);
                Ok(())
            }
            NavConsole | PilotConsole | ScienceConsole | CargoConsole | CargoTransporter => {
                self.use_console(eq)
            }
            Incinerator => self.burn_waste(eq),
            FuelCell | SpareParts | PowerPack => {
                self.collect_part(x, y, eq.kind);
                Ok(())
            }
            LootCrate => {
                self.open_crate(x, y);
                Ok(())
            }
            Terminal | ObjectiveMarker => {
                self.read_objective(x, y, eq);
                Ok(())
            }
            WaterTank | OrganicTank | PowerCell => {
                self.read_gauge(eq.kind);
                Ok(())
            }
            Bed => {
                self.log.info("You rest for a moment.");
                Ok(())
            }
            _ => Err(Refusal::NothingHere),
        };
        match result {
            Ok(()) => {
                if eq.kind.wears_on_use() {
                    if let Some(unit) = self.grid_mut().equipment_mut(x, y) {
                        unit.degrade(WEAR_PER_USE);
                    }
                }
                true
            }
            Err(refusal) => self.refuse(refusal),
        }
    }

    /// Flip the toggleable equipment on the player's tile
    pub fn toggle_equipment(&mut self) -> bool {
        let (x, y) = self.player;
        match self.grid().equipment(x, y) {
            Some(eq) if eq.kind.is_toggleable() => {
                self.flip(x, y);
                true
            }
            Some(_) => self.refuse(Refusal::InvalidTarget),
            None => self.refuse(Refusal::NothingHere),
        }
    }

    fn flip(&mut self, x: i32, y: i32) {
        let Some(eq) = self.grid_mut().equipment_mut(x, y) else {
            return;
        };
        eq.on = !eq.on;
        let (name, on) = (eq.kind.name(), eq.on);
        self.log
            .info(format!("{name} {}.", if on { "powered up" } else { "shut down" }));
    }

    fn eat(&mut self) -> Result<(), Refusal> {
        self.resources.ingest(MatterType::Organic, MEAL_SIZE)?;
        relieve(&mut self.needs.hunger, MEAL_RELIEF);
        self.log.info("You eat a ration.");
        Ok(())
    }

    fn drink(&mut self) -> Result<(), Refusal> {
        self.resources.ingest(MatterType::Water, DRINK_SIZE)?;
        relieve(&mut self.needs.thirst, DRINK_RELIEF);
        self.log.info("You drink some water.");
        Ok(())
    }

    fn shower(&mut self) -> Result<(), Refusal> {
        self.resources.wash(SHOWER_WATER)?;
        relieve(&mut self.needs.hygiene, SHOWER_RELIEF);
        self.log.info("You take a quick shower.");
        Ok(())
    }

    fn use_console(&mut self, eq: Equipment) -> Result<(), Refusal> {
        if !eq.on {
            return Err(Refusal::Offline(eq.kind.name()));
        }
        if eq.power_mode == PowerMode::OnUse {
            self.resources.spend_energy(eq.power_cost)?;
        }
        let signals = &mut self.signals;
        match eq.kind {
            EquipmentKind::NavConsole => signals.nav_activated = true,
            EquipmentKind::PilotConsole => signals.pilot_activated = true,
            EquipmentKind::ScienceConsole => signals.scan_activated = true,
            EquipmentKind::CargoConsole => signals.cargo_activated = true,
            _ => signals.dock_activated = true,
        }
        self.log.info(format!("{} active.", eq.kind.name()));
        Ok(())
    }

    fn burn_waste(&mut self, eq: Equipment) -> Result<(), Refusal> {
        if !eq.on {
            return Err(Refusal::Offline(eq.kind.name()));
        }
        if self.resources.energy < eq.power_cost {
            return Err(Refusal::InsufficientEnergy {
                needed: eq.power_cost,
                have: self.resources.energy,
            });
        }
        let burned = self.resources.incinerate(INCINERATOR_BATCH)?;
        self.resources.spend_energy(eq.power_cost)?;
        self.log
            .info(format!("Incinerated {burned} units of organic waste."));
        Ok(())
    }

    fn collect_part(&mut self, x: i32, y: i32, kind: EquipmentKind) {
        self.grid_mut().take_equipment(x, y);
        if !self.parts_collected.contains(&kind) {
            self.parts_collected.push(kind);
        }
        let found = SHUTTLE_PARTS.len() - self.parts_missing();
        self.log.push(
            format!("Recovered the {} ({found}/{}).", kind.name().to_lowercase(), SHUTTLE_PARTS.len()),
            Priority::Discovery,
        );
        if self.parts_missing() == 0 {
            self.log.info("The shuttle can fly again. Return to the pad.");
        }
    }

    /// Seed for a one-off roll tied to a tile of the current map
    fn tile_seed(&self, salt: u64, x: i32, y: i32) -> u64 {
        let map_seed = match &self.location {
            Location::Prologue(prologue) => prologue.map.seed,
            Location::Surface(landing) => landing.map.seed,
            Location::Ship => 0,
        };
        rng::derive_indexed(self.master_seed ^ map_seed, salt, x as usize, y as usize)
    }

    fn open_crate(&mut self, x: i32, y: i32) {
        self.grid_mut().take_equipment(x, y);
        let mut rng = rng::stream(self.tile_seed(LOOT_SALT, x, y));
        if rng.random_bool(0.6) {
            let credits = rng.random_range(10..=40);
            self.resources.credits += credits;
            self.log.info(format!("The crate holds {credits} credits."));
            return;
        }
        let kind = CargoKind::ALL[rng.random_range(0..CargoKind::ALL.len())];
        match self.resources.stow_cargo(kind) {
            Ok(_) => self
                .log
                .info(format!("The crate holds {}. Stowed in the cargo bay.", kind.name())),
            Err(_) => {
                // No room aboard; strip it for scrap value instead
                self.resources.credits += kind.base_price() / 2;
                self.log.info(format!(
                    "No room for the {}. Salvaged {} credits.",
                    kind.name(),
                    kind.base_price() / 2
                ));
            }
        }
    }

    fn read_objective(&mut self, x: i32, y: i32, eq: Equipment) {
        let claimed = match &mut self.location {
            Location::Surface(landing)
                if landing.map.objective == Some((x, y)) && !landing.objective_claimed =>
            {
                landing.objective_claimed = true;
                true
            }
            _ => false,
        };
        if !claimed {
            self.log.info(format!("The {} has nothing more to offer.", eq.kind.name().to_lowercase()));
            return;
        }

        match eq.kind {
            EquipmentKind::Terminal => {
                if let Some(terminal) = self.grid_mut().equipment_mut(x, y) {
                    terminal.on = false;
                }
            }
            _ => {
                self.grid_mut().take_equipment(x, y);
            }
        }
        self.resources.credits += OBJECTIVE_CREDITS;
        self.log.push(
            format!("Recovered survey data. +{OBJECTIVE_CREDITS} credits."),
            Priority::Discovery,
        );
        self.skills.award(Skill::Science, OBJECTIVE_XP, &mut self.log);
    }

    fn read_gauge(&mut self, kind: EquipmentKind) {
        let res = &self.resources;
        let text = match kind {
            EquipmentKind::WaterTank => format!(
                "Water: {} clean, {} dirty, {} buffered.",
                res.water.clean, res.water.dirty, res.recycler.water_buffer
            ),
            EquipmentKind::OrganicTank => format!(
                "Organics: {} clean, {} dirty, {} buffered.",
                res.organic.clean, res.organic.dirty, res.recycler.organic_buffer
            ),
            _ => format!(
                "Power: {}/{} ({} reserved).",
                res.energy,
                res.max_energy,
                self.ship.grid.reserved_power()
            ),
        };
        self.log.info(text);
    }

    /// Jump to another system
    pub fn navigate_to(&mut self, target: usize) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        if target >= self.sector.systems.len() {
            return self.refuse(Refusal::InvalidTarget);
        }
        if target == self.sector.current_system {
            return self.refuse(Refusal::AlreadyThere);
        }
        let cost = self.sector.energy_cost_to(target);
        if let Err(refusal) = self.resources.spend_energy(cost) {
            return self.refuse(refusal);
        }

        self.sector.current_system = target;
        self.sector.cursor_system = target;
        self.sector.systems[target].visited = true;
        self.sector.ensure_map(target);
        self.docked = false;
        self.thrust = (0, 0);
        self.encounter = None;

        let system = &self.sector.systems[target];
        let (name, star) = (system.name.clone(), system.star_type);
        log::info!("Jumped to system {target} ({name}) for {cost} energy");
        self.log.info(format!("Jump complete. Arrived at {name} ({cost} energy)."));

        if self.discovery.visit_system(target) {
            self.resources.credits += VISIT_CREDITS;
            self.log.push(
                format!("First visit to {name}! +{VISIT_CREDITS} credits."),
                Priority::Discovery,
            );
            self.skills.award(Skill::Piloting, VISIT_XP, &mut self.log);
        }
        if self.discovery.see_star_type(star) {
            self.resources.credits += STAR_TYPE_CREDITS;
            self.log.push(
                format!("New star type catalogued: {}! +{STAR_TYPE_CREDITS} credits.", star.name()),
                Priority::Discovery,
            );
            self.skills.award(Skill::Science, STAR_TYPE_XP, &mut self.log);
        }
        true
    }

    /// Scan a planet in the current system
    pub fn scan_planet(&mut self, object_idx: usize) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        let system_idx = self.sector.current_system;
        let planet = self
            .current_map()
            .and_then(|m| m.object(object_idx))
            .filter(|o| o.kind == ObjectKind::Planet)
            .and_then(|o| Some((o.name.clone(), o.planet_kind?)));
        let Some((name, kind)) = planet else {
            return self.refuse(Refusal::InvalidTarget);
        };

        if self.discovery.is_scanned((system_idx, object_idx)) {
            self.log.info(format!("{name} already surveyed. Refining readings."));
            self.skills.award(Skill::Science, RESCAN_XP, &mut self.log);
            return true;
        }

        let data = survey_planet(self.master_seed, system_idx, object_idx, &name, kind);
        self.log.push(format!("Scan of {name}: {} world.", kind.name()), Priority::Discovery);
        self.log.info(format!("Hazard: {}. Resource: {}.", data.hazard, data.resource));
        if let Some(poi) = data.poi {
            self.log.push(format!("Signal detected: {}.", poi.keyword()), Priority::Discovery);
        }
        self.discovery.record_scan(data);
        self.resources.credits += SCAN_CREDITS;
        self.skills.award(Skill::Science, SCAN_XP, &mut self.log);
        true
    }

    /// Dock at the current system's station
    pub fn dock(&mut self) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        if self.docked {
            return self.refuse(Refusal::AlreadyThere);
        }
        let (system_idx, master) = (self.sector.current_system, self.master_seed);
        let Some(map) = self.sector.current_map_mut() else {
            return self.refuse(Refusal::NoStation);
        };
        let Some(station_idx) = map.station_index() else {
            return self.refuse(Refusal::NoStation);
        };
        let station = &map.objects[station_idx];
        if chebyshev(map.shuttle.tile(), station.pos()) > INTERACT_RANGE {
            return self.refuse(Refusal::OutOfRange);
        }
        let name = station.name.clone();
        map.shuttle.halt();
        if map.station.is_none() {
            map.station = Some(StationData::generate(&name, master, system_idx));
        }

        self.docked = true;
        self.thrust = (0, 0);
        self.resources.refill();
        let serviced = self.ship.grid.service_equipment();
        log::info!("Docked at {name}, serviced {serviced} units");
        self.log.info(format!("Docked at {name}. Tanks topped off, batteries charged."));
        if serviced > 0 {
            self.log.info(format!("Station crews service {serviced} worn systems."));
        }
        if self.discovery.record_dock(system_idx) {
            self.resources.credits += DOCK_CREDITS;
            self.log.push(
                format!("First dock at {name}! +{DOCK_CREDITS} credits."),
                Priority::Discovery,
            );
            self.skills.award(Skill::Diplomacy, DOCK_XP, &mut self.log);
        }
        true
    }

    fn station_mut(&mut self) -> Option<&mut StationData> {
        self.sector.current_map_mut()?.station.as_mut()
    }

    /// Buy one unit from the docked station
    pub fn buy_cargo(&mut self, kind: CargoKind) -> bool {
        if !self.docked {
            return self.refuse(Refusal::NotDocked);
        }
        let Some(station) = self.station_mut() else {
            return self.refuse(Refusal::NoStation);
        };
        let (price, stock) = (station.buy_price_of(kind), station.stock_of(kind));
        if stock == 0 {
            return self.refuse(Refusal::OutOfStock);
        }
        if self.resources.credits < price {
            return self.refuse(Refusal::InsufficientCredits {
                needed: price,
                have: self.resources.credits,
            });
        }
        if let Err(refusal) = self.resources.stow_cargo(kind) {
            return self.refuse(refusal);
        }
        self.resources.credits -= price;
        if let Some(station) = self.station_mut() {
            station.stock[kind.index()] -= 1;
        }
        self.log.info(format!("Bought 1 {} for {price} credits.", kind.name()));
        true
    }

    /// Sell one unit from a cargo pad to the docked station
    pub fn sell_cargo(&mut self, pad: usize) -> bool {
        if !self.docked {
            return self.refuse(Refusal::NotDocked);
        }
        let Some(station) = self.station_mut() else {
            return self.refuse(Refusal::NoStation);
        };
        let prices = station.sell_price;
        let kind = match self.resources.unload_one(pad) {
            Ok(kind) => kind,
            Err(refusal) => return self.refuse(refusal),
        };
        let price = prices[kind.index()];
        self.resources.credits += price;
        if let Some(station) = self.station_mut() {
            station.stock[kind.index()] += 1;
        }
        self.log.info(format!("Sold 1 {} for {price} credits.", kind.name()));
        true
    }

    /// Dump a cargo pad into space
    pub fn jettison_cargo(&mut self, pad: usize) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        match self.resources.clear_pad(pad) {
            Ok((kind, count)) => {
                self.log.info(format!("Jettisoned {count} {}.", kind.name()));
                true
            }
            Err(refusal) => self.refuse(refusal),
        }
    }

    /// Pay the docked station to patch the hull
    pub fn repair_hull(&mut self, amount: i32) -> bool {
        if !self.docked {
            return self.refuse(Refusal::NotDocked);
        }
        let missing = self.resources.max_hull - self.resources.hull;
        if missing <= 0 {
            return self.refuse(Refusal::HullIntact);
        }
        if amount <= 0 {
            return self.refuse(Refusal::InvalidTarget);
        }
        let points = amount.min(missing);
        let cost = points as i64 * HULL_REPAIR_COST;
        if let Err(refusal) = self.resources.spend_credits(cost) {
            return self.refuse(refusal);
        }
        self.resources.repair_hull(points);
        self.log.info(format!("Hull repaired by {points} for {cost} credits."));
        true
    }

    /// Land on a nearby planet
    pub fn land(&mut self, object_idx: usize) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        let system_idx = self.sector.current_system;
        let Some(map) = self.current_map() else {
            return self.refuse(Refusal::InvalidTarget);
        };
        let shuttle = map.shuttle.tile();
        let planet = map
            .object(object_idx)
            .filter(|o| o.kind == ObjectKind::Planet)
            .and_then(|o| Some((o.name.clone(), o.planet_kind?, o.pos())));
        let Some((name, kind, pos)) = planet else {
            return self.refuse(Refusal::InvalidTarget);
        };
        if chebyshev(shuttle, pos) > INTERACT_RANGE {
            return self.refuse(Refusal::OutOfRange);
        }
        if !kind.is_landable() {
            return self.refuse(Refusal::NoSurface(name));
        }

        // Scanned data wins; otherwise the same survey decides
        let poi = self
            .discovery
            .scan((system_idx, object_idx))
            .and_then(|s| s.poi)
            .or_else(|| survey_planet(self.master_seed, system_idx, object_idx, &name, kind).poi)
            .or_else(|| poi_pool(kind).first().copied())
            .unwrap_or(StructureKind::Outpost);
        let seed = rng::derive_indexed(self.master_seed, SURFACE_SALT, system_idx, object_idx);
        let map = generate_surface(seed, kind, poi);

        if let Some(system) = self.sector.current_map_mut() {
            system.shuttle.halt();
        }
        self.thrust = (0, 0);
        self.docked = false;
        self.player = map.spawn;
        self.location = Location::Surface(Landing {
            map,
            system_idx,
            object_idx,
            objective_claimed: false,
        });
        log::info!("Landed on {name} ({})", poi.keyword());
        self.log.info(format!("Touchdown on {name}. {} ahead.", poi.keyword()));
        true
    }

    /// Leave a planet from its shuttle pad
    pub fn ascend(&mut self) -> bool {
        if !matches!(self.location, Location::Surface(_)) {
            return self.refuse(Refusal::WrongLocation);
        }
        if self.standing_on().kind != TileKind::ShuttlePad {
            return self.refuse(Refusal::NotOnPad);
        }
        self.location = Location::Ship;
        self.player = self.ship.spawn;
        log::info!("Ascended to orbit");
        self.log.info("Lift-off. Back in orbit.");
        true
    }

    /// Leave the prologue once the shuttle is repaired
    pub fn launch(&mut self) -> bool {
        if !matches!(self.location, Location::Prologue(_)) {
            return self.refuse(Refusal::WrongLocation);
        }
        if self.standing_on().kind != TileKind::ShuttlePad {
            return self.refuse(Refusal::NotOnPad);
        }
        let missing = self.parts_missing();
        if missing > 0 {
            return self.refuse(Refusal::MissingParts(missing));
        }
        self.location = Location::Ship;
        self.player = self.ship.spawn;
        log::info!("Prologue complete, launching");
        self.log
            .push("Engines hold. The shuttle climbs into orbit.", Priority::Discovery);
        self.skills.award(Skill::Engineering, 10, &mut self.log);
        true
    }

    /// Open a channel to a nearby ship
    pub fn hail(&mut self, object_idx: usize) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        let system_idx = self.sector.current_system;
        let sector_seed = self.sector.seed;
        let Some(map) = self.current_map() else {
            return self.refuse(Refusal::InvalidTarget);
        };
        let shuttle = map.shuttle.tile();
        let Some((ship, ai)) = map
            .object(object_idx)
            .and_then(|o| Some((o, o.ai?)))
        else {
            return self.refuse(Refusal::InvalidTarget);
        };
        if chebyshev(shuttle, ship.pos()) > HAIL_RANGE {
            return self.refuse(Refusal::OutOfRange);
        }
        let encounter = Encounter::begin(system_idx, object_idx, ship, ai, sector_seed, &self.skills);
        self.log.push(
            format!("{}: {}", encounter.ship_name, encounter.greeting),
            Priority::Social,
        );
        self.encounter = Some(encounter);
        true
    }

    /// Pick an option in the open encounter. A resolved encounter stays in
    /// `self.encounter` until the next hail or [`Sim::end_encounter`].
    pub fn resolve_encounter(&mut self, choice: usize) -> Option<Outcome> {
        let Some(mut encounter) = self.encounter.take() else {
            self.refuse(Refusal::NoEncounter);
            return None;
        };
        let (sector_seed, tick) = (self.sector.seed, self.tick_count);
        let Some(map) = self
            .sector
            .systems
            .get_mut(encounter.system_idx)
            .and_then(|s| s.map.as_mut())
        else {
            self.encounter = Some(encounter);
            self.refuse(Refusal::NoEncounter);
            return None;
        };
        let mut parties = Parties {
            resources: &mut self.resources,
            skills: &mut self.skills,
            log: &mut self.log,
            map,
            sector_seed,
            tick,
        };
        let result = encounter.resolve(choice, &mut parties);
        if encounter.resolved {
            log::debug!("Encounter with {} resolved", encounter.ship_name);
        }
        self.encounter = Some(encounter);
        match result {
            Ok(outcome) => Some(outcome),
            Err(refusal) => {
                self.refuse(refusal);
                None
            }
        }
    }

    /// Close the encounter view
    pub fn end_encounter(&mut self) -> Option<Encounter> {
        self.encounter.take()
    }

    /// Hold thrust in a direction; (0, 0) cuts the engines
    pub fn set_thrust(&mut self, dx: i32, dy: i32) -> bool {
        if !self.is_aboard() {
            return self.refuse(Refusal::WrongLocation);
        }
        let (dx, dy) = (dx.signum(), dy.signum());
        if (dx, dy) != (0, 0) {
            if !self.ship.grid.any_on(EquipmentKind::Engine) {
                return self.refuse(Refusal::Offline(EquipmentKind::Engine.name()));
            }
            if self.docked {
                self.docked = false;
                self.log.info("Undocked.");
            }
        }
        self.thrust = (dx, dy);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ShipLayout;
    use crate::world::{PrologueLocation, SpaceObject, flood_fill};

    fn aboard() -> Sim {
        Sim::aboard(42, &ShipLayout::builtin_shuttle().unwrap())
    }

    fn stand_on(sim: &mut Sim, kind: EquipmentKind) {
        let pos = sim.grid().positions_of(kind);
        sim.player = pos[0];
    }

    /// Park the shuttle next to object `idx` of the current system
    fn park_near(sim: &mut Sim, idx: usize) {
        let map = sim.sector.current_map_mut().unwrap();
        let (x, y) = map.objects[idx].pos();
        map.shuttle = crate::sim::physics::ShipPhysics::new(x as f32 + 1.0, y as f32);
    }

    fn totals(sim: &Sim) -> (i32, i32) {
        (
            sim.resources.matter_total(MatterType::Water),
            sim.resources.matter_total(MatterType::Organic),
        )
    }

    #[test]
    fn test_walls_block_movement() {
        let mut sim = aboard();
        assert_eq!(sim.player, (2, 2));
        assert!(sim.try_move_player(0, -1));
        assert!(!sim.try_move_player(0, -1), "row 0 is hull");
        assert_eq!(sim.player, (2, 1));
        assert!(!sim.try_move_player(0, 0));
    }

    #[test]
    fn test_food_and_drink_conserve_matter() {
        let mut sim = aboard();
        let before = totals(&sim);
        stand_on(&mut sim, EquipmentKind::FoodStation);
        assert!(sim.interact());
        assert_eq!(sim.resources.organic.clean, 50);
        assert_eq!(sim.resources.body.body_organic, 5);
        assert_eq!(sim.needs.hunger, 5);
        stand_on(&mut sim, EquipmentKind::DrinkStation);
        assert!(sim.interact());
        assert_eq!(sim.needs.thirst, 5);
        assert_eq!(totals(&sim), before);
    }

    #[test]
    fn test_body_fullness_refuses_meal() {
        let mut sim = aboard();
        sim.resources.body.waste_organic = 26;
        stand_on(&mut sim, EquipmentKind::FoodStation);
        assert!(!sim.interact());
        assert_eq!(sim.log.last().unwrap().text, "You are too full");
        assert_eq!(sim.resources.organic.clean, 55);
    }

    #[test]
    fn test_shower_dirties_water() {
        let mut sim = aboard();
        stand_on(&mut sim, EquipmentKind::Shower);
        assert!(sim.interact());
        assert_eq!((sim.resources.water.clean, sim.resources.water.dirty), (75, 20));
        assert_eq!(sim.needs.hygiene, 0);
    }

    #[test]
    fn test_incinerator_is_a_sink() {
        let mut sim = aboard();
        stand_on(&mut sim, EquipmentKind::Incinerator);
        assert!(sim.interact());
        assert_eq!(sim.resources.organic.dirty, 30);
        assert_eq!(sim.resources.energy, 94);
    }

    #[test]
    fn test_consoles_raise_signals_and_spend_power() {
        let mut sim = aboard();
        stand_on(&mut sim, EquipmentKind::NavConsole);
        assert!(sim.interact());
        assert!(sim.signals.nav_activated);
        assert_eq!(sim.resources.energy, 94);
        sim.signals.clear();

        assert!(sim.toggle_equipment());
        assert!(!sim.interact());
        assert!(!sim.signals.any());
        assert_eq!(sim.log.last().unwrap().text, "Nav console is offline");

        // Transporter starts off and draws constant power, not per use
        stand_on(&mut sim, EquipmentKind::CargoTransporter);
        assert!(!sim.interact());
        assert!(sim.toggle_equipment());
        assert!(sim.interact());
        assert!(sim.signals.dock_activated);
        assert_eq!(sim.resources.energy, 94);
    }

    #[test]
    fn test_interact_flips_engine() {
        let mut sim = aboard();
        stand_on(&mut sim, EquipmentKind::Engine);
        assert!(!sim.ship.grid.any_on(EquipmentKind::Engine));
        assert!(sim.interact());
        assert!(sim.ship.grid.any_on(EquipmentKind::Engine));
        stand_on(&mut sim, EquipmentKind::Toilet);
        assert!(!sim.toggle_equipment());
    }

    #[test]
    fn test_thrust_needs_engine_and_undocks() {
        let mut sim = aboard();
        assert!(!sim.set_thrust(1, 0));
        sim.ship.grid.set_all_on(EquipmentKind::Engine, true);
        sim.docked = true;
        assert!(sim.set_thrust(1, 0));
        assert!(!sim.docked);
        let start = sim.current_map().unwrap().shuttle.pos.x;
        sim.run(30);
        assert!(sim.current_map().unwrap().shuttle.pos.x > start);
    }

    #[test]
    fn test_scan_rejects_non_planets() {
        let mut sim = aboard();
        assert!(!sim.scan_planet(0), "index 0 is the star");
        assert!(!sim.scan_planet(999));
        assert_eq!(sim.discovery.scan_count(), 0);
    }

    #[test]
    fn test_navigate_refusals() {
        let mut sim = aboard();
        assert!(!sim.navigate_to(0));
        assert!(!sim.navigate_to(sim.sector.systems.len()));
        let mut stranded = Sim::new(42, &ShipLayout::builtin_shuttle().unwrap());
        assert!(!stranded.navigate_to(1));
        assert_eq!(stranded.sector.current_system, 0);
    }

    #[test]
    fn test_navigate_new_star_type_bonus() {
        let mut sim = aboard();
        let home = sim.sector.current().star_type;
        let target = (1..sim.sector.systems.len())
            .find(|&i| sim.sector.systems[i].star_type != home)
            .expect("a second star type");
        sim.resources.energy = sim.resources.max_energy;
        let credits = sim.resources.credits;
        assert!(sim.navigate_to(target));
        assert_eq!(
            sim.resources.credits,
            credits + VISIT_CREDITS + STAR_TYPE_CREDITS
        );
        assert!(sim.sector.systems[target].map.is_some());
        assert_eq!(sim.skills.xp(Skill::Science), STAR_TYPE_XP);
        assert_eq!(sim.skills.xp(Skill::Piloting), VISIT_XP);

        // Coming home pays nothing
        sim.resources.energy = sim.resources.max_energy;
        let credits = sim.resources.credits;
        assert!(sim.navigate_to(0));
        assert_eq!(sim.resources.credits, credits);
    }

    /// Find a seed whose home system has a station
    fn aboard_with_station() -> Sim {
        (0..200)
            .map(|seed| Sim::aboard(seed, &ShipLayout::builtin_shuttle().unwrap()))
            .find(|sim| sim.current_map().unwrap().station_index().is_some())
            .expect("a station within 200 seeds")
    }

    #[test]
    fn test_use_wears_equipment_until_serviced() {
        let mut sim = aboard_with_station();
        let toilet = sim.grid().positions_of(EquipmentKind::Toilet)[0];
        let condition = |sim: &Sim| sim.ship.grid.equipment(toilet.0, toilet.1).unwrap().condition;
        sim.player = toilet;
        assert!(sim.interact());
        assert_eq!(condition(&sim), 100 - WEAR_PER_USE);
        // A refused use costs nothing
        assert!(!sim.interact());
        assert_eq!(condition(&sim), 100 - WEAR_PER_USE);

        let station_idx = sim.current_map().unwrap().station_index().unwrap();
        park_near(&mut sim, station_idx);
        assert!(sim.dock());
        assert_eq!(condition(&sim), 100);
        assert!(
            sim.log
                .entries()
                .iter()
                .any(|e| e.text == "Station crews service 1 worn systems.")
        );
    }

    #[test]
    fn test_dock_trade_and_repair() {
        let mut sim = aboard_with_station();
        assert!(!sim.dock(), "station is out of range");
        assert!(!sim.buy_cargo(CargoKind::Ore));

        let station_idx = sim.current_map().unwrap().station_index().unwrap();
        park_near(&mut sim, station_idx);
        sim.resources.energy = 40;
        let credits = sim.resources.credits;
        assert!(sim.dock());
        assert!(sim.docked);
        assert_eq!(sim.resources.energy, sim.resources.max_energy);
        assert_eq!(sim.resources.credits, credits + DOCK_CREDITS);
        assert!(!sim.dock());

        let station = sim.current_map().unwrap().station.clone().unwrap();
        let kind = CargoKind::ALL
            .into_iter()
            .find(|&k| station.stock_of(k) > 0 && station.buy_price_of(k) <= sim.resources.credits)
            .expect("something affordable in stock");
        let credits = sim.resources.credits;
        assert!(sim.buy_cargo(kind));
        assert_eq!(sim.resources.credits, credits - station.buy_price_of(kind));
        assert_eq!(sim.resources.cargo_pads[0].kind, Some(kind));
        let stock = sim.current_map().unwrap().station.as_ref().unwrap().stock_of(kind);
        assert_eq!(stock, station.stock_of(kind) - 1);

        assert!(sim.sell_cargo(0));
        assert!(sim.resources.cargo_pads[0].is_empty());
        assert!(!sim.sell_cargo(0));

        sim.resources.credits = 100;
        assert!(sim.repair_hull(50));
        assert_eq!(sim.resources.hull, 100);
        assert_eq!(sim.resources.credits, 100 - 15 * HULL_REPAIR_COST);
        assert!(!sim.repair_hull(1));
    }

    #[test]
    fn test_first_dock_bonus_only_once() {
        let mut sim = aboard_with_station();
        let station_idx = sim.current_map().unwrap().station_index().unwrap();
        park_near(&mut sim, station_idx);
        assert!(sim.dock());
        sim.docked = false;
        let credits = sim.resources.credits;
        assert!(sim.dock());
        assert_eq!(sim.resources.credits, credits);
    }

    #[test]
    fn test_jettison_empties_pad() {
        let mut sim = aboard();
        sim.resources.stow_cargo(CargoKind::Ore).unwrap();
        sim.resources.stow_cargo(CargoKind::Ore).unwrap();
        assert!(sim.apply(Command::JettisonCargo(0)));
        assert!(sim.resources.cargo_pads[0].is_empty());
        assert!(!sim.apply(Command::JettisonCargo(0)));
    }

    fn landable_planet(sim: &Sim) -> Option<usize> {
        sim.current_map()?
            .planets()
            .find(|(_, p)| p.planet_kind.is_some_and(|k| k.is_landable()))
            .map(|(i, _)| i)
    }

    #[test]
    fn test_land_claim_objective_and_ascend() {
        let mut sim = (0..200)
            .map(|seed| Sim::aboard(seed, &ShipLayout::builtin_shuttle().unwrap()))
            .find(|sim| landable_planet(sim).is_some())
            .unwrap();
        let planet = landable_planet(&sim).unwrap();
        assert!(!sim.land(planet), "too far away");
        park_near(&mut sim, planet);
        assert!(sim.land(planet));

        let Location::Surface(landing) = &sim.location else {
            panic!("expected surface");
        };
        let objective = landing.map.objective.unwrap();
        let pad = landing.map.pad;
        assert!(!sim.ascend(), "not on the pad yet");

        sim.player = objective;
        let credits = sim.resources.credits;
        assert!(sim.interact());
        assert_eq!(sim.resources.credits, credits + OBJECTIVE_CREDITS);
        assert_eq!(sim.skills.xp(Skill::Science), OBJECTIVE_XP);
        // Second read pays nothing
        sim.interact();
        assert_eq!(sim.resources.credits, credits + OBJECTIVE_CREDITS);

        sim.player = pad;
        assert!(sim.interact());
        assert!(sim.is_aboard());
        assert_eq!(sim.player, sim.ship.spawn);
    }

    #[test]
    fn test_gas_giants_refuse_landing() {
        let mut sim = aboard();
        let map = sim.sector.current_map_mut().unwrap();
        let idx = 1;
        map.objects[idx].planet_kind = Some(crate::world::PlanetKind::Gas);
        park_near(&mut sim, idx);
        assert!(!sim.land(idx));
        assert!(sim.is_aboard());
    }

    #[test]
    fn test_prologue_launch_needs_parts() {
        let mut sim = Sim::with_prologue(
            12345,
            &ShipLayout::builtin_shuttle().unwrap(),
            PrologueLocation::MiningOutpost,
        );
        let Location::Prologue(prologue) = &sim.location else {
            panic!("expected prologue");
        };
        let (pad, parts) = (prologue.map.pad, prologue.parts.clone());
        let reach = flood_fill(sim.grid(), sim.player);
        let width = sim.grid().width;
        assert!(parts.iter().all(|&(x, y)| reach[y as usize * width + x as usize]));

        sim.player = pad;
        assert!(!sim.interact());
        assert_eq!(sim.log.last().unwrap().text, "Shuttle still needs 3 part(s)");

        for part in parts {
            sim.player = part;
            assert!(sim.interact());
        }
        assert_eq!(sim.parts_missing(), 0);
        sim.player = pad;
        assert!(sim.interact());
        assert!(sim.is_aboard());
    }

    #[test]
    fn test_loot_crate_pays_out_once() {
        let mut sim = Sim::with_prologue(
            7,
            &ShipLayout::builtin_shuttle().unwrap(),
            PrologueLocation::DerelictStation,
        );
        let Location::Prologue(prologue) = &sim.location else {
            panic!("expected prologue");
        };
        let spot = prologue.loot[0];
        let before = (sim.resources.credits, sim.resources.cargo_pads.clone());
        sim.player = spot;
        assert!(sim.interact());
        assert_ne!((sim.resources.credits, sim.resources.cargo_pads.clone()), before);
        assert!(sim.grid().equipment(spot.0, spot.1).is_none());
        assert!(!sim.interact());
    }

    #[test]
    fn test_hail_range_and_resolution() {
        let mut sim = aboard();
        let map = sim.sector.current_map_mut().unwrap();
        map.objects.push(SpaceObject {
            kind: ObjectKind::Ship,
            name: "Trader Magpie".to_string(),
            x: 200,
            y: 80,
            planet_kind: None,
            ai: Some(crate::world::AiKind::Trader),
            dx: 1,
            dy: 0,
            move_rate: 24,
            move_timer: 24,
            dir_timer: 300,
        });
        let idx = map.objects.len() - 1;
        assert!(!sim.hail(idx), "too far");
        park_near(&mut sim, idx);
        assert!(sim.hail(idx));
        assert!(sim.encounter.is_some());
        assert_eq!(sim.resolve_encounter(1), Some(Outcome::OpenTrade));
        assert!(sim.encounter.as_ref().unwrap().resolved);
        assert_eq!(sim.resolve_encounter(0), None);
        assert!(sim.end_encounter().is_some());
        assert_eq!(sim.resolve_encounter(0), None);
    }

    #[test]
    fn test_encounter_survives_missing_system_map() {
        let mut sim = aboard();
        let map = sim.sector.current_map_mut().unwrap();
        let (x, y) = map.shuttle.tile();
        map.objects.push(SpaceObject {
            kind: ObjectKind::Ship,
            name: "Trader Magpie".to_string(),
            x: x + 1,
            y,
            planet_kind: None,
            ai: Some(crate::world::AiKind::Trader),
            dx: 1,
            dy: 0,
            move_rate: 24,
            move_timer: 24,
            dir_timer: 300,
        });
        let idx = map.objects.len() - 1;
        assert!(sim.hail(idx));
        assert!(sim.sector.systems[1].map.is_none());
        sim.encounter.as_mut().unwrap().system_idx = 1;

        assert_eq!(sim.resolve_encounter(1), None);
        let encounter = sim.encounter.as_ref().expect("encounter kept open");
        assert!(!encounter.resolved);
        assert_eq!(encounter.system_idx, 1);
        assert_eq!(sim.log.last().unwrap().priority, Priority::Warning);
    }
}
