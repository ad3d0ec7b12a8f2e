//! Fixed timestep simulation tick
//!
//! The tick counter advances first; a scheduled step fires when the new
//! count is a multiple of its interval, so tick 60 is the first generator
//! pulse and tick 900 the first warning scan. Within a tick the order is
//! fixed: generator, recycler (intake, then process), body, needs, NPC ships,
//! shuttle physics, warnings.

use super::log::Priority;
use super::matter::{MatterType, worsen};
use super::npc;
use super::state::Sim;
use crate::consts::*;
use crate::tile::EquipmentKind;

/// Energy at or below which the low-energy warning fires
pub const LOW_ENERGY: i32 = 10;
/// Clean matter at or below which a tank warning fires
pub const LOW_MATTER: i32 = 15;
/// Body waste at or above which the toilet reminder fires
pub const HIGH_WASTE: i32 = 20;
/// Need thresholds
pub const NEED_WARNING: i32 = 60;
pub const NEED_CRITICAL: i32 = 80;

impl Sim {
    /// Advance the simulation by one tick
    pub fn tick(&mut self) {
        self.tick_count += 1;
        let t = self.tick_count;

        self.life_support(t);

        // Ships see where the shuttle was before it moves this tick
        let shuttle = self.shuttle_tile();
        let sector_seed = self.sector.seed;
        let engine_on = self.ship.grid.any_on(EquipmentKind::Engine);
        let thrust = if self.is_aboard() && !self.docked && engine_on {
            self.thrust
        } else {
            (0, 0)
        };
        if let Some(map) = self.sector.current_map_mut() {
            if let Some(shuttle) = shuttle {
                npc::step_ships(map, shuttle, sector_seed, t);
            }
            let (width, height) = (map.width, map.height);
            map.shuttle.step(thrust.0, thrust.1, width, height);
        }

        if t % WARNING_INTERVAL == 0 {
            self.emit_warnings();
        }
    }

    /// Run `n` ticks
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn life_support(&mut self, t: u64) {
        let grid = &self.ship.grid;
        let generator_on = grid.any_on(EquipmentKind::Generator);
        let recycler_on = grid.any_on(EquipmentKind::MatterRecycler);
        let res = &mut self.resources;

        if generator_on && t % GENERATOR_INTERVAL == 0 {
            res.add_energy(1);
        }

        if recycler_on {
            if t % RECYCLER_INTAKE_INTERVAL == 0 {
                res.recycler.intake(MatterType::Water, &mut res.water);
                res.recycler.intake(MatterType::Organic, &mut res.organic);
            }
            if t % RECYCLER_PROCESS_INTERVAL == 0 {
                for matter in [MatterType::Water, MatterType::Organic] {
                    let pool = match matter {
                        MatterType::Water => &mut res.water,
                        MatterType::Organic => &mut res.organic,
                    };
                    res.recycler.process(matter, pool, &mut res.energy);
                }
            }
        }

        if t % BODY_DIGEST_INTERVAL == 0 {
            res.body.digest_organic();
        }
        if t % BODY_WATER_INTERVAL == 0 {
            res.body.process_water();
        }

        if t % HUNGER_INTERVAL == 0 {
            worsen(&mut self.needs.hunger);
        }
        if t % THIRST_INTERVAL == 0 {
            worsen(&mut self.needs.thirst);
        }
        if t % HYGIENE_INTERVAL == 0 {
            worsen(&mut self.needs.hygiene);
        }
    }

    /// Log the most severe warning in each category
    fn emit_warnings(&mut self) {
        let res = &self.resources;
        let mut warnings: Vec<(String, Priority)> = Vec::new();

        if res.energy == 0 {
            warnings.push(("Power depleted! Systems failing.".into(), Priority::Critical));
        } else if res.energy <= LOW_ENERGY {
            warnings.push((format!("Low power: {} energy left.", res.energy), Priority::Warning));
        }

        for matter in [MatterType::Water, MatterType::Organic] {
            let clean = res.pool(matter).clean;
            if clean == 0 {
                warnings.push((format!("Out of clean {}!", matter.name()), Priority::Critical));
            } else if clean <= LOW_MATTER {
                warnings.push((
                    format!("Clean {} running low ({clean}).", matter.name()),
                    Priority::Warning,
                ));
            }
        }

        if res.body.total_waste() >= HIGH_WASTE {
            warnings.push(("You urgently need a toilet.".into(), Priority::Warning));
        }

        for (need, value) in [("hungry", self.needs.hunger), ("thirsty", self.needs.thirst)] {
            if value >= NEED_CRITICAL {
                warnings.push((format!("You are desperately {need}!"), Priority::Critical));
            } else if value >= NEED_WARNING {
                warnings.push((format!("You are {need}."), Priority::Warning));
            }
        }
        if self.needs.hygiene >= NEED_CRITICAL {
            warnings.push(("You badly need a shower.".into(), Priority::Warning));
        }

        for (text, priority) in warnings {
            self.log.push(text, priority);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ShipLayout;

    fn sim() -> Sim {
        Sim::aboard(42, &ShipLayout::builtin_shuttle().unwrap())
    }

    #[test]
    fn test_first_tick_fires_nothing() {
        let mut sim = sim();
        sim.tick();
        assert_eq!(sim.tick_count, 1);
        assert_eq!(sim.resources.energy, 95);
        assert_eq!(sim.resources.recycler.water_buffer, 0);
        assert_eq!(sim.resources.water.dirty, 17);
        assert_eq!(sim.needs.hunger, 40);
        assert_eq!(sim.needs.thirst, 30);
        assert_eq!(sim.needs.hygiene, 20);
    }

    #[test]
    fn test_first_pulses_land_on_their_interval() {
        let mut sim = sim();
        sim.run(59);
        assert_eq!(sim.resources.energy, 95);
        assert_eq!(sim.resources.recycler.water_buffer, 0);
        sim.tick();
        assert_eq!(sim.tick_count, 60);
        assert_eq!(sim.resources.energy, 96);
        assert_eq!(sim.resources.recycler.water_buffer, 1);
        assert_eq!(sim.resources.water.dirty, 16);
    }

    #[test]
    fn test_generator_off_stops_charging() {
        let mut sim = sim();
        sim.ship.grid.set_all_on(EquipmentKind::Generator, false);
        sim.ship.grid.set_all_on(EquipmentKind::MatterRecycler, false);
        sim.run(600);
        assert_eq!(sim.resources.energy, 95);
        assert_eq!(sim.resources.recycler.water_buffer, 0);
    }

    #[test]
    fn test_recycler_stalls_without_energy() {
        let mut sim = sim();
        sim.ship.grid.set_all_on(EquipmentKind::Generator, false);
        sim.resources.energy = 0;
        sim.run(300);
        assert_eq!(sim.resources.water.clean, 78);
        assert_eq!(sim.resources.energy, 0);
        assert_eq!(sim.resources.recycler.water_buffer, 5);
    }

    #[test]
    fn test_generator_pulse_feeds_same_tick_process() {
        // Tick 300 is a generator, intake and process tick at once
        let mut sim = sim();
        sim.resources.energy = 0;
        sim.resources.recycler.water_buffer = 1;
        sim.resources.water.dirty -= 1;
        sim.tick_count = 299;
        let before = sim.resources.matter_total(MatterType::Water);
        sim.tick();
        assert_eq!(sim.resources.water.clean, 79);
        assert_eq!(sim.resources.recycler.water_buffer, 1);
        // The single unit of energy went to water; organics wait
        assert_eq!(sim.resources.organic.clean, 55);
        assert_eq!(sim.resources.recycler.organic_buffer, 1);
        assert_eq!(sim.resources.energy, 0);
        assert_eq!(sim.resources.matter_total(MatterType::Water), before);
    }

    #[test]
    fn test_digestion_schedule() {
        let mut sim = sim();
        sim.resources.body.body_organic = 2;
        sim.resources.body.body_water = 2;
        sim.run(239);
        assert_eq!(sim.resources.body.body_water, 2);
        assert_eq!(sim.resources.body.body_organic, 2);
        // Organic digests at 300 and 600; water at 240 and 480
        sim.run(361);
        assert_eq!(sim.resources.body.body_organic, 0);
        assert_eq!(sim.resources.body.waste_organic, 12);
        assert_eq!(sim.resources.body.body_water, 0);
        assert_eq!(sim.resources.body.waste_water, 7);
    }

    fn warnings_at_scan(sim: &mut Sim) -> Vec<(String, Priority)> {
        sim.log = Default::default();
        sim.tick_count = WARNING_INTERVAL - 1;
        sim.tick();
        sim.log.entries().iter().map(|e| (e.text.clone(), e.priority)).collect()
    }

    fn has(warnings: &[(String, Priority)], text: &str, priority: Priority) -> bool {
        warnings.iter().any(|(t, p)| t == text && *p == priority)
    }

    #[test]
    fn test_warnings_pick_most_severe() {
        let mut sim = sim();
        sim.resources.energy = 0;
        sim.needs.hunger = 85;
        sim.needs.thirst = 65;
        sim.resources.water.clean = 10;
        sim.ship.grid.set_all_on(EquipmentKind::Generator, false);
        let warnings = warnings_at_scan(&mut sim);
        assert!(has(&warnings, "Power depleted! Systems failing.", Priority::Critical));
        assert!(!warnings.iter().any(|(t, _)| t.starts_with("Low power")));
        assert!(has(&warnings, "You are desperately hungry!", Priority::Critical));
        assert!(has(&warnings, "You are thirsty.", Priority::Warning));
        assert!(has(&warnings, "Clean water running low (10).", Priority::Warning));
    }

    #[test]
    fn test_warnings_for_waste_hygiene_organics_and_low_power() {
        let mut sim = sim();
        sim.ship.grid.set_all_on(EquipmentKind::Generator, false);
        sim.ship.grid.set_all_on(EquipmentKind::MatterRecycler, false);
        sim.resources.energy = 5;
        sim.resources.organic.dirty += sim.resources.organic.clean;
        sim.resources.organic.clean = 0;
        sim.resources.body.waste_organic = 15;
        sim.needs.hygiene = 85;
        let warnings = warnings_at_scan(&mut sim);
        assert!(has(&warnings, "Low power: 5 energy left.", Priority::Warning));
        assert!(!warnings.iter().any(|(t, _)| t.starts_with("Power depleted")));
        assert!(has(&warnings, "Out of clean organics!", Priority::Critical));
        assert!(!warnings.iter().any(|(t, _)| t.starts_with("Clean organics")));
        assert!(has(&warnings, "You urgently need a toilet.", Priority::Warning));
        assert!(has(&warnings, "You badly need a shower.", Priority::Warning));
        // Water is still plentiful
        assert!(!warnings.iter().any(|(t, _)| t.contains("water")));
    }

    #[test]
    fn test_calm_state_raises_no_warnings() {
        let mut sim = sim();
        assert!(warnings_at_scan(&mut sim).is_empty());
    }

    #[test]
    fn test_first_warning_scan_is_tick_900() {
        let mut sim = sim();
        sim.needs.hunger = 90;
        sim.log = Default::default();
        sim.run(WARNING_INTERVAL - 1);
        assert!(!sim.log.has_priority(Priority::Critical));
        sim.tick();
        assert_eq!(sim.tick_count, WARNING_INTERVAL);
        assert!(sim.log.has_priority(Priority::Critical));
    }

    #[test]
    fn test_docked_shuttle_ignores_thrust() {
        let mut sim = sim();
        sim.ship.grid.set_all_on(EquipmentKind::Engine, true);
        sim.thrust = (1, 0);
        sim.docked = true;
        let before = sim.current_map().unwrap().shuttle.pos;
        sim.run(10);
        assert_eq!(sim.current_map().unwrap().shuttle.pos, before);
    }
}
