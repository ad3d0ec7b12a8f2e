//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by object index)
//! - No rendering or platform dependencies

pub mod actions;
pub mod discovery;
pub mod encounter;
pub mod log;
pub mod matter;
pub mod npc;
pub mod physics;
pub mod refusal;
pub mod skills;
pub mod state;
pub mod tick;

pub use discovery::{DiscoveryLog, PlanetScanData, survey_planet};
pub use encounter::{Encounter, EncounterOption, Outcome};
pub use log::{LogEntry, MessageLog, Priority};
pub use matter::{CargoKind, CargoPad, MatterType, Needs, Resources};
pub use physics::ShipPhysics;
pub use refusal::Refusal;
pub use skills::{Skill, Skills};
pub use state::{Landing, Location, ShipInterior, Sim, UiSignals};
