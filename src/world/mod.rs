//! Procedural world model
//!
//! Everything here is a pure function of a seed: sector layout, star system
//! contents, station markets, and planet / prologue surfaces. Sub-seeds come
//! from `rng`, so generating one part never perturbs another.

pub mod rng;
pub mod sector;
pub mod station;
pub mod structures;
pub mod surface;
pub mod system;

pub use sector::{Sector, StarSystem, StarType};
pub use station::StationData;
pub use structures::StructureKind;
pub use surface::{PrologueLocation, PrologueSurface, SurfaceMap, flood_fill};
pub use system::{AiKind, ObjectKind, PlanetKind, SpaceObject, SystemMap};
