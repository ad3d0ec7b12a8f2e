//! Persisted data formats
//!
//! Ship layouts are JSON documents describing a deck plan. Save games are
//! left to an external store; every piece of simulation state derives serde
//! so it can be written out as-is.

pub mod layout;

pub use layout::{LayoutError, Room, ShipLayout};
