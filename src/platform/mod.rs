//! Platform boundary
//!
//! Window and keyboard plumbing live outside the simulation core. Front ends
//! translate their events into [`Command`]s and feed them to `Sim::apply`.

pub mod input;

pub use input::Command;
