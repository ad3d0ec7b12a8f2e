//! Non-fatal operation refusals
//!
//! A refused operation leaves the simulation untouched; the driver turns the
//! refusal's message into a Warning entry in the message log.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Not enough energy ({have}/{needed})")]
    InsufficientEnergy { needed: i32, have: i32 },
    #[error("Not enough clean {what} ({have}/{needed})")]
    InsufficientMatter {
        what: &'static str,
        needed: i32,
        have: i32,
    },
    #[error("You are too full")]
    BodyTooFull,
    #[error("Nothing to flush")]
    NoWaste,
    #[error("No dirty organics to burn")]
    NothingToBurn,
    #[error("No cargo space")]
    NoCargoSpace,
    #[error("That cargo pad is empty")]
    EmptyPad,
    #[error("Station is out of stock")]
    OutOfStock,
    #[error("Insufficient credits ({have}/{needed})")]
    InsufficientCredits { needed: i64, have: i64 },
    #[error("You must be docked")]
    NotDocked,
    #[error("No station in this system")]
    NoStation,
    #[error("Too far away")]
    OutOfRange,
    #[error("Nothing to use here")]
    NothingHere,
    #[error("{0} is offline")]
    Offline(&'static str),
    #[error("Invalid target")]
    InvalidTarget,
    #[error("{0} has no solid surface")]
    NoSurface(String),
    #[error("Already there")]
    AlreadyThere,
    #[error("Hull is already intact")]
    HullIntact,
    #[error("Shuttle still needs {0} part(s)")]
    MissingParts(usize),
    #[error("Stand on the shuttle pad first")]
    NotOnPad,
    #[error("Not possible from here")]
    WrongLocation,
    #[error("No active encounter")]
    NoEncounter,
    #[error("{0}")]
    OptionDisabled(String),
}
