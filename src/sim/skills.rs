//! Skill experience and levels
//!
//! Seven skills share one cumulative XP table. Level `n` is reached when XP
//! meets `XP_TABLE[n - 1]`; XP stops accumulating at the level-10 ceiling.

use serde::{Deserialize, Serialize};

use super::log::{MessageLog, Priority};

/// Cumulative XP needed for levels 1..=10
pub const XP_TABLE: [u32; 10] = [0, 40, 90, 160, 250, 360, 490, 640, 810, 1000];

/// XP ceiling (level 10)
pub const MAX_XP: u32 = XP_TABLE[XP_TABLE.len() - 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Piloting,
    Engineering,
    Science,
    Diplomacy,
    Survival,
    Medicine,
    Combat,
}

impl Skill {
    pub const ALL: [Skill; 7] = [
        Skill::Piloting,
        Skill::Engineering,
        Skill::Science,
        Skill::Diplomacy,
        Skill::Survival,
        Skill::Medicine,
        Skill::Combat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Piloting => "Piloting",
            Skill::Engineering => "Engineering",
            Skill::Science => "Science",
            Skill::Diplomacy => "Diplomacy",
            Skill::Survival => "Survival",
            Skill::Medicine => "Medicine",
            Skill::Combat => "Combat",
        }
    }
}

/// Greatest level whose threshold is at or below `xp`
pub fn xp_to_level(xp: u32) -> u32 {
    XP_TABLE.iter().rposition(|&t| t <= xp).map_or(1, |i| i as u32 + 1)
}

/// Per-skill cumulative XP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    xp: [u32; 7],
}

impl Skills {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xp(&self, skill: Skill) -> u32 {
        self.xp[skill as usize]
    }

    pub fn level(&self, skill: Skill) -> u32 {
        xp_to_level(self.xp(skill))
    }

    /// Add XP (clamped at the ceiling). Returns true if the level went up.
    pub fn add_xp(&mut self, skill: Skill, amount: u32) -> bool {
        let before = self.level(skill);
        let slot = &mut self.xp[skill as usize];
        *slot = slot.saturating_add(amount).min(MAX_XP);
        self.level(skill) > before
    }

    /// Add XP and announce a level-up in the message log
    pub fn award(&mut self, skill: Skill, amount: u32, log: &mut MessageLog) -> bool {
        let leveled = self.add_xp(skill, amount);
        if leveled {
            log.push(
                format!("{} skill increased to level {}!", skill.name(), self.level(skill)),
                Priority::Discovery,
            );
        }
        leveled
    }

}
