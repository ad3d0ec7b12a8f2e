//! Encounter engine
//!
//! A hail turns an NPC ship into a multiple-choice conversation. The menu is
//! fixed per AI kind; resolving an option mutates resources, skills and the
//! message log. Some outcomes (a bribe you cannot pay, a failed bluff) leave
//! the encounter open so the player can choose again.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::log::{MessageLog, Priority};
use super::matter::{MatterType, Resources};
use super::refusal::Refusal;
use super::skills::{Skill, Skills};
use crate::world::rng;
use crate::world::system::{AiKind, SpaceObject, SystemMap};

/// Credits demanded by a pirate
pub const BRIBE_COST: i64 = 30;
/// Diplomacy level needed to attempt a bluff
pub const BLUFF_LEVEL: u32 = 3;
/// Bounty for reporting a pirate to a patrol
pub const PIRATE_BOUNTY: i64 = 25;

const TRADER_GREETINGS: [&str; 4] = [
    "Greetings, traveler. Care to do business?",
    "Independent hauler here. Credits talk, friend.",
    "You look like you could use supplies.",
    "Fair prices, no questions asked.",
];

const PATROL_GREETINGS: [&str; 3] = [
    "This is sector patrol. State your business.",
    "Patrol vessel hailing. Transmit your registry.",
    "Routine check, pilot. Hold your course.",
];

const PIRATE_GREETINGS: [&str; 4] = [
    "Cut your engines and nobody gets hurt.",
    "Nice little shuttle. We'll be taking that cargo.",
    "Pay up or drift, spacer.",
    "You're in our space now.",
];

const TRADER_CHATTER: [&str; 3] = [
    "Safe travels. Watch for pirates near the outer planets.",
    "Prices are better in systems with a blue giant, or so I hear.",
    "Keep your recycler clean and it keeps you alive.",
];

/// One entry of an encounter menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterOption {
    pub label: String,
    pub enabled: bool,
    /// Shown instead of acting when the option is disabled
    pub disable_text: Option<String>,
    pub skill_req: Option<Skill>,
    pub skill_level: u32,
}

impl EncounterOption {
    fn open(label: &str) -> Self {
        Self {
            label: label.to_string(),
            enabled: true,
            disable_text: None,
            skill_req: None,
            skill_level: 0,
        }
    }

    fn closed(label: &str, reason: &str) -> Self {
        Self {
            enabled: false,
            disable_text: Some(reason.to_string()),
            ..Self::open(label)
        }
    }

    fn gated(label: &str, skill: Skill, level: u32, have: u32) -> Self {
        Self {
            label: label.to_string(),
            enabled: have >= level,
            disable_text: (have < level)
                .then(|| format!("Requires {} {level}", skill.name())),
            skill_req: Some(skill),
            skill_level: level,
        }
    }
}

/// What the caller should do after a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The other ship said something
    Reply(String),
    /// Open the trade view
    OpenTrade,
}

/// State the engine may touch while resolving an option
pub struct Parties<'a> {
    pub resources: &'a mut Resources,
    pub skills: &'a mut Skills,
    pub log: &'a mut MessageLog,
    pub map: &'a mut SystemMap,
    pub sector_seed: u64,
    pub tick: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub system_idx: usize,
    pub object_idx: usize,
    pub ai: AiKind,
    pub ship_name: String,
    pub greeting: String,
    pub options: Vec<EncounterOption>,
    pub resolved: bool,
}

impl Encounter {
    /// Open a conversation with `ship` (object `object_idx` of system `system_idx`)
    pub fn begin(
        system_idx: usize,
        object_idx: usize,
        ship: &SpaceObject,
        ai: AiKind,
        sector_seed: u64,
        skills: &Skills,
    ) -> Self {
        let seed = sector_seed
            .wrapping_mul(777)
            .wrapping_add((ship.x as i64 * 31) as u64)
            .wrapping_add((ship.y as i64 * 17) as u64);
        let pool: &[&str] = match ai {
            AiKind::Trader => &TRADER_GREETINGS,
            AiKind::Patrol => &PATROL_GREETINGS,
            AiKind::Pirate => &PIRATE_GREETINGS,
        };
        let greeting = pool[rng::stream(seed).random_range(0..pool.len())].to_string();

        Self {
            system_idx,
            object_idx,
            ai,
            ship_name: ship.name.clone(),
            greeting,
            options: menu(ai, skills),
            resolved: false,
        }
    }

    /// Resolve menu option `choice`. An `Err` leaves the encounter open and
    /// nothing changed; a bluff that fails is an `Ok` that also leaves it open.
    pub fn resolve(&mut self, choice: usize, parties: &mut Parties<'_>) -> Result<Outcome, Refusal> {
        if self.resolved {
            return Err(Refusal::NoEncounter);
        }
        let option = self.options.get(choice).ok_or(Refusal::InvalidTarget)?;
        if !option.enabled {
            let reason = option
                .disable_text
                .clone()
                .unwrap_or_else(|| format!("{} is unavailable", option.label));
            return Err(Refusal::OptionDisabled(reason));
        }

        let outcome = match self.ai {
            AiKind::Trader => self.resolve_trader(choice, parties),
            AiKind::Patrol => self.resolve_patrol(choice, parties),
            AiKind::Pirate => self.resolve_pirate(choice, parties),
        }?;
        if let Outcome::Reply(text) = &outcome {
            parties.log.push(format!("{}: {text}", self.ship_name), Priority::Social);
        }
        Ok(outcome)
    }

    fn dice(&self, parties: &Parties<'_>) -> rand_pcg::Pcg32 {
        let (x, y) = parties
            .map
            .object(self.object_idx)
            .map_or((0, 0), SpaceObject::pos);
        rng::stream(rng::event_seed(parties.sector_seed, x, y, parties.tick))
    }

    fn resolve_trader(&mut self, choice: usize, p: &mut Parties<'_>) -> Result<Outcome, Refusal> {
        let outcome = match choice {
            0 => {
                p.skills.award(Skill::Diplomacy, 1, p.log);
                Outcome::Reply(TRADER_CHATTER[(p.tick % 3) as usize].to_string())
            }
            1 => Outcome::OpenTrade,
            _ => {
                p.skills.award(Skill::Diplomacy, 2, p.log);
                if self.dice(p).random_bool(0.4) {
                    // Tanks only take what fits
                    let water = p.resources.receive_clean(MatterType::Water, 5);
                    let organic = p.resources.receive_clean(MatterType::Organic, 3);
                    if water + organic == 0 {
                        p.log.push("Your tanks have no room for their supplies.", Priority::Info);
                    } else {
                        p.log.push(
                            format!("Received {water} water and {organic} organics."),
                            Priority::Info,
                        );
                    }
                    Outcome::Reply("We can spare a little. Take care out there.".to_string())
                } else {
                    Outcome::Reply("Sorry, our own tanks are running low.".to_string())
                }
            }
        };
        self.resolved = true;
        Ok(outcome)
    }

    fn resolve_patrol(&mut self, choice: usize, p: &mut Parties<'_>) -> Result<Outcome, Refusal> {
        let reply = match choice {
            0 => {
                p.skills.award(Skill::Diplomacy, 1, p.log);
                "Registry confirmed. Move along."
            }
            _ if p.map.has_pirates() => {
                p.resources.credits += PIRATE_BOUNTY;
                p.skills.award(Skill::Diplomacy, 3, p.log);
                p.log.push(
                    format!("Bounty received: +{PIRATE_BOUNTY} credits."),
                    Priority::Info,
                );
                "Thanks for the tip. We'll handle it."
            }
            _ => "We have no pirate activity on our scopes.",
        };
        self.resolved = true;
        Ok(Outcome::Reply(reply.to_string()))
    }

    fn resolve_pirate(&mut self, choice: usize, p: &mut Parties<'_>) -> Result<Outcome, Refusal> {
        let reply = match choice {
            0 => {
                let lost_cargo = p.resources.clear_all_cargo();
                let lost_credits = p.resources.credits / 2;
                p.resources.credits -= lost_credits;
                p.log.push(
                    format!("You lost {lost_cargo} cargo units and {lost_credits} credits."),
                    Priority::Warning,
                );
                "Pleasure doing business."
            }
            1 => {
                p.resources.spend_credits(BRIBE_COST)?;
                p.skills.award(Skill::Diplomacy, 2, p.log);
                "Smart choice. Get lost."
            }
            2 => {
                let level = p.skills.level(Skill::Diplomacy);
                let roll = self.dice(p).random_range(0..10u32);
                p.skills.award(Skill::Diplomacy, 5, p.log);
                if roll >= level {
                    p.log.push("Your bluff falls flat.", Priority::Warning);
                    return Ok(Outcome::Reply("Nice try. Pay up.".to_string()));
                }
                "A naval escort? ...We'll be going."
            }
            _ => {
                if let Some(ship) = p.map.objects.get_mut(self.object_idx) {
                    ship.move_rate = (ship.move_rate - 2).max(3);
                    ship.dir_timer = 30;
                }
                p.log.push("You burn hard and break away.", Priority::Info);
                "You can't run forever!"
            }
        };
        self.resolved = true;
        Ok(Outcome::Reply(reply.to_string()))
    }
}

fn menu(ai: AiKind, skills: &Skills) -> Vec<EncounterOption> {
    match ai {
        AiKind::Trader => vec![
            EncounterOption::open("Hail back"),
            EncounterOption::open("Trade goods"),
            EncounterOption::open("Request supplies"),
        ],
        AiKind::Patrol => vec![
            EncounterOption::open("Identify"),
            EncounterOption::open("Report pirate"),
        ],
        AiKind::Pirate => vec![
            EncounterOption::open("Surrender"),
            EncounterOption::open(&format!("Bribe {BRIBE_COST}cr")),
            EncounterOption::gated(
                "Bluff",
                Skill::Diplomacy,
                BLUFF_LEVEL,
                skills.level(Skill::Diplomacy),
            ),
            EncounterOption::open("Flee"),
            EncounterOption::closed("Fight", "Weapons systems offline"),
        ],
    }
}
