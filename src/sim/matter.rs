//! Conserved matter, the player's body, and ship resources
//!
//! Water and organics cycle between clean/dirty ship pools, the recycler
//! buffers and the player's body. Normal operation never creates or destroys
//! matter; docking refills and the incinerator are the explicit exceptions.

use serde::{Deserialize, Serialize};

use super::refusal::Refusal;
use crate::consts::{MAX_BODY, MAX_NEED};

/// The two conserved matter types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatterType {
    Water,
    Organic,
}

impl MatterType {
    pub fn name(self) -> &'static str {
        match self {
            MatterType::Water => "water",
            MatterType::Organic => "organics",
        }
    }
}

/// Paired clean/dirty counters sharing one capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatterPool {
    pub clean: i32,
    pub dirty: i32,
    pub capacity: i32,
}

impl MatterPool {
    pub fn new(clean: i32, dirty: i32, capacity: i32) -> Self {
        Self {
            clean,
            dirty,
            capacity,
        }
    }

    /// Free capacity given matter of this type held outside the pool
    pub fn room(&self, held_elsewhere: i32) -> i32 {
        (self.capacity - self.clean - self.dirty - held_elsewhere).max(0)
    }
}

/// Matter currently inside the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Body {
    pub body_organic: i32,
    pub body_water: i32,
    pub waste_organic: i32,
    pub waste_water: i32,
}

impl Body {
    pub fn fullness(&self) -> i32 {
        self.body_organic + self.body_water + self.waste_organic + self.waste_water
    }

    pub fn total_waste(&self) -> i32 {
        self.waste_organic + self.waste_water
    }

    /// Convert one unit of digested organics into waste
    pub fn digest_organic(&mut self) {
        if self.body_organic > 0 {
            self.body_organic -= 1;
            self.waste_organic += 1;
        }
    }

    /// Convert one unit of absorbed water into waste
    pub fn process_water(&mut self) {
        if self.body_water > 0 {
            self.body_water -= 1;
            self.waste_water += 1;
        }
    }

    fn holds(&self, matter: MatterType) -> i32 {
        match matter {
            MatterType::Water => self.body_water + self.waste_water,
            MatterType::Organic => self.body_organic + self.waste_organic,
        }
    }
}

/// Staging buffers between dirty pools and clean output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recycler {
    pub water_buffer: i32,
    pub organic_buffer: i32,
    pub capacity: i32,
}

impl Default for Recycler {
    fn default() -> Self {
        Self {
            water_buffer: 0,
            organic_buffer: 0,
            capacity: 10,
        }
    }
}

impl Recycler {
    fn buffer(&self, matter: MatterType) -> i32 {
        match matter {
            MatterType::Water => self.water_buffer,
            MatterType::Organic => self.organic_buffer,
        }
    }

    fn buffer_mut(&mut self, matter: MatterType) -> &mut i32 {
        match matter {
            MatterType::Water => &mut self.water_buffer,
            MatterType::Organic => &mut self.organic_buffer,
        }
    }

    /// Pull one dirty unit from a pool into its buffer
    pub fn intake(&mut self, matter: MatterType, pool: &mut MatterPool) -> bool {
        let capacity = self.capacity;
        let buffer = self.buffer_mut(matter);
        if pool.dirty > 0 && *buffer < capacity {
            pool.dirty -= 1;
            *buffer += 1;
            true
        } else {
            false
        }
    }

    /// Convert one buffered unit back into clean matter for 1 energy
    pub fn process(&mut self, matter: MatterType, pool: &mut MatterPool, energy: &mut i32) -> bool {
        let buffer = self.buffer_mut(matter);
        if *buffer > 0 && *energy > 0 {
            *buffer -= 1;
            *energy -= 1;
            pool.clean += 1;
            true
        } else {
            false
        }
    }
}

/// Player need meters: 0 = satisfied, 100 = critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Needs {
    pub hunger: i32,
    pub thirst: i32,
    pub hygiene: i32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: 40,
            thirst: 30,
            hygiene: 20,
        }
    }
}

/// Raise a need meter by one, saturating at the maximum
pub fn worsen(meter: &mut i32) {
    *meter = (*meter + 1).min(MAX_NEED);
}

/// Lower a need meter, flooring at zero
pub fn relieve(meter: &mut i32, amount: i32) {
    *meter = (*meter - amount).max(0);
}

/// Tradeable cargo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoKind {
    Ore,
    Alloys,
    Electronics,
    Medicine,
    Luxuries,
    Artifacts,
}

impl CargoKind {
    pub const ALL: [CargoKind; 6] = [
        CargoKind::Ore,
        CargoKind::Alloys,
        CargoKind::Electronics,
        CargoKind::Medicine,
        CargoKind::Luxuries,
        CargoKind::Artifacts,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CargoKind::Ore => "Ore",
            CargoKind::Alloys => "Alloys",
            CargoKind::Electronics => "Electronics",
            CargoKind::Medicine => "Medicine",
            CargoKind::Luxuries => "Luxuries",
            CargoKind::Artifacts => "Artifacts",
        }
    }

    /// Base market value in credits
    pub fn base_price(self) -> i64 {
        match self {
            CargoKind::Ore => 8,
            CargoKind::Alloys => 15,
            CargoKind::Electronics => 25,
            CargoKind::Medicine => 30,
            CargoKind::Luxuries => 45,
            CargoKind::Artifacts => 80,
        }
    }
}

/// Units a single cargo pad can hold
pub const PAD_CAPACITY: u32 = 10;

/// One cargo pad; an empty pad has no kind and a zero count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CargoPad {
    pub kind: Option<CargoKind>,
    pub count: u32,
}

impl CargoPad {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}

/// Everything the shuttle and its pilot carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub water: MatterPool,
    pub organic: MatterPool,
    pub energy: i32,
    pub max_energy: i32,
    pub hull: i32,
    pub max_hull: i32,
    pub body: Body,
    pub recycler: Recycler,
    pub credits: i64,
    pub cargo_pads: Vec<CargoPad>,
}

impl Resources {
    /// Starting resources after cryo wake, with `pads` cargo pads
    pub fn new(pads: usize) -> Self {
        Self {
            water: MatterPool::new(78, 17, 100),
            organic: MatterPool::new(55, 35, 100),
            energy: 95,
            max_energy: 100,
            hull: 85,
            max_hull: 100,
            body: Body {
                body_organic: 0,
                body_water: 0,
                waste_organic: 10,
                waste_water: 5,
            },
            recycler: Recycler::default(),
            credits: 100,
            cargo_pads: vec![CargoPad::default(); pads],
        }
    }

    pub fn pool(&self, matter: MatterType) -> &MatterPool {
        match matter {
            MatterType::Water => &self.water,
            MatterType::Organic => &self.organic,
        }
    }

    pub fn pool_mut(&mut self, matter: MatterType) -> &mut MatterPool {
        match matter {
            MatterType::Water => &mut self.water,
            MatterType::Organic => &mut self.organic,
        }
    }

    /// Matter of one type held outside its pool (body, waste, recycler)
    pub fn held_outside_pool(&self, matter: MatterType) -> i32 {
        self.body.holds(matter) + self.recycler.buffer(matter)
    }

    /// Conserved total of one matter type across every store
    pub fn matter_total(&self, matter: MatterType) -> i32 {
        let pool = self.pool(matter);
        pool.clean + pool.dirty + self.held_outside_pool(matter)
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).clamp(0, self.max_energy);
    }

    pub fn spend_energy(&mut self, amount: i32) -> Result<(), Refusal> {
        if self.energy < amount {
            return Err(Refusal::InsufficientEnergy {
                needed: amount,
                have: self.energy,
            });
        }
        self.energy -= amount;
        Ok(())
    }

    pub fn spend_credits(&mut self, amount: i64) -> Result<(), Refusal> {
        if self.credits < amount {
            return Err(Refusal::InsufficientCredits {
                needed: amount,
                have: self.credits,
            });
        }
        self.credits -= amount;
        Ok(())
    }

    /// Move clean matter from a pool into the body
    pub fn ingest(&mut self, matter: MatterType, amount: i32) -> Result<(), Refusal> {
        let pool = self.pool(matter);
        if pool.clean < amount {
            return Err(Refusal::InsufficientMatter {
                what: matter.name(),
                needed: amount,
                have: pool.clean,
            });
        }
        if self.body.fullness() + amount > MAX_BODY {
            return Err(Refusal::BodyTooFull);
        }
        self.pool_mut(matter).clean -= amount;
        match matter {
            MatterType::Water => self.body.body_water += amount,
            MatterType::Organic => self.body.body_organic += amount,
        }
        Ok(())
    }

    /// Empty the body's waste into the dirty pools
    pub fn flush_waste(&mut self) -> Result<(), Refusal> {
        if self.body.total_waste() == 0 {
            return Err(Refusal::NoWaste);
        }
        self.organic.dirty += self.body.waste_organic;
        self.water.dirty += self.body.waste_water;
        self.body.waste_organic = 0;
        self.body.waste_water = 0;
        Ok(())
    }

    /// Use clean water, returning it dirty
    pub fn wash(&mut self, amount: i32) -> Result<(), Refusal> {
        if self.water.clean < amount {
            return Err(Refusal::InsufficientMatter {
                what: MatterType::Water.name(),
                needed: amount,
                have: self.water.clean,
            });
        }
        self.water.clean -= amount;
        self.water.dirty += amount;
        Ok(())
    }

    /// Destroy up to `amount` dirty organics; returns the units burned
    pub fn incinerate(&mut self, amount: i32) -> Result<i32, Refusal> {
        let burned = self.organic.dirty.min(amount);
        if burned == 0 {
            return Err(Refusal::NothingToBurn);
        }
        self.organic.dirty -= burned;
        Ok(burned)
    }

    /// Add clean matter from an external source, bounded by free capacity
    pub fn receive_clean(&mut self, matter: MatterType, amount: i32) -> i32 {
        let held = self.held_outside_pool(matter);
        let pool = self.pool_mut(matter);
        let added = amount.min(pool.room(held));
        pool.clean += added;
        added
    }

    /// Station top-off: fill every clean pool to capacity and recharge
    pub fn refill(&mut self) {
        for matter in [MatterType::Water, MatterType::Organic] {
            let held = self.held_outside_pool(matter);
            let pool = self.pool_mut(matter);
            pool.clean += pool.room(held);
        }
        self.energy = self.max_energy;
    }

    pub fn repair_hull(&mut self, amount: i32) {
        self.hull = (self.hull + amount).clamp(0, self.max_hull);
    }

    /// Stow one unit, stacking onto a matching pad before using an empty one
    pub fn stow_cargo(&mut self, kind: CargoKind) -> Result<usize, Refusal> {
        let idx = self
            .cargo_pads
            .iter()
            .position(|p| p.kind == Some(kind) && p.count < PAD_CAPACITY)
            .or_else(|| self.cargo_pads.iter().position(CargoPad::is_empty))
            .ok_or(Refusal::NoCargoSpace)?;
        let pad = &mut self.cargo_pads[idx];
        pad.kind = Some(kind);
        pad.count += 1;
        Ok(idx)
    }

    /// Take one unit off a pad; an emptied pad forgets its kind
    pub fn unload_one(&mut self, pad_idx: usize) -> Result<CargoKind, Refusal> {
        let pad = self
            .cargo_pads
            .get_mut(pad_idx)
            .ok_or(Refusal::InvalidTarget)?;
        let kind = pad.kind.ok_or(Refusal::EmptyPad)?;
        pad.count -= 1;
        if pad.count == 0 {
            *pad = CargoPad::default();
        }
        Ok(kind)
    }

    /// Empty one pad entirely; returns what was on it
    pub fn clear_pad(&mut self, pad_idx: usize) -> Result<(CargoKind, u32), Refusal> {
        let pad = self
            .cargo_pads
            .get_mut(pad_idx)
            .ok_or(Refusal::InvalidTarget)?;
        let kind = pad.kind.ok_or(Refusal::EmptyPad)?;
        let count = pad.count;
        *pad = CargoPad::default();
        Ok((kind, count))
    }

    /// Empty every pad; returns the number of units lost
    pub fn clear_all_cargo(&mut self) -> u32 {
        let lost = self.cargo_pads.iter().map(|p| p.count).sum();
        self.cargo_pads.fill(CargoPad::default());
        lost
    }
}
