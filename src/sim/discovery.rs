//! Discovery bookkeeping
//!
//! Tracks first visits, first docks, star types seen and planet scans, plus
//! a short newest-first list of recent scans for the science console.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::world::rng::{self, SCAN_SALT};
use crate::world::{PlanetKind, StarType, StructureKind};

/// Number of recent scans to keep
pub const MAX_RECENT_SCANS: usize = 10;

/// Key of a scanned planet: (system index, object index)
pub type ScanKey = (usize, usize);

/// Results of scanning one planet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetScanData {
    pub system_idx: usize,
    pub object_idx: usize,
    pub name: String,
    pub kind: PlanetKind,
    pub hazard: String,
    pub resource: String,
    /// Point of interest detected on the surface, if any
    pub poi: Option<StructureKind>,
}

impl PlanetScanData {
    pub fn key(&self) -> ScanKey {
        (self.system_idx, self.object_idx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryLog {
    pub visited_systems: BTreeSet<usize>,
    pub docked_stations: BTreeSet<usize>,
    /// One bit per [`StarType`]
    pub star_types_seen: u8,
    #[serde(with = "scan_map")]
    scans: BTreeMap<ScanKey, PlanetScanData>,
    /// Newest first
    recent_scans: Vec<PlanetScanData>,
}

impl DiscoveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a system visit; true on the first visit
    pub fn visit_system(&mut self, idx: usize) -> bool {
        self.visited_systems.insert(idx)
    }

    /// Record a station dock; true on the first dock
    pub fn record_dock(&mut self, system_idx: usize) -> bool {
        self.docked_stations.insert(system_idx)
    }

    /// Mark a star type as seen; true the first time
    pub fn see_star_type(&mut self, star: StarType) -> bool {
        let bit = 1u8 << star as u8;
        let first = self.star_types_seen & bit == 0;
        self.star_types_seen |= bit;
        first
    }

    pub fn has_seen(&self, star: StarType) -> bool {
        self.star_types_seen & (1u8 << star as u8) != 0
    }

    pub fn is_scanned(&self, key: ScanKey) -> bool {
        self.scans.contains_key(&key)
    }

    pub fn scan(&self, key: ScanKey) -> Option<&PlanetScanData> {
        self.scans.get(&key)
    }

    pub fn scan_count(&self) -> usize {
        self.scans.len()
    }

    pub fn recent_scans(&self) -> &[PlanetScanData] {
        &self.recent_scans
    }

    /// Store a new scan. Returns false (and changes nothing) if the planet
    /// was already scanned.
    pub fn record_scan(&mut self, data: PlanetScanData) -> bool {
        let key = data.key();
        if self.scans.contains_key(&key) {
            return false;
        }
        self.recent_scans.insert(0, data.clone());
        self.recent_scans.truncate(MAX_RECENT_SCANS);
        self.scans.insert(key, data);
        true
    }
}

fn hazards(kind: PlanetKind) -> &'static [&'static str] {
    match kind {
        PlanetKind::Rocky => &["Seismic activity", "Thin atmosphere", "Dust storms"],
        PlanetKind::Ice => &["Cryogenic storms", "Crevasse fields", "Whiteout winds"],
        PlanetKind::Gas => &["Crushing pressure", "Lightning storms", "Toxic clouds"],
        PlanetKind::Volcanic => &["Lava flows", "Sulfur vents", "Ash storms"],
    }
}

fn resources(kind: PlanetKind) -> &'static [&'static str] {
    match kind {
        PlanetKind::Rocky => &["Iron deposits", "Silicates", "Rare metals"],
        PlanetKind::Ice => &["Water ice", "Frozen volatiles", "Deuterium"],
        PlanetKind::Gas => &["Helium-3", "Hydrogen", "Exotic gases"],
        PlanetKind::Volcanic => &["Sulfur", "Obsidian", "Heavy metals"],
    }
}

/// Structures a planet kind can host
pub fn poi_pool(kind: PlanetKind) -> &'static [StructureKind] {
    match kind {
        PlanetKind::Rocky => &[
            StructureKind::Ruins,
            StructureKind::MiningRig,
            StructureKind::Outpost,
        ],
        PlanetKind::Ice => &[
            StructureKind::ResearchLab,
            StructureKind::CrashSite,
            StructureKind::Outpost,
        ],
        PlanetKind::Gas => &[StructureKind::Outpost],
        PlanetKind::Volcanic => &[
            StructureKind::MiningRig,
            StructureKind::CrashSite,
            StructureKind::Ruins,
        ],
    }
}

/// Derive what a scan of planet `(system_idx, object_idx)` reveals. Pure in
/// the master seed, so scanning and landing agree on the point of interest.
pub fn survey_planet(
    master_seed: u64,
    system_idx: usize,
    object_idx: usize,
    name: &str,
    kind: PlanetKind,
) -> PlanetScanData {
    let mut rng = rng::stream(rng::derive_indexed(
        master_seed,
        SCAN_SALT,
        system_idx,
        object_idx,
    ));
    let hazard_pool = hazards(kind);
    let resource_pool = resources(kind);
    let hazard = hazard_pool[rng.random_range(0..hazard_pool.len())].to_string();
    let resource = resource_pool[rng.random_range(0..resource_pool.len())].to_string();
    let poi = if rng.random_bool(0.5) {
        let pool = poi_pool(kind);
        Some(pool[rng.random_range(0..pool.len())])
    } else {
        None
    };
    PlanetScanData {
        system_idx,
        object_idx,
        name: name.to_string(),
        kind,
        hazard,
        resource,
        poi,
    }
}

/// Scans serialize as a plain list; the key is recovered from each entry
mod scan_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{PlanetScanData, ScanKey};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<ScanKey, PlanetScanData>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ScanKey, PlanetScanData>, D::Error> {
        let scans = Vec::<PlanetScanData>::deserialize(deserializer)?;
        Ok(scans.into_iter().map(|s| (s.key(), s)).collect())
    }
}
