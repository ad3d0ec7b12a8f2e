//! Station markets
//!
//! Created on first dock from a seed derived from the master seed and the
//! system index, then kept for the rest of the session.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::{self, STATION_SALT};
use crate::sim::matter::CargoKind;

const KINDS: usize = CargoKind::ALL.len();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationData {
    pub name: String,
    pub stock: [u32; KINDS],
    /// Price the player pays per unit
    pub buy_price: [i64; KINDS],
    /// Price the station pays per unit
    pub sell_price: [i64; KINDS],
}

impl StationData {
    pub fn generate(name: &str, master_seed: u64, system_idx: usize) -> Self {
        let mut rng = rng::stream(rng::derive_indexed(master_seed, STATION_SALT, system_idx, 0));
        let mut stock = [0; KINDS];
        let mut buy_price = [0; KINDS];
        let mut sell_price = [0; KINDS];
        for kind in CargoKind::ALL {
            let i = kind.index();
            // Roughly one kind in four is sold out
            stock[i] = if rng.random_bool(0.25) {
                0
            } else {
                rng.random_range(2..=12)
            };
            let markup = rng.random_range(80..=130);
            buy_price[i] = (kind.base_price() * markup / 100).max(1);
            let spread = rng.random_range(60..=85);
            sell_price[i] = (buy_price[i] * spread / 100).max(1);
        }
        Self {
            name: name.to_string(),
            stock,
            buy_price,
            sell_price,
        }
    }

    pub fn stock_of(&self, kind: CargoKind) -> u32 {
        self.stock[kind.index()]
    }

    pub fn buy_price_of(&self, kind: CargoKind) -> i64 {
        self.buy_price[kind.index()]
    }

    pub fn sell_price_of(&self, kind: CargoKind) -> i64 {
        self.sell_price[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_is_deterministic_per_system() {
        let a = StationData::generate("Vesta Station", 99, 3);
        let b = StationData::generate("Vesta Station", 99, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_station_never_buys_above_its_asking_price() {
        for idx in 0..20 {
            let station = StationData::generate("S", 7, idx);
            for kind in CargoKind::ALL {
                assert!(station.sell_price_of(kind) <= station.buy_price_of(kind));
                assert!(station.sell_price_of(kind) >= 1);
                assert!(station.stock_of(kind) <= 12);
            }
        }
    }
}
