//! Tile grids and equipment
//!
//! Every map in the game (ship interior, prologue, planet surfaces) is a
//! dense row-major [`TileGrid`]. Reads outside the grid see [`TileKind::Void`]
//! and writes outside it are dropped, so generators never need bounds checks.

use serde::{Deserialize, Serialize};

/// Terrain of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Void,
    Floor,
    Wall,
    Door,
    Ground,
    Rock,
    Hazard,
    ShuttlePad,
}

impl TileKind {
    /// Whether the player can stand on this terrain
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            TileKind::Floor | TileKind::Door | TileKind::Ground | TileKind::ShuttlePad
        )
    }
}

/// How a piece of equipment draws energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerMode {
    None,
    /// Draws `power_cost` continuously while on (counted in reserved power)
    Constant,
    /// Spends `power_cost` each time it is used
    OnUse,
}

/// Equipment types, including surface-only objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentKind {
    Bed,
    Viewscreen,
    NavConsole,
    PilotConsole,
    ScienceConsole,
    FoodStation,
    DrinkStation,
    Toilet,
    Shower,
    OrganicTank,
    MatterRecycler,
    WaterTank,
    Engine,
    PowerCell,
    Generator,
    FuelTank,
    JumpDrive,
    CargoTile,
    CargoTransporter,
    Locker,
    CargoConsole,
    Incinerator,
    Medical,
    // Surface objects
    Terminal,
    LootCrate,
    ObjectiveMarker,
    FuelCell,
    SpareParts,
    PowerPack,
}

impl EquipmentKind {
    /// Map a ship layout character to an equipment kind
    pub fn from_layout_char(c: char) -> Option<Self> {
        use EquipmentKind::*;
        Some(match c {
            'b' => Bed,
            'V' => Viewscreen,
            'N' => NavConsole,
            'P' => PilotConsole,
            'S' => ScienceConsole,
            'F' => FoodStation,
            'D' => DrinkStation,
            't' => Toilet,
            's' => Shower,
            'G' => OrganicTank,
            'r' => MatterRecycler,
            'W' => WaterTank,
            'E' => Engine,
            'p' => PowerCell,
            'g' => Generator,
            'f' => FuelTank,
            'J' => JumpDrive,
            'c' => CargoTile,
            'x' => CargoTransporter,
            'L' => Locker,
            'C' => CargoConsole,
            'I' => Incinerator,
            'M' => Medical,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        use EquipmentKind::*;
        match self {
            Bed => "Bed",
            Viewscreen => "Viewscreen",
            NavConsole => "Nav console",
            PilotConsole => "Pilot console",
            ScienceConsole => "Science console",
            FoodStation => "Food station",
            DrinkStation => "Drink station",
            Toilet => "Toilet",
            Shower => "Shower",
            OrganicTank => "Organic tank",
            MatterRecycler => "Matter recycler",
            WaterTank => "Water tank",
            Engine => "Engine",
            PowerCell => "Power cell",
            Generator => "Generator",
            FuelTank => "Fuel tank",
            JumpDrive => "Jump drive",
            CargoTile => "Cargo pad",
            CargoTransporter => "Cargo transporter",
            Locker => "Locker",
            CargoConsole => "Cargo console",
            Incinerator => "Incinerator",
            Medical => "Medical bay",
            Terminal => "Terminal",
            LootCrate => "Supply crate",
            ObjectiveMarker => "Signal source",
            FuelCell => "Fuel cell",
            SpareParts => "Spare parts",
            PowerPack => "Power pack",
        }
    }

    /// Glyph drawn for this equipment
    pub fn glyph(self) -> char {
        use EquipmentKind::*;
        match self {
            Bed => 'b',
            Viewscreen => 'V',
            NavConsole => 'N',
            PilotConsole => 'P',
            ScienceConsole => 'S',
            FoodStation => 'F',
            DrinkStation => 'D',
            Toilet => 't',
            Shower => 's',
            OrganicTank => 'G',
            MatterRecycler => 'r',
            WaterTank => 'W',
            Engine => 'E',
            PowerCell => 'p',
            Generator => 'g',
            FuelTank => 'f',
            JumpDrive => 'J',
            CargoTile => 'c',
            CargoTransporter => 'x',
            Locker => 'L',
            CargoConsole => 'C',
            Incinerator => 'I',
            Medical => 'M',
            Terminal => 'T',
            LootCrate => '$',
            ObjectiveMarker => '!',
            FuelCell => '1',
            SpareParts => '2',
            PowerPack => '3',
        }
    }

    pub fn is_console(self) -> bool {
        matches!(
            self,
            EquipmentKind::NavConsole
                | EquipmentKind::PilotConsole
                | EquipmentKind::ScienceConsole
                | EquipmentKind::CargoConsole
        )
    }

    /// Equipment the player can switch on and off
    pub fn is_toggleable(self) -> bool {
        self.is_console()
            || matches!(
                self,
                EquipmentKind::Engine
                    | EquipmentKind::Generator
                    | EquipmentKind::MatterRecycler
                    | EquipmentKind::CargoTransporter
            )
    }

    /// Equipment that loses condition each time it is used
    pub fn wears_on_use(self) -> bool {
        self.is_console()
            || matches!(
                self,
                EquipmentKind::FoodStation
                    | EquipmentKind::DrinkStation
                    | EquipmentKind::Toilet
                    | EquipmentKind::Shower
                    | EquipmentKind::Incinerator
            )
    }

    /// Prologue parts needed to repair the shuttle
    pub fn is_shuttle_part(self) -> bool {
        matches!(
            self,
            EquipmentKind::FuelCell | EquipmentKind::SpareParts | EquipmentKind::PowerPack
        )
    }

    /// Default power mode, power cost and on-state for a freshly installed unit
    fn template(self) -> (PowerMode, i32, bool) {
        use EquipmentKind::*;
        match self {
            Engine => (PowerMode::Constant, 3, false),
            MatterRecycler => (PowerMode::Constant, 2, true),
            CargoTransporter => (PowerMode::Constant, 2, false),
            Viewscreen => (PowerMode::Constant, 1, true),
            Medical => (PowerMode::Constant, 1, true),
            Generator => (PowerMode::None, 0, true),
            NavConsole | PilotConsole | ScienceConsole | CargoConsole => {
                (PowerMode::OnUse, 1, true)
            }
            Incinerator => (PowerMode::OnUse, 1, true),
            Terminal => (PowerMode::None, 0, true),
            _ => (PowerMode::None, 0, false),
        }
    }
}

/// Condition at or above which equipment runs at full efficiency
pub const FULL_EFFICIENCY_CONDITION: i32 = 50;
/// Condition lost per use
pub const WEAR_PER_USE: i32 = 1;

/// An installed piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub kind: EquipmentKind,
    pub on: bool,
    pub power_mode: PowerMode,
    pub power_cost: i32,
    /// Wear level, 0 (broken) to 100 (pristine)
    pub condition: i32,
    pub efficiency: f32,
}

impl Equipment {
    pub fn new(kind: EquipmentKind) -> Self {
        let (power_mode, power_cost, on) = kind.template();
        Self {
            kind,
            on,
            power_mode,
            power_cost,
            condition: 100,
            efficiency: 1.0,
        }
    }

    /// Wear the unit down; condition saturates at 0
    pub fn degrade(&mut self, amount: i32) {
        self.set_condition(self.condition - amount);
    }

    /// Restore condition; saturates at 100
    pub fn repair(&mut self, amount: i32) {
        self.set_condition(self.condition + amount);
    }

    fn set_condition(&mut self, condition: i32) {
        self.condition = condition.clamp(0, 100);
        self.efficiency = if self.condition >= FULL_EFFICIENCY_CONDITION {
            1.0
        } else {
            0.5 + self.condition as f32 / 100.0
        };
    }
}

/// One cell of a map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub equipment: Option<Equipment>,
}

impl Tile {
    pub const VOID: Tile = Tile {
        kind: TileKind::Void,
        equipment: None,
    };

    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            equipment: None,
        }
    }

    pub fn with_equipment(kind: TileKind, equipment: EquipmentKind) -> Self {
        Self {
            kind,
            equipment: Some(Equipment::new(equipment)),
        }
    }

    /// Glyph for ASCII rendering (equipment wins over terrain)
    pub fn glyph(&self) -> char {
        if let Some(eq) = &self.equipment {
            return eq.kind.glyph();
        }
        match self.kind {
            TileKind::Void => ' ',
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Door => '+',
            TileKind::Ground => ',',
            TileKind::Rock => '^',
            TileKind::Hazard => '~',
            TileKind::ShuttlePad => '=',
        }
    }
}

/// Dense row-major tile map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with one terrain kind
    pub fn new(width: usize, height: usize, fill: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::new(fill); width * height],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Tile at (x, y); out-of-bounds reads return a void tile
    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::VOID, |i| self.tiles[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let i = self.index(x, y)?;
        Some(&mut self.tiles[i])
    }

    /// Overwrite a tile; out-of-bounds writes are ignored
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Change terrain, keeping any equipment in place
    pub fn set_kind(&mut self, x: i32, y: i32, kind: TileKind) {
        if let Some(tile) = self.get_mut(x, y) {
            tile.kind = kind;
        }
    }

    pub fn kind(&self, x: i32, y: i32) -> TileKind {
        self.get(x, y).kind
    }

    /// Walkability depends on terrain only; equipment never blocks
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.kind(x, y).is_walkable()
    }

    pub fn equipment(&self, x: i32, y: i32) -> Option<Equipment> {
        self.get(x, y).equipment
    }

    pub fn equipment_mut(&mut self, x: i32, y: i32) -> Option<&mut Equipment> {
        self.get_mut(x, y)?.equipment.as_mut()
    }

    pub fn place_equipment(&mut self, x: i32, y: i32, kind: EquipmentKind) {
        if let Some(tile) = self.get_mut(x, y) {
            tile.equipment = Some(Equipment::new(kind));
        }
    }

    pub fn take_equipment(&mut self, x: i32, y: i32) -> Option<Equipment> {
        self.get_mut(x, y)?.equipment.take()
    }

    /// Iterate `(x, y, tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| ((i % width) as i32, (i / width) as i32, t))
    }

    /// Positions of every instance of an equipment kind, row-major
    pub fn positions_of(&self, kind: EquipmentKind) -> Vec<(i32, i32)> {
        self.iter()
            .filter(|(_, _, t)| t.equipment.is_some_and(|e| e.kind == kind))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Positions of every tile of a terrain kind, row-major
    pub fn positions_of_kind(&self, kind: TileKind) -> Vec<(i32, i32)> {
        self.iter()
            .filter(|(_, _, t)| t.kind == kind)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    pub fn count_equipment(&self, kind: EquipmentKind) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.equipment.is_some_and(|e| e.kind == kind))
            .count()
    }

    /// Switch every instance of one kind on or off
    pub fn set_all_on(&mut self, kind: EquipmentKind, on: bool) {
        for eq in self.tiles.iter_mut().filter_map(|t| t.equipment.as_mut()) {
            if eq.kind == kind {
                eq.on = on;
            }
        }
    }

    /// Switch every toggleable unit (engines, generators, recyclers,
    /// transporters, consoles) on or off
    pub fn set_toggleables_on(&mut self, on: bool) {
        for eq in self.tiles.iter_mut().filter_map(|t| t.equipment.as_mut()) {
            if eq.kind.is_toggleable() {
                eq.on = on;
            }
        }
    }

    /// Whether any instance of `kind` is switched on
    pub fn any_on(&self, kind: EquipmentKind) -> bool {
        self.tiles
            .iter()
            .any(|t| t.equipment.is_some_and(|e| e.kind == kind && e.on))
    }

    /// Energy reserved by constant-draw equipment that is on
    pub fn reserved_power(&self) -> i32 {
        self.tiles
            .iter()
            .filter_map(|t| t.equipment)
            .filter(|e| e.on && e.power_mode == PowerMode::Constant)
            .map(|e| e.power_cost)
            .sum()
    }

    /// Restore every worn unit to full condition; returns how many needed it
    pub fn service_equipment(&mut self) -> usize {
        let mut serviced = 0;
        for eq in self.tiles.iter_mut().filter_map(|t| t.equipment.as_mut()) {
            if eq.condition < 100 {
                eq.repair(100);
                serviced += 1;
            }
        }
        serviced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_void_and_drops_writes() {
        let mut grid = TileGrid::new(4, 3, TileKind::Floor);
        assert_eq!(grid.kind(-1, 0), TileKind::Void);
        assert_eq!(grid.kind(4, 0), TileKind::Void);
        assert_eq!(grid.kind(0, 3), TileKind::Void);
        grid.set(10, 10, Tile::new(TileKind::Wall));
        assert!(grid.iter().all(|(_, _, t)| t.kind == TileKind::Floor));
    }

    #[test]
    fn test_walkability_ignores_equipment() {
        let mut grid = TileGrid::new(3, 1, TileKind::Floor);
        grid.place_equipment(1, 0, EquipmentKind::Generator);
        grid.set_kind(2, 0, TileKind::Rock);
        assert!(grid.is_walkable(1, 0));
        assert!(!grid.is_walkable(2, 0));
        for kind in [TileKind::Floor, TileKind::Door, TileKind::Ground, TileKind::ShuttlePad] {
            assert!(kind.is_walkable());
        }
        for kind in [TileKind::Void, TileKind::Wall, TileKind::Rock, TileKind::Hazard] {
            assert!(!kind.is_walkable());
        }
    }

    #[test]
    fn test_reserved_power_counts_only_constant_on() {
        let mut grid = TileGrid::new(5, 1, TileKind::Floor);
        grid.place_equipment(0, 0, EquipmentKind::MatterRecycler); // constant 2, on
        grid.place_equipment(1, 0, EquipmentKind::Engine); // constant 3, off
        grid.place_equipment(2, 0, EquipmentKind::NavConsole); // on-use
        assert_eq!(grid.reserved_power(), 2);

        grid.set_all_on(EquipmentKind::Engine, true);
        assert_eq!(grid.reserved_power(), 5);

        grid.set_toggleables_on(false);
        assert_eq!(grid.reserved_power(), 0);
        assert!(!grid.any_on(EquipmentKind::NavConsole));
    }

    #[test]
    fn test_count_and_positions() {
        let mut grid = TileGrid::new(4, 2, TileKind::Floor);
        grid.place_equipment(3, 0, EquipmentKind::CargoTile);
        grid.place_equipment(1, 1, EquipmentKind::CargoTile);
        assert_eq!(grid.count_equipment(EquipmentKind::CargoTile), 2);
        assert_eq!(grid.positions_of(EquipmentKind::CargoTile), vec![(3, 0), (1, 1)]);
    }

    #[test]
    fn test_condition_and_efficiency() {
        let mut eq = Equipment::new(EquipmentKind::MatterRecycler);
        eq.degrade(30);
        assert_eq!(eq.condition, 70);
        assert!((eq.efficiency - 1.0).abs() < f32::EPSILON);

        eq.degrade(50);
        assert_eq!(eq.condition, 20);
        assert!((eq.efficiency - 0.7).abs() < 1e-6);

        eq.degrade(500);
        assert_eq!(eq.condition, 0);
        assert!((eq.efficiency - 0.5).abs() < 1e-6);

        eq.repair(1000);
        assert_eq!(eq.condition, 100);
        assert!((eq.efficiency - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_service_restores_worn_units() {
        let mut grid = TileGrid::new(4, 1, TileKind::Floor);
        grid.place_equipment(0, 0, EquipmentKind::Toilet);
        grid.place_equipment(2, 0, EquipmentKind::Shower);
        grid.equipment_mut(0, 0).unwrap().degrade(60);
        assert_eq!(grid.service_equipment(), 1);
        assert_eq!(grid.equipment(0, 0).map(|e| e.condition), Some(100));
        assert_eq!(grid.service_equipment(), 0);
    }

    #[test]
    fn test_layout_chars_round_trip_through_glyph() {
        for c in "bVNPSFDtsGrWEpgfJcxLCIM".chars() {
            let kind = EquipmentKind::from_layout_char(c).expect("known layout char");
            assert_eq!(kind.glyph(), c);
        }
        assert_eq!(EquipmentKind::from_layout_char('?'), None);
    }
}
