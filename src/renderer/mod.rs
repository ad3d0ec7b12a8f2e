//! Render-facing snapshot
//!
//! A renderer never touches `Sim` directly. Between ticks it asks for a
//! [`Snapshot`]: borrowed views of everything drawable plus the camera offset
//! for its viewport. Signals are copied out; the caller clears them on `Sim`
//! once handled.

use glam::Vec2;

use crate::sim::{LogEntry, Needs, Resources, Sim, UiSignals};
use crate::tile::TileGrid;
use crate::world::SpaceObject;

/// Glyph drawn for the player
pub const PLAYER_GLYPH: char = '@';

pub struct Snapshot<'a> {
    pub tick: u64,
    pub location: String,
    pub grid: &'a TileGrid,
    /// Top-left tile of the viewport
    pub camera: (i32, i32),
    pub view: (i32, i32),
    pub player: (i32, i32),
    /// Objects of the current star system
    pub objects: &'a [SpaceObject],
    /// Sub-tile shuttle position in the current system
    pub shuttle: Option<Vec2>,
    pub resources: &'a Resources,
    pub needs: Needs,
    pub messages: &'a [LogEntry],
    pub signals: UiSignals,
    pub reserved_power: i32,
}

/// Offset that centres `focus` in a `view`-sized window, clamped so the
/// window stays inside a `world`-sized map. Maps smaller than the view pin
/// to the origin.
pub fn camera_offset(focus: (i32, i32), view: (i32, i32), world: (i32, i32)) -> (i32, i32) {
    let axis = |f: i32, v: i32, w: i32| (f - v / 2).clamp(0, (w - v).max(0));
    (axis(focus.0, view.0, world.0), axis(focus.1, view.1, world.1))
}

impl Sim {
    /// Drawable view for a `view_w` x `view_h` viewport with the last
    /// `recent` log lines
    pub fn snapshot(&self, view_w: i32, view_h: i32, recent: usize) -> Snapshot<'_> {
        let grid = self.grid();
        let world = (grid.width as i32, grid.height as i32);
        let map = self.current_map();
        Snapshot {
            tick: self.tick_count,
            location: self.location_name(),
            grid,
            camera: camera_offset(self.player, (view_w, view_h), world),
            view: (view_w, view_h),
            player: self.player,
            objects: map.map(|m| m.objects.as_slice()).unwrap_or_default(),
            shuttle: map.map(|m| m.shuttle.pos),
            resources: &self.resources,
            needs: self.needs,
            messages: self.log.recent(recent),
            signals: self.signals,
            reserved_power: self.ship.grid.reserved_power(),
        }
    }
}

impl Snapshot<'_> {
    /// Viewport as text rows, player drawn over the grid
    pub fn grid_rows(&self) -> Vec<String> {
        let (cx, cy) = self.camera;
        (cy..cy + self.view.1)
            .filter(|&y| y < self.grid.height as i32)
            .map(|y| {
                (cx..cx + self.view.0)
                    .filter(|&x| x < self.grid.width as i32)
                    .map(|x| {
                        if (x, y) == self.player {
                            PLAYER_GLYPH
                        } else {
                            self.grid.get(x, y).glyph()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// One-line status readout
    pub fn status_line(&self) -> String {
        let r = self.resources;
        format!(
            "T{} {} | E {}/{} | H2O {} | ORG {} | Hull {} | {} cr | Hun {} Thi {} Hyg {}",
            self.tick,
            self.location,
            r.energy,
            r.max_energy,
            r.water.clean,
            r.organic.clean,
            r.hull,
            r.credits,
            self.needs.hunger,
            self.needs.thirst,
            self.needs.hygiene
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ShipLayout;

    #[test]
    fn test_camera_centres_and_clamps() {
        assert_eq!(camera_offset((20, 12), (10, 6), (40, 25)), (15, 9));
        assert_eq!(camera_offset((1, 1), (10, 6), (40, 25)), (0, 0));
        assert_eq!(camera_offset((39, 24), (10, 6), (40, 25)), (30, 19));
        // Map narrower than the view
        assert_eq!(camera_offset((5, 5), (80, 40), (16, 9)), (0, 0));
    }

    #[test]
    fn test_snapshot_draws_player_on_deck() {
        let sim = Sim::aboard(3, &ShipLayout::builtin_shuttle().unwrap());
        let snap = sim.snapshot(80, 40, 5);
        let rows = snap.grid_rows();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0], "################");
        assert_eq!(rows[2].chars().nth(2), Some(PLAYER_GLYPH));
        assert!(snap.shuttle.is_some());
        assert!(!snap.objects.is_empty());
        assert_eq!(snap.messages.len(), 1);
        assert!(snap.status_line().contains("Wayfarer"));
    }

    #[test]
    fn test_snapshot_reports_reserved_power() {
        let mut sim = Sim::aboard(3, &ShipLayout::builtin_shuttle().unwrap());
        let base = sim.snapshot(20, 10, 0).reserved_power;
        sim.ship.grid.set_all_on(crate::tile::EquipmentKind::Engine, true);
        assert_eq!(sim.snapshot(20, 10, 0).reserved_power, base + 3);
    }
}
