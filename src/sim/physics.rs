//! Shuttle kinematics over a star system plane
//!
//! Sub-tile linear-drag model tuned for feel: thrust accelerates, drag bleeds
//! speed every tick, and speed is capped. The shuttle can never leave the
//! playable interior `[1, w-2] x [1, h-2]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SHUTTLE_ACCEL, SHUTTLE_DRAG, SHUTTLE_MAX_SPEED, VELOCITY_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipPhysics {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Last thrust direction (for drawing the nose)
    pub face_dx: i32,
    pub face_dy: i32,
    pub accel: f32,
    pub max_speed: f32,
    pub drag: f32,
}

impl ShipPhysics {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            face_dx: 1,
            face_dy: 0,
            accel: SHUTTLE_ACCEL,
            max_speed: SHUTTLE_MAX_SPEED,
            drag: SHUTTLE_DRAG,
        }
    }

    /// Advance one tick with thrust `(dx, dy)`, each in {-1, 0, 1}
    pub fn step(&mut self, dx: i32, dy: i32, width: i32, height: i32) {
        let (dx, dy) = (dx.signum(), dy.signum());
        if dx != 0 || dy != 0 {
            let mut thrust = Vec2::new(dx as f32, dy as f32) * self.accel;
            // Diagonal thrust keeps the same magnitude as straight thrust
            if dx != 0 && dy != 0 {
                thrust *= std::f32::consts::FRAC_1_SQRT_2;
            }
            self.vel += thrust;
            self.face_dx = dx;
            self.face_dy = dy;
        }

        self.vel *= self.drag;
        if self.vel.length() > self.max_speed {
            self.vel = self.vel.normalize() * self.max_speed;
        }
        self.pos += self.vel;

        if self.vel.x.abs() < VELOCITY_EPSILON {
            self.vel.x = 0.0;
        }
        if self.vel.y.abs() < VELOCITY_EPSILON {
            self.vel.y = 0.0;
        }

        let (max_x, max_y) = ((width - 2) as f32, (height - 2) as f32);
        if self.pos.x <= 1.0 || self.pos.x >= max_x {
            self.pos.x = self.pos.x.clamp(1.0, max_x);
            self.vel.x = 0.0;
        }
        if self.pos.y <= 1.0 || self.pos.y >= max_y {
            self.pos.y = self.pos.y.clamp(1.0, max_y);
            self.vel.y = 0.0;
        }
    }

    /// Nearest tile
    pub fn tile(&self) -> (i32, i32) {
        (self.pos.x.round() as i32, self.pos.y.round() as i32)
    }

    /// Speed as a percentage of the cap, 0..=100
    pub fn speed_pct(&self) -> u32 {
        ((self.vel.length() / self.max_speed * 100.0).floor() as u32).min(100)
    }

    /// Kill all momentum (docking, landing)
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: i32 = 320;
    const H: i32 = 160;

    #[test]
    fn test_straight_thrust_accelerates() {
        let mut ship = ShipPhysics::new(100.0, 80.0);
        ship.step(1, 0, W, H);
        assert!((ship.vel.x - SHUTTLE_ACCEL * SHUTTLE_DRAG).abs() < 1e-6);
        assert!(ship.pos.x > 100.0);
        assert_eq!(ship.vel.y, 0.0);
        assert_eq!((ship.face_dx, ship.face_dy), (1, 0));
    }

    #[test]
    fn test_diagonal_thrust_preserves_magnitude() {
        let mut straight = ShipPhysics::new(100.0, 80.0);
        let mut diagonal = ShipPhysics::new(100.0, 80.0);
        for _ in 0..10 {
            straight.step(1, 0, W, H);
            diagonal.step(1, 1, W, H);
        }
        assert!((straight.vel.length() - diagonal.vel.length()).abs() < 1e-5);
    }

    #[test]
    fn test_speed_is_capped() {
        let mut ship = ShipPhysics::new(10.0, 80.0);
        for _ in 0..2000 {
            ship.step(1, 0, W, H);
            assert!(ship.vel.length() <= SHUTTLE_MAX_SPEED + 1e-6);
        }
        assert!(ship.speed_pct() <= 100);
    }

    #[test]
    fn test_drag_brings_ship_to_rest() {
        let mut ship = ShipPhysics::new(100.0, 80.0);
        for _ in 0..30 {
            ship.step(0, 1, W, H);
        }
        for _ in 0..1000 {
            ship.step(0, 0, W, H);
        }
        assert_eq!(ship.vel, Vec2::ZERO);
        assert_eq!(ship.speed_pct(), 0);
    }

    #[test]
    fn test_edges_clamp_and_zero_velocity() {
        let mut ship = ShipPhysics::new(1.1, 1.1);
        ship.vel = Vec2::new(-0.2, -0.2);
        ship.step(-1, -1, W, H);
        assert_eq!(ship.pos, Vec2::new(1.0, 1.0));
        assert_eq!(ship.vel, Vec2::ZERO);

        let mut ship = ShipPhysics::new((W - 3) as f32, 80.0);
        for _ in 0..200 {
            ship.step(1, 0, W, H);
        }
        assert!(ship.pos.x <= (W - 2) as f32);
        assert_eq!(ship.tile().0, W - 2);
    }
}
