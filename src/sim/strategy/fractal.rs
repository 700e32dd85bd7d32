//! Recursive strategies
//!
//! Depth is bounded by the value given at construction (clamped to
//! [`CrystalFan::MAX_DEPTH`] / [`FractalSquare::MAX_ITERATIONS`]). Pool
//! exhaustion cuts a volley short at any level.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{Emitter, Shooter, Volley};
use crate::color::Color;

/// Slowest generation still moves at this fraction of the volley speed
const MIN_SPEED_FACTOR: f32 = 0.1;

/// Fan toward the target where every branch spawns a wider, slower child fan
#[derive(Debug, Clone, PartialEq)]
pub struct CrystalFan {
    pub color: Color,
    pub depth: u32,
}

impl CrystalFan {
    pub const MAX_DEPTH: u32 = 3;
    const SPREAD: f32 = FRAC_PI_2;
    const CHILD_OFFSET: f32 = 50.0;

    pub fn new(color: Color, depth: u32) -> Self {
        Self {
            color,
            depth: depth.min(Self::MAX_DEPTH),
        }
    }

    /// Emit generation `generation` around `base`. Returns `false` on exhaustion.
    fn fan(&self, v: &Volley, out: &mut Emitter<'_>, pos: Vec2, base: Vec2, generation: u32) -> bool {
        let branches = 3 + generation * 2;
        let step = Self::SPREAD / (branches - 1) as f32;
        let factor = (0.8 - 0.2 * generation as f32).max(MIN_SPEED_FACTOR);
        let base_angle = base.to_angle();

        for i in 0..branches {
            let dir = Vec2::from_angle(base_angle - Self::SPREAD / 2.0 + step * i as f32);
            if !out.fire(pos, dir, v.speed * factor, self.color) {
                return false;
            }
            if generation < self.depth
                && !self.fan(v, out, pos + dir * Self::CHILD_OFFSET, dir, generation + 1)
            {
                return false;
            }
        }
        true
    }

    /// Bullets in one unobstructed volley
    pub fn volley_size(&self) -> usize {
        let mut total = 0;
        let mut parents = 1;
        for generation in 0..=self.depth {
            let bullets = parents * (3 + generation as usize * 2);
            total += bullets;
            parents = bullets;
        }
        total
    }
}

impl Shooter for CrystalFan {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        let base = v.aim();
        if base == Vec2::ZERO {
            return;
        }
        self.fan(v, out, v.origin, base, 0);
    }
}

/// Nested squares of outward bullets, each layer smaller, denser and slower
#[derive(Debug, Clone, PartialEq)]
pub struct FractalSquare {
    pub color: Color,
    pub iterations: u32,
}

impl FractalSquare {
    pub const MAX_ITERATIONS: u32 = 4;

    pub fn new(color: Color, iterations: u32) -> Self {
        Self {
            color,
            iterations: iterations.min(Self::MAX_ITERATIONS),
        }
    }

    /// Point `t` of the way along side `side` of a square with half-size `size`
    fn perimeter(side: u32, size: f32, t: f32) -> Vec2 {
        let sweep = -size + 2.0 * size * t;
        match side {
            0 => Vec2::new(sweep, -size),
            1 => Vec2::new(size, sweep),
            2 => Vec2::new(-sweep, size),
            _ => Vec2::new(-size, -sweep),
        }
    }
}

impl Shooter for FractalSquare {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for iteration in 0..=self.iterations {
            let per_side = 4 + iteration * 2;
            let size = 50.0 * 0.5f32.powi(iteration as i32);
            let factor = (1.0 - 0.2 * iteration as f32).max(MIN_SPEED_FACTOR);
            for side in 0..4 {
                for i in 0..per_side {
                    let t = i as f32 / (per_side - 1) as f32;
                    let offset = Self::perimeter(side, size, t);
                    if !out.fire(v.origin + offset, offset, v.speed * factor, self.color) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::AttackStrategy;
    use super::super::test_util::*;
    use super::*;
    use crate::sim::bullet::BulletPool;

    #[test]
    fn test_crystal_fan_generation_counts() {
        let fan = CrystalFan::new(Color::YELLOW, 2);
        assert_eq!(fan.volley_size(), 3 + 3 * 5 + 15 * 7);

        let mut strategy: AttackStrategy = fan.into();
        assert_eq!(fire(&mut strategy, &volley(1)).len(), 123);
    }

    #[test]
    fn test_crystal_fan_depth_is_clamped() {
        assert_eq!(CrystalFan::new(Color::YELLOW, 99).depth, CrystalFan::MAX_DEPTH);
    }

    #[test]
    fn test_crystal_fan_stops_at_exhaustion() {
        let mut strategy: AttackStrategy = CrystalFan::new(Color::YELLOW, 3).into();
        let mut pool = BulletPool::new(40);
        assert_eq!(strategy.shoot(&volley(1), &mut pool), 40);
    }

    #[test]
    fn test_crystal_fan_first_generation_centered_on_target() {
        let mut strategy: AttackStrategy = CrystalFan::new(Color::YELLOW, 0).into();
        let v = volley(1);
        let bullets = fire(&mut strategy, &v);
        assert_eq!(bullets.len(), 3);
        assert!((bullets[1].dir - v.aim()).length() < 1e-5);
        assert!((bullets[0].speed - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_fractal_square_layers() {
        let mut strategy: AttackStrategy = FractalSquare::new(Color::BLUE, 3).into();
        let v = volley(1);
        let bullets = fire(&mut strategy, &v);
        assert_eq!(bullets.len(), 4 * (4 + 6 + 8 + 10));

        // Outer layer sits on the 50-unit square and flies outward
        for b in &bullets[..16] {
            let offset = b.pos - v.origin;
            assert!((offset.x.abs().max(offset.y.abs()) - 50.0).abs() < 1e-3);
            assert!(b.dir.dot(offset) > 0.0);
        }
        let last = bullets.last().map(|b| b.speed).unwrap_or_default();
        assert!((last - 200.0 * 0.4).abs() < 1e-3);
    }
}
