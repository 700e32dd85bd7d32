//! Static and lightly stateful strategies: lines, fans, bursts, rings

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec2;

use super::{Emitter, Shooter, Volley, ring_angle};
use crate::color::Color;
use crate::wrap_angle;

/// Every bullet along one fixed direction
#[derive(Debug, Clone, PartialEq)]
pub struct StraightLine {
    pub direction: Vec2,
    pub color: Color,
}

impl StraightLine {
    pub fn new(direction: Vec2, color: Color) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color,
        }
    }
}

impl Shooter for StraightLine {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for _ in 0..v.count {
            if !out.fire(v.origin, self.direction, v.speed, self.color) {
                break;
            }
        }
    }
}

/// Every bullet toward the target
#[derive(Debug, Clone, PartialEq)]
pub struct AimedLine {
    pub color: Color,
}

impl AimedLine {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Shooter for AimedLine {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        let dir = v.aim();
        if dir == Vec2::ZERO {
            return;
        }
        for _ in 0..v.count {
            if !out.fire(v.origin, dir, v.speed, self.color) {
                break;
            }
        }
    }
}

/// Fan evenly spread over a fixed arc centered on the target direction
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub color: Color,
    /// Total arc in radians
    pub arc: f32,
}

impl Spread {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            arc: FRAC_PI_2,
        }
    }

    pub fn with_arc(color: Color, arc: f32) -> Self {
        Self { color, arc }
    }

    /// Direction of bullet `i` out of `n` around `base`
    pub fn direction(&self, base: Vec2, i: u32, n: u32) -> Vec2 {
        if n < 2 {
            return base;
        }
        let step = self.arc / (n - 1) as f32;
        let angle = -self.arc / 2.0 + step * i as f32;
        Vec2::from_angle(angle).rotate(base).normalize_or_zero()
    }
}

impl Shooter for Spread {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        let base = v.aim();
        if base == Vec2::ZERO {
            return;
        }
        for i in 0..v.count {
            if !out.fire(v.origin, self.direction(base, i, v.count), v.speed, self.color) {
                break;
            }
        }
    }
}

/// Twelve slow bullets in a full ring, regardless of the requested count
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosiveBurst {
    pub color: Color,
}

impl ExplosiveBurst {
    pub const PARTICLES: u32 = 12;
    pub const SPEED_FACTOR: f32 = 0.7;

    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Shooter for ExplosiveBurst {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..Self::PARTICLES {
            let dir = Vec2::from_angle(ring_angle(i, Self::PARTICLES));
            if !out.fire(v.origin, dir, v.speed * Self::SPEED_FACTOR, self.color) {
                break;
            }
        }
    }
}

/// Five points plus five half-speed inner bullets; rotates each call
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub color: Color,
    pub rotation: f32,
}

impl Star {
    pub const POINTS: u32 = 5;

    pub fn new(color: Color, rotation: f32) -> Self {
        Self { color, rotation }
    }
}

impl Shooter for Star {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..Self::POINTS {
            let angle = self.rotation + ring_angle(i, Self::POINTS);
            if !out.fire(v.origin, Vec2::from_angle(angle), v.speed, self.color) {
                break;
            }
            let inner = Vec2::from_angle(angle + FRAC_PI_4);
            if !out.fire(v.origin, inner, v.speed * 0.5, self.color) {
                break;
            }
        }
        self.rotation = wrap_angle(self.rotation + 5f32.to_radians());
    }
}

/// Ring distorted by mismatched sine/cosine frequencies
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumCircle {
    pub color: Color,
    pub phase_shift: f32,
}

impl QuantumCircle {
    pub fn new(color: Color, phase_shift: f32) -> Self {
        Self { color, phase_shift }
    }
}

impl Shooter for QuantumCircle {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..v.count {
            let a = ring_angle(i, v.count);
            let dir = Vec2::new(
                (a * 3.0 + self.phase_shift).sin(),
                (a * 2.0 - self.phase_shift).cos(),
            );
            if !out.fire(v.origin, dir, v.speed, self.color) {
                break;
            }
        }
    }
}

/// Concentric petals: the shot is split across layers, each rotated and slower
#[derive(Debug, Clone, PartialEq)]
pub struct Lotus {
    pub color: Color,
    pub layers: u32,
    pub spread: f32,
}

impl Lotus {
    pub fn new(color: Color, layers: u32, spread: f32) -> Self {
        Self {
            color,
            layers,
            spread,
        }
    }
}

impl Shooter for Lotus {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        if self.layers == 0 {
            return;
        }
        let per_layer = v.count / self.layers;
        'layers: for layer in 0..self.layers {
            let offset = layer as f32 * FRAC_PI_4 + self.spread * layer as f32;
            let speed = v.speed * (1.0 - 0.1 * layer as f32);
            for i in 0..per_layer {
                let angle = TAU * i as f32 / per_layer as f32 + offset;
                if !out.fire(v.origin, Vec2::from_angle(angle), speed, self.color) {
                    break 'layers;
                }
            }
        }
    }
}
