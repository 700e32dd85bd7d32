//! Strategies whose spawn radius or color breathes between calls

use glam::Vec2;

use super::{Emitter, Shooter, Volley, ring_angle};
use crate::color::Color;

/// Ring spawned on a radius that grows each call and snaps back (sawtooth 10..50)
#[derive(Debug, Clone, PartialEq)]
pub struct PulsingCircle {
    pub color: Color,
    pub pulse_speed: f32,
    pub radius: f32,
}

impl PulsingCircle {
    pub const MIN_RADIUS: f32 = 10.0;
    pub const MAX_RADIUS: f32 = 50.0;

    pub fn new(color: Color, pulse_speed: f32) -> Self {
        Self {
            color,
            pulse_speed,
            radius: Self::MIN_RADIUS,
        }
    }
}

impl Shooter for PulsingCircle {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..v.count {
            let dir = Vec2::from_angle(ring_angle(i, v.count));
            if !out.fire(v.origin + dir * self.radius, dir, v.speed, self.color) {
                break;
            }
        }
        self.radius += self.pulse_speed;
        if self.radius > Self::MAX_RADIUS {
            self.radius = Self::MIN_RADIUS;
        }
    }
}

/// Breathing 24-bullet ring plus an 8-bullet spinning impulse from the center
#[derive(Debug, Clone, PartialEq)]
pub struct PulsingQuantum {
    pub base_color: Color,
    pub pulse_speed: f32,
    pub radius_multiplier: f32,
    /// Advances 0.016 per call, never wrapped
    pub time: f32,
}

impl PulsingQuantum {
    const RING_BULLETS: u32 = 24;
    const IMPULSE_BULLETS: u32 = 8;
    const TIME_STEP: f32 = 0.016;

    pub fn new(base_color: Color, pulse_speed: f32, radius_multiplier: f32) -> Self {
        Self {
            base_color,
            pulse_speed,
            radius_multiplier,
            time: 0.0,
        }
    }

    /// Oscillation in [0, 1]
    pub fn pulse(&self) -> f32 {
        ((self.time * self.pulse_speed).sin() + 1.0) / 2.0
    }
}

impl Shooter for PulsingQuantum {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        self.time += Self::TIME_STEP;
        let pulse = self.pulse();
        let radius = 50.0 + 100.0 * pulse * self.radius_multiplier;

        let ring_color = self.base_color.with_alpha(0.3 + 0.7 * pulse);
        for i in 0..Self::RING_BULLETS {
            let dir = Vec2::from_angle(ring_angle(i, Self::RING_BULLETS) + self.time * 2.0);
            if !out.fire(v.origin + dir * radius, dir, v.speed * 0.8, ring_color) {
                return;
            }
        }

        let impulse_color = self.base_color.lerp(Color::WHITE, pulse);
        for i in 0..Self::IMPULSE_BULLETS {
            let dir = Vec2::from_angle(ring_angle(i, Self::IMPULSE_BULLETS) + self.time * 3.0);
            if !out.fire(v.origin, dir, v.speed * 1.2, impulse_color) {
                return;
            }
        }
    }
}

/// Sixteen-segment ring on a radius that sweeps 10..explosion_radius and back
#[derive(Debug, Clone, PartialEq)]
pub struct PulsingNova {
    pub color: Color,
    pub explosion_radius: f32,
    pub radius: f32,
    pub expanding: bool,
}

impl PulsingNova {
    pub const SEGMENTS: u32 = 16;
    pub const MIN_RADIUS: f32 = 10.0;
    const RADIUS_STEP: f32 = 3.0;

    pub fn new(color: Color, explosion_radius: f32) -> Self {
        Self {
            color,
            explosion_radius,
            radius: Self::MIN_RADIUS,
            expanding: true,
        }
    }
}

impl Shooter for PulsingNova {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..Self::SEGMENTS {
            let dir = Vec2::from_angle(ring_angle(i, Self::SEGMENTS));
            if !out.fire(v.origin + dir * self.radius, dir, v.speed, self.color) {
                break;
            }
        }

        self.radius += if self.expanding {
            Self::RADIUS_STEP
        } else {
            -Self::RADIUS_STEP
        };
        if self.radius > self.explosion_radius {
            self.expanding = false;
        }
        if self.radius < Self::MIN_RADIUS {
            self.expanding = true;
        }
    }
}
