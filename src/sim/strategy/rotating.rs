//! Strategies whose geometry turns a little on every call

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{Emitter, Shooter, Volley, ring_angle};
use crate::color::Color;
use crate::wrap_angle;

/// Ring with a color gradient; the whole ring advances by `spiral_speed` per call
#[derive(Debug, Clone, PartialEq)]
pub struct Spiral {
    pub spiral_speed: f32,
    pub radius_step: f32,
    pub start_color: Color,
    pub end_color: Color,
    pub angle_offset: f32,
}

impl Spiral {
    pub fn new(spiral_speed: f32, radius_step: f32, start_color: Color, end_color: Color) -> Self {
        Self {
            spiral_speed,
            radius_step,
            start_color,
            end_color,
            angle_offset: 0.0,
        }
    }
}

impl Shooter for Spiral {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..v.count {
            let angle = self.angle_offset + ring_angle(i, v.count);
            let radius = 1.0 + self.radius_step * i as f32;
            // Radius only scales the vector, the bullet gets the unit direction
            let dir = Vec2::new(angle.sin(), angle.cos()) * radius;
            let t = i as f32 / v.count as f32;
            let color = self.start_color.lerp(self.end_color, t);
            if !out.fire(v.origin, dir, v.speed, color) {
                break;
            }
        }
        self.angle_offset = wrap_angle(self.angle_offset + self.spiral_speed);
    }
}

/// Directions traced along an astroid (cos³, sin³)
#[derive(Debug, Clone, PartialEq)]
pub struct Astroid {
    pub speed_factor: f32,
    pub color: Color,
    pub angle_offset: f32,
}

impl Astroid {
    pub fn new(speed_factor: f32, color: Color) -> Self {
        Self {
            speed_factor,
            color,
            angle_offset: 0.0,
        }
    }
}

impl Shooter for Astroid {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..v.count {
            let theta = self.angle_offset + ring_angle(i, v.count);
            let dir = Vec2::new(theta.cos().powi(3), theta.sin().powi(3));
            if !out.fire(v.origin, dir, v.speed, self.color) {
                break;
            }
        }
        self.angle_offset = wrap_angle(self.angle_offset + self.speed_factor);
    }
}

/// Ring that creeps 2° per call, optionally laid out clockwise
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorSpiral {
    pub color: Color,
    pub mirror: bool,
    pub angle: f32,
}

impl MirrorSpiral {
    pub fn new(color: Color, mirror: bool) -> Self {
        Self {
            color,
            mirror,
            angle: 0.0,
        }
    }
}

impl Shooter for MirrorSpiral {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        let sign = if self.mirror { -1.0 } else { 1.0 };
        for i in 0..v.count {
            let dir = Vec2::from_angle(self.angle + sign * ring_angle(i, v.count));
            if !out.fire(v.origin, dir, v.speed, self.color) {
                break;
            }
        }
        self.angle = wrap_angle(self.angle + 2f32.to_radians());
    }
}

/// Plain ring rotated by `rotation_speed` radians per call
#[derive(Debug, Clone, PartialEq)]
pub struct RotatingLotus {
    pub color: Color,
    pub rotation_speed: f32,
    pub rotation: f32,
}

impl RotatingLotus {
    pub fn new(color: Color, rotation_speed: f32) -> Self {
        Self {
            color,
            rotation_speed,
            rotation: 0.0,
        }
    }
}

impl Shooter for RotatingLotus {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..v.count {
            let dir = Vec2::from_angle(ring_angle(i, v.count) + self.rotation);
            if !out.fire(v.origin, dir, v.speed, self.color) {
                break;
            }
        }
        self.rotation = wrap_angle(self.rotation + self.rotation_speed);
    }
}

/// Ring whose bullets are bent by a sine of their own angle
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub frequency: f32,
    pub amplitude: f32,
    pub color: Color,
    pub phase: f32,
}

impl Wave {
    pub fn new(frequency: f32, amplitude: f32, color: Color) -> Self {
        Self {
            frequency,
            amplitude,
            color,
            phase: 0.0,
        }
    }
}

impl Shooter for Wave {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        for i in 0..v.count {
            let angle = ring_angle(i, v.count) + self.phase;
            let bend = (angle * self.frequency).sin() * self.amplitude;
            if !out.fire(v.origin, Vec2::from_angle(angle + bend), v.speed, self.color) {
                break;
            }
        }
        // Not wrapped: the bend samples `phase * frequency`, which need not be 2π-periodic
        self.phase += 0.1;
    }
}

/// Fast forward-leaning thread whose bullets sway on a sine
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumThread {
    pub color_a: Color,
    pub color_b: Color,
    pub wave_speed: f32,
    pub phase: f32,
}

impl QuantumThread {
    pub fn new(color_a: Color, color_b: Color, wave_speed: f32) -> Self {
        Self {
            color_a,
            color_b,
            wave_speed,
            phase: 0.0,
        }
    }
}

impl Shooter for QuantumThread {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        self.phase = wrap_angle(self.phase + 0.02 * self.wave_speed);
        for i in 0..v.count {
            let t = i as f32 / v.count as f32;
            let sway = (self.phase + t * std::f32::consts::TAU).sin();
            let color = self.color_a.lerp(self.color_b, (sway + 1.0) / 2.0);
            if !out.fire(v.origin, Vec2::new(t, sway), v.speed * 1.5, color) {
                break;
            }
        }
    }
}

/// Inner ring, inward-flying outer ring and a spinning cross
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumVortex {
    pub core_color: Color,
    pub orbit_color: Color,
    /// Degrees per call
    pub rotation_speed: f32,
    pub rotation: f32,
}

/// One ring of a vortex volley
#[derive(Debug, Clone, Copy)]
struct VortexRing {
    radius: f32,
    count: u32,
    speed_factor: f32,
    inward: bool,
}

impl QuantumVortex {
    const CORE: VortexRing = VortexRing {
        radius: 50.0,
        count: 4,
        speed_factor: 1.0,
        inward: false,
    };
    const ORBIT: VortexRing = VortexRing {
        radius: 120.0,
        count: 12,
        speed_factor: 0.8,
        inward: true,
    };

    pub fn new(core_color: Color, orbit_color: Color, rotation_speed: f32) -> Self {
        Self {
            core_color,
            orbit_color,
            rotation_speed,
            rotation: 0.0,
        }
    }

    fn ring(&self, v: &Volley, out: &mut Emitter<'_>, ring: VortexRing, color: Color) -> bool {
        for i in 0..ring.count {
            let dir = Vec2::from_angle(ring_angle(i, ring.count) + self.rotation);
            let pos = v.origin + dir * ring.radius;
            let dir = if ring.inward { -dir } else { dir };
            if !out.fire(pos, dir, v.speed * ring.speed_factor, color) {
                return false;
            }
        }
        true
    }
}

impl Shooter for QuantumVortex {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        if self.ring(v, out, Self::CORE, self.core_color)
            && self.ring(v, out, Self::ORBIT, self.orbit_color)
        {
            for i in 0..4 {
                let angle = self.rotation * 2.0 + i as f32 * FRAC_PI_2;
                if !out.fire(v.origin, Vec2::from_angle(angle), v.speed * 1.2, self.core_color) {
                    break;
                }
            }
        }
        self.rotation = wrap_angle(self.rotation + self.rotation_speed.to_radians());
    }
}

/// Layered sphere: each layer wider, faster, dimmer and counter-rotating
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosSphere {
    pub base_color: Color,
    pub layers: u32,
    pub projectile_count: u32,
    pub rotation: f32,
}

impl ChaosSphere {
    pub fn new(base_color: Color, layers: u32, projectile_count: u32) -> Self {
        Self {
            base_color,
            layers,
            projectile_count,
            rotation: 0.0,
        }
    }

    fn layer_color(&self, layer: u32) -> Color {
        let ratio = layer as f32 / self.layers as f32;
        self.base_color
            .scaled(1.0 - ratio * 0.3, 1.0 - ratio * 0.5, 1.0 - ratio * 0.2)
    }
}

impl Shooter for ChaosSphere {
    fn shoot(&mut self, v: &Volley, out: &mut Emitter<'_>) {
        if self.layers > 0 {
            let per_layer = self.projectile_count / self.layers;
            'layers: for layer in 0..self.layers {
                let radius = 40.0 + 30.0 * layer as f32;
                let spin = if layer % 2 == 0 { self.rotation } else { -self.rotation };
                let speed = v.speed * (0.8 + 0.1 * layer as f32);
                let color = self.layer_color(layer);
                for i in 0..per_layer {
                    let dir = Vec2::from_angle(ring_angle(i, per_layer) + spin);
                    if !out.fire(v.origin + dir * radius, dir, speed, color) {
                        break 'layers;
                    }
                }
            }
        }
        self.rotation = wrap_angle(self.rotation + 2f32.to_radians());
    }
}
