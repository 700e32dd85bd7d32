//! Enemies: a position, some health and a pattern on a cooldown

use std::f32::consts::PI;

use glam::Vec2;

use super::bullet::BulletPool;
use super::collision::octagon;
use super::pattern::AttackPattern;
use crate::color::Color;
use crate::consts::{
    ENEMY_HEALTH, ENEMY_RADIUS, HIT_ANIMATION_DURATION, HIT_MAX_SCALE, OCTAGON_SIDES,
};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub health: i32,
    pub color: Color,
    pub pattern: AttackPattern,
    /// Counts down to the next shot
    pub shoot_timer: f32,
    /// Remaining hit-pulse time
    hit_timer: f32,
    /// Visual pulse after a hit (1.0 at rest)
    pub scale: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, pattern: AttackPattern, color: Color) -> Self {
        Self {
            pos,
            health: ENEMY_HEALTH,
            color,
            shoot_timer: pattern.shoot_interval,
            pattern,
            hit_timer: 0.0,
            scale: 1.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Advance cooldown and hit pulse; fire at `target` when the cooldown runs
    /// out. Returns the bullets emitted this step.
    pub fn update(&mut self, dt: f32, target: Vec2, pool: &mut BulletPool) -> usize {
        self.animate(dt);
        self.shoot_timer -= dt;
        if self.shoot_timer > 0.0 {
            return 0;
        }
        self.shoot_timer = self.pattern.shoot_interval;
        self.pattern.fire(self.pos, target, pool)
    }

    /// Take `damage` and restart the hit pulse
    pub fn hit(&mut self, damage: i32) {
        self.health -= damage;
        self.hit_timer = HIT_ANIMATION_DURATION;
    }

    fn animate(&mut self, dt: f32) {
        if self.hit_timer > 0.0 {
            self.hit_timer = (self.hit_timer - dt).max(0.0);
            let progress = self.hit_timer / HIT_ANIMATION_DURATION;
            self.scale = 1.0 + (HIT_MAX_SCALE - 1.0) * (progress * PI).sin();
        } else {
            self.scale = 1.0;
        }
    }

    pub fn vertices(&self) -> [Vec2; OCTAGON_SIDES] {
        octagon(self.pos, ENEMY_RADIUS)
    }
}
