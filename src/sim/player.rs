//! Player ship: movement, aiming, primary fire and the granted special attack

use glam::Vec2;
use log::debug;

use super::arena::Arena;
use super::bullet::{BulletPool, Faction};
use super::collision::arrow_triangle;
use super::pattern::AttackPattern;
use super::strategy::StraightLine;
use crate::color::Color;
use crate::consts::{
    PLAYER_HEALTH, PLAYER_SIZE, PLAYER_SPEED, PRIMARY_BULLET_SPEED, PRIMARY_FIRE_INTERVAL,
};

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Unit facing direction (toward the aim point)
    pub facing: Vec2,
    pub aim: Vec2,
    pub speed: f32,
    pub size: f32,
    pub health: i32,
    pub color: Color,
    /// Pattern fired by the special attack
    pub special: AttackPattern,
    /// Health paid per special attack
    pub special_cost: i32,
    /// Seconds the primary trigger has been held since the last shot
    pub fire_timer: f32,
}

impl Player {
    pub fn new(pos: Vec2, special: AttackPattern) -> Self {
        Self {
            pos,
            facing: Vec2::Y,
            aim: pos + Vec2::Y,
            speed: PLAYER_SPEED,
            size: PLAYER_SIZE,
            health: PLAYER_HEALTH,
            color: Color::WHITE,
            special,
            special_cost: 1,
            fire_timer: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Place the ship, kept inside the arena by half its size
    pub fn place(&mut self, pos: Vec2, arena: &Arena) {
        let half = self.size / 2.0;
        self.pos = match arena.inset(half) {
            Some(inner) => inner.clamp(pos),
            None => arena.center(),
        };
    }

    /// Move along `intent` (any length, normalized here) for `dt` seconds
    pub fn steer(&mut self, intent: Vec2, dt: f32, arena: &Arena) {
        let dir = intent.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.place(self.pos + dir * self.speed * dt, arena);
        }
    }

    /// Aim at a point (clamped into the arena); facing follows unless the
    /// point sits on the ship
    pub fn aim_at(&mut self, point: Vec2, arena: &Arena) {
        self.aim = arena.clamp(point);
        let facing = crate::direction_to(self.pos, self.aim);
        if facing != Vec2::ZERO {
            self.facing = facing;
        }
    }

    /// Primary weapon: while held, one fast bullet toward the aim point every
    /// [`PRIMARY_FIRE_INTERVAL`]. Releasing the trigger resets the timer.
    pub fn primary_fire(&mut self, held: bool, dt: f32, pool: &mut BulletPool) -> usize {
        if !held {
            self.fire_timer = 0.0;
            return 0;
        }
        self.fire_timer += dt;
        if self.fire_timer < PRIMARY_FIRE_INTERVAL {
            return 0;
        }
        self.fire_timer = 0.0;
        let mut shot = AttackPattern::new(
            PRIMARY_FIRE_INTERVAL,
            PRIMARY_BULLET_SPEED,
            1,
            Faction::Player,
            StraightLine::new(self.facing, self.color),
        );
        shot.fire(self.pos, self.aim, pool)
    }

    /// Fire the granted pattern, paying its health cost
    pub fn special_attack(&mut self, pool: &mut BulletPool) -> usize {
        self.health -= self.special_cost;
        let emitted = self.special.fire(self.pos, self.aim, pool);
        debug!(
            "Special attack {} emitted {emitted} bullets, health now {}",
            self.special.strategy().name(),
            self.health
        );
        emitted
    }

    /// Take a bonus: new special pattern, ship color and cost, plus its health
    pub fn grant(&mut self, pattern: AttackPattern, color: Color, health: i32) {
        self.special = pattern.for_faction(Faction::Player);
        self.color = color;
        self.special_cost = health;
        self.health += health;
    }

    pub fn vertices(&self) -> [Vec2; 3] {
        arrow_triangle(self.pos, self.facing, self.size, self.size)
    }
}
