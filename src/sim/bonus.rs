//! Bonuses: timed pickups that grant the player a special pattern
//!
//! Five elemental kinds exist. Picking one up replaces the player's special
//! attack, tints the ship and adds health; the same amount is then paid per
//! special attack.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::Faction;
use super::collision::octagon;
use super::pattern::AttackPattern;
use super::strategy::{CrystalFan, ExplosiveBurst, FractalSquare, QuantumCircle, Spread};
use crate::color::Color;
use crate::consts::{BONUS_LIFETIME, BONUS_RADIUS, OCTAGON_SIDES};

/// Elemental bonus kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Void,
    Fire,
    Water,
    Earth,
    Wind,
}

impl BonusKind {
    pub const ALL: [BonusKind; 5] = [
        BonusKind::Void,
        BonusKind::Fire,
        BonusKind::Water,
        BonusKind::Earth,
        BonusKind::Wind,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            BonusKind::Void => "Void",
            BonusKind::Fire => "Fire",
            BonusKind::Water => "Water",
            BonusKind::Earth => "Earth",
            BonusKind::Wind => "Wind",
        }
    }

    /// Glyph drawn on the pickup
    pub fn symbol(self) -> char {
        match self {
            BonusKind::Void => '空',
            BonusKind::Fire => '火',
            BonusKind::Water => '水',
            BonusKind::Earth => '土',
            BonusKind::Wind => '風',
        }
    }

    pub fn color(self) -> Color {
        match self {
            BonusKind::Void => Color::WHITE,
            BonusKind::Fire => Color::RED,
            BonusKind::Water => Color::BLUE,
            BonusKind::Earth => Color::BROWN,
            BonusKind::Wind => Color::YELLOW,
        }
    }

    /// Health granted on pickup (and paid per special attack afterwards)
    pub fn health(self) -> i32 {
        match self {
            BonusKind::Void => 1,
            BonusKind::Fire => 2,
            BonusKind::Water => 3,
            BonusKind::Earth => 2,
            BonusKind::Wind => 4,
        }
    }

    /// Special attack granted on pickup
    pub fn pattern(self) -> AttackPattern {
        let player = Faction::Player;
        match self {
            BonusKind::Void => AttackPattern::new(0.2, 900.0, 12, player, Spread::new(Color::WHITE)),
            BonusKind::Fire => {
                AttackPattern::new(0.2, 900.0, 12, player, QuantumCircle::new(Color::RED, 0.3))
            }
            BonusKind::Water => {
                AttackPattern::new(0.2, 900.0, 1, player, FractalSquare::new(Color::BLUE, 3))
            }
            BonusKind::Earth => {
                AttackPattern::new(0.2, 900.0, 1, player, ExplosiveBurst::new(Color::BROWN))
            }
            BonusKind::Wind => {
                AttackPattern::new(0.2, 900.0, 1, player, CrystalFan::new(Color::YELLOW, 2))
            }
        }
    }
}

/// A pickup waiting in the arena
#[derive(Debug, Clone)]
pub struct Bonus {
    pub kind: BonusKind,
    pub pos: Vec2,
    pub lifetime: f32,
    pub time_left: f32,
}

impl Bonus {
    pub fn new(kind: BonusKind, pos: Vec2, lifetime: f32) -> Self {
        Self {
            kind,
            pos,
            lifetime,
            time_left: lifetime,
        }
    }

    pub fn with_default_lifetime(kind: BonusKind, pos: Vec2) -> Self {
        Self::new(kind, pos, BONUS_LIFETIME)
    }

    pub fn update(&mut self, dt: f32) {
        self.time_left -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.time_left <= 0.0
    }

    pub fn vertices(&self) -> [Vec2; OCTAGON_SIDES] {
        octagon(self.pos, BONUS_RADIUS)
    }
}

/// Gates bonus spawning: a concurrency cap plus a cooldown that re-arms the
/// spawn flag after a bonus leaves the arena
#[derive(Debug, Clone)]
pub struct BonusScheduler {
    pub max_concurrent: usize,
    pub cooldown: f32,
    timer: f32,
    can_spawn: bool,
}

impl BonusScheduler {
    pub fn new(max_concurrent: usize, cooldown: f32) -> Self {
        Self {
            max_concurrent,
            cooldown,
            timer: 0.0,
            can_spawn: false,
        }
    }

    /// Advance the cooldown. Returns `true` when a spawn should be attempted
    /// now; the cooldown restarts either way.
    pub fn tick(&mut self, dt: f32, active: usize) -> bool {
        if !self.can_spawn {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.can_spawn = true;
            }
        }
        if self.can_spawn && active < self.max_concurrent {
            self.can_spawn = false;
            self.timer = self.cooldown;
            return true;
        }
        false
    }

    /// A bonus expired or was collected
    pub fn bonus_removed(&mut self) {
        self.timer = self.cooldown;
        self.can_spawn = false;
    }

    pub fn can_spawn(&self) -> bool {
        self.can_spawn
    }

    pub fn remaining_cooldown(&self) -> f32 {
        self.timer.max(0.0)
    }
}
