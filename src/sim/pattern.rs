//! Attack patterns: firing cadence bundled with one strategy

use glam::Vec2;

use super::bullet::{BulletPool, Faction};
use super::strategy::{AttackStrategy, Volley};

/// Firing configuration owned by a player, enemy or bonus.
///
/// Cadence fields never change after construction; the strategy keeps its own
/// phase between shots.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPattern {
    /// Seconds between shots
    pub shoot_interval: f32,
    pub bullet_speed: f32,
    pub bullets_per_shot: u32,
    pub faction: Faction,
    strategy: AttackStrategy,
}

impl AttackPattern {
    pub fn new(
        shoot_interval: f32,
        bullet_speed: f32,
        bullets_per_shot: u32,
        faction: Faction,
        strategy: impl Into<AttackStrategy>,
    ) -> Self {
        Self {
            shoot_interval: shoot_interval.max(0.0),
            bullet_speed,
            bullets_per_shot,
            faction,
            strategy: strategy.into(),
        }
    }

    /// Same cadence and strategy, fired by another faction
    pub fn for_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn strategy(&self) -> &AttackStrategy {
        &self.strategy
    }

    pub fn volley(&self, origin: Vec2, target: Vec2) -> Volley {
        Volley {
            origin,
            target,
            count: self.bullets_per_shot,
            speed: self.bullet_speed,
            faction: self.faction,
        }
    }

    /// Fire once from `origin` toward `target`. Returns the bullets emitted.
    pub fn fire(&mut self, origin: Vec2, target: Vec2, pool: &mut BulletPool) -> usize {
        let volley = self.volley(origin, target);
        self.strategy.shoot(&volley, pool)
    }
}
