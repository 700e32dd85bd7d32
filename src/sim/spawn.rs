//! Spawn manager: placement under distance constraints and materialization of
//! declarative spawns into entities
//!
//! The manager never holds the entity collections. Callers pass a read-only
//! [`Occupancy`] view and receive the new entity back, so structural mutation
//! stays with whoever owns the lists.

use std::f32::consts::TAU;

use glam::Vec2;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::bonus::{Bonus, BonusKind};
use super::enemy::Enemy;
use super::patterns;
use super::wave::{BonusSpawn, EnemySpawn};
use crate::color::Color;
use crate::polar_to_cartesian;
use crate::settings::PlacementRules;

/// Everything a new entity must keep its distance from
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub player: Vec2,
    pub enemies: &'a [Enemy],
    pub bonuses: &'a [Bonus],
}

#[derive(Debug, Clone)]
pub struct SpawnManager {
    rng: Pcg32,
    arena: Arena,
    enemy_rules: PlacementRules,
    bonus_rules: PlacementRules,
}

impl SpawnManager {
    pub fn new(
        seed: u64,
        arena: Arena,
        enemy_rules: PlacementRules,
        bonus_rules: PlacementRules,
    ) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            arena,
            enemy_rules,
            bonus_rules,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Bright-ish random color (each channel in 50..=255)
    pub fn random_color(&mut self) -> Color {
        Color::rgb(
            self.rng.random_range(50..=255),
            self.rng.random_range(50..=255),
            self.rng.random_range(50..=255),
        )
    }

    /// Check a candidate against the arena buffer and every distance rule
    pub fn is_valid(&self, rules: &PlacementRules, pos: Vec2, occ: &Occupancy<'_>) -> bool {
        let Some(area) = self.arena.inset(rules.buffer) else {
            return false;
        };
        area.contains(pos)
            && pos.distance(occ.player) >= rules.min_player_distance
            && occ
                .enemies
                .iter()
                .all(|e| pos.distance(e.pos) >= rules.min_enemy_distance)
            && occ
                .bonuses
                .iter()
                .all(|b| pos.distance(b.pos) >= rules.min_bonus_distance)
    }

    /// Search for a valid position.
    ///
    /// With a preferred position, the position itself (clamped into the
    /// buffered arena) is tried first, then `near_attempts` samples within
    /// `near_radius` of it. After that, `attempts` uniform samples over the
    /// buffered arena. `None` once the budget is spent.
    pub fn find_position(
        &mut self,
        rules: &PlacementRules,
        preferred: Option<Vec2>,
        occ: &Occupancy<'_>,
    ) -> Option<Vec2> {
        let area = self.arena.inset(rules.buffer)?;

        if let Some(preferred) = preferred {
            let exact = area.clamp(preferred);
            if self.is_valid(rules, exact, occ) {
                return Some(exact);
            }
            for _ in 0..rules.near_attempts {
                let radius = self.rng.random_range(0.0..=rules.near_radius.max(0.0));
                let angle = self.rng.random_range(0.0..TAU);
                let candidate = area.clamp(preferred + polar_to_cartesian(radius, angle));
                if self.is_valid(rules, candidate, occ) {
                    return Some(candidate);
                }
            }
        }

        for _ in 0..rules.attempts {
            let candidate = Vec2::new(
                self.rng.random_range(area.left..=area.right()),
                self.rng.random_range(area.top..=area.bottom()),
            );
            if self.is_valid(rules, candidate, occ) {
                return Some(candidate);
            }
        }
        None
    }

    /// Materialize an enemy; `None` if no valid position was found
    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn, occ: &Occupancy<'_>) -> Option<Enemy> {
        let rules = self.enemy_rules;
        let Some(pos) = self.find_position(&rules, spawn.position, occ) else {
            warn!(
                "No valid position for {} enemy after {} attempts",
                spawn.pattern_type,
                rules.near_attempts + rules.attempts
            );
            return None;
        };
        let pattern = patterns::resolve(&spawn.pattern_type, &spawn.pattern_params, &mut self.rng);
        let color = match spawn.color {
            Some(color) => color,
            None => self.random_color(),
        };
        debug!(
            "Spawned {} enemy at ({:.0}, {:.0})",
            pattern.strategy().name(),
            pos.x,
            pos.y
        );
        Some(Enemy::new(pos, pattern, color))
    }

    /// Materialize a declared bonus; `None` if no valid position was found
    pub fn spawn_bonus(
        &mut self,
        spawn: &BonusSpawn,
        lifetime: f32,
        occ: &Occupancy<'_>,
    ) -> Option<Bonus> {
        let kind = match spawn.kind {
            Some(kind) => kind,
            None => BonusKind::random(&mut self.rng),
        };
        let rules = self.bonus_rules;
        let Some(pos) = self.find_position(&rules, spawn.position, occ) else {
            warn!("No valid position for {} bonus", kind.name());
            return None;
        };
        debug!("Spawned {} bonus at ({:.0}, {:.0})", kind.name(), pos.x, pos.y);
        Some(Bonus::new(kind, pos, lifetime))
    }

    /// Random kind at a random valid position
    pub fn random_bonus(&mut self, lifetime: f32, occ: &Occupancy<'_>) -> Option<Bonus> {
        self.spawn_bonus(
            &BonusSpawn {
                kind: None,
                position: None,
            },
            lifetime,
            occ,
        )
    }
}
