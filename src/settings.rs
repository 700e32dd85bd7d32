//! Simulation tuning
//!
//! Loaded from a JSON file next to the level data. Every field has a default,
//! so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_BULLETS;
use crate::error::LoadError;

/// Distance constraints for placing a new enemy or bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Keep-out band along every arena edge
    pub buffer: f32,
    /// Fully random samples before giving up
    pub attempts: u32,
    /// Samples taken around a preferred position before falling back to random
    pub near_attempts: u32,
    /// Radius of the disc sampled around a preferred position
    pub near_radius: f32,
    pub min_player_distance: f32,
    pub min_enemy_distance: f32,
    pub min_bonus_distance: f32,
}

impl PlacementRules {
    /// Rules used for enemies
    pub const ENEMY: PlacementRules = PlacementRules {
        buffer: 120.0,
        attempts: 100,
        near_attempts: 20,
        near_radius: 200.0,
        min_player_distance: 300.0,
        min_enemy_distance: 100.0,
        min_bonus_distance: 100.0,
    };

    /// Rules used for bonuses (closer to enemies is fine)
    pub const BONUS: PlacementRules = PlacementRules {
        buffer: 100.0,
        attempts: 50,
        near_attempts: 0,
        near_radius: 0.0,
        min_player_distance: 300.0,
        min_enemy_distance: 50.0,
        min_bonus_distance: 100.0,
    };
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self::ENEMY
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Seed for spawn placement and random picks
    pub seed: u64,
    /// Bullet pool capacity
    pub pool_capacity: usize,
    /// Intro delay before the first wave can spawn (seconds)
    pub pre_battle_delay: f32,
    /// Interval between a wave clearing and the next one spawning when the
    /// wave itself doesn't specify one (seconds)
    pub wave_interval: f32,
    /// Cooldown before another bonus may spawn (seconds)
    pub bonus_spawn_cooldown: f32,
    /// Margin used for bullet expiry; negative expires bullets inside the arena
    pub bullet_expiry_margin: f32,
    pub enemy_placement: PlacementRules,
    pub bonus_placement: PlacementRules,
    /// Directory containing `level{N}.json`
    pub levels_dir: PathBuf,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_B011_E7,
            pool_capacity: MAX_BULLETS,
            pre_battle_delay: 45.0,
            wave_interval: 2.0,
            bonus_spawn_cooldown: 10.0,
            bullet_expiry_margin: crate::consts::BULLET_EXPIRY_MARGIN,
            enemy_placement: PlacementRules::ENEMY,
            bonus_placement: PlacementRules::BONUS,
            levels_dir: PathBuf::from("levels"),
        }
    }
}

impl SimSettings {
    /// Parse settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({err})");
                Self::default()
            }
        }
    }

    /// Settings with an explicit seed, everything else default
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}
