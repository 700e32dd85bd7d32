//! Level files
//!
//! Levels are JSON documents named `level{N}.json` with PascalCase keys:
//!
//! ```json
//! {
//!   "LevelNumber": 1,
//!   "LevelName": "Awakening",
//!   "LevelNameColor": "Cyan",
//!   "MaxBonusCount": 1,
//!   "PlayerStart": { "Position": { "X": 960, "Y": 800 }, "Health": 8 },
//!   "Waves": [
//!     {
//!       "PreWaveDelay": 2.0,
//!       "WaveMessage": "Incoming",
//!       "Enemies": [
//!         { "Position": { "X": 700, "Y": 300 }, "PatternType": "Predefined", "PatternParams": { "Index": 0 } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Loading never fails from the caller's point of view: [`LevelLoader::load`]
//! substitutes a built-in fallback level and logs why.

use std::path::{Path, PathBuf};

use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bonus::BonusKind;
use super::wave::{Banner, BonusSpawn, EnemySpawn, SpawnAction, Wave};
use crate::color::{Color, ColorSpec};
use crate::consts::PLAYER_HEALTH;
use crate::error::LoadError;

/// `{ "X": .., "Y": .. }`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelPoint {
    #[serde(rename = "X", alias = "x")]
    pub x: f32,
    #[serde(rename = "Y", alias = "y")]
    pub y: f32,
}

impl From<LevelPoint> for Vec2 {
    fn from(p: LevelPoint) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for LevelPoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlayerStart {
    pub position: LevelPoint,
    pub health: i32,
}

impl Default for PlayerStart {
    fn default() -> Self {
        Self {
            position: LevelPoint { x: 640.0, y: 600.0 },
            health: PLAYER_HEALTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EnemySpawnData {
    /// Preferred position; placement searches around it first
    pub position: Option<LevelPoint>,
    /// Random when absent
    pub color: Option<ColorSpec>,
    pub pattern_type: String,
    pub pattern_params: Value,
}

impl Default for EnemySpawnData {
    fn default() -> Self {
        Self {
            position: None,
            color: None,
            pattern_type: "Predefined".to_string(),
            pattern_params: Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BonusSpawnData {
    /// Random when absent
    pub kind: Option<BonusKind>,
    pub position: Option<LevelPoint>,
}

/// Spawns that materialize together; groups nest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SpawnGroupData {
    pub enemies: Vec<EnemySpawnData>,
    pub bonuses: Vec<BonusSpawnData>,
    pub groups: Vec<SpawnGroupData>,
}

impl SpawnGroupData {
    /// Enemies first, then bonuses, then nested groups
    fn actions(&self) -> Vec<SpawnAction> {
        let enemies = self.enemies.iter().map(|e| {
            SpawnAction::Enemy(EnemySpawn {
                position: e.position.map(Vec2::from),
                color: e.color.as_ref().map(Color::from),
                pattern_type: e.pattern_type.clone(),
                pattern_params: e.pattern_params.clone(),
            })
        });
        let bonuses = self.bonuses.iter().map(|b| {
            SpawnAction::Bonus(BonusSpawn {
                kind: b.kind,
                position: b.position.map(Vec2::from),
            })
        });
        let groups = self.groups.iter().map(|g| SpawnAction::Group(g.actions()));
        enemies.chain(bonuses).chain(groups).collect()
    }

    fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.bonuses.is_empty() && self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WaveData {
    /// Wait after the previous wave clears; the global interval when absent
    pub pre_wave_delay: Option<f32>,
    pub wave_message: String,
    pub message_color: ColorSpec,
    #[serde(flatten)]
    pub spawns: SpawnGroupData,
}

impl Default for WaveData {
    fn default() -> Self {
        Self {
            pre_wave_delay: None,
            wave_message: String::new(),
            message_color: ColorSpec::from(Color::WHITE),
            spawns: SpawnGroupData::default(),
        }
    }
}

impl WaveData {
    pub fn to_wave(&self) -> Wave {
        let message = (!self.wave_message.is_empty()).then(|| Banner {
            text: self.wave_message.clone(),
            color: Color::from(&self.message_color),
        });
        Wave {
            pre_wave_delay: self.pre_wave_delay,
            message,
            actions: self.spawns.actions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LevelData {
    pub level_number: u32,
    pub level_name: String,
    pub level_name_color: ColorSpec,
    pub max_bonus_count: usize,
    /// Seconds a bonus stays on the field; global default when absent
    pub bonus_lifetime: Option<f32>,
    /// Seconds before another bonus may spawn; global default when absent
    pub bonus_spawn_cooldown: Option<f32>,
    pub waves: Vec<WaveData>,
    pub player_start: PlayerStart,
}

impl Default for LevelData {
    fn default() -> Self {
        Self {
            level_number: 1,
            level_name: "Void".to_string(),
            level_name_color: ColorSpec::from(Color::WHITE),
            max_bonus_count: 1,
            bonus_lifetime: None,
            bonus_spawn_cooldown: None,
            waves: Vec::new(),
            player_start: PlayerStart::default(),
        }
    }
}

impl LevelData {
    /// Built-in level used when a file is missing or unusable: one wave of
    /// two preset enemies that both prefer (0, 300)
    pub fn fallback(level_number: u32) -> Self {
        let enemy = EnemySpawnData {
            position: Some(LevelPoint { x: 0.0, y: 300.0 }),
            ..EnemySpawnData::default()
        };
        Self {
            level_number,
            waves: vec![WaveData {
                spawns: SpawnGroupData {
                    enemies: vec![enemy.clone(), enemy],
                    ..SpawnGroupData::default()
                },
                ..WaveData::default()
            }],
            ..Self::default()
        }
    }

    pub fn banner(&self) -> Banner {
        Banner {
            text: self.level_name.clone(),
            color: Color::from(&self.level_name_color),
        }
    }

    pub fn to_waves(&self) -> Vec<Wave> {
        self.waves.iter().map(WaveData::to_wave).collect()
    }

    /// Parse a level document
    pub fn from_json(json: &str, path: &Path) -> Result<Self, LoadError> {
        let level: LevelData = serde_json::from_str(json).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if level.waves.iter().all(|w| w.spawns.is_empty()) {
            return Err(LoadError::EmptyLevel(level.level_number));
        }
        Ok(level)
    }
}

/// Reads `level{N}.json` files from a directory
#[derive(Debug, Clone)]
pub struct LevelLoader {
    dir: PathBuf,
}

impl LevelLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, level_number: u32) -> PathBuf {
        self.dir.join(format!("level{level_number}.json"))
    }

    pub fn try_load(&self, level_number: u32) -> Result<LevelData, LoadError> {
        let path = self.path_for(level_number);
        let json = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        LevelData::from_json(&json, &path)
    }

    /// Load a level, substituting the fallback level on any error
    pub fn load(&self, level_number: u32) -> LevelData {
        match self.try_load(level_number) {
            Ok(level) => {
                info!(
                    "Loaded level {} \"{}\" ({} waves)",
                    level.level_number,
                    level.level_name,
                    level.waves.len()
                );
                level
            }
            Err(err) => {
                warn!("Using fallback level {level_number}: {err}");
                LevelData::fallback(level_number)
            }
        }
    }

    /// Check whether a level file exists
    pub fn has_level(&self, level_number: u32) -> bool {
        self.path_for(level_number).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "LevelNumber": 3,
        "LevelName": "Storm",
        "LevelNameColor": { "R": 10, "G": 20, "B": 30 },
        "MaxBonusCount": 2,
        "BonusLifetime": 12.0,
        "PlayerStart": { "Position": { "X": 900, "Y": 700 }, "Health": 5 },
        "Waves": [
            {
                "PreWaveDelay": 1.5,
                "WaveMessage": "First",
                "MessageColor": "Red",
                "Enemies": [
                    { "Position": { "X": 700, "Y": 300 }, "Color": "Cyan",
                      "PatternType": "QuantumThread", "PatternParams": { "WaveSpeed": 3 } },
                    { "PatternType": "Predefined" }
                ],
                "Groups": [ { "Bonuses": [ { "Kind": "Fire" } ] } ]
            },
            { "Enemies": [ {} ] }
        ]
    }"#;

    #[test]
    fn test_parse_full_level() {
        let level = LevelData::from_json(LEVEL, Path::new("level3.json")).unwrap();
        assert_eq!(level.level_number, 3);
        assert_eq!(level.max_bonus_count, 2);
        assert_eq!(level.bonus_lifetime, Some(12.0));
        assert_eq!(level.bonus_spawn_cooldown, None);
        assert_eq!(level.player_start.health, 5);
        assert_eq!(level.banner().color, Color::rgb(10, 20, 30));

        let waves = level.to_waves();
        assert_eq!(waves.len(), 2);
        let first = &waves[0];
        assert_eq!(first.pre_wave_delay, Some(1.5));
        assert_eq!(first.message.as_ref().map(|b| b.color), Some(Color::RED));
        assert_eq!(first.actions.len(), 3);
        match &first.actions[0] {
            SpawnAction::Enemy(e) => {
                assert_eq!(e.position, Some(Vec2::new(700.0, 300.0)));
                assert_eq!(e.color, Some(Color::CYAN));
                assert_eq!(e.pattern_type, "QuantumThread");
            }
            other => panic!("expected an enemy, got {other:?}"),
        }
        assert!(matches!(&first.actions[2], SpawnAction::Group(g) if g.len() == 1));

        // Second wave: all defaults
        assert_eq!(waves[1].pre_wave_delay, None);
        assert!(waves[1].message.is_none());
        match &waves[1].actions[0] {
            SpawnAction::Enemy(e) => assert_eq!(e.pattern_type, "Predefined"),
            other => panic!("expected an enemy, got {other:?}"),
        }
    }

    #[test]
    fn test_level_without_spawns_is_rejected() {
        let err = LevelData::from_json(r#"{ "LevelNumber": 9 }"#, Path::new("level9.json"));
        assert!(matches!(err, Err(LoadError::EmptyLevel(9))));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = LevelData::from_json("{ nope", Path::new("bad.json"));
        assert!(matches!(err, Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let loader = LevelLoader::new("/definitely/not/a/levels/dir");
        assert!(!loader.has_level(1));
        let level = loader.load(4);
        assert_eq!(level, LevelData::fallback(4));
        assert_eq!(level.level_number, 4);
        assert_eq!(level.player_start.position, LevelPoint { x: 640.0, y: 600.0 });
        assert_eq!(level.player_start.health, 8);
        assert_eq!(level.waves[0].spawns.enemies.len(), 2);
    }

    #[test]
    fn test_bundled_levels_parse() {
        let loader = LevelLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/levels"));
        for n in 1..=2 {
            let level = loader.try_load(n).unwrap();
            assert_eq!(level.level_number, n);
            assert!(!level.waves.is_empty());
        }
    }
}
