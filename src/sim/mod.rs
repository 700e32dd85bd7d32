//! Frame-stepped simulation
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time only advances through the `dt` passed to `Battle::update`
//! - Seeded RNG only (owned by the spawn manager)
//! - Stable iteration order (entity lists keep insertion order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod battle;
pub mod bonus;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod level;
pub mod pattern;
pub mod patterns;
pub mod player;
pub mod snapshot;
pub mod spawn;
pub mod strategy;
pub mod wave;

pub use arena::Arena;
pub use battle::{Battle, BattleStats, FrameInput};
pub use bonus::{Bonus, BonusKind, BonusScheduler};
pub use bullet::{Bullet, BulletId, BulletPool, Faction};
pub use collision::{arrow_triangle, bullet_triangle, check_collision, octagon};
pub use enemy::Enemy;
pub use level::{LevelData, LevelLoader};
pub use pattern::AttackPattern;
pub use player::Player;
pub use snapshot::FrameSnapshot;
pub use spawn::{Occupancy, SpawnManager};
pub use strategy::{AttackStrategy, Emitter, Shooter, Volley};
pub use wave::{
    Banner, BattlePhase, BonusSpawn, EnemySpawn, SpawnAction, SpawnRequest, Wave, WaveDirector,
    WaveProcessor, WaveStack,
};
