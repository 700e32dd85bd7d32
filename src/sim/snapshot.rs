//! Read-only frame snapshot for renderers and tools
//!
//! Built once per frame after the update. Everything is copied out, so the
//! consumer can hold it across frames or serialize it.

use glam::Vec2;
use serde::Serialize;

use super::battle::Battle;
use super::bonus::BonusKind;
use super::bullet::Faction;
use super::wave::{Banner, BattlePhase};
use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub dir: Vec2,
    pub color: Color,
    pub faction: Faction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub color: Color,
    /// Hit pulse scale (1.0 at rest)
    pub scale: f32,
    pub health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BonusView {
    pub pos: Vec2,
    pub kind: BonusKind,
    pub symbol: char,
    pub color: Color,
    pub time_left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing: Vec2,
    pub aim: Vec2,
    pub size: f32,
    pub color: Color,
    pub health: i32,
    /// Bonus currently powering the special attack
    pub bonus: BonusKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub level_number: u32,
    pub phase: BattlePhase,
    pub pre_battle_remaining: f32,
    pub waves_remaining: usize,
    /// HUD label: name and color of the active bonus
    pub banner: Banner,
    pub level_title: Banner,
    pub wave_message: Option<Banner>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub bonuses: Vec<BonusView>,
    pub bullets: Vec<BulletView>,
}

impl FrameSnapshot {
    pub fn capture(battle: &Battle) -> Self {
        let player = battle.player();
        let director = battle.director();
        Self {
            level_number: battle.level_number(),
            phase: director.phase(),
            pre_battle_remaining: director.pre_battle_remaining(),
            waves_remaining: director.waves_remaining(),
            banner: battle.banner().clone(),
            level_title: battle.level_title(),
            wave_message: battle.wave_message().cloned(),
            player: PlayerView {
                pos: player.pos,
                facing: player.facing,
                aim: player.aim,
                size: player.size,
                color: player.color,
                health: player.health,
                bonus: battle.current_bonus(),
            },
            enemies: battle
                .enemies()
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    color: e.color,
                    scale: e.scale,
                    health: e.health,
                })
                .collect(),
            bonuses: battle
                .bonuses()
                .iter()
                .map(|b| BonusView {
                    pos: b.pos,
                    kind: b.kind,
                    symbol: b.kind.symbol(),
                    color: b.kind.color(),
                    time_left: b.time_left,
                })
                .collect(),
            bullets: battle
                .pool()
                .iter_active()
                .map(|(_, b)| BulletView {
                    pos: b.pos,
                    dir: b.dir,
                    color: b.color,
                    faction: b.faction,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
