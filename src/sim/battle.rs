//! Frame orchestrator
//!
//! [`Battle`] owns every entity collection and is the only place that adds or
//! removes entities. One [`Battle::update`] call advances the frame in a fixed
//! order:
//!
//! 1. Bonus expiry
//! 2. Bonus spawn cooldown
//! 3. Wave progression (may materialize a wave)
//! 4. Enemy cooldowns and firing
//! 5. Player vs bonus pickup
//! 6. Bullet pool cleanup
//! 7. Bullet movement, expiry and hits
//! 8. Player movement, aim and firing
//!
//! Bullets killed in step 7 stay in the pool until the next frame's cleanup.

use glam::Vec2;
use log::{debug, info};

use super::arena::Arena;
use super::bonus::{Bonus, BonusKind, BonusScheduler};
use super::bullet::{BulletId, BulletPool, Faction};
use super::collision::check_collision;
use super::enemy::Enemy;
use super::level::{LevelData, LevelLoader};
use super::player::Player;
use super::snapshot::FrameSnapshot;
use super::spawn::{Occupancy, SpawnManager};
use super::wave::{Banner, BattlePhase, SpawnRequest, Wave, WaveDirector};
use crate::consts::{BONUS_LIFETIME, OCTAGON_SIDES};
use crate::settings::SimSettings;

/// Player intent for one frame, already debounced by the input layer
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Movement direction (any length; zero to stand still)
    pub movement: Vec2,
    /// Aim point in arena coordinates
    pub aim: Vec2,
    pub fire_held: bool,
    pub special_pressed: bool,
    pub skip_intro: bool,
}

/// Running totals for the current level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattleStats {
    pub frames: u64,
    pub enemies_spawned: u32,
    pub enemies_destroyed: u32,
    pub bonuses_collected: u32,
    pub bonuses_expired: u32,
    pub player_hits: u32,
    pub bullets_cancelled: u32,
    pub bullets_fired: u64,
}

/// Bullet footprint captured before the hit pass
struct Shot {
    id: BulletId,
    shape: [Vec2; 3],
}

pub struct Battle {
    settings: SimSettings,
    arena: Arena,
    loader: LevelLoader,
    pool: BulletPool,
    spawner: SpawnManager,
    level: LevelData,
    player: Player,
    current_bonus: BonusKind,
    enemies: Vec<Enemy>,
    bonuses: Vec<Bonus>,
    director: WaveDirector,
    scheduler: BonusScheduler,
    bonus_lifetime: f32,
    /// HUD label: the bonus powering the special attack
    banner: Banner,
    wave_message: Option<Banner>,
    stats: BattleStats,
}

impl Battle {
    /// Battle in the default arena, starting on level 1 from the levels directory
    pub fn new(settings: SimSettings) -> Self {
        let loader = LevelLoader::new(settings.levels_dir.clone());
        let level = loader.load(1);
        Self::with_level(settings, Arena::default(), level)
    }

    /// Battle on an explicit arena and level (the loader still serves
    /// [`Battle::reset_level`])
    pub fn with_level(settings: SimSettings, arena: Arena, level: LevelData) -> Self {
        let loader = LevelLoader::new(settings.levels_dir.clone());
        let spawner = SpawnManager::new(
            settings.seed,
            arena,
            settings.enemy_placement,
            settings.bonus_placement,
        );
        let void = BonusKind::Void;
        let mut battle = Self {
            pool: BulletPool::new(settings.pool_capacity),
            player: Player::new(arena.center(), void.pattern()),
            current_bonus: void,
            enemies: Vec::new(),
            bonuses: Vec::new(),
            director: WaveDirector::new(Vec::new(), settings.pre_battle_delay, settings.wave_interval),
            scheduler: BonusScheduler::new(0, settings.bonus_spawn_cooldown),
            bonus_lifetime: BONUS_LIFETIME,
            banner: bonus_banner(void),
            wave_message: None,
            stats: BattleStats::default(),
            level: LevelData::default(),
            settings,
            arena,
            loader,
            spawner,
        };
        battle.load_level(level);
        battle
    }

    /// Load level `n` (or its fallback) and start it from the intro
    pub fn reset_level(&mut self, level_number: u32) {
        let level = self.loader.load(level_number);
        self.load_level(level);
    }

    /// Start `level` from the intro
    pub fn load_level(&mut self, level: LevelData) {
        self.enemies.clear();
        self.bonuses.clear();
        self.pool.force_cleanup();

        let start = &level.player_start;
        let void = BonusKind::Void;
        self.player = Player::new(start.position.into(), void.pattern());
        self.player.place(start.position.into(), &self.arena);
        self.player.grant(void.pattern(), void.color(), void.health());
        self.player.health = start.health;
        self.player.aim_at(self.arena.center(), &self.arena);
        self.current_bonus = void;
        self.banner = bonus_banner(void);
        self.wave_message = None;

        self.director = WaveDirector::new(
            level.to_waves(),
            self.settings.pre_battle_delay,
            self.settings.wave_interval,
        );
        self.scheduler = BonusScheduler::new(
            level.max_bonus_count,
            level
                .bonus_spawn_cooldown
                .unwrap_or(self.settings.bonus_spawn_cooldown),
        );
        self.bonus_lifetime = level.bonus_lifetime.unwrap_or(BONUS_LIFETIME);
        self.stats = BattleStats::default();

        info!(
            "Level {} \"{}\": {} waves, player at ({:.0}, {:.0}) with {} health",
            level.level_number,
            level.level_name,
            level.waves.len(),
            self.player.pos.x,
            self.player.pos.y,
            self.player.health
        );
        self.level = level;
    }

    /// End the intro now
    pub fn skip_pre_battle(&mut self) {
        self.director.skip_pre_battle();
    }

    /// Advance one frame
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        if !self.player.is_alive() {
            return;
        }
        self.stats.frames += 1;

        if self.director.phase() == BattlePhase::PreBattle {
            if input.skip_intro {
                self.skip_pre_battle();
            } else if let Some(wave) = self.director.update(dt, self.enemies.len()) {
                self.spawn_wave(wave);
            }
            return;
        }

        self.expire_bonuses(dt);
        self.tick_bonus_spawner(dt);
        if let Some(wave) = self.director.update(dt, self.enemies.len()) {
            self.spawn_wave(wave);
        }
        self.update_enemies(dt);
        self.collect_bonuses();
        self.pool.cleanup();
        self.pool.advance_all(dt);
        self.resolve_bullets();
        self.update_player(input, dt);
    }

    fn expire_bonuses(&mut self, dt: f32) {
        let before = self.bonuses.len();
        for bonus in &mut self.bonuses {
            bonus.update(dt);
        }
        self.bonuses.retain(|b| !b.is_expired());
        for _ in self.bonuses.len()..before {
            self.stats.bonuses_expired += 1;
            self.scheduler.bonus_removed();
        }
    }

    fn tick_bonus_spawner(&mut self, dt: f32) {
        if !self.scheduler.tick(dt, self.bonuses.len()) {
            return;
        }
        let occ = Occupancy {
            player: self.player.pos,
            enemies: &self.enemies,
            bonuses: &self.bonuses,
        };
        if let Some(bonus) = self.spawner.random_bonus(self.bonus_lifetime, &occ) {
            self.bonuses.push(bonus);
        }
    }

    fn spawn_wave(&mut self, wave: Wave) {
        if let Some(message) = &wave.message {
            info!("{}", message.text);
            self.wave_message = Some(message.clone());
        }
        for request in wave.requests() {
            let occ = Occupancy {
                player: self.player.pos,
                enemies: &self.enemies,
                bonuses: &self.bonuses,
            };
            match request {
                SpawnRequest::Enemy(spawn) => {
                    if let Some(enemy) = self.spawner.spawn_enemy(spawn, &occ) {
                        self.enemies.push(enemy);
                        self.stats.enemies_spawned += 1;
                    }
                }
                SpawnRequest::Bonus(spawn) => {
                    if let Some(bonus) = self.spawner.spawn_bonus(spawn, self.bonus_lifetime, &occ) {
                        self.bonuses.push(bonus);
                    }
                }
            }
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let target = self.player.pos;
        for enemy in &mut self.enemies {
            self.stats.bullets_fired += enemy.update(dt, target, &mut self.pool) as u64;
        }
    }

    fn collect_bonuses(&mut self) {
        let ship = self.player.vertices();
        let mut collected = Vec::new();
        self.bonuses.retain(|b| {
            let hit = check_collision(&ship, &b.vertices());
            if hit {
                collected.push(b.kind);
            }
            !hit
        });
        for kind in collected {
            self.player.grant(kind.pattern(), kind.color(), kind.health());
            self.current_bonus = kind;
            self.banner = bonus_banner(kind);
            self.scheduler.bonus_removed();
            self.stats.bonuses_collected += 1;
            info!(
                "Collected {} bonus, health now {}",
                kind.name(),
                self.player.health
            );
        }
    }

    /// Expiry, then player/enemy bullet cancellation, then hits on enemies
    /// and the player. Works from a snapshot of live bullets; everything hit
    /// is only marked dead.
    fn resolve_bullets(&mut self) {
        let margin = self.settings.bullet_expiry_margin;
        let mut player_shots = Vec::new();
        let mut enemy_shots = Vec::new();
        let mut expired = Vec::new();
        for (id, bullet) in self.pool.iter_active() {
            if self.arena.is_outside(bullet.pos, margin) {
                expired.push(id);
                continue;
            }
            let shot = Shot {
                id,
                shape: bullet.vertices(),
            };
            match bullet.faction {
                Faction::Player => player_shots.push(shot),
                Faction::Enemy => enemy_shots.push(shot),
            }
        }
        for id in expired {
            self.pool.kill(id);
        }

        // Player bullets cancel enemy bullets one for one
        let mut enemy_shot_live = vec![true; enemy_shots.len()];
        player_shots.retain(|p| {
            let hit = enemy_shots
                .iter()
                .enumerate()
                .find(|(j, e)| enemy_shot_live[*j] && check_collision(&p.shape, &e.shape))
                .map(|(j, _)| j);
            match hit {
                Some(j) => {
                    enemy_shot_live[j] = false;
                    self.pool.kill(p.id);
                    self.pool.kill(enemy_shots[j].id);
                    self.stats.bullets_cancelled += 1;
                    false
                }
                None => true,
            }
        });

        let enemy_shapes: Vec<[Vec2; OCTAGON_SIDES]> =
            self.enemies.iter().map(Enemy::vertices).collect();
        for shot in &player_shots {
            let target = self
                .enemies
                .iter_mut()
                .zip(&enemy_shapes)
                .find(|(e, shape)| !e.is_dead() && check_collision(&shot.shape, &shape[..]));
            if let Some((enemy, _)) = target {
                enemy.hit(1);
                self.pool.kill(shot.id);
            }
        }

        let ship = self.player.vertices();
        for (shot, live) in enemy_shots.iter().zip(enemy_shot_live) {
            if live && check_collision(&shot.shape, &ship) {
                self.player.health -= 1;
                self.pool.kill(shot.id);
                self.stats.player_hits += 1;
            }
        }

        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_dead());
        let destroyed = (before - self.enemies.len()) as u32;
        if destroyed > 0 {
            self.stats.enemies_destroyed += destroyed;
            debug!("{destroyed} enemies destroyed, {} left", self.enemies.len());
        }
        if !self.player.is_alive() {
            info!("Player destroyed on level {}", self.level.level_number);
        }
    }

    fn update_player(&mut self, input: &FrameInput, dt: f32) {
        if !self.player.is_alive() {
            return;
        }
        self.player.steer(input.movement, dt, &self.arena);
        self.player.aim_at(input.aim, &self.arena);
        let mut fired = self.player.primary_fire(input.fire_held, dt, &mut self.pool);
        if input.special_pressed {
            fired += self.player.special_attack(&mut self.pool);
        }
        self.stats.bullets_fired += fired as u64;
    }

    pub fn is_level_complete(&self) -> bool {
        self.director.is_complete()
    }

    pub fn is_player_alive(&self) -> bool {
        self.player.is_alive()
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// Latest wave message, if any wave declared one
    pub fn wave_message(&self) -> Option<&Banner> {
        self.wave_message.as_ref()
    }

    pub fn level_title(&self) -> Banner {
        self.level.banner()
    }

    pub fn level_number(&self) -> u32 {
        self.level.level_number
    }

    pub fn phase(&self) -> BattlePhase {
        self.director.phase()
    }

    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn current_bonus(&self) -> BonusKind {
        self.current_bonus
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn pool(&self) -> &BulletPool {
        &self.pool
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn stats(&self) -> &BattleStats {
        &self.stats
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }
}

fn bonus_banner(kind: BonusKind) -> Banner {
    Banner {
        text: kind.name().to_string(),
        color: kind.color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::sim::level::{
        EnemySpawnData, LevelPoint, PlayerStart, SpawnGroupData, WaveData,
    };
    use crate::sim::pattern::AttackPattern;
    use crate::sim::strategy::StraightLine;
    use serde_json::json;

    const DT: f32 = 1.0 / 60.0;

    fn arena() -> Arena {
        Arena::new(0.0, 0.0, 1300.0, 750.0)
    }

    fn enemy_spawn(x: f32, y: f32) -> EnemySpawnData {
        EnemySpawnData {
            position: Some(LevelPoint { x, y }),
            color: None,
            pattern_type: "Predefined".to_string(),
            pattern_params: json!({ "Index": 2 }),
        }
    }

    fn level(waves: Vec<Vec<EnemySpawnData>>) -> LevelData {
        LevelData {
            level_number: 1,
            max_bonus_count: 0,
            player_start: PlayerStart {
                position: LevelPoint { x: 650.0, y: 650.0 },
                health: 8,
            },
            waves: waves
                .into_iter()
                .map(|enemies| WaveData {
                    pre_wave_delay: Some(0.5),
                    spawns: SpawnGroupData {
                        enemies,
                        ..SpawnGroupData::default()
                    },
                    ..WaveData::default()
                })
                .collect(),
            ..LevelData::default()
        }
    }

    fn settings() -> SimSettings {
        SimSettings {
            pre_battle_delay: 1.0,
            ..SimSettings::with_seed(7)
        }
    }

    fn idle(battle: &Battle) -> FrameInput {
        FrameInput {
            aim: battle.player().pos - Vec2::Y * 100.0,
            ..FrameInput::default()
        }
    }

    fn run(battle: &mut Battle, frames: usize) {
        for _ in 0..frames {
            let input = idle(battle);
            battle.update(&input, DT);
        }
    }

    #[test]
    fn test_reset_applies_default_bonus_then_level_health() {
        let battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        assert_eq!(battle.player().health, 8);
        assert_eq!(battle.player().special_cost, BonusKind::Void.health());
        assert_eq!(battle.current_bonus(), BonusKind::Void);
        assert_eq!(battle.banner().text, "Void");
        assert_eq!(battle.player().pos, Vec2::new(650.0, 650.0));
        assert_eq!(battle.phase(), BattlePhase::PreBattle);
    }

    #[test]
    fn test_intro_then_wave_spawns() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        // 1 s intro, then 0.5 s wave delay
        run(&mut battle, 59);
        assert_eq!(battle.phase(), BattlePhase::PreBattle);
        assert!(battle.enemies().is_empty());
        run(&mut battle, 40);
        assert_eq!(battle.phase(), BattlePhase::WaveActive);
        assert_eq!(battle.enemies().len(), 1);
        assert_eq!(battle.enemies()[0].pos, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_skip_intro_input() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        let input = FrameInput {
            skip_intro: true,
            ..idle(&battle)
        };
        battle.update(&input, DT);
        assert_eq!(battle.phase(), BattlePhase::WaveCleared);
        run(&mut battle, 31);
        assert_eq!(battle.enemies().len(), 1);
    }

    #[test]
    fn test_enemy_with_one_health_removed_in_same_pass() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(650.0, 300.0)]]));
        battle.skip_pre_battle();
        run(&mut battle, 31);
        assert_eq!(battle.enemies().len(), 1);
        battle.enemies[0].health = 1;
        battle.enemies[0].shoot_timer = f32::MAX;

        // Player bullet sitting just below the enemy, heading up
        let mut shot = AttackPattern::new(
            0.2,
            60.0,
            1,
            Faction::Player,
            StraightLine::new(Vec2::NEG_Y, Color::WHITE),
        );
        shot.fire(Vec2::new(650.0, 345.0), Vec2::new(650.0, 0.0), &mut battle.pool);

        run(&mut battle, 1);
        assert!(battle.enemies().is_empty());
        assert_eq!(battle.stats().enemies_destroyed, 1);
        assert_eq!(battle.pool().iter_active().count(), 0);
        // Reclaimed on the following cleanup
        run(&mut battle, 1);
        assert_eq!(battle.pool().active_count(), 0);
    }

    #[test]
    fn test_bullets_cancel_one_for_one() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        battle.skip_pre_battle();
        let at = Vec2::new(900.0, 400.0);
        for faction in [Faction::Player, Faction::Enemy, Faction::Enemy] {
            battle.pool.acquire(at, Vec2::X, 0.0, Color::WHITE, faction);
        }
        battle.resolve_bullets();
        assert_eq!(battle.stats().bullets_cancelled, 1);
        let survivors: Vec<Faction> = battle.pool().iter_active().map(|(_, b)| b.faction).collect();
        assert_eq!(survivors, vec![Faction::Enemy]);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        let at = battle.player().pos;
        battle.pool.acquire(at, Vec2::Y, 0.0, Color::RED, Faction::Enemy);
        battle.resolve_bullets();
        assert_eq!(battle.player().health, 7);
        assert_eq!(battle.stats().player_hits, 1);
    }

    #[test]
    fn test_bullets_expire_outside_margin() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        battle.pool.acquire(Vec2::new(5.0, 400.0), Vec2::NEG_X, 0.0, Color::RED, Faction::Enemy);
        battle.pool.acquire(Vec2::new(500.0, 100.0), Vec2::NEG_X, 0.0, Color::RED, Faction::Enemy);
        battle.resolve_bullets();
        assert_eq!(battle.pool().iter_active().count(), 1);
    }

    #[test]
    fn test_bonus_pickup_grants_special() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        let at = battle.player().pos;
        battle.bonuses.push(Bonus::new(BonusKind::Wind, at, 10.0));
        battle.collect_bonuses();
        assert!(battle.bonuses().is_empty());
        assert_eq!(battle.player().health, 8 + 4);
        assert_eq!(battle.player().special_cost, 4);
        assert_eq!(battle.current_bonus(), BonusKind::Wind);
        assert_eq!(battle.banner().color, Color::YELLOW);
    }

    #[test]
    fn test_level_completes_when_waves_cleared() {
        let mut battle = Battle::with_level(
            settings(),
            arena(),
            level(vec![vec![enemy_spawn(300.0, 200.0)], vec![enemy_spawn(900.0, 200.0)]]),
        );
        battle.skip_pre_battle();
        run(&mut battle, 31);
        assert_eq!(battle.director().waves_remaining(), 1);

        battle.enemies.clear();
        run(&mut battle, 1);
        assert_eq!(battle.phase(), BattlePhase::WaveCleared);
        run(&mut battle, 31);
        assert_eq!(battle.director().waves_remaining(), 0);
        assert_eq!(battle.enemies().len(), 1);

        battle.enemies.clear();
        run(&mut battle, 1);
        assert!(battle.is_level_complete());
    }

    #[test]
    fn test_special_attack_input() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        battle.skip_pre_battle();
        let input = FrameInput {
            special_pressed: true,
            ..idle(&battle)
        };
        battle.update(&input, DT);
        assert_eq!(battle.player().health, 7);
        assert_eq!(battle.pool().iter_active().count(), 12);
    }

    #[test]
    fn test_dead_player_freezes_battle() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        battle.skip_pre_battle();
        battle.player.health = 0;
        run(&mut battle, 120);
        assert!(!battle.is_player_alive());
        assert!(battle.enemies().is_empty());
        assert_eq!(battle.stats().frames, 0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut battle = Battle::with_level(settings(), arena(), level(vec![vec![enemy_spawn(300.0, 200.0)]]));
        battle.skip_pre_battle();
        run(&mut battle, 31);
        let snap = battle.snapshot();
        assert_eq!(snap.phase, BattlePhase::WaveActive);
        assert_eq!(snap.enemies.len(), 1);
        assert_eq!(snap.player.health, 8);
        assert_eq!(snap.banner.text, "Void");
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"WaveActive\""));
    }
}
