//! Wave sequencing
//!
//! A level is a stack of [`Wave`]s popped in declared order. [`WaveDirector`]
//! runs the per-level state machine:
//!
//! ```text
//! PreBattle ──delay/skip──▶ WaveCleared ──interval──▶ WaveActive
//!                               ▲                         │ enemies gone
//!                               └─────────────────────────┤
//!                                                         ▼ stack empty
//!                                                   LevelComplete
//! ```
//!
//! The director never touches entities. It is told how many enemies are alive
//! and hands back the wave to materialize; the caller owns spawning.

use glam::Vec2;
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use super::bonus::BonusKind;
use crate::color::Color;

/// Declarative enemy spawn
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    /// Preferred position
    pub position: Option<Vec2>,
    /// Random when absent
    pub color: Option<Color>,
    pub pattern_type: String,
    pub pattern_params: Value,
}

impl EnemySpawn {
    /// Spawn with a random predefined pattern
    pub fn predefined(position: Option<Vec2>) -> Self {
        Self {
            position,
            color: None,
            pattern_type: "Predefined".to_string(),
            pattern_params: Value::Null,
        }
    }
}

/// Declarative bonus spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusSpawn {
    /// Random when absent
    pub kind: Option<BonusKind>,
    pub position: Option<Vec2>,
}

/// One step of a wave; groups nest arbitrarily
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnAction {
    Enemy(EnemySpawn),
    Bonus(BonusSpawn),
    Group(Vec<SpawnAction>),
}

/// A leaf action ready for the spawn manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest<'a> {
    Enemy(&'a EnemySpawn),
    Bonus(&'a BonusSpawn),
}

/// Text shown over the arena
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wave {
    /// Wait after the previous wave clears before this one spawns
    pub pre_wave_delay: Option<f32>,
    pub message: Option<Banner>,
    pub actions: Vec<SpawnAction>,
}

impl Wave {
    pub fn new(actions: Vec<SpawnAction>) -> Self {
        Self {
            actions,
            ..Self::default()
        }
    }

    /// Leaf requests in declared order
    pub fn requests(&self) -> Vec<SpawnRequest<'_>> {
        WaveProcessor::flatten(&self.actions)
    }
}

/// Flattens nested spawn groups
pub struct WaveProcessor;

impl WaveProcessor {
    /// Depth-first, declared order. Uses an explicit stack so deeply nested
    /// groups cannot overflow the call stack.
    pub fn flatten(actions: &[SpawnAction]) -> Vec<SpawnRequest<'_>> {
        let mut out = Vec::with_capacity(actions.len());
        let mut stack: Vec<&SpawnAction> = actions.iter().rev().collect();
        while let Some(action) = stack.pop() {
            match action {
                SpawnAction::Enemy(e) => out.push(SpawnRequest::Enemy(e)),
                SpawnAction::Bonus(b) => out.push(SpawnRequest::Bonus(b)),
                SpawnAction::Group(children) => stack.extend(children.iter().rev()),
            }
        }
        out
    }
}

/// LIFO of pending waves; the first declared wave is on top
#[derive(Debug, Clone, Default)]
pub struct WaveStack {
    waves: Vec<Wave>,
}

impl WaveStack {
    pub fn new(declared: Vec<Wave>) -> Self {
        let mut waves = declared;
        waves.reverse();
        Self { waves }
    }

    pub fn pop(&mut self) -> Option<Wave> {
        self.waves.pop()
    }

    pub fn peek(&self) -> Option<&Wave> {
        self.waves.last()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BattlePhase {
    /// Intro delay before the first wave
    PreBattle,
    /// Enemies from the current wave are alive
    WaveActive,
    /// Waiting out the interval before the next wave
    WaveCleared,
    LevelComplete,
}

/// Per-level wave state machine
#[derive(Debug, Clone)]
pub struct WaveDirector {
    stack: WaveStack,
    phase: BattlePhase,
    /// PreBattle: counts down. WaveCleared: counts up since the clear.
    timer: f32,
    default_interval: f32,
    waves_spawned: usize,
}

impl WaveDirector {
    pub fn new(waves: Vec<Wave>, pre_battle_delay: f32, default_interval: f32) -> Self {
        Self {
            stack: WaveStack::new(waves),
            phase: BattlePhase::PreBattle,
            timer: pre_battle_delay,
            default_interval,
            waves_spawned: 0,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn waves_remaining(&self) -> usize {
        self.stack.len()
    }

    pub fn waves_spawned(&self) -> usize {
        self.waves_spawned
    }

    pub fn is_complete(&self) -> bool {
        self.phase == BattlePhase::LevelComplete
    }

    /// Seconds left in the intro, zero once the battle has started
    pub fn pre_battle_remaining(&self) -> f32 {
        match self.phase {
            BattlePhase::PreBattle => self.timer.max(0.0),
            _ => 0.0,
        }
    }

    /// End the intro now
    pub fn skip_pre_battle(&mut self) {
        if self.phase == BattlePhase::PreBattle {
            debug!("Pre-battle skipped with {:.1}s left", self.timer);
            self.start_battle();
        }
    }

    fn start_battle(&mut self) {
        self.phase = BattlePhase::WaveCleared;
        self.timer = 0.0;
    }

    /// Interval the next wave waits for after a clear
    fn next_interval(&self) -> f32 {
        self.stack
            .peek()
            .and_then(|w| w.pre_wave_delay)
            .unwrap_or(self.default_interval)
    }

    /// Advance by `dt`. Returns the wave to materialize, if one is due.
    pub fn update(&mut self, dt: f32, enemies_alive: usize) -> Option<Wave> {
        match self.phase {
            BattlePhase::PreBattle => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    info!("Battle started");
                    self.start_battle();
                }
                None
            }
            BattlePhase::WaveActive => {
                if enemies_alive == 0 {
                    self.cleared();
                }
                None
            }
            BattlePhase::WaveCleared => {
                if enemies_alive > 0 {
                    return None;
                }
                if self.stack.is_empty() {
                    self.complete();
                    return None;
                }
                self.timer += dt;
                if self.timer < self.next_interval() {
                    return None;
                }
                let wave = self.stack.pop()?;
                self.phase = BattlePhase::WaveActive;
                self.timer = 0.0;
                self.waves_spawned += 1;
                info!(
                    "Wave {} spawning ({} remaining)",
                    self.waves_spawned,
                    self.stack.len()
                );
                Some(wave)
            }
            BattlePhase::LevelComplete => None,
        }
    }

    fn cleared(&mut self) {
        if self.stack.is_empty() {
            self.complete();
        } else {
            debug!("Wave {} cleared", self.waves_spawned);
            self.phase = BattlePhase::WaveCleared;
            self.timer = 0.0;
        }
    }

    fn complete(&mut self) {
        info!("Level complete after {} waves", self.waves_spawned);
        self.phase = BattlePhase::LevelComplete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32) -> SpawnAction {
        SpawnAction::Enemy(EnemySpawn::predefined(Some(Vec2::new(x, 0.0))))
    }

    fn xs(requests: &[SpawnRequest<'_>]) -> Vec<f32> {
        requests
            .iter()
            .map(|r| match r {
                SpawnRequest::Enemy(e) => e.position.map_or(-1.0, |p| p.x),
                SpawnRequest::Bonus(_) => -2.0,
            })
            .collect()
    }

    #[test]
    fn test_flatten_depth_first_in_order() {
        let actions = vec![
            enemy_at(1.0),
            SpawnAction::Group(vec![
                enemy_at(2.0),
                SpawnAction::Group(vec![enemy_at(3.0), enemy_at(4.0)]),
                SpawnAction::Bonus(BonusSpawn {
                    kind: Some(BonusKind::Fire),
                    position: None,
                }),
            ]),
            SpawnAction::Group(vec![]),
            enemy_at(5.0),
        ];
        let out = WaveProcessor::flatten(&actions);
        assert_eq!(xs(&out), vec![1.0, 2.0, 3.0, 4.0, -2.0, 5.0]);
    }

    #[test]
    fn test_flatten_deep_nesting() {
        let mut action = enemy_at(7.0);
        for _ in 0..100_000 {
            action = SpawnAction::Group(vec![action]);
        }
        let actions = vec![action];
        assert_eq!(xs(&WaveProcessor::flatten(&actions)), vec![7.0]);
        // Dropping a deeply nested enum recurses too; keep it off this thread's stack
        std::mem::forget(actions);
    }

    #[test]
    fn test_stack_pops_in_declared_order() {
        let waves = (1..=3).map(|i| Wave::new(vec![enemy_at(i as f32)])).collect();
        let mut stack = WaveStack::new(waves);
        assert_eq!(stack.len(), 3);
        for i in 1..=3 {
            let wave = stack.pop().unwrap();
            assert_eq!(xs(&wave.requests()), vec![i as f32]);
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pre_battle_delay() {
        let mut d = WaveDirector::new(vec![Wave::new(vec![enemy_at(0.0)])], 1.0, 0.5);
        assert!(d.update(0.6, 0).is_none());
        assert_eq!(d.phase(), BattlePhase::PreBattle);
        assert!(d.update(0.6, 0).is_none());
        assert_eq!(d.phase(), BattlePhase::WaveCleared);
        assert!(d.update(0.4, 0).is_none());
        assert!(d.update(0.2, 0).is_some());
        assert_eq!(d.phase(), BattlePhase::WaveActive);
    }

    #[test]
    fn test_two_wave_scenario() {
        let waves = vec![
            Wave::new(vec![enemy_at(1.0), enemy_at(2.0)]),
            Wave::new(vec![enemy_at(3.0)]),
        ];
        let mut d = WaveDirector::new(waves, 45.0, 2.0);
        d.skip_pre_battle();
        assert_eq!(d.waves_remaining(), 2);

        let first = d.update(2.0, 0).unwrap();
        assert_eq!(first.actions.len(), 2);
        assert_eq!(d.waves_remaining(), 1);

        // Enemies alive: nothing changes no matter how long
        assert!(d.update(100.0, 2).is_none());
        assert_eq!(d.phase(), BattlePhase::WaveActive);

        // All dead: cleared, then exactly one pop once the interval elapses
        assert!(d.update(0.1, 0).is_none());
        assert_eq!(d.phase(), BattlePhase::WaveCleared);
        assert!(d.update(1.0, 0).is_none());
        assert_eq!(d.waves_remaining(), 1);
        let second = d.update(1.0, 0).unwrap();
        assert_eq!(xs(&second.requests()), vec![3.0]);
        assert_eq!(d.waves_remaining(), 0);
        assert!(d.update(1.0, 1).is_none());

        assert!(d.update(0.1, 0).is_none());
        assert!(d.is_complete());
        assert!(d.update(10.0, 0).is_none());
    }

    #[test]
    fn test_wave_delay_overrides_default_interval() {
        let mut wave = Wave::new(vec![enemy_at(0.0)]);
        wave.pre_wave_delay = Some(0.25);
        let mut d = WaveDirector::new(vec![wave], 0.0, 10.0);
        d.update(0.0, 0);
        assert!(d.update(0.2, 0).is_none());
        assert!(d.update(0.1, 0).is_some());
    }

    #[test]
    fn test_empty_level_completes_after_intro() {
        let mut d = WaveDirector::new(Vec::new(), 0.5, 1.0);
        d.update(0.1, 0);
        assert_eq!(d.phase(), BattlePhase::PreBattle);
        assert!((d.pre_battle_remaining() - 0.4).abs() < 1e-6);
        d.skip_pre_battle();
        d.update(0.1, 0);
        assert!(d.is_complete());
    }
}
