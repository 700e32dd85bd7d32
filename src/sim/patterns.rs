//! Pattern catalog: built-in presets and resolution of declarative pattern data
//!
//! Level files name a pattern type and carry a loose parameter object. Each
//! known type maps to a typed parameter struct through a static table; every
//! field is optional and falls back to a per-type default. Unknown types (and
//! unusable `Predefined` indices) resolve to a random built-in preset.

use log::{debug, warn};
use rand::Rng;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::bullet::Faction;
use super::pattern::AttackPattern;
use super::strategy::{
    AimedLine, Astroid, ChaosSphere, MirrorSpiral, PulsingNova, PulsingQuantum, QuantumThread,
    QuantumVortex, Spiral, Spread,
};
use crate::color::{Color, ColorSpec};

/// Number of built-in presets
pub const PREDEFINED_COUNT: usize = 4;

/// Built-in enemy preset by index (fresh strategy state every call)
pub fn predefined(index: usize) -> Option<AttackPattern> {
    let enemy = Faction::Enemy;
    let pattern = match index {
        0 => AttackPattern::new(
            0.1,
            500.0,
            6,
            enemy,
            Spiral::new(2.2, 2.0, Color::CYAN, Color::PURPLE),
        ),
        1 => AttackPattern::new(0.1, 500.0, 6, enemy, AimedLine::new(Color::CYAN)),
        2 => AttackPattern::new(0.5, 300.0, 6, enemy, Spread::new(Color::CYAN)),
        3 => AttackPattern::new(0.1, 300.0, 6, enemy, Astroid::new(1.15, Color::CYAN)),
        _ => return None,
    };
    Some(pattern)
}

/// Uniformly random built-in preset
pub fn random_predefined<R: Rng + ?Sized>(rng: &mut R) -> AttackPattern {
    let index = rng.random_range(0..PREDEFINED_COUNT);
    predefined(index)
        .unwrap_or_else(|| AttackPattern::new(0.5, 300.0, 6, Faction::Enemy, Spread::new(Color::CYAN)))
}

/// Resolve a pattern type plus parameter object to a concrete pattern.
///
/// Never fails: unknown types fall back to a random preset.
pub fn resolve<R: Rng + ?Sized>(pattern_type: &str, params: &Value, rng: &mut R) -> AttackPattern {
    let Some((_, parse)) = PARSERS.iter().find(|(name, _)| *name == pattern_type) else {
        warn!("Unknown pattern type {pattern_type:?}, using a random preset");
        return random_predefined(rng);
    };
    match parse(params) {
        Some(pattern) => {
            debug!("Resolved {pattern_type} to {}", pattern.strategy().name());
            pattern
        }
        None if params.is_null() => {
            debug!("{pattern_type} without parameters, using a random preset");
            random_predefined(rng)
        }
        None => {
            warn!("Pattern {pattern_type} could not be built from {params}, using a random preset");
            random_predefined(rng)
        }
    }
}

type Parser = fn(&Value) -> Option<AttackPattern>;

/// Pattern type name -> parameter parser
const PARSERS: &[(&str, Parser)] = &[
    ("Predefined", parse_predefined),
    ("QuantumThread", parse_quantum_thread),
    ("MirrorSpiral", parse_mirror_spiral),
    ("PulsingQuantum", parse_pulsing_quantum),
    ("QuantumVortex", parse_quantum_vortex),
    ("PulsingNova", parse_pulsing_nova),
    ("ChaosSphere", parse_chaos_sphere),
];

/// Names accepted by [`resolve`]
pub fn pattern_types() -> impl Iterator<Item = &'static str> {
    PARSERS.iter().map(|(name, _)| *name)
}

/// Cadence overrides accepted by every pattern type
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Cadence {
    shoot_interval: Option<f32>,
    bullet_speed: Option<f32>,
    bullets_per_shot: Option<u32>,
}

impl Cadence {
    fn build(
        self,
        interval: f32,
        speed: f32,
        count: u32,
        strategy: impl Into<super::strategy::AttackStrategy>,
    ) -> AttackPattern {
        AttackPattern::new(
            self.shoot_interval.unwrap_or(interval),
            self.bullet_speed.unwrap_or(speed),
            self.bullets_per_shot.unwrap_or(count),
            Faction::Enemy,
            strategy,
        )
    }
}

/// Deserialize a parameter bag, falling back to defaults when it's malformed
fn params<T: DeserializeOwned + Default>(value: &Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!("Malformed pattern parameters ({e}), using defaults");
        T::default()
    })
}

fn color_or(spec: Option<&ColorSpec>, fallback: Color) -> Color {
    spec.map(Color::from).unwrap_or(fallback)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PredefinedParams {
    index: Option<i64>,
}

fn parse_predefined(value: &Value) -> Option<AttackPattern> {
    let p: PredefinedParams = params(value);
    let index = usize::try_from(p.index?).ok()?;
    predefined(index)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QuantumThreadParams {
    color1: Option<ColorSpec>,
    color2: Option<ColorSpec>,
    wave_speed: Option<f32>,
    #[serde(flatten)]
    cadence: Cadence,
}

fn parse_quantum_thread(value: &Value) -> Option<AttackPattern> {
    let p: QuantumThreadParams = params(value);
    let strategy = QuantumThread::new(
        color_or(p.color1.as_ref(), Color::CYAN),
        color_or(p.color2.as_ref(), Color::MAGENTA),
        p.wave_speed.unwrap_or(2.0),
    );
    Some(p.cadence.build(0.3, 600.0, 8, strategy))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MirrorSpiralParams {
    color: Option<ColorSpec>,
    mirror: Option<bool>,
    #[serde(flatten)]
    cadence: Cadence,
}

fn parse_mirror_spiral(value: &Value) -> Option<AttackPattern> {
    let p: MirrorSpiralParams = params(value);
    let strategy = MirrorSpiral::new(color_or(p.color.as_ref(), Color::WHITE), p.mirror.unwrap_or(false));
    Some(p.cadence.build(0.4, 500.0, 24, strategy))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PulsingQuantumParams {
    color: Option<ColorSpec>,
    #[serde(flatten)]
    cadence: Cadence,
}

fn parse_pulsing_quantum(value: &Value) -> Option<AttackPattern> {
    let p: PulsingQuantumParams = params(value);
    let strategy = PulsingQuantum::new(color_or(p.color.as_ref(), Color::WHITE), 3.0, 2.0);
    Some(p.cadence.build(0.3, 350.0, 36, strategy))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QuantumVortexParams {
    core_color: Option<ColorSpec>,
    orbit_color: Option<ColorSpec>,
    /// Degrees per shot
    rotation_speed: Option<f32>,
    #[serde(flatten)]
    cadence: Cadence,
}

fn parse_quantum_vortex(value: &Value) -> Option<AttackPattern> {
    let p: QuantumVortexParams = params(value);
    let strategy = QuantumVortex::new(
        color_or(p.core_color.as_ref(), Color::WHITE),
        color_or(p.orbit_color.as_ref(), Color::WHITE),
        p.rotation_speed.unwrap_or(5.0),
    );
    Some(p.cadence.build(0.5, 320.0, 24, strategy))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PulsingNovaParams {
    pulse_color: Option<ColorSpec>,
    explosion_radius: Option<f32>,
    #[serde(flatten)]
    cadence: Cadence,
}

fn parse_pulsing_nova(value: &Value) -> Option<AttackPattern> {
    let p: PulsingNovaParams = params(value);
    let strategy = PulsingNova::new(
        color_or(p.pulse_color.as_ref(), Color::WHITE),
        p.explosion_radius.unwrap_or(120.0),
    );
    Some(p.cadence.build(0.4, 280.0, 16, strategy))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChaosSphereParams {
    layers: Option<u32>,
    projectile_count: Option<u32>,
    #[serde(flatten)]
    cadence: Cadence,
}

fn parse_chaos_sphere(value: &Value) -> Option<AttackPattern> {
    let p: ChaosSphereParams = params(value);
    let layers = p.layers.unwrap_or(3);
    let count = p.projectile_count.unwrap_or(24);
    let strategy = ChaosSphere::new(Color::WHITE, layers, count);
    Some(p.cadence.build(0.8, 250.0, count, strategy))
}
