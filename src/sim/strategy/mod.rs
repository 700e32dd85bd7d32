//! Attack strategies
//!
//! A strategy turns one firing request (a [`Volley`]) into concrete bullets.
//! Most strategies carry phase or rotation state that advances by a fixed
//! step per call, so the pattern animates with firing cadence rather than
//! wall-clock time. That state lives in the strategy value itself; cloning a
//! strategy forks its phase.
//!
//! Every strategy stops emitting as soon as the pool runs dry. Exhaustion is
//! never an error, the volley just comes out short.

mod basic;
mod fractal;
mod pulse;
mod rotating;

pub use basic::{AimedLine, ExplosiveBurst, Lotus, QuantumCircle, Spread, Star, StraightLine};
pub use fractal::{CrystalFan, FractalSquare};
pub use pulse::{PulsingCircle, PulsingNova, PulsingQuantum};
pub use rotating::{
    Astroid, ChaosSphere, MirrorSpiral, QuantumThread, QuantumVortex, RotatingLotus, Spiral, Wave,
};

use glam::Vec2;

use super::bullet::{BulletPool, Faction};
use crate::color::Color;

/// One firing request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volley {
    /// Where the shooter stands
    pub origin: Vec2,
    /// Point tracked by aiming strategies (the player for enemies, the aim
    /// point for the player)
    pub target: Vec2,
    /// Requested bullets per shot; strategies with fixed geometry ignore it
    pub count: u32,
    pub speed: f32,
    pub faction: Faction,
}

impl Volley {
    /// Unit vector from origin toward target (zero if they coincide)
    pub fn aim(&self) -> Vec2 {
        crate::direction_to(self.origin, self.target)
    }
}

/// Write side of the bullet pool used while a strategy fires.
///
/// Tracks how many bullets made it out and latches once the pool is empty.
pub struct Emitter<'a> {
    pool: &'a mut BulletPool,
    faction: Faction,
    emitted: usize,
    exhausted: bool,
}

impl<'a> Emitter<'a> {
    pub fn new(pool: &'a mut BulletPool, faction: Faction) -> Self {
        Self {
            pool,
            faction,
            emitted: 0,
            exhausted: false,
        }
    }

    /// Fire one bullet. Returns `false` once the pool is exhausted, at which
    /// point the caller must stop emitting.
    ///
    /// A zero direction is skipped silently (the bullet would never move).
    pub fn fire(&mut self, pos: Vec2, dir: Vec2, speed: f32, color: Color) -> bool {
        if self.exhausted {
            return false;
        }
        if dir.normalize_or_zero() == Vec2::ZERO {
            return true;
        }
        match self.pool.acquire(pos, dir, speed, color, self.faction) {
            Some(_) => {
                self.emitted += 1;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Behavior shared by every strategy
pub trait Shooter {
    /// Emit one volley and advance internal phase
    fn shoot(&mut self, volley: &Volley, out: &mut Emitter<'_>);
}

/// Closed set of firing behaviors
#[derive(Debug, Clone, PartialEq)]
pub enum AttackStrategy {
    StraightLine(StraightLine),
    AimedLine(AimedLine),
    Spread(Spread),
    ExplosiveBurst(ExplosiveBurst),
    Star(Star),
    QuantumCircle(QuantumCircle),
    Lotus(Lotus),
    Spiral(Spiral),
    Astroid(Astroid),
    MirrorSpiral(MirrorSpiral),
    RotatingLotus(RotatingLotus),
    Wave(Wave),
    QuantumThread(QuantumThread),
    QuantumVortex(QuantumVortex),
    ChaosSphere(ChaosSphere),
    PulsingCircle(PulsingCircle),
    PulsingQuantum(PulsingQuantum),
    PulsingNova(PulsingNova),
    CrystalFan(CrystalFan),
    FractalSquare(FractalSquare),
}

macro_rules! strategy_variants {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for AttackStrategy {
                fn from(s: $variant) -> Self {
                    AttackStrategy::$variant(s)
                }
            }
        )*

        impl AttackStrategy {
            fn as_shooter(&mut self) -> &mut dyn Shooter {
                match self {
                    $(AttackStrategy::$variant(s) => s,)*
                }
            }

            /// Variant name (for logs)
            pub fn name(&self) -> &'static str {
                match self {
                    $(AttackStrategy::$variant(_) => stringify!($variant),)*
                }
            }
        }
    };
}

strategy_variants!(
    StraightLine,
    AimedLine,
    Spread,
    ExplosiveBurst,
    Star,
    QuantumCircle,
    Lotus,
    Spiral,
    Astroid,
    MirrorSpiral,
    RotatingLotus,
    Wave,
    QuantumThread,
    QuantumVortex,
    ChaosSphere,
    PulsingCircle,
    PulsingQuantum,
    PulsingNova,
    CrystalFan,
    FractalSquare,
);

impl AttackStrategy {
    /// Fire a volley into the pool. Returns the number of bullets emitted.
    pub fn shoot(&mut self, volley: &Volley, pool: &mut BulletPool) -> usize {
        let mut out = Emitter::new(pool, volley.faction);
        self.as_shooter().shoot(volley, &mut out);
        out.emitted()
    }
}

/// Evenly spaced angle `i` of `n` around the full circle
#[inline]
pub(crate) fn ring_angle(i: u32, n: u32) -> f32 {
    std::f32::consts::TAU * i as f32 / n as f32
}
