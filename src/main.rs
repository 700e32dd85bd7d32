//! Bullet Storm headless runner
//!
//! Drives the simulation at a fixed 60 Hz with a scripted pilot and logs how
//! the level plays out. Useful for soak-testing level files and settings.
//!
//! Usage: `bullet-storm [--settings PATH] [--level N] [--frames N] [--json]`

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use glam::Vec2;
    use log::{debug, info, warn};

    use bullet_storm::SimSettings;
    use bullet_storm::consts::SIM_DT;
    use bullet_storm::sim::{Battle, BattlePhase, FrameInput, LevelLoader};

    /// Seconds between scripted special attacks
    const SPECIAL_EVERY: f32 = 5.0;
    /// Seconds per strafing circle
    const STRAFE_PERIOD: f32 = 4.0;

    pub struct Options {
        pub settings: PathBuf,
        pub level: u32,
        pub frames: u64,
        pub json: bool,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                settings: PathBuf::from("settings.json"),
                level: 1,
                frames: 60 * 120,
                json: false,
            }
        }
    }

    impl Options {
        pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
            let mut opts = Self::default();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--settings" => {
                        if let Some(path) = args.next() {
                            opts.settings = PathBuf::from(path);
                        }
                    }
                    "--level" => opts.level = parse_or(args.next(), opts.level, "--level"),
                    "--frames" => opts.frames = parse_or(args.next(), opts.frames, "--frames"),
                    "--json" => opts.json = true,
                    other => warn!("Ignoring unknown argument {other:?}"),
                }
            }
            opts
        }
    }

    fn parse_or<T: std::str::FromStr + Copy>(value: Option<String>, fallback: T, flag: &str) -> T {
        match value.as_deref().map(str::parse) {
            Some(Ok(v)) => v,
            _ => {
                warn!("{flag} expects a number, keeping the default");
                fallback
            }
        }
    }

    /// Strafe in a circle, aim at the nearest enemy, hold fire, use the
    /// special attack on a timer
    fn pilot(battle: &Battle, time: f32, frame: u64) -> FrameInput {
        let player = battle.player();
        let aim = battle
            .enemies()
            .iter()
            .map(|e| e.pos)
            .min_by(|a, b| a.distance_squared(player.pos).total_cmp(&b.distance_squared(player.pos)))
            .unwrap_or_else(|| battle.arena().center());
        let angle = std::f32::consts::TAU * time / STRAFE_PERIOD;
        let special_frame = (SPECIAL_EVERY / SIM_DT) as u64;
        FrameInput {
            movement: Vec2::from_angle(angle),
            aim,
            fire_held: true,
            special_pressed: frame > 0 && frame % special_frame == 0 && player.health > 2,
            skip_intro: frame == 0,
        }
    }

    pub fn run(opts: &Options) {
        let settings = SimSettings::load_or_default(&opts.settings);
        let loader = LevelLoader::new(settings.levels_dir.clone());
        let mut battle = Battle::new(settings);
        if opts.level != 1 {
            battle.reset_level(opts.level);
        }

        let mut level = opts.level;
        let mut phase = battle.phase();
        let mut time = 0.0;
        let mut frame = 0;
        while frame < opts.frames {
            let input = pilot(&battle, time, frame);
            battle.update(&input, SIM_DT);
            time += SIM_DT;
            frame += 1;

            if battle.phase() != phase {
                phase = battle.phase();
                info!("Frame {frame}: {phase:?}");
            }
            if frame % 60 == 0 {
                debug!(
                    "t={time:.0}s health={} enemies={} bonuses={} bullets={}",
                    battle.player().health,
                    battle.enemies().len(),
                    battle.bonuses().len(),
                    battle.pool().active_count()
                );
            }

            if !battle.is_player_alive() {
                info!("Player destroyed on level {level} at t={time:.1}s");
                break;
            }
            if phase == BattlePhase::LevelComplete {
                if !loader.has_level(level + 1) {
                    info!("No level {} in {}, stopping", level + 1, loader.dir().display());
                    break;
                }
                summarize(&battle, level);
                level += 1;
                battle.reset_level(level);
                battle.skip_pre_battle();
                phase = battle.phase();
            }
        }

        summarize(&battle, level);
        if opts.json {
            match battle.snapshot().to_json() {
                Ok(json) => println!("{json}"),
                Err(err) => warn!("Snapshot serialization failed: {err}"),
            }
        }
    }

    fn summarize(battle: &Battle, level: u32) {
        let stats = battle.stats();
        info!(
            "Level {level}: {} frames, {}/{} enemies destroyed, {} bonuses collected ({} expired), \
             {} hits taken, {} bullets fired, {} cancelled, peak pool {}",
            stats.frames,
            stats.enemies_destroyed,
            stats.enemies_spawned,
            stats.bonuses_collected,
            stats.bonuses_expired,
            stats.player_hits,
            stats.bullets_fired,
            stats.bullets_cancelled,
            battle.pool().total_created()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bullet Storm (headless) starting...");
    let opts = runner::Options::from_args(std::env::args().skip(1));
    runner::run(&opts);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; there is no runner
}
