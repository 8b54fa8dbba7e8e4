//! Repair Bay entry point
//!
//! Headless driver: loads one module's task and plays it with a seeded
//! random input stream until it is repaired, life support runs out, or the
//! frame budget is spent.
//!
//! Usage: `repair-bay [level] [module] [seed]` (module is 1-based)

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use repair_bay::render::{CommandList, RenderContext};
use repair_bay::task::load_task;
use repair_bay::{LifeSupport, RepairSession, SessionPhase, Settings, TaskInput};

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 60 * 5;

/// One frame of mashed keys
fn random_input(rng: &mut Pcg32) -> TaskInput {
    TaskInput {
        navigate_up: rng.random_bool(0.05),
        navigate_down: rng.random_bool(0.05),
        move_left: rng.random_bool(0.05),
        move_right: rng.random_bool(0.05),
        select_left: rng.random_bool(0.03),
        select_right: rng.random_bool(0.03),
        confirm: rng.random_bool(0.01),
        place: rng.random_bool(0.01),
        toggle_wire: rng.random_bool(0.02),
        delete: rng.random_bool(0.005),
        quick_select: rng.random_bool(0.02).then(|| rng.random_range(0..4)),
    }
}

fn arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index).and_then(|a| a.parse().ok()).unwrap_or(default)
}

fn main() {
    let settings = Settings::load(Path::new(Settings::FILE_NAME));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_level.as_str()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let level: u32 = arg(&args, 1, 1).max(1);
    let module: usize = arg(&args, 2, 1).max(1);
    let seed: u64 = arg(&args, 3, 0);

    log::info!("Repair Bay starting: level {}, module {}, seed {}", level, module, seed);

    let task = load_task(&settings.task_dir, level, module - 1);
    log::info!("{}: {}", task.code().display_name(), task.prompt());

    let mut session = RepairSession::new(task, LifeSupport::new(settings.life_max), level, &settings);
    let mut rng = Pcg32::seed_from_u64(seed);
    let ctx = RenderContext::default();
    let mut frame = CommandList::new();

    let mut frames = 0;
    let mut idle_frames = 0;
    while frames < MAX_FRAMES && !session.is_finished() && !session.is_depleted() {
        let input = match session.phase() {
            // Always move on after seeing the result
            SessionPhase::Reviewing { .. } => TaskInput::confirm(),
            _ => random_input(&mut rng),
        };
        if input.is_idle() {
            idle_frames += 1;
        }
        session.update(FRAME_DT, &input);
        frames += 1;
    }
    session.render(&mut frame, &ctx);

    log::info!(
        "Stopped after {} frames ({:.1}s, {} idle): {:?}, {} attempt(s), life support {:.1}/{:.0}, {} draw commands",
        frames,
        frames as f32 * FRAME_DT,
        idle_frames,
        session.phase(),
        session.attempts(),
        session.life().level(),
        session.life().max(),
        frame.len()
    );
    if session.is_finished() {
        log::info!("Module repaired");
    } else if session.is_depleted() {
        log::warn!("Life support depleted");
    } else {
        log::info!("Frame budget spent");
    }
}
