//! Polybounce entry point
//!
//! Headless runner: builds the default scene, drives the scheduler from an
//! in-process frame driver and logs what happened.
//!
//! Usage: `polybounce [settings.json]`

use std::path::PathBuf;

use polybounce::audio::{CollisionAudio, LogBackend};
use polybounce::platform::ManualDriver;
use polybounce::sim::GameState;
use polybounce::{Renderer, Scheduler, Settings, SimPhase, scene};

/// Renderer stand-in that just counts frames and checks containment
#[derive(Default)]
struct FrameLog {
    frames: u64,
    escapes: u64,
}

impl Renderer for FrameLog {
    fn present(&mut self, state: &GameState, phase: SimPhase) {
        self.frames += 1;
        if phase == SimPhase::Running && !state.all_contained() {
            self.escapes += 1;
            log::warn!("ball outside boundary after tick {}", state.time_ticks);
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    };
    let seed = settings.resolve_seed();
    log::info!("Polybounce starting (seed {})", seed);

    let state = match scene::build(&settings.scene, settings.tuning.ball_speed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid scene: {}", e);
            std::process::exit(1);
        }
    };

    let audio = CollisionAudio::new(LogBackend::default(), &settings.audio, seed ^ 0xA0D1_0000);
    let mut scheduler =
        match Scheduler::new(state, settings.tuning.clone(), seed, FrameLog::default(), audio) {
            Ok(scheduler) => scheduler,
            Err(e) => {
                log::error!("Invalid physics tuning: {}", e);
                std::process::exit(1);
            }
        };
    let mut driver = ManualDriver::new();

    scheduler.start(&mut driver);

    // Stand-in for the first user interaction
    scheduler.listener_mut().init();
    scheduler.resume();

    let mut frames = 0;
    while frames < settings.frames {
        let Some(handle) = driver.pop_due() else { break };
        scheduler.on_frame(handle, &mut driver);
        frames += 1;
    }

    scheduler.stop(&mut driver);
    scheduler.listener_mut().teardown();

    let stats = scheduler.stats().clone();
    let (state, frame_log, audio) = scheduler.into_parts();

    log::info!(
        "{} ticks: {} wall hits ({} corners), {} blocks, {} ball hits, {} pulled back",
        stats.ticks,
        stats.boundary_hits,
        stats.corner_hits,
        stats.block_hits,
        stats.ball_hits,
        stats.contained
    );
    log::info!(
        "Blocks destroyed: {}, left: {}, sounds: {}",
        state.destroyed_count(),
        state.live_blocks().count(),
        audio.backend().played
    );
    for (i, ball) in state.balls.iter().enumerate() {
        log::info!(
            "ball {}: pos ({:.1}, {:.1}) speed {:.3}",
            i,
            ball.pos.x,
            ball.pos.y,
            ball.speed()
        );
    }
    if frame_log.escapes > 0 {
        log::warn!("{} frames had a ball outside the boundary", frame_log.escapes);
    }
    log::info!("Rendered {} frames", frame_log.frames);
}
