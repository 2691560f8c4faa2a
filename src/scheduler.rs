//! Frame scheduler
//!
//! Owns the `GameState` and drives it from an external frame signal. Two
//! states: Paused until the first user interaction, Running after that for
//! the rest of the session. Only one frame request is ever outstanding.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::platform::{FrameDriver, FrameHandle};
use crate::sim::{CollisionEvent, CollisionKind, GameState, RngState, TickReport, tick};
use crate::tuning::{PhysicsTuning, TuningError};

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimPhase {
    /// Waiting for first interaction; frames render but nothing moves
    #[default]
    Paused,
    /// Physics advances every frame
    Running,
}

/// Receives a read-only view after every settled frame
pub trait Renderer {
    fn present(&mut self, state: &GameState, phase: SimPhase);
}

/// Receives collision events after each tick. Must not block.
pub trait CollisionListener {
    fn on_collision(&mut self, event: &CollisionEvent);
}

impl Renderer for () {
    fn present(&mut self, _state: &GameState, _phase: SimPhase) {}
}

impl CollisionListener for () {
    fn on_collision(&mut self, _event: &CollisionEvent) {}
}

/// Running totals for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames: u64,
    pub ticks: u64,
    pub boundary_hits: u64,
    pub corner_hits: u64,
    pub block_hits: u64,
    pub ball_hits: u64,
    /// Balls the tick had to pull back inside
    pub contained: u64,
}

impl SessionStats {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.contained += report.contained as u64;
        for event in &report.events {
            match event.kind {
                CollisionKind::Boundary { corner } => {
                    self.boundary_hits += 1;
                    if corner {
                        self.corner_hits += 1;
                    }
                }
                CollisionKind::Block { .. } => self.block_hits += 1,
                CollisionKind::Ball { .. } => self.ball_hits += 1,
            }
        }
    }
}

pub struct Scheduler<R: Renderer, L: CollisionListener> {
    state: GameState,
    tuning: PhysicsTuning,
    rng_state: RngState,
    rng: Pcg32,
    phase: SimPhase,
    /// The one frame request we're waiting on
    pending: Option<FrameHandle>,
    /// Between `start` and `stop`
    active: bool,
    stats: SessionStats,
    renderer: R,
    listener: L,
}

impl<R: Renderer, L: CollisionListener> Scheduler<R, L> {
    /// Fails if `tuning` doesn't validate; the tick itself never fails.
    pub fn new(
        state: GameState,
        tuning: PhysicsTuning,
        seed: u64,
        renderer: R,
        listener: L,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let rng_state = RngState::new(seed);
        Ok(Self {
            state,
            tuning,
            rng: rng_state.to_rng(),
            rng_state,
            phase: SimPhase::Paused,
            pending: None,
            active: false,
            stats: SessionStats::default(),
            renderer,
            listener,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Paused -> Running. Returns false if already running.
    pub fn resume(&mut self) -> bool {
        if self.phase == SimPhase::Running {
            return false;
        }
        self.phase = SimPhase::Running;
        log::info!("Simulation running (seed {})", self.rng_state.seed);
        true
    }

    /// Render the initial frame and request the first tick.
    /// Calling again while a request is pending does nothing.
    pub fn start<D: FrameDriver + ?Sized>(&mut self, driver: &mut D) {
        if self.active && self.pending.is_some() {
            log::debug!("start ignored: frame already requested");
            return;
        }
        self.active = true;
        self.renderer.present(&self.state, self.phase);
        self.pending = Some(driver.request_frame());
        log::info!(
            "Scheduler started: {} balls, {} blocks",
            self.state.balls.len(),
            self.state.blocks.len()
        );
    }

    /// Stop scheduling and release the outstanding request
    pub fn stop<D: FrameDriver + ?Sized>(&mut self, driver: &mut D) {
        self.active = false;
        if let Some(handle) = self.pending.take() {
            driver.cancel_frame(handle);
        }
        log::info!("Scheduler stopped after {} ticks", self.stats.ticks);
    }

    /// Frame callback. Ticks when running, forwards collisions, renders the
    /// settled state, then asks for the next frame.
    ///
    /// Returns the tick report, or `None` when nothing advanced.
    pub fn on_frame<D: FrameDriver + ?Sized>(
        &mut self,
        handle: FrameHandle,
        driver: &mut D,
    ) -> Option<TickReport> {
        if self.pending != Some(handle) {
            log::trace!("ignoring stale frame {:?}", handle);
            return None;
        }
        self.pending = None;
        if !self.active {
            return None;
        }

        self.stats.frames += 1;

        let report = match self.phase {
            SimPhase::Running => {
                let report = tick(&mut self.state, &self.tuning, &mut self.rng);
                self.stats.record(&report);
                for event in &report.events {
                    self.listener.on_collision(event);
                }
                if report.contained > 0 {
                    log::debug!(
                        "tick {}: {} balls pulled back inside",
                        report.tick,
                        report.contained
                    );
                }
                Some(report)
            }
            SimPhase::Paused => None,
        };

        self.renderer.present(&self.state, self.phase);
        self.pending = Some(driver.request_frame());

        report
    }

    /// Tear down into the owned parts
    pub fn into_parts(self) -> (GameState, R, L) {
        (self.state, self.renderer, self.listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualDriver;
    use crate::sim::{Ball, Boundary};
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(
            vec![Ball::new(Vec2::new(100.0, 100.0), Vec2::new(3.0, 1.0), 8.0)],
            vec![],
            Boundary::rect(200.0, 200.0).unwrap(),
        )
    }

    fn scheduler() -> Scheduler<(), ()> {
        Scheduler::new(state(), PhysicsTuning::default(), 1, (), ()).unwrap()
    }

    #[test]
    fn test_paused_frames_do_not_move() {
        let mut driver = ManualDriver::new();
        let mut s = scheduler();
        s.start(&mut driver);
        for _ in 0..5 {
            let h = driver.pop_due().unwrap();
            assert!(s.on_frame(h, &mut driver).is_none());
        }
        assert_eq!(s.state().balls[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(s.stats().frames, 5);
        assert_eq!(s.stats().ticks, 0);
    }

    #[test]
    fn test_resume_once() {
        let mut s = scheduler();
        assert_eq!(s.phase(), SimPhase::Paused);
        assert!(s.resume());
        assert!(!s.resume());
        assert_eq!(s.phase(), SimPhase::Running);
    }

    #[test]
    fn test_running_frames_tick() {
        let mut driver = ManualDriver::new();
        let mut s = scheduler();
        s.start(&mut driver);
        s.resume();
        let h = driver.pop_due().unwrap();
        let report = s.on_frame(h, &mut driver).unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(s.state().balls[0].pos, Vec2::new(103.0, 101.0));
    }

    #[test]
    fn test_single_outstanding_request() {
        let mut driver = ManualDriver::new();
        let mut s = scheduler();
        s.start(&mut driver);
        s.start(&mut driver);
        assert_eq!(driver.outstanding(), 1);

        let h = driver.pop_due().unwrap();
        s.on_frame(h, &mut driver);
        assert_eq!(driver.outstanding(), 1);
    }

    #[test]
    fn test_stop_cancels_pending() {
        let mut driver = ManualDriver::new();
        let mut s = scheduler();
        s.start(&mut driver);
        s.stop(&mut driver);
        assert_eq!(driver.outstanding(), 0);
        assert!(!s.has_pending_frame());
        assert!(!s.is_active());
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut driver = ManualDriver::new();
        let mut s = scheduler();
        s.start(&mut driver);
        s.resume();
        let h = driver.pop_due().unwrap();
        s.on_frame(h, &mut driver);
        // Delivering the same handle twice must not tick twice
        assert!(s.on_frame(h, &mut driver).is_none());
        assert_eq!(s.stats().ticks, 1);
        assert_eq!(driver.outstanding(), 1);
    }

    #[test]
    fn test_restart_keeps_one_request() {
        let mut driver = ManualDriver::new();
        let mut s = scheduler();
        s.start(&mut driver);
        s.stop(&mut driver);
        s.start(&mut driver);
        assert_eq!(driver.outstanding(), 1);
        assert!(s.has_pending_frame());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let bad_jitter = PhysicsTuning {
            angle_jitter: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            Scheduler::new(state(), bad_jitter, 1, (), ()),
            Err(TuningError::JitterOutOfRange(_))
        ));

        let bad_corners = PhysicsTuning {
            corner_factor_min: 1.3,
            corner_factor_max: 0.7,
            ..Default::default()
        };
        assert!(matches!(
            Scheduler::new(state(), bad_corners, 1, (), ()),
            Err(TuningError::CornerRange { .. })
        ));
    }
}
