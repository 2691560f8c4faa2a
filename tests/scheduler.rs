//! End-to-end scheduler tests against recording collaborators.

use glam::Vec2;
use polybounce::platform::ManualDriver;
use polybounce::scene::{self, SceneConfig};
use polybounce::sim::{Ball, Block, Boundary, CollisionEvent, CollisionKind, GameState};
use polybounce::{CollisionListener, PhysicsTuning, Renderer, Scheduler, SimPhase};

#[derive(Default)]
struct Frames {
    /// (ticks completed, phase, ball positions) per present call
    seen: Vec<(u64, SimPhase, Vec<Vec2>)>,
    destroyed: Vec<usize>,
}

impl Renderer for Frames {
    fn present(&mut self, state: &GameState, phase: SimPhase) {
        self.seen.push((
            state.time_ticks,
            phase,
            state.balls.iter().map(|b| b.pos).collect(),
        ));
        self.destroyed.push(state.destroyed_count());
    }
}

#[derive(Default)]
struct Events(Vec<CollisionEvent>);

impl CollisionListener for Events {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.0.push(*event);
    }
}

fn run(
    scheduler: &mut Scheduler<Frames, Events>,
    driver: &mut ManualDriver,
    frames: usize,
) -> usize {
    let mut ran = 0;
    for _ in 0..frames {
        let Some(handle) = driver.pop_due() else { break };
        scheduler.on_frame(handle, driver);
        ran += 1;
    }
    ran
}

fn default_scheduler(seed: u64) -> Scheduler<Frames, Events> {
    let tuning = PhysicsTuning::default();
    let state = scene::build(&SceneConfig::default(), tuning.ball_speed).unwrap();
    Scheduler::new(state, tuning, seed, Frames::default(), Events::default()).unwrap()
}

#[test]
fn renders_initial_frame_before_first_tick() {
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(1);
    s.start(&mut driver);

    let frames = &s.renderer().seen;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].0, 0);
    assert_eq!(frames[0].1, SimPhase::Paused);
}

#[test]
fn paused_until_resumed_then_runs() {
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(2);
    s.start(&mut driver);
    run(&mut s, &mut driver, 10);
    assert_eq!(s.state().time_ticks, 0);
    assert!(s.listener().0.is_empty());

    s.resume();
    run(&mut s, &mut driver, 10);
    assert_eq!(s.state().time_ticks, 10);
    // Every present after resume sees a completed tick
    let last = s.renderer().seen.last().unwrap();
    assert_eq!(last.0, 10);
    assert_eq!(last.1, SimPhase::Running);
}

#[test]
fn long_run_keeps_every_ball_inside() {
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(3);
    s.start(&mut driver);
    s.resume();
    assert_eq!(run(&mut s, &mut driver, 3000), 3000);

    let boundary = s.state().boundary.clone();
    for (_, _, positions) in &s.renderer().seen {
        assert!(positions.iter().all(|&p| boundary.contains(p)));
    }
    for ball in &s.state().balls {
        assert!(ball.vel.is_finite());
    }
}

#[test]
fn destroyed_count_never_decreases() {
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(4);
    s.start(&mut driver);
    s.resume();
    run(&mut s, &mut driver, 2000);

    let counts = &s.renderer().destroyed;
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));

    let block_events: Vec<usize> = s
        .listener()
        .0
        .iter()
        .filter_map(|e| match e.kind {
            CollisionKind::Block { block } => Some(block),
            _ => None,
        })
        .collect();
    // Each block reports its destruction exactly once
    let mut unique = block_events.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), block_events.len());
    assert_eq!(block_events.len(), s.state().destroyed_count());
}

#[test]
fn listener_sees_what_stats_count() {
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(5);
    s.start(&mut driver);
    s.resume();
    run(&mut s, &mut driver, 1500);

    let stats = s.stats().clone();
    let events = &s.listener().0;
    let walls = events
        .iter()
        .filter(|e| matches!(e.kind, CollisionKind::Boundary { .. }))
        .count() as u64;
    let balls = events
        .iter()
        .filter(|e| matches!(e.kind, CollisionKind::Ball { .. }))
        .count() as u64;
    assert_eq!(walls, stats.boundary_hits);
    assert_eq!(balls, stats.ball_hits);
    assert!(stats.boundary_hits > 0);
}

#[test]
fn same_seed_same_session() {
    let play = |seed| {
        let mut driver = ManualDriver::new();
        let mut s = default_scheduler(seed);
        s.start(&mut driver);
        s.resume();
        run(&mut s, &mut driver, 800);
        s.into_parts().0
    };
    let (a, b) = (play(77), play(77));
    assert_eq!(a.balls, b.balls);
    assert_eq!(a.blocks, b.blocks);
}

#[test]
fn stop_releases_the_only_request() {
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(6);
    s.start(&mut driver);
    s.resume();
    run(&mut s, &mut driver, 5);
    assert_eq!(driver.outstanding(), 1);

    s.stop(&mut driver);
    assert_eq!(driver.outstanding(), 0);
    assert_eq!(driver.cancelled(), 1);

    // Restarting twice still leaves a single request
    s.start(&mut driver);
    s.start(&mut driver);
    assert_eq!(driver.outstanding(), 1);
    assert_eq!(run(&mut s, &mut driver, 3), 3);
    assert_eq!(s.state().time_ticks, 8);
}

#[test]
fn stopped_scheduler_ignores_late_frames() {
    // A driver that already fired can't be cancelled; the callback must no-op
    let mut driver = ManualDriver::new();
    let mut s = default_scheduler(7);
    s.start(&mut driver);
    s.resume();
    let handle = driver.pop_due().unwrap();
    s.stop(&mut driver);

    assert!(s.on_frame(handle, &mut driver).is_none());
    assert_eq!(s.state().time_ticks, 0);
    assert_eq!(driver.outstanding(), 0);
    assert_eq!(driver.requested(), 1);
}

#[test]
fn boundary_then_blocks_before_pairs() {
    // Ball 0 would leave through the floor and also clips a block. Both
    // resolve before the pair pass, so the events appear in that order.
    let state = GameState::new(
        vec![
            Ball::new(Vec2::new(100.0, 186.0), Vec2::new(0.0, 8.0), 8.0),
            Ball::new(Vec2::new(40.0, 40.0), Vec2::new(1.0, 0.0), 8.0),
            Ball::new(Vec2::new(52.0, 40.0), Vec2::new(-1.0, 0.0), 8.0),
        ],
        vec![Block::new(Vec2::new(90.0, 180.0), 20.0, 10.0)],
        Boundary::rect(200.0, 200.0).unwrap(),
    );
    let mut s = Scheduler::new(
        state,
        PhysicsTuning::exact(),
        8,
        Frames::default(),
        Events::default(),
    )
    .unwrap();
    let mut driver = ManualDriver::new();
    s.start(&mut driver);
    s.resume();
    run(&mut s, &mut driver, 1);

    let kinds: Vec<_> = s.listener().0.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CollisionKind::Boundary { corner: false },
            CollisionKind::Block { block: 0 },
            CollisionKind::Ball { other: 2 },
        ]
    );
    assert!(s.state().all_contained());
}
