//! One simulation step
//!
//! Order matters and is part of the behavior: each ball integrates and then
//! resolves boundary and blocks before the next ball moves; ball pairs are
//! resolved once after every ball has moved.

use rand::Rng;

use super::collision::{resolve_blocks, resolve_boundary};
use super::pairs::resolve_pairs;
use super::state::{Ball, CollisionEvent, CollisionKind, GameState};
use crate::tuning::PhysicsTuning;

/// Result of a single tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Tick number that just completed (1-based)
    pub tick: u64,
    /// Collisions in the order they fired
    pub events: Vec<CollisionEvent>,
    /// Balls pulled back inside after the tick left them outside
    pub contained: usize,
}

/// `pos += vel`
#[inline]
pub fn update_ball_position(ball: &mut Ball) {
    ball.integrate();
}

/// Advance the state by one tick
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> TickReport {
    let mut report = TickReport::default();

    let GameState {
        balls,
        blocks,
        boundary,
        ..
    } = &mut *state;

    for (index, ball) in balls.iter_mut().enumerate() {
        update_ball_position(ball);

        if let Some(hit) = resolve_boundary(ball, boundary, tuning, rng) {
            report.events.push(CollisionEvent {
                ball: index,
                kind: CollisionKind::Boundary {
                    corner: hit.is_corner(),
                },
            });
        }

        for block in resolve_blocks(ball, blocks, tuning, rng) {
            report.events.push(CollisionEvent {
                ball: index,
                kind: CollisionKind::Block { block },
            });
        }
    }

    for (i, j) in resolve_pairs(balls, tuning, rng) {
        report.events.push(CollisionEvent {
            ball: i,
            kind: CollisionKind::Ball { other: j },
        });
    }

    // A velocity change from a block or partner after the boundary check, or a
    // separation push, can carry a center across the wall. Put it back where
    // it started the tick and send it back the way it came if needed.
    for ball in balls.iter_mut() {
        if boundary.contains(ball.pos) {
            continue;
        }
        ball.pos = ball.last_pos;
        if !boundary.contains(ball.next_pos()) {
            ball.vel = -ball.vel;
        }
        report.contained += 1;
    }

    state.time_ticks += 1;
    report.tick = state.time_ticks;

    log::trace!(
        "tick {}: {} collisions, {} contained",
        report.tick,
        report.events.len(),
        report.contained
    );

    report
}
