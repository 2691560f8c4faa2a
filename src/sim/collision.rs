//! Collision response against the boundary polygon and against blocks
//!
//! Neither resolver touches ball position; integration has already happened by
//! the time they run. They only rewrite velocity, and they never fail.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Block, Boundary};
use crate::tuning::PhysicsTuning;
use crate::{heading, normalize_angle, rotate};

/// Which axis probes reported the projected position as outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryHit {
    pub hit_x: bool,
    pub hit_y: bool,
}

impl BoundaryHit {
    #[inline]
    pub fn is_corner(&self) -> bool {
        self.hit_x && self.hit_y
    }
}

/// Uniform angle in [-|angle_jitter|, |angle_jitter|].
///
/// A zero or non-finite jitter draws nothing and returns 0.
#[inline]
pub(crate) fn jitter_angle<R: Rng + ?Sized>(rng: &mut R, tuning: &PhysicsTuning) -> f32 {
    let j = tuning.angle_jitter.abs();
    if !(j.is_finite() && j > 0.0) {
        return 0.0;
    }
    rng.random_range(-j..=j)
}

/// Uniform speed factor for corner hits, between the two configured bounds
/// in whichever order they come.
///
/// Falls back to 1 (no rescale) unless both bounds are finite and positive.
#[inline]
pub(crate) fn corner_factor<R: Rng + ?Sized>(rng: &mut R, tuning: &PhysicsTuning) -> f32 {
    let (a, b) = (tuning.corner_factor_min, tuning.corner_factor_max);
    let (lo, hi) = (a.min(b), a.max(b));
    if !(lo.is_finite() && hi.is_finite() && lo > 0.0) {
        return 1.0;
    }
    rng.random_range(lo..=hi)
}

/// Reflect a ball off the boundary if its next step would leave the polygon.
///
/// The collision is classified by probing the x-only and y-only moves:
/// each axis whose probe lands outside gets its velocity component flipped.
/// Corner hits (both axes) rescale speed by a random factor; single-axis hits
/// rotate the reflection by a random angle unless that would bring it within
/// `incident_guard` of the incoming heading.
///
/// If the perturbed velocity still points out of the polygon, the exact
/// reflection is used, then a full reversal.
pub fn resolve_boundary<R: Rng + ?Sized>(
    ball: &mut Ball,
    boundary: &Boundary,
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> Option<BoundaryHit> {
    let next = ball.next_pos();
    if boundary.contains(next) {
        return None;
    }

    let hit = BoundaryHit {
        hit_x: !boundary.contains(Vec2::new(next.x, ball.pos.y)),
        hit_y: !boundary.contains(Vec2::new(ball.pos.x, next.y)),
    };

    let incident = ball.vel;
    let mut reflected = incident;
    if hit.hit_x {
        reflected.x = -reflected.x;
    }
    if hit.hit_y {
        reflected.y = -reflected.y;
    }

    let perturbed = match (hit.hit_x, hit.hit_y) {
        (true, true) => reflected * corner_factor(rng, tuning),
        // Concave vertex: the diagonal step exits but neither axis step does
        (false, false) => -incident,
        _ => perturb_guarded(incident, reflected, tuning, rng),
    };

    ball.vel = [perturbed, reflected, -incident]
        .into_iter()
        .find(|&v| boundary.contains(ball.pos + v))
        .unwrap_or(-incident);

    log::debug!(
        "boundary hit x={} y={} vel ({:.2}, {:.2}) -> ({:.2}, {:.2})",
        hit.hit_x,
        hit.hit_y,
        incident.x,
        incident.y,
        ball.vel.x,
        ball.vel.y
    );

    Some(hit)
}

/// Rotate the reflection by a random angle, falling back to the exact
/// reflection when the result would head back toward the incident direction
fn perturb_guarded<R: Rng + ?Sized>(
    incident: Vec2,
    reflected: Vec2,
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> Vec2 {
    let variation = jitter_angle(rng, tuning);
    let new_angle = heading(reflected) + variation;
    let diff = normalize_angle(new_angle - heading(incident)).abs();
    if diff < tuning.incident_guard {
        reflected
    } else {
        rotate(reflected, variation)
    }
}

/// Test a ball against every live block, destroying each one it overlaps.
///
/// Every hit flips `vy` and applies a random rotation with no incident guard,
/// so a block can send a ball straight back. Speed is preserved.
/// Returns the indices of blocks destroyed by this call, in iteration order.
pub fn resolve_blocks<R: Rng + ?Sized>(
    ball: &mut Ball,
    blocks: &mut [Block],
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> Vec<usize> {
    let mut destroyed = Vec::new();

    for (index, block) in blocks.iter_mut().enumerate() {
        if !block.overlaps(ball.pos, ball.radius) || !block.destroy() {
            continue;
        }

        ball.vel.y = -ball.vel.y;
        ball.vel = rotate(ball.vel, jitter_angle(rng, tuning));
        destroyed.push(index);

        log::debug!("block {} destroyed", index);
    }

    destroyed
}
