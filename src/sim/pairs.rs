//! Ball-to-ball collisions
//!
//! Equal-mass elastic exchange along the contact normal, followed by
//! positional separation and an antisymmetric random rotation.

use glam::Vec2;
use rand::Rng;

use super::collision::jitter_angle;
use super::state::Ball;
use crate::rotate;
use crate::tuning::PhysicsTuning;

/// Centers closer than this are treated as coincident and skipped
pub const COINCIDENT_EPSILON: f32 = 1e-6;

/// Resolve every overlapping, approaching pair once, in ascending `(i, j)` order.
///
/// Later pairs see velocities already updated by earlier pairs in the same
/// pass. Returns the resolved pairs.
pub fn resolve_pairs<R: Rng + ?Sized>(
    balls: &mut [Ball],
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let mut resolved = Vec::new();

    for i in 0..balls.len() {
        for j in (i + 1)..balls.len() {
            let (head, tail) = balls.split_at_mut(j);
            if resolve_pair(&mut head[i], &mut tail[0], tuning, rng) {
                log::debug!("balls {} and {} collided", i, j);
                resolved.push((i, j));
            }
        }
    }

    resolved
}

/// Resolve a single pair. Returns false when they don't touch, are separating,
/// or sit on top of each other.
pub fn resolve_pair<R: Rng + ?Sized>(
    a: &mut Ball,
    b: &mut Ball,
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;

    if distance >= min_distance {
        return false;
    }
    // No usable normal
    if distance <= COINCIDENT_EPSILON {
        return false;
    }

    let normal = delta / distance;
    let closing = (b.vel - a.vel).dot(normal);
    if closing >= 0.0 {
        return false;
    }

    // Swap the normal components, keep the tangential ones
    let a_n = a.vel.dot(normal);
    let b_n = b.vel.dot(normal);
    a.vel += (b_n - a_n) * normal;
    b.vel += (a_n - b_n) * normal;

    let half_overlap = (min_distance - distance) * 0.5;
    a.pos -= normal * half_overlap;
    b.pos += normal * half_overlap;

    let variation = jitter_angle(rng, tuning);
    a.vel = renormalize(rotate(a.vel, variation), -normal, tuning.ball_speed);
    b.vel = renormalize(rotate(b.vel, -variation), normal, tuning.ball_speed);

    true
}

/// Scale to `speed`, using `fallback` as the direction when `v` has none
fn renormalize(v: Vec2, fallback: Vec2, speed: f32) -> Vec2 {
    let dir = v.normalize_or_zero();
    if dir == Vec2::ZERO {
        fallback * speed
    } else {
        dir * speed
    }
}
