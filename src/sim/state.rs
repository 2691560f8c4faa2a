//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::is_inside;

/// Scene rejected because it breaks an assumption the physics relies on
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("boundary needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("boundary vertex {index} is not finite")]
    NonFiniteVertex { index: usize },

    #[error("ball {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("ball {index} has non-finite position or velocity")]
    NonFiniteBall { index: usize },

    #[error("block {index} has invalid size {width}x{height}")]
    InvalidBlock { index: usize, width: f32, height: f32 },

    #[error("ball {index} starts outside the boundary at ({x}, {y})")]
    BallOutsideBoundary { index: usize, x: f32, y: f32 },
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant for the ball's lifetime
    pub radius: f32,
    /// Position before the latest `integrate`
    #[serde(skip)]
    pub last_pos: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            last_pos: pos,
        }
    }

    /// Explicit Euler step, one tick
    #[inline]
    pub fn integrate(&mut self) {
        self.last_pos = self.pos;
        self.pos += self.vel;
    }

    /// Where the ball will be after the next integration
    #[inline]
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// An axis-aligned destructible block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Flips false -> true once, never back
    pub destroyed: bool,
}

impl Block {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            width,
            height,
            destroyed: false,
        }
    }

    /// Strict AABB overlap against a circle's bounding box
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius > self.pos.x
            && center.x - radius < self.pos.x + self.width
            && center.y + radius > self.pos.y
            && center.y - radius < self.pos.y + self.height
    }

    /// Mark destroyed; returns true only on the first call
    pub fn destroy(&mut self) -> bool {
        let was_alive = !self.destroyed;
        self.destroyed = true;
        was_alive
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.pos,
            self.pos + Vec2::new(self.width, 0.0),
            self.pos + Vec2::new(0.0, self.height),
            self.pos + Vec2::new(self.width, self.height),
        ]
    }
}

/// Closed simple polygon that contains every ball. The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Boundary {
    vertices: Vec<Vec2>,
}

impl Boundary {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, SceneError> {
        if vertices.len() < 3 {
            return Err(SceneError::TooFewVertices(vertices.len()));
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(SceneError::NonFiniteVertex { index });
        }
        Ok(Self { vertices })
    }

    pub fn from_points(points: &[[f32; 2]]) -> Result<Self, SceneError> {
        Self::new(points.iter().map(|&p| Vec2::from(p)).collect())
    }

    /// Axis-aligned rectangle with top-left corner at the origin
    pub fn rect(width: f32, height: f32) -> Result<Self, SceneError> {
        Self::from_points(&[[0.0, 0.0], [width, 0.0], [width, height], [0.0, height]])
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        is_inside(point, &self.vertices)
    }
}

impl TryFrom<Vec<Vec2>> for Boundary {
    type Error = SceneError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Boundary> for Vec<Vec2> {
    fn from(boundary: Boundary) -> Self {
        boundary.vertices
    }
}

/// Seed record so a session's generator can be rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// What a ball hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Polygon wall; `corner` when both axis probes reported outside
    Boundary { corner: bool },
    /// Block at this index was destroyed
    Block { block: usize },
    /// Ball at this index
    Ball { other: usize },
}

/// A collision that fired during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub ball: usize,
    pub kind: CollisionKind,
}

/// Everything the simulation mutates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub boundary: Boundary,
    /// Completed ticks
    pub time_ticks: u64,
}

impl GameState {
    /// Build a state without checking anything
    pub fn new(balls: Vec<Ball>, blocks: Vec<Block>, boundary: Boundary) -> Self {
        Self {
            balls,
            blocks,
            boundary,
            time_ticks: 0,
        }
    }

    /// Build a state, checking the invariants the resolvers assume
    pub fn validated(
        balls: Vec<Ball>,
        blocks: Vec<Block>,
        boundary: Boundary,
    ) -> Result<Self, SceneError> {
        for (index, ball) in balls.iter().enumerate() {
            if !(ball.radius.is_finite() && ball.radius > 0.0) {
                return Err(SceneError::InvalidRadius {
                    index,
                    radius: ball.radius,
                });
            }
            if !(ball.pos.is_finite() && ball.vel.is_finite()) {
                return Err(SceneError::NonFiniteBall { index });
            }
            if !boundary.contains(ball.pos) {
                return Err(SceneError::BallOutsideBoundary {
                    index,
                    x: ball.pos.x,
                    y: ball.pos.y,
                });
            }
        }

        for (index, block) in blocks.iter().enumerate() {
            let sized = |v: f32| v.is_finite() && v > 0.0;
            if !(sized(block.width) && sized(block.height) && block.pos.is_finite()) {
                return Err(SceneError::InvalidBlock {
                    index,
                    width: block.width,
                    height: block.height,
                });
            }
        }

        Ok(Self::new(balls, blocks, boundary))
    }

    pub fn live_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !b.destroyed)
    }

    pub fn destroyed_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.destroyed).count()
    }

    /// True when every ball center is inside the boundary
    pub fn all_contained(&self) -> bool {
        self.balls.iter().all(|b| self.boundary.contains(b.pos))
    }
}
