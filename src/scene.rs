//! Default scene initializer
//!
//! Balls start together in the middle of the field, fanned out evenly; blocks
//! come from a grid, keeping only cells that sit entirely inside the boundary.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Ball, Block, Boundary, GameState, SceneError};

/// Jagged field outline with a notch on each side
const DEFAULT_BOUNDARY: [[f32; 2]; 12] = [
    [60.0, 40.0],
    [400.0, 20.0],
    [740.0, 40.0],
    [780.0, 200.0],
    [640.0, 300.0],
    [780.0, 420.0],
    [740.0, 560.0],
    [400.0, 580.0],
    [60.0, 560.0],
    [20.0, 420.0],
    [160.0, 300.0],
    [20.0, 200.0],
];

/// Scene layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,
    pub ball_count: usize,
    pub ball_radius: f32,
    pub block_rows: u32,
    pub block_cols: u32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_spacing: [f32; 2],
    pub block_offset: [f32; 2],
    /// Custom outline; the built-in one when absent
    pub boundary: Option<Boundary>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            ball_count: BALL_COUNT,
            ball_radius: BALL_RADIUS,
            block_rows: BLOCK_ROWS,
            block_cols: BLOCK_COLS,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_spacing: [BLOCK_SPACING_X, BLOCK_SPACING_Y],
            block_offset: [BLOCK_OFFSET_X, BLOCK_OFFSET_Y],
            boundary: None,
        }
    }
}

impl SceneConfig {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

pub fn default_boundary() -> Result<Boundary, SceneError> {
    Boundary::from_points(&DEFAULT_BOUNDARY)
}

/// All balls at the field center, headings spaced evenly around the circle
pub fn spawn_balls(config: &SceneConfig, speed: f32) -> Vec<Ball> {
    let count = config.ball_count;
    let step = TAU / count.max(1) as f32;
    (0..count)
        .map(|i| {
            let vel = Vec2::from_angle(i as f32 * step) * speed;
            Ball::new(config.center(), vel, config.ball_radius)
        })
        .collect()
}

/// Grid blocks whose four corners are all inside the boundary
pub fn spawn_blocks(config: &SceneConfig, boundary: &Boundary) -> Vec<Block> {
    let spacing = Vec2::from(config.block_spacing);
    let offset = Vec2::from(config.block_offset);

    let mut blocks = Vec::new();
    for row in 0..config.block_rows {
        for col in 0..config.block_cols {
            let pos = Vec2::new(col as f32, row as f32) * spacing + offset;
            let block = Block::new(pos, config.block_width, config.block_height);
            if block.corners().iter().all(|&c| boundary.contains(c)) {
                blocks.push(block);
            }
        }
    }
    blocks
}

/// Build a validated initial state
pub fn build(config: &SceneConfig, ball_speed: f32) -> Result<GameState, SceneError> {
    let boundary = match &config.boundary {
        Some(b) => b.clone(),
        None => default_boundary()?,
    };
    let balls = spawn_balls(config, ball_speed);
    let blocks = spawn_blocks(config, &boundary);
    log::info!(
        "Scene: {} balls, {} blocks, {} boundary vertices",
        balls.len(),
        blocks.len(),
        boundary.vertices().len()
    );
    GameState::validated(balls, blocks, boundary)
}
