//! Simulation module
//!
//! All physics lives here:
//! - Point-in-polygon containment
//! - Boundary and block collision response
//! - Pairwise ball collisions
//! - The per-tick ordering that ties them together
//!
//! Randomness always comes in through an injected `Rng`; nothing here reaches
//! for a global generator.

pub mod collision;
pub mod geometry;
pub mod pairs;
pub mod state;
pub mod tick;

pub use collision::{BoundaryHit, resolve_blocks, resolve_boundary};
pub use geometry::is_inside;
pub use pairs::{resolve_pair, resolve_pairs};
pub use state::{
    Ball, Block, Boundary, CollisionEvent, CollisionKind, GameState, RngState, SceneError,
};
pub use tick::{TickReport, tick, update_ball_position};
