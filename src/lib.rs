//! Bricker - a brick-breaking arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (brick strategies, round state, entities)
//! - `session`: Round-end prompts and replay handling
//! - `platform`: Input/prompt abstraction and headless implementations
//! - `settings`: Board configuration and validation

pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use session::{Session, SessionStatus};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default board window
    pub const WINDOW_WIDTH: f32 = 700.0;
    pub const WINDOW_HEIGHT: f32 = 500.0;
    pub const WALL_THICKNESS: f32 = 10.0;

    /// Default brick grid
    pub const DEFAULT_ROWS: u32 = 7;
    pub const DEFAULT_COLUMNS: u32 = 8;
    pub const BRICK_HEIGHT: f32 = 15.0;
    pub const BRICK_SPACING: f32 = 10.0;

    /// Lives
    pub const DEFAULT_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 4;

    /// Paddles
    pub const MAX_PADDLES: u8 = 2;
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_OFFSET_FROM_BOTTOM: f32 = 40.0;
    pub const PADDLE_SPEED: f32 = 300.0;
    /// Ball/puck hits an extra paddle absorbs before it vanishes
    pub const EXTRA_PADDLE_HITS: u32 = 4;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_INITIAL_SPEED: f32 = 200.0;
    pub const PUCK_SCALE: f32 = 0.75;
    pub const PUCKS_PER_SPAWN: usize = 2;

    /// Falling heart pickup
    pub const HEART_SPEED: f32 = 100.0;
    pub const UI_ICON_SIZE: f32 = 20.0;
    pub const UI_ICON_SPACING: f32 = 5.0;
    pub const HEART_OFFSET_FROM_BOTTOM: f32 = 25.0;

    /// Camera follow
    pub const CAMERA_FOLLOW_BOUNCES: u32 = 5; // includes the triggering bounce
    pub const CAMERA_ZOOM: f32 = 1.2;

    /// Strategy caps
    pub const MAX_STRATEGY_FIRINGS: u8 = 3;
    pub const MAX_COMPOSITE_DEPTH: u32 = 4;
}

/// Velocity of length `speed` pointing along `theta` (radians)
#[inline]
pub fn velocity_from_angle(speed: f32, theta: f32) -> Vec2 {
    Vec2::new(speed * theta.cos(), speed * theta.sin())
}
