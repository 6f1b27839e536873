//! Configuration errors
//!
//! Runtime capacity limits (lives, paddles, fire caps) are not errors; they
//! are defined no-ops handled where they occur.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: i64 },

    #[error("{what} is not an integer: {input:?}")]
    NotAnInteger { what: &'static str, input: String },

    #[error("{columns} columns leave no room for bricks (width {width:.2}px)")]
    DegenerateBrickWidth { columns: u32, width: f32 },

    #[error("{rows} rows of bricks reach the paddle line (at most {max} fit)")]
    TooManyRows { rows: u32, max: u32 },

    #[error("{rows}x{columns} bricks overflow the brick counter")]
    TooManyBricks { rows: u32, columns: u32 },

    #[error("window must be larger than its walls, got {width}x{height}")]
    WindowTooSmall { width: f32, height: f32 },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}
