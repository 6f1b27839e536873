//! Board settings
//!
//! Loaded from an optional JSON file and overridden by CLI arguments.
//! Always validated before a round is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Number of positional arguments that override the brick grid
const DIMENSION_ARGS: usize = 2;

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows of bricks
    pub rows: u32,
    /// Bricks per row
    pub columns: u32,
    /// Board width in pixels
    pub window_width: f32,
    /// Board height in pixels (the lower bound for out-of-bounds checks)
    pub window_height: f32,
    /// RNG seed; `None` draws one at startup
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply `rows columns` positional arguments.
    ///
    /// Exactly two arguments override the grid; any other count leaves the
    /// current grid untouched.
    pub fn with_dimension_args(mut self, args: &[String]) -> Result<Self, ConfigError> {
        if args.len() != DIMENSION_ARGS {
            if !args.is_empty() {
                log::debug!("Ignoring {} positional arguments, keeping default grid", args.len());
            }
            return Ok(self);
        }
        self.rows = parse_dimension("rows", &args[0])?;
        self.columns = parse_dimension("columns", &args[1])?;
        Ok(self)
    }

    /// Reject configurations that would produce degenerate geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::NonPositive { what: "rows", value: 0 });
        }
        if self.columns == 0 {
            return Err(ConfigError::NonPositive { what: "columns", value: 0 });
        }
        if self.window_width <= 2.0 * WALL_THICKNESS || self.window_height <= 2.0 * WALL_THICKNESS {
            return Err(ConfigError::WindowTooSmall {
                width: self.window_width,
                height: self.window_height,
            });
        }
        let width = self.brick_width();
        if width <= 0.0 {
            return Err(ConfigError::DegenerateBrickWidth {
                columns: self.columns,
                width,
            });
        }
        let max = self.max_rows();
        if self.rows > max {
            return Err(ConfigError::TooManyRows { rows: self.rows, max });
        }
        self.brick_count()?;
        Ok(())
    }

    /// Brick width: the space between the side walls minus the gaps, split evenly
    pub fn brick_width(&self) -> f32 {
        let inner = self.window_width - 2.0 * WALL_THICKNESS;
        let gaps = BRICK_SPACING * (self.columns as f32 + 1.0);
        (inner - gaps) / self.columns as f32
    }

    /// Rows that fit between the top wall and the top of the main paddle.
    /// Each row takes one spacing gap plus one brick height.
    pub fn max_rows(&self) -> u32 {
        let paddle_top = self.window_height - PADDLE_OFFSET_FROM_BOTTOM - PADDLE_HEIGHT / 2.0;
        let room = paddle_top - WALL_THICKNESS;
        (room / (BRICK_SPACING + BRICK_HEIGHT)).floor().max(0.0) as u32
    }

    /// Total bricks on a fresh board
    pub fn brick_count(&self) -> Result<u32, ConfigError> {
        self.rows
            .checked_mul(self.columns)
            .ok_or(ConfigError::TooManyBricks {
                rows: self.rows,
                columns: self.columns,
            })
    }
}

fn parse_dimension(what: &'static str, input: &str) -> Result<u32, ConfigError> {
    let value: i64 = input.trim().parse().map_err(|_| ConfigError::NotAnInteger {
        what,
        input: input.to_string(),
    })?;
    if value <= 0 {
        return Err(ConfigError::NonPositive { what, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::NotAnInteger {
        what,
        input: input.to_string(),
    })
}
