//! Brick records
//!
//! The geometry of a brick lives in the entity registry; this record holds
//! its bound strategy and the fire counter gating it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effect::Effect;
use crate::consts::MAX_STRATEGY_FIRINGS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner at layout time
    pub position: Vec2,
    pub width: f32,
    effect: Effect,
    fire_count: u8,
}

impl Brick {
    pub fn new(position: Vec2, width: f32, effect: Effect) -> Self {
        Self {
            position,
            width,
            effect,
            fire_count: 0,
        }
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn fire_count(&self) -> u8 {
        self.fire_count
    }

    pub fn can_fire(&self) -> bool {
        self.fire_count < MAX_STRATEGY_FIRINGS
    }

    /// Consume one firing. Returns the effect to run, or `None` once capped.
    pub fn try_fire(&mut self) -> Option<Effect> {
        if !self.can_fire() {
            return None;
        }
        self.fire_count += 1;
        Some(self.effect.clone())
    }
}
