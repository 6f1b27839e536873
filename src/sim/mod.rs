//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies beyond the input trait

pub mod brick;
pub mod camera;
pub mod collision;
pub mod dispatch;
pub mod effect;
pub mod entity;
pub mod round;
pub mod state;
pub mod tick;

pub use brick::Brick;
pub use camera::{CameraFollowController, CameraView};
pub use collision::{CollisionResult, box_collision, reflect_velocity};
pub use dispatch::{HitOutcome, on_brick_hit};
pub use effect::{BrickHit, Effect, EffectKind, EffectRegistry, StrategyResolver};
pub use entity::{
    Entity, EntityFactory, EntityId, EntityKind, EntityRegistry, Layer, StandardFactory,
};
pub use round::{GamePhase, LifeLoss, LivesTone, RoundState};
pub use state::GameState;
pub use tick::{TickInput, tick};
