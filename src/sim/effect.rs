//! Brick effects and strategy resolution
//!
//! Every brick is bound to one `Effect` when the board is laid out. The
//! effect runs when the brick is legitimately destroyed.
//!
//! Resolution draws from two weighted tables:
//! - primary: 5/10 `NoOp`, 1/10 each of the four spawn effects and `Composite`
//! - nested (children of a composite): 1/5 each of the four spawn effects and
//!   `Composite`
//!
//! Nested composites are capped at `MAX_COMPOSITE_DEPTH`; at the cap only
//! non-composite outcomes are drawn.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::state::GameState;
use crate::consts::MAX_COMPOSITE_DEPTH;

/// Discriminant of an `Effect`, used in weight tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    NoOp,
    SpawnExtraBalls,
    SpawnExtraPaddle,
    FollowCamera,
    SpawnExtraLife,
    Composite,
}

/// Action taken when a brick is destroyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Plain destructible brick
    NoOp,
    /// Two pucks from the brick's center
    SpawnExtraBalls,
    /// Temporary second paddle at the board center
    SpawnExtraPaddle,
    /// Camera follows the main ball for a few bounces
    FollowCamera,
    /// Falling heart that grants a life when caught
    SpawnExtraLife,
    /// Applies both children, first then second
    Composite(Box<Effect>, Box<Effect>),
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::NoOp => EffectKind::NoOp,
            Effect::SpawnExtraBalls => EffectKind::SpawnExtraBalls,
            Effect::SpawnExtraPaddle => EffectKind::SpawnExtraPaddle,
            Effect::FollowCamera => EffectKind::FollowCamera,
            Effect::SpawnExtraLife => EffectKind::SpawnExtraLife,
            Effect::Composite(..) => EffectKind::Composite,
        }
    }

    /// Composite nesting depth (0 for a leaf)
    pub fn depth(&self) -> u32 {
        match self {
            Effect::Composite(a, b) => 1 + a.depth().max(b.depth()),
            _ => 0,
        }
    }

    /// Leaf effects in application order
    pub fn leaves(&self) -> Vec<EffectKind> {
        match self {
            Effect::Composite(a, b) => {
                let mut out = a.leaves();
                out.extend(b.leaves());
                out
            }
            leaf => vec![leaf.kind()],
        }
    }

    /// Run this effect against the game.
    ///
    /// Capacity limits inside (paddles, active camera) turn individual
    /// spawns into no-ops; nothing here fails.
    pub fn apply(&self, state: &mut GameState, hit: &BrickHit) {
        match self {
            Effect::NoOp => {}
            Effect::SpawnExtraBalls => state.spawn_pucks(hit.brick_center),
            Effect::SpawnExtraPaddle => {
                state.spawn_extra_paddle();
            }
            Effect::FollowCamera => {
                state.follow_camera(hit.other);
            }
            Effect::SpawnExtraLife => state.spawn_heart(hit.brick_center),
            Effect::Composite(first, second) => {
                first.apply(state, hit);
                second.apply(state, hit);
            }
        }
    }
}

/// Where and by what a brick was destroyed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    /// Center of the brick at removal
    pub brick_center: Vec2,
    /// The entity that hit it (ball or puck)
    pub other: EntityId,
}

/// Weight tables for strategy selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRegistry {
    primary: Vec<(EffectKind, u32)>,
    nested: Vec<(EffectKind, u32)>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectRegistry {
    /// The stock game tables
    pub fn standard() -> Self {
        Self {
            primary: vec![
                (EffectKind::NoOp, 5),
                (EffectKind::SpawnExtraBalls, 1),
                (EffectKind::SpawnExtraPaddle, 1),
                (EffectKind::FollowCamera, 1),
                (EffectKind::SpawnExtraLife, 1),
                (EffectKind::Composite, 1),
            ],
            nested: vec![
                (EffectKind::SpawnExtraBalls, 1),
                (EffectKind::SpawnExtraPaddle, 1),
                (EffectKind::FollowCamera, 1),
                (EffectKind::SpawnExtraLife, 1),
                (EffectKind::Composite, 1),
            ],
        }
    }

    /// Every brick gets `kind`. Composite children keep the stock nested table.
    pub fn only(kind: EffectKind) -> Self {
        Self {
            primary: vec![(kind, 1)],
            nested: Self::standard().nested,
        }
    }

    pub fn with_tables(primary: Vec<(EffectKind, u32)>, nested: Vec<(EffectKind, u32)>) -> Self {
        Self { primary, nested }
    }

    pub fn primary(&self) -> &[(EffectKind, u32)] {
        &self.primary
    }

    pub fn nested(&self) -> &[(EffectKind, u32)] {
        &self.nested
    }
}

/// Weighted pick from `table`. With `allow_composite` false the composite
/// entry is ignored; an empty (or all-zero) table yields `NoOp`.
fn draw<R: Rng>(table: &[(EffectKind, u32)], rng: &mut R, allow_composite: bool) -> EffectKind {
    let eligible = |kind: EffectKind| allow_composite || kind != EffectKind::Composite;
    let total: u32 = table
        .iter()
        .filter(|(kind, _)| eligible(*kind))
        .map(|(_, weight)| weight)
        .sum();
    if total == 0 {
        return EffectKind::NoOp;
    }

    let mut roll = rng.random_range(0..total);
    for &(kind, weight) in table.iter().filter(|(kind, _)| eligible(*kind)) {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    unreachable!("roll below total weight always lands in the table")
}

/// Picks an effect for each new brick
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResolver {
    registry: EffectRegistry,
    max_depth: u32,
}

impl Default for StrategyResolver {
    fn default() -> Self {
        Self::new(EffectRegistry::standard())
    }
}

impl StrategyResolver {
    pub fn new(registry: EffectRegistry) -> Self {
        Self {
            registry,
            max_depth: MAX_COMPOSITE_DEPTH,
        }
    }

    /// Override the composite nesting cap (0 disables composites entirely)
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Draw one effect. The returned tree never nests deeper than `max_depth`.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Effect {
        let kind = draw(&self.registry.primary, rng, self.max_depth > 0);
        self.build(kind, rng, 1)
    }

    /// `depth` is the nesting level a composite built here would occupy
    fn build<R: Rng>(&self, kind: EffectKind, rng: &mut R, depth: u32) -> Effect {
        match kind {
            EffectKind::NoOp => Effect::NoOp,
            EffectKind::SpawnExtraBalls => Effect::SpawnExtraBalls,
            EffectKind::SpawnExtraPaddle => Effect::SpawnExtraPaddle,
            EffectKind::FollowCamera => Effect::FollowCamera,
            EffectKind::SpawnExtraLife => Effect::SpawnExtraLife,
            EffectKind::Composite => {
                let allow_nested = depth < self.max_depth;
                let first = draw(&self.registry.nested, rng, allow_nested);
                let second = draw(&self.registry.nested, rng, allow_nested);
                let first = self.build(first, rng, depth + 1);
                let second = self.build(second, rng, depth + 1);
                Effect::Composite(Box::new(first), Box::new(second))
            }
        }
    }
}
