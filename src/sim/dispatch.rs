//! Brick collision dispatch
//!
//! Every brick hit runs the base destroy effect first. The brick's own
//! strategy runs only if that removal actually happened, so a brick struck
//! twice in one frame fires at most once.

use super::effect::{BrickHit, Effect};
use super::entity::{EntityId, Layer};
use super::state::GameState;

/// What a brick hit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitOutcome {
    /// The brick was already gone; nothing happened
    AlreadyRemoved,
    /// The brick was destroyed; `fired` is the strategy that ran, if any
    Destroyed { fired: Option<Effect> },
}

/// Handle `other` striking the brick `brick_id`
pub fn on_brick_hit(state: &mut GameState, brick_id: EntityId, other: EntityId) -> HitOutcome {
    let Some(entity) = state.entities.take(brick_id, Layer::Static) else {
        log::trace!("Brick {brick_id} already removed");
        return HitOutcome::AlreadyRemoved;
    };
    state.round.brick_destroyed();

    let Some(mut brick) = state.bricks.remove(&brick_id) else {
        debug_assert!(false, "static entity {brick_id} has no brick record");
        return HitOutcome::Destroyed { fired: None };
    };

    // A composite is one firing however many children it holds
    let fired = brick.try_fire();
    if let Some(effect) = &fired {
        log::debug!("Brick {brick_id} fired {:?}", effect.leaves());
        let hit = BrickHit {
            brick_center: entity.center,
            other,
        };
        effect.apply(state, &hit);
    }
    HitOutcome::Destroyed { fired }
}
