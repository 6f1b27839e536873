//! Collision detection and response for axis-aligned boxes
//!
//! Deliberately simple: overlap test, contact normal along the axis of least
//! penetration, and mirror reflection. Good enough for a brick board.

use glam::Vec2;

use super::entity::Entity;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact (pointing from the obstacle toward the mover)
    pub normal: Vec2,
    /// Penetration depth along `normal` (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between `mover` and `obstacle`
///
/// The normal is taken along the axis with the smaller overlap, so a ball
/// clipping the side of a brick bounces sideways and one hitting its face
/// bounces vertically.
pub fn box_collision(mover: &Entity, obstacle: &Entity) -> CollisionResult {
    let delta = mover.center - obstacle.center;
    let reach = mover.half_extents() + obstacle.half_extents();
    let overlap = reach - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }

    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(sign(delta.x), 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, sign(delta.y)), overlap.y)
    };

    CollisionResult {
        hit: true,
        normal,
        penetration,
    }
}

/// Ties (exactly centered) resolve upward/leftward
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 { 1.0 } else { -1.0 }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Push `mover` out of the obstacle and reflect it if it was heading inward
pub fn bounce(mover: &mut Entity, result: &CollisionResult) {
    if !result.hit {
        return;
    }
    if mover.vel.dot(result.normal) < 0.0 {
        mover.vel = reflect_velocity(mover.vel, result.normal);
    }
    mover.center += result.normal * result.penetration;
}

/// Plain overlap test, no response (pickups)
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    box_collision(a, b).hit
}
