//! Temporary camera follow
//!
//! At most one target is followed at a time. The follow expires after a
//! fixed number of the target's bounces, polled once per frame.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::consts::{CAMERA_FOLLOW_BOUNCES, CAMERA_ZOOM};

/// What the renderer should center on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub target: EntityId,
    /// Visible area relative to the window
    pub zoom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Follow {
    target: EntityId,
    expires_at: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFollowController {
    active: Option<Follow>,
}

impl CameraFollowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow `target`, whose bounce counter currently reads `bounces`.
    /// No-op (returns false) while another follow is active.
    pub fn activate(&mut self, target: EntityId, bounces: u32) -> bool {
        if self.active.is_some() {
            return false;
        }
        let expires_at = bounces + CAMERA_FOLLOW_BOUNCES;
        self.active = Some(Follow { target, expires_at });
        log::debug!("Camera following entity {target} until bounce {expires_at}");
        true
    }

    /// Detach once the target's bounce counter reaches the expiry
    pub fn update(&mut self, bounces: u32) {
        if self.active.is_some_and(|f| bounces >= f.expires_at) {
            if let Some(follow) = self.active.take() {
                log::debug!("Camera released entity {}", follow.target);
            }
        }
    }

    pub fn detach(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.active.map(|f| f.target)
    }

    /// Bounce count at which the follow ends
    pub fn deadline(&self) -> Option<u32> {
        self.active.map(|f| f.expires_at)
    }

    pub fn view(&self) -> Option<CameraView> {
        self.active.map(|f| CameraView {
            target: f.target,
            zoom: CAMERA_ZOOM,
        })
    }
}
