// camera/transition.rs
//
// A single camera flight toward a body. Holds only timing and the start pose;
// the destination is read from the body's live position every frame, so the
// flight tracks a moving target.

use glam::Vec3;

use crate::api::types::BodyId;
use crate::extensions::easing::Easing;

#[derive(Debug, Clone)]
pub struct Transition {
    /// Camera position when the flight began.
    pub from_position: Vec3,
    /// Body being approached.
    pub target: BodyId,
    /// Radius of the target, used for the standoff and distance limits.
    pub radius: f32,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time.
    pub elapsed: f32,
    pub easing: Easing,
}

impl Transition {
    pub fn new(from_position: Vec3, target: BodyId, radius: f32, duration: f32) -> Self {
        Self {
            from_position,
            target,
            radius,
            duration,
            elapsed: 0.0,
            easing: Easing::QuartInOut,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by `dt` seconds and return the eased blend factor.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
        self.alpha()
    }

    /// Linear progress in [0, 1]. A zero duration is immediately complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn alpha(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }
}
