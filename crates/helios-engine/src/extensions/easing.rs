// extensions/easing.rs
//
// Easing curves for camera flights.
// Pure math, no dependencies on the world or camera.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    QuadInOut,
    CubicInOut,
    /// Very strong slow start and end. Used for body-to-body flights.
    #[default]
    QuartInOut,
    SineInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]. Endpoints map exactly to 0 and 1.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => in_out(t, 2, 2.0),
            Easing::CubicInOut => in_out(t, 3, 4.0),
            Easing::QuartInOut => in_out(t, 4, 8.0),
            Easing::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[inline]
fn in_out(t: f32, power: i32, k: f32) -> f32 {
    if t < 0.5 {
        k * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two points. `t >= 1` returns `b` exactly.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}
