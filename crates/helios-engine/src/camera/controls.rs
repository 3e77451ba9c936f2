use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::perspective::PerspectiveCamera;

pub const DEFAULT_MIN_DISTANCE: f32 = 1.0;
pub const DEFAULT_MAX_DISTANCE: f32 = 100_000.0;

const EPS: f32 = 1e-6;

/// User orbit/zoom around a target point, with optional damping.
///
/// Input only accumulates deltas; [`OrbitControls::update`] applies them to
/// the camera once per frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    enabled: bool,
    pub enable_damping: bool,
    /// Fraction of pending rotation applied per update when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.enable_damping = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops any rotation or zoom not yet applied.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_scale = 1.0;
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn set_limits(&mut self, min_distance: f32, max_distance: f32) {
        self.min_distance = min_distance;
        self.max_distance = max_distance.max(min_distance);
    }

    pub fn reset_limits(&mut self) {
        self.set_limits(DEFAULT_MIN_DISTANCE, DEFAULT_MAX_DISTANCE);
    }

    /// Queue a drag of `dx`, `dy` pixels. A full viewport height turns one revolution.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        let per_pixel = 2.0 * PI * self.rotate_speed / viewport_height;
        self.pending_theta -= dx * per_pixel;
        self.pending_phi -= dy * per_pixel;
    }

    /// Queue a wheel step. Positive values move away from the target.
    pub fn dolly(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        let step = 0.95_f32.powf(self.zoom_speed);
        if delta > 0.0 {
            self.pending_scale /= step;
        } else if delta < 0.0 {
            self.pending_scale *= step;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending_theta.abs() > EPS || self.pending_phi.abs() > EPS || (self.pending_scale - 1.0).abs() > EPS
    }

    /// Apply pending input and distance limits, then aim the camera at the target.
    /// The position is only rewritten when something changes it, so an exact
    /// placement survives frames without input. Returns true if it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        camera.look_at = self.target;
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= EPS {
            return false;
        }
        let clamped = radius.clamp(self.min_distance, self.max_distance);
        if !self.has_pending() && clamped == radius {
            return false;
        }

        let share = if self.enable_damping { self.damping_factor } else { 1.0 };
        let theta = offset.x.atan2(offset.z) + self.pending_theta * share;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.pending_phi * share).clamp(EPS, PI - EPS);
        let new_radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        camera.position = self.target + Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * new_radius;

        if self.enable_damping {
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }
        self.pending_scale = 1.0;
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
