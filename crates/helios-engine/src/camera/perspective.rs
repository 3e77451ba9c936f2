use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Perspective camera, Y-up, right-handed. Depth maps to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 200.0),
            look_at: Vec3::ZERO,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Project a world point to normalized device coordinates.
    /// x and y are in [-1, 1] and z in [0, 1] when inside the frustum.
    /// Points behind the camera land outside that range.
    pub fn project(&self, world: Vec3) -> Vec3 {
        let clip: Vec4 = self.view_projection() * world.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return Vec3::splat(f32::INFINITY);
        }
        let ndc = clip.truncate() / clip.w;
        if clip.w < 0.0 {
            // Behind the eye: push depth out of range.
            return Vec3::new(ndc.x, ndc.y, ndc.z.abs().max(1.0) + 1.0);
        }
        ndc
    }

    /// Unit vector from the camera toward its look-at point.
    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or_zero()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 100_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_target_projects_to_center() {
        let mut cam = PerspectiveCamera::default();
        cam.look_at = Vec3::new(30.0, 5.0, -10.0);
        let ndc = cam.project(cam.look_at);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn behind_camera_is_out_of_range() {
        let cam = PerspectiveCamera::default();
        let ndc = cam.project(Vec3::new(0.0, 0.0, 400.0));
        assert!(ndc.z > 1.0);
    }

    #[test]
    fn right_of_view_is_positive_x() {
        let cam = PerspectiveCamera::default();
        let ndc = cam.project(Vec3::new(10.0, 10.0, 0.0));
        assert!(ndc.x > 0.0 && ndc.y > 0.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = PerspectiveCamera::default();
        cam.resize(1920, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        cam.resize(0, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}
