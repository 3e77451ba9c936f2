//! Screen-space markers for navigable bodies.
//!
//! A marker sits over its body's projected position. It is hidden when the
//! body is outside the view, when another body blocks the line of sight, or
//! when the camera is close enough that the body itself is the better target.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::api::types::BodyId;
use crate::camera::perspective::PerspectiveCamera;
use crate::world::navigator::Navigator;
use crate::world::registry::BodyRegistry;

/// Distance-to-radius ratio below which a marker is hidden.
pub const SHORT_DISTANCE_RATIO: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerState {
    pub body: BodyId,
    pub name: String,
    /// Offset from the viewport center in CSS pixels, y down.
    pub screen: Vec2,
    pub visible: bool,
    pub clickable: bool,
}

/// Nearest positive hit distance of a ray with a sphere.
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    [-b - sqrt, -b + sqrt].into_iter().find(|t| *t >= 0.0)
}

pub fn compute_markers(
    navigator: &Navigator,
    registry: &BodyRegistry,
    camera: &PerspectiveCamera,
    width: f32,
    height: f32,
) -> Vec<MarkerState> {
    navigator
        .navigable()
        .iter()
        .filter_map(|entry| {
            let body = registry.get(entry.id)?;
            let ndc = camera.project(body.position);
            let screen = Vec2::new(ndc.x * width / 2.0, -ndc.y * height / 2.0);
            let mut marker = MarkerState {
                body: body.id,
                name: body.name.clone(),
                screen,
                visible: false,
                clickable: false,
            };
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
                return Some(marker);
            }

            let to_body = body.position - camera.position;
            let distance = to_body.length();
            let dir = to_body.normalize_or_zero();
            let occluded = registry
                .iter()
                .filter(|other| other.id != body.id && other.is_ready())
                .filter_map(|other| ray_sphere(camera.position, dir, other.position, other.radius))
                .any(|t| t < distance - body.radius);
            let short = distance / body.radius < SHORT_DISTANCE_RATIO;

            marker.clickable = !occluded;
            marker.visible = !occluded && !short;
            Some(marker)
        })
        .collect()
}
