//! Circular orbit model.
//!
//! Angle = elapsed · angular_scale · orbit_speed + offset_angle.
//! Position = parent position + orbit_radius · (cos a, 0, sin a).
//! Angles are computed in f64 from total elapsed time, so there is no drift.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::world::body::OrbitalComponent;
use crate::world::registry::BodyRegistry;

/// Angle in radians at `elapsed` seconds.
#[inline]
pub fn orbit_angle(elapsed: f64, angular_scale: f64, orbit: &OrbitalComponent) -> f64 {
    elapsed * angular_scale * orbit.orbit_speed + orbit.offset_angle
}

/// Point on the circle of `radius` around `center`, in the plane y = center.y.
#[inline]
pub fn orbit_position(center: Vec3, radius: f32, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    center + Vec3::new(radius * cos as f32, 0.0, radius * sin as f32)
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitEngine {
    /// Radians per second for an orbit speed of 1.
    pub angular_scale: f64,
}

impl OrbitEngine {
    pub fn new(angular_scale: f64) -> Self {
        Self { angular_scale }
    }

    /// Recompute every orbital body's position. Parents are updated before
    /// their children, so moons follow their planet's current position.
    pub fn update(&self, registry: &mut BodyRegistry, elapsed: f64) {
        for i in 0..registry.update_order().len() {
            let id = registry.update_order()[i];
            let Some(orbit) = registry.get(id).and_then(|b| b.orbit) else {
                continue;
            };
            let center = registry.position_of(orbit.parent);
            let angle = orbit_angle(elapsed, self.angular_scale, &orbit);
            if let Some(body) = registry.get_mut(id) {
                body.position = orbit_position(center, orbit.orbit_radius, angle);
            }
        }
    }

    /// Seconds for one revolution, or `None` for a stationary orbit.
    pub fn period(&self, orbit: &OrbitalComponent) -> Option<f64> {
        let rate = self.angular_scale * orbit.orbit_speed;
        (rate > 0.0).then(|| TAU / rate)
    }
}

impl Default for OrbitEngine {
    fn default() -> Self {
        Self::new(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;
    use crate::assets::manifest::AssetManifest;
    use crate::world::body::BodyKind;
    use crate::world::config::{BodyConfig, SystemConfig};

    fn orbit(radius: f32, speed: f64, offset: f64) -> OrbitalComponent {
        OrbitalComponent {
            orbit_radius: radius,
            orbit_speed: speed,
            offset_angle: offset,
            parent: BodyId(0),
        }
    }

    #[test]
    fn starts_at_offset_angle() {
        let o = orbit(10.0, 1.0, 0.0);
        let p = orbit_position(Vec3::ZERO, o.orbit_radius, orbit_angle(0.0, 1.0, &o));
        assert!((p - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-6);

        let o = orbit(10.0, 1.0, std::f64::consts::FRAC_PI_2);
        let p = orbit_position(Vec3::ZERO, 10.0, orbit_angle(0.0, 1.0, &o));
        assert!((p - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
    }

    #[test]
    fn closes_after_one_period() {
        let engine = OrbitEngine::new(1.0);
        let o = orbit(10.0, 1.0, 0.0);
        let period = engine.period(&o).unwrap();
        assert!((period - TAU).abs() < 1e-12);
        let start = orbit_position(Vec3::ZERO, 10.0, orbit_angle(0.0, 1.0, &o));
        assert!((start - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-6);
        let end = orbit_position(Vec3::ZERO, 10.0, orbit_angle(period, 1.0, &o));
        assert!((start - end).length() < 1e-4);

        // Every sample along the way stays on the circle, and the samples
        // sweep all four quadrants.
        let mut quadrants = [false; 4];
        for step in 0..=64 {
            let t = period * step as f64 / 64.0;
            let p = orbit_position(Vec3::ZERO, 10.0, orbit_angle(t, 1.0, &o));
            assert!((p.length() - 10.0).abs() < 1e-4);
            assert_eq!(p.y, 0.0);
            let q = match (p.x >= 0.0, p.z >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            quadrants[q] = true;
        }
        assert!(quadrants.iter().all(|&seen| seen));
        assert_eq!(engine.period(&orbit(10.0, 0.0, 0.0)), None);
    }

    #[test]
    fn angle_is_monotonic() {
        let o = orbit(1.0, 0.3, 2.0);
        let mut last = f64::MIN;
        for step in 0..1000 {
            let a = orbit_angle(step as f64 * 0.7, 0.01, &o);
            assert!(a >= last);
            last = a;
        }
    }

    #[test]
    fn radius_invariant_across_hierarchy() {
        let config = SystemConfig::default()
            .with_body(BodyConfig::anchor("Sun", 20.0, BodyKind::Star).with_position(Vec3::new(5.0, 2.0, -1.0)))
            .with_body(BodyConfig::orbiting("Earth", 1.0, BodyKind::Earth, 500.0).with_speed(0.07))
            .with_body(
                BodyConfig::orbiting("Moon", 0.27, BodyKind::Planet, 3.0)
                    .with_parent("Earth")
                    .with_speed(0.09)
                    .with_offset(1.0),
            );
        let mut reg = BodyRegistry::from_config(&config, &AssetManifest::default()).unwrap();
        let engine = OrbitEngine::default();
        let (sun, earth, moon) = (
            reg.id_of("Sun").unwrap(),
            reg.id_of("Earth").unwrap(),
            reg.id_of("Moon").unwrap(),
        );

        for step in 0..200 {
            let t = step as f64 * 37.5;
            engine.update(&mut reg, t);
            let s = reg.position_of(sun);
            let e = reg.position_of(earth);
            let m = reg.position_of(moon);
            assert!(((e - s).length() - 500.0).abs() < 1e-3);
            assert!(((m - e).length() - 3.0).abs() < 1e-3);
            assert!((e.y - s.y).abs() < 1e-6);
            assert!((m.y - e.y).abs() < 1e-6);
        }
        // Anchor never moves.
        assert_eq!(reg.position_of(sun), Vec3::new(5.0, 2.0, -1.0));
    }
}
