use serde::Serialize;

use crate::api::types::{BodyId, Color};
use crate::camera::controller::CameraController;
use crate::world::body::Body;
use crate::world::registry::BodyRegistry;

/// Entry shown in navigation UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigableBody {
    pub id: BodyId,
    pub name: String,
    pub marker_color: Color,
    pub radius: f32,
}

/// Name lookup over the navigable bodies, forwarding requests to the camera.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    navigable: Vec<NavigableBody>,
}

impl Navigator {
    /// Collect bodies that have a marker color, in registry order.
    pub fn new(registry: &BodyRegistry) -> Self {
        let navigable = registry
            .iter()
            .filter_map(|body| {
                let marker_color = body.marker_color.filter(|_| body.is_navigable())?;
                Some(NavigableBody {
                    id: body.id,
                    name: body.name.clone(),
                    marker_color,
                    radius: body.radius,
                })
            })
            .collect();
        Self { navigable }
    }

    pub fn navigable(&self) -> &[NavigableBody] {
        &self.navigable
    }

    pub fn find(&self, name: &str) -> Option<&NavigableBody> {
        self.navigable.iter().find(|n| n.name == name)
    }

    /// Ask the camera to fly to `body`. Returns false if the request was dropped.
    pub fn navigate_to(&self, camera: &mut CameraController, body: &Body) -> bool {
        camera.follow_object(body)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.navigable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::assets::manifest::AssetManifest;
    use crate::camera::controller::{CameraConfig, NavigationState};
    use crate::core::events::EventBus;
    use crate::world::body::BodyKind;
    use crate::world::config::{BodyConfig, SystemConfig};

    fn registry() -> BodyRegistry {
        let config = SystemConfig::default()
            .with_body(BodyConfig::anchor("Sun", 20.0, BodyKind::Star).with_marker(Color::from_rgb_u8(255, 255, 0)))
            .with_body(BodyConfig::orbiting("Rock", 0.1, BodyKind::Planet, 40.0))
            .with_body(
                BodyConfig::orbiting("Mars", 0.53, BodyKind::Planet, 650.0).with_marker(Color::from_rgb_u8(0xd3, 0x61, 0x3f)),
            );
        BodyRegistry::from_config(&config, &AssetManifest::default()).unwrap()
    }

    #[test]
    fn lists_marked_bodies_in_order() {
        let nav = Navigator::new(&registry());
        let names: Vec<_> = nav.navigable().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Sun", "Mars"]);
        assert!(nav.find("Rock").is_none());
        assert_eq!(nav.find("Mars").unwrap().marker_color.to_hex(), "#d3613f");
        assert!(nav.to_json().unwrap().contains(r##""marker_color":"#ffff00""##));
    }

    #[test]
    fn navigate_forwards_to_camera() {
        let reg = registry();
        let nav = Navigator::new(&reg);
        let mut camera = CameraController::new(CameraConfig::default(), 800, 600, Rc::new(EventBus::new()));
        let mars = reg.by_name("Mars").unwrap();
        assert!(nav.navigate_to(&mut camera, mars));
        assert_eq!(camera.state(), NavigationState::Transitioning);
        assert!(!nav.navigate_to(&mut camera, reg.by_name("Sun").unwrap()));
    }
}
