//! Body table. Sizes are relative to Earth; orbit radii are compressed so
//! every planet fits in one view.

use helios_engine::{BodyConfig, BodyKind, Color, SystemConfig};

pub const SUN_RADIUS: f32 = 20.0;

/// Planet rows: name, radius, orbit radius, marker color, texture keys.
const PLANETS: [(&str, f32, f32, u32, &[&str]); 4] = [
    ("Mercury", 0.38, 350.0, 0x696969, &["mercury"]),
    ("Venus", 0.94, 450.0, 0xeea046, &["venusSurface"]),
    ("Mars", 0.53, 650.0, 0xd3613f, &["mars"]),
    ("Jupiter", 10.96, 900.0, 0x696158, &["jupiter"]),
];

fn hex(rgb: u32) -> Color {
    Color::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub fn system_config() -> SystemConfig {
    let sun = BodyConfig::anchor("Sun", SUN_RADIUS, BodyKind::Star)
        .with_textures(&["sunLava", "sunCloud"])
        .with_marker(hex(0xffff00));
    let earth = BodyConfig::orbiting("Earth", 1.0, BodyKind::Earth, 500.0)
        .with_textures(&["earthDay", "earthNight", "earthSpecularClouds"])
        .with_marker(hex(0x2e6faf));

    let mut config = SystemConfig::default().with_body(sun);
    for (name, radius, orbit_radius, marker, textures) in PLANETS {
        if name == "Mars" {
            // Keep Earth between Venus and Mars in the table.
            config = config.with_body(earth.clone());
        }
        config = config.with_body(
            BodyConfig::orbiting(name, radius, BodyKind::Planet, orbit_radius)
                .with_textures(textures)
                .with_marker(hex(marker)),
        );
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources;
    use helios_engine::{BodyRegistry, CommandRecorder, Experience, ExperienceConfig, TextureLoader, WorldEvent};

    struct AllLoad;

    impl TextureLoader for AllLoad {
        fn load(&mut self, _path: &str) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn table_validates_against_sources() {
        let registry = BodyRegistry::from_config(&system_config(), &sources::manifest()).unwrap();
        let names: Vec<_> = registry.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Sun", "Mercury", "Venus", "Earth", "Mars", "Jupiter"]);
        let sun = registry.by_name("Sun").unwrap();
        assert!(sun.is_anchor() && sun.glow_source);
        let earth = registry.by_name("Earth").unwrap();
        assert_eq!(earth.marker_color.unwrap().to_hex(), "#2e6faf");
        assert_eq!(earth.textures.len(), 3);
    }

    #[test]
    fn random_orbit_parameters_stay_in_range() {
        let registry = BodyRegistry::from_config(&system_config(), &sources::manifest()).unwrap();
        for body in registry.iter().filter(|b| !b.is_anchor()) {
            let orbit = body.orbit.as_ref().unwrap();
            assert!((0.0..0.1).contains(&orbit.orbit_speed));
            assert!((0.0..std::f64::consts::TAU).contains(&orbit.offset_angle));
        }
    }

    #[test]
    fn whole_system_comes_up() {
        let config = ExperienceConfig::default().with_system(system_config());
        let mut experience = Experience::new(config, &sources::manifest()).unwrap();
        let mut backend = CommandRecorder::new();
        experience.resources_mut().pump(&mut AllLoad);

        let mut events = Vec::new();
        for _ in 0..3 {
            events.extend(experience.tick(1.0 / 60.0, &mut backend));
        }
        let ready = events.iter().filter(|e| matches!(e, WorldEvent::BodyReady(_))).count();
        assert_eq!(ready, 6);
        assert!(experience.scene().background().is_some());
        // Earth brings an atmosphere shell.
        assert_eq!(experience.scene().len(), 7);

        assert!(experience.navigate_to("Jupiter"));
        for _ in 0..200 {
            experience.tick(1.0 / 60.0, &mut backend);
        }
        let jupiter = experience.body_id("Jupiter").unwrap();
        assert_eq!(experience.camera().followed(), Some(jupiter));
        let distance = experience.camera().camera().position.distance(experience.registry().position_of(jupiter));
        assert!((distance - 10.96 * 5.0).abs() < 1.0);
    }
}
