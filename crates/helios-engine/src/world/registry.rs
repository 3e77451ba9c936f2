//! The set of simulated bodies.
//!
//! Built once from a [`SystemConfig`]; every structural check happens here so
//! the per-frame systems can assume a valid, acyclic hierarchy.

use std::collections::HashMap;

use glam::Vec3;

use crate::api::types::BodyId;
use crate::assets::manifest::AssetManifest;
use crate::error::ConfigError;
use crate::extensions::rng::Rng;
use crate::world::body::{Body, BodyState, OrbitalComponent};
use crate::world::config::{BodyConfig, SystemConfig};

pub struct BodyRegistry {
    bodies: Vec<Body>,
    by_name: HashMap<String, BodyId>,
    /// Parents always precede their children.
    update_order: Vec<BodyId>,
}

impl BodyRegistry {
    /// Validate `config` and build the registry.
    pub fn from_config(config: &SystemConfig, manifest: &AssetManifest) -> Result<Self, ConfigError> {
        validate_system(config)?;
        let mut by_name = HashMap::with_capacity(config.bodies.len());
        for (i, body) in config.bodies.iter().enumerate() {
            if by_name.insert(body.name.clone(), BodyId(i as u32)).is_some() {
                return Err(ConfigError::DuplicateBody(body.name.clone()));
            }
        }
        let default_parent = config.bodies.iter().position(|b| b.anchor);

        let mut rng = Rng::new(config.seed);
        let mut bodies = Vec::with_capacity(config.bodies.len());
        for (i, cfg) in config.bodies.iter().enumerate() {
            if !(cfg.radius.is_finite() && cfg.radius > 0.0) {
                return Err(ConfigError::InvalidRadius {
                    name: cfg.name.clone(),
                    radius: cfg.radius,
                });
            }
            let orbit = if cfg.anchor {
                validate_anchor(cfg)?;
                None
            } else {
                let parent = match &cfg.parent {
                    Some(parent) => *by_name.get(parent).ok_or_else(|| ConfigError::UnknownParent {
                        name: cfg.name.clone(),
                        parent: parent.clone(),
                    })?,
                    None => BodyId(default_parent.ok_or_else(|| invalid(cfg, "no anchor body to orbit"))? as u32),
                };
                Some(build_orbit(cfg, parent, config.max_random_speed, &mut rng)?)
            };
            let textures = cfg
                .textures
                .iter()
                .map(|key| {
                    manifest
                        .path_of(key)
                        .map(str::to_string)
                        .ok_or_else(|| ConfigError::UnknownTexture {
                            name: cfg.name.clone(),
                            key: key.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            bodies.push(Body {
                id: BodyId(i as u32),
                name: cfg.name.clone(),
                radius: cfg.radius,
                marker_color: cfg.marker_color,
                glow_source: cfg.glows(),
                kind: cfg.kind,
                orbit,
                position: cfg.position.unwrap_or(Vec3::ZERO),
                state: BodyState::Pending,
                textures,
                visual: None,
            });
        }

        let update_order = topological_order(&bodies)?;
        log::info!("Body registry built: {} bodies", bodies.len());
        Ok(Self {
            bodies,
            by_name,
            update_order,
        })
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Body> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn id_of(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    /// Bodies in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn update_order(&self) -> &[BodyId] {
        &self.update_order
    }

    /// Position of the body, or the origin if the handle is stale.
    pub fn position_of(&self, id: BodyId) -> Vec3 {
        self.get(id).map_or(Vec3::ZERO, |b| b.position)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn invalid(cfg: &BodyConfig, reason: &'static str) -> ConfigError {
    ConfigError::InvalidOrbit {
        name: cfg.name.clone(),
        reason,
    }
}

fn validate_system(config: &SystemConfig) -> Result<(), ConfigError> {
    for (field, value) in [
        ("angular_scale", config.angular_scale),
        ("max_random_speed", config.max_random_speed),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ConfigError::InvalidSystem { field, value });
        }
    }
    Ok(())
}

fn validate_anchor(cfg: &BodyConfig) -> Result<(), ConfigError> {
    if cfg.orbit_radius.is_some()
        || cfg.parent.is_some()
        || cfg.orbit_speed.is_some()
        || cfg.offset_angle.is_some()
    {
        return Err(invalid(cfg, "anchor bodies cannot orbit"));
    }
    Ok(())
}

fn build_orbit(
    cfg: &BodyConfig,
    parent: BodyId,
    max_random_speed: f64,
    rng: &mut Rng,
) -> Result<OrbitalComponent, ConfigError> {
    let orbit_radius = cfg.orbit_radius.ok_or_else(|| invalid(cfg, "missing orbit_radius"))?;
    if !(orbit_radius.is_finite() && orbit_radius > 0.0) {
        return Err(invalid(cfg, "orbit_radius must be positive"));
    }
    let orbit_speed = match cfg.orbit_speed {
        Some(speed) if speed.is_finite() && speed >= 0.0 => speed,
        Some(_) => return Err(invalid(cfg, "orbit_speed must be non-negative")),
        None => rng.range(0.0, max_random_speed),
    };
    let offset_angle = match cfg.offset_angle {
        Some(offset) if offset.is_finite() => offset,
        Some(_) => return Err(invalid(cfg, "offset_angle must be finite")),
        None => rng.range(0.0, std::f64::consts::TAU),
    };
    Ok(OrbitalComponent {
        orbit_radius,
        orbit_speed,
        offset_angle,
        parent,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first ordering with cycle detection.
fn topological_order(bodies: &[Body]) -> Result<Vec<BodyId>, ConfigError> {
    let mut marks = vec![Mark::Unvisited; bodies.len()];
    let mut order = Vec::with_capacity(bodies.len());

    for start in 0..bodies.len() {
        // Walk up the parent chain, then emit it top-down.
        let mut chain = Vec::new();
        let mut cursor = Some(start);
        while let Some(i) = cursor {
            match marks[i] {
                Mark::Done => break,
                Mark::InProgress => return Err(ConfigError::OrbitCycle(bodies[i].name.clone())),
                Mark::Unvisited => {
                    marks[i] = Mark::InProgress;
                    chain.push(i);
                    cursor = bodies[i].orbit.map(|o| o.parent.0 as usize);
                }
            }
        }
        for &i in chain.iter().rev() {
            marks[i] = Mark::Done;
            order.push(BodyId(i as u32));
        }
    }
    Ok(order)
}
