pub mod appearance;
pub mod body;
pub mod config;
pub mod environment;
pub mod navigator;
pub mod orbit;
pub mod registry;

pub use body::{Body, BodyKind, BodyState, BodyVisual, OrbitalComponent};
pub use config::{BodyConfig, SystemConfig};
pub use environment::EnvironmentConfig;
pub use navigator::{NavigableBody, Navigator};
pub use orbit::{orbit_angle, orbit_position, OrbitEngine};
pub use registry::BodyRegistry;
