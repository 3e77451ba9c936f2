pub mod api;
pub mod core;
pub mod world;
pub mod camera;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod ui;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::experience::{Experience, ExperienceConfig, Sizes};
pub use api::types::{BodyId, Color, HostEvent, MaterialId, MeshId, TextureId, WorldEvent};
pub use core::events::{EventBus, SubscriptionId};
pub use core::scene::{LayerMask, Mesh, SceneGraph, BLOOM_LAYER};
pub use core::time::Clock;
pub use world::body::{Body, BodyKind, BodyState};
pub use world::config::{BodyConfig, SystemConfig};
pub use world::environment::EnvironmentConfig;
pub use world::navigator::{NavigableBody, Navigator};
pub use world::registry::BodyRegistry;
pub use camera::controller::{CameraConfig, CameraController, NavigationState};
pub use camera::perspective::PerspectiveCamera;
pub use renderer::bloom::{BloomParams, SelectiveBloom};
pub use renderer::lighting::{LightState, PointLight};
pub use renderer::material::{Material, MaterialLibrary};
pub use renderer::recorder::CommandRecorder;
pub use renderer::traits::{RenderBackend, RenderTarget};
#[cfg(feature = "software")]
pub use renderer::software::SoftwareRenderer;
pub use bridge::protocol::{encode_commands, RenderCommand, PROTOCOL_VERSION};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::AssetManifest;
pub use assets::resources::{LoadStatus, Resources, TextureLoader};
pub use ui::markers::MarkerState;
pub use error::{ConfigError, EngineError};

// Extensions: decoupled helpers
pub use extensions::{Easing, lerp, lerp_vec3, Rng};
