pub mod bloom;
pub mod lighting;
pub mod material;
pub mod recorder;
#[cfg(feature = "software")]
pub mod software;
pub mod traits;

// Re-export key types for convenient access
pub use bloom::{BloomParams, SelectiveBloom};
pub use lighting::{LightState, PointLight};
pub use material::{Material, MaterialLibrary, ShaderMaterial, ShaderProgram, Side};
pub use recorder::CommandRecorder;
#[cfg(feature = "software")]
pub use software::SoftwareRenderer;
pub use traits::{FrameView, RenderBackend, RenderTarget};
