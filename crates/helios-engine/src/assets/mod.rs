pub mod manifest;
pub mod resources;

pub use manifest::{AssetManifest, TextureSource};
pub use resources::{LoadStatus, Resources, TextureLoader};
