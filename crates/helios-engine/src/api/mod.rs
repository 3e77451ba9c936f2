pub mod experience;
pub mod types;

pub use experience::{Experience, ExperienceConfig, Sizes};
pub use types::{BodyId, Color, HostEvent, MaterialId, MeshId, TextureId, WorldEvent};
