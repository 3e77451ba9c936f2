pub mod events;
pub mod scene;
pub mod time;

pub use events::{EventBus, SubscriptionId};
pub use scene::{LayerMask, Mesh, SceneGraph, BLOOM_LAYER};
pub use time::Clock;
