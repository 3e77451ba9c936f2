// extensions/mod.rs
//
// Small self-contained helpers shared by the camera and world modules.

pub mod easing;
pub mod rng;

pub use easing::{Easing, lerp, lerp_vec3};
pub use rng::Rng;
