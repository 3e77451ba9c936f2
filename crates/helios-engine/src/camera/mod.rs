pub mod controller;
pub mod controls;
pub mod perspective;
pub mod transition;

pub use controller::{CameraConfig, CameraController, NavigationState};
pub use controls::OrbitControls;
pub use perspective::{CameraUniform, PerspectiveCamera};
pub use transition::Transition;
