pub mod markers;

pub use markers::{compute_markers, MarkerState};
