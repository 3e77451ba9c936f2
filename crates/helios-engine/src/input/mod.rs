pub mod queue;

pub use queue::{DragTracker, InputEvent, InputQueue};
