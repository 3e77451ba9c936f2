pub mod protocol;

pub use protocol::{encode_commands, DrawItem, LightItem, RenderCommand, PROTOCOL_VERSION};
