use crate::bridge::protocol::{camera_record, encode_commands, light_records, DrawItem, RenderCommand};
use crate::renderer::bloom::BloomParams;
use crate::renderer::traits::{FrameView, RenderBackend, RenderTarget};

/// Backend that records each call for a host renderer to replay.
/// The browser reads the encoded stream after every tick.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<RenderCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take the commands recorded since the last call.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Encode and clear the recorded commands into `out`.
    pub fn flush_into(&mut self, out: &mut Vec<f32>) {
        encode_commands(&self.commands, out);
        self.commands.clear();
    }
}

impl RenderBackend for CommandRecorder {
    fn backend(&self) -> &'static str {
        "commands"
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.commands.push(RenderCommand::Resize {
            width,
            height,
            pixel_ratio,
        });
    }

    fn render_scene(&mut self, frame: &FrameView<'_>, target: RenderTarget) {
        let items = frame
            .scene
            .iter()
            .filter(|m| m.visible)
            .map(DrawItem::from_mesh)
            .collect();
        let (lights, ambient) = light_records(frame.lights);
        self.commands.push(RenderCommand::RenderScene {
            target,
            background: frame.scene.background().map(|t| t.0),
            material_revision: frame.materials.revision(),
            camera: camera_record(frame.camera),
            ambient,
            lights,
            items,
        });
    }

    fn bloom(&mut self, source: RenderTarget, dest: RenderTarget, params: &BloomParams) {
        self.commands.push(RenderCommand::Bloom {
            source,
            dest,
            params: *params,
        });
    }

    fn mix(&mut self, base: RenderTarget, bloom: RenderTarget, dest: RenderTarget) {
        self.commands.push(RenderCommand::Mix { base, bloom, dest });
    }

    fn output(&mut self, source: RenderTarget) {
        self.commands.push(RenderCommand::Output { source });
    }
}
