/// Render command stream layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// The stream is a flat `f32` array, one record per command:
/// ```text
/// [opcode, payload_len, payload...]
/// ```
/// `RENDER_SCENE` payload:
/// ```text
/// [target, background, material_revision,
///  camera: CAMERA_FLOATS,
///  ambient r g b, light_count, lights: light_count × LIGHT_FLOATS,
///  item_count, items: item_count × DRAW_ITEM_FLOATS]
/// ```
/// Hosts skip unknown opcodes using `payload_len`.

use bytemuck::{Pod, Zeroable};

use crate::camera::perspective::PerspectiveCamera;
use crate::core::scene::Mesh;
use crate::renderer::bloom::BloomParams;
use crate::renderer::lighting::{LightState, PointLight};
use crate::renderer::traits::RenderTarget;

/// Protocol version reported to the host at init.
pub const PROTOCOL_VERSION: f32 = 1.0;

pub const OP_RESIZE: f32 = 1.0;
pub const OP_RENDER_SCENE: f32 = 2.0;
pub const OP_BLOOM: f32 = 3.0;
pub const OP_MIX: f32 = 4.0;
pub const OP_OUTPUT: f32 = 5.0;

/// Floats per camera record: position xyz, look-at xyz, fov_y, aspect, near, far.
pub const CAMERA_FLOATS: usize = 10;

/// Value written for "no texture".
pub const NO_TEXTURE: f32 = -1.0;

/// One mesh as drawn in a pass (wire format, never changes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawItem {
    pub mesh: f32,
    pub material: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Radius after scale.
    pub radius: f32,
    pub rotation_y: f32,
    pub segments: f32,
}

impl DrawItem {
    pub const FLOATS: usize = 8;

    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            mesh: mesh.id.0 as f32,
            material: mesh.material.0 as f32,
            x: mesh.position.x,
            y: mesh.position.y,
            z: mesh.position.z,
            radius: mesh.world_radius(),
            rotation_y: mesh.rotation_y,
            segments: mesh.segments as f32,
        }
    }
}

/// Point light record (wire format, never changes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightItem {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

impl LightItem {
    pub const FLOATS: usize = 9;
}

impl From<&PointLight> for LightItem {
    fn from(light: &PointLight) -> Self {
        Self {
            x: light.position.x,
            y: light.position.y,
            z: light.position.z,
            r: light.color.r,
            g: light.color.g,
            b: light.color.b,
            intensity: light.intensity,
            distance: light.distance,
            decay: light.decay,
        }
    }
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Resize {
        width: u32,
        height: u32,
        pixel_ratio: f32,
    },
    RenderScene {
        target: RenderTarget,
        background: Option<u32>,
        material_revision: u64,
        camera: [f32; CAMERA_FLOATS],
        ambient: [f32; 3],
        lights: Vec<LightItem>,
        items: Vec<DrawItem>,
    },
    Bloom {
        source: RenderTarget,
        dest: RenderTarget,
        params: BloomParams,
    },
    Mix {
        base: RenderTarget,
        bloom: RenderTarget,
        dest: RenderTarget,
    },
    Output {
        source: RenderTarget,
    },
}

pub fn camera_record(camera: &PerspectiveCamera) -> [f32; CAMERA_FLOATS] {
    let p = camera.position;
    let l = camera.look_at;
    [p.x, p.y, p.z, l.x, l.y, l.z, camera.fov_y, camera.aspect, camera.near, camera.far]
}

pub fn light_records(lights: &LightState) -> (Vec<LightItem>, [f32; 3]) {
    let ambient = lights.ambient();
    (lights.iter().map(LightItem::from).collect(), [ambient.r, ambient.g, ambient.b])
}

impl RenderCommand {
    pub fn opcode(&self) -> f32 {
        match self {
            RenderCommand::Resize { .. } => OP_RESIZE,
            RenderCommand::RenderScene { .. } => OP_RENDER_SCENE,
            RenderCommand::Bloom { .. } => OP_BLOOM,
            RenderCommand::Mix { .. } => OP_MIX,
            RenderCommand::Output { .. } => OP_OUTPUT,
        }
    }

    /// Append this command to `out`.
    pub fn encode(&self, out: &mut Vec<f32>) {
        out.push(self.opcode());
        let len_slot = out.len();
        out.push(0.0);
        let start = out.len();

        match self {
            RenderCommand::Resize {
                width,
                height,
                pixel_ratio,
            } => out.extend_from_slice(&[*width as f32, *height as f32, *pixel_ratio]),
            RenderCommand::RenderScene {
                target,
                background,
                material_revision,
                camera,
                ambient,
                lights,
                items,
            } => {
                out.push(target.code());
                out.push(background.map_or(NO_TEXTURE, |t| t as f32));
                out.push(*material_revision as f32);
                out.extend_from_slice(camera);
                out.extend_from_slice(ambient);
                out.push(lights.len() as f32);
                out.extend_from_slice(bytemuck::cast_slice(lights));
                out.push(items.len() as f32);
                out.extend_from_slice(bytemuck::cast_slice(items));
            }
            RenderCommand::Bloom { source, dest, params } => out.extend_from_slice(&[
                source.code(),
                dest.code(),
                params.threshold,
                params.strength,
                params.radius,
            ]),
            RenderCommand::Mix { base, bloom, dest } => {
                out.extend_from_slice(&[base.code(), bloom.code(), dest.code()])
            }
            RenderCommand::Output { source } => out.push(source.code()),
        }

        out[len_slot] = (out.len() - start) as f32;
    }
}

/// Encode a whole frame.
pub fn encode_commands(commands: &[RenderCommand], out: &mut Vec<f32>) {
    out.clear();
    for command in commands {
        command.encode(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_sizes() {
        assert_eq!(std::mem::size_of::<DrawItem>(), DrawItem::FLOATS * 4);
        assert_eq!(std::mem::size_of::<LightItem>(), LightItem::FLOATS * 4);
    }

    #[test]
    fn records_are_length_prefixed() {
        let commands = vec![
            RenderCommand::Output {
                source: RenderTarget::Composite,
            },
            RenderCommand::Mix {
                base: RenderTarget::Base,
                bloom: RenderTarget::Bloom,
                dest: RenderTarget::Composite,
            },
        ];
        let mut out = Vec::new();
        encode_commands(&commands, &mut out);
        assert_eq!(out, vec![OP_OUTPUT, 1.0, 3.0, OP_MIX, 3.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn render_scene_layout() {
        let item = DrawItem {
            mesh: 1.0,
            material: 2.0,
            radius: 20.0,
            segments: 32.0,
            ..Default::default()
        };
        let cmd = RenderCommand::RenderScene {
            target: RenderTarget::Bloom,
            background: None,
            material_revision: 7,
            camera: [0.0; CAMERA_FLOATS],
            ambient: [0.05; 3],
            lights: vec![LightItem::default()],
            items: vec![item],
        };
        let mut out = Vec::new();
        cmd.encode(&mut out);
        let expected_len = 3 + CAMERA_FLOATS + 3 + 1 + LightItem::FLOATS + 1 + DrawItem::FLOATS;
        assert_eq!(out[0], OP_RENDER_SCENE);
        assert_eq!(out[1] as usize, expected_len);
        assert_eq!(out.len(), 2 + expected_len);
        assert_eq!(out[2], RenderTarget::Bloom.code());
        assert_eq!(out[3], NO_TEXTURE);
        let items_at = out.len() - DrawItem::FLOATS;
        assert_eq!(out[items_at + 1], 2.0);
    }
}
