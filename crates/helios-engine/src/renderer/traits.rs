//! Rendering primitives the frame pipeline is written against.
//!
//! The engine never talks to a GPU. A backend either forwards the calls to
//! the browser host (see [`CommandRecorder`](super::recorder::CommandRecorder))
//! or rasterizes on the CPU (`SoftwareRenderer`, feature `software`).

use serde::Serialize;

use crate::camera::perspective::PerspectiveCamera;
use crate::core::scene::SceneGraph;
use crate::renderer::bloom::BloomParams;
use crate::renderer::lighting::LightState;
use crate::renderer::material::MaterialLibrary;

/// Offscreen or onscreen destination of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTarget {
    /// The presented canvas.
    Screen,
    /// Isolated glow sources and, after the bloom chain, their blur.
    Bloom,
    /// The normally lit scene.
    Base,
    /// Base plus bloom, before tone mapping.
    Composite,
}

impl RenderTarget {
    /// Wire code used by the command stream.
    pub fn code(self) -> f32 {
        match self {
            RenderTarget::Screen => 0.0,
            RenderTarget::Bloom => 1.0,
            RenderTarget::Base => 2.0,
            RenderTarget::Composite => 3.0,
        }
    }
}

/// Everything a backend needs to draw the scene once.
pub struct FrameView<'a> {
    pub scene: &'a SceneGraph,
    pub materials: &'a MaterialLibrary,
    pub camera: &'a PerspectiveCamera,
    pub lights: &'a LightState,
}

pub trait RenderBackend {
    /// Backend identifier (e.g., "commands", "software").
    fn backend(&self) -> &'static str;

    /// Viewport changed. Recreates intermediate targets.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Draw every visible mesh with its current material into `target`.
    fn render_scene(&mut self, frame: &FrameView<'_>, target: RenderTarget);

    /// Threshold, blur and scale `source` into `dest`.
    fn bloom(&mut self, source: RenderTarget, dest: RenderTarget, params: &BloomParams);

    /// Additively combine `base` and `bloom` into `dest`.
    fn mix(&mut self, base: RenderTarget, bloom: RenderTarget, dest: RenderTarget);

    /// Tone map and encode `source` onto the screen.
    fn output(&mut self, source: RenderTarget);
}
