//! Selective bloom.
//!
//! Only meshes on [`BLOOM_LAYER`] glow. Each frame the other meshes are
//! temporarily given a shared black material, the scene is rendered into the
//! bloom target and blurred, original materials are put back, and the normal
//! render is composited with the blur.
//!
//! ```text
//! isolate ─▶ render(Bloom) ─▶ bloom(Bloom→Bloom) ─▶ restore
//!         ─▶ render(Base) ─▶ mix(Base + Bloom → Composite) ─▶ output
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::types::{Color, MaterialId, MeshId};
use crate::camera::perspective::PerspectiveCamera;
use crate::core::scene::{SceneGraph, BLOOM_LAYER};
use crate::renderer::lighting::LightState;
use crate::renderer::material::{Material, MaterialLibrary};
use crate::renderer::traits::{FrameView, RenderBackend, RenderTarget};

/// Bloom chain parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomParams {
    /// Luminance above which pixels contribute.
    pub threshold: f32,
    /// Multiplier on the blurred result.
    pub strength: f32,
    /// Blur spread in [0, 1].
    pub radius: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            strength: 0.7,
            radius: 0.0,
        }
    }
}

pub struct SelectiveBloom {
    params: BloomParams,
    enabled: bool,
    dark_material: MaterialId,
    saved: HashMap<MeshId, MaterialId>,
}

impl SelectiveBloom {
    /// Registers the shared black material in `materials`.
    pub fn new(params: BloomParams, enabled: bool, materials: &mut MaterialLibrary) -> Self {
        Self {
            params,
            enabled,
            dark_material: materials.add(Material::basic(Color::BLACK)),
            saved: HashMap::new(),
        }
    }

    pub fn params(&self) -> BloomParams {
        self.params
    }

    pub fn set_params(&mut self, params: BloomParams) {
        self.params = params;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn dark_material(&self) -> MaterialId {
        self.dark_material
    }

    /// Swap every non-glowing mesh to the dark material, remembering the original.
    pub fn isolate(&mut self, scene: &mut SceneGraph) {
        for mesh in scene.iter_mut() {
            if !mesh.layers.test(BLOOM_LAYER) {
                self.saved.entry(mesh.id).or_insert(mesh.material);
                mesh.material = self.dark_material;
            }
        }
    }

    /// Put back the materials saved by [`isolate`](Self::isolate). Meshes
    /// without a saved entry are left alone.
    pub fn restore(&mut self, scene: &mut SceneGraph) {
        for mesh in scene.iter_mut() {
            if let Some(original) = self.saved.remove(&mesh.id) {
                mesh.material = original;
            }
        }
        self.saved.clear();
    }

    /// Render one frame through `backend`.
    pub fn render(
        &mut self,
        backend: &mut dyn RenderBackend,
        scene: &mut SceneGraph,
        materials: &MaterialLibrary,
        camera: &PerspectiveCamera,
        lights: &LightState,
    ) {
        if !self.enabled {
            let frame = FrameView { scene: &*scene, materials, camera, lights };
            backend.render_scene(&frame, RenderTarget::Screen);
            return;
        }

        self.isolate(scene);
        {
            let frame = FrameView { scene: &*scene, materials, camera, lights };
            backend.render_scene(&frame, RenderTarget::Bloom);
        }
        backend.bloom(RenderTarget::Bloom, RenderTarget::Bloom, &self.params);
        self.restore(scene);

        let frame = FrameView { scene: &*scene, materials, camera, lights };
        backend.render_scene(&frame, RenderTarget::Base);
        backend.mix(RenderTarget::Base, RenderTarget::Bloom, RenderTarget::Composite);
        backend.output(RenderTarget::Composite);
    }
}
