use glam::Vec3;

use crate::api::types::{BodyId, MaterialId, MeshId, TextureId};

/// Layer bit carried by meshes that feed the glow pass.
pub const BLOOM_LAYER: u32 = 1;

/// Bit set of render layers. Layer 0 is the default layer every mesh joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const fn new() -> Self {
        Self(1)
    }

    pub fn enable(&mut self, layer: u32) {
        self.0 |= 1 << layer;
    }

    pub fn test(&self, layer: u32) -> bool {
        self.0 & (1 << layer) != 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::new()
    }
}

/// A sphere mesh placed in the scene.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub id: MeshId,
    /// Body this mesh represents, if any.
    pub body: Option<BodyId>,
    pub position: Vec3,
    /// Spin about the y axis in radians.
    pub rotation_y: f32,
    /// Uniform scale relative to `radius`.
    pub scale: f32,
    pub radius: f32,
    /// Tessellation hint for the host renderer.
    pub segments: u32,
    pub material: MaterialId,
    /// Set at construction; never changed afterwards.
    pub layers: LayerMask,
    pub visible: bool,
}

impl Mesh {
    pub fn sphere(radius: f32, segments: u32, material: MaterialId) -> Self {
        Self {
            id: MeshId(0),
            body: None,
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
            radius,
            segments,
            material,
            layers: LayerMask::new(),
            visible: true,
        }
    }

    pub fn with_body(mut self, body: BodyId) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layers.enable(layer);
        self
    }

    /// Radius after scaling.
    pub fn world_radius(&self) -> f32 {
        self.radius * self.scale
    }
}

/// Flat mesh storage. Small, fixed scenes only (a handful of bodies).
pub struct SceneGraph {
    meshes: Vec<Mesh>,
    next_id: u32,
    background: Option<TextureId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            meshes: Vec::with_capacity(16),
            next_id: 1,
            background: None,
        }
    }

    /// Add a mesh and assign it a fresh id.
    pub fn spawn(&mut self, mut mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        mesh.id = id;
        self.meshes.push(mesh);
        id
    }

    pub fn despawn(&mut self, id: MeshId) -> Option<Mesh> {
        let idx = self.meshes.iter().position(|m| m.id == id)?;
        Some(self.meshes.remove(idx))
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|m| m.id == id)
    }

    /// Meshes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn background(&self) -> Option<TextureId> {
        self.background
    }

    pub fn set_background(&mut self, texture: Option<TextureId>) {
        self.background = texture;
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_assigns_unique_ids() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(Mesh::sphere(1.0, 32, MaterialId(0)));
        let b = scene.spawn(Mesh::sphere(2.0, 32, MaterialId(0)));
        assert_ne!(a, b);
        assert_eq!(scene.get(b).unwrap().radius, 2.0);
    }

    #[test]
    fn despawn_keeps_order() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(Mesh::sphere(1.0, 8, MaterialId(0)));
        let b = scene.spawn(Mesh::sphere(1.0, 8, MaterialId(0)));
        let c = scene.spawn(Mesh::sphere(1.0, 8, MaterialId(0)));
        scene.despawn(a);
        let ids: Vec<_> = scene.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b, c]);
    }

    #[test]
    fn layer_mask() {
        let mesh = Mesh::sphere(1.0, 8, MaterialId(0)).with_layer(BLOOM_LAYER);
        assert!(mesh.layers.test(0));
        assert!(mesh.layers.test(BLOOM_LAYER));
        assert!(!Mesh::sphere(1.0, 8, MaterialId(0)).layers.test(BLOOM_LAYER));
    }
}
