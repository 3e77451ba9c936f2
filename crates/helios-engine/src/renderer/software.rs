//! CPU reference backend.
//!
//! Rasterizes each mesh as a depth-tested sphere impostor into HDR float
//! buffers, runs the bloom chain with a separable gaussian, and tone maps
//! (ACES) into an RGBA8 image. Slow, but deterministic and dependency free,
//! which makes it the backend of choice for native runs and tests.

use std::collections::HashMap;

use glam::Vec3;

use crate::renderer::bloom::BloomParams;
use crate::renderer::material::{Material, Side};
use crate::renderer::traits::{FrameView, RenderBackend, RenderTarget};

const LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);
/// Opacity of transparent shells.
const SHELL_ALPHA: f32 = 0.25;
/// Flat backdrop used when the scene has a background texture.
const STARFIELD: Vec3 = Vec3::new(0.004, 0.004, 0.008);

#[derive(Debug, Clone)]
struct Framebuffer {
    color: Vec<Vec3>,
    depth: Vec<f32>,
}

impl Framebuffer {
    fn new(len: usize) -> Self {
        Self {
            color: vec![Vec3::ZERO; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    fn clear(&mut self, color: Vec3) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }
}

pub struct SoftwareRenderer {
    width: usize,
    height: usize,
    targets: HashMap<RenderTarget, Framebuffer>,
    /// Tone-mapped RGBA8 of the last presented frame.
    presented: Vec<u8>,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut renderer = Self {
            width: 0,
            height: 0,
            targets: HashMap::new(),
            presented: Vec::new(),
        };
        renderer.allocate(width as usize, height as usize);
        renderer
    }

    fn allocate(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.targets.clear();
        self.presented = vec![0; width * height * 4];
    }

    fn target_mut(&mut self, target: RenderTarget) -> &mut Framebuffer {
        let len = self.width * self.height;
        self.targets.entry(target).or_insert_with(|| Framebuffer::new(len))
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Linear HDR color of a pixel in `target`.
    pub fn pixel(&self, target: RenderTarget, x: usize, y: usize) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.targets.get(&target).map(|fb| fb.color[y * self.width + x])
    }

    pub fn presented(&self) -> &[u8] {
        &self.presented
    }

    fn present(&mut self, source: RenderTarget) {
        let Some(fb) = self.targets.get(&source) else {
            return;
        };
        for (i, c) in fb.color.iter().enumerate() {
            let mapped = aces(*c);
            let px = &mut self.presented[i * 4..i * 4 + 4];
            px[0] = encode_srgb(mapped.x);
            px[1] = encode_srgb(mapped.y);
            px[2] = encode_srgb(mapped.z);
            px[3] = 255;
        }
    }
}

/// ACES filmic curve (Narkowicz fit).
fn aces(hdr: Vec3) -> Vec3 {
    let (a, b, c, d, e) = (2.51_f32, 0.03_f32, 2.43_f32, 0.59_f32, 0.14_f32);
    ((hdr * (a * hdr + b)) / (hdr * (c * hdr + d) + e)).clamp(Vec3::ZERO, Vec3::ONE)
}

fn encode_srgb(v: f32) -> u8 {
    (v.powf(1.0 / 2.2) * 255.0).round().clamp(0.0, 255.0) as u8
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as i32;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= sum);
    weights
}

fn blur_pass(src: &[Vec3], width: usize, height: usize, kernel: &[f32], horizontal: bool) -> Vec<Vec3> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![Vec3::ZERO; src.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = Vec3::ZERO;
            for (k, w) in kernel.iter().enumerate() {
                let offset = k as isize - radius;
                let (sx, sy) = if horizontal {
                    (x as isize + offset, y as isize)
                } else {
                    (x as isize, y as isize + offset)
                };
                if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
                    continue;
                }
                acc += src[sy as usize * width + sx as usize] * *w;
            }
            out[y * width + x] = acc;
        }
    }
    out
}

impl RenderBackend for SoftwareRenderer {
    fn backend(&self) -> &'static str {
        "software"
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        let scale = pixel_ratio.max(0.0);
        self.allocate(
            (width as f32 * scale).round() as usize,
            (height as f32 * scale).round() as usize,
        );
    }

    fn render_scene(&mut self, frame: &FrameView<'_>, target: RenderTarget) {
        let (width, height) = (self.width, self.height);
        let clear = if frame.scene.background().is_some() { STARFIELD } else { Vec3::ZERO };
        let fb = self.target_mut(target);
        fb.clear(clear);
        if width == 0 || height == 0 {
            return;
        }

        let camera = frame.camera;
        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let half_h = height as f32 / 2.0;
        let tan_half_fov = (camera.fov_y / 2.0).tan();

        for mesh in frame.scene.iter().filter(|m| m.visible) {
            let Some(material) = frame.materials.get(mesh.material) else {
                continue;
            };
            let depth = (mesh.position - camera.position).dot(forward);
            if depth <= camera.near || depth >= camera.far {
                continue;
            }
            let ndc = camera.project(mesh.position);
            let cx = (ndc.x * 0.5 + 0.5) * width as f32;
            let cy = (0.5 - ndc.y * 0.5) * height as f32;
            let world_radius = mesh.world_radius();
            let r = world_radius / (depth * tan_half_fov) * half_h;
            if r <= 0.0 {
                continue;
            }

            let (shell, back_side) = match material {
                Material::Shader(s) => (s.transparent, s.side == Side::Back),
                _ => (false, false),
            };
            let base = material.flat_color();

            let x0 = (cx - r).floor().max(0.0) as usize;
            let x1 = ((cx + r).ceil() as usize).min(width);
            let y0 = (cy - r).floor().max(0.0) as usize;
            let y1 = ((cy + r).ceil() as usize).min(height);
            for py in y0..y1 {
                for px in x0..x1 {
                    let dx = (px as f32 + 0.5 - cx) / r;
                    let dy = (py as f32 + 0.5 - cy) / r;
                    let d2 = dx * dx + dy * dy;
                    if d2 > 1.0 {
                        continue;
                    }
                    let nz = (1.0 - d2).sqrt();
                    let normal = (right * dx - up * dy - forward * nz).normalize_or_zero();
                    let z = if back_side { depth + nz * world_radius } else { depth - nz * world_radius };
                    let idx = py * width + px;
                    if z >= fb.depth[idx] && !shell {
                        continue;
                    }

                    let color = if material.is_lit() {
                        let point = mesh.position + normal * world_radius;
                        base * frame.lights.irradiance(point, normal)
                    } else {
                        base
                    };
                    if shell {
                        fb.color[idx] = fb.color[idx].lerp(color, SHELL_ALPHA * (1.0 - nz));
                    } else {
                        fb.color[idx] = color;
                        fb.depth[idx] = z;
                    }
                }
            }
        }

        if target == RenderTarget::Screen {
            self.present(target);
        }
    }

    fn bloom(&mut self, source: RenderTarget, dest: RenderTarget, params: &BloomParams) {
        let (width, height) = (self.width, self.height);
        let src = self.target_mut(source).color.clone();
        let extracted: Vec<Vec3> = src
            .iter()
            .map(|c| {
                let lum = c.dot(LUMA);
                if lum <= params.threshold || lum <= 0.0 {
                    Vec3::ZERO
                } else {
                    *c * ((lum - params.threshold) / lum)
                }
            })
            .collect();
        let kernel = gaussian_kernel(1.0 + params.radius.clamp(0.0, 1.0) * 4.0);
        let blurred = blur_pass(&extracted, width, height, &kernel, true);
        let blurred = blur_pass(&blurred, width, height, &kernel, false);
        let fb = self.target_mut(dest);
        for (out, b) in fb.color.iter_mut().zip(blurred) {
            *out = b * params.strength;
        }
    }

    fn mix(&mut self, base: RenderTarget, bloom: RenderTarget, dest: RenderTarget) {
        let base = self.target_mut(base).color.clone();
        let bloom = self.target_mut(bloom).color.clone();
        let fb = self.target_mut(dest);
        for ((out, b), g) in fb.color.iter_mut().zip(base).zip(bloom) {
            *out = b + g;
        }
    }

    fn output(&mut self, source: RenderTarget) {
        self.present(source);
    }
}
