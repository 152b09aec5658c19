//! GPU vertex format

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::sim::{Rgb, Viewport};

/// Canvas background
pub const BACKGROUND: Rgb = Rgb::new(245, 245, 245);

/// One corner of a flat-colored triangle
///
/// Tessellation writes pixel positions; [`Vertex::to_ndc`] maps them to clip
/// space just before upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn new(pos: Vec2, color: Rgb) -> Self {
        Self {
            position: pos.to_array(),
            color: rgba(color),
        }
    }

    /// Same vertex with its position in normalized device coordinates
    pub fn to_ndc(self, viewport: &Viewport) -> Self {
        let [x, y] = self.position;
        Self {
            position: [x / viewport.width * 2.0 - 1.0, 1.0 - y / viewport.height * 2.0],
            ..self
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Opaque normalized color
fn rgba(color: Rgb) -> [f32; 4] {
    [
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        1.0,
    ]
}

/// Background as a render pass clear value
pub fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = rgba(BACKGROUND);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_normalized_and_opaque() {
        let v = Vertex::new(Vec2::new(3.0, 4.0), Rgb::new(255, 0, 51));
        assert_eq!(v.position, [3.0, 4.0]);
        assert_eq!(v.color, [1.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn test_ndc_corners() {
        let viewport = Viewport::new(800.0, 600.0);
        let ndc = |x, y| Vertex::new(Vec2::new(x, y), BACKGROUND).to_ndc(&viewport).position;
        assert_eq!(ndc(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(ndc(800.0, 600.0), [1.0, -1.0]);
        assert_eq!(ndc(400.0, 300.0), [0.0, 0.0]);
    }

    #[test]
    fn test_ndc_keeps_color() {
        let v = Vertex::new(Vec2::new(10.0, 10.0), Rgb::new(9, 8, 7));
        assert_eq!(v.to_ndc(&Viewport::new(20.0, 20.0)).color, v.color);
    }

    #[test]
    fn test_stride_matches_layout() {
        assert_eq!(Vertex::desc().array_stride, 24);
        assert_eq!(Vertex::ATTRIBUTES[1].offset, 8);
    }
}
