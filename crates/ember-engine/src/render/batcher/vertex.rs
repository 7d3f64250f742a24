use bytemuck::{Pod, Zeroable};

use crate::render::RenderError;
use crate::render::shader::{ShaderKind, VertexLayout};

/// CPU vertex type that can be staged for a shader.
///
/// `ATTRIBUTES` must describe the `#[repr(C)]` layout of `Self`; batchers
/// compare it against the layout reflected from the shader when they are built.
pub trait ShaderVertex: Pod + Zeroable {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];
}

/// Clip-space position only.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

impl ShaderVertex for PositionVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &Self::ATTRS;
}

/// Position plus linear RGB color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColoredVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

impl ShaderVertex for ColoredVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &Self::ATTRS;
}

/// Checks that `V` matches the vertex layout `kind`'s shader expects.
pub(super) fn check_layout<V: ShaderVertex>(
    kind: ShaderKind,
    expected: &VertexLayout,
) -> Result<(), RenderError> {
    let mismatch = |detail: String| RenderError::VertexLayoutMismatch { kind, detail };

    let stride = std::mem::size_of::<V>() as u64;
    if stride != expected.stride {
        return Err(mismatch(format!(
            "{} is {stride} bytes, shader expects {}",
            std::any::type_name::<V>(),
            expected.stride
        )));
    }

    if V::ATTRIBUTES.len() != expected.attributes.len() {
        return Err(mismatch(format!(
            "{} attributes given, shader expects {}",
            V::ATTRIBUTES.len(),
            expected.attributes.len()
        )));
    }

    for want in &expected.attributes {
        let Some(have) = V::ATTRIBUTES
            .iter()
            .find(|a| a.shader_location == want.shader_location)
        else {
            return Err(mismatch(format!("no attribute at location {}", want.shader_location)));
        };

        if have.format != want.format || have.offset != want.offset {
            return Err(mismatch(format!(
                "location {} is {:?} at offset {}, shader expects {:?} at offset {}",
                want.shader_location, have.format, have.offset, want.format, want.offset
            )));
        }
    }

    Ok(())
}
