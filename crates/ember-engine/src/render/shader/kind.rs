use std::fmt;

/// Logical shader identifier.
///
/// Each kind names one fixed vertex/fragment pairing together with the vertex
/// layout and uniform set its WGSL declares.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ShaderKind {
    /// Clip-space `vec3` positions filled with the `rgba_color` uniform.
    AbsolutePositionWithSolidColor,
    /// Clip-space positions with a per-vertex RGB color.
    AbsolutePositionWithColoredVertex,
    /// Per-vertex RGB color, positions multiplied by the `transform` uniform.
    TransformVWithColoredVertex,
}

impl ShaderKind {
    pub const COUNT: usize = 3;

    /// Every kind, in the order batchers are flushed.
    pub const ALL: [ShaderKind; Self::COUNT] = [
        ShaderKind::AbsolutePositionWithSolidColor,
        ShaderKind::AbsolutePositionWithColoredVertex,
        ShaderKind::TransformVWithColoredVertex,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShaderKind::AbsolutePositionWithSolidColor => "absolute_position_with_solid_color",
            ShaderKind::AbsolutePositionWithColoredVertex => "absolute_position_with_colored_vertex",
            ShaderKind::TransformVWithColoredVertex => "transform_v_with_colored_vertex",
        }
    }

    /// Built-in WGSL source for this kind.
    pub const fn source(self) -> &'static str {
        match self {
            ShaderKind::AbsolutePositionWithSolidColor => {
                include_str!("shaders/absolute_position_with_solid_color.wgsl")
            }
            ShaderKind::AbsolutePositionWithColoredVertex => {
                include_str!("shaders/absolute_position_with_colored_vertex.wgsl")
            }
            ShaderKind::TransformVWithColoredVertex => {
                include_str!("shaders/transform_v_with_colored_vertex.wgsl")
            }
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
