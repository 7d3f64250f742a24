use crate::render::RenderError;

use super::{CompiledShader, ShaderKind, ShaderProgram, UniformValue};

/// Owns one linked [`ShaderProgram`] per requested [`ShaderKind`].
///
/// All programs are compiled and linked up front; the set of kinds is fixed for
/// the cache's lifetime. Uniform writes are routed through the cache so they
/// are always scoped to a single program. A kind whose pipeline cannot be
/// created for the target format fails the whole cache with
/// [`RenderError::Link`].
pub struct ShaderCache {
    surface_format: wgpu::TextureFormat,
    programs: [Option<ShaderProgram>; ShaderKind::COUNT],
}

impl ShaderCache {
    /// Compiles and links every kind in `requested` for `surface_format` targets.
    ///
    /// Duplicates are ignored and order does not matter. The first kind that
    /// fails aborts construction; its diagnostic is logged and returned.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        requested: &[ShaderKind],
    ) -> Result<Self, RenderError> {
        let mut programs: [Option<ShaderProgram>; ShaderKind::COUNT] = Default::default();

        for &kind in requested {
            let slot = &mut programs[kind.index()];
            if slot.is_some() {
                continue;
            }

            log::debug!("compiling shader {kind}");
            let compiled = CompiledShader::compile(kind).inspect_err(|e| log::error!("{e}"))?;
            let program = ShaderProgram::link(device, surface_format, compiled)
                .inspect_err(|e| log::error!("{e}"))?;
            log::info!(
                "shader {kind} ready (uniforms: [{}])",
                program.uniform_names().collect::<Vec<_>>().join(", ")
            );
            *slot = Some(program);
        }

        Ok(Self {
            surface_format,
            programs,
        })
    }

    /// Format every pipeline in this cache renders to.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn contains(&self, kind: ShaderKind) -> bool {
        self.programs[kind.index()].is_some()
    }

    /// Requested kinds in [`ShaderKind::ALL`] order.
    pub fn requested(&self) -> impl Iterator<Item = ShaderKind> + '_ {
        ShaderKind::ALL.into_iter().filter(|k| self.contains(*k))
    }

    /// Returns the program for `kind`; the same program on every call.
    pub fn get_shader_program(&self, kind: ShaderKind) -> Result<&ShaderProgram, RenderError> {
        self.programs[kind.index()]
            .as_ref()
            .ok_or(RenderError::UnknownShader(kind))
    }

    /// Sets uniform `name` of the program for `kind` to `value`.
    ///
    /// The value reaches the GPU with that program's next flush; draws already
    /// flushed keep the value they were recorded with. Fails if `kind` was not
    /// requested, if the program declares no uniform called `name`, or if the
    /// value's type differs from the declaration. Setting the same value twice
    /// is harmless.
    pub fn set_uniform(
        &self,
        kind: ShaderKind,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), RenderError> {
        self.get_shader_program(kind)?.write_uniform(name, value.into())
    }
}

impl Drop for ShaderCache {
    fn drop(&mut self) {
        let live = self.programs.iter().filter(|p| p.is_some()).count();
        log::debug!("releasing {live} shader programs");
    }
}
