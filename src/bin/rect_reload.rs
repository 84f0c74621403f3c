//! Step 2: an indexed rectangle whose shaders reload when saved.
//!
//! Edit `assets/rect/shader.vert` or `shader.frag` while this runs; a broken
//! edit is reported on the console and the last good program keeps drawing.

use std::time::Duration;

use anyhow::Context;
use shader_steps::config::{shader_paths, ReloadConfig, WindowConfig};
use shader_steps::mesh::{QUAD, QUAD_INDICES};
use shader_steps::{AppError, GlowBackend, Mesh, ProgramBackend, ReloadLoop, ShaderSet, Step};

struct RectReload {
    reload: ReloadLoop<GlowBackend>,
    mesh: Mesh,
}

impl Step for RectReload {
    fn window() -> WindowConfig {
        WindowConfig::titled("rect-reload")
    }

    fn init(backend: &mut GlowBackend) -> Result<Self, AppError> {
        let (vert, frag) = shader_paths("rect");
        let shaders = ShaderSet::new(vert, frag)?;
        let reload = ReloadLoop::start(backend, shaders)?
            .with_recheck_interval(ReloadConfig::default().recheck_interval);
        // SAFETY: the backend's context is current.
        let mesh = unsafe { Mesh::upload(backend.gl(), &QUAD, Some(&QUAD_INDICES))? };
        Ok(Self { reload, mesh })
    }

    fn frame(&mut self, backend: &mut GlowBackend, _elapsed: Duration) {
        let mesh = &self.mesh;
        self.reload.tick(backend, |backend, program| {
            backend.use_program(Some(program));
            // SAFETY: the backend's context is current.
            unsafe { mesh.draw(backend.gl()) };
        });
    }

    fn destroy(&mut self, backend: &mut GlowBackend) {
        // SAFETY: the backend's context is current.
        unsafe { self.mesh.destroy(backend.gl()) };
        self.reload.teardown(backend);
    }
}

fn main() -> anyhow::Result<()> {
    shader_steps::init_logging();
    shader_steps::run::<RectReload>().context("rect-reload failed")
}
