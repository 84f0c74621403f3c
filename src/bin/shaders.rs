//! Step 3: per-vertex colors plus a `newColor` uniform pulsing over time.

use std::time::Duration;

use anyhow::Context;
use shader_steps::config::{shader_paths, ReloadConfig, WindowConfig};
use shader_steps::mesh::{COLOR_QUAD, QUAD_INDICES};
use shader_steps::transform::pulse;
use shader_steps::{AppError, GlowBackend, Mesh, ProgramBackend, ReloadLoop, ShaderSet, Step};

struct Shaders {
    reload: ReloadLoop<GlowBackend>,
    mesh: Mesh,
}

impl Step for Shaders {
    fn window() -> WindowConfig {
        WindowConfig::titled("shaders")
    }

    fn init(backend: &mut GlowBackend) -> Result<Self, AppError> {
        let (vert, frag) = shader_paths("shaders");
        let reload = ReloadLoop::start(backend, ShaderSet::new(vert, frag)?)?
            .with_recheck_interval(ReloadConfig::default().recheck_interval);
        // SAFETY: the backend's context is current.
        let mesh = unsafe { Mesh::upload(backend.gl(), &COLOR_QUAD, Some(&QUAD_INDICES))? };
        Ok(Self { reload, mesh })
    }

    fn frame(&mut self, backend: &mut GlowBackend, elapsed: Duration) {
        let mesh = &self.mesh;
        let green = pulse(elapsed.as_secs_f32());
        self.reload.tick(backend, |backend, program| {
            backend.use_program(Some(program));
            backend.set_uniform_vec4(program, "newColor", [0.0, green, 0.0, 1.0]);
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
    shader_steps::run::<Shaders>().context("shaders failed")
}
