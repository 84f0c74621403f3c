//! Step 4: two textures mixed in the fragment shader.

use std::time::Duration;

use anyhow::Context;
use shader_steps::config::{shader_paths, texture_path, ReloadConfig, WindowConfig};
use shader_steps::mesh::{QUAD_INDICES, TEXTURED_QUAD};
use shader_steps::{
    AppError, GlowBackend, Mesh, ProgramBackend, ReloadLoop, ShaderSet, Step, Texture,
};

struct Textures {
    reload: ReloadLoop<GlowBackend>,
    mesh: Mesh,
    container: Texture,
    face: Texture,
}

impl Step for Textures {
    fn window() -> WindowConfig {
        WindowConfig::titled("textures")
    }

    fn init(backend: &mut GlowBackend) -> Result<Self, AppError> {
        let (vert, frag) = shader_paths("textures");
        let reload = ReloadLoop::start(backend, ShaderSet::new(vert, frag)?)?
            .with_recheck_interval(ReloadConfig::default().recheck_interval);
        // SAFETY: the backend's context is current.
        let (mesh, container, face) = unsafe {
            let gl = backend.gl();
            (
                Mesh::upload(gl, &TEXTURED_QUAD, Some(&QUAD_INDICES))?,
                Texture::load(gl, &texture_path("container.png"))?,
                Texture::load(gl, &texture_path("awesomeface.png"))?,
            )
        };
        Ok(Self {
            reload,
            mesh,
            container,
            face,
        })
    }

    fn frame(&mut self, backend: &mut GlowBackend, _elapsed: Duration) {
        // SAFETY: the backend's context is current.
        unsafe {
            self.container.bind(backend.gl(), 0);
            self.face.bind(backend.gl(), 1);
        }

        let mesh = &self.mesh;
        self.reload.tick(backend, |backend, program| {
            backend.use_program(Some(program));
            // Reassigned every frame since a reload yields a fresh program.
            backend.set_uniform_i32(program, "texture1", 0);
            backend.set_uniform_i32(program, "texture2", 1);
            // SAFETY: the backend's context is current.
            unsafe { mesh.draw(backend.gl()) };
        });
    }

    fn destroy(&mut self, backend: &mut GlowBackend) {
        // SAFETY: the backend's context is current.
        unsafe {
            self.mesh.destroy(backend.gl());
            self.container.destroy(backend.gl());
            self.face.destroy(backend.gl());
        }
        self.reload.teardown(backend);
    }
}

fn main() -> anyhow::Result<()> {
    shader_steps::init_logging();
    shader_steps::run::<Textures>().context("textures failed")
}
