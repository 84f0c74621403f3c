//! Step 1: one orange triangle from shaders compiled into the binary.

use std::time::Duration;

use anyhow::Context;
use shader_steps::config::WindowConfig;
use shader_steps::mesh::TRIANGLE;
use shader_steps::{AppError, GlowBackend, GraphicsProgram, Mesh, ProgramBackend, Step};

const VERTEX_SRC: &str = r"#version 330 core
layout (location = 0) in vec3 aPos;

void main() {
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
";

const FRAGMENT_SRC: &str = r"#version 330 core
out vec4 FragColor;

void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
";

struct HelloTriangle {
    program: GraphicsProgram<GlowBackend>,
    mesh: Mesh,
}

impl Step for HelloTriangle {
    fn window() -> WindowConfig {
        WindowConfig::titled("hello-triangle")
    }

    fn init(backend: &mut GlowBackend) -> Result<Self, AppError> {
        let mut program = GraphicsProgram::new();
        program.build(backend, VERTEX_SRC, FRAGMENT_SRC)?;
        // SAFETY: the backend's context is current.
        let mesh = unsafe { Mesh::upload(backend.gl(), &TRIANGLE, None)? };
        Ok(Self { program, mesh })
    }

    fn frame(&mut self, backend: &mut GlowBackend, _elapsed: Duration) {
        let Some(program) = self.program.active_program() else {
            return;
        };
        backend.use_program(Some(program));
        // SAFETY: the backend's context is current.
        unsafe { self.mesh.draw(backend.gl()) };
    }

    fn destroy(&mut self, backend: &mut GlowBackend) {
        // SAFETY: the backend's context is current.
        unsafe { self.mesh.destroy(backend.gl()) };
        self.program.teardown(backend);
    }
}

fn main() -> anyhow::Result<()> {
    shader_steps::init_logging();
    shader_steps::run::<HelloTriangle>().context("hello-triangle failed")
}
