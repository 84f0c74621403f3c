//! The graphics API surface used to build programs.
//!
//! [`GraphicsProgram`](crate::GraphicsProgram) only talks to the GPU through
//! [`ProgramBackend`], so the reload state machine runs the same against a
//! real OpenGL context ([`GlowBackend`]) and against a test double.

use std::fmt;
use std::sync::Arc;

use glow::HasContext;
use log::info;

use crate::error::{BuildError, Stage};

/// Compile, link, bind and delete shader objects.
pub trait ProgramBackend {
    /// Handle to a compiled stage object.
    type Stage: Copy + fmt::Debug;
    /// Handle to a linked program object.
    type Program: Copy + PartialEq + fmt::Debug;

    /// Create and compile one stage from source.
    ///
    /// # Errors
    ///
    /// [`BuildError::Compile`] with the driver's info log if compilation
    /// fails (the stage object is already released), or
    /// [`BuildError::Resource`] if no object could be created.
    fn compile_stage(&mut self, stage: Stage, source: &str) -> Result<Self::Stage, BuildError>;

    /// Create a program, attach both stages and link it.
    ///
    /// The stages stay owned by the caller and must be released with
    /// [`delete_stage`](Self::delete_stage) whatever the outcome.
    ///
    /// # Errors
    ///
    /// [`BuildError::Link`] with the info log if linking fails (the program
    /// object is already released), or [`BuildError::Resource`].
    fn link_program(
        &mut self,
        vertex: Self::Stage,
        fragment: Self::Stage,
    ) -> Result<Self::Program, BuildError>;

    /// Bind `program` for subsequent draws, or unbind with `None`.
    fn use_program(&mut self, program: Option<Self::Program>);

    /// Release a program object.
    fn delete_program(&mut self, program: Self::Program);

    /// Release a stage object.
    fn delete_stage(&mut self, stage: Self::Stage);
}

/// [`ProgramBackend`] over a current OpenGL context.
pub struct GlowBackend {
    gl: Arc<glow::Context>,
}

impl GlowBackend {
    /// Wrap a GL context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on this thread for the lifetime of the backend,
    /// and every object handed back to it must have been created by it.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        info!("OpenGL version {version}");
        Self { gl }
    }

    /// The wrapped context, for draw calls and uniform uploads.
    #[must_use]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Set an `int` (or sampler) uniform on `program`.
    ///
    /// Unknown names are ignored, so a uniform removed by a shader edit
    /// does not break the frame.
    pub fn set_uniform_i32(&self, program: glow::Program, name: &str, value: i32) {
        // SAFETY: see `compile_stage`.
        unsafe {
            self.gl.use_program(Some(program));
            let location = self.gl.get_uniform_location(program, name);
            self.gl.uniform_1_i32(location.as_ref(), value);
        }
    }

    /// Set a `vec4` uniform on `program`. Unknown names are ignored.
    pub fn set_uniform_vec4(&self, program: glow::Program, name: &str, value: [f32; 4]) {
        let [x, y, z, w] = value;
        // SAFETY: see `compile_stage`.
        unsafe {
            self.gl.use_program(Some(program));
            let location = self.gl.get_uniform_location(program, name);
            self.gl.uniform_4_f32(location.as_ref(), x, y, z, w);
        }
    }

    /// Set a `mat4` uniform on `program`. Unknown names are ignored.
    pub fn set_uniform_mat4(&self, program: glow::Program, name: &str, value: &glam::Mat4) {
        // SAFETY: see `compile_stage`.
        unsafe {
            self.gl.use_program(Some(program));
            let location = self.gl.get_uniform_location(program, name);
            self.gl
                .uniform_matrix_4_f32_slice(location.as_ref(), false, &value.to_cols_array());
        }
    }
}

impl ProgramBackend for GlowBackend {
    type Stage = glow::Shader;
    type Program = glow::Program;

    fn compile_stage(&mut self, stage: Stage, source: &str) -> Result<glow::Shader, BuildError> {
        let gl = &self.gl;
        // SAFETY: the context is current (constructor contract). glow passes
        // the source with an explicit length, so no NUL terminator is needed.
        unsafe {
            let shader = gl
                .create_shader(stage.gl_type())
                .map_err(BuildError::Resource)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(BuildError::Compile { stage, log });
            }

            Ok(shader)
        }
    }

    fn link_program(
        &mut self,
        vertex: glow::Shader,
        fragment: glow::Shader,
    ) -> Result<glow::Program, BuildError> {
        let gl = &self.gl;
        // SAFETY: see `compile_stage`.
        unsafe {
            let program = gl.create_program().map_err(BuildError::Resource)?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(BuildError::Link { log });
            }

            // Detached stages are freed as soon as the caller deletes them.
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            Ok(program)
        }
    }

    fn use_program(&mut self, program: Option<glow::Program>) {
        // SAFETY: see `compile_stage`.
        unsafe { self.gl.use_program(program) };
    }

    fn delete_program(&mut self, program: glow::Program) {
        // SAFETY: see `compile_stage`.
        unsafe { self.gl.delete_program(program) };
    }

    fn delete_stage(&mut self, stage: glow::Shader) {
        // SAFETY: see `compile_stage`.
        unsafe { self.gl.delete_shader(stage) };
    }
}
