//! Step-by-step OpenGL programs, via [glow], with live shader reloading.
//!
//! Each binary under `src/bin/` is one tutorial step: a triangle, an indexed
//! quad, per-vertex colors and uniforms, textures, and a spinning transform.
//! They share this crate for the window/context plumbing and, from the
//! second step on, for reloading their shaders while running.
//!
//! # Shader reloading
//!
//! [`ReloadLoop`] ties three pieces together every frame:
//!
//! - [`ShaderSet`] notices when either shader file's modification time moves
//!   forward and hands back fresh text for *both* stages;
//! - [`GraphicsProgram`] compiles and links the new pair and swaps it in,
//!   deleting the old program only once the new one is known to be good;
//! - the step's draw callback then runs with whichever program is active.
//!
//! A shader edit that fails to compile or link leaves the last good program
//! bound, logs the driver's diagnostic, and the picture simply stays the
//! same until the next save. The GPU is reached through [`ProgramBackend`],
//! implemented for a live context by [`GlowBackend`].
//!
//! # Safety
//!
//! [`GlowBackend::new`] requires the GL context to be current on the calling
//! thread for the backend's whole lifetime; everything taking a backend
//! relies on that. The remaining raw GL helpers ([`Mesh`], [`Texture`]) are
//! `unsafe` and carry the same requirement.
//!
//! [glow]: https://docs.rs/glow

mod app;
mod backend;
pub mod config;
mod error;
pub mod mesh;
#[cfg(test)]
mod mock;
mod program;
mod reload;
mod source;
mod texture;
pub mod transform;

pub use app::{init_logging, run, Step};
pub use backend::{GlowBackend, ProgramBackend};
pub use error::{
    AppError, BuildError, ResourceError, SourceError, Stage, StartError, TextureError,
};
pub use mesh::Mesh;
pub use program::GraphicsProgram;
pub use reload::{ReloadLoop, TickOutcome};
pub use source::{ShaderSet, ShaderSource, SourcePair};
pub use texture::Texture;
