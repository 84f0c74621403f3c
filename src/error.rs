//! Error types for shader loading, program building and application startup.

use std::fmt;
use std::path::PathBuf;

/// One shader stage of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The vertex stage.
    Vertex,
    /// The fragment stage.
    Fragment,
}

impl Stage {
    /// The GL shader type constant for this stage.
    #[must_use]
    pub fn gl_type(self) -> u32 {
        match self {
            Stage::Vertex => glow::VERTEX_SHADER,
            Stage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to stat or read a shader source file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file is missing or unreadable.
    #[error("failed to access shader file {}: {source}", path.display())]
    Io {
        /// Path of the shader file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not valid UTF-8.
    #[error("shader file {} is not valid UTF-8", path.display())]
    Encoding {
        /// Path of the shader file.
        path: PathBuf,
    },
}

/// Failure to compile or link a program.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The compiler rejected one stage. `log` is the driver's info log, verbatim.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile {
        /// Stage that failed.
        stage: Stage,
        /// Compiler diagnostic output.
        log: String,
    },
    /// The linker rejected an otherwise compiled pair.
    #[error("program failed to link:\n{log}")]
    Link {
        /// Linker diagnostic output.
        log: String,
    },
    /// The backend could not allocate a shader or program object.
    #[error("failed to create GL object: {0}")]
    Resource(String),
    /// The program was already torn down.
    #[error("program has been destroyed")]
    Destroyed,
}

/// Failure of the initial load-and-build at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    /// A shader file could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The initial program could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Failure to create a GL object outside of program building.
#[derive(Debug, thiserror::Error)]
#[error("failed to create GL {kind}: {message}")]
pub struct ResourceError {
    /// Kind of object, e.g. `"texture"`.
    pub kind: &'static str,
    /// Driver message.
    pub message: String,
}

impl ResourceError {
    pub(crate) fn of(kind: &'static str) -> impl FnOnce(String) -> Self {
        move |message| Self { kind, message }
    }
}

/// Failure to load an image into a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The file could not be opened or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    Decode {
        /// Path of the image.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
    /// The image is larger than GL can address.
    #[error("image is too large: {width}x{height}")]
    TooLarge {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// The texture object could not be created.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Failure to open the window or set up a step.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// No window or GL config could be created.
    #[error("failed to create window: {0}")]
    Window(String),
    /// The GL context or surface could not be created.
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),
    /// The step's shaders could not be loaded or built.
    #[error(transparent)]
    Start(#[from] StartError),
    /// A GL object could not be created.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// A texture could not be loaded.
    #[error(transparent)]
    Texture(#[from] TextureError),
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        Self::Start(StartError::Build(err))
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        Self::Start(StartError::Source(err))
    }
}
