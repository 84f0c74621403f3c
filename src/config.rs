//! Fixed settings shared by the tutorial steps.
//!
//! Every step opens the same 800×600 window and clears to the same color;
//! only the title and asset paths differ. There are no flags or config
//! files, the one runtime knob is `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Window and context parameters for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Window title.
    pub title: &'static str,
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
    /// RGBA clear color.
    pub clear_color: [f32; 4],
    /// Requested OpenGL core profile version (major, minor).
    pub gl_version: (u8, u8),
}

impl WindowConfig {
    /// The standard window with the given title.
    #[must_use]
    pub fn titled(title: &'static str) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "shader-steps",
            width: 800,
            height: 600,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            gl_version: (3, 3),
        }
    }
}

/// How often the reload loop stats the shader files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadConfig {
    /// Minimum time between two checks. Zero checks every frame.
    pub recheck_interval: Duration,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            recheck_interval: Duration::ZERO,
        }
    }
}

/// Root directory holding every step's assets.
#[must_use]
pub fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Vertex and fragment shader paths of a step, `assets/<step>/shader.{vert,frag}`.
#[must_use]
pub fn shader_paths(step: &str) -> (PathBuf, PathBuf) {
    let dir = assets_dir().join(step);
    (dir.join("shader.vert"), dir.join("shader.frag"))
}

/// Path of a shared texture image, `assets/textures/<name>`.
#[must_use]
pub fn texture_path(name: &str) -> PathBuf {
    assets_dir().join("textures").join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_tutorial() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.clear_color, [0.2, 0.3, 0.3, 1.0]);
        assert_eq!(config.gl_version, (3, 3));
    }

    #[test]
    fn titled_keeps_other_defaults() {
        let config = WindowConfig::titled("hello-triangle");
        assert_eq!(config.title, "hello-triangle");
        assert_eq!(config.width, WindowConfig::default().width);
    }

    #[test]
    fn shader_paths_point_into_step_dir() {
        let (vert, frag) = shader_paths("rect");
        assert!(vert.ends_with("assets/rect/shader.vert"));
        assert!(frag.ends_with("assets/rect/shader.frag"));
    }

    #[test]
    fn bundled_step_shaders_exist() {
        for step in ["rect", "shaders", "textures", "animation"] {
            let (vert, frag) = shader_paths(step);
            assert!(vert.is_file(), "{} missing", vert.display());
            assert!(frag.is_file(), "{} missing", frag.display());
        }
        assert!(texture_path("container.png").is_file());
        assert!(texture_path("awesomeface.png").is_file());
    }

    #[test]
    fn reload_checks_every_frame_by_default() {
        assert_eq!(ReloadConfig::default().recheck_interval, Duration::ZERO);
    }
}
