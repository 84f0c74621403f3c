//! Shader source files and modification tracking.
//!
//! Change detection compares file modification times, so it is bounded by
//! the filesystem's timestamp granularity: two writes that land in the same
//! mtime tick (one second on some FAT and HFS+ volumes, a few milliseconds on
//! others) are seen as a single change, and a write that leaves the mtime
//! unchanged is not seen at all.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::SourceError;

/// A shader file on disk and the modification time last consumed from it.
#[derive(Debug)]
pub struct ShaderSource {
    path: PathBuf,
    last_modified: SystemTime,
}

impl ShaderSource {
    /// Start tracking the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be stat'ed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let last_modified = modified_time(&path)?;
        Ok(Self {
            path,
            last_modified,
        })
    }

    /// Path of the tracked file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time recorded at construction or at the last read.
    #[must_use]
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    /// Whether the file's mtime is strictly later than the recorded one.
    ///
    /// Does not update the recorded time; only [`read_content`](Self::read_content)
    /// marks a change as consumed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file disappeared or cannot be stat'ed.
    pub fn has_changed(&self) -> Result<bool, SourceError> {
        Ok(modified_time(&self.path)? > self.last_modified)
    }

    /// Read the whole file and record its current mtime.
    ///
    /// The mtime is sampled before reading, so a write racing with the read
    /// is picked up again on the next check.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] on stat/read failure, or
    /// [`SourceError::Encoding`] if the content is not UTF-8.
    pub fn read_content(&mut self) -> Result<String, SourceError> {
        let (text, observed) = self.read_observed()?;
        self.mark_seen(observed);
        Ok(text)
    }

    /// Read the file and its mtime without marking anything as seen.
    fn read_observed(&self) -> Result<(String, SystemTime), SourceError> {
        let observed = modified_time(&self.path)?;
        let bytes = fs::read(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| SourceError::Encoding {
            path: self.path.clone(),
        })?;
        Ok((text, observed))
    }

    fn mark_seen(&mut self, observed: SystemTime) {
        if observed > self.last_modified {
            self.last_modified = observed;
        }
    }
}

fn modified_time(path: &Path) -> Result<SystemTime, SourceError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Vertex and fragment shader text, always read together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePair {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
}

/// The vertex/fragment source files of one program.
#[derive(Debug)]
pub struct ShaderSet {
    vertex: ShaderSource,
    fragment: ShaderSource,
}

impl ShaderSet {
    /// Track the given vertex and fragment shader files.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if either file cannot be stat'ed.
    pub fn new(
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            vertex: ShaderSource::new(vertex_path)?,
            fragment: ShaderSource::new(fragment_path)?,
        })
    }

    /// The vertex shader file.
    #[must_use]
    pub fn vertex(&self) -> &ShaderSource {
        &self.vertex
    }

    /// The fragment shader file.
    #[must_use]
    pub fn fragment(&self) -> &ShaderSource {
        &self.fragment
    }

    /// Read both files unconditionally.
    ///
    /// Neither file is marked as seen unless both reads succeed, so a failed
    /// read leaves any pending change to be picked up by the next check.
    ///
    /// # Errors
    ///
    /// Propagates the first read failure.
    pub fn current_source(&mut self) -> Result<SourcePair, SourceError> {
        let (vertex, vertex_seen) = self.vertex.read_observed()?;
        let (fragment, fragment_seen) = self.fragment.read_observed()?;
        self.vertex.mark_seen(vertex_seen);
        self.fragment.mark_seen(fragment_seen);
        Ok(SourcePair { vertex, fragment })
    }

    /// If either file changed, read and return both; otherwise `None`.
    ///
    /// Both files are checked on every call so simultaneous edits are
    /// consumed together. A program always links from a complete pair, so
    /// the unchanged stage is re-read as well.
    ///
    /// # Errors
    ///
    /// Propagates stat or read failures of either file.
    pub fn check_and_fetch_if_changed(&mut self) -> Result<Option<SourcePair>, SourceError> {
        let vertex_changed = self.vertex.has_changed()?;
        let fragment_changed = self.fragment.has_changed()?;
        if !(vertex_changed || fragment_changed) {
            return Ok(None);
        }
        self.current_source().map(Some)
    }
}
