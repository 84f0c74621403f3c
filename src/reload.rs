//! Per-frame driver that keeps the program in sync with its source files.

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::backend::ProgramBackend;
use crate::error::StartError;
use crate::program::GraphicsProgram;
use crate::source::ShaderSet;

/// What a [`ReloadLoop::tick`] did before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No change was detected, or the check was skipped by the re-check interval.
    Unchanged,
    /// Sources changed and the program was rebuilt.
    Reloaded,
    /// Sources changed but the new program failed to build; the old one stays.
    RebuildFailed,
    /// A source file could not be stat'ed or read; treated as no change.
    CheckFailed,
}

/// Checks the shader files, rebuilds on change, and draws with whatever
/// program is active.
///
/// A failing check or rebuild is logged and contained here: the draw
/// callback still runs with the last good program, so a broken edit shows up
/// as an unchanged picture plus a console diagnostic.
pub struct ReloadLoop<B: ProgramBackend> {
    shaders: ShaderSet,
    program: GraphicsProgram<B>,
    recheck_interval: Duration,
    last_check: Option<Instant>,
}

impl<B: ProgramBackend> ReloadLoop<B> {
    /// Read both sources and build the initial program.
    ///
    /// # Errors
    ///
    /// Any failure here is fatal: there is no previous program to fall back on.
    pub fn start(backend: &mut B, mut shaders: ShaderSet) -> Result<Self, StartError> {
        let sources = shaders.current_source()?;
        let mut program = GraphicsProgram::new();
        program.build(backend, &sources.vertex, &sources.fragment)?;
        info!(
            "watching {} and {}",
            shaders.vertex().path().display(),
            shaders.fragment().path().display()
        );
        Ok(Self {
            shaders,
            program,
            recheck_interval: Duration::ZERO,
            last_check: None,
        })
    }

    /// Stat the files at most once per `interval`. Zero checks every tick.
    #[must_use]
    pub fn with_recheck_interval(mut self, interval: Duration) -> Self {
        self.recheck_interval = interval;
        self
    }

    /// The managed program.
    #[must_use]
    pub fn program(&self) -> &GraphicsProgram<B> {
        &self.program
    }

    /// The currently active program handle.
    #[must_use]
    pub fn active_program(&self) -> Option<B::Program> {
        self.program.active_program()
    }

    /// The watched source files.
    #[must_use]
    pub fn shaders(&self) -> &ShaderSet {
        &self.shaders
    }

    /// Run one frame: reload if needed, then `draw` with the active program.
    ///
    /// After [`teardown`](Self::teardown) the files are no longer checked and
    /// `draw` is skipped.
    pub fn tick<F>(&mut self, backend: &mut B, draw: F) -> TickOutcome
    where
        F: FnOnce(&mut B, B::Program),
    {
        self.tick_at(Instant::now(), backend, draw)
    }

    /// [`tick`](Self::tick) with an explicit current time.
    pub fn tick_at<F>(&mut self, now: Instant, backend: &mut B, draw: F) -> TickOutcome
    where
        F: FnOnce(&mut B, B::Program),
    {
        let outcome = if self.program.is_destroyed() {
            TickOutcome::Unchanged
        } else if self.check_due(now) {
            self.last_check = Some(now);
            self.reload(backend)
        } else {
            debug!("shader check skipped");
            TickOutcome::Unchanged
        };

        if let Some(program) = self.program.active_program() {
            draw(backend, program);
        }
        outcome
    }

    /// Check the sources once and rebuild if they changed.
    pub fn reload(&mut self, backend: &mut B) -> TickOutcome {
        let sources = match self.shaders.check_and_fetch_if_changed() {
            Ok(Some(sources)) => sources,
            Ok(None) => return TickOutcome::Unchanged,
            Err(err) => {
                warn!("shader check failed, keeping current program: {err}");
                return TickOutcome::CheckFailed;
            }
        };

        match self
            .program
            .rebuild(backend, &sources.vertex, &sources.fragment)
        {
            Ok(_) => TickOutcome::Reloaded,
            Err(err) => {
                error!("shader reload failed, keeping last good program: {err}");
                TickOutcome::RebuildFailed
            }
        }
    }

    /// Release the program. The loop draws nothing afterwards.
    pub fn teardown(&mut self, backend: &mut B) {
        self.program.teardown(backend);
    }

    fn check_due(&self, now: Instant) -> bool {
        match self.last_check {
            Some(last) => now.saturating_duration_since(last) >= self.recheck_interval,
            None => true,
        }
    }
}
