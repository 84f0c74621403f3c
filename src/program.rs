//! Lifecycle of the linked program that the render loop draws with.

use log::{debug, info};

use crate::backend::ProgramBackend;
use crate::error::{BuildError, Stage};

enum State<P> {
    Uninitialized,
    Active(P),
    Destroyed,
}

/// Owns the current program object and replaces it safely on rebuild.
///
/// ```text
/// Uninitialized --build--> Active --rebuild--> Active
///                            |        (new program, or the old one on failure)
///                            +--teardown--> Destroyed
/// ```
///
/// At most one program is alive at any time: a rebuild deletes the old
/// program before binding its replacement, and a failed rebuild leaves the
/// old program bound and untouched. Stage objects never outlive a build.
pub struct GraphicsProgram<B: ProgramBackend> {
    state: State<B::Program>,
    generation: u64,
}

impl<B: ProgramBackend> Default for GraphicsProgram<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ProgramBackend> GraphicsProgram<B> {
    /// An empty handle with no program yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Uninitialized,
            generation: 0,
        }
    }

    /// The currently bound program, if any.
    #[must_use]
    pub fn active_program(&self) -> Option<B::Program> {
        match self.state {
            State::Active(program) => Some(program),
            State::Uninitialized | State::Destroyed => None,
        }
    }

    /// Whether [`teardown`](Self::teardown) has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, State::Destroyed)
    }

    /// Number of successful builds so far.
    ///
    /// Uniform locations belong to a program object, so callers caching them
    /// re-query whenever this changes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Compile, link and bind the first program.
    ///
    /// On an already active handle this is the same as
    /// [`rebuild`](Self::rebuild).
    ///
    /// # Errors
    ///
    /// [`BuildError::Compile`] naming the failing stage, [`BuildError::Link`],
    /// [`BuildError::Resource`], or [`BuildError::Destroyed`] after teardown.
    pub fn build(
        &mut self,
        backend: &mut B,
        vertex: &str,
        fragment: &str,
    ) -> Result<B::Program, BuildError> {
        match self.state {
            State::Destroyed => Err(BuildError::Destroyed),
            State::Active(_) => self.rebuild(backend, vertex, fragment),
            State::Uninitialized => {
                let program = compile_and_link(backend, vertex, fragment)?;
                self.activate(backend, program);
                info!("built shader program {program:?}");
                Ok(program)
            }
        }
    }

    /// Replace the active program with one built from new sources.
    ///
    /// The replacement is fully compiled and linked before anything is
    /// released. If that fails, the old program stays bound and the error is
    /// returned; otherwise the old program is deleted and the new one bound.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn rebuild(
        &mut self,
        backend: &mut B,
        vertex: &str,
        fragment: &str,
    ) -> Result<B::Program, BuildError> {
        let previous = match self.state {
            State::Destroyed => return Err(BuildError::Destroyed),
            State::Uninitialized => return self.build(backend, vertex, fragment),
            State::Active(previous) => previous,
        };

        let program = compile_and_link(backend, vertex, fragment)?;
        backend.delete_program(previous);
        self.activate(backend, program);
        info!("rebuilt shader program {previous:?} -> {program:?}");
        Ok(program)
    }

    /// Release the active program. Further calls are no-ops.
    pub fn teardown(&mut self, backend: &mut B) {
        match std::mem::replace(&mut self.state, State::Destroyed) {
            State::Active(program) => {
                backend.use_program(None);
                backend.delete_program(program);
                debug!("deleted shader program {program:?}");
            }
            State::Uninitialized | State::Destroyed => {}
        }
    }

    fn activate(&mut self, backend: &mut B, program: B::Program) {
        backend.use_program(Some(program));
        self.state = State::Active(program);
        self.generation += 1;
    }
}

/// Compile both stages and link them, releasing the stage objects on every
/// path out.
fn compile_and_link<B: ProgramBackend>(
    backend: &mut B,
    vertex: &str,
    fragment: &str,
) -> Result<B::Program, BuildError> {
    let vs = backend.compile_stage(Stage::Vertex, vertex)?;
    let fs = match backend.compile_stage(Stage::Fragment, fragment) {
        Ok(fs) => fs,
        Err(err) => {
            backend.delete_stage(vs);
            return Err(err);
        }
    };

    let linked = backend.link_program(vs, fs);
    backend.delete_stage(vs);
    backend.delete_stage(fs);
    linked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, COMPILE_ERROR, LINK_ERROR};

    const VERT: &str = "void main() { gl_Position = vec4(0.0); }";
    const FRAG: &str = "out vec4 c; void main() { c = vec4(1.0); }";

    #[test]
    fn build_activates_and_releases_stages() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        assert_eq!(program.active_program(), None);

        let handle = program.build(&mut backend, VERT, FRAG).unwrap();

        assert_eq!(program.active_program(), Some(handle));
        assert_eq!(backend.bound, Some(handle));
        assert_eq!(backend.live_programs(), 1);
        assert_eq!(backend.live_stages(), 0);
        assert_eq!(program.generation(), 1);
    }

    #[test]
    fn rebuild_with_same_source_leaves_one_program() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        let first = program.build(&mut backend, VERT, FRAG).unwrap();

        let second = program.rebuild(&mut backend, VERT, FRAG).unwrap();

        assert_ne!(first, second);
        assert!(!backend.is_live(first));
        assert_eq!(program.active_program(), Some(second));
        assert_eq!(backend.bound, Some(second));
        assert_eq!(backend.live_programs(), 1);
        assert_eq!(backend.programs_created - backend.programs_deleted, 1);
        assert_eq!(backend.live_stages(), 0);
        assert_eq!(program.generation(), 2);
    }

    #[test]
    fn invalid_fragment_keeps_previous_program() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        let good = program.build(&mut backend, VERT, FRAG).unwrap();

        let err = program
            .rebuild(&mut backend, VERT, &format!("{COMPILE_ERROR}\n{FRAG}"))
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::Compile {
                stage: Stage::Fragment,
                ..
            }
        ));
        assert_eq!(program.active_program(), Some(good));
        assert_eq!(backend.bound, Some(good));
        assert_eq!(backend.live_programs(), 1);
        assert_eq!(backend.live_stages(), 0);
        assert_eq!(program.generation(), 1);
    }

    #[test]
    fn compile_error_log_is_surfaced_verbatim() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        let err = program
            .build(&mut backend, COMPILE_ERROR, FRAG)
            .unwrap_err();
        match err {
            BuildError::Compile { stage, log } => {
                assert_eq!(stage, Stage::Vertex);
                assert_eq!(log, "0:1(1): error: #error in vertex shader");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(program.active_program(), None);
        assert_eq!(backend.live_stages(), 0);
    }

    #[test]
    fn link_error_keeps_previous_program() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        let good = program.build(&mut backend, VERT, FRAG).unwrap();

        let err = program
            .rebuild(&mut backend, &format!("{VERT} // {LINK_ERROR}"), FRAG)
            .unwrap_err();

        assert!(matches!(err, BuildError::Link { .. }));
        assert_eq!(program.active_program(), Some(good));
        assert_eq!(backend.live_programs(), 1);
        assert_eq!(backend.live_stages(), 0);
    }

    #[test]
    fn resource_exhaustion_during_rebuild_keeps_previous_program() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        let good = program.build(&mut backend, VERT, FRAG).unwrap();

        backend.exhaust_next = true;
        let err = program.rebuild(&mut backend, VERT, FRAG).unwrap_err();

        assert!(matches!(err, BuildError::Resource(_)));
        assert_eq!(program.active_program(), Some(good));
        assert_eq!(backend.live_stages(), 0);
    }

    #[test]
    fn build_on_active_program_replaces_it() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        program.build(&mut backend, VERT, FRAG).unwrap();
        program.build(&mut backend, VERT, FRAG).unwrap();
        assert_eq!(backend.live_programs(), 1);
    }

    #[test]
    fn teardown_twice_is_a_no_op() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        program.build(&mut backend, VERT, FRAG).unwrap();

        program.teardown(&mut backend);
        program.teardown(&mut backend);

        assert!(program.is_destroyed());
        assert_eq!(program.active_program(), None);
        assert_eq!(backend.bound, None);
        assert_eq!(backend.live_programs(), 0);
        assert_eq!(backend.programs_deleted, 1);
    }

    #[test]
    fn teardown_before_build_is_harmless() {
        let mut backend = MockBackend::new();
        let mut program: GraphicsProgram<MockBackend> = GraphicsProgram::new();
        program.teardown(&mut backend);
        assert!(program.is_destroyed());
        assert_eq!(backend.programs_deleted, 0);
    }

    #[test]
    fn destroyed_program_refuses_to_build() {
        let mut backend = MockBackend::new();
        let mut program = GraphicsProgram::new();
        program.build(&mut backend, VERT, FRAG).unwrap();
        program.teardown(&mut backend);

        assert!(matches!(
            program.rebuild(&mut backend, VERT, FRAG),
            Err(BuildError::Destroyed)
        ));
        assert!(matches!(
            program.build(&mut backend, VERT, FRAG),
            Err(BuildError::Destroyed)
        ));
        assert_eq!(backend.live_programs(), 0);
    }
}
