//! Counting in-memory [`ProgramBackend`] for unit tests.
//!
//! Sources containing [`COMPILE_ERROR`] fail to compile and pairs where
//! either stage contains [`LINK_ERROR`] fail to link. Every live object is
//! tracked so tests can assert nothing leaks, and releasing an unknown or
//! already released object panics.

use std::collections::{HashMap, HashSet};

use crate::backend::ProgramBackend;
use crate::error::{BuildError, Stage};

/// Marker that makes a stage fail to compile.
pub const COMPILE_ERROR: &str = "#error";
/// Marker that makes a program fail to link.
pub const LINK_ERROR: &str = "undefined_symbol";

/// Handle to a mock stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockStage(u32);

/// Handle to a mock program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockProgram(u32);

#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: u32,
    stages: HashMap<MockStage, String>,
    programs: HashSet<MockProgram>,
    pub bound: Option<MockProgram>,
    pub programs_created: usize,
    pub programs_deleted: usize,
    pub stages_created: usize,
    pub stages_deleted: usize,
    /// Fail the next object creation, as if the driver ran out of handles.
    pub exhaust_next: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn is_live(&self, program: MockProgram) -> bool {
        self.programs.contains(&program)
    }

    fn next_id(&mut self) -> Result<u32, BuildError> {
        if std::mem::take(&mut self.exhaust_next) {
            return Err(BuildError::Resource("out of object names".to_owned()));
        }
        self.next_id += 1;
        Ok(self.next_id)
    }
}

impl ProgramBackend for MockBackend {
    type Stage = MockStage;
    type Program = MockProgram;

    fn compile_stage(&mut self, stage: Stage, source: &str) -> Result<MockStage, BuildError> {
        let handle = MockStage(self.next_id()?);
        self.stages_created += 1;
        if source.contains(COMPILE_ERROR) {
            self.stages_deleted += 1;
            return Err(BuildError::Compile {
                stage,
                log: format!("0:1(1): error: {COMPILE_ERROR} in {stage} shader"),
            });
        }
        self.stages.insert(handle, source.to_owned());
        Ok(handle)
    }

    fn link_program(
        &mut self,
        vertex: MockStage,
        fragment: MockStage,
    ) -> Result<MockProgram, BuildError> {
        let vertex_src = self.stages.get(&vertex).expect("vertex stage not live");
        let fragment_src = self.stages.get(&fragment).expect("fragment stage not live");
        let unresolved = vertex_src.contains(LINK_ERROR) || fragment_src.contains(LINK_ERROR);

        let program = MockProgram(self.next_id()?);
        self.programs_created += 1;
        if unresolved {
            self.programs_deleted += 1;
            return Err(BuildError::Link {
                log: format!("error: unresolved reference to `{LINK_ERROR}`"),
            });
        }
        self.programs.insert(program);
        Ok(program)
    }

    fn use_program(&mut self, program: Option<MockProgram>) {
        if let Some(program) = program {
            assert!(self.programs.contains(&program), "binding a dead program");
        }
        self.bound = program;
    }

    fn delete_program(&mut self, program: MockProgram) {
        assert!(self.programs.remove(&program), "double delete of {program:?}");
        if self.bound == Some(program) {
            self.bound = None;
        }
        self.programs_deleted += 1;
    }

    fn delete_stage(&mut self, stage: MockStage) {
        assert!(self.stages.remove(&stage).is_some(), "double delete of {stage:?}");
        self.stages_deleted += 1;
    }
}
