//! # Three stage pipeline
//!
//! ```text
//!            boot_fill              branch executed
//!   Empty ──────────────▶ Running ─────────────────▶ Flushing
//!     │  (Filling while     ▲                            │
//!     │   boot_fill runs)   └────────────────────────────┘
//!     ▼                        next sequential fetch
//! ```
//!
//! `Flushing` is the "branch just executed" latch: the next fetch that is not
//! redirected by an already decoded branch skips one slot and moves the
//! state back to `Running`.

use crate::cpu::arm::instructions::Instruction;
use crate::errors::CpuError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing fetched yet.
    #[default]
    Empty,

    /// `boot_fill` is in progress, or it failed half way.
    Filling,

    /// Steady state.
    Running,

    /// A branch was executed, the next sequential fetch must refill.
    Flushing,
}

/// A word and the address it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched {
    pub address: u32,
    pub word: u32,
}

#[derive(Default)]
pub struct Pipeline {
    state: PipelineState,
    fetched: Option<Fetched>,
    decoded: Option<Instruction>,
}

impl Pipeline {
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    pub const fn fetched(&self) -> Option<Fetched> {
        self.fetched
    }

    pub const fn decoded(&self) -> Option<Instruction> {
        self.decoded
    }

    pub const fn set_fetched(&mut self, fetched: Fetched) {
        self.fetched = Some(fetched);
    }

    pub const fn set_decoded(&mut self, decoded: Option<Instruction>) {
        self.decoded = decoded;
    }

    pub const fn begin_fill(&mut self) -> Result<(), CpuError> {
        match self.state {
            PipelineState::Empty => {
                self.state = PipelineState::Filling;
                Ok(())
            }
            _ => Err(CpuError::AlreadyBooted),
        }
    }

    pub const fn finish_fill(&mut self) {
        if matches!(self.state, PipelineState::Filling) {
            self.state = PipelineState::Running;
        }
    }

    pub const fn ensure_running(&self) -> Result<(), CpuError> {
        match self.state {
            PipelineState::Running | PipelineState::Flushing => Ok(()),
            PipelineState::Empty | PipelineState::Filling => Err(CpuError::NotBooted),
        }
    }

    /// Set by the execute stage when a branch runs.
    pub const fn branch_taken(&mut self) {
        if matches!(self.state, PipelineState::Running | PipelineState::Flushing) {
            self.state = PipelineState::Flushing;
        }
    }

    /// Consumed by the fetch stage. Returns whether a flush was pending.
    pub const fn take_flush(&mut self) -> bool {
        if matches!(self.state, PipelineState::Flushing) {
            self.state = PipelineState::Running;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fill_once() {
        let mut pipeline = Pipeline::default();
        assert_eq!(pipeline.ensure_running(), Err(CpuError::NotBooted));

        pipeline.begin_fill().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Filling);
        assert_eq!(pipeline.ensure_running(), Err(CpuError::NotBooted));

        pipeline.finish_fill();
        assert_eq!(pipeline.state(), PipelineState::Running);
        assert_eq!(pipeline.ensure_running(), Ok(()));

        assert_eq!(pipeline.begin_fill(), Err(CpuError::AlreadyBooted));
    }

    #[test]
    fn flush_latch() {
        let mut pipeline = Pipeline::default();
        pipeline.begin_fill().unwrap();

        // Not legal while filling.
        pipeline.branch_taken();
        assert_eq!(pipeline.state(), PipelineState::Filling);
        assert!(!pipeline.take_flush());

        pipeline.finish_fill();
        pipeline.branch_taken();
        assert_eq!(pipeline.state(), PipelineState::Flushing);
        assert_eq!(pipeline.ensure_running(), Ok(()));

        assert!(pipeline.take_flush());
        assert_eq!(pipeline.state(), PipelineState::Running);
        assert!(!pipeline.take_flush());
    }

    #[test]
    fn slots_start_empty() {
        let pipeline = Pipeline::default();

        assert_eq!(pipeline.fetched(), None);
        assert_eq!(pipeline.decoded(), None);
    }
}
