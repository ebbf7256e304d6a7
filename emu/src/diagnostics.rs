//! # Diagnostics sink
//!
//! Passive observer of the pipeline. The core reports every fetch, every
//! executed instruction and the occasional informational or error message;
//! nothing returned from here feeds back into emulation.

use crate::cpu::arm::instructions::Instruction;

pub trait Diagnostics {
    fn word_fetched(&mut self, address: u32, word: u32) {
        let _ = (address, word);
    }

    /// `pc` is the program counter as seen by the instruction while it runs.
    fn instruction_executed(&mut self, instruction: &Instruction, pc: u32) {
        let _ = (instruction, pc);
    }

    fn info(&mut self, message: &str) {
        let _ = message;
    }

    fn error(&mut self, message: &str) {
        let _ = message;
    }
}

/// Default sink, forwards every event to `tracing`.
#[derive(Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn word_fetched(&mut self, address: u32, word: u32) {
        tracing::trace!(
            address = format_args!("0x{address:08X}"),
            word = format_args!("0x{word:08X}"),
            "fetch"
        );
    }

    fn instruction_executed(&mut self, instruction: &Instruction, pc: u32) {
        tracing::debug!(pc = format_args!("0x{pc:08X}"), %instruction, "execute");
    }

    fn info(&mut self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Drops everything.
#[derive(Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {}
