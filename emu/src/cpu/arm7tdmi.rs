//! # ARM7TDMI core
//!
//! Owns the register file, the status registers and the pipeline slots.
//! The host fills the pipeline once with [`Arm7tdmi::boot_fill`] and then
//! calls [`Arm7tdmi::step`], which retires one instruction while two more
//! are in flight:
//!
//! ```text
//!  step n     execute(i)   decode(i+1)   fetch(i+2)
//!  step n+1   execute(i+1) decode(i+2)   fetch(i+3)
//! ```
//!
//! Because of this overlap an instruction sees `pc` two instructions past
//! its own address while it executes.

use std::collections::BTreeMap;

use crate::cpu::arm::alu_instruction::ArmModeAluInstruction;
use crate::cpu::arm::instructions::{self, Instruction, SingleDataTransferKind};
use crate::cpu::pipeline::{Fetched, Pipeline, PipelineState};
use crate::cpu::psr::Psr;
use crate::cpu::registers::{Register, Registers};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::errors::{CpuError, DecodeError};
use crate::memory::{InternalMemory, Memory};

pub const SIZE_OF_ARM_INSTRUCTION: u32 = 4;

pub struct Arm7tdmi<M: Memory = InternalMemory> {
    pub(crate) memory: M,
    pub(crate) diagnostics: Box<dyn Diagnostics>,

    pub(crate) cpsr: Psr,
    /// Placeholder, no exception entry writes it.
    spsr: Psr,
    pub(crate) registers: Registers,

    pub(crate) pipeline: Pipeline,
}

impl Default for Arm7tdmi<InternalMemory> {
    fn default() -> Self {
        Self::new(InternalMemory::default())
    }
}

impl<M: Memory> Arm7tdmi<M> {
    pub fn new(memory: M) -> Self {
        Self {
            memory,
            diagnostics: Box::new(TracingDiagnostics),
            cpsr: Psr::default(),
            spsr: Psr::default(),
            registers: Registers::default(),
            pipeline: Pipeline::default(),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Loads `bytes` at address 0.
    pub fn set_bios(&mut self, bytes: &[u8]) {
        self.memory.write_array(bytes, 0);
    }

    /// Fetches the first word, decodes it and fetches the second one.
    /// Nothing is executed.
    ///
    /// # Errors
    ///
    /// [`CpuError::AlreadyBooted`] on a second call, [`CpuError::Decode`] if
    /// the first word uses an unsupported operand form.
    pub fn boot_fill(&mut self) -> Result<(), CpuError> {
        self.pipeline.begin_fill()?;

        self.fetch();
        self.decode()?;
        self.fetch();

        self.pipeline.finish_fill();
        Ok(())
    }

    /// Executes the decoded instruction, decodes the fetched word and
    /// fetches the next one.
    ///
    /// # Errors
    ///
    /// [`CpuError::NotBooted`] before [`Self::boot_fill`], [`CpuError::Decode`]
    /// if the fetched word uses an unsupported operand form. In that case
    /// nothing new is fetched and the same error comes back on the next call.
    pub fn step(&mut self) -> Result<(), CpuError> {
        self.pipeline.ensure_running()?;

        self.execute();
        self.decode()?;
        self.fetch();

        Ok(())
    }

    fn fetch(&mut self) {
        let address = if let Some(Instruction::Branch { target, .. }) = self.pipeline.decoded() {
            // The target is known as soon as the branch is decoded.
            target
        } else if self.pipeline.take_flush() {
            // Refill after an executed branch: skip the slot that was already fetched.
            self.registers
                .advance_program_counter(SIZE_OF_ARM_INSTRUCTION);
            self.registers.program_counter()
        } else {
            self.registers.program_counter()
        };

        self.registers
            .advance_program_counter(SIZE_OF_ARM_INSTRUCTION);

        let word = self.memory.read_word(address);
        self.pipeline.set_fetched(Fetched { address, word });
        self.diagnostics.word_fetched(address, word);
    }

    fn decode(&mut self) -> Result<(), DecodeError> {
        let Some(Fetched { address, word }) = self.pipeline.fetched() else {
            return Ok(());
        };

        match instructions::decode_with_diagnostics(word, address, self.diagnostics.as_mut()) {
            Ok(instruction) => {
                if matches!(instruction, Instruction::Unknown { .. }) {
                    self.diagnostics.info(&format!(
                        "unknown instruction 0x{word:08X} at 0x{address:08X}"
                    ));
                }
                self.pipeline.set_decoded(Some(instruction));
                Ok(())
            }
            Err(e) => {
                self.pipeline.set_decoded(None);
                self.diagnostics.error(&e.to_string());
                Err(e)
            }
        }
    }

    fn execute(&mut self) {
        let Some(instruction) = self.pipeline.decoded() else {
            return;
        };

        if !instruction.opcode().is_implemented() {
            self.diagnostics.info(&format!(
                "{} is not implemented, skipping 0x{:08X}",
                instruction.opcode(),
                instruction.pc()
            ));
            return;
        }

        self.diagnostics
            .instruction_executed(&instruction, self.registers.program_counter());

        match instruction {
            Instruction::Unknown { .. } => self.nop(),
            Instruction::Branch { target, .. } => self.branch(target),
            Instruction::DataProcessing {
                op,
                dest_reg,
                src_reg,
                operand2,
                ..
            } => match op {
                ArmModeAluInstruction::Teq => self.teq(src_reg, operand2),
                ArmModeAluInstruction::Cmp => self.cmp(src_reg, operand2),
                ArmModeAluInstruction::Mov => self.mov(dest_reg, operand2),
            },
            Instruction::DataTransfer {
                op: SingleDataTransferKind::Ldr,
                dest_reg,
                base_reg,
                pre_indexed,
                signed_offset,
                ..
            } => self.ldr(dest_reg, base_reg, pre_indexed, signed_offset),
            // Filtered out by `is_implemented` above.
            Instruction::DataTransfer {
                op: SingleDataTransferKind::Str,
                ..
            } => {}
        }
    }

    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.registers.program_counter()
    }

    #[must_use]
    pub const fn register(&self, reg: Register) -> u32 {
        self.registers.register(reg)
    }

    pub const fn set_register(&mut self, reg: Register, value: u32) {
        self.registers.set_register(reg, value);
    }

    /// Register name to value, `r0` to `r14` and `pc`.
    #[must_use]
    pub fn registers(&self) -> BTreeMap<Register, u32> {
        self.registers.snapshot()
    }

    #[must_use]
    pub const fn cpsr(&self) -> u32 {
        self.cpsr.raw()
    }

    pub const fn set_cpsr(&mut self, value: u32) {
        self.cpsr.set_raw(value);
    }

    #[must_use]
    pub const fn spsr(&self) -> u32 {
        self.spsr.raw()
    }

    /// NZCV nibble, N in bit 3.
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.cpsr.flags()
    }

    pub fn set_flags(&mut self, nzcv: u32) {
        self.cpsr.set_flags(nzcv);
    }

    #[must_use]
    pub fn interrupt_mode(&self) -> u32 {
        self.cpsr.interrupt_mode()
    }

    pub fn set_interrupt_mode(&mut self, value: u32) {
        self.cpsr.set_interrupt_mode(value);
    }

    #[must_use]
    pub const fn pipeline_state(&self) -> PipelineState {
        self.pipeline.state()
    }

    /// The instruction that the next [`Self::step`] executes.
    #[must_use]
    pub const fn decoded_instruction(&self) -> Option<Instruction> {
        self.pipeline.decoded()
    }

    #[must_use]
    pub const fn memory(&self) -> &M {
        &self.memory
    }
}
