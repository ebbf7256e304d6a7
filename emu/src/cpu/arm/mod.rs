//! # ARM Instruction Set (32-bit)
//!
//! Only the subset needed to get through the first instructions of a BIOS
//! image is understood.
//!
//! ## Format
//!
//! ```text
//! 31-28   27-24   23-0
//! [Cond] [Class] [Instruction-specific]
//! ```
//!
//! The condition field is read but never evaluated, every instruction runs.
//!
//! ## Instruction Classes
//!
//! | Bits 27-24  | Category              | Handled                     |
//! |-------------|-----------------------|-----------------------------|
//! | 000x, 001x  | Data Processing       | TEQ, CMP, MOV with #imm     |
//! | 0100-0111   | Single Data Transfer  | LDR, STR with #imm offset   |
//! | 1010        | Branch                | B                           |
//! | anything    | else                  | decoded as unknown, no-op   |
//!
//! ## Submodules
//!
//! - [`instructions`] - Decoding
//! - [`operations`] - Execution
//! - [`alu_instruction`] - ALU opcodes and the rotated immediate

#[allow(clippy::cast_possible_truncation)]
pub mod alu_instruction;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
pub mod instructions;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_lossless)]
mod operations;
