//! # ARM Instruction Decoding
//!
//! Turns a 32-bit word and the address it was fetched from into an
//! [`Instruction`]. Decoding is a pure function of those two values.
//!
//! ## Instruction Classes
//!
//! The class is read from bits 27-24:
//!
//! ```text
//! ┌───────────┬──────────────────────────────────────────┐
//! │ 27-24     │ Class                                    │
//! ├───────────┼──────────────────────────────────────────┤
//! │ 1010      │ Branch (B)                               │
//! │ 0000-0011 │ Data Processing (TEQ, CMP, MOV)          │
//! │ 0100-0111 │ Single Data Transfer (LDR, STR)          │
//! │ other     │ Unknown                                  │
//! └───────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## Encodings
//!
//! ```text
//! Branch:          |_Cond__|1_0_1|L|______________________Offset___________________|
//! Data Processing: |_Cond__|0_0|I|_code__|S|__Rn___|__Rd___|_______operand2________|
//! Data Transfer:   |_Cond__|0_1|I|P|U|B|W|L|__Rn___|__Rd___|________Offset_________|
//! ```
//!
//! The condition field is not evaluated by this core.
//!
//! ## Failures
//!
//! Unrecognized classes and data processing opcodes degrade to
//! [`Instruction::Unknown`], the latter with an error reported to the
//! [`Diagnostics`] sink. Register operands and register offsets are
//! recognized but not supported: they fail with
//! [`DecodeError::UnsupportedFeature`] instead of producing a descriptor.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::arm::alu_instruction::{ArmModeAluInstruction, rotated_immediate};
use crate::cpu::registers::Register;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::errors::{DecodeError, UnsupportedFeature};

/// How far ahead of a branch the program counter is when the branch is
/// decoded: two instructions.
pub const PC_LOOKAHEAD: u32 = 8;

/// Determined by the L bit (bit 20).
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum SingleDataTransferKind {
    /// Load from memory into a register (`LDR`).
    Ldr,

    /// Store from a register into memory (`STR`).
    Str,
}

impl From<bool> for SingleDataTransferKind {
    fn from(load: bool) -> Self {
        if load { Self::Ldr } else { Self::Str }
    }
}

impl std::fmt::Display for SingleDataTransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ldr => f.write_str("LDR"),
            Self::Str => f.write_str("STR"),
        }
    }
}

/// Tag of an [`Instruction`], used to pick its handler.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Opcode {
    B,
    Teq,
    Cmp,
    Mov,
    Ldr,
    Str,
    Nop,
}

impl Opcode {
    /// Whether the execute stage has a handler for this opcode.
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        match self {
            Self::B | Self::Teq | Self::Cmp | Self::Mov | Self::Ldr | Self::Nop => true,
            Self::Str => false,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::B => "B",
            Self::Teq => "TEQ",
            Self::Cmp => "CMP",
            Self::Mov => "MOV",
            Self::Ldr => "LDR",
            Self::Str => "STR",
            Self::Nop => "NOP",
        };
        f.write_str(name)
    }
}

/// A decoded instruction. `pc` is always the address the word was fetched from.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum Instruction {
    Unknown {
        pc: u32,
    },
    Branch {
        pc: u32,
        /// Absolute address.
        target: u32,
    },
    DataProcessing {
        pc: u32,
        op: ArmModeAluInstruction,
        dest_reg: Register,
        src_reg: Register,
        /// Already rotated.
        operand2: u32,
    },
    DataTransfer {
        pc: u32,
        op: SingleDataTransferKind,
        dest_reg: Register,
        base_reg: Register,
        pre_indexed: bool,
        /// Negative when the U bit is clear.
        signed_offset: i32,
    },
}

impl Instruction {
    #[must_use]
    pub const fn pc(&self) -> u32 {
        match self {
            Self::Unknown { pc }
            | Self::Branch { pc, .. }
            | Self::DataProcessing { pc, .. }
            | Self::DataTransfer { pc, .. } => *pc,
        }
    }

    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::Unknown { .. } => Opcode::Nop,
            Self::Branch { .. } => Opcode::B,
            Self::DataProcessing { op, .. } => match op {
                ArmModeAluInstruction::Teq => Opcode::Teq,
                ArmModeAluInstruction::Cmp => Opcode::Cmp,
                ArmModeAluInstruction::Mov => Opcode::Mov,
            },
            Self::DataTransfer { op, .. } => match op {
                SingleDataTransferKind::Ldr => Opcode::Ldr,
                SingleDataTransferKind::Str => Opcode::Str,
            },
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown { .. } => f.write_str("UNKNOWN"),
            Self::Branch { target, .. } => write!(f, "B 0x{target:08X}"),
            Self::DataProcessing {
                op,
                dest_reg,
                src_reg,
                operand2,
                ..
            } => match op {
                ArmModeAluInstruction::Mov => write!(f, "{op} {dest_reg}, #0x{operand2:X}"),
                ArmModeAluInstruction::Teq | ArmModeAluInstruction::Cmp => {
                    write!(f, "{op} {src_reg}, #0x{operand2:X}")
                }
            },
            Self::DataTransfer {
                op,
                dest_reg,
                base_reg,
                pre_indexed,
                signed_offset,
                ..
            } => {
                if *pre_indexed {
                    write!(f, "{op} {dest_reg}, [{base_reg}, #{signed_offset}]")
                } else {
                    write!(f, "{op} {dest_reg}, [{base_reg}], #{signed_offset}")
                }
            }
        }
    }
}

/// Decodes `word`, fetched from `pc`, reporting to `tracing`.
///
/// # Errors
///
/// Returns [`DecodeError::UnsupportedFeature`] for data processing with a
/// register operand and for data transfers with a register offset.
pub fn decode(word: u32, pc: u32) -> Result<Instruction, DecodeError> {
    decode_with_diagnostics(word, pc, &mut TracingDiagnostics)
}

/// Same as [`decode`], with decode-time errors sent to `diagnostics`.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_diagnostics(
    word: u32,
    pc: u32,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Instruction, DecodeError> {
    match word.get_bits(24..=27) {
        0b1010 => Ok(decode_branch(word, pc)),
        0b0000..=0b0011 => decode_data_processing(word, pc, diagnostics),
        0b0100..=0b0111 => decode_data_transfer(word, pc),
        class => {
            tracing::debug!(
                "unknown instruction class 0b{class:04b} in 0x{word:08X} at 0x{pc:08X}"
            );
            Ok(Instruction::Unknown { pc })
        }
    }
}

fn decode_branch(word: u32, pc: u32) -> Instruction {
    // 24 bit signed word offset, relative to the prefetched pc.
    let offset = word.get_bits(0..=23).sign_extended(24) << 2;
    let target = pc.wrapping_add(PC_LOOKAHEAD).wrapping_add(offset);

    Instruction::Branch { pc, target }
}

fn decode_data_processing(
    word: u32,
    pc: u32,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Instruction, DecodeError> {
    let op = match ArmModeAluInstruction::try_from(word.get_bits(21..=24)) {
        Ok(op) => op,
        Err(code) => {
            diagnostics.error(&format!(
                "unrecognized data processing opcode 0x{code:X} in 0x{word:08X} at 0x{pc:08X}"
            ));
            return Ok(Instruction::Unknown { pc });
        }
    };

    let dest_reg = Register::from_field(word.get_bits(12..=15));
    let src_reg = Register::from_field(word.get_bits(16..=19));

    if !word.get_bit(25) {
        return Err(DecodeError::UnsupportedFeature {
            word,
            pc,
            feature: UnsupportedFeature::RegisterOperand,
        });
    }
    let operand2 = rotated_immediate(word.get_bits(0..=11));

    Ok(Instruction::DataProcessing {
        pc,
        op,
        dest_reg,
        src_reg,
        operand2,
    })
}

fn decode_data_transfer(word: u32, pc: u32) -> Result<Instruction, DecodeError> {
    // The I bit is inverted compared to data processing: 0 is an immediate.
    let register_offset = word.get_bit(25);
    let pre_indexed = word.get_bit(24);
    let up = word.get_bit(23);
    let op = SingleDataTransferKind::from(word.get_bit(20));
    let base_reg = Register::from_field(word.get_bits(16..=19));
    let dest_reg = Register::from_field(word.get_bits(12..=15));

    if register_offset {
        return Err(DecodeError::UnsupportedFeature {
            word,
            pc,
            feature: UnsupportedFeature::RegisterOffset,
        });
    }

    // 12 bits, never wraps.
    let offset = word.get_bits(0..=11) as i32;
    let signed_offset = if up { offset } else { -offset };

    Ok(Instruction::DataTransfer {
        pc,
        op,
        dest_reg,
        base_reg,
        pre_indexed,
        signed_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::recording::{Event, RecordingDiagnostics};
    use pretty_assertions::assert_eq;

    fn reg(n: u32) -> Register {
        Register::from_field(n)
    }

    #[test]
    fn decode_branch_forward() {
        // B #+2 words
        let instruction = decode(0xEA00_0002, 0).unwrap();

        assert_eq!(instruction, Instruction::Branch { pc: 0, target: 0x10 });
        assert_eq!(instruction.opcode(), Opcode::B);
    }

    #[test]
    fn decode_branch_backward() {
        // -9 words from 0x100
        let op_code = 0b1110_1010_1111_1111_1111_1111_1111_0111;
        let instruction = decode(op_code, 0x100).unwrap();

        assert_eq!(
            instruction,
            Instruction::Branch {
                pc: 0x100,
                target: 0x100 + 8 - 36
            }
        );
    }

    #[test]
    fn branch_offset_law() {
        for _ in 0..256 {
            let field = rand::random::<u32>() & 0x00FF_FFFF;
            let pc = rand::random::<u32>() & !0b11;
            let word = 0xEA00_0000 | field;

            let expected = i64::from(pc) + 8 + 4 * i64::from(((field << 8) as i32) >> 8);
            let expected = (expected & 0xFFFF_FFFF) as u32;

            assert_eq!(
                decode(word, pc),
                Ok(Instruction::Branch {
                    pc,
                    target: expected
                })
            );
        }
    }

    #[test]
    fn branch_with_link_is_unknown() {
        assert_eq!(decode(0xEB00_0002, 8), Ok(Instruction::Unknown { pc: 8 }));
    }

    #[test]
    fn decode_mov_immediate() {
        // MOV r0, #0xFF ror 4
        let instruction = decode(0xE3A0_02FF, 0x20).unwrap();

        assert_eq!(
            instruction,
            Instruction::DataProcessing {
                pc: 0x20,
                op: ArmModeAluInstruction::Mov,
                dest_reg: reg(0),
                src_reg: reg(0),
                operand2: 0xFF_u32.rotate_right(4),
            }
        );
        assert_eq!(instruction.to_string(), "MOV r0, #0xF000000F");
    }

    #[test]
    fn decode_cmp_immediate() {
        // CMP r1, #5
        let instruction = decode(0xE351_0005, 0).unwrap();

        assert_eq!(
            instruction,
            Instruction::DataProcessing {
                pc: 0,
                op: ArmModeAluInstruction::Cmp,
                dest_reg: reg(0),
                src_reg: reg(1),
                operand2: 5,
            }
        );
        assert_eq!(instruction.to_string(), "CMP r1, #0x5");
    }

    #[test]
    fn decode_teq_immediate() {
        // TEQ r2, #1
        let instruction = decode(0xE332_0001, 4).unwrap();

        assert_eq!(instruction.opcode(), Opcode::Teq);
        assert_eq!(instruction.pc(), 4);
        assert_eq!(instruction.to_string(), "TEQ r2, #0x1");
    }

    #[test]
    fn unrecognized_alu_opcode_is_unknown() {
        // ADD r0, r0, #1
        assert_eq!(decode(0xE280_0001, 0xC), Ok(Instruction::Unknown { pc: 0xC }));
        // ADD r0, r0, r1: the opcode is checked before the operand form.
        assert_eq!(decode(0xE080_0001, 0xC), Ok(Instruction::Unknown { pc: 0xC }));
    }

    #[test]
    fn unrecognized_alu_opcode_is_reported() {
        let mut recorder = RecordingDiagnostics::default();

        let instruction = decode_with_diagnostics(0xE280_0001, 0x24, &mut recorder);

        assert_eq!(instruction, Ok(Instruction::Unknown { pc: 0x24 }));
        assert_eq!(
            recorder.events(),
            vec![Event::Error(
                "unrecognized data processing opcode 0x4 in 0xE2800001 at 0x00000024".to_string()
            )]
        );

        // Recognized words and unknown classes report nothing.
        decode_with_diagnostics(0xE351_0005, 0, &mut recorder).unwrap();
        decode_with_diagnostics(0xEF00_0000, 0, &mut recorder).unwrap();
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn register_operand_is_unsupported() {
        // MOV r0, r1
        assert_eq!(
            decode(0xE1A0_0001, 0x40),
            Err(DecodeError::UnsupportedFeature {
                word: 0xE1A0_0001,
                pc: 0x40,
                feature: UnsupportedFeature::RegisterOperand,
            })
        );
    }

    #[test]
    fn decode_ldr_pre_indexed_up() {
        // LDR r0, [r1, #4]
        let instruction = decode(0xE591_0004, 0).unwrap();

        assert_eq!(
            instruction,
            Instruction::DataTransfer {
                pc: 0,
                op: SingleDataTransferKind::Ldr,
                dest_reg: reg(0),
                base_reg: reg(1),
                pre_indexed: true,
                signed_offset: 4,
            }
        );
        assert_eq!(instruction.to_string(), "LDR r0, [r1, #4]");
    }

    #[test]
    fn decode_ldr_down() {
        // LDR r3, [pc, #-0xFFF]
        let instruction = decode(0xE51F_3FFF, 0x10).unwrap();

        assert_eq!(
            instruction,
            Instruction::DataTransfer {
                pc: 0x10,
                op: SingleDataTransferKind::Ldr,
                dest_reg: reg(3),
                base_reg: Register::PC,
                pre_indexed: true,
                signed_offset: -0xFFF,
            }
        );
    }

    #[test]
    fn decode_str_post_indexed() {
        // STR r0, [r1], #8
        let instruction = decode(0xE481_0008, 0).unwrap();

        assert_eq!(instruction.opcode(), Opcode::Str);
        assert!(!instruction.opcode().is_implemented());
        assert_eq!(instruction.to_string(), "STR r0, [r1], #8");
    }

    #[test]
    fn register_offset_is_unsupported() {
        // LDR r0, [r1, r2] and STR r3, [r4], -r5, lsl #2
        for (word, pc) in [(0xE791_0002, 0), (0xE604_3105, 0x30)] {
            assert_eq!(
                decode(word, pc),
                Err(DecodeError::UnsupportedFeature {
                    word,
                    pc,
                    feature: UnsupportedFeature::RegisterOffset,
                })
            );
        }
    }

    #[test]
    fn other_classes_are_unknown() {
        // SWI, LDM, coprocessor.
        for word in [0xEF00_0000, 0xE8BD_0003, 0xEE00_0000] {
            assert_eq!(decode(word, 0), Ok(Instruction::Unknown { pc: 0 }));
        }
    }

    #[test]
    fn decode_is_deterministic() {
        for _ in 0..1024 {
            let word = rand::random::<u32>();
            let pc = rand::random::<u32>() & !0b11;

            assert_eq!(decode(word, pc), decode(word, pc));
        }
    }

    #[test]
    fn opcode_table() {
        assert!(Opcode::Nop.is_implemented());
        assert!(Opcode::B.is_implemented());
        assert!(Opcode::Ldr.is_implemented());
        assert!(!Opcode::Str.is_implemented());
        assert_eq!(Instruction::Unknown { pc: 0 }.opcode(), Opcode::Nop);
    }
}
