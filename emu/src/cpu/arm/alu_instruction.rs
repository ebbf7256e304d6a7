use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Data processing opcodes (bits 24-21) the core knows how to run.
///
/// The remaining thirteen encodings decode to
/// [`Instruction::Unknown`](super::instructions::Instruction::Unknown).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ArmModeAluInstruction {
    Teq = 0x9,
    Cmp = 0xA,
    Mov = 0xD,
}

impl Display for ArmModeAluInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Teq => f.write_str("TEQ"),
            Self::Cmp => f.write_str("CMP"),
            Self::Mov => f.write_str("MOV"),
        }
    }
}

impl TryFrom<u32> for ArmModeAluInstruction {
    type Error = u32;

    fn try_from(alu_op_code: u32) -> Result<Self, Self::Error> {
        match alu_op_code {
            0x9 => Ok(Self::Teq),
            0xA => Ok(Self::Cmp),
            0xD => Ok(Self::Mov),
            other => Err(other),
        }
    }
}

/// Barrel shifter rotate right. The amount is taken modulo 32.
#[must_use]
pub const fn ror(value: u32, amount: u32) -> u32 {
    value.rotate_right(amount % 32)
}

/// Expands the 12-bit immediate of a data processing instruction:
/// the 8-bit value in bits 7-0 rotated right by twice bits 11-8.
#[must_use]
pub const fn rotated_immediate(operand: u32) -> u32 {
    let base = operand & 0xFF;
    let rotate = (operand >> 8) & 0xF;
    ror(base, rotate * 2)
}
