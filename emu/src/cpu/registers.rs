//! # ARM7TDMI Register File
//!
//! The 16 general-purpose registers.
//!
//! - **R0-R12**: General purpose
//! - **R13**: Stack pointer (by convention)
//! - **R14**: Link register
//! - **R15 (PC)**: Program counter, advanced by every fetch
//!
//! Values are plain `u32` words at rest, anything needing a sign
//! reinterprets the bits explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Link Register index.
pub const REG_LR: u8 = 0xE;

/// Program Counter register index.
pub const REG_PROGRAM_COUNTER: u8 = 0xF;

/// A register identifier as decoded from a 4-bit instruction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Register(u8);

impl Register {
    pub const PC: Self = Self(REG_PROGRAM_COUNTER);
    pub const LR: Self = Self(REG_LR);

    /// Only the low 4 bits of `field` are used.
    #[must_use]
    pub const fn from_field(field: u32) -> Self {
        Self((field & 0xF) as u8)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..=REG_PROGRAM_COUNTER).map(Self)
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            REG_PROGRAM_COUNTER => f.write_str("pc"),
            n => write!(f, "r{n}"),
        }
    }
}

#[derive(Default, Clone, Serialize, Deserialize)]
pub struct Registers([u32; 16]);

impl Registers {
    #[must_use]
    pub const fn program_counter(&self) -> u32 {
        self.0[REG_PROGRAM_COUNTER as usize]
    }

    pub const fn set_program_counter(&mut self, new_value: u32) {
        self.0[REG_PROGRAM_COUNTER as usize] = new_value;
    }

    pub const fn advance_program_counter(&mut self, bytes: u32) {
        let pc = REG_PROGRAM_COUNTER as usize;
        self.0[pc] = self.0[pc].wrapping_add(bytes);
    }

    pub const fn set_register(&mut self, reg: Register, new_value: u32) {
        self.0[reg.index()] = new_value;
    }

    #[must_use]
    pub const fn register(&self, reg: Register) -> u32 {
        self.0[reg.index()]
    }

    /// Name to value mapping, `r0` to `r14` then `pc`.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Register, u32> {
        Register::all().map(|r| (r, self.register(r))).collect()
    }
}
