//! # Program Status Registers (CPSR and SPSR)
//!
//! ```text
//! 31 30 29 28 27       8 7  5 4      0
//! ┌──┬──┬──┬──┬─────────┬────┬────────┐
//! │N │Z │C │V │Reserved │I/M │Reserved│
//! └──┴──┴──┴──┴─────────┴────┴────────┘
//! ```
//!
//! - **Flags (28-31)**: condition bits, written by compare/move/test
//! - **Interrupt/mode field (5-7)**: 3 bits, opaque to the core
//!
//! Every setter only touches the bits it owns.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psr(u32);

impl Psr {
    /// N => Bit 31, (0=Not Signed, 1=Signed)
    #[must_use]
    pub fn sign_flag(self) -> bool {
        self.0.get_bit(31)
    }

    /// Z => Bit 30, (0=Not Zero, 1=Zero)
    #[must_use]
    pub fn zero_flag(self) -> bool {
        self.0.get_bit(30)
    }

    /// C => Bit 29, (0=Borrow/No Carry, 1=Carry/No Borrow)
    #[must_use]
    pub fn carry_flag(self) -> bool {
        self.0.get_bit(29)
    }

    /// V => Bit 28, (0=No Overflow, 1=Overflow)
    #[must_use]
    pub fn overflow_flag(self) -> bool {
        self.0.get_bit(28)
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.0.set_bit(31, value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.0.set_bit(30, value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.0.set_bit(29, value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.0.set_bit(28, value);
    }

    /// NZCV packed as a nibble, N in bit 3.
    #[must_use]
    pub fn flags(self) -> u32 {
        self.0.get_bits(28..=31)
    }

    pub fn set_flags(&mut self, nzcv: u32) {
        self.0.set_bits(28..=31, nzcv);
    }

    /// Bits 5-7.
    #[must_use]
    pub fn interrupt_mode(self) -> u32 {
        self.0.get_bits(5..=7)
    }

    pub fn set_interrupt_mode(&mut self, value: u32) {
        self.0.set_bits(5..=7, value);
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn set_raw(&mut self, value: u32) {
        self.0 = value;
    }
}

impl From<u32> for Psr {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Psr> for u32 {
    fn from(p: Psr) -> Self {
        p.0
    }
}

impl std::fmt::Display for Psr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        write!(
            f,
            "{}{}{}{} 0x{:08X}",
            flag(self.sign_flag(), 'N'),
            flag(self.zero_flag(), 'Z'),
            flag(self.carry_flag(), 'C'),
            flag(self.overflow_flag(), 'V'),
            self.0
        )
    }
}
