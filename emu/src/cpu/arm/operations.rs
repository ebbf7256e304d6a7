use crate::cpu::arm7tdmi::Arm7tdmi;
use crate::cpu::registers::Register;
use crate::memory::Memory;

impl<M: Memory> Arm7tdmi<M> {
    pub(crate) fn branch(&mut self, target: u32) {
        self.registers.set_program_counter(target);
        self.pipeline.branch_taken();
    }

    /// CMP. Sign, zero and overflow come from the difference of the operands
    /// reinterpreted as signed, without wrapping. Carry comes from an
    /// unsigned comparison of the raw values. The two do not always agree
    /// with a single 32-bit subtraction (e.g. `0x7FFF_FFFF - 0xFFFF_FFFF`
    /// leaves N and V clear).
    pub(crate) fn cmp(&mut self, src_reg: Register, operand2: u32) {
        let rn = self.registers.register(src_reg);
        let diff = i64::from(rn as i32) - i64::from(operand2 as i32);

        self.cpsr.set_sign_flag(diff < 0);
        self.cpsr.set_zero_flag(diff == 0);
        self.cpsr.set_carry_flag(operand2 <= rn);
        self.cpsr.set_overflow_flag(diff < i64::from(i32::MIN));
    }

    /// MOV. Only the zero flag is written.
    pub(crate) fn mov(&mut self, dest_reg: Register, operand2: u32) {
        self.registers.set_register(dest_reg, operand2);
        self.cpsr.set_zero_flag(operand2 == 0);
    }

    /// LDR. Post-indexed loads are not implemented and leave every register untouched.
    pub(crate) fn ldr(
        &mut self,
        dest_reg: Register,
        base_reg: Register,
        pre_indexed: bool,
        signed_offset: i32,
    ) {
        if !pre_indexed {
            self.diagnostics
                .info("post-indexed LDR is not implemented, skipping");
            return;
        }

        let address = self
            .registers
            .register(base_reg)
            .wrapping_add_signed(signed_offset);
        let value = self.memory.read_word(address);
        self.registers.set_register(dest_reg, value);
    }

    /// TEQ. Only the zero flag is written.
    pub(crate) fn teq(&mut self, src_reg: Register, operand2: u32) {
        let rn = self.registers.register(src_reg);
        self.cpsr.set_zero_flag(rn ^ operand2 == 0);
    }

    pub(crate) const fn nop(&self) {}
}
