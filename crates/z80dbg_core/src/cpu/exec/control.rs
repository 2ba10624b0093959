use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// Relative jump: the displacement is signed and counts from the
    /// address after the operand byte. The operand is always consumed.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let offset = self.fetch8(bus) as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
        }
    }

    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let addr = self.fetch16(bus);
        if taken {
            self.regs.pc = addr;
        }
    }

    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let addr = self.fetch16(bus);
        if taken {
            self.push_u16(bus, self.regs.pc);
            self.regs.pc = addr;
        }
    }

    pub(super) fn exec_jr_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));
        // JR only has the first four conditions.
        let cc = (opcode >> 3) & 0x03;
        self.jr(bus, self.condition(cc));
    }

    pub(super) fn exec_jp_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let cc = (opcode >> 3) & 0x07;
        self.jp_cond(bus, self.condition(cc));
    }

    pub(super) fn exec_call_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let cc = (opcode >> 3) & 0x07;
        self.call_cond(bus, self.condition(cc));
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
    }

    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let cc = (opcode >> 3) & 0x07;
        if self.condition(cc) {
            self.exec_ret(bus);
        }
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let vector = (opcode & 0x38) as u16;
        self.push_u16(bus, self.regs.pc);
        self.regs.pc = vector;
    }

    /// DJNZ e: decrement B and jump while it is non-zero. Flags untouched.
    pub(super) fn exec_djnz<B: Bus>(&mut self, bus: &mut B) {
        self.regs.b = self.regs.b.wrapping_sub(1);
        let taken = self.regs.b != 0;
        self.jr(bus, taken);
    }
}
