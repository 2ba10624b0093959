use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_ld_rp_nn<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        let value = self.fetch16(bus);
        self.write_rp((opcode >> 4) & 0x03, value);
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        match opcode {
            // LD (BC),A
            0x02 => bus.write8(self.regs.bc(), self.regs.a),
            // LD (DE),A
            0x12 => bus.write8(self.regs.de(), self.regs.a),
            // LD A,(BC)
            0x0A => self.regs.a = bus.read8(self.regs.bc()),
            // LD A,(DE)
            0x1A => self.regs.a = bus.read8(self.regs.de()),
            _ => unreachable!("not an indirect accumulator load: {opcode:02X}"),
        }
    }

    pub(super) fn exec_ld_absolute<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = self.fetch16(bus);
        match opcode {
            // LD (nn),HL: L then H
            0x22 => bus.write16(addr, self.regs.hl()),
            // LD HL,(nn)
            0x2A => {
                let value = bus.read16(addr);
                self.regs.set_hl(value);
            }
            // LD (nn),A
            0x32 => bus.write8(addr, self.regs.a),
            // LD A,(nn)
            0x3A => self.regs.a = bus.read8(addr),
            _ => unreachable!("not an absolute load: {opcode:02X}"),
        }
    }

    pub(super) fn exec_ld_r_n<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.fetch8(bus);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
    }

    /// LD r, r' for opcodes 0x40-0x7F (HALT excluded by the caller).
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(opcode != 0x76);
        let value = self.read_reg8(bus, opcode & 0x07);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
    }
}
