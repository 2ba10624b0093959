use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// 16-bit INC rr. No flags are affected.
    pub(super) fn exec_inc16_rp(&mut self, opcode: u8) {
        let index = (opcode >> 4) & 0x03;
        let value = self.read_rp(index).wrapping_add(1);
        self.write_rp(index, value);
    }

    /// 16-bit DEC rr. No flags are affected.
    pub(super) fn exec_dec16_rp(&mut self, opcode: u8) {
        let index = (opcode >> 4) & 0x03;
        let value = self.read_rp(index).wrapping_sub(1);
        self.write_rp(index, value);
    }

    pub(super) fn exec_inc8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let index = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, index);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, index, result);
    }

    pub(super) fn exec_dec8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let index = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, index);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, index, result);
    }
}
