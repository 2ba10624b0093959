use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_push_rp<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.read_rp2((opcode >> 4) & 0x03);
        self.push_u16(bus, value);
    }

    pub(super) fn exec_pop_rp<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.pop_u16(bus);
        self.write_rp2((opcode >> 4) & 0x03, value);
    }

    /// Swap `value` with the word at the top of the stack and return the
    /// old stack word. SP itself does not move.
    pub(super) fn exchange_stack_top<B: Bus>(&mut self, bus: &mut B, value: u16) -> u16 {
        let sp = self.regs.sp;
        let old = bus.read16(sp);
        bus.write16(sp, value);
        old
    }
}
