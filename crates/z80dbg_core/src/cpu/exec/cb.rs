use crate::cpu::{Bus, Cpu};
use crate::opcodes::{split, IndexRegister};

impl Cpu {
    /// Execute a `CB`-prefixed opcode on a register or (HL).
    pub(in crate::cpu) fn exec_cb<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let (_, _, z) = split(opcode);
        let value = self.read_reg8(bus, z);
        if let Some(result) = self.cb_operate(opcode, value) {
            self.write_reg8(bus, z, result);
        }
    }

    /// Execute `DD CB d op` / `FD CB d op` on `(IX+d)` / `(IY+d)`.
    pub(in crate::cpu) fn exec_index_cb<B: Bus>(
        &mut self,
        bus: &mut B,
        index: IndexRegister,
        d: i8,
        opcode: u8,
    ) {
        let addr = self.indexed_addr(index, d);
        let value = bus.read8(addr);
        if let Some(result) = self.cb_operate(opcode, value) {
            bus.write8(addr, result);
        }
    }

    /// Shared CB semantics. Returns the value to write back, or `None` for
    /// BIT, which only tests.
    fn cb_operate(&mut self, opcode: u8, value: u8) -> Option<u8> {
        let (x, y, _) = split(opcode);
        match x {
            0 => Some(self.alu_rotate(y, value)),
            1 => {
                self.alu_bit(y, value);
                None
            }
            2 => Some(value & !(1 << y)),
            _ => Some(value | (1 << y)),
        }
    }
}
