use crate::cpu::{Bus, Cpu};
use crate::opcodes::{split, IndexRegister};

impl Cpu {
    /// Execute a `DD`/`FD`-prefixed opcode: the HL forms with IX or IY in
    /// place of HL and `(IX+d)` / `(IY+d)` in place of `(HL)`.
    pub(in crate::cpu) fn exec_index<B: Bus>(
        &mut self,
        bus: &mut B,
        index: IndexRegister,
        opcode: u8,
    ) {
        let (x, y, z) = split(opcode);
        match opcode {
            // ADD IX,rr (rr = BC, DE, IX, SP)
            0x09 | 0x19 | 0x29 | 0x39 => {
                let p = y >> 1;
                let value = if p == 2 {
                    self.index_reg(index)
                } else {
                    self.read_rp(p)
                };
                let result = self.alu_add16(self.index_reg(index), value);
                self.set_index_reg(index, result);
            }
            // LD IX,nn
            0x21 => {
                let value = self.fetch16(bus);
                self.set_index_reg(index, value);
            }
            // LD (nn),IX
            0x22 => {
                let addr = self.fetch16(bus);
                bus.write16(addr, self.index_reg(index));
            }
            // LD IX,(nn)
            0x2A => {
                let addr = self.fetch16(bus);
                let value = bus.read16(addr);
                self.set_index_reg(index, value);
            }
            // INC IX / DEC IX
            0x23 => self.set_index_reg(index, self.index_reg(index).wrapping_add(1)),
            0x2B => self.set_index_reg(index, self.index_reg(index).wrapping_sub(1)),
            // INC (IX+d) / DEC (IX+d)
            0x34 | 0x35 => {
                let addr = self.fetch_indexed_addr(bus, index);
                let value = bus.read8(addr);
                let result = if opcode == 0x34 {
                    self.alu_inc8(value)
                } else {
                    self.alu_dec8(value)
                };
                bus.write8(addr, result);
            }
            // LD (IX+d),n: displacement comes before the immediate.
            0x36 => {
                let addr = self.fetch_indexed_addr(bus, index);
                let value = self.fetch8(bus);
                bus.write8(addr, value);
            }
            // POP IX / PUSH IX
            0xE1 => {
                let value = self.pop_u16(bus);
                self.set_index_reg(index, value);
            }
            0xE5 => self.push_u16(bus, self.index_reg(index)),
            // EX (SP),IX
            0xE3 => {
                let value = self.exchange_stack_top(bus, self.index_reg(index));
                self.set_index_reg(index, value);
            }
            // JP (IX)
            0xE9 => self.regs.pc = self.index_reg(index),
            // LD SP,IX
            0xF9 => self.regs.sp = self.index_reg(index),
            // LD r,(IX+d)
            _ if x == 1 && z == 6 => {
                let addr = self.fetch_indexed_addr(bus, index);
                let value = bus.read8(addr);
                self.write_reg8(bus, y, value);
            }
            // LD (IX+d),r
            _ if x == 1 && y == 6 => {
                let addr = self.fetch_indexed_addr(bus, index);
                let value = self.read_reg8(bus, z);
                bus.write8(addr, value);
            }
            // ALU A,(IX+d)
            _ if x == 2 && z == 6 => {
                let addr = self.fetch_indexed_addr(bus, index);
                let value = bus.read8(addr);
                self.alu_op(y, value);
            }
            _ => log::error!(
                "{} opcode 0x{opcode:02X} has no handler",
                index.name()
            ),
        }
    }

    fn fetch_indexed_addr<B: Bus>(&mut self, bus: &mut B, index: IndexRegister) -> u16 {
        let d = self.fetch8(bus) as i8;
        self.indexed_addr(index, d)
    }
}
