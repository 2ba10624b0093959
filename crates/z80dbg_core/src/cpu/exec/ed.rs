use crate::cpu::{Bus, Cpu};
use crate::opcodes::split;

impl Cpu {
    /// Execute an `ED`-prefixed opcode that the canonical table lists.
    pub(in crate::cpu) fn exec_ed<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let (_, y, _) = split(opcode);
        let p = y >> 1;
        match opcode {
            // SBC HL,rr
            0x42 | 0x52 | 0x62 | 0x72 => {
                let value = self.read_rp(p);
                self.alu_sbc16(value);
            }
            // ADC HL,rr
            0x4A | 0x5A | 0x6A | 0x7A => {
                let value = self.read_rp(p);
                self.alu_adc16(value);
            }
            // LD (nn),rr
            0x43 | 0x53 | 0x63 | 0x73 => {
                let addr = self.fetch16(bus);
                bus.write16(addr, self.read_rp(p));
            }
            // LD rr,(nn)
            0x4B | 0x5B | 0x6B | 0x7B => {
                let addr = self.fetch16(bus);
                let value = bus.read16(addr);
                self.write_rp(p, value);
            }
            // NEG
            0x44 => {
                let a = self.regs.a;
                self.regs.a = 0;
                self.alu_sub(a, false);
            }
            // RETN / RETI: there is only one interrupt flip-flop to restore.
            0x45 | 0x4D => self.exec_ret(bus),
            // IM 0 / IM 1 / IM 2
            0x46 => self.interrupt_mode = 0,
            0x56 => self.interrupt_mode = 1,
            0x5E => self.interrupt_mode = 2,
            // LD I,A / LD R,A
            0x47 => self.regs.i = self.regs.a,
            0x4F => self.regs.r = self.regs.a,
            // LD A,I / LD A,R
            0x57 | 0x5F => {
                let value = if opcode == 0x57 {
                    self.regs.i
                } else {
                    self.regs.r
                };
                self.regs.a = value;
                let enabled = self.interrupts_enabled;
                let flags = &mut self.regs.flags;
                flags.set_sz(value);
                flags.h = false;
                flags.pv = enabled;
                flags.n = false;
            }
            // RRD / RLD
            0x67 => self.exec_rrd(bus),
            0x6F => self.exec_rld(bus),
            // LDI / LDD / LDIR / LDDR
            0xA0 => self.block_load(bus, true, false),
            0xA8 => self.block_load(bus, false, false),
            0xB0 => self.block_load(bus, true, true),
            0xB8 => self.block_load(bus, false, true),
            // CPI / CPD / CPIR / CPDR
            0xA1 => self.block_compare(bus, true, false),
            0xA9 => self.block_compare(bus, false, false),
            0xB1 => self.block_compare(bus, true, true),
            0xB9 => self.block_compare(bus, false, true),
            _ => log::error!("ED opcode 0x{opcode:02X} has no handler"),
        }
    }

    fn exec_rrd<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.regs.hl();
        let mem = bus.read8(addr);
        let a = self.regs.a;
        bus.write8(addr, (a << 4) | (mem >> 4));
        self.regs.a = (a & 0xF0) | (mem & 0x0F);
        self.set_digit_rotate_flags();
    }

    fn exec_rld<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.regs.hl();
        let mem = bus.read8(addr);
        let a = self.regs.a;
        bus.write8(addr, (mem << 4) | (a & 0x0F));
        self.regs.a = (a & 0xF0) | (mem >> 4);
        self.set_digit_rotate_flags();
    }

    fn set_digit_rotate_flags(&mut self) {
        let a = self.regs.a;
        let flags = &mut self.regs.flags;
        flags.set_szp(a);
        flags.h = false;
        flags.n = false;
    }

    /// One iteration of LDI/LDD. The repeating forms rewind PC onto the
    /// instruction while BC is non-zero, so each `step` moves one byte.
    fn block_load<B: Bus>(&mut self, bus: &mut B, increment: bool, repeat: bool) {
        let value = bus.read8(self.regs.hl());
        bus.write8(self.regs.de(), value);

        let delta = if increment { 1u16 } else { 0xFFFF };
        self.regs.set_hl(self.regs.hl().wrapping_add(delta));
        self.regs.set_de(self.regs.de().wrapping_add(delta));
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);

        let flags = &mut self.regs.flags;
        flags.h = false;
        flags.n = false;
        flags.pv = bc != 0;

        if repeat && bc != 0 {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
        }
    }

    /// One iteration of CPI/CPD. The repeating forms also stop on a match.
    fn block_compare<B: Bus>(&mut self, bus: &mut B, increment: bool, repeat: bool) {
        let value = bus.read8(self.regs.hl());
        let a = self.regs.a;
        let result = a.wrapping_sub(value);

        let delta = if increment { 1u16 } else { 0xFFFF };
        self.regs.set_hl(self.regs.hl().wrapping_add(delta));
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);

        let flags = &mut self.regs.flags;
        flags.set_sz(result);
        flags.h = (a & 0x0F) < (value & 0x0F);
        flags.pv = bc != 0;
        flags.n = true;

        if repeat && bc != 0 && result != 0 {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
        }
    }
}
