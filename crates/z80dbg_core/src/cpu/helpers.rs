use crate::opcodes::IndexRegister;

use super::{Bus, Cpu};

impl Cpu {
    /// Helper to read an 8-bit register or (HL) by index.
    ///
    /// The encoding matches the standard Z80 register order used by
    /// opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Helper to write an 8-bit register or (HL) by index.
    ///
    /// The encoding matches `read_reg8`.
    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// Register pair by index with SP in slot 3: 0=BC, 1=DE, 2=HL, 3=SP.
    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        match index {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        match index {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// Register pair by index with AF in slot 3, as used by PUSH and POP.
    #[inline]
    pub(super) fn read_rp2(&self, index: u8) -> u16 {
        match index {
            3 => self.regs.af(),
            _ => self.read_rp(index),
        }
    }

    #[inline]
    pub(super) fn write_rp2(&mut self, index: u8, value: u16) {
        match index {
            3 => self.regs.set_af(value),
            _ => self.write_rp(index, value),
        }
    }

    #[inline]
    pub(super) fn index_reg(&self, index: IndexRegister) -> u16 {
        match index {
            IndexRegister::Ix => self.regs.ix,
            IndexRegister::Iy => self.regs.iy,
        }
    }

    #[inline]
    pub(super) fn set_index_reg(&mut self, index: IndexRegister, value: u16) {
        match index {
            IndexRegister::Ix => self.regs.ix = value,
            IndexRegister::Iy => self.regs.iy = value,
        }
    }

    /// Effective address of `(IX+d)` / `(IY+d)`.
    #[inline]
    pub(super) fn indexed_addr(&self, index: IndexRegister, d: i8) -> u16 {
        self.index_reg(index).wrapping_add(d as i16 as u16)
    }

    /// Evaluate condition code `cc` (0=NZ, 1=Z, 2=NC, 3=C, 4=PO, 5=PE, 6=P, 7=M).
    #[inline]
    pub(super) fn condition(&self, cc: u8) -> bool {
        let flags = self.regs.flags;
        match cc {
            0 => !flags.z,
            1 => flags.z,
            2 => !flags.c,
            3 => flags.c,
            4 => !flags.pv,
            5 => flags.pv,
            6 => !flags.s,
            _ => flags.s,
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus) as u16;
        let hi = self.fetch8(bus) as u16;
        (hi << 8) | lo
    }

    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let lo = value as u8;
        let hi = (value >> 8) as u8;
        // Stack grows downward. We want memory[SP] = low, memory[SP+1] = high.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = bus.read16(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }
}
