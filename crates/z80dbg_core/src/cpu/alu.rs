use super::Cpu;

impl Cpu {
    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = (use_carry && self.regs.flags.c) as u8;

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = (a as u16) + (value as u16) + (carry_in as u16);
        let result = full as u8;

        let flags = &mut self.regs.flags;
        flags.set_sz(result);
        flags.h = half > 0x0F;
        flags.pv = ((a ^ result) & (value ^ result) & 0x80) != 0;
        flags.n = false;
        flags.c = full > 0xFF;
        self.regs.a = result;
    }

    /// Compute `A - value - carry` and set flags; returns the result without
    /// storing it so CP can share the path.
    fn sub_flags(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a;
        let carry_in = (use_carry && self.regs.flags.c) as i16;

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        let flags = &mut self.regs.flags;
        flags.set_sz(result);
        flags.h = half < 0;
        flags.pv = ((a ^ value) & (a ^ result) & 0x80) != 0;
        flags.n = true;
        flags.c = full < 0;
        result
    }

    /// Core 8-bit SUB/SBC operation on A.
    ///
    /// `use_carry` selects between SUB (false) and SBC (true).
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        self.regs.a = self.sub_flags(value, use_carry);
    }

    /// Compare A with `value`, setting flags as if `A - value` was performed.
    /// A itself is not modified.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.sub_flags(value, false);
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.set_logic_flags(result, true);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.set_logic_flags(result, false);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.set_logic_flags(result, false);
    }

    fn set_logic_flags(&mut self, result: u8, half: bool) {
        self.regs.a = result;
        let flags = &mut self.regs.flags;
        flags.set_szp(result);
        flags.h = half;
        flags.n = false;
        flags.c = false;
    }

    /// Dispatch one of the eight accumulator operations by its opcode field:
    /// 0=ADD, 1=ADC, 2=SUB, 3=SBC, 4=AND, 5=XOR, 6=OR, 7=CP.
    pub(super) fn alu_op(&mut self, op: u8, value: u8) {
        match op {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    /// 8-bit increment helper used by INC r, INC (HL) and INC (IX+d).
    ///
    /// Updates S, Z, H, P/V, N while leaving C unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        let flags = &mut self.regs.flags;
        flags.set_sz(result);
        flags.h = (value & 0x0F) == 0x0F;
        flags.pv = value == 0x7F;
        flags.n = false;
        result
    }

    /// 8-bit decrement helper used by DEC r, DEC (HL) and DEC (IX+d).
    ///
    /// Updates S, Z, H, P/V, N while leaving C unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        let flags = &mut self.regs.flags;
        flags.set_sz(result);
        flags.h = (value & 0x0F) == 0;
        flags.pv = value == 0x80;
        flags.n = true;
        result
    }

    /// 16-bit add for `ADD HL,rr` / `ADD IX,rr`.
    ///
    /// S, Z and P/V are unaffected; N is cleared; H comes from bit 11.
    #[inline]
    pub(super) fn alu_add16(&mut self, base: u16, value: u16) -> u16 {
        let flags = &mut self.regs.flags;
        flags.h = (base & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
        flags.n = false;
        flags.c = (base as u32) + (value as u32) > 0xFFFF;
        base.wrapping_add(value)
    }

    /// `ADC HL,rr`: full 16-bit flags.
    pub(super) fn alu_adc16(&mut self, value: u16) {
        let hl = self.regs.hl();
        let carry_in = self.regs.flags.c as u32;
        let full = hl as u32 + value as u32 + carry_in;
        let result = full as u16;

        let flags = &mut self.regs.flags;
        flags.s = (result & 0x8000) != 0;
        flags.z = result == 0;
        flags.h = (hl & 0x0FFF) as u32 + (value & 0x0FFF) as u32 + carry_in > 0x0FFF;
        flags.pv = ((hl ^ result) & (value ^ result) & 0x8000) != 0;
        flags.n = false;
        flags.c = full > 0xFFFF;
        self.regs.set_hl(result);
    }

    /// `SBC HL,rr`: full 16-bit flags.
    pub(super) fn alu_sbc16(&mut self, value: u16) {
        let hl = self.regs.hl();
        let carry_in = self.regs.flags.c as i32;
        let full = hl as i32 - value as i32 - carry_in;
        let result = full as u16;

        let flags = &mut self.regs.flags;
        flags.s = (result & 0x8000) != 0;
        flags.z = result == 0;
        flags.h = (hl & 0x0FFF) as i32 - (value & 0x0FFF) as i32 - carry_in < 0;
        flags.pv = ((hl ^ value) & (hl ^ result) & 0x8000) != 0;
        flags.n = true;
        flags.c = full < 0;
        self.regs.set_hl(result);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Uses C, H, N and A to compute a correction value; updates A, S, Z, H,
    /// P/V (parity) and C, and leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let a = self.regs.a;
        let flags = self.regs.flags;
        let mut adjust = 0u8;
        let mut carry = flags.c;

        if flags.h || (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if flags.c || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }

        let result = if flags.n {
            a.wrapping_sub(adjust)
        } else {
            a.wrapping_add(adjust)
        };
        let half = if flags.n {
            flags.h && (a & 0x0F) < 0x06
        } else {
            (a & 0x0F) > 0x09
        };

        self.regs.a = result;
        let flags = &mut self.regs.flags;
        flags.set_szp(result);
        flags.h = half;
        flags.c = carry;
    }

    /// Rotate/shift by the CB-page `y` field and set flags as the CB forms do:
    /// 0=RLC, 1=RRC, 2=RL, 3=RR, 4=SLA, 5=SRA, 6=SLL, 7=SRL.
    pub(super) fn alu_rotate(&mut self, op: u8, value: u8) -> u8 {
        let carry_in = self.regs.flags.c as u8;
        let (result, carry) = match op {
            0 => (value.rotate_left(1), value & 0x80 != 0),
            1 => (value.rotate_right(1), value & 0x01 != 0),
            2 => ((value << 1) | carry_in, value & 0x80 != 0),
            3 => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            4 => (value << 1, value & 0x80 != 0),
            5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            6 => ((value << 1) | 0x01, value & 0x80 != 0),
            _ => (value >> 1, value & 0x01 != 0),
        };
        let flags = &mut self.regs.flags;
        flags.set_szp(result);
        flags.h = false;
        flags.n = false;
        flags.c = carry;
        result
    }

    /// `BIT b,value`: Z and P/V reflect the inverted bit, C is preserved.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        let set = value & (1 << bit) != 0;
        let flags = &mut self.regs.flags;
        flags.z = !set;
        flags.pv = !set;
        flags.s = bit == 7 && set;
        flags.h = true;
        flags.n = false;
    }
}
