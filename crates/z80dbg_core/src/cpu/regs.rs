use std::mem;

use super::flags::Flags;

/// The alternate register set (A′ F′ B′ C′ D′ E′ H′ L′).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadowRegisters {
    pub a: u8,
    pub flags: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
}

impl ShadowRegisters {
    #[inline]
    pub fn f(&self) -> u8 {
        self.flags.to_byte()
    }
}

/// Registers for the Z80 CPU.
///
/// Every field is stored at its architectural width, so a value outside the
/// register's domain cannot be represented. Pair accessors compose and split
/// the 8-bit halves as `(high << 8) | low`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub flags: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub alt: ShadowRegisters,
    /// Interrupt vector base.
    pub i: u8,
    /// Memory refresh counter.
    pub r: u8,
    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn f(&self) -> u8 {
        self.flags.to_byte()
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.flags = Flags::from_byte(value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f()])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.set_f(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    /// `EX AF,AF'`: swap A and F with their shadows.
    pub fn exchange_af(&mut self) {
        mem::swap(&mut self.a, &mut self.alt.a);
        mem::swap(&mut self.flags, &mut self.alt.flags);
    }

    /// `EXX`: swap BC, DE and HL with their shadows.
    pub fn exchange_pairs(&mut self) {
        mem::swap(&mut self.b, &mut self.alt.b);
        mem::swap(&mut self.c, &mut self.alt.c);
        mem::swap(&mut self.d, &mut self.alt.d);
        mem::swap(&mut self.e, &mut self.alt.e);
        mem::swap(&mut self.h, &mut self.alt.h);
        mem::swap(&mut self.l, &mut self.alt.l);
    }

    /// Swap the whole primary set (A–L and flags) with the shadow set.
    ///
    /// IX, IY, SP, PC, I and R are not part of the shadow set and stay put.
    pub fn exchange_register_sets(&mut self) {
        self.exchange_af();
        self.exchange_pairs();
    }
}

#[cfg(test)]
mod tests {
    use super::Registers;

    #[test]
    fn pairs_compose_high_then_low() {
        let mut regs = Registers::default();
        regs.set_bc(0x1234);
        regs.set_de(0xABCD);
        regs.set_hl(0xFF01);

        assert_eq!((regs.b, regs.c), (0x12, 0x34));
        assert_eq!((regs.d, regs.e), (0xAB, 0xCD));
        assert_eq!((regs.h, regs.l), (0xFF, 0x01));
        assert_eq!(regs.bc(), 0x1234);
        assert_eq!(regs.de(), 0xABCD);
        assert_eq!(regs.hl(), 0xFF01);
    }

    #[test]
    fn af_drops_unmodelled_flag_bits() {
        let mut regs = Registers::default();
        regs.set_af(0x42FF);
        assert_eq!(regs.a, 0x42);
        assert_eq!(regs.f(), 0xD7);
        assert_eq!(regs.af(), 0x42D7);
    }

    #[test]
    fn exchange_register_sets_is_an_involution() {
        let mut regs = Registers {
            a: 1,
            b: 2,
            c: 3,
            d: 4,
            e: 5,
            h: 6,
            l: 7,
            ix: 0x1111,
            iy: 0x2222,
            sp: 0x3333,
            pc: 0x4444,
            i: 9,
            r: 10,
            ..Registers::default()
        };
        regs.set_f(0xC1);
        regs.alt.a = 0x10;
        regs.alt.h = 0x60;
        let before = regs;

        regs.exchange_register_sets();
        assert_eq!(regs.a, 0x10);
        assert_eq!(regs.h, 0x60);
        assert_eq!(regs.f(), 0x00);
        assert_eq!(regs.alt.a, 1);
        assert_eq!(regs.alt.f(), 0xC1);
        assert_eq!((regs.ix, regs.iy, regs.sp, regs.pc), (0x1111, 0x2222, 0x3333, 0x4444));
        assert_eq!((regs.i, regs.r), (9, 10));

        regs.exchange_register_sets();
        assert_eq!(regs, before);
    }

    #[test]
    fn exchange_af_leaves_pairs_alone() {
        let mut regs = Registers::default();
        regs.a = 0x12;
        regs.set_bc(0x3456);
        regs.alt.a = 0x78;
        regs.exchange_af();
        assert_eq!(regs.a, 0x78);
        assert_eq!(regs.bc(), 0x3456);
        assert_eq!(regs.alt.a, 0x12);
    }
}
