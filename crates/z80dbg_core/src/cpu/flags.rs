use bitflags::bitflags;

bitflags! {
    /// Bit positions of the flags inside the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: S (sign)
    /// - bit 6: Z (zero)
    /// - bit 4: H (half carry)
    /// - bit 2: P/V (parity / overflow)
    /// - bit 1: N (add / subtract)
    /// - bit 0: C (carry)
    /// - bits 3 and 5 are not modelled and always read as zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FlagBits: u8 {
        const S = 0x80;
        const Z = 0x40;
        const H = 0x10;
        const PV = 0x04;
        const N = 0x02;
        const C = 0x01;
    }
}

/// The six condition flags as individual booleans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub s: bool,  // sign
    pub z: bool,  // zero
    pub h: bool,  // half carry
    pub pv: bool, // parity / overflow
    pub n: bool,  // add / subtract
    pub c: bool,  // carry
}

impl Flags {
    /// Pack the flags into an F register value.
    pub fn to_byte(self) -> u8 {
        let mut bits = FlagBits::empty();
        bits.set(FlagBits::S, self.s);
        bits.set(FlagBits::Z, self.z);
        bits.set(FlagBits::H, self.h);
        bits.set(FlagBits::PV, self.pv);
        bits.set(FlagBits::N, self.n);
        bits.set(FlagBits::C, self.c);
        bits.bits()
    }

    /// Unpack an F register value. Bits 3 and 5 are dropped.
    pub fn from_byte(value: u8) -> Self {
        let bits = FlagBits::from_bits_truncate(value);
        Self {
            s: bits.contains(FlagBits::S),
            z: bits.contains(FlagBits::Z),
            h: bits.contains(FlagBits::H),
            pv: bits.contains(FlagBits::PV),
            n: bits.contains(FlagBits::N),
            c: bits.contains(FlagBits::C),
        }
    }

    /// Set S and Z from an 8-bit result.
    #[inline]
    pub(crate) fn set_sz(&mut self, value: u8) {
        self.s = (value & 0x80) != 0;
        self.z = value == 0;
    }

    /// Set S, Z and P/V (as even parity) from an 8-bit result.
    #[inline]
    pub(crate) fn set_szp(&mut self, value: u8) {
        self.set_sz(value);
        self.pv = value.count_ones() % 2 == 0;
    }
}

impl From<u8> for Flags {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> Self {
        flags.to_byte()
    }
}
