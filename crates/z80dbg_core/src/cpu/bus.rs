/// Abstraction over the address space the CPU executes against.
///
/// The CPU only ever touches memory through this trait, so tests can run
/// it against a bare array and the emulator can run it against its own
/// [`Memory`](crate::Memory). Addresses are already 16-bit, so every
/// implementation covers the whole space and cannot fail.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read; the high byte wraps from 0xFFFF to 0x0000.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write, as two byte writes.
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }
}
