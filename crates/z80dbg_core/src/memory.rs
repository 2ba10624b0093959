use crate::cpu::Bus;

/// Number of byte cells in the Z80 address space.
pub const MEMORY_SIZE: usize = 0x10000;

/// Flat 64K byte-addressable memory.
///
/// Addresses are `u16`, so every access lands inside the array; multi-byte
/// accesses and program loads wrap from 0xFFFF back to 0x0000 the way a
/// 16-bit address bus does.
#[derive(Clone)]
pub struct Memory {
    cells: Box<[u8; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Zero every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    #[inline]
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.cells[addr as usize]
    }

    #[inline]
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.cells[addr as usize] = value;
    }

    /// Little-endian read: low byte at `addr`, high byte at `addr + 1`.
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read_byte(addr);
        let hi = self.read_byte(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr.wrapping_add(1), hi);
    }

    /// Copy `bytes` into memory starting at `start`, wrapping past 0xFFFF.
    pub fn load_program(&mut self, bytes: &[u8], start: u16) {
        let mut addr = start;
        for &byte in bytes {
            self.write_byte(addr, byte);
            addr = addr.wrapping_add(1);
        }
    }
}

impl Bus for Memory {
    fn read8(&mut self, addr: u16) -> u8 {
        self.read_byte(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.write_byte(addr, value);
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &MEMORY_SIZE)
            .finish_non_exhaustive()
    }
}
