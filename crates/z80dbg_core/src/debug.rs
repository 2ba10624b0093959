use std::collections::BTreeSet;

/// The set of addresses where continuous execution stops.
///
/// Addresses are 16-bit, so every address is already in range; all
/// operations are idempotent set operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Breakpoints {
    addresses: BTreeSet<u16>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, addr: u16) {
        if self.addresses.insert(addr) {
            log::debug!("breakpoint set at 0x{addr:04X}");
        }
    }

    pub fn clear(&mut self, addr: u16) {
        if self.addresses.remove(&addr) {
            log::debug!("breakpoint cleared at 0x{addr:04X}");
        }
    }

    /// Flip membership of `addr`; returns whether it is now set.
    pub fn toggle(&mut self, addr: u16) -> bool {
        if self.contains(addr) {
            self.clear(addr);
            false
        } else {
            self.set(addr);
            true
        }
    }

    pub fn clear_all(&mut self) {
        self.addresses.clear();
    }

    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        self.addresses.contains(&addr)
    }

    /// Addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.addresses.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
