mod alu;
mod bus;
mod exec;
mod flags;
mod helpers;
mod regs;


pub use bus::Bus;
pub use flags::{FlagBits, Flags};
pub use regs::{Registers, ShadowRegisters};

use crate::opcodes::{IndexRegister, Page, OPCODES};

/// An opcode the decoder does not recognise.
///
/// `bytes` holds what was fetched before the decoder gave up (the prefix
/// and sub-opcode for prefixed pages). The CPU resumes one byte past
/// `address`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeFault {
    pub address: u16,
    pub bytes: Vec<u8>,
}

impl std::fmt::Display for DecodeFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown opcode")?;
        for byte in &self.bytes {
            write!(f, " {byte:02X}")?;
        }
        write!(f, " at 0x{:04X}", self.address)
    }
}

/// What a single call to [`Cpu::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction was decoded and executed.
    Executed,
    /// The opcode was not recognised; PC moved past its first byte only.
    Faulted(DecodeFault),
    /// The CPU was already halted and nothing happened.
    Halted,
}

/// Z80 CPU core.
///
/// The core holds only processor state; memory is reached through a
/// [`Bus`]. It has no notion of time: every call to `step` runs exactly one
/// instruction to completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cpu {
    pub regs: Registers,
    /// Set by HALT; only `reset` or a state restore clears it.
    pub halted: bool,
    /// IFF1. Informational: there is no interrupt delivery.
    pub interrupts_enabled: bool,
    /// Last mode selected by `IM n`. Informational.
    pub interrupt_mode: u8,
}

impl Cpu {
    /// A CPU with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every register and flag, then apply the power-on values
    /// (SP=0xFFFF, PC=0x0000).
    pub fn reset(&mut self) {
        *self = Self::default();
        self.regs.sp = 0xFFFF;
        self.regs.pc = 0x0000;
    }

    /// Fetch, decode and execute a single instruction.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> StepOutcome {
        if self.halted {
            return StepOutcome::Halted;
        }

        let start = self.regs.pc;
        let opcode = self.fetch8(bus);
        match opcode {
            0xCB => {
                let op = self.fetch8(bus);
                self.exec_cb(bus, op);
            }
            0xED => {
                let op = self.fetch8(bus);
                if OPCODES.get(Page::Ed, op).is_none() {
                    return self.decode_fault(start, vec![opcode, op]);
                }
                self.exec_ed(bus, op);
            }
            0xDD | 0xFD => {
                let index = if opcode == 0xDD {
                    IndexRegister::Ix
                } else {
                    IndexRegister::Iy
                };
                let op = self.fetch8(bus);
                if op == 0xCB {
                    let d = self.fetch8(bus) as i8;
                    let op3 = self.fetch8(bus);
                    let page = match index {
                        IndexRegister::Ix => Page::DdCb,
                        IndexRegister::Iy => Page::FdCb,
                    };
                    if OPCODES.get(page, op3).is_none() {
                        return self.decode_fault(start, vec![opcode, op, d as u8, op3]);
                    }
                    self.exec_index_cb(bus, index, d, op3);
                } else {
                    let page = match index {
                        IndexRegister::Ix => Page::Dd,
                        IndexRegister::Iy => Page::Fd,
                    };
                    if OPCODES.get(page, op).is_none() {
                        return self.decode_fault(start, vec![opcode, op]);
                    }
                    self.exec_index(bus, index, op);
                }
            }
            _ => {
                if OPCODES.get(Page::Base, opcode).is_none() {
                    return self.decode_fault(start, vec![opcode]);
                }
                self.exec_opcode(bus, opcode);
            }
        }
        StepOutcome::Executed
    }

    /// Rewind PC to one byte past the faulting opcode and report it.
    fn decode_fault(&mut self, address: u16, bytes: Vec<u8>) -> StepOutcome {
        self.regs.pc = address.wrapping_add(1);
        let fault = DecodeFault { address, bytes };
        log::warn!("{fault}");
        StepOutcome::Faulted(fault)
    }
}
