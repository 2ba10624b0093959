use std::collections::VecDeque;

use crate::cpu::{Cpu, DecodeFault, Registers, StepOutcome};
use crate::debug::Breakpoints;
use crate::disasm::{self, Disassembled};
use crate::memory::Memory;
use crate::state::{CpuState, StatePatch};

#[cfg(test)]
mod tests;

/// How many executed instructions (and decode faults) are remembered.
pub const HISTORY_CAPACITY: usize = 256;

/// One executed instruction, as fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub address: u16,
    pub bytes: Vec<u8>,
}

/// Why a `run` call returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The CPU is halted.
    Halted,
    /// PC reached a breakpoint; the instruction there has not run yet.
    Breakpoint(u16),
    /// The caller's instruction budget ran out.
    StepLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub pc: u16,
    /// Instructions executed by this call.
    pub instructions: u64,
}

/// A complete Z80 machine: CPU, 64K memory and the debugger state.
///
/// Everything is owned by the instance and reached through its methods,
/// so the register and memory invariants cannot be bypassed.
pub struct Emulator {
    cpu: Cpu,
    memory: Memory,
    breakpoints: Breakpoints,
    executed: u64,
    history: VecDeque<HistoryEntry>,
    faults: VecDeque<DecodeFault>,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    /// A machine with every register, flag and memory cell zeroed.
    ///
    /// This does not reset: call [`reset`](Self::reset) to get the
    /// power-on SP and PC.
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            memory: Memory::new(),
            breakpoints: Breakpoints::new(),
            executed: 0,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            faults: VecDeque::new(),
        }
    }

    /// Zero the processor state, then set SP=0xFFFF and PC=0x0000.
    ///
    /// Memory and breakpoints are kept; the execution counter, history and
    /// recorded faults are cleared.
    pub fn reset(&mut self) {
        log::debug!("reset");
        self.cpu.reset();
        self.executed = 0;
        self.history.clear();
        self.faults.clear();
    }

    // Memory access

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.memory.read_byte(addr)
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory.write_byte(addr, value);
    }

    pub fn read_word(&self, addr: u16) -> u16 {
        self.memory.read_word(addr)
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        self.memory.write_word(addr, value);
    }

    pub fn load_program(&mut self, bytes: &[u8], start: u16) {
        log::debug!("loading {} bytes at 0x{start:04X}", bytes.len());
        self.memory.load_program(bytes, start);
    }

    // Registers and state

    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn pc(&self) -> u16 {
        self.cpu.regs.pc
    }

    pub fn is_halted(&self) -> bool {
        self.cpu.halted
    }

    pub fn exchange_register_sets(&mut self) {
        self.cpu.regs.exchange_register_sets();
    }

    /// Deep copy of the processor state.
    pub fn state(&self) -> CpuState {
        CpuState::from(&self.cpu)
    }

    /// Merge the slots present in `patch` into the live state.
    pub fn set_state(&mut self, patch: &StatePatch) {
        patch.apply(&mut self.cpu);
    }

    // Breakpoints

    pub fn set_breakpoint(&mut self, addr: u16) {
        self.breakpoints.set(addr);
    }

    pub fn clear_breakpoint(&mut self, addr: u16) {
        self.breakpoints.clear(addr);
    }

    pub fn toggle_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.toggle(addr)
    }

    pub fn clear_all_breakpoints(&mut self) {
        self.breakpoints.clear_all();
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    // Execution

    /// Execute exactly one instruction, breakpoints notwithstanding.
    ///
    /// Returns `false` without touching anything when the CPU is halted.
    pub fn step(&mut self) -> bool {
        if self.cpu.halted {
            return false;
        }

        let address = self.cpu.regs.pc;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", self.disassemble(address));
        }
        let len = disasm::instruction_len(|addr| self.memory.read_byte(addr), address);
        let bytes: Vec<u8> = (0..len)
            .map(|offset| self.memory.read_byte(address.wrapping_add(offset)))
            .collect();

        match self.cpu.step(&mut self.memory) {
            StepOutcome::Executed => self.record(HistoryEntry { address, bytes }),
            StepOutcome::Faulted(fault) => {
                self.record(HistoryEntry {
                    address,
                    bytes: fault.bytes.clone(),
                });
                if self.faults.len() == HISTORY_CAPACITY {
                    self.faults.pop_front();
                }
                self.faults.push_back(fault);
            }
            StepOutcome::Halted => return false,
        }
        true
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.executed += 1;
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// Step until the CPU halts or PC lands on a breakpoint.
    ///
    /// The breakpoint set is checked before every instruction except the
    /// first, so a run started on a breakpoint moves past it. This loop has
    /// no bound of its own; hosts that need to keep control use
    /// [`run_for`](Self::run_for).
    pub fn run(&mut self) -> RunSummary {
        self.run_until(None)
    }

    /// Like [`run`](Self::run), but also stops after `max_steps`
    /// instructions.
    pub fn run_for(&mut self, max_steps: u64) -> RunSummary {
        self.run_until(Some(max_steps))
    }

    fn run_until(&mut self, limit: Option<u64>) -> RunSummary {
        let mut instructions = 0u64;
        let reason = loop {
            if self.cpu.halted {
                break StopReason::Halted;
            }
            let pc = self.cpu.regs.pc;
            if instructions > 0 && self.breakpoints.contains(pc) {
                break StopReason::Breakpoint(pc);
            }
            if limit.is_some_and(|max| instructions >= max) {
                break StopReason::StepLimit;
            }
            self.step();
            instructions += 1;
        };

        let summary = RunSummary {
            reason,
            pc: self.cpu.regs.pc,
            instructions,
        };
        log::debug!(
            "run stopped: {:?} at 0x{:04X} after {} instructions",
            summary.reason,
            summary.pc,
            summary.instructions
        );
        summary
    }

    // Diagnostics

    /// Instructions executed since the last reset (decode faults included).
    pub fn instructions_executed(&self) -> u64 {
        self.executed
    }

    /// Recently executed instructions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Recently recorded decode faults, oldest first.
    pub fn faults(&self) -> impl Iterator<Item = &DecodeFault> {
        self.faults.iter()
    }

    pub fn last_fault(&self) -> Option<&DecodeFault> {
        self.faults.back()
    }

    pub fn disassemble(&self, addr: u16) -> Disassembled {
        disasm::disassemble(|a| self.memory.read_byte(a), addr)
    }
}
