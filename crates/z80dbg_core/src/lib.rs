//! Z80 emulation engine.
//!
//! [`Emulator`] owns a CPU, 64K of memory and a breakpoint set, and
//! exposes the narrow surface editors and debuggers need: byte/word
//! access, program loading, state snapshots and partial restores, single
//! step and run-to-breakpoint.
//!
//! ```
//! use z80dbg_core::{Emulator, StopReason};
//!
//! let mut emu = Emulator::new();
//! emu.load_program(&[0x3E, 0x42, 0x76], 0x0000); // LD A,0x42 / HALT
//! emu.reset();
//! let summary = emu.run();
//! assert_eq!(summary.reason, StopReason::Halted);
//! assert_eq!(emu.registers().a, 0x42);
//! ```

pub mod cpu;
pub mod debug;
pub mod disasm;
pub mod emulator;
pub mod memory;
pub mod opcodes;
pub mod state;

pub use cpu::{Bus, Cpu, DecodeFault, FlagBits, Flags, Registers, ShadowRegisters, StepOutcome};
pub use debug::Breakpoints;
pub use disasm::{disassemble, Disassembled};
pub use emulator::{Emulator, HistoryEntry, RunSummary, StopReason, HISTORY_CAPACITY};
pub use memory::{Memory, MEMORY_SIZE};
pub use opcodes::{IndexRegister, OpcodeInfo, Operand, Page, OPCODES};
pub use state::{CpuState, StatePatch};
