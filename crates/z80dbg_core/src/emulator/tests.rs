use super::*;

fn loaded(program: &[u8]) -> Emulator {
    let mut emu = Emulator::new();
    emu.load_program(program, 0x0000);
    emu.reset();
    emu
}

#[test]
fn constructor_does_not_reset() {
    let emu = Emulator::new();
    assert_eq!(emu.registers().sp, 0x0000);
    assert_eq!(emu.pc(), 0x0000);
    assert!(!emu.is_halted());
}

#[test]
fn reset_zeroes_state_and_keeps_memory_and_breakpoints() {
    let mut emu = loaded(&[0x3E, 0x42, 0x76]);
    emu.set_breakpoint(0x0100);
    emu.run();
    assert!(emu.is_halted());

    emu.reset();

    let state = emu.state();
    assert_eq!(state.registers.pc, 0x0000);
    assert_eq!(state.registers.sp, 0xFFFF);
    assert!(!state.halted);
    assert_eq!(
        Registers {
            sp: 0,
            ..state.registers
        },
        Registers::default()
    );
    assert_eq!(emu.read_byte(0x0001), 0x42);
    assert!(emu.breakpoints().contains(0x0100));
    assert_eq!(emu.instructions_executed(), 0);
    assert_eq!(emu.history().count(), 0);
}

#[test]
fn nop_advances_pc_only() {
    let mut emu = loaded(&[0x00]);
    let before = *emu.registers();

    assert!(emu.step());

    assert_eq!(emu.pc(), 0x0001);
    assert_eq!(Registers { pc: 0, ..*emu.registers() }, before);
}

#[test]
fn ld_a_immediate() {
    let mut emu = loaded(&[0x3E, 0x42]);
    assert!(emu.step());
    assert_eq!(emu.registers().a, 0x42);
    assert_eq!(emu.pc(), 0x0002);
}

#[test]
fn halt_then_step_is_a_no_op() {
    let mut emu = loaded(&[0x76]);
    assert!(emu.step());
    assert!(emu.is_halted());

    let before = emu.state();
    assert!(!emu.step());
    assert_eq!(emu.state(), before);
    assert_eq!(emu.instructions_executed(), 1);
}

#[test]
fn run_stops_at_breakpoint_before_executing_it() {
    let mut emu = loaded(&[0x00, 0x00, 0x00, 0x00, 0x76]);
    emu.set_breakpoint(0x0004);

    let summary = emu.run();

    assert_eq!(summary.reason, StopReason::Breakpoint(0x0004));
    assert_eq!(summary.pc, 0x0004);
    assert_eq!(summary.instructions, 4);
    assert!(!emu.is_halted());
    assert_eq!(emu.instructions_executed(), 4);
    let addresses: Vec<u16> = emu.history().map(|entry| entry.address).collect();
    assert_eq!(addresses, vec![0, 1, 2, 3]);
}

#[test]
fn run_resumes_past_the_breakpoint_it_stopped_on() {
    let mut emu = loaded(&[0x00, 0x00, 0x00, 0x00, 0x76]);
    emu.set_breakpoint(0x0004);
    emu.run();

    let summary = emu.run();

    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.instructions, 1);
    assert_eq!(emu.pc(), 0x0005);
    assert!(emu.is_halted());
}

#[test]
fn run_on_halted_cpu_returns_immediately() {
    let mut emu = loaded(&[0x76]);
    emu.step();
    let summary = emu.run();
    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.instructions, 0);
}

#[test]
fn step_ignores_breakpoints() {
    let mut emu = loaded(&[0x00, 0x00]);
    emu.set_breakpoint(0x0000);
    emu.set_breakpoint(0x0001);
    assert!(emu.step());
    assert!(emu.step());
    assert_eq!(emu.pc(), 0x0002);
}

#[test]
fn run_for_stops_at_the_step_limit() {
    // JR -2: spin forever.
    let mut emu = loaded(&[0x18, 0xFE]);
    let summary = emu.run_for(100);
    assert_eq!(summary.reason, StopReason::StepLimit);
    assert_eq!(summary.instructions, 100);
    assert_eq!(summary.pc, 0x0000);
    assert_eq!(emu.history().count(), HISTORY_CAPACITY.min(100));
}

#[test]
fn history_keeps_the_most_recent_entries() {
    let program = vec![0x00; 300];
    let mut emu = loaded(&program);
    emu.run_for(300);

    let history: Vec<&HistoryEntry> = emu.history().collect();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history[0].address, (300 - HISTORY_CAPACITY) as u16);
    assert_eq!(history[HISTORY_CAPACITY - 1].bytes, vec![0x00]);
    assert_eq!(emu.instructions_executed(), 300);
}

#[test]
fn decode_faults_are_recorded_and_execution_continues() {
    // OUT (n),A is not modelled: the fault skips one byte and the operand
    // byte then runs as a NOP.
    let mut emu = loaded(&[0xD3, 0x00, 0x76]);

    let summary = emu.run_for(10);

    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(emu.instructions_executed(), 3);
    let fault = emu.last_fault().cloned();
    assert_eq!(
        fault,
        Some(DecodeFault {
            address: 0x0000,
            bytes: vec![0xD3],
        })
    );
    assert_eq!(emu.faults().count(), 1);
}

#[test]
fn history_records_full_instruction_bytes() {
    let mut emu = loaded(&[0xDD, 0x36, 0x05, 0x99]);
    emu.step();
    let entry = emu.history().last().cloned();
    assert_eq!(
        entry,
        Some(HistoryEntry {
            address: 0x0000,
            bytes: vec![0xDD, 0x36, 0x05, 0x99],
        })
    );
}

#[test]
fn state_round_trip_leaves_everything_unchanged() {
    let mut emu = loaded(&[0x3E, 0x42, 0x08, 0xD9, 0xFB, 0xED, 0x56]);
    emu.run_for(5);
    let snapshot = emu.state();

    emu.set_state(&StatePatch::from(snapshot));

    assert_eq!(emu.state(), snapshot);
}

#[test]
fn state_is_a_detached_copy() {
    let mut emu = loaded(&[0x3E, 0x42]);
    let mut snapshot = emu.state();
    snapshot.registers.a = 0x99;
    emu.step();
    assert_eq!(emu.registers().a, 0x42);
    assert_eq!(emu.state().registers.pc, 0x0002);
}

#[test]
fn set_state_merges_only_present_fields() {
    let mut emu = loaded(&[]);
    emu.set_state(&StatePatch::builder().b(0x12).c(0x34).flag_z(true).build());

    let regs = emu.registers();
    assert_eq!(regs.bc(), 0x1234);
    assert!(regs.flags.z);
    assert_eq!(regs.sp, 0xFFFF);
    assert_eq!(regs.pc, 0x0000);
}

#[test]
fn set_state_can_clear_halt() {
    let mut emu = loaded(&[0x76, 0x3C]);
    emu.step();
    assert!(emu.is_halted());

    emu.set_state(&StatePatch::builder().halted(false).build());

    assert!(emu.step());
    assert_eq!(emu.registers().a, 0x01);
}

#[test]
fn exchange_register_sets_is_an_involution() {
    let mut emu = loaded(&[]);
    emu.set_state(&StatePatch::builder().a(1).h(2).alt_l(3).alt_flag_c(true).build());
    let before = emu.state();

    emu.exchange_register_sets();
    assert_eq!(emu.registers().a, 0);
    assert_eq!(emu.registers().l, 3);
    assert!(emu.registers().flags.c);

    emu.exchange_register_sets();
    assert_eq!(emu.state(), before);
}

#[test]
fn words_wrap_at_the_top_of_memory() {
    let mut emu = Emulator::new();
    emu.write_word(0xFFFF, 0xBEEF);
    assert_eq!(emu.read_byte(0xFFFF), 0xEF);
    assert_eq!(emu.read_byte(0x0000), 0xBE);
    assert_eq!(emu.read_word(0xFFFF), 0xBEEF);
}

#[test]
fn program_execution_wraps_past_0xffff() {
    let mut emu = Emulator::new();
    emu.load_program(&[0x3E, 0x07], 0xFFFF);
    emu.reset();
    emu.set_state(&StatePatch::builder().pc(0xFFFF).build());

    assert!(emu.step());
    assert_eq!(emu.registers().a, 0x07);
    assert_eq!(emu.pc(), 0x0001);
}

#[test]
fn toggle_and_clear_breakpoints() {
    let mut emu = Emulator::new();
    assert!(emu.toggle_breakpoint(0x10));
    emu.set_breakpoint(0x20);
    emu.clear_breakpoint(0x10);
    assert_eq!(emu.breakpoints().iter().collect::<Vec<_>>(), vec![0x20]);
    emu.clear_all_breakpoints();
    assert!(emu.breakpoints().is_empty());
}

#[test]
fn disassemble_reads_live_memory() {
    let mut emu = loaded(&[0x21, 0x34, 0x12]);
    let line = emu.disassemble(0x0000);
    assert_eq!(line.text, "LD HL,0x1234");
    emu.write_byte(0x0000, 0x00);
    assert_eq!(emu.disassemble(0x0000).text, "NOP");
}
