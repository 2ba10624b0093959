use super::*;
use z80dbg_core::{disassemble, Emulator, StatePatch, StopReason};

fn bytes(source: &str) -> Vec<u8> {
    match assemble(source) {
        Ok(assembly) => assembly.bytes,
        Err(err) => panic!("{err}"),
    }
}

fn error(source: &str) -> AssembleError {
    match assemble(source) {
        Ok(assembly) => panic!("expected an error, got {:02X?}", assembly.bytes),
        Err(err) => err,
    }
}

#[test]
fn basic_instructions() {
    assert_eq!(bytes("nop"), vec![0x00]);
    assert_eq!(bytes("LD A, 0x42\nHALT"), vec![0x3E, 0x42, 0x76]);
    assert_eq!(bytes("ld b,c"), vec![0x41]);
    assert_eq!(bytes("add a,(hl)"), vec![0x86]);
    assert_eq!(bytes("sub 5"), vec![0xD6, 0x05]);
    assert_eq!(bytes("push af"), vec![0xF5]);
    assert_eq!(bytes("ex af,af'"), vec![0x08]);
    assert_eq!(bytes("ld a,-1"), vec![0x3E, 0xFF]);
}

#[test]
fn immediate_and_memory_operands_are_distinguished() {
    assert_eq!(bytes("ld hl,0x1234"), vec![0x21, 0x34, 0x12]);
    assert_eq!(bytes("ld hl,(0x1234)"), vec![0x2A, 0x34, 0x12]);
    assert_eq!(bytes("ld (0x8000),hl"), vec![0x22, 0x00, 0x80]);
    assert_eq!(bytes("ld (0x8000),de"), vec![0xED, 0x53, 0x00, 0x80]);
    assert_eq!(bytes("ld a,(bc)"), vec![0x0A]);
    assert_eq!(bytes("jp (hl)"), vec![0xE9]);
}

#[test]
fn literal_operands_match_by_value() {
    assert_eq!(bytes("rst 38h"), vec![0xFF]);
    assert_eq!(bytes("rst 8"), vec![0xCF]);
    assert_eq!(bytes("im 1"), vec![0xED, 0x56]);
    assert_eq!(bytes("bit 7,(hl)"), vec![0xCB, 0x7E]);
    assert_eq!(bytes("set 0,a"), vec![0xCB, 0xC7]);
}

#[test]
fn index_register_forms() {
    assert_eq!(bytes("ld (ix+5),0x99"), vec![0xDD, 0x36, 0x05, 0x99]);
    assert_eq!(bytes("ld a,(iy-2)"), vec![0xFD, 0x7E, 0xFE]);
    assert_eq!(bytes("ld a,(ix)"), vec![0xDD, 0x7E, 0x00]);
    assert_eq!(bytes("set 7,(ix+1)"), vec![0xDD, 0xCB, 0x01, 0xFE]);
    assert_eq!(bytes("jp (iy)"), vec![0xFD, 0xE9]);
    assert_eq!(bytes("ex (sp),ix"), vec![0xDD, 0xE3]);
    assert_eq!(bytes("ld ix,(0x4000)"), vec![0xDD, 0x2A, 0x00, 0x40]);
}

#[test]
fn relative_jumps_resolve_forward_and_backward_labels() {
    let source = "
            jr end
            nop
        end:
            halt
    ";
    assert_eq!(bytes(source), vec![0x18, 0x01, 0x00, 0x76]);

    let source = "
            ld b,3
        loop:
            djnz loop
    ";
    assert_eq!(bytes(source), vec![0x06, 0x03, 0x10, 0xFE]);

    assert_eq!(bytes("jr $"), vec![0x18, 0xFE]);
}

#[test]
fn relative_jump_out_of_range_is_reported() {
    let source = "
            org 0x0000
            jr far
            org 0x0100
        far:
            nop
    ";
    let err = error(source);
    assert_eq!(err.kind, ErrorKind::RangeError);
    assert_eq!(err.line, 3);
    assert_eq!(err.address, 0x0000);

    // The last reachable targets on either side.
    assert_eq!(bytes("jr $+129"), vec![0x18, 0x7F]);
    assert_eq!(bytes("jr $-126"), vec![0x18, 0x80]);
    assert_eq!(error("jr $+130").kind, ErrorKind::RangeError);
}

#[test]
fn org_db_and_dw_lay_out_an_image() {
    let source = r#"
            org 0x0100
        table:
            db 1, 2, "AB"
            org 0x0108
        words:
            dw 0x1234, table
    "#;
    let assembly = assemble(source).unwrap();
    assert_eq!(assembly.origin, 0x0100);
    assert_eq!(
        assembly.bytes,
        vec![1, 2, b'A', b'B', 0, 0, 0, 0, 0x34, 0x12, 0x00, 0x01]
    );
    assert_eq!(assembly.labels["table"], 0x0100);
    assert_eq!(assembly.labels["words"], 0x0108);
}

#[test]
fn labels_can_be_used_in_expressions() {
    let source = "
            org 0x8000
        buffer:
            ld hl, buffer+2
            ld a, (buffer - 1)
    ";
    assert_eq!(
        bytes(source),
        vec![0x21, 0x02, 0x80, 0x3A, 0xFF, 0x7F]
    );
}

#[test]
fn errors_carry_kind_and_line() {
    assert_eq!(error("frob a").kind, ErrorKind::UnknownInstruction);
    assert_eq!(error("out (0x10),a").kind, ErrorKind::UnknownInstruction);
    assert_eq!(error("ld (bc),b").kind, ErrorKind::InvalidOperand);
    assert_eq!(error("jp nowhere").kind, ErrorKind::UndefinedLabel);
    assert_eq!(error("ld a,256").kind, ErrorKind::ValueOutOfRange);
    assert_eq!(error("ld a,(ix+128)").kind, ErrorKind::ValueOutOfRange);
    assert_eq!(error("ld a,").kind, ErrorKind::Syntax);
    assert_eq!(error("ld a,1+").kind, ErrorKind::Syntax);

    let err = error("nop\nx: nop\nx: nop");
    assert_eq!(err.kind, ErrorKind::DuplicateLabel);
    assert_eq!(err.line, 3);
    assert_eq!(err.address, 0x0002);

    let err = error("org 0x200\nnop\norg 0x100");
    assert_eq!(err.kind, ErrorKind::OriginBackwards);
    assert_eq!(err.line, 3);
}

#[test]
fn program_must_fit_in_memory() {
    let err = error("org 0xFFFF\nld a,1");
    assert_eq!(err.kind, ErrorKind::ValueOutOfRange);
}

#[test]
fn error_display_names_line_and_address() {
    let err = error("nop\njp missing");
    assert_eq!(
        err.to_string(),
        "line 2 (0x0001): undefined label: `missing` is not defined"
    );
}

#[test]
fn every_disassembled_instruction_reassembles() {
    for info in OPCODES.iter() {
        let payload_len: u8 = info.operands.iter().map(|op| op.size()).sum();
        let encoding = info.encode(&vec![0x12; payload_len as usize]);
        let text = disassemble(|addr| encoding[addr as usize], 0).text;

        let reassembled = match assemble(&text) {
            Ok(assembly) => assembly.bytes,
            Err(err) => panic!("{text}: {err}"),
        };
        let again = disassemble(|addr| reassembled[addr as usize], 0).text;
        assert_eq!(again, text);
    }
}

#[test]
fn assembled_program_runs_on_the_emulator() {
    let source = "
            org 0x0100
        start:
            ld b, 10
            xor a
        loop:
            add a, b
            djnz loop
            ld (result), a
            halt
        result:
            db 0
    ";
    let assembly = assemble(source).unwrap();

    let mut emu = Emulator::new();
    emu.reset();
    emu.load_program(&assembly.bytes, assembly.origin);
    emu.set_state(&StatePatch::builder().pc(assembly.labels["start"]).build());

    let summary = emu.run();
    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(emu.read_byte(assembly.labels["result"]), 55);
}

#[test]
fn subroutines_and_index_registers_run() {
    let source = "
            ld sp, 0xFFF0
            ld ix, data
            call double
            halt
        double:
            ld a, (ix+0)
            add a, a
            ld (ix+1), a
            ret
        data:
            db 21, 0
    ";
    let assembly = assemble(source).unwrap();

    let mut emu = Emulator::new();
    emu.reset();
    emu.load_program(&assembly.bytes, assembly.origin);
    emu.run_for(100);

    assert!(emu.is_halted());
    assert_eq!(emu.read_byte(assembly.labels["data"] + 1), 42);
    assert_eq!(emu.registers().sp, 0xFFF0);
}
