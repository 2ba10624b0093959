mod alu;
mod cb;
mod control;
mod ed;
mod incdec;
mod index;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu};

impl Cpu {
    /// Decode and execute a single unprefixed opcode.
    ///
    /// The caller has already checked the opcode against the canonical
    /// table, so every arm here has a matching table entry.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        match opcode {
            // 0x00: NOP
            0x00 => {}

            // EX AF,AF'
            0x08 => self.exec_ex_af(),

            // DJNZ e
            0x10 => self.exec_djnz(bus),

            // JR e
            0x18 => self.jr(bus, true),

            // JR cc, e
            0x20 | 0x28 | 0x30 | 0x38 => self.exec_jr_cc(bus, opcode),

            // 16-bit immediate loads.
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rp_nn(bus, opcode),

            // ADD HL, rr (16-bit)
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rp(opcode),

            // LD (BC)/(DE),A and LD A,(BC)/(DE)
            0x02 | 0x12 | 0x0A | 0x1A => self.exec_ld_indirect_a(bus, opcode),

            // LD (nn),HL / LD HL,(nn) / LD (nn),A / LD A,(nn)
            0x22 | 0x2A | 0x32 | 0x3A => self.exec_ld_absolute(bus, opcode),

            // 16-bit INC rr / DEC rr
            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc16_rp(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec16_rp(opcode),

            // INC r
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                self.exec_inc8_reg(bus, opcode)
            }

            // DEC r
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                self.exec_dec8_reg(bus, opcode)
            }

            // LD r, n (and LD (HL), n)
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_n(bus, opcode)
            }

            // Rotate A instructions (unprefixed).
            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(opcode),

            // DAA / CPL / SCF / CCF
            0x27 => self.alu_daa(),
            0x2F => self.exec_cpl(),
            0x37 => self.exec_scf(),
            0x3F => self.exec_ccf(),

            // HALT sits in the middle of the LD r,r' block.
            0x76 => self.exec_halt(),

            // 8-bit register/memory transfers: LD r1, r2
            0x40..=0x7F => self.exec_ld_r_r(bus, opcode),

            // 8-bit ALU operations on A: ADD/ADC/SUB/SBC/AND/XOR/OR/CP r,(HL)
            0x80..=0xBF => {
                let value = self.read_reg8(bus, opcode & 0x07);
                self.alu_op((opcode >> 3) & 0x07, value);
            }

            // RET cc
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                self.exec_ret_cc(bus, opcode)
            }

            // POP rr
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop_rp(bus, opcode),

            // RET
            0xC9 => self.exec_ret(bus),

            // EXX
            0xD9 => self.exec_exx(),

            // JP (HL)
            0xE9 => self.regs.pc = self.regs.hl(),

            // LD SP, HL
            0xF9 => self.regs.sp = self.regs.hl(),

            // JP cc, nn
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                self.exec_jp_cc(bus, opcode)
            }

            // JP nn
            0xC3 => self.jp_cond(bus, true),

            // EX (SP),HL
            0xE3 => {
                let hl = self.regs.hl();
                let value = self.exchange_stack_top(bus, hl);
                self.regs.set_hl(value);
            }

            // EX DE,HL
            0xEB => self.exec_ex_de_hl(),

            // DI / EI
            0xF3 => self.exec_di(),
            0xFB => self.exec_ei(),

            // CALL cc, nn
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                self.exec_call_cc(bus, opcode)
            }

            // PUSH rr
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push_rp(bus, opcode),

            // CALL nn
            0xCD => self.call_cond(bus, true),

            // 8-bit ALU immediate operations on A: ADD/ADC/SUB/SBC/AND/XOR/OR/CP n
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let value = self.fetch8(bus);
                self.alu_op((opcode >> 3) & 0x07, value);
            }

            // RST n
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.exec_rst(bus, opcode)
            }

            // Prefixes and port I/O never reach here; `step` routes or
            // faults them before dispatch.
            _ => log::error!("unprefixed opcode 0x{opcode:02X} has no handler"),
        }
    }
}
