use std::fmt;

use crate::opcodes::{Operand, OPCODES};

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disassembled {
    pub address: u16,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl Disassembled {
    pub fn len(&self) -> u16 {
        self.bytes.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Address of the instruction that follows this one.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(self.len())
    }
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{b:02X}")).collect();
        write!(f, "{:04X}  {:<12} {}", self.address, hex.join(" "), self.text)
    }
}

/// Length of the instruction at `addr`; unknown encodings count as one byte.
pub fn instruction_len<F: FnMut(u16) -> u8>(read: F, addr: u16) -> u16 {
    OPCODES
        .decode(read, addr)
        .map_or(1, |info| info.len as u16)
}

/// Decode the instruction at `address` into text.
///
/// Immediates print as `0xNN` / `0xNNNN`, relative jumps print their
/// absolute target, and undefined encodings print as `DB 0xNN`.
pub fn disassemble<F: FnMut(u16) -> u8>(mut read: F, address: u16) -> Disassembled {
    let Some(info) = OPCODES.decode(&mut read, address) else {
        let byte = read(address);
        return Disassembled {
            address,
            bytes: vec![byte],
            text: format!("DB 0x{byte:02X}"),
        };
    };

    let len = info.len as u16;
    let bytes: Vec<u8> = (0..len)
        .map(|offset| read(address.wrapping_add(offset)))
        .collect();

    let mut cursor = info.operand_offset() as usize;
    let mut operands = Vec::with_capacity(info.operands.len());
    for operand in &info.operands {
        let text = match operand {
            Operand::Fixed(text) => text.clone(),
            Operand::Imm8 => format!("0x{:02X}", bytes[cursor]),
            Operand::Imm16 => format!("0x{:04X}", word_at(&bytes, cursor)),
            Operand::Mem16 => format!("(0x{:04X})", word_at(&bytes, cursor)),
            Operand::Rel8 => {
                let offset = bytes[cursor] as i8;
                let target = address.wrapping_add(len).wrapping_add(offset as i16 as u16);
                format!("0x{target:04X}")
            }
            Operand::Indexed(reg) => {
                let d = bytes[cursor] as i8;
                let sign = if d < 0 { '-' } else { '+' };
                format!("({}{sign}0x{:02X})", reg.name(), d.unsigned_abs())
            }
        };
        cursor += operand.size() as usize;
        operands.push(text);
    }

    let text = if operands.is_empty() {
        info.mnemonic.clone()
    } else {
        format!("{} {}", info.mnemonic, operands.join(","))
    };
    Disassembled {
        address,
        bytes,
        text,
    }
}

fn word_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::{disassemble, instruction_len};

    fn dis(program: &[u8]) -> String {
        let read = |addr: u16| program.get(addr as usize).copied().unwrap_or(0);
        disassemble(read, 0).text
    }

    #[test]
    fn formats_immediates_and_addresses() {
        assert_eq!(dis(&[0x00]), "NOP");
        assert_eq!(dis(&[0x3E, 0x42]), "LD A,0x42");
        assert_eq!(dis(&[0x21, 0x34, 0x12]), "LD HL,0x1234");
        assert_eq!(dis(&[0x3A, 0x00, 0x80]), "LD A,(0x8000)");
        assert_eq!(dis(&[0xED, 0x43, 0xCD, 0xAB]), "LD (0xABCD),BC");
    }

    #[test]
    fn relative_jumps_show_their_target() {
        assert_eq!(dis(&[0x18, 0x03]), "JR 0x0005");
        assert_eq!(dis(&[0x20, 0xFE]), "JR NZ,0x0000");
        assert_eq!(dis(&[0x10, 0x80]), "DJNZ 0xFF82");
    }

    #[test]
    fn index_displacements_are_signed() {
        assert_eq!(dis(&[0xDD, 0x7E, 0x05]), "LD A,(IX+0x05)");
        assert_eq!(dis(&[0xFD, 0x36, 0xFE, 0x11]), "LD (IY-0x02),0x11");
        assert_eq!(dis(&[0xDD, 0xCB, 0x80, 0xFE]), "SET 7,(IX-0x80)");
    }

    #[test]
    fn unknown_encodings_become_db() {
        let program = [0xD3, 0x10];
        let read = |addr: u16| program[addr as usize];
        let line = disassemble(read, 0);
        assert_eq!(line.text, "DB 0xD3");
        assert_eq!(line.len(), 1);
        assert_eq!(instruction_len(read, 0), 1);
    }

    #[test]
    fn display_includes_address_and_bytes() {
        let program = [0x00, 0xC3, 0x00, 0x01];
        let read = |addr: u16| program[addr as usize];
        let line = disassemble(read, 1);
        assert_eq!(line.to_string(), "0001  C3 00 01     JP 0x0100");
        assert_eq!(line.next_address(), 4);
    }
}
