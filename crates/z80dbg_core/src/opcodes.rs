//! Canonical Z80 opcode table.
//!
//! This is the single description of every encoding the engine recognises.
//! The CPU consults it to tell a real instruction from a decode fault, the
//! disassembler formats from it, and the assembler encodes from it, so the
//! three can never disagree about what an opcode means.
//!
//! Templates use placeholders for operand bytes:
//! - `n`: 8-bit immediate
//! - `nn`: 16-bit immediate (little-endian)
//! - `(nn)`: 16-bit absolute memory address
//! - `e`: signed 8-bit displacement relative to the next instruction
//! - `(IX+d)` / `(IY+d)`: index register plus signed 8-bit displacement

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

lazy_static! {
    /// The table, built once on first use.
    pub static ref OPCODES: OpcodeTable = OpcodeTable::build();
}

/// One dense 256-entry opcode page, selected by the prefix bytes before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Base,
    Cb,
    Ed,
    Dd,
    Fd,
    /// `DD CB d op`
    DdCb,
    /// `FD CB d op`
    FdCb,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Base,
        Page::Cb,
        Page::Ed,
        Page::Dd,
        Page::Fd,
        Page::DdCb,
        Page::FdCb,
    ];

    pub fn prefix(self) -> &'static [u8] {
        match self {
            Page::Base => &[],
            Page::Cb => &[0xCB],
            Page::Ed => &[0xED],
            Page::Dd => &[0xDD],
            Page::Fd => &[0xFD],
            Page::DdCb => &[0xDD, 0xCB],
            Page::FdCb => &[0xFD, 0xCB],
        }
    }

    /// Pages whose displacement byte sits between the prefix and the opcode.
    pub fn displacement_first(self) -> bool {
        matches!(self, Page::DdCb | Page::FdCb)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexRegister {
    Ix,
    Iy,
}

impl IndexRegister {
    pub fn name(self) -> &'static str {
        match self {
            IndexRegister::Ix => "IX",
            IndexRegister::Iy => "IY",
        }
    }

    pub fn from_prefix(prefix: u8) -> Option<Self> {
        match prefix {
            0xDD => Some(IndexRegister::Ix),
            0xFD => Some(IndexRegister::Iy),
            _ => None,
        }
    }

    fn pages(self) -> (Page, Page) {
        match self {
            IndexRegister::Ix => (Page::Dd, Page::DdCb),
            IndexRegister::Iy => (Page::Fd, Page::FdCb),
        }
    }
}

/// A single operand slot of an instruction template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Register, condition code, bit number or other literal text.
    Fixed(String),
    Imm8,
    Imm16,
    Mem16,
    Rel8,
    Indexed(IndexRegister),
}

impl Operand {
    fn parse(token: &str) -> Self {
        match token {
            "n" => Operand::Imm8,
            "nn" => Operand::Imm16,
            "(nn)" => Operand::Mem16,
            "e" => Operand::Rel8,
            "(IX+d)" => Operand::Indexed(IndexRegister::Ix),
            "(IY+d)" => Operand::Indexed(IndexRegister::Iy),
            other => Operand::Fixed(other.to_string()),
        }
    }

    /// Number of encoding bytes this operand contributes.
    pub fn size(&self) -> u8 {
        match self {
            Operand::Fixed(_) => 0,
            Operand::Imm8 | Operand::Rel8 | Operand::Indexed(_) => 1,
            Operand::Imm16 | Operand::Mem16 => 2,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Fixed(text) => f.write_str(text),
            Operand::Imm8 => f.write_str("n"),
            Operand::Imm16 => f.write_str("nn"),
            Operand::Mem16 => f.write_str("(nn)"),
            Operand::Rel8 => f.write_str("e"),
            Operand::Indexed(reg) => write!(f, "({}+d)", reg.name()),
        }
    }
}

/// Static description of one encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub page: Page,
    pub opcode: u8,
    pub mnemonic: String,
    pub operands: Vec<Operand>,
    /// Total length in bytes, prefixes included.
    pub len: u8,
}

impl OpcodeInfo {
    fn new(page: Page, opcode: u8, template: &str) -> Self {
        let (mnemonic, rest) = template.split_once(' ').unwrap_or((template, ""));
        let operands: Vec<Operand> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(Operand::parse).collect()
        };
        let operand_bytes: u8 = operands.iter().map(Operand::size).sum();
        let len = page.prefix().len() as u8 + 1 + operand_bytes;
        Self {
            page,
            opcode,
            mnemonic: mnemonic.to_string(),
            operands,
            len,
        }
    }

    /// The template text, e.g. `LD A,n`.
    pub fn template(&self) -> String {
        if self.operands.is_empty() {
            return self.mnemonic.clone();
        }
        let operands: Vec<String> = self.operands.iter().map(ToString::to_string).collect();
        format!("{} {}", self.mnemonic, operands.join(","))
    }

    /// Build the full encoding from the operand bytes in template order.
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len as usize);
        bytes.extend_from_slice(self.page.prefix());
        if self.page.displacement_first() {
            bytes.extend_from_slice(payload);
            bytes.push(self.opcode);
        } else {
            bytes.push(self.opcode);
            bytes.extend_from_slice(payload);
        }
        bytes
    }

    /// Offset of the first operand byte from the start of the instruction.
    pub fn operand_offset(&self) -> u16 {
        if self.page.displacement_first() {
            self.page.prefix().len() as u16
        } else {
            self.page.prefix().len() as u16 + 1
        }
    }
}

/// Every recognised encoding, one dense page per prefix.
pub struct OpcodeTable {
    pages: Vec<Vec<Option<OpcodeInfo>>>,
    by_mnemonic: HashMap<String, Vec<(Page, u8)>>,
}

impl OpcodeTable {
    fn build() -> Self {
        let mut pages = Vec::with_capacity(Page::ALL.len());
        let mut by_mnemonic: HashMap<String, Vec<(Page, u8)>> = HashMap::new();
        for page in Page::ALL {
            let entries: Vec<Option<OpcodeInfo>> = (0..=255u8)
                .map(|opcode| template_for(page, opcode).map(|t| OpcodeInfo::new(page, opcode, &t)))
                .collect();
            for info in entries.iter().flatten() {
                by_mnemonic
                    .entry(info.mnemonic.clone())
                    .or_default()
                    .push((page, info.opcode));
            }
            pages.push(entries);
        }
        log::debug!(
            "opcode table built: {} encodings",
            pages.iter().flatten().flatten().count()
        );
        Self { pages, by_mnemonic }
    }

    pub fn get(&self, page: Page, opcode: u8) -> Option<&OpcodeInfo> {
        self.pages[page as usize][opcode as usize].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpcodeInfo> {
        self.pages.iter().flatten().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All encodings of a mnemonic (upper case), unprefixed pages first.
    pub fn with_mnemonic(&self, mnemonic: &str) -> impl Iterator<Item = &OpcodeInfo> + '_ {
        self.by_mnemonic
            .get(mnemonic)
            .into_iter()
            .flatten()
            .filter_map(move |&(page, opcode)| self.get(page, opcode))
    }

    /// Look up the instruction that starts at `addr`.
    pub fn decode<F: FnMut(u16) -> u8>(&self, mut read: F, addr: u16) -> Option<&OpcodeInfo> {
        let opcode = read(addr);
        match opcode {
            0xCB => self.get(Page::Cb, read(addr.wrapping_add(1))),
            0xED => self.get(Page::Ed, read(addr.wrapping_add(1))),
            0xDD | 0xFD => {
                let (page, cb_page) = IndexRegister::from_prefix(opcode)?.pages();
                let next = read(addr.wrapping_add(1));
                if next == 0xCB {
                    self.get(cb_page, read(addr.wrapping_add(3)))
                } else {
                    self.get(page, next)
                }
            }
            _ => self.get(Page::Base, opcode),
        }
    }
}

const R: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 8] = ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];
const ALU: [&str; 8] = [
    "ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP ",
];
const ROT: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SLL", "SRL"];

/// Split an opcode into its `x`, `y`, `z` fields (bits 7-6, 5-3, 2-0).
#[inline]
pub(crate) fn split(opcode: u8) -> (u8, u8, u8) {
    (opcode >> 6, (opcode >> 3) & 0x07, opcode & 0x07)
}

fn template_for(page: Page, opcode: u8) -> Option<String> {
    match page {
        Page::Base => base_template(opcode),
        Page::Cb => Some(cb_template(opcode, "")),
        Page::Ed => ed_template(opcode),
        Page::Dd => index_template(opcode, IndexRegister::Ix),
        Page::Fd => index_template(opcode, IndexRegister::Iy),
        Page::DdCb => index_cb_template(opcode, IndexRegister::Ix),
        Page::FdCb => index_cb_template(opcode, IndexRegister::Iy),
    }
}

fn base_template(opcode: u8) -> Option<String> {
    let (x, y, z) = split(opcode);
    let (p, q) = ((y >> 1) as usize, y & 1);
    let y = y as usize;
    let template = match (x, z) {
        (0, 0) => match y {
            0 => "NOP".to_string(),
            1 => "EX AF,AF'".to_string(),
            2 => "DJNZ e".to_string(),
            3 => "JR e".to_string(),
            _ => format!("JR {},e", CC[y - 4]),
        },
        (0, 1) if q == 0 => format!("LD {},nn", RP[p]),
        (0, 1) => format!("ADD HL,{}", RP[p]),
        (0, 2) => match (q, p) {
            (0, 0) => "LD (BC),A",
            (0, 1) => "LD (DE),A",
            (0, 2) => "LD (nn),HL",
            (0, _) => "LD (nn),A",
            (_, 0) => "LD A,(BC)",
            (_, 1) => "LD A,(DE)",
            (_, 2) => "LD HL,(nn)",
            (_, _) => "LD A,(nn)",
        }
        .to_string(),
        (0, 3) if q == 0 => format!("INC {}", RP[p]),
        (0, 3) => format!("DEC {}", RP[p]),
        (0, 4) => format!("INC {}", R[y]),
        (0, 5) => format!("DEC {}", R[y]),
        (0, 6) => format!("LD {},n", R[y]),
        (0, _) => ["RLCA", "RRCA", "RLA", "RRA", "DAA", "CPL", "SCF", "CCF"][y].to_string(),
        (1, _) if opcode == 0x76 => "HALT".to_string(),
        (1, _) => format!("LD {},{}", R[y], R[z as usize]),
        (2, _) => format!("{}{}", ALU[y], R[z as usize]),
        (_, 0) => format!("RET {}", CC[y]),
        (_, 1) if q == 0 => format!("POP {}", RP2[p]),
        (_, 1) => ["RET", "EXX", "JP (HL)", "LD SP,HL"][p].to_string(),
        (_, 2) => format!("JP {},nn", CC[y]),
        (_, 3) => match y {
            0 => "JP nn",
            4 => "EX (SP),HL",
            5 => "EX DE,HL",
            6 => "DI",
            7 => "EI",
            // CB prefix, OUT (n),A and IN A,(n).
            _ => return None,
        }
        .to_string(),
        (_, 4) => format!("CALL {},nn", CC[y]),
        (_, 5) if q == 0 => format!("PUSH {}", RP2[p]),
        (_, 5) if p == 0 => "CALL nn".to_string(),
        // DD, ED and FD prefixes.
        (_, 5) => return None,
        (_, 6) => format!("{}n", ALU[y]),
        (_, _) => format!("RST 0x{:02X}", y * 8),
    };
    Some(template)
}

fn cb_template(opcode: u8, target: &str) -> String {
    let (x, y, z) = split(opcode);
    let operand = if target.is_empty() { R[z as usize] } else { target };
    match x {
        0 => format!("{} {}", ROT[y as usize], operand),
        1 => format!("BIT {},{}", y, operand),
        2 => format!("RES {},{}", y, operand),
        _ => format!("SET {},{}", y, operand),
    }
}

fn ed_template(opcode: u8) -> Option<String> {
    let (x, y, z) = split(opcode);
    let (p, q) = ((y >> 1) as usize, y & 1);
    let template = match (x, z) {
        (1, 2) if q == 0 => format!("SBC HL,{}", RP[p]),
        (1, 2) => format!("ADC HL,{}", RP[p]),
        (1, 3) if q == 0 => format!("LD (nn),{}", RP[p]),
        (1, 3) => format!("LD {},(nn)", RP[p]),
        (1, 4) if y == 0 => "NEG".to_string(),
        (1, 5) if y == 0 => "RETN".to_string(),
        (1, 5) if y == 1 => "RETI".to_string(),
        (1, 6) => match y {
            0 => "IM 0",
            2 => "IM 1",
            3 => "IM 2",
            _ => return None,
        }
        .to_string(),
        (1, 7) => match y {
            0 => "LD I,A",
            1 => "LD R,A",
            2 => "LD A,I",
            3 => "LD A,R",
            4 => "RRD",
            5 => "RLD",
            _ => return None,
        }
        .to_string(),
        (2, 0 | 1) if y >= 4 => {
            const BLOCK: [[&str; 2]; 4] = [
                ["LDI", "CPI"],
                ["LDD", "CPD"],
                ["LDIR", "CPIR"],
                ["LDDR", "CPDR"],
            ];
            BLOCK[(y - 4) as usize][z as usize].to_string()
        }
        _ => return None,
    };
    Some(template)
}

fn index_template(opcode: u8, reg: IndexRegister) -> Option<String> {
    let ix = reg.name();
    let mem = format!("({ix}+d)");
    let (x, y, z) = split(opcode);
    let template = match opcode {
        0x09 => format!("ADD {ix},BC"),
        0x19 => format!("ADD {ix},DE"),
        0x29 => format!("ADD {ix},{ix}"),
        0x39 => format!("ADD {ix},SP"),
        0x21 => format!("LD {ix},nn"),
        0x22 => format!("LD (nn),{ix}"),
        0x2A => format!("LD {ix},(nn)"),
        0x23 => format!("INC {ix}"),
        0x2B => format!("DEC {ix}"),
        0x34 => format!("INC {mem}"),
        0x35 => format!("DEC {mem}"),
        0x36 => format!("LD {mem},n"),
        0xE1 => format!("POP {ix}"),
        0xE3 => format!("EX (SP),{ix}"),
        0xE5 => format!("PUSH {ix}"),
        0xE9 => format!("JP ({ix})"),
        0xF9 => format!("LD SP,{ix}"),
        _ if x == 1 && z == 6 && y != 6 => format!("LD {},{mem}", R[y as usize]),
        _ if x == 1 && y == 6 && z != 6 => format!("LD {mem},{}", R[z as usize]),
        _ if x == 2 && z == 6 => format!("{}{mem}", ALU[y as usize]),
        _ => return None,
    };
    Some(template)
}

fn index_cb_template(opcode: u8, reg: IndexRegister) -> Option<String> {
    // Only the documented forms, which address memory without a register copy.
    if opcode & 0x07 != 6 {
        return None;
    }
    Some(cb_template(opcode, &format!("({}+d)", reg.name())))
}
