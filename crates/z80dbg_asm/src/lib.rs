//! A two-pass Z80 assembler.
//!
//! Instructions are encoded through the same opcode table the z80dbg
//! engine decodes with, so anything this crate emits is something the CPU
//! executes and the disassembler prints back.
//!
//! ```
//! let program = z80dbg_asm::assemble(
//!     "
//!         org 0x8000
//!     start:
//!         ld a, 0x42
//!         halt
//!     ",
//! )
//! .unwrap();
//! assert_eq!(program.origin, 0x8000);
//! assert_eq!(program.bytes, vec![0x3E, 0x42, 0x76]);
//! assert_eq!(program.labels["start"], 0x8000);
//! ```

mod error;
mod expr;
mod line;

use std::collections::BTreeMap;

use z80dbg_core::{OpcodeInfo, Operand, OPCODES};

pub use error::{AssembleError, ErrorKind};

use expr::ExprError;
use line::{Arg, Line};

/// Assembled output, ready for `Emulator::load_program(&bytes, origin)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    pub origin: u16,
    pub bytes: Vec<u8>,
    pub labels: BTreeMap<String, u16>,
}

/// Assemble `source` into a contiguous image.
///
/// The first pass lays out addresses and collects labels; the second pass
/// encodes with every label known. The image starts at the first `ORG`
/// (or 0x0000) and later `ORG` gaps are zero-filled.
pub fn assemble(source: &str) -> Result<Assembly, AssembleError> {
    let lines = source
        .lines()
        .enumerate()
        .map(|(index, text)| {
            line::parse_line(index + 1, text)
                .map_err(|message| AssembleError::new(ErrorKind::Syntax, index + 1, 0, message))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut labels = BTreeMap::new();
    walk(&lines, &mut labels, Pass::Layout)?;
    let image = walk(&lines, &mut labels, Pass::Emit)?;

    log::debug!(
        "assembled {} bytes at 0x{:04X} with {} labels",
        image.bytes.len(),
        image.origin.unwrap_or(0),
        labels.len()
    );
    Ok(Assembly {
        origin: image.origin.unwrap_or(0),
        bytes: image.bytes,
        labels,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    /// Labels may be forward references; values are placeholders.
    Layout,
    /// Every label is known; values are range-checked.
    Emit,
}

#[derive(Default)]
struct Image {
    origin: Option<u16>,
    /// Next output address. Kept wide so running off the end is detectable.
    address: u32,
    bytes: Vec<u8>,
}

const ADDRESS_SPACE: u32 = 0x10000;

fn walk(
    lines: &[Line],
    labels: &mut BTreeMap<String, u16>,
    pass: Pass,
) -> Result<Image, AssembleError> {
    let mut image = Image::default();

    for line in lines {
        let here = (image.address % ADDRESS_SPACE) as u16;
        let mnemonic = line.mnemonic.as_deref();

        if mnemonic == Some("ORG") {
            let ctx = Context::new(labels, Pass::Emit, line.number, here);
            let [operand] = line.operands.as_slice() else {
                return Err(ctx.error(ErrorKind::Syntax, "ORG takes one address"));
            };
            let target = ctx.word(operand)?;
            image.org(target, &ctx)?;
        }

        if let Some(label) = &line.label {
            let address = (image.address % ADDRESS_SPACE) as u16;
            if pass == Pass::Layout && labels.insert(label.clone(), address).is_some() {
                return Err(AssembleError::new(
                    ErrorKind::DuplicateLabel,
                    line.number,
                    address,
                    format!("`{label}` is already defined"),
                ));
            }
        }

        let ctx = Context::new(labels, pass, line.number, here);
        let bytes = match mnemonic {
            None | Some("ORG") => continue,
            Some("DB" | "DEFB") => data_bytes(&ctx, &line.operands)?,
            Some("DW" | "DEFW") => data_words(&ctx, &line.operands)?,
            Some(mnemonic) => {
                let args: Vec<Arg> = line.operands.iter().map(|op| Arg::classify(op)).collect();
                let info = select(&ctx, mnemonic, &args)?;
                encode(&ctx, info, &args)?
            }
        };
        image.emit(&bytes, &ctx)?;
    }
    Ok(image)
}

impl Image {
    fn org(&mut self, target: u16, ctx: &Context) -> Result<(), AssembleError> {
        let Some(origin) = self.origin else {
            self.origin = Some(target);
            self.address = target as u32;
            return Ok(());
        };
        if (target as u32) < self.address {
            return Err(ctx.error(
                ErrorKind::OriginBackwards,
                format!(
                    "ORG 0x{target:04X} is below the current address 0x{:04X}",
                    self.address
                ),
            ));
        }
        self.address = target as u32;
        self.bytes.resize((self.address - origin as u32) as usize, 0);
        Ok(())
    }

    fn emit(&mut self, bytes: &[u8], ctx: &Context) -> Result<(), AssembleError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let origin = *self.origin.get_or_insert(0);
        if self.address + bytes.len() as u32 > ADDRESS_SPACE {
            return Err(ctx.error(ErrorKind::ValueOutOfRange, "program runs past 0xFFFF"));
        }
        debug_assert_eq!(self.bytes.len() as u32, self.address - origin as u32);
        self.bytes.extend_from_slice(bytes);
        self.address += bytes.len() as u32;
        Ok(())
    }
}

/// Where a value is being evaluated, and how strictly.
struct Context<'a> {
    labels: &'a BTreeMap<String, u16>,
    pass: Pass,
    line: usize,
    here: u16,
}

impl<'a> Context<'a> {
    fn new(labels: &'a BTreeMap<String, u16>, pass: Pass, line: usize, here: u16) -> Self {
        Self {
            labels,
            pass,
            line,
            here,
        }
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> AssembleError {
        AssembleError::new(kind, self.line, self.here, message)
    }

    fn strict(&self) -> bool {
        self.pass == Pass::Emit
    }

    fn value(&self, text: &str) -> Result<i64, AssembleError> {
        match expr::evaluate(text, self.here, |name| self.labels.get(name).copied()) {
            Ok(value) => Ok(value),
            Err(ExprError::Undefined(_)) if !self.strict() => Ok(0),
            Err(ExprError::Undefined(name)) => Err(self.error(
                ErrorKind::UndefinedLabel,
                format!("`{name}` is not defined"),
            )),
            Err(ExprError::Syntax(message)) => Err(self.error(ErrorKind::Syntax, message)),
        }
    }

    fn checked(&self, text: &str, range: std::ops::RangeInclusive<i64>) -> Result<i64, AssembleError> {
        let value = self.value(text)?;
        if self.strict() && !range.contains(&value) {
            return Err(self.error(
                ErrorKind::ValueOutOfRange,
                format!("`{text}` = {value} does not fit in {range:?}"),
            ));
        }
        Ok(value)
    }

    fn byte(&self, text: &str) -> Result<u8, AssembleError> {
        self.checked(text, -128..=255).map(|value| value as u8)
    }

    fn word(&self, text: &str) -> Result<u16, AssembleError> {
        self.checked(text, -32768..=65535).map(|value| value as u16)
    }

    fn displacement(&self, text: &str) -> Result<u8, AssembleError> {
        self.checked(text, -128..=127).map(|value| value as i8 as u8)
    }

    /// Offset from the end of a `len`-byte instruction at `here` to the target.
    fn relative(&self, text: &str, len: u8) -> Result<u8, AssembleError> {
        let target = self.value(text)?;
        let offset = target - (self.here as i64 + len as i64);
        if self.strict() && !(-128..=127).contains(&offset) {
            return Err(self.error(
                ErrorKind::RangeError,
                format!("target 0x{target:04X} is {offset} bytes away"),
            ));
        }
        Ok(offset as i8 as u8)
    }
}

fn data_bytes(ctx: &Context, operands: &[String]) -> Result<Vec<u8>, AssembleError> {
    if operands.is_empty() {
        return Err(ctx.error(ErrorKind::Syntax, "DB needs at least one value"));
    }
    let mut bytes = Vec::new();
    for operand in operands {
        match operand.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            Some(text) if text.is_ascii() => bytes.extend_from_slice(text.as_bytes()),
            Some(_) => return Err(ctx.error(ErrorKind::ValueOutOfRange, "DB strings must be ASCII")),
            None => bytes.push(ctx.byte(operand)?),
        }
    }
    Ok(bytes)
}

fn data_words(ctx: &Context, operands: &[String]) -> Result<Vec<u8>, AssembleError> {
    if operands.is_empty() {
        return Err(ctx.error(ErrorKind::Syntax, "DW needs at least one value"));
    }
    let mut bytes = Vec::with_capacity(operands.len() * 2);
    for operand in operands {
        bytes.extend_from_slice(&ctx.word(operand)?.to_le_bytes());
    }
    Ok(bytes)
}

/// The first table encoding of `mnemonic` whose operands fit `args`.
fn select(ctx: &Context, mnemonic: &str, args: &[Arg]) -> Result<&'static OpcodeInfo, AssembleError> {
    let table = &*OPCODES;
    let found = table.with_mnemonic(mnemonic).find(|info| {
        info.operands.len() == args.len()
            && info
                .operands
                .iter()
                .zip(args)
                .all(|(operand, arg)| operand_fits(ctx, operand, arg))
    });
    match found {
        Some(info) => Ok(info),
        None if table.with_mnemonic(mnemonic).next().is_none() => Err(ctx.error(
            ErrorKind::UnknownInstruction,
            format!("`{mnemonic}` is not a Z80 instruction"),
        )),
        None => Err(ctx.error(
            ErrorKind::InvalidOperand,
            format!("no form of {mnemonic} takes {} operand(s) like these", args.len()),
        )),
    }
}

fn operand_fits(ctx: &Context, operand: &Operand, arg: &Arg) -> bool {
    match (operand, arg) {
        (Operand::Fixed(text), Arg::Keyword(word)) => text == word,
        // RST, IM and bit numbers are literal operands of the template.
        (Operand::Fixed(text), Arg::Value(value)) => match expr::parse_number(text) {
            Some(expected) => ctx.value(value).ok() == Some(expected),
            None => false,
        },
        (Operand::Imm8 | Operand::Imm16 | Operand::Rel8, Arg::Value(_)) => true,
        (Operand::Mem16, Arg::Memory(_)) => true,
        (Operand::Indexed(reg), Arg::Indexed(used, _)) => reg == used,
        (Operand::Indexed(reg), Arg::Keyword(word)) => *word == format!("({})", reg.name()),
        _ => false,
    }
}

fn encode(ctx: &Context, info: &OpcodeInfo, args: &[Arg]) -> Result<Vec<u8>, AssembleError> {
    let mut payload = Vec::with_capacity(info.len as usize);
    for (operand, arg) in info.operands.iter().zip(args) {
        match (operand, arg) {
            (Operand::Imm8, Arg::Value(text)) => payload.push(ctx.byte(text)?),
            (Operand::Imm16, Arg::Value(text)) | (Operand::Mem16, Arg::Memory(text)) => {
                payload.extend_from_slice(&ctx.word(text)?.to_le_bytes())
            }
            (Operand::Rel8, Arg::Value(text)) => payload.push(ctx.relative(text, info.len)?),
            (Operand::Indexed(_), Arg::Indexed(_, text)) => payload.push(ctx.displacement(text)?),
            // `(IX)` with no displacement.
            (Operand::Indexed(_), _) => payload.push(0),
            _ => {}
        }
    }
    Ok(info.encode(&payload))
}

#[cfg(test)]
mod tests;
