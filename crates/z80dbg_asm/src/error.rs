use std::fmt;

/// What went wrong while assembling a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed line, number or expression.
    Syntax,
    /// The mnemonic or directive is not known.
    UnknownInstruction,
    /// The mnemonic is known but no encoding takes these operands.
    InvalidOperand,
    UndefinedLabel,
    DuplicateLabel,
    /// An immediate, address or displacement does not fit its field.
    ValueOutOfRange,
    /// `ORG` would move the output address backwards.
    OriginBackwards,
    /// A relative jump target is more than -128..=127 bytes away.
    RangeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UnknownInstruction => "unknown instruction",
            ErrorKind::InvalidOperand => "invalid operand",
            ErrorKind::UndefinedLabel => "undefined label",
            ErrorKind::DuplicateLabel => "duplicate label",
            ErrorKind::ValueOutOfRange => "value out of range",
            ErrorKind::OriginBackwards => "origin moves backwards",
            ErrorKind::RangeError => "relative jump out of range",
        };
        f.write_str(text)
    }
}

/// An assembly failure, located by source line and output address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembleError {
    pub kind: ErrorKind,
    /// 1-based source line.
    pub line: usize,
    /// Address of the instruction or directive on that line.
    pub address: u16,
    pub message: String,
}

impl AssembleError {
    pub(crate) fn new(kind: ErrorKind, line: usize, address: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            address,
            message: message.into(),
        }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} (0x{:04X}): {}: {}",
            self.line, self.address, self.kind, self.message
        )
    }
}

impl std::error::Error for AssembleError {}
