//! Splitting source lines into label, mnemonic and operands.

use std::collections::HashSet;

use lazy_static::lazy_static;
use z80dbg_core::IndexRegister;

use crate::expr::is_identifier;

lazy_static! {
    /// Register names, condition codes and register-indirect forms.
    static ref KEYWORDS: HashSet<&'static str> = [
        "A", "B", "C", "D", "E", "H", "L", "I", "R", "AF", "AF'", "BC", "DE", "HL", "SP", "IX",
        "IY", "(BC)", "(DE)", "(HL)", "(SP)", "(IX)", "(IY)", "(C)", "NZ", "Z", "NC", "PO", "PE",
        "P", "M",
    ]
    .into_iter()
    .collect();
}

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word.to_ascii_uppercase().as_str())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Line {
    pub number: usize,
    pub label: Option<String>,
    /// Upper-cased.
    pub mnemonic: Option<String>,
    pub operands: Vec<String>,
}

/// Index of the first `needle` outside a double-quoted string.
fn find_unquoted(text: &str, needle: char) -> Option<usize> {
    let mut quoted = false;
    for (index, ch) in text.char_indices() {
        if ch == '"' {
            quoted = !quoted;
        } else if ch == needle && !quoted {
            return Some(index);
        }
    }
    None
}

fn split_operands(text: &str) -> Result<Vec<String>, String> {
    let mut operands = Vec::new();
    let mut rest = text;
    loop {
        let (operand, tail) = match find_unquoted(rest, ',') {
            Some(index) => (&rest[..index], Some(&rest[index + 1..])),
            None => (rest, None),
        };
        let operand = operand.trim();
        if operand.is_empty() {
            return Err("empty operand".to_string());
        }
        operands.push(operand.to_string());
        match tail {
            Some(tail) => rest = tail,
            None => return Ok(operands),
        }
    }
}

pub(crate) fn parse_line(number: usize, text: &str) -> Result<Line, String> {
    let text = match find_unquoted(text, ';') {
        Some(index) => &text[..index],
        None => text,
    };
    if text.matches('"').count() % 2 != 0 {
        return Err("unterminated string".to_string());
    }

    let mut rest = text.trim();
    let mut label = None;
    if let Some(index) = find_unquoted(rest, ':') {
        let name = rest[..index].trim();
        if is_identifier(name) {
            if is_keyword(name) {
                return Err(format!("`{name}` is a register name and cannot be a label"));
            }
            label = Some(name.to_string());
            rest = rest[index + 1..].trim();
        }
    }

    if rest.is_empty() {
        return Ok(Line {
            number,
            label,
            mnemonic: None,
            operands: Vec::new(),
        });
    }

    let (mnemonic, operand_text) = match rest.find(char::is_whitespace) {
        Some(index) => (&rest[..index], rest[index..].trim()),
        None => (rest, ""),
    };
    if !mnemonic.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("malformed line `{rest}`"));
    }
    let operands = if operand_text.is_empty() {
        Vec::new()
    } else {
        split_operands(operand_text)?
    };

    Ok(Line {
        number,
        label,
        mnemonic: Some(mnemonic.to_ascii_uppercase()),
        operands,
    })
}

/// An instruction operand, classified by shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Arg {
    /// Upper-cased register, condition or register-indirect form.
    Keyword(String),
    /// An expression.
    Value(String),
    /// `(expr)`: the inner expression.
    Memory(String),
    /// `(IX+expr)` / `(IY-expr)`: the signed displacement expression.
    Indexed(IndexRegister, String),
}

impl Arg {
    pub(crate) fn classify(text: &str) -> Self {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let upper = compact.to_ascii_uppercase();
        if KEYWORDS.contains(upper.as_str()) {
            return Arg::Keyword(upper);
        }

        let Some(inner) = compact
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return Arg::Value(compact);
        };

        let inner_upper = inner.to_ascii_uppercase();
        for reg in [IndexRegister::Ix, IndexRegister::Iy] {
            if let Some(displacement) = inner_upper.strip_prefix(reg.name()) {
                if displacement.starts_with(['+', '-']) {
                    // Keep the original case: the displacement may name a label.
                    let offset = inner.len() - displacement.len();
                    return Arg::Indexed(reg, inner[offset..].to_string());
                }
            }
        }
        Arg::Memory(inner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_line, Arg, Line};
    use z80dbg_core::IndexRegister;

    #[test]
    fn label_mnemonic_and_operands() {
        let line = parse_line(3, "loop:  ld a, (ix+5) ; fetch").unwrap();
        assert_eq!(
            line,
            Line {
                number: 3,
                label: Some("loop".to_string()),
                mnemonic: Some("LD".to_string()),
                operands: vec!["a".to_string(), "(ix+5)".to_string()],
            }
        );
    }

    #[test]
    fn blank_comment_and_label_only_lines() {
        assert_eq!(parse_line(1, "   ").unwrap().mnemonic, None);
        assert_eq!(parse_line(1, "; just a comment").unwrap().mnemonic, None);
        let line = parse_line(1, "end:").unwrap();
        assert_eq!(line.label.as_deref(), Some("end"));
        assert_eq!(line.mnemonic, None);
    }

    #[test]
    fn strings_keep_commas_colons_and_semicolons() {
        let line = parse_line(1, r#"db "a,b;c:", 0"#).unwrap();
        assert_eq!(line.label, None);
        assert_eq!(line.operands, vec![r#""a,b;c:""#.to_string(), "0".to_string()]);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(parse_line(1, "ld a,").is_err());
        assert!(parse_line(1, r#"db "open"#).is_err());
        assert!(parse_line(1, "hl: nop").is_err());
    }

    #[test]
    fn operand_shapes() {
        assert_eq!(Arg::classify("a"), Arg::Keyword("A".to_string()));
        assert_eq!(Arg::classify("af'"), Arg::Keyword("AF'".to_string()));
        assert_eq!(Arg::classify("( hl )"), Arg::Keyword("(HL)".to_string()));
        assert_eq!(Arg::classify("(ix)"), Arg::Keyword("(IX)".to_string()));
        assert_eq!(Arg::classify("0x10"), Arg::Value("0x10".to_string()));
        assert_eq!(Arg::classify("(buffer)"), Arg::Memory("buffer".to_string()));
        assert_eq!(
            Arg::classify("(IY - Offset)"),
            Arg::Indexed(IndexRegister::Iy, "-Offset".to_string())
        );
        assert_eq!(Arg::classify("(ixdata)"), Arg::Memory("ixdata".to_string()));
    }
}
