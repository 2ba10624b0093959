//! Numbers and `+`/`-` expressions over labels.

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ExprError {
    Syntax(String),
    Undefined(String),
}

/// Parse a numeric literal.
///
/// Accepts decimal, `0x`/`$`/`h`-suffixed hex and `0b`/`%` binary. Returns
/// `None` for anything else, including labels.
pub(crate) fn parse_number(text: &str) -> Option<i64> {
    let lower = text.trim().to_ascii_lowercase();
    let first = lower.chars().next()?;

    let (digits, radix) = if first.is_ascii_digit() && lower.len() > 1 && lower.ends_with('h') {
        (&lower[..lower.len() - 1], 16)
    } else if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = lower.strip_prefix('$') {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix('%') {
        (rest, 2)
    } else if first.is_ascii_digit() {
        (lower.as_str(), 10)
    } else {
        return None;
    };

    if digits.is_empty() {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Evaluate `term (('+' | '-') term)*`, where a term is a number, a label
/// or `$` (the address of the current line).
pub(crate) fn evaluate<F>(text: &str, here: u16, lookup: F) -> Result<i64, ExprError>
where
    F: Fn(&str) -> Option<u16>,
{
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(ExprError::Syntax("missing value".to_string()));
    }

    let mut total = 0i64;
    let mut pos = 0;
    while pos < chars.len() {
        let mut sign = 1;
        while pos < chars.len() && matches!(chars[pos], '+' | '-') {
            if chars[pos] == '-' {
                sign = -sign;
            }
            pos += 1;
        }
        let start = pos;
        while pos < chars.len() && !matches!(chars[pos], '+' | '-') {
            pos += 1;
        }
        let term: String = chars[start..pos].iter().collect();
        total += sign * term_value(&term, here, &lookup)?;
    }
    Ok(total)
}

fn term_value<F>(term: &str, here: u16, lookup: &F) -> Result<i64, ExprError>
where
    F: Fn(&str) -> Option<u16>,
{
    if term.is_empty() {
        return Err(ExprError::Syntax("missing term in expression".to_string()));
    }
    if term == "$" {
        return Ok(here as i64);
    }
    if let Some(value) = parse_number(term) {
        return Ok(value);
    }
    if is_identifier(term) {
        return lookup(term)
            .map(i64::from)
            .ok_or_else(|| ExprError::Undefined(term.to_string()));
    }
    Err(ExprError::Syntax(format!("invalid value `{term}`")))
}
