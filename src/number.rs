// Integer parsing with base prefixes: `0x` / `0o` / `0b`, a bare leading `0` for octal,
// and `_` digit separators. The result must fit the destination width.

struct Literal<'a> {
    negative: bool,
    radix: u32,
    digits: &'a str,
}

fn split_literal(text: &str, allow_sign: bool) -> Result<Literal<'_>, String> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') if allow_sign => (true, &text[1..]),
        Some(b'+') if allow_sign => (false, &text[1..]),
        _ => (false, text),
    };

    let lower = rest.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &rest[2..]),
        Some("0o") => (8, &rest[2..]),
        Some("0b") => (2, &rest[2..]),
        _ if rest.len() > 1 && rest.starts_with('0') => (8, &rest[1..]),
        _ => (10, rest),
    };

    if digits.is_empty() {
        return Err("no digits".to_owned());
    }
    if digits.ends_with('_') || digits.contains("__") || (radix == 10 && digits.starts_with('_'))
    {
        return Err("misplaced digit separator".to_owned());
    }

    Ok(Literal {
        negative,
        radix,
        digits,
    })
}

fn magnitude(literal: &Literal<'_>) -> Result<u128, String> {
    let digits: String = literal.digits.chars().filter(|c| *c != '_').collect();
    // from_str_radix would otherwise accept a second sign here
    if digits.starts_with(['+', '-']) {
        return Err("invalid digit found in string".to_owned());
    }
    u128::from_str_radix(&digits, literal.radix).map_err(|err| err.to_string())
}

/// Parse a signed integer of any width
pub fn parse_signed<T: TryFrom<i128>>(text: &str) -> Result<T, String> {
    let literal = split_literal(text, true)?;
    let mag = magnitude(&literal)?;
    let value = if literal.negative {
        0i128.checked_sub_unsigned(mag)
    } else {
        i128::try_from(mag).ok()
    }
    .ok_or_else(out_of_range)?;
    T::try_from(value).map_err(|_| out_of_range())
}

/// Parse an unsigned integer of any width. No sign is accepted.
pub fn parse_unsigned<T: TryFrom<u128>>(text: &str) -> Result<T, String> {
    let literal = split_literal(text, false)?;
    let mag = magnitude(&literal)?;
    T::try_from(mag).map_err(|_| out_of_range())
}

fn out_of_range() -> String {
    "value out of range".to_owned()
}
