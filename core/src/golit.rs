//! # Go String Literals
//!
//! Decoding and encoding of Go interpreted (`"..."`) string literals, used for
//! tag values and for struct tags written as interpreted literals.

/// Decodes a double-quoted Go string literal, delimiters included.
///
/// Returns `None` for anything `strconv.Unquote` would reject.
pub fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let esc = chars.next()?;
                match esc {
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0C}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\u{0B}'),
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'x' => {
                        let byte = read_hex(&mut chars, 2)?;
                        // Only ASCII bytes can be represented in a `String`
                        if byte > 0x7F {
                            return None;
                        }
                        out.push(char::from_u32(byte)?);
                    }
                    'u' => out.push(char::from_u32(read_hex(&mut chars, 4)?)?),
                    'U' => out.push(char::from_u32(read_hex(&mut chars, 8)?)?),
                    '0'..='7' => {
                        let mut value = esc.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        if value > 0x7F {
                            return None;
                        }
                        out.push(char::from_u32(value)?);
                    }
                    _ => return None,
                }
            }
            _ => out.push(c),
        }
    }

    Some(out)
}

fn read_hex(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

/// Encodes `value` as a double-quoted Go string literal, like `strconv.Quote`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFFFF {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_plain_and_escapes() {
        assert_eq!(unquote(r#""my_field""#).as_deref(), Some("my_field"));
        assert_eq!(
            unquote(r#""json:\"a\" yaml:\"b\"""#).as_deref(),
            Some(r#"json:"a" yaml:"b""#)
        );
        assert_eq!(unquote(r#""tab\there""#).as_deref(), Some("tab\there"));
        assert_eq!(unquote(r#""\x41\101é""#).as_deref(), Some("AAé"));
    }

    #[test]
    fn test_unquote_rejects_invalid() {
        assert_eq!(unquote("no quotes"), None);
        assert_eq!(unquote(r#""unterminated"#), None);
        assert_eq!(unquote(r#""bad \q escape""#), None);
        assert_eq!(unquote(r#""inner " quote""#), None);
        assert_eq!(unquote(r#""trailing \""#), None);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), r#""plain""#);
        assert_eq!(quote(r#"json:"x""#), r#""json:\"x\"""#);
        assert_eq!(quote("a\nb\\c"), r#""a\nb\\c""#);
        assert_eq!(quote("\u{01}"), r#""\x01""#);
        assert_eq!(quote("é"), "\"é\"");
    }

    #[test]
    fn test_quote_then_unquote_restores_value() {
        let value = "name,omitempty\t\"q\"";
        assert_eq!(unquote(&quote(value)).as_deref(), Some(value));
    }
}
