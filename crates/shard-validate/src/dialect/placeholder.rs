//! Bind-marker scanning for query templates.
//!
//! Markers inside single-quoted string literals and double-quoted
//! identifiers are ignored, so `"data-products"` or `'?'` never count.

/// Syntax family of a dialect's bind markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Anonymous `?`; the ordinal is the marker's position.
    Positional,
    /// Named `@p1`, `@p2`, ... (case-insensitive `p`).
    AtNamed,
    /// Numbered `$1`, `$2`, ...
    DollarNumbered,
}

/// A bind marker found in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte offset of the marker's first character.
    pub start: usize,
    /// Byte offset one past the marker's last character.
    pub end: usize,
    /// 1-based parameter ordinal.
    pub ordinal: usize,
}

/// Find every bind marker of `style` in `sql`, in textual order.
pub fn scan(sql: &str, style: MarkerStyle) -> Vec<Placeholder> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i = skip_quoted(bytes, i, quote);
                continue;
            }
            b'?' if style == MarkerStyle::Positional => {
                found.push(Placeholder {
                    start: i,
                    end: i + 1,
                    ordinal: found.len() + 1,
                });
            }
            b'@' if style == MarkerStyle::AtNamed => {
                if matches!(bytes.get(i + 1), Some(b'p' | b'P')) {
                    if let Some((ordinal, end)) = read_digits(bytes, i + 2) {
                        found.push(Placeholder { start: i, end, ordinal });
                        i = end;
                        continue;
                    }
                }
            }
            b'$' if style == MarkerStyle::DollarNumbered => {
                if let Some((ordinal, end)) = read_digits(bytes, i + 1) {
                    found.push(Placeholder { start: i, end, ordinal });
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    found
}

/// Skip a quoted section starting at `start`; doubled quotes are escapes.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn read_digits(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == start {
        return None;
    }
    // Only ASCII digits were consumed, so this slice is valid UTF-8.
    let text = std::str::from_utf8(&bytes[start..end]).ok()?;
    text.parse::<usize>().ok().map(|n| (n, end))
}
