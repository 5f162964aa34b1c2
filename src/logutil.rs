//! Helpers for putting raw spreadsheet text into single-line logs and diagnostics.
//! Cells can hold newlines (multi-line comments) and arbitrarily long coordinate
//! lists; both would otherwise break log readability.

/// Longest preview emitted for a raw field, in characters.
pub const PREVIEW_CHARS: usize = 80;

/// Escape a raw cell for single-line output and cap it at [`PREVIEW_CHARS`].
pub fn preview(s: &str) -> String {
    preview_with(s, PREVIEW_CHARS)
}

/// Escape a raw cell for single-line output:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///
/// Anything longer than `max_chars` is cut with an ellipsis.
pub fn preview_with(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
