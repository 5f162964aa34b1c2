//! # Field Parser
//!
//! Decodes the two micro-formats embedded in level rows:
//!
//! - **Piece queues** such as `["square", "u"]`. Authors paste these from the
//!   game editor, but spreadsheet round-trips sometimes strip the quotes and
//!   leave `[square, u]`. Both dialects are accepted: strict JSON is tried
//!   first, then a permissive bare-word list. See [`QUEUE_DIALECTS`].
//! - **Coordinate lists** such as `[Vector2i(1, 2), Vector2i(3, 4)]`, written
//!   in the level editor's constructor syntax. Only the `(x, y)` pairs are
//!   extracted; the constructor name is never interpreted.
//!
//! Both entry points are pure: same string in, same sequence out.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// One `(x, y)` cell on the puzzle grid, as written by the author.
pub type Coord = (i32, i32);

/// A queue field that no dialect could decode. Carries each dialect's
/// rejection reason in the order they were tried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no queue dialect accepted the field ({})", summarize(.attempts))]
pub struct MalformedQueue {
    pub attempts: Vec<(&'static str, String)>,
}

fn summarize(attempts: &[(&'static str, String)]) -> String {
    attempts
        .iter()
        .map(|(name, why)| format!("{name}: {why}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A coordinate literal whose numbers do not fit a grid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("coordinate '{literal}' is out of range")]
pub struct MalformedCoordinates {
    pub literal: String,
}

/// One textual encoding of a piece queue.
pub trait QueueDialect: Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Decode `raw`, or explain why this dialect does not apply.
    fn decode(&self, raw: &str) -> Result<Vec<String>, String>;
}

/// `["square", "u"]`: a JSON array of strings.
pub struct JsonListDialect;

impl QueueDialect for JsonListDialect {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, raw: &str) -> Result<Vec<String>, String> {
        let names: Vec<String> = serde_json::from_str(raw.trim()).map_err(|e| e.to_string())?;
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            if !is_piece_token(name) {
                return Err(format!("'{name}' is not a piece name"));
            }
            out.push(name.to_string());
        }
        Ok(out)
    }
}

/// `[square, u]` or `['square', "u"]`: a bracketed, comma-separated list
/// whose items may or may not be quoted.
pub struct BareListDialect;

impl QueueDialect for BareListDialect {
    fn name(&self) -> &'static str {
        "bare"
    }

    fn decode(&self, raw: &str) -> Result<Vec<String>, String> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| "not a bracketed list".to_string())?;
        if inner.contains(['[', ']']) {
            return Err("nested brackets".to_string());
        }

        let mut out = Vec::new();
        for segment in inner.split(',') {
            let token = unquote(segment.trim()).trim();
            if token.is_empty() {
                continue;
            }
            if !is_piece_token(token) {
                return Err(format!("'{token}' is not a piece name"));
            }
            out.push(token.to_string());
        }
        Ok(out)
    }
}

/// Dialects in priority order. The first one that decodes wins.
pub static QUEUE_DIALECTS: [&dyn QueueDialect; 2] = [&JsonListDialect, &BareListDialect];

/// Decode a piece queue, accepting any dialect in [`QUEUE_DIALECTS`].
///
/// Order and duplicates are preserved: the queue is the play order.
pub fn parse_piece_queue(raw: &str) -> Result<Vec<String>, MalformedQueue> {
    parse_piece_queue_with(raw, &QUEUE_DIALECTS)
}

/// Decode a piece queue with an explicit dialect chain.
pub fn parse_piece_queue_with(
    raw: &str,
    dialects: &[&dyn QueueDialect],
) -> Result<Vec<String>, MalformedQueue> {
    let mut attempts = Vec::with_capacity(dialects.len());
    for dialect in dialects {
        match dialect.decode(raw) {
            Ok(names) => return Ok(names),
            Err(why) => attempts.push((dialect.name(), why)),
        }
    }
    Err(MalformedQueue { attempts })
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:[A-Za-z_][A-Za-z0-9_]*)?\s*\(\s*(-?\d+)\s*,\s*(-?\d+)\s*\)")
            .expect("coordinate pattern is valid")
    })
}

/// Extract every `Name(x, y)` pair from `raw`, in source order.
///
/// Input without any such literal yields an empty list; deciding whether an
/// empty pattern is acceptable is the caller's job. Duplicates and negative
/// values are returned as written.
pub fn parse_coordinate_list(raw: &str) -> Result<Vec<Coord>, MalformedCoordinates> {
    coordinate_pattern()
        .captures_iter(raw)
        .map(|caps| {
            let x = caps[1].parse::<i32>();
            let y = caps[2].parse::<i32>();
            match (x, y) {
                (Ok(x), Ok(y)) => Ok((x, y)),
                _ => Err(MalformedCoordinates {
                    literal: caps[0].to_string(),
                }),
            }
        })
        .collect()
}

fn unquote(token: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = token
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner;
        }
    }
    token
}

fn is_piece_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_dialect_is_tried_first() {
        assert_eq!(
            parse_piece_queue(r#"["square", "u"]"#).unwrap(),
            vec!["square", "u"]
        );
    }

    #[test]
    fn bare_words_fall_back() {
        assert_eq!(parse_piece_queue("[square, u]").unwrap(), vec!["square", "u"]);
        assert_eq!(
            parse_piece_queue("  [ 'upper_l' ,lower_z, \"t\" ]  ").unwrap(),
            vec!["upper_l", "lower_z", "t"]
        );
    }

    #[test]
    fn order_and_duplicates_survive() {
        assert_eq!(
            parse_piece_queue(r#"["t", "square", "t"]"#).unwrap(),
            vec!["t", "square", "t"]
        );
    }

    #[test]
    fn empty_list_is_a_valid_token_list() {
        assert!(parse_piece_queue("[]").unwrap().is_empty());
        assert!(parse_piece_queue("[ ]").unwrap().is_empty());
    }

    #[test]
    fn unbracketed_or_nested_input_is_rejected() {
        let err = parse_piece_queue("square, u").unwrap_err();
        assert_eq!(err.attempts.len(), 2);
        assert_eq!(err.attempts[0].0, "json");
        assert_eq!(err.attempts[1].0, "bare");

        assert!(parse_piece_queue("[[square], u]").is_err());
        assert!(parse_piece_queue("").is_err());
        assert!(parse_piece_queue("[square u]").is_err());
    }

    #[test]
    fn json_with_non_strings_falls_through_to_bare_and_fails() {
        assert!(parse_piece_queue("[1, {}]").is_err());
    }

    #[test]
    fn custom_chain_only_uses_listed_dialects() {
        let strict: [&dyn QueueDialect; 1] = [&JsonListDialect];
        assert!(parse_piece_queue_with("[square]", &strict).is_err());
        assert_eq!(
            parse_piece_queue_with(r#"["square"]"#, &strict).unwrap(),
            vec!["square"]
        );
    }

    #[test]
    fn extracts_constructor_literals() {
        assert_eq!(
            parse_coordinate_list("[Vector2i(1, 2), Vector2i(3, 4)]").unwrap(),
            vec![(1, 2), (3, 4)]
        );
    }

    #[test]
    fn tolerates_whitespace_and_other_constructor_names() {
        let raw = "  [ Vector2i( 0 ,0 ),\n  Point(10,  2) , [Vector2i(5,6)] ]  ";
        assert_eq!(
            parse_coordinate_list(raw).unwrap(),
            vec![(0, 0), (10, 2), (5, 6)]
        );
    }

    #[test]
    fn no_literals_is_empty_not_error() {
        assert!(parse_coordinate_list("[]").unwrap().is_empty());
        assert!(parse_coordinate_list("nothing here").unwrap().is_empty());
        assert!(parse_coordinate_list("").unwrap().is_empty());
    }

    #[test]
    fn negatives_and_duplicates_are_returned_verbatim() {
        assert_eq!(
            parse_coordinate_list("[Vector2i(-1, 2), Vector2i(-1, 2)]").unwrap(),
            vec![(-1, 2), (-1, 2)]
        );
    }

    #[test]
    fn overflowing_numbers_are_malformed() {
        let err = parse_coordinate_list("[Vector2i(99999999999, 1)]").unwrap_err();
        assert!(err.literal.contains("99999999999"));
    }
}
