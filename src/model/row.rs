//! Conversion of raw spreadsheet rows into model records.

use super::{LevelRecord, World};
use crate::errors::{CompileError, CompileResult};
use crate::logutil::preview;
use std::collections::HashMap;

/// One spreadsheet row: header name -> cell text.
pub type RawRow = HashMap<String, String>;

/// Per-row checks that can be relaxed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRules {
    /// Every queue entry must name a piece in the geometry table.
    pub strict_pieces: bool,
    /// Repeated target cells are an authoring error rather than noise.
    pub reject_duplicate_cells: bool,
}

impl Default for RowRules {
    fn default() -> Self {
        Self {
            strict_pieces: true,
            reject_duplicate_cells: true,
        }
    }
}

/// [`build_level_record_with`] using [`RowRules::default`].
pub fn build_level_record(row: &RawRow) -> CompileResult<Option<LevelRecord>> {
    build_level_record_with(row, &RowRules::default())
}

/// Build a level from a `levels` row.
///
/// Returns `Ok(None)` when `world_number` or `level_number` is blank: the row
/// is a placeholder that has not been authored yet. Any `unique_id` column is
/// ignored; the id is always derived.
pub fn build_level_record_with(row: &RawRow, rules: &RowRules) -> CompileResult<Option<LevelRecord>> {
    let Some(world_number) = positive_cell(row, "world_number")? else {
        return Ok(None);
    };
    let Some(level_number) = positive_cell(row, "level_number")? else {
        return Ok(None);
    };
    let id = super::unique_id(world_number, level_number);

    let raw_queue = required_cell(row, "metadata_queue", &id)?;
    let raw_target = required_cell(row, "metadata_target_gem", &id)?;

    let difficulty = match non_empty(row, "difficulty") {
        Some(text) => Some(text.trim().parse::<i64>().map_err(|e| CompileError::MalformedField {
            unique_id: Some(id.clone()),
            field: "difficulty",
            reason: e.to_string(),
            raw: preview(text),
        })?),
        None => None,
    };
    let comments = non_empty(row, "comments").map(str::to_string);

    let record = LevelRecord::parse(world_number, level_number, raw_queue, raw_target, rules)?
        .with_difficulty(difficulty)
        .with_comments(comments);
    Ok(Some(record))
}

/// Build a world from a `worlds` row. Blank `world_number` rows yield `None`.
pub fn build_world(row: &RawRow) -> CompileResult<Option<World>> {
    let Some(world_number) = positive_cell(row, "world_number")? else {
        return Ok(None);
    };
    let world_name = row.get("world_name").cloned().unwrap_or_default();
    Ok(Some(World::new(world_number, world_name)))
}

/// Cell text when present and not just whitespace.
fn non_empty<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn required_cell<'a>(row: &'a RawRow, column: &'static str, id: &str) -> CompileResult<&'a str> {
    non_empty(row, column).ok_or_else(|| CompileError::MalformedField {
        unique_id: Some(id.to_string()),
        field: column,
        reason: "missing value".into(),
        raw: String::new(),
    })
}

/// Parse a 1-based number. Blank is `None`; anything else that is not a
/// positive integer is malformed.
fn positive_cell(row: &RawRow, column: &'static str) -> CompileResult<Option<u32>> {
    let Some(text) = non_empty(row, column) else {
        return Ok(None);
    };
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        Ok(_) => Err(CompileError::MalformedField {
            unique_id: None,
            field: column,
            reason: "must be a positive integer".into(),
            raw: preview(text),
        }),
        Err(e) => Err(CompileError::MalformedField {
            unique_id: None,
            field: column,
            reason: e.to_string(),
            raw: preview(text),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn level_row(world: &str, level: &str) -> RawRow {
        row(&[
            ("unique_id", "999_999"),
            ("world_number", world),
            ("level_number", level),
            ("metadata_queue", r#"["square", "u"]"#),
            ("metadata_target_gem", "[Vector2i(1, 2), Vector2i(3, 4)]"),
            ("difficulty", ""),
            ("comments", ""),
        ])
    }

    #[test]
    fn builds_a_complete_level() {
        let mut r = level_row("1", "3");
        r.insert("difficulty".into(), " 4 ".into());
        r.insert("comments".into(), "tricky\nsecond line".into());
        let rec = build_level_record(&r).unwrap().unwrap();
        assert_eq!(rec.unique_id(), "1_3");
        assert_eq!(rec.difficulty, Some(4));
        assert_eq!(rec.comments.as_deref(), Some("tricky\nsecond line"));
    }

    #[test]
    fn ignores_authored_unique_id() {
        let rec = build_level_record(&level_row("2", "5")).unwrap().unwrap();
        assert_eq!(rec.unique_id(), "2_5");
    }

    #[test]
    fn blank_optionals_become_none() {
        let rec = build_level_record(&level_row("1", "1")).unwrap().unwrap();
        assert_eq!(rec.difficulty, None);
        assert_eq!(rec.comments, None);

        let mut r = level_row("1", "1");
        r.remove("difficulty");
        r.remove("comments");
        let rec = build_level_record(&r).unwrap().unwrap();
        assert_eq!(rec.difficulty, None);
    }

    #[test]
    fn unnumbered_rows_are_skipped() {
        assert!(build_level_record(&level_row("", "1")).unwrap().is_none());
        assert!(build_level_record(&level_row("1", "  ")).unwrap().is_none());
        let mut r = level_row("1", "1");
        r.remove("world_number");
        assert!(build_level_record(&r).unwrap().is_none());
    }

    #[test]
    fn non_positive_numbers_are_malformed() {
        for bad in ["0", "-2", "one", "1.5"] {
            let err = build_level_record(&level_row("1", bad)).unwrap_err();
            assert!(
                matches!(err, CompileError::MalformedField { field: "level_number", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn missing_metadata_is_malformed() {
        let mut r = level_row("1", "1");
        r.insert("metadata_target_gem".into(), "".into());
        let err = build_level_record(&r).unwrap_err();
        assert!(err.to_string().contains("metadata_target_gem"));
        assert!(err.to_string().contains("1_1"));
    }

    #[test]
    fn bad_difficulty_is_malformed() {
        let mut r = level_row("1", "1");
        r.insert("difficulty".into(), "hard".into());
        assert!(matches!(
            build_level_record(&r).unwrap_err(),
            CompileError::MalformedField { field: "difficulty", .. }
        ));
    }

    #[test]
    fn world_name_passes_verbatim() {
        let w = build_world(&row(&[("world_number", " 3"), ("world_name", "  Crystal Caves ")]))
            .unwrap()
            .unwrap();
        assert_eq!(w.world_number, 3);
        assert_eq!(w.world_name, "  Crystal Caves ");
        assert!(build_world(&row(&[("world_number", ""), ("world_name", "x")]))
            .unwrap()
            .is_none());
        assert!(build_world(&row(&[("world_number", "zero")])).is_err());
    }
}
