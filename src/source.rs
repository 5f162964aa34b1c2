//! Spreadsheet ingestion.
//!
//! Both tables are CSV exports with a header row. Rows are read wholesale,
//! turned into [`RawRow`] maps keyed by trimmed header name, then converted
//! into model records. Short rows are tolerated: absent trailing cells are
//! simply missing from the map.

use crate::errors::{CompileError, CompileResult, Table};
use crate::model::{build_level_record_with, build_world, LevelModel, RawRow, RowRules};
use log::debug;
use std::path::Path;

/// Read every data row of a CSV file.
pub fn read_rows(path: &Path, table: Table) -> CompileResult<Vec<RawRow>> {
    if !path.is_file() {
        return Err(CompileError::MissingSource {
            table,
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    debug!("read {} {} rows from {}", rows.len(), table, path.display());
    Ok(rows)
}

/// Read, convert and sort both tables.
///
/// Fails with [`CompileError::EmptyInput`] if either table has no usable
/// rows once placeholder rows are dropped.
pub fn load_model(levels_path: &Path, worlds_path: &Path, rules: &RowRules) -> CompileResult<LevelModel> {
    let level_rows = read_rows(levels_path, Table::Levels)?;
    let world_rows = read_rows(worlds_path, Table::Worlds)?;

    let mut levels = Vec::with_capacity(level_rows.len());
    for (idx, row) in level_rows.iter().enumerate() {
        match build_level_record_with(row, rules)? {
            Some(level) => levels.push(level),
            // +2: header line plus 1-based numbering, matching the spreadsheet
            None => debug!("skipping unnumbered levels row {}", idx + 2),
        }
    }

    let mut worlds = Vec::with_capacity(world_rows.len());
    for (idx, row) in world_rows.iter().enumerate() {
        match build_world(row)? {
            Some(world) => worlds.push(world),
            None => debug!("skipping unnumbered worlds row {}", idx + 2),
        }
    }

    if levels.is_empty() {
        return Err(CompileError::EmptyInput {
            table: Table::Levels,
            path: levels_path.to_path_buf(),
        });
    }
    if worlds.is_empty() {
        return Err(CompileError::EmptyInput {
            table: Table::Worlds,
            path: worlds_path.to_path_buf(),
        });
    }

    Ok(LevelModel::new(worlds, levels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LEVELS: &str = "unique_id,world_number,level_number,metadata_queue,metadata_target_gem,difficulty,comments\n\
1_2,1,2,\"[\"\"t\"\"]\",\"[Vector2i(0, 0)]\",,\n\
1_1,1,1,\"[\"\"square\"\", \"\"u\"\"]\",\"[Vector2i(1, 2), Vector2i(3, 4)]\",2,\"first, easy\"\n\
,,,,,,\n";

    const WORLDS: &str = "world_number,world_name\n1,Meadow\n";

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn reads_quoted_cells_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let levels = write(tmp.path(), "levels.csv", LEVELS);
        let worlds = write(tmp.path(), "worlds.csv", WORLDS);
        let model = load_model(&levels, &worlds, &RowRules::default()).unwrap();

        assert_eq!(model.levels.len(), 2);
        let first = &model.levels[0];
        assert_eq!(first.unique_id(), "1_1");
        assert_eq!(first.raw_queue, r#"["square", "u"]"#);
        assert_eq!(first.comments.as_deref(), Some("first, easy"));
        assert_eq!(model.worlds[0].world_name, "Meadow");
    }

    #[test]
    fn short_rows_are_tolerated() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "w.csv", "world_number,world_name\n1\n2,Second\n");
        let rows = read_rows(&p, Table::Worlds).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].contains_key("world_name"));
        assert_eq!(rows[1]["world_name"], "Second");
    }

    #[test]
    fn missing_file_is_reported_per_table() {
        let tmp = tempfile::tempdir().unwrap();
        let levels = write(tmp.path(), "levels.csv", LEVELS);
        let err = load_model(&levels, &tmp.path().join("nope.csv"), &RowRules::default()).unwrap_err();
        assert!(matches!(err, CompileError::MissingSource { table: Table::Worlds, .. }));
    }

    #[test]
    fn header_only_tables_are_empty_input() {
        let tmp = tempfile::tempdir().unwrap();
        let levels = write(tmp.path(), "levels.csv", LEVELS);
        let worlds = write(tmp.path(), "worlds.csv", "world_number,world_name\n");
        let err = load_model(&levels, &worlds, &RowRules::default()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyInput { table: Table::Worlds, .. }));

        let placeholders = write(
            tmp.path(),
            "placeholders.csv",
            "unique_id,world_number,level_number,metadata_queue,metadata_target_gem\n,,,,\n",
        );
        let worlds = write(tmp.path(), "worlds2.csv", WORLDS);
        let err = load_model(&placeholders, &worlds, &RowRules::default()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyInput { table: Table::Levels, .. }));
    }
}
