//! Test utilities & fixtures.
//! Provides access to the spreadsheet fixtures under `tests/test-data-int`.

use gemlevels::config::Config;
use gemlevels::emit::OutputLayout;
use std::path::{Path, PathBuf};

/// Return the path to the static integration test fixture directory.
/// Kept small & deterministic. Tests should copy to a temp dir if they mutate.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

/// A temp dir holding `ingestion/` copies of both fixture tables, plus a
/// config that reads them and writes to `<tmp>/out`.
pub fn workspace() -> (tempfile::TempDir, Config) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let ingestion = tmp.path().join("ingestion");
    std::fs::create_dir_all(&ingestion).unwrap();
    std::fs::copy(fixture_root().join("levels.csv"), ingestion.join("levels.csv")).unwrap();
    std::fs::copy(fixture_root().join("worlds.csv"), ingestion.join("worlds.csv")).unwrap();

    let mut config = Config::default();
    config.sources.levels = ingestion.join("levels.csv");
    config.sources.worlds = ingestion.join("worlds.csv");
    config.output = OutputLayout::in_dir(tmp.path().join("out"));
    (tmp, config)
}

/// Overwrite one of the workspace's source tables.
#[allow(dead_code)] // not every test binary rewrites sources
pub fn write_source(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write source");
}

#[allow(dead_code)]
pub const LEVELS_HEADER: &str =
    "unique_id,world_number,level_number,metadata_queue,metadata_target_gem,difficulty,comments\n";

/// Parse a JSON file from the output tree.
#[allow(dead_code)]
pub fn read_json(dir: &Path, name: &str) -> serde_json::Value {
    let text = std::fs::read_to_string(dir.join(name)).expect("read output json");
    serde_json::from_str(&text).expect("valid json")
}
