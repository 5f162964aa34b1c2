//! # Multi-Format Emitter
//!
//! Renders a validated [`LevelModel`] into the four output formats, all in
//! model order (world number, then level number):
//!
//! | Format | Module | File |
//! |---|---|---|
//! | Per-level config, raw fields | [`cfg`] | `<world>_<level>.cfg` |
//! | Nested index by world | [`index`] | [`OutputLayout::index_file`] |
//! | Flat level list | [`flat`] | [`OutputLayout::flat_file`] |
//! | Keyed bundle, decoded fields | [`bundle`] | [`OutputLayout::bundle_file`] |
//!
//! Rendering is pure and happens entirely in memory. Writing the resulting
//! [`Artifact`]s is the job of [`crate::output`].

pub mod bundle;
pub mod cfg;
pub mod flat;
pub mod index;

use crate::errors::CompileResult;
use crate::model::LevelModel;
use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

/// Where and how the output tree is written. Passed explicitly to every run
/// so separate runs can target separate directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    pub dir: PathBuf,
    pub index_file: String,
    pub flat_file: String,
    pub bundle_file: String,
    /// Spaces per JSON nesting level.
    pub json_indent: usize,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("puzzle_mode_levels"),
            index_file: "index.json".to_string(),
            flat_file: "levels.json".to_string(),
            bundle_file: "react_native_levels.json".to_string(),
            json_indent: 4,
        }
    }
}

impl OutputLayout {
    /// Default file names rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }
}

/// One rendered file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Render every output file for `model`.
///
/// Config files come first in level order, followed by the index, flat list
/// and bundle.
pub fn render_all(model: &LevelModel, layout: &OutputLayout) -> CompileResult<Vec<Artifact>> {
    let mut artifacts: Vec<Artifact> = model
        .levels
        .iter()
        .map(|level| Artifact {
            name: level.file_name(),
            bytes: cfg::render(level).into_bytes(),
        })
        .collect();

    artifacts.push(Artifact {
        name: layout.index_file.clone(),
        bytes: to_json(&index::build(model), layout.json_indent)?,
    });
    artifacts.push(Artifact {
        name: layout.flat_file.clone(),
        bytes: to_json(&flat::build(model), layout.json_indent)?,
    });
    artifacts.push(Artifact {
        name: layout.bundle_file.clone(),
        bytes: to_json(&bundle::build(model), layout.json_indent)?,
    });
    Ok(artifacts)
}

/// Pretty JSON with a fixed indent and a trailing newline.
pub fn to_json<T: Serialize>(value: &T, indent: usize) -> CompileResult<Vec<u8>> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// A JSON object that keeps insertion order instead of hash or key order,
/// so `"10"` follows `"9"`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V>(pub Vec<(K, V)>);

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LevelRecord, RowRules, World};

    pub(crate) fn sample_model() -> LevelModel {
        let rules = RowRules::default();
        let mut levels = Vec::new();
        for (w, l, q, t) in [
            (1, 1, r#"["square", "u"]"#, "[Vector2i(1, 2), Vector2i(3, 4)]"),
            (1, 2, "[t, t]", "[Vector2i(0, 0)]"),
            (2, 1, r#"["w"]"#, "[Vector2i(2, 2), Vector2i(2, 3)]"),
        ] {
            levels.push(LevelRecord::parse(w, l, q, t, &rules).unwrap());
        }
        levels[0].difficulty = Some(3);
        levels[1].comments = Some("two of the same".into());
        LevelModel::new(vec![World::new(1, "Meadow"), World::new(2, "Caves")], levels)
    }

    #[test]
    fn renders_configs_then_json_documents() {
        let model = sample_model();
        let artifacts = render_all(&model, &OutputLayout::default()).unwrap();
        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "1_1.cfg",
                "1_2.cfg",
                "2_1.cfg",
                "index.json",
                "levels.json",
                "react_native_levels.json"
            ]
        );
    }

    #[test]
    fn json_uses_configured_indent() {
        let bytes = to_json(&serde_json::json!({"a": [1]}), 4).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}\n");
    }

    #[test]
    fn ordered_map_keeps_insertion_order() {
        let map = OrderedMap(vec![("10", 1), ("9", 2), ("1", 3)]);
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"10":1,"9":2,"1":3}"#);
        assert_eq!(map.get(&"9"), Some(&2));
        assert_eq!(map.keys().count(), 3);
    }

    #[test]
    fn rendering_is_deterministic() {
        let model = sample_model();
        let a = render_all(&model, &OutputLayout::default()).unwrap();
        let b = render_all(&model, &OutputLayout::default()).unwrap();
        assert_eq!(a, b);
    }
}
