//! # Level Model
//!
//! In-memory representation of one compilation run: the worlds table and
//! every authored level, both sorted. The model lives only for the duration
//! of a run; nothing here is persisted directly.
//!
//! - [`World`] - a named, numbered group of levels
//! - [`LevelRecord`] - one puzzle: piece queue plus target pattern
//! - [`LevelModel`] - both tables, sorted by number
//!
//! Rows are converted by the functions in [`row`].

pub mod row;

use crate::errors::{CompileError, CompileResult};
use crate::logutil::preview;
use crate::parser::{self, Coord};
use crate::pieces::PieceType;
use std::collections::HashSet;

pub use row::{build_level_record, build_level_record_with, build_world, RawRow, RowRules};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub world_number: u32,
    pub world_name: String,
}

impl World {
    pub fn new(world_number: u32, world_name: impl Into<String>) -> Self {
        Self {
            world_number,
            world_name: world_name.into(),
        }
    }
}

/// One authored level.
///
/// The identity fields are private so `unique_id` can never drift from the
/// `(world_number, level_number)` pair it is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    world_number: u32,
    level_number: u32,
    unique_id: String,
    /// Piece names in play order; duplicates allowed.
    pub queue: Vec<String>,
    /// Target pattern cells, all non-negative.
    pub target_gem: Vec<Coord>,
    /// Queue field exactly as authored.
    pub raw_queue: String,
    /// Target field exactly as authored.
    pub raw_target_gem: String,
    pub difficulty: Option<i64>,
    pub comments: Option<String>,
}

impl LevelRecord {
    /// Decode both embedded fields and build a record.
    ///
    /// Rejects an undecodable or empty queue, an empty or negative target
    /// pattern, and (per `rules`) duplicate cells or unknown piece names.
    pub fn parse(
        world_number: u32,
        level_number: u32,
        raw_queue: &str,
        raw_target_gem: &str,
        rules: &RowRules,
    ) -> CompileResult<Self> {
        let unique_id = unique_id(world_number, level_number);
        let malformed = |field: &'static str, reason: String, raw: &str| CompileError::MalformedField {
            unique_id: Some(unique_id.clone()),
            field,
            reason,
            raw: preview(raw),
        };

        let queue = parser::parse_piece_queue(raw_queue)
            .map_err(|e| malformed("queue", e.to_string(), raw_queue))?;
        if queue.is_empty() {
            return Err(malformed("queue", "queue is empty".into(), raw_queue));
        }
        if rules.strict_pieces {
            if let Some(piece) = queue.iter().find(|p| PieceType::from_name(p).is_none()) {
                return Err(CompileError::UnknownPiece {
                    unique_id: unique_id.clone(),
                    piece: piece.clone(),
                });
            }
        }

        let target_gem = parser::parse_coordinate_list(raw_target_gem)
            .map_err(|e| malformed("target_gem", e.to_string(), raw_target_gem))?;
        if target_gem.is_empty() {
            return Err(malformed(
                "target_gem",
                "no coordinates found".into(),
                raw_target_gem,
            ));
        }
        if let Some(&(x, y)) = target_gem.iter().find(|&&(x, y)| x < 0 || y < 0) {
            return Err(malformed(
                "target_gem",
                format!("negative coordinate ({x}, {y})"),
                raw_target_gem,
            ));
        }
        if rules.reject_duplicate_cells {
            let mut seen = HashSet::with_capacity(target_gem.len());
            if let Some(&(x, y)) = target_gem.iter().find(|c| !seen.insert(**c)) {
                return Err(malformed(
                    "target_gem",
                    format!("duplicate coordinate ({x}, {y})"),
                    raw_target_gem,
                ));
            }
        }

        Ok(Self {
            world_number,
            level_number,
            unique_id,
            queue,
            target_gem,
            raw_queue: raw_queue.to_string(),
            raw_target_gem: raw_target_gem.to_string(),
            difficulty: None,
            comments: None,
        })
    }

    pub fn with_difficulty(mut self, difficulty: Option<i64>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_comments(mut self, comments: Option<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn world_number(&self) -> u32 {
        self.world_number
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Name of the per-level config file, `<world>_<level>.cfg`.
    pub fn file_name(&self) -> String {
        format!("{}.cfg", self.unique_id)
    }
}

/// `"<world_number>_<level_number>"`.
pub fn unique_id(world_number: u32, level_number: u32) -> String {
    format!("{world_number}_{level_number}")
}

/// Worlds and levels of one run, each sorted ascending by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelModel {
    pub worlds: Vec<World>,
    pub levels: Vec<LevelRecord>,
}

impl LevelModel {
    /// Sort both tables into validation order.
    pub fn new(mut worlds: Vec<World>, mut levels: Vec<LevelRecord>) -> Self {
        worlds.sort_by_key(|w| w.world_number);
        levels.sort_by_key(|l| (l.world_number, l.level_number));
        Self { worlds, levels }
    }

    pub fn world(&self, world_number: u32) -> Option<&World> {
        self.worlds.iter().find(|w| w.world_number == world_number)
    }

    /// Levels of one world in level order.
    pub fn levels_in(&self, world_number: u32) -> impl Iterator<Item = &LevelRecord> {
        self.levels
            .iter()
            .filter(move |l| l.world_number == world_number)
    }
}
