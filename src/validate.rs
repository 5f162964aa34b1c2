//! Sequence validation: the single gate between ingestion and output.
//!
//! Worlds must be numbered `1..N`. Within each world, levels must be
//! numbered `1..M` with no gaps or repeats. Both inputs must already be
//! sorted (see [`LevelModel::new`]).

use crate::errors::{CompileError, CompileResult, SequenceGap};
use crate::model::{LevelModel, LevelRecord, World};
use std::collections::HashSet;

/// Model-level checks beyond the numbering walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRules {
    /// Reject declared worlds that have no levels.
    pub require_levels_in_every_world: bool,
}

impl Default for SequenceRules {
    fn default() -> Self {
        Self {
            require_levels_in_every_world: true,
        }
    }
}

/// `true` when both numbering walks pass.
pub fn validate(levels: &[LevelRecord], worlds: &[World]) -> bool {
    check_sequence(levels, worlds).is_ok()
}

/// Run both numbering walks and report the first offending record.
///
/// The level walk tracks the current world and an expected level. A change
/// of world moves the walk to that world and restarts the level count; it
/// is not an error on its own. Only a level number that differs from the
/// expected one fails. A declared world with no levels is therefore not
/// caught here; [`check_model`] covers that case.
pub fn check_sequence(levels: &[LevelRecord], worlds: &[World]) -> Result<(), SequenceGap> {
    for (idx, world) in worlds.iter().enumerate() {
        let expected = idx as u32 + 1;
        if world.world_number != expected {
            return Err(SequenceGap::World {
                expected,
                actual: world.world_number,
            });
        }
    }

    let mut current_world = 0;
    let mut expected_level = 1;
    for level in levels {
        if level.world_number() != current_world {
            current_world = level.world_number();
            expected_level = 1;
        }
        if level.level_number() != expected_level {
            return Err(SequenceGap::Level {
                unique_id: level.unique_id().to_string(),
                expected: expected_level,
                actual: level.level_number(),
            });
        }
        expected_level += 1;
    }
    Ok(())
}

/// Full validation of a sorted model.
///
/// Order of checks: duplicate worlds, world numbering, levels pointing at
/// undeclared worlds, empty worlds (per `rules`), level numbering.
pub fn check_model(model: &LevelModel, rules: &SequenceRules) -> CompileResult<()> {
    let mut declared = HashSet::with_capacity(model.worlds.len());
    for world in &model.worlds {
        if !declared.insert(world.world_number) {
            return Err(CompileError::DuplicateWorld {
                world_number: world.world_number,
            });
        }
    }

    check_sequence(&[], &model.worlds)?;

    for level in &model.levels {
        if !declared.contains(&level.world_number()) {
            return Err(CompileError::UnknownWorld {
                unique_id: level.unique_id().to_string(),
                world_number: level.world_number(),
            });
        }
    }

    if rules.require_levels_in_every_world {
        let populated: HashSet<u32> = model.levels.iter().map(|l| l.world_number()).collect();
        if let Some(world) = model
            .worlds
            .iter()
            .find(|w| !populated.contains(&w.world_number))
        {
            return Err(SequenceGap::EmptyWorld {
                world_number: world.world_number,
            }
            .into());
        }
    }

    check_sequence(&model.levels, &model.worlds)?;
    Ok(())
}
