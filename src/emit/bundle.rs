//! Keyed bundle for the mobile client.
//!
//! Unlike the config files, queue and target fields are fully decoded here:
//! the client reads them as plain JSON arrays.

use super::OrderedMap;
use crate::model::LevelModel;
use crate::parser::Coord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleWorld {
    pub world_number: u32,
    pub world_name: String,
    /// Ascending.
    pub level_numbers: Vec<u32>,
}

/// A level keyed by its `unique_id`; the id is not repeated inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleLevel {
    pub world_number: u32,
    pub level_number: u32,
    pub queue: Vec<String>,
    pub target_gem: Vec<Coord>,
    pub difficulty: Option<i64>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bundle {
    pub worlds: Vec<BundleWorld>,
    pub levels: OrderedMap<String, BundleLevel>,
}

pub fn build(model: &LevelModel) -> Bundle {
    let worlds = model
        .worlds
        .iter()
        .map(|world| BundleWorld {
            world_number: world.world_number,
            world_name: world.world_name.clone(),
            level_numbers: model
                .levels_in(world.world_number)
                .map(|l| l.level_number())
                .collect(),
        })
        .collect();

    let levels = model
        .levels
        .iter()
        .map(|level| {
            (
                level.unique_id().to_string(),
                BundleLevel {
                    world_number: level.world_number(),
                    level_number: level.level_number(),
                    queue: level.queue.clone(),
                    target_gem: level.target_gem.clone(),
                    difficulty: level.difficulty,
                    comments: level.comments.clone(),
                },
            )
        })
        .collect();

    Bundle {
        worlds,
        levels: OrderedMap(levels),
    }
}
