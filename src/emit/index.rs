//! Nested index: world number -> world info and its level files.

use super::OrderedMap;
use crate::model::LevelModel;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexLevel {
    pub unique_id: String,
    pub level_number: u32,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexWorld {
    pub world_number: u32,
    pub world_name: String,
    pub levels: Vec<IndexLevel>,
}

/// Keyed by the world number as a string. Every declared world appears,
/// even one with no levels.
pub type Index = OrderedMap<String, IndexWorld>;

pub fn build(model: &LevelModel) -> Index {
    OrderedMap(
        model
            .worlds
            .iter()
            .map(|world| {
                let levels = model
                    .levels_in(world.world_number)
                    .map(|level| IndexLevel {
                        unique_id: level.unique_id().to_string(),
                        level_number: level.level_number(),
                        file_name: level.file_name(),
                    })
                    .collect();
                (
                    world.world_number.to_string(),
                    IndexWorld {
                        world_number: world.world_number,
                        world_name: world.world_name.clone(),
                        levels,
                    },
                )
            })
            .collect(),
    )
}
