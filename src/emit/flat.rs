//! Flat list: one denormalized entry per level, for consumers that do not
//! want nesting.

use crate::model::LevelModel;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatLevel {
    pub world_number: u32,
    pub world_name: String,
    pub level_number: u32,
    pub unique_id: String,
}

pub fn build(model: &LevelModel) -> Vec<FlatLevel> {
    model
        .levels
        .iter()
        .map(|level| FlatLevel {
            world_number: level.world_number(),
            world_name: model
                .world(level.world_number())
                .map(|w| w.world_name.clone())
                .unwrap_or_default(),
            level_number: level.level_number(),
            unique_id: level.unique_id().to_string(),
        })
        .collect()
}
