//! Per-level config files for the primary game client.
//!
//! The queue and target fields are written exactly as authored, not
//! re-encoded from the parsed model, so the editor's own syntax reaches the
//! client byte for byte.

use crate::model::LevelRecord;

/// `[metadata]\nqueue=<raw>\ntarget_gem=<raw>`
pub fn render(level: &LevelRecord) -> String {
    format!(
        "[metadata]\nqueue={}\ntarget_gem={}",
        level.raw_queue, level.raw_target_gem
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowRules;

    #[test]
    fn writes_raw_fields_verbatim() {
        let raw_q = "[square,   u]";
        let raw_t = "[Vector2i(1,2),  Vector2i( 3, 4 )]";
        let level = LevelRecord::parse(1, 1, raw_q, raw_t, &RowRules::default()).unwrap();
        assert_eq!(
            render(&level),
            "[metadata]\nqueue=[square,   u]\ntarget_gem=[Vector2i(1,2),  Vector2i( 3, 4 )]"
        );
    }
}
