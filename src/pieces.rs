//! Piece vocabulary and rotation geometry.
//!
//! Each piece has four precomputed rotations, listed as `(x, y)` cells inside
//! a 3x3 box. Pieces with rotational symmetry repeat their variants so every
//! entry has exactly [`ROTATIONS`] of them.

use crate::parser::Coord;
use serde::Serialize;

pub const ROTATIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    UpperL,
    LowerZ,
    Square,
    U,
    UpperZ,
    T,
    W,
}

const UPPER_L: [&[Coord]; ROTATIONS] = [
    &[(0, 1), (1, 1), (2, 1)],
    &[(0, 2), (1, 1), (2, 0)],
    &[(1, 0), (1, 1), (1, 2)],
    &[(0, 0), (1, 1), (2, 2)],
];

const SQUARE_ROT0: &[Coord] = &[(0, 0), (0, 1), (1, 0), (1, 1)];
const SQUARE: [&[Coord]; ROTATIONS] = [SQUARE_ROT0, SQUARE_ROT0, SQUARE_ROT0, SQUARE_ROT0];

const U: [&[Coord]; ROTATIONS] = [
    &[(0, 0), (0, 1), (1, 0), (2, 0), (2, 1)],
    &[(1, 0), (1, 2), (2, 0), (2, 1), (2, 2)],
    &[(0, 1), (0, 2), (1, 2), (2, 1), (2, 2)],
    &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 2)],
];

const LOWER_Z_ROT0: &[Coord] = &[(0, 0), (0, 1), (1, 1), (1, 2)];
const LOWER_Z_ROT1: &[Coord] = &[(0, 1), (1, 0), (1, 1), (2, 0)];
const LOWER_Z: [&[Coord]; ROTATIONS] = [LOWER_Z_ROT0, LOWER_Z_ROT1, LOWER_Z_ROT0, LOWER_Z_ROT1];

const UPPER_Z_ROT0: &[Coord] = &[(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)];
const UPPER_Z_ROT1: &[Coord] = &[(0, 2), (1, 0), (1, 1), (1, 2), (2, 0)];
const UPPER_Z: [&[Coord]; ROTATIONS] = [UPPER_Z_ROT0, UPPER_Z_ROT1, UPPER_Z_ROT0, UPPER_Z_ROT1];

const W: [&[Coord]; ROTATIONS] = [
    &[(2, 0), (2, 1), (1, 1), (1, 2), (0, 2)],
    &[(2, 2), (1, 2), (1, 1), (0, 1), (0, 0)],
    &[(0, 2), (0, 1), (1, 1), (1, 0), (2, 0)],
    &[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)],
];

const T: [&[Coord]; ROTATIONS] = [
    &[(2, 0), (2, 1), (1, 1), (0, 1), (2, 2)],
    &[(2, 2), (1, 2), (1, 1), (1, 0), (0, 2)],
    &[(0, 2), (0, 1), (1, 1), (2, 1), (0, 0)],
    &[(0, 0), (1, 0), (1, 1), (1, 2), (2, 0)],
];

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::UpperL,
        PieceType::LowerZ,
        PieceType::Square,
        PieceType::U,
        PieceType::UpperZ,
        PieceType::T,
        PieceType::W,
    ];

    /// Name as authored in queue fields.
    pub fn name(&self) -> &'static str {
        match self {
            PieceType::UpperL => "upper_l",
            PieceType::LowerZ => "lower_z",
            PieceType::Square => "square",
            PieceType::U => "u",
            PieceType::UpperZ => "upper_z",
            PieceType::T => "t",
            PieceType::W => "w",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn rotations(&self) -> [&'static [Coord]; ROTATIONS] {
        match self {
            PieceType::UpperL => UPPER_L,
            PieceType::LowerZ => LOWER_Z,
            PieceType::Square => SQUARE,
            PieceType::U => U,
            PieceType::UpperZ => UPPER_Z,
            PieceType::T => T,
            PieceType::W => W,
        }
    }

    /// Cells covered by the piece (identical for every rotation).
    pub fn cell_count(&self) -> usize {
        self.rotations()[0].len()
    }
}

/// One row of the exported geometry table.
#[derive(Debug, Serialize)]
pub struct PieceGeometry {
    pub name: &'static str,
    pub rotations: Vec<Vec<Coord>>,
}

/// The whole table in vocabulary order, ready to serialize.
pub fn geometry_table() -> Vec<PieceGeometry> {
    PieceType::ALL
        .iter()
        .map(|p| PieceGeometry {
            name: p.name(),
            rotations: p.rotations().iter().map(|r| r.to_vec()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_round_trip() {
        for piece in PieceType::ALL {
            assert_eq!(PieceType::from_name(piece.name()), Some(piece));
        }
        assert_eq!(PieceType::from_name("Square"), None);
        assert_eq!(PieceType::from_name("l"), None);
    }

    #[test]
    fn every_rotation_keeps_cell_count_and_fits_the_box() {
        for piece in PieceType::ALL {
            let n = piece.cell_count();
            for rot in piece.rotations() {
                assert_eq!(rot.len(), n, "{} rotation size differs", piece.name());
                let unique: HashSet<_> = rot.iter().collect();
                assert_eq!(unique.len(), n, "{} has repeated cells", piece.name());
                assert!(rot.iter().all(|&(x, y)| (0..3).contains(&x) && (0..3).contains(&y)));
            }
        }
    }

    #[test]
    fn serde_name_matches_queue_name() {
        for piece in PieceType::ALL {
            let json = serde_json::to_string(&piece).unwrap();
            assert_eq!(json, format!("\"{}\"", piece.name()));
        }
    }

    #[test]
    fn table_lists_all_pieces() {
        let table = geometry_table();
        assert_eq!(table.len(), PieceType::ALL.len());
        assert!(table.iter().all(|row| row.rotations.len() == ROTATIONS));
    }
}
