//! # Gemlevels - Puzzle Level Data Compiler
//!
//! Gemlevels turns the level-design spreadsheets of a falling-piece puzzle game
//! into validated, machine-consumable level assets. Designers author worlds and
//! levels in two tables; every run reads both, checks them, and writes one
//! consistent output tree for the game clients.
//!
//! ## Features
//!
//! - **Embedded Field Decoding**: Piece queues in two textual dialects and target patterns in the editor's `Vector2i(x, y)` syntax.
//! - **Sequential Numbering Gate**: Worlds `1..N`, levels `1..M` per world; the first offending record is named in the diagnostic.
//! - **Four Output Formats**: Per-level config files, a nested index, a flat list, and a fully decoded keyed bundle, all sharing ids and ordering.
//! - **Abort Before Write**: Any failure leaves the previous output tree untouched.
//! - **Live Regeneration**: Optional watch mode with debounced, non-overlapping reruns.
//! - **Handoff**: Copy or move the finished tree into a game's asset directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemlevels::config::Config;
//! use gemlevels::compiler::compile;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("gemlevels.toml").await?;
//!     let report = compile(&config)?;
//!     println!("{} levels -> {}", report.levels, report.output_dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`parser`] - Queue and coordinate micro-format decoding
//! - [`pieces`] - Piece vocabulary and rotation geometry
//! - [`model`] - Worlds, level records and row conversion
//! - [`source`] - CSV ingestion
//! - [`validate`] - Sequence and reference validation
//! - [`emit`] - Rendering of the four output formats
//! - [`output`] - Output tree lifecycle and handoff
//! - [`compiler`] - A single end-to-end run
//! - [`watch`] - Live regeneration
//! - [`config`] - Configuration management
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CSV sources    │ ← levels + worlds tables
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Model +        │ ← parse fields, derive ids, check numbering
//! │  Validation     │
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Emitters       │ ← cfg files, index, flat list, bundle
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Output tree    │ ← locked staged swap, optional handoff
//! └─────────────────┘
//! ```

pub mod compiler;
pub mod config;
pub mod emit;
pub mod errors;
pub mod logutil;
pub mod model;
pub mod output;
pub mod parser;
pub mod pieces;
pub mod source;
pub mod validate;
pub mod watch;

pub use errors::{CompileError, CompileResult, SequenceGap};
