//! One compilation run, start to finish.
//!
//! ```text
//! sources ──► load_model ──► check_model ──► render_all ──► lock + write_tree
//!   (csv)      (model)        (validate)       (emit)          (output)
//! ```
//!
//! Every failure before the last step leaves the output directory untouched.

use crate::config::Config;
use crate::emit::render_all;
use crate::errors::CompileResult;
use crate::model::LevelModel;
use crate::output::{self, OutputLock};
use crate::source::load_model;
use crate::validate::check_model;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

/// Summary of a successful run, printed as JSON by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub worlds: usize,
    pub levels: usize,
    pub output_dir: PathBuf,
    pub files: Vec<String>,
    /// SHA-256 over the written tree; equal inputs give equal fingerprints.
    pub fingerprint: String,
}

/// Load and validate without writing anything.
pub fn check(config: &Config) -> CompileResult<LevelModel> {
    let sources = &config.sources;
    let model = load_model(
        &sources.levels,
        &sources.worlds,
        &config.validation.row_rules(),
    )?;
    check_model(&model, &config.validation.sequence_rules())?;
    info!(
        "validated {} worlds and {} levels",
        model.worlds.len(),
        model.levels.len()
    );
    Ok(model)
}

/// Run the whole pipeline and rebuild the output tree.
pub fn compile(config: &Config) -> CompileResult<CompileReport> {
    let model = check(config)?;
    let artifacts = render_all(&model, &config.output)?;

    let dir = &config.output.dir;
    let _lock = OutputLock::acquire(dir)?;
    output::write_tree(dir, &artifacts)?;

    let report = CompileReport {
        worlds: model.worlds.len(),
        levels: model.levels.len(),
        output_dir: dir.clone(),
        files: artifacts.iter().map(|a| a.name.clone()).collect(),
        fingerprint: output::fingerprint(&artifacts),
    };
    info!(
        "compiled {} levels into {} (fingerprint {})",
        report.levels,
        dir.display(),
        &report.fingerprint[..12]
    );
    Ok(report)
}
