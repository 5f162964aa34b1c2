//! # Output Lifecycle
//!
//! Owns everything that touches the output tree on disk:
//!
//! - an exclusive lock so two runs never rebuild the same tree at once
//! - the staged replacement of the old tree by a freshly rendered one
//! - a content fingerprint for checking idempotent reruns
//! - handoff of a finished tree into a consuming application's asset directory
//!
//! Nothing here runs until validation and rendering have both succeeded.

use crate::emit::Artifact;
use crate::errors::{CompileError, CompileResult};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Held for the duration of a write. Dropping it releases the lock.
#[derive(Debug)]
pub struct OutputLock {
    file: File,
    path: PathBuf,
}

impl OutputLock {
    /// Take the lock for `dir` without blocking. The lock file sits next to
    /// the directory so replacing the directory never deletes it.
    pub fn acquire(dir: &Path) -> CompileResult<Self> {
        let path = lock_path(dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        if file.try_lock_exclusive().is_err() {
            return Err(CompileError::Locked {
                path: dir.to_path_buf(),
            });
        }
        debug!("acquired output lock {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// `<parent>/.<dir name>.lock`
pub fn lock_path(dir: &Path) -> PathBuf {
    sibling_path(dir, "lock")
}

/// `<parent>/.<dir name>.<suffix>`, next to `dir` on the same filesystem.
fn sibling_path(dir: &Path, suffix: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.join(format!(".{name}.{suffix}"))
}

/// Remove everything inside `dir`, creating it if it does not exist.
pub fn clear_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Replace the contents of `dir` with `artifacts`.
///
/// The new tree is written into a staging directory next to `dir` and then
/// renamed into place, so a failed write leaves the previous tree as it was.
pub fn write_tree(dir: &Path, artifacts: &[Artifact]) -> io::Result<()> {
    let staging = sibling_path(dir, "staging");
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;
    if let Err(e) = write_artifacts(&staging, artifacts) {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }
    swap_into_place(&staging, dir)?;
    info!("wrote {} files to {}", artifacts.len(), dir.display());
    Ok(())
}

fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> io::Result<()> {
    for artifact in artifacts {
        let mut file = File::create(dir.join(&artifact.name))?;
        file.write_all(&artifact.bytes)?;
        file.sync_all()?;
    }
    Ok(())
}

/// Rename `staging` to `dir`. An existing `dir` is parked beside it first
/// and put back if the final rename fails.
fn swap_into_place(staging: &Path, dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        return fs::rename(staging, dir);
    }
    let previous = sibling_path(dir, "previous");
    if previous.exists() {
        fs::remove_dir_all(&previous)?;
    }
    fs::rename(dir, &previous)?;
    if let Err(e) = fs::rename(staging, dir) {
        let _ = fs::rename(&previous, dir);
        let _ = fs::remove_dir_all(staging);
        return Err(e);
    }
    debug!("replaced {}", dir.display());
    fs::remove_dir_all(&previous)
}

/// SHA-256 over `(name, bytes)` pairs in name order, as lowercase hex.
pub fn fingerprint(artifacts: &[Artifact]) -> String {
    let mut sorted: Vec<&Artifact> = artifacts.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let mut hasher = Sha256::new();
    for artifact in sorted {
        hasher.update(artifact.name.as_bytes());
        hasher.update([0u8]);
        hasher.update((artifact.bytes.len() as u64).to_le_bytes());
        hasher.update(&artifact.bytes);
    }
    format!("{:x}", hasher.finalize())
}

/// Fingerprint a tree already on disk (regular files at the top level only).
pub fn fingerprint_dir(dir: &Path) -> io::Result<String> {
    let mut artifacts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            artifacts.push(Artifact {
                name: entry.file_name().to_string_lossy().into_owned(),
                bytes: fs::read(entry.path())?,
            });
        }
    }
    Ok(fingerprint(&artifacts))
}

/// How a finished tree reaches the consuming application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    #[default]
    Copy,
    Move,
}

/// Replace the contents of `target` with the tree at `source`.
///
/// `Move` renames when both sit on the same filesystem and falls back to
/// copy-then-remove otherwise. After a move, `source` no longer exists.
pub fn handoff(source: &Path, target: &Path, mode: DeployMode) -> io::Result<()> {
    if !source.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("output tree {} does not exist", source.display()),
        ));
    }
    info!(
        "handing {} to {} ({:?})",
        source.display(),
        target.display(),
        mode
    );
    match mode {
        DeployMode::Copy => {
            clear_dir(target)?;
            copy_dir_contents(source, target)
        }
        DeployMode::Move => {
            if target.exists() {
                fs::remove_dir_all(target)?;
            }
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            if fs::rename(source, target).is_ok() {
                return Ok(());
            }
            debug!("rename failed, falling back to copy for {}", source.display());
            fs::create_dir_all(target)?;
            copy_dir_contents(source, target)?;
            fs::remove_dir_all(source)
        }
    }
}

fn copy_dir_contents(source: &Path, target: &Path) -> io::Result<()> {
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let dest = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&dest)?;
            copy_dir_contents(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
