//! Repository scanning.
//!
//! Archives of a Maven repository put the repository somewhere below their top
//! level (`builder-image/maven-repository/...`). The repository root is the first
//! directory named [`REPO_MARKER_DIR`] in a depth-first walk, and the artifacts
//! are the `.jar`/`.so` files below it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::consts::{ARTIFACT_EXTENSIONS, REPO_MARKER_DIR};

#[derive(Debug, Error)]
pub enum ScanError {
  #[error("no '{marker}' directory found under {tree}")]
  MarkerNotFound { marker: &'static str, tree: PathBuf },

  #[error("failed to walk repository: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("{path} is not below {root}")]
  OutsideRoot { path: PathBuf, root: PathBuf },
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Whether `path` names an artifact file (by extension).
pub fn is_artifact(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext))
}

/// Find the repository root inside `tree`.
///
/// Siblings are visited in file name order, so the first marker found is
/// deterministic. Nothing below a marker directory is searched.
pub fn locate_root(tree: &Path) -> Result<PathBuf> {
  for entry in WalkDir::new(tree).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_dir() {
      continue;
    }
    if entry.file_name() == REPO_MARKER_DIR {
      debug!(root = %entry.path().display(), "located repository root");
      return Ok(entry.into_path());
    }
  }

  Err(ScanError::MarkerNotFound {
    marker: REPO_MARKER_DIR,
    tree: tree.to_path_buf(),
  })
}

/// Every artifact below `root`, as paths relative to `root`.
pub fn enumerate(root: &Path) -> Result<BTreeSet<PathBuf>> {
  let mut artifacts = BTreeSet::new();

  for entry in WalkDir::new(root) {
    let entry = entry?;
    if !entry.file_type().is_file() || !is_artifact(entry.path()) {
      continue;
    }

    let relative = entry
      .path()
      .strip_prefix(root)
      .map_err(|_| ScanError::OutsideRoot {
        path: entry.path().to_path_buf(),
        root: root.to_path_buf(),
      })?;
    artifacts.insert(relative.to_path_buf());
  }

  debug!(root = %root.display(), count = artifacts.len(), "enumerated artifacts");
  Ok(artifacts)
}
