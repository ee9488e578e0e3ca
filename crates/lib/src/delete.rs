//! Removal of superseded artifacts from the original repository.
//!
//! Each superseded artifact takes its companions with it: every file in the same
//! version directory named `<stem>` or `<stem>.<anything>`, where `<stem>` is the
//! artifact's file name without extension (`art1-1.0.jar.sha1`, `art1-1.0.pom`).
//! A classifier sibling such as `art1-1.0-lib.so` is not a companion.
//!
//! When a version directory would be left without any artifact, the whole
//! directory goes instead.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::scan::is_artifact;

#[derive(Debug, Error)]
pub enum DeletionError {
  #[error("{0} doesn't exist, can't remove it")]
  Missing(PathBuf),

  #[error("failed to {action} {path}: {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

pub type Result<T> = std::result::Result<T, DeletionError>;

/// What was removed, relative to the repository root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
  pub dirs_removed: Vec<PathBuf>,
  pub files_removed: Vec<PathBuf>,
}

/// Whether `name` is `stem` itself or `stem` followed by a `.` suffix.
pub fn is_companion(name: &str, stem: &str) -> bool {
  name
    .strip_prefix(stem)
    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Remove the artifacts at `locations` (relative to `repo_root`) and their companions.
///
/// Every location must exist; this is checked for all of them before anything
/// is removed. Removal itself is not transactional.
pub fn remove_superseded(repo_root: &Path, locations: &BTreeSet<PathBuf>) -> Result<DeletionReport> {
  for location in locations {
    let path = repo_root.join(location);
    if !path.is_file() {
      return Err(DeletionError::Missing(path));
    }
  }

  let mut report = DeletionReport::default();
  for (dir, selected) in select(repo_root, locations)? {
    let survivors = surviving_artifacts(&dir, &selected)?;

    if survivors == 0 {
      fs::remove_dir_all(&dir).map_err(|source| io_err("remove", &dir, source))?;
      let relative = relative_to(repo_root, &dir);
      info!(dir = %relative.display(), "removed version directory");
      report.dirs_removed.push(relative);
      continue;
    }

    debug!(dir = %dir.display(), survivors, "keeping version directory");
    for path in selected {
      fs::remove_file(&path).map_err(|source| io_err("remove", &path, source))?;
      let relative = relative_to(repo_root, &path);
      info!(file = %relative.display(), "removed file");
      report.files_removed.push(relative);
    }
  }

  Ok(report)
}

/// Group the locations and their companions by containing directory.
fn select(repo_root: &Path, locations: &BTreeSet<PathBuf>) -> Result<BTreeMap<PathBuf, BTreeSet<PathBuf>>> {
  let mut groups: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();

  for location in locations {
    let path = repo_root.join(location);
    let (Some(dir), Some(stem)) = (path.parent(), path.file_stem().and_then(|s| s.to_str())) else {
      return Err(DeletionError::Missing(path));
    };

    let selected = groups.entry(dir.to_path_buf()).or_default();
    selected.insert(path.clone());

    for entry in fs::read_dir(dir).map_err(|source| io_err("list", dir, source))? {
      let entry = entry.map_err(|source| io_err("list", dir, source))?;
      let is_file = entry
        .file_type()
        .map_err(|source| io_err("stat", &entry.path(), source))?
        .is_file();
      let name = entry.file_name();
      if is_file && name.to_str().is_some_and(|name| is_companion(name, stem)) {
        selected.insert(entry.path());
      }
    }
  }

  Ok(groups)
}

/// Number of artifacts in `dir` that are not in `selected`.
fn surviving_artifacts(dir: &Path, selected: &BTreeSet<PathBuf>) -> Result<usize> {
  let mut count = 0;
  for entry in fs::read_dir(dir).map_err(|source| io_err("list", dir, source))? {
    let path = entry.map_err(|source| io_err("list", dir, source))?.path();
    if path.is_file() && is_artifact(&path) && !selected.contains(&path) {
      count += 1;
    }
  }
  Ok(count)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
  path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn io_err(action: &'static str, path: &Path, source: io::Error) -> DeletionError {
  DeletionError::Io {
    action,
    path: path.to_path_buf(),
    source,
  }
}
