//! Run configuration.

use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_PACKAGE_PATHS, DEFAULT_WORK_DIR, PACKAGE_PATHS_ENV};

/// Repository-relative paths of the feature-packs a run inspects, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePaths(Vec<PathBuf>);

impl Default for PackagePaths {
  fn default() -> Self {
    Self(DEFAULT_PACKAGE_PATHS.iter().map(PathBuf::from).collect())
  }
}

impl PackagePaths {
  pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
    Self(paths.into_iter().collect())
  }

  /// Parse a comma separated list. Entries are trimmed and empty entries dropped.
  pub fn parse(list: &str) -> Self {
    Self(
      list
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect(),
    )
  }

  /// The list from `REPATCH_PACKAGE_PATHS`, or the defaults when it is unset.
  pub fn from_env() -> Self {
    std::env::var(PACKAGE_PATHS_ENV)
      .map(|list| Self::parse(&list))
      .unwrap_or_default()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Path> {
    self.0.iter().map(PathBuf::as_path)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Inputs of one reconciliation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
  /// Archive of the original repository.
  pub original: PathBuf,
  /// Archive of the repository patch.
  pub patch: PathBuf,
  /// Where the repaired repository archive is written.
  pub output: PathBuf,
  /// Scratch directory, wiped at the start of the run.
  pub work_dir: PathBuf,
  pub packages: PackagePaths,
}

impl RunConfig {
  pub fn new(original: impl Into<PathBuf>, patch: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
    Self {
      original: original.into(),
      patch: patch.into(),
      output: output.into(),
      work_dir: PathBuf::from(DEFAULT_WORK_DIR),
      packages: PackagePaths::default(),
    }
  }

  pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
    self.work_dir = work_dir.into();
    self
  }

  pub fn with_packages(mut self, packages: PackagePaths) -> Self {
    self.packages = packages;
    self
  }
}
