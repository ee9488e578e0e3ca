//! What a run did, for reporting.

use std::path::PathBuf;

use serde::Serialize;

use crate::coord::PackageId;
use crate::delete::DeletionReport;

/// One entry of a feature-pack's version map that a patch replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
  pub old: String,
  pub new: String,
}

/// A patch feature-pack created by the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchRecord {
  pub id: PackageId,
  pub patch_for: PackageId,
  /// File name of the feature-pack archive the patch was derived from.
  pub source_archive: String,
  /// Where the patch archive was installed, relative to the repository root.
  pub installed: PathBuf,
  pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
  pub patches: Vec<PatchRecord>,
  /// Version directories merged in from the repository patch.
  pub added: Vec<PathBuf>,
  pub deleted: DeletionReport,
  /// Content of the written `patches.xml`.
  pub manifest: String,
  pub output: PathBuf,
}

impl RunSummary {
  pub fn replacement_count(&self) -> usize {
    self.patches.iter().map(|patch| patch.replacements.len()).sum()
  }
}
