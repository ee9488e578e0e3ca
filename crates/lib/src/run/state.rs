//! State carried from one feature-pack to the next during a run.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::diff::VersionDiff;
use crate::manifest::PatchManifest;
use crate::patch::PatchDescriptor;
use crate::props::VersionMap;
use crate::summary::{PatchRecord, Replacement};

use super::error::RunError;

/// Accumulated outcome of the feature-packs processed so far.
///
/// Each step takes the state by value and hands back the updated one.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
  /// Patched artifacts not yet matched by any feature-pack.
  pub pending: VersionMap,
  pub manifest: PatchManifest,
  /// Repository-relative locations superseded by the patches so far.
  pub superseded: BTreeSet<PathBuf>,
  pub records: Vec<PatchRecord>,
}

impl Reconciliation {
  pub fn new(pool: VersionMap) -> Self {
    Self {
      pending: pool,
      ..Default::default()
    }
  }

  /// Fold a created patch and the diff it was built from into the state.
  pub fn record(mut self, patch: &PatchDescriptor, diff: VersionDiff, source_archive: String, installed: PathBuf) -> Self {
    let mut replacements = Vec::with_capacity(diff.replaced.len());
    for (key, old) in diff.replaced {
      self.pending.remove(&key);
      let new = patch.versions.get(&key).cloned().unwrap_or_default();
      replacements.push(Replacement { old, new });
    }
    self.superseded.extend(diff.to_remove);
    self.manifest.push(patch.id.clone());

    debug!(id = %patch.id, pending = self.pending.len(), "recorded patch");
    self.records.push(PatchRecord {
      id: patch.id.clone(),
      patch_for: patch.patch_for.clone(),
      source_archive,
      installed,
      replacements,
    });
    self
  }

  /// Check that at least one patch was created and every patched artifact was matched.
  pub fn finish(self) -> Result<Self, RunError> {
    if self.manifest.is_empty() {
      return Err(RunError::NoPatchesProduced);
    }
    if !self.pending.is_empty() {
      return Err(RunError::ReconciliationIncomplete(self.pending.into_keys().collect()));
    }
    Ok(self)
  }
}
