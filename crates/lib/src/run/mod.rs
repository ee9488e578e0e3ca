//! End-to-end reconciliation run.
//!
//! The `run` function orchestrates the full flow:
//!
//! 1. Remove any previous output, check inputs, reset the scratch directory
//! 2. Unpack the original repository and the repository patch
//! 3. Locate both repository roots and enumerate the patched artifacts
//! 4. For each known feature-pack: diff its version map against the pending
//!    artifacts and, on a match, assemble and install a patch feature-pack
//! 5. Fail unless patches were created and every patched artifact was matched
//! 6. Remove the superseded artifacts
//! 7. Merge the patched artifacts into the original repository
//! 8. Write `patches.xml` and repackage the repository
//!
//! A failure aborts the run. Nothing is rolled back.

mod error;
mod state;

pub use error::{ErrorKind, RunError};
pub use state::Reconciliation;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::archive;
use crate::config::RunConfig;
use crate::delete::remove_superseded;
use crate::diff::{compute_diff, coordinate_pool};
use crate::package;
use crate::patch::{self, PatchDescriptor};
use crate::scan::{enumerate, locate_root};
use crate::summary::RunSummary;
use crate::util::fs::{copy_tree, remove_file_if_exists, reset_dir};

pub type Result<T> = std::result::Result<T, RunError>;

/// Scratch subdirectory the original repository is unpacked into.
const ORIGINAL_DIR: &str = "maven-repo";
/// Scratch subdirectory the repository patch is unpacked into.
const PATCH_DIR: &str = "repo-patch";

/// Run a reconciliation as configured.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
  if remove_file_if_exists(&config.output)? {
    debug!(output = %config.output.display(), "removed previous output");
  }

  for input in [&config.original, &config.patch] {
    if !input.is_file() {
      return Err(RunError::InputMissing(input.clone()));
    }
  }

  reset_dir(&config.work_dir)?;
  info!(work_dir = %config.work_dir.display(), "using scratch directory, it can be deleted after the run");

  let original_tree = config.work_dir.join(ORIGINAL_DIR);
  let patch_tree = config.work_dir.join(PATCH_DIR);
  info!(archive = %config.original.display(), "unpacking repository");
  archive::unpack(&config.original, &original_tree)?;
  info!(archive = %config.patch.display(), "unpacking repository patch");
  archive::unpack(&config.patch, &patch_tree)?;

  let repo_root = locate_root(&original_tree)?;
  let patch_root = locate_root(&patch_tree)?;

  let patched = enumerate(&patch_root)?;
  if patched.is_empty() {
    return Err(RunError::EmptyPatchInput(config.patch.clone()));
  }
  info!(artifacts = patched.len(), "found patched artifacts");

  let mut state = Reconciliation::new(coordinate_pool(&patched)?);
  for package_path in config.packages.iter() {
    state = reconcile_package(state, &repo_root, package_path, &config.work_dir)?;
  }
  let state = state.finish()?;

  let deleted = remove_superseded(&repo_root, &state.superseded)?;

  copy_tree(&patch_root, &repo_root)?;
  let added = added_dirs(&patched);

  let manifest_dir = repo_root.parent().unwrap_or(repo_root.as_path());
  let (_, manifest) = state.manifest.write(manifest_dir)?;

  info!(output = %config.output.display(), "packing repository");
  archive::pack(&original_tree, &config.output)?;

  Ok(RunSummary {
    patches: state.records,
    added,
    deleted,
    manifest,
    output: config.output.clone(),
  })
}

/// One step of the feature-pack loop.
///
/// Feature-packs missing from the repository leave the state untouched.
fn reconcile_package(
  state: Reconciliation,
  repo_root: &Path,
  package_path: &Path,
  work_dir: &Path,
) -> Result<Reconciliation> {
  let package_dir = repo_root.join(package_path);
  if !package_dir.exists() {
    debug!(package = %package_path.display(), "feature-pack not in repository, skipping");
    return Ok(state);
  }

  let location = package::locate(&package_dir)?;
  let source_archive = location.archive_name();
  let source_version = location.version.clone();
  let loaded = package::load(location, work_dir)?;

  let diff = compute_diff(loaded.versions, &state.pending)?;
  if diff.is_empty() {
    info!(package = %loaded.id, "feature-pack is not affected by the patch");
    return Ok(state);
  }

  let patch_version = patch::patch_version(&source_version)?;
  let patch = PatchDescriptor {
    id: patch::patch_id(package_path, &patch_version)?,
    patch_for: loaded.id,
    versions: diff.updated.clone(),
  };

  let archive_path = patch::assemble(work_dir, &patch)?;
  patch::install(&package_dir, &patch_version, &archive_path)?;
  info!(
    patch = %patch.id,
    source = %source_archive,
    replaced = diff.replaced.len(),
    "created patch"
  );

  let installed = package_path.join(&patch_version).join(patch.archive_name());
  Ok(state.record(&patch, diff, source_archive, installed))
}

/// Version directories of the patched artifacts.
fn added_dirs(patched: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
  patched
    .iter()
    .filter_map(|location| location.parent())
    .map(Path::to_path_buf)
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}
