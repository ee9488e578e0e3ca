//! Patch feature-pack assembly and installation.
//!
//! A patch feature-pack shares the group and artifact of the feature-pack it
//! patches, has a version derived from it (`1.0-redhat-00001` ->
//! `1.0-patch-redhat-00001`), names it in a `<patch for=".."/>` element, and
//! ships the complete updated version map.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::archive::{self, ArchiveError};
use crate::consts::{DESCRIPTOR_FILE, PACKAGE_EXTENSION, PATCH_MARKER, VERSION_DELIMITER};
use crate::coord::{CoordinateError, PackageId};
use crate::descriptor::{DescriptorError, write_descriptor};
use crate::package::versions_path;
use crate::props::{PropertiesError, VersionMap, write_versions};

#[derive(Debug, Error)]
pub enum PatchError {
  #[error("version '{version}' does not contain '{delimiter}', cannot derive a patch version")]
  MissingDelimiter { version: String, delimiter: &'static str },

  #[error("failed to {action} {path}: {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Coordinate(#[from] CoordinateError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  #[error(transparent)]
  Properties(#[from] PropertiesError),
}

pub type Result<T> = std::result::Result<T, PatchError>;

/// A patch feature-pack ready to be assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDescriptor {
  pub id: PackageId,
  /// The feature-pack this patch applies to.
  pub patch_for: PackageId,
  /// Complete version map: the source's entries with replacements applied.
  pub versions: VersionMap,
}

impl PatchDescriptor {
  /// `<artifact>-<version>.zip`
  pub fn archive_name(&self) -> String {
    format!("{}-{}.{}", self.id.artifact, self.id.version, PACKAGE_EXTENSION)
  }
}

/// Insert [`PATCH_MARKER`] before the first [`VERSION_DELIMITER`] of `version`.
pub fn patch_version(version: &str) -> Result<String> {
  let idx = version.find(VERSION_DELIMITER).ok_or_else(|| PatchError::MissingDelimiter {
    version: version.to_string(),
    delimiter: VERSION_DELIMITER,
  })?;
  Ok(format!("{}{}{}", &version[..idx], PATCH_MARKER, &version[idx..]))
}

/// Id of the patch for the feature-pack at `package_path` (repository-relative).
pub fn patch_id(package_path: &Path, patch_version: &str) -> Result<PackageId> {
  Ok(PackageId::from_package_path(package_path, patch_version)?)
}

/// Lay out the patch feature-pack under `work_dir` and zip it.
///
/// Returns the path of the archive, `work_dir/<artifact>-<version>.zip`.
pub fn assemble(work_dir: &Path, patch: &PatchDescriptor) -> Result<PathBuf> {
  let layout = work_dir.join(format!("patch-{}-{}", patch.id.artifact, patch.id.version));
  create_dir(&layout)?;

  write_descriptor(&patch.id, Some(&patch.patch_for), &layout.join(DESCRIPTOR_FILE))?;

  let props = versions_path(&layout);
  if let Some(parent) = props.parent() {
    create_dir(parent)?;
  }
  write_versions(&patch.versions, &props)?;

  let archive_path = work_dir.join(patch.archive_name());
  archive::pack(&layout, &archive_path)?;

  debug!(id = %patch.id, archive = %archive_path.display(), entries = patch.versions.len(), "assembled patch");
  Ok(archive_path)
}

/// Copy the patch archive into `package_dir/<patch_version>/`.
pub fn install(package_dir: &Path, patch_version: &str, archive: &Path) -> Result<PathBuf> {
  let target_dir = package_dir.join(patch_version);
  create_dir(&target_dir)?;

  let file_name = archive.file_name().ok_or_else(|| PatchError::Io {
    action: "install",
    path: archive.to_path_buf(),
    source: io::Error::new(io::ErrorKind::InvalidInput, "archive path has no file name"),
  })?;
  let target = target_dir.join(file_name);

  fs::copy(archive, &target).map_err(|source| PatchError::Io {
    action: "install",
    path: target.clone(),
    source,
  })?;

  info!(target = %target.display(), "installed patch");
  Ok(target)
}

fn create_dir(path: &Path) -> Result<()> {
  fs::create_dir_all(path).map_err(|source| PatchError::Io {
    action: "create",
    path: path.to_path_buf(),
    source,
  })
}
