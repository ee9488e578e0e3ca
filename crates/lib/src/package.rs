//! Feature-packs installed in the original repository.
//!
//! A known package path (`org/foo/bar/fp-prod1`) holds one version directory
//! with the packaged feature-pack inside:
//!
//! ```text
//! org/foo/bar/fp-prod1/
//! └── 1.0-redhat-00001/
//!     └── fp-prod1-1.0-redhat-00001.zip
//!         ├── feature-pack.xml
//!         └── resources/wildfly/artifact-versions.properties
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::archive::{self, ArchiveError};
use crate::consts::{DESCRIPTOR_FILE, PACKAGE_EXTENSION, VERSIONS_RESOURCE};
use crate::coord::PackageId;
use crate::descriptor::{DescriptorError, read_descriptor};
use crate::props::{PropertiesError, VersionMap, read_versions};

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("no version directory in {0}")]
  NoVersionDir(PathBuf),

  #[error("no galleon pack archive in {0}")]
  NoArchive(PathBuf),

  #[error("failed to list {path}: {source}")]
  List {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  #[error(transparent)]
  Properties(#[from] PropertiesError),
}

pub type Result<T> = std::result::Result<T, PackageError>;

/// Where a feature-pack lives in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
  /// Version directory name.
  pub version: String,
  /// Absolute path of the packaged feature-pack.
  pub archive: PathBuf,
}

impl PackageLocation {
  pub fn archive_name(&self) -> String {
    self
      .archive
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }
}

/// A loaded feature-pack: its id and the version map it ships.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
  pub id: PackageId,
  pub location: PackageLocation,
  /// Scratch directory holding the unpacked feature-pack.
  pub unpacked: PathBuf,
  pub versions: VersionMap,
}

/// Find the version directory and package archive under `package_dir`.
///
/// Entries are taken in name order; the first directory is the version and the
/// first `.zip` inside it is the package.
pub fn locate(package_dir: &Path) -> Result<PackageLocation> {
  let version_dir = sorted_entries(package_dir)?
    .into_iter()
    .find(|path| path.is_dir())
    .ok_or_else(|| PackageError::NoVersionDir(package_dir.to_path_buf()))?;

  let archive = sorted_entries(&version_dir)?
    .into_iter()
    .find(|path| {
      path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(PACKAGE_EXTENSION)
    })
    .ok_or_else(|| PackageError::NoArchive(version_dir.clone()))?;

  let version = version_dir
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .ok_or_else(|| PackageError::NoVersionDir(package_dir.to_path_buf()))?;

  Ok(PackageLocation { version, archive })
}

/// Unpack the feature-pack at `location` into `work_dir` and read its descriptor and version map.
pub fn load(location: PackageLocation, work_dir: &Path) -> Result<PackageDescriptor> {
  info!(archive = %location.archive_name(), "scanning feature-pack");

  let unpacked = work_dir.join(location.archive_name());
  archive::unpack(&location.archive, &unpacked)?;

  let descriptor = read_descriptor(&unpacked.join(DESCRIPTOR_FILE))?;
  let versions = read_versions(&versions_path(&unpacked))?;
  debug!(id = %descriptor.location, entries = versions.len(), "loaded version map");

  Ok(PackageDescriptor {
    id: descriptor.location,
    location,
    unpacked,
    versions,
  })
}

/// Path of the version map inside an unpacked feature-pack.
pub fn versions_path(feature_pack_dir: &Path) -> PathBuf {
  VERSIONS_RESOURCE
    .iter()
    .fold(feature_pack_dir.to_path_buf(), |path, segment| path.join(segment))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
  let list_err = |source| PackageError::List {
    path: dir.to_path_buf(),
    source,
  };

  let mut entries = fs::read_dir(dir)
    .map_err(list_err)?
    .map(|entry| entry.map(|entry| entry.path()))
    .collect::<io::Result<Vec<_>>>()
    .map_err(list_err)?;
  entries.sort();
  Ok(entries)
}
