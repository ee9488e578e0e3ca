use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::coord::CoordinateError;
use crate::delete::DeletionError;
use crate::manifest::ManifestError;
use crate::package::PackageError;
use crate::patch::PatchError;
use crate::props::PropertiesError;
use crate::scan::ScanError;
use crate::util::fs::FsError;

/// Errors that abort a run. None of them is retried.
#[derive(Debug, Error)]
pub enum RunError {
  #[error("input archive {0} does not exist")]
  InputMissing(PathBuf),

  #[error("no artifacts found in the repository patch {0}, check the patch archive")]
  EmptyPatchInput(PathBuf),

  #[error("no 'maven-repository' directory found under {0}")]
  MissingRepositoryRoot(PathBuf),

  #[error("no version directory in {0}")]
  NoVersionDir(PathBuf),

  #[error("no galleon pack archive in {0}")]
  NoPackageArchive(PathBuf),

  #[error(transparent)]
  PropertyParse(PropertiesError),

  #[error("artifacts in the repository patch were not found in any feature-pack: {}", .0.join(", "))]
  ReconciliationIncomplete(Vec<String>),

  #[error("no patches created, no feature-pack references an artifact of the repository patch")]
  NoPatchesProduced,

  #[error("{0} is marked for removal but doesn't exist")]
  DeletionConsistency(PathBuf),

  #[error(transparent)]
  Scan(ScanError),

  #[error(transparent)]
  Package(PackageError),

  #[error(transparent)]
  Deletion(DeletionError),

  #[error(transparent)]
  Patch(#[from] PatchError),

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Coordinate(#[from] CoordinateError),

  #[error(transparent)]
  Fs(#[from] FsError),
}

/// Coarse classification of a [`RunError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Input,
  EmptyPatchInput,
  Structural,
  PropertyParse,
  ReconciliationIncomplete,
  NoPatchesProduced,
  DeletionConsistency,
  /// A failure of one of the collaborators: filesystem, archive, XML, coordinates.
  Collaborator,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ErrorKind::Input => "input error",
      ErrorKind::EmptyPatchInput => "empty patch input",
      ErrorKind::Structural => "structural error",
      ErrorKind::PropertyParse => "property parse error",
      ErrorKind::ReconciliationIncomplete => "reconciliation incomplete",
      ErrorKind::NoPatchesProduced => "no patches produced",
      ErrorKind::DeletionConsistency => "deletion consistency error",
      ErrorKind::Collaborator => "error",
    };
    f.write_str(name)
  }
}

impl RunError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      RunError::InputMissing(_) => ErrorKind::Input,
      RunError::EmptyPatchInput(_) => ErrorKind::EmptyPatchInput,
      RunError::MissingRepositoryRoot(_) | RunError::NoVersionDir(_) | RunError::NoPackageArchive(_) => {
        ErrorKind::Structural
      }
      RunError::PropertyParse(_) => ErrorKind::PropertyParse,
      RunError::ReconciliationIncomplete(_) => ErrorKind::ReconciliationIncomplete,
      RunError::NoPatchesProduced => ErrorKind::NoPatchesProduced,
      RunError::DeletionConsistency(_) => ErrorKind::DeletionConsistency,
      RunError::Scan(_)
      | RunError::Package(_)
      | RunError::Deletion(_)
      | RunError::Patch(_)
      | RunError::Manifest(_)
      | RunError::Archive(_)
      | RunError::Coordinate(_)
      | RunError::Fs(_) => ErrorKind::Collaborator,
    }
  }
}

impl From<ScanError> for RunError {
  fn from(err: ScanError) -> Self {
    match err {
      ScanError::MarkerNotFound { tree, .. } => RunError::MissingRepositoryRoot(tree),
      other => RunError::Scan(other),
    }
  }
}

impl From<PackageError> for RunError {
  fn from(err: PackageError) -> Self {
    match err {
      PackageError::NoVersionDir(path) => RunError::NoVersionDir(path),
      PackageError::NoArchive(path) => RunError::NoPackageArchive(path),
      PackageError::Properties(err @ PropertiesError::MissingSeparator { .. }) => RunError::PropertyParse(err),
      other => RunError::Package(other),
    }
  }
}

impl From<DeletionError> for RunError {
  fn from(err: DeletionError) -> Self {
    match err {
      DeletionError::Missing(path) => RunError::DeletionConsistency(path),
      other => RunError::Deletion(other),
    }
  }
}
